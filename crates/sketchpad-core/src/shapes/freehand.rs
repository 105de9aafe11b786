//! Freehand pen stroke.

use super::{ShapeTrait, bounds_of};
use kurbo::{BezPath, Point, Rect};

/// Catmull-Rom tension used to smooth pen strokes.
const TENSION: f64 = 0.5;

/// A pen stroke: a smoothed curve through sampled points.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Freehand {
    /// Points in the order they were sampled.
    pub points: Vec<Point>,
}

impl Freehand {
    /// Create a new empty freehand shape.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create from existing points.
    pub fn from_points(points: Vec<Point>) -> Self {
        Self { points }
    }

    /// Add a point to the path.
    pub fn add_point(&mut self, point: Point) {
        self.points.push(point);
    }

    /// Get the number of points.
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Check if the path is empty.
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Whether there is enough to draw a visible stroke.
    pub fn is_drawable(&self) -> bool {
        self.points.len() >= 2
    }
}

/// Smooth curve through `points` as a chain of cubic Béziers (Catmull-Rom).
pub(crate) fn catmull_rom_path(points: &[Point]) -> BezPath {
    let mut path = BezPath::new();
    let Some(first) = points.first() else {
        return path;
    };
    path.move_to(*first);

    let last = points.len() - 1;
    for i in 0..last {
        let p0 = points[i.saturating_sub(1)];
        let p1 = points[i];
        let p2 = points[i + 1];
        let p3 = points[(i + 2).min(last)];

        let cp1 = Point::new(
            p1.x + (p2.x - p0.x) * TENSION / 3.0,
            p1.y + (p2.y - p0.y) * TENSION / 3.0,
        );
        let cp2 = Point::new(
            p2.x - (p3.x - p1.x) * TENSION / 3.0,
            p2.y - (p3.y - p1.y) * TENSION / 3.0,
        );
        path.curve_to(cp1, cp2, p2);
    }
    path
}

impl ShapeTrait for Freehand {
    fn bounds(&self) -> Rect {
        bounds_of(&self.points)
    }

    fn to_path(&self) -> BezPath {
        catmull_rom_path(&self.points)
    }

    fn is_closed(&self) -> bool {
        false
    }
}
