//! Closed polygons: square, triangle, diamond and bi-shape triangle.

use super::{ShapeTrait, bounds_of, midpoint};
use kurbo::{BezPath, Point, Rect};

/// A closed polygon through its vertices in order.
#[derive(Debug, Clone, PartialEq)]
pub struct Polygon {
    pub vertices: Vec<Point>,
}

impl Polygon {
    pub fn new(vertices: Vec<Point>) -> Self {
        Self { vertices }
    }

    /// Axis-aligned rectangle with opposite corners `a` and `p`.
    pub fn square(a: Point, p: Point) -> Self {
        Self::new(vec![
            Point::new(a.x, a.y),
            Point::new(p.x, a.y),
            Point::new(p.x, p.y),
            Point::new(a.x, p.y),
        ])
    }

    /// Isoceles triangle with its apex centered on the anchor's edge.
    pub fn triangle(a: Point, p: Point) -> Self {
        let center_x = midpoint(a, p).x;
        Self::new(vec![
            Point::new(center_x, a.y),
            Point::new(p.x, p.y),
            Point::new(a.x, p.y),
        ])
    }

    /// Rhombus through the midpoints of the bounding box edges.
    pub fn diamond(a: Point, p: Point) -> Self {
        let center = midpoint(a, p);
        Self::new(vec![
            Point::new(center.x, a.y),
            Point::new(p.x, center.y),
            Point::new(center.x, p.y),
            Point::new(a.x, center.y),
        ])
    }

    /// Right triangle standing on the vertical center line.
    pub fn bi_shape_triangle(a: Point, p: Point) -> Self {
        let center_x = midpoint(a, p).x;
        Self::new(vec![
            Point::new(center_x, a.y),
            Point::new(p.x, p.y),
            Point::new(center_x, p.y),
        ])
    }
}

impl ShapeTrait for Polygon {
    fn bounds(&self) -> Rect {
        bounds_of(&self.vertices)
    }

    fn to_path(&self) -> BezPath {
        let mut path = BezPath::new();
        let Some((first, rest)) = self.vertices.split_first() else {
            return path;
        };
        path.move_to(*first);
        for vertex in rest {
            path.line_to(*vertex);
        }
        path.close_path();
        path
    }

    fn is_closed(&self) -> bool {
        true
    }
}
