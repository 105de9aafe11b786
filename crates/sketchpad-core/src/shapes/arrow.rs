//! Arrow shape.

use super::{ShapeTrait, bounds_of};
use kurbo::{BezPath, Point, Rect};
use std::f64::consts::FRAC_PI_4;

/// Barb length as a fraction of the shaft length.
const BARB_RATIO: f64 = 3.0;

/// Barb angle measured from the reversed shaft.
const BARB_ANGLE: f64 = FRAC_PI_4;

/// An arrow: a shaft with two open barbs at the head.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Arrow {
    /// Tail of the shaft.
    pub start: Point,
    /// Head of the shaft, where the barbs meet.
    pub end: Point,
    /// Free ends of the two barbs.
    pub barbs: [Point; 2],
}

impl Arrow {
    /// Create an arrow pointing from `start` to `end`.
    pub fn new(start: Point, end: Point) -> Self {
        Self {
            start,
            end,
            barbs: barb_endpoints(start, end),
        }
    }

    /// Length of the arrow shaft.
    pub fn length(&self) -> f64 {
        self.start.distance(self.end)
    }
}

/// Rotate the reversed shaft by ±45° and scale it to a third of its length.
fn barb_endpoints(start: Point, end: Point) -> [Point; 2] {
    let (sin, cos) = BARB_ANGLE.sin_cos();
    let dx = start.x - end.x;
    let dy = start.y - end.y;
    let barb = |sign: f64| {
        Point::new(
            end.x + (dx * cos + sign * dy * sin) / BARB_RATIO,
            end.y + (dy * cos - sign * dx * sin) / BARB_RATIO,
        )
    };
    [barb(1.0), barb(-1.0)]
}

impl ShapeTrait for Arrow {
    fn bounds(&self) -> Rect {
        bounds_of(&[self.start, self.end, self.barbs[0], self.barbs[1]])
    }

    fn to_path(&self) -> BezPath {
        let mut path = BezPath::new();
        path.move_to(self.start);
        path.line_to(self.end);
        for barb in self.barbs {
            path.move_to(self.end);
            path.line_to(barb);
        }
        path
    }

    fn is_closed(&self) -> bool {
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TOLERANCE: f64 = 1e-9;

    #[test]
    fn test_arrow_creation() {
        let arrow = Arrow::new(Point::new(0.0, 0.0), Point::new(100.0, 0.0));
        assert!((arrow.length() - 100.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_barbs_horizontal() {
        let arrow = Arrow::new(Point::new(0.0, 0.0), Point::new(30.0, 0.0));
        let offset = 10.0 * FRAC_PI_4.cos();
        let [b1, b2] = arrow.barbs;

        assert!((b1.x - (30.0 - offset)).abs() < TOLERANCE);
        assert!((b1.y - offset).abs() < TOLERANCE);
        assert!((b2.x - (30.0 - offset)).abs() < TOLERANCE);
        assert!((b2.y + offset).abs() < TOLERANCE);
    }

    #[test]
    fn test_barbs_are_a_third_of_the_shaft() {
        let arrow = Arrow::new(Point::new(12.0, -7.0), Point::new(-40.0, 33.0));
        for barb in arrow.barbs {
            let len = arrow.end.distance(barb);
            assert!((len - arrow.length() / 3.0).abs() < TOLERANCE);
        }
    }

    #[test]
    fn test_barbs_match_component_formula() {
        // endpoint = P + (1/3) * ((A - P) cos θ + (other axis difference) sin θ)
        let a = Point::new(3.0, 11.0);
        let p = Point::new(17.0, 2.0);
        let (s, c) = FRAC_PI_4.sin_cos();
        let x1 = p.x + ((a.x - p.x) * c + (a.y - p.y) * s) / 3.0;
        let y1 = p.y + ((a.y - p.y) * c + (p.x - a.x) * s) / 3.0;
        let x2 = p.x + ((a.x - p.x) * c + (p.y - a.y) * s) / 3.0;
        let y2 = p.y + ((a.y - p.y) * c + (a.x - p.x) * s) / 3.0;

        let arrow = Arrow::new(a, p);
        assert!((arrow.barbs[0].x - x1).abs() < TOLERANCE);
        assert!((arrow.barbs[0].y - y1).abs() < TOLERANCE);
        assert!((arrow.barbs[1].x - x2).abs() < TOLERANCE);
        assert!((arrow.barbs[1].y - y2).abs() < TOLERANCE);
    }

    #[test]
    fn test_zero_length_arrow() {
        let p = Point::new(4.0, 4.0);
        let arrow = Arrow::new(p, p);
        assert_eq!(arrow.barbs, [p, p]);
    }
}
