//! Circle shape.

use super::{ShapeTrait, midpoint};
use kurbo::{BezPath, Point, Rect, Shape as KurboShape};

/// A circle spanning the drag: centered between the two points, with the
/// distance between them as its diameter.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Circle {
    pub center: Point,
    pub radius: f64,
}

impl Circle {
    pub fn new(center: Point, radius: f64) -> Self {
        Self { center, radius }
    }

    /// Circle whose diameter is the segment from `a` to `p`.
    pub fn from_drag(a: Point, p: Point) -> Self {
        Self::new(midpoint(a, p), a.distance(p) / 2.0)
    }
}

impl ShapeTrait for Circle {
    fn bounds(&self) -> Rect {
        Rect::from_center_size(self.center, (self.radius * 2.0, self.radius * 2.0))
    }

    fn to_path(&self) -> BezPath {
        kurbo::Circle::new(self.center, self.radius).to_path(0.1)
    }

    fn is_closed(&self) -> bool {
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_circle_from_drag() {
        let circle = Circle::from_drag(Point::new(0.0, 0.0), Point::new(10.0, 0.0));
        assert_eq!(circle.center, Point::new(5.0, 0.0));
        assert!((circle.radius - 5.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_circle_diagonal_drag() {
        let circle = Circle::from_drag(Point::new(0.0, 0.0), Point::new(6.0, 8.0));
        assert_eq!(circle.center, Point::new(3.0, 4.0));
        assert!((circle.radius - 5.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_bounds() {
        let circle = Circle::new(Point::new(5.0, 5.0), 2.0);
        assert_eq!(circle.bounds(), Rect::new(3.0, 3.0, 7.0, 7.0));
    }

    #[test]
    fn test_zero_radius() {
        let p = Point::new(1.0, 1.0);
        let circle = Circle::from_drag(p, p);
        assert_eq!(circle.radius, 0.0);
        assert_eq!(circle.bounds().area(), 0.0);
    }
}
