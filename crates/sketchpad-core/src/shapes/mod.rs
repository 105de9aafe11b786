//! Shape geometry for the drawing tools.
//!
//! Every tool turns an anchor point and a live point into one of these shapes.
//! Shapes are transient: they exist only long enough to be rasterized.

mod arrow;
mod circle;
mod freehand;
mod line;
mod polygon;

pub use arrow::Arrow;
pub use circle::Circle;
pub use freehand::Freehand;
pub use line::Line;
pub use polygon::Polygon;

use kurbo::{BezPath, Point, Rect};

/// Midpoint of two points.
pub fn midpoint(a: Point, b: Point) -> Point {
    Point::new((a.x + b.x) / 2.0, (a.y + b.y) / 2.0)
}

/// Smallest rectangle containing all points (`Rect::ZERO` for none).
pub fn bounds_of(points: &[Point]) -> Rect {
    let Some(first) = points.first() else {
        return Rect::ZERO;
    };
    points
        .iter()
        .skip(1)
        .fold(Rect::from_points(*first, *first), |rect, p| {
            rect.union_pt(*p)
        })
}

/// Common trait for all shapes.
pub trait ShapeTrait {
    /// Get the bounding box in canvas coordinates.
    fn bounds(&self) -> Rect;

    /// Get the path representation for rendering.
    fn to_path(&self) -> BezPath;

    /// Whether the outline encloses an area that can be filled.
    fn is_closed(&self) -> bool;
}

/// Enum wrapper for all shape types.
#[derive(Debug, Clone, PartialEq)]
pub enum Shape {
    Line(Line),
    Polygon(Polygon),
    Circle(Circle),
    Arrow(Arrow),
    Freehand(Freehand),
}

impl Shape {
    pub fn bounds(&self) -> Rect {
        match self {
            Shape::Line(s) => s.bounds(),
            Shape::Polygon(s) => s.bounds(),
            Shape::Circle(s) => s.bounds(),
            Shape::Arrow(s) => s.bounds(),
            Shape::Freehand(s) => s.bounds(),
        }
    }

    pub fn to_path(&self) -> BezPath {
        match self {
            Shape::Line(s) => s.to_path(),
            Shape::Polygon(s) => s.to_path(),
            Shape::Circle(s) => s.to_path(),
            Shape::Arrow(s) => s.to_path(),
            Shape::Freehand(s) => s.to_path(),
        }
    }

    pub fn is_closed(&self) -> bool {
        match self {
            Shape::Line(s) => s.is_closed(),
            Shape::Polygon(s) => s.is_closed(),
            Shape::Circle(s) => s.is_closed(),
            Shape::Arrow(s) => s.is_closed(),
            Shape::Freehand(s) => s.is_closed(),
        }
    }
}
