//! Tool system: the selected tool, its style, and the active drag session.

use crate::shapes::{Arrow, Circle, Freehand, Line, Polygon, Shape};
use crate::style::ToolStyle;
use kurbo::Point;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Generate a random seed for new tool interactions.
/// Uses a simple counter + hash approach that works on all platforms including WASM.
fn generate_tool_seed() -> u32 {
    use std::sync::atomic::{AtomicU32, Ordering};

    static SEED_COUNTER: AtomicU32 = AtomicU32::new(1);

    let counter = SEED_COUNTER.fetch_add(1, Ordering::Relaxed);

    // splitmix32-style mixing
    let mut x = counter.wrapping_mul(0x9E3779B9);
    x ^= x >> 16;
    x = x.wrapping_mul(0x85EBCA6B);
    x ^= x >> 13;
    x = x.wrapping_mul(0xC2B2AE35);
    x ^= x >> 16;
    x
}

/// Available tools.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub enum ToolKind {
    #[default]
    Pen,
    Line,
    Square,
    Circle,
    Triangle,
    Arrow,
    Diamond,
    BiShapeTriangle,
    Text,
}

impl ToolKind {
    /// Every tool, in toolbox order.
    pub const ALL: [ToolKind; 9] = [
        ToolKind::Pen,
        ToolKind::Line,
        ToolKind::Square,
        ToolKind::Circle,
        ToolKind::Triangle,
        ToolKind::Arrow,
        ToolKind::Diamond,
        ToolKind::BiShapeTriangle,
        ToolKind::Text,
    ];

    /// Toolbox identifier.
    pub fn name(self) -> &'static str {
        match self {
            ToolKind::Pen => "pen",
            ToolKind::Line => "line",
            ToolKind::Square => "square",
            ToolKind::Circle => "circle",
            ToolKind::Triangle => "triangle",
            ToolKind::Arrow => "arrow",
            ToolKind::Diamond => "diamond",
            ToolKind::BiShapeTriangle => "biShapeTriangle",
            ToolKind::Text => "text",
        }
    }

    /// Tools that drag out a shape from an anchor (everything but pen and text).
    pub fn is_shape(self) -> bool {
        !matches!(self, ToolKind::Pen | ToolKind::Text)
    }

    /// Tools that draw a live preview while dragging.
    pub fn draws_on_drag(self) -> bool {
        self != ToolKind::Text
    }

    /// Shape for a drag from `anchor` to `current`. Pen strokes are built from
    /// the session's accumulated points instead.
    pub fn shape(self, anchor: Point, current: Point) -> Option<Shape> {
        match self {
            ToolKind::Line => Some(Shape::Line(Line::new(anchor, current))),
            ToolKind::Square => Some(Shape::Polygon(Polygon::square(anchor, current))),
            ToolKind::Circle => Some(Shape::Circle(Circle::from_drag(anchor, current))),
            ToolKind::Triangle => Some(Shape::Polygon(Polygon::triangle(anchor, current))),
            ToolKind::Arrow => Some(Shape::Arrow(Arrow::new(anchor, current))),
            ToolKind::Diamond => Some(Shape::Polygon(Polygon::diamond(anchor, current))),
            ToolKind::BiShapeTriangle => {
                Some(Shape::Polygon(Polygon::bi_shape_triangle(anchor, current)))
            }
            ToolKind::Pen | ToolKind::Text => None,
        }
    }
}

impl fmt::Display for ToolKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ToolKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ToolKind::ALL
            .into_iter()
            .find(|tool| tool.name() == s)
            .ok_or_else(|| format!("Unknown tool: {s}"))
    }
}

/// Transient state for one pointer-down to pointer-up gesture.
#[derive(Debug, Clone)]
pub struct DragSession {
    /// Tool the gesture was started with.
    pub tool: ToolKind,
    /// Point where the gesture started.
    pub anchor: Point,
    /// Latest pointer position.
    pub current: Point,
    /// Style captured when the gesture started.
    pub style: ToolStyle,
    /// Seed for hand-drawn effect (generated once at start, stable during drawing).
    pub seed: u32,
    /// Sampled points of a pen stroke.
    pen: Freehand,
}

impl DragSession {
    fn new(tool: ToolKind, anchor: Point, style: ToolStyle) -> Self {
        let mut pen = Freehand::new();
        if tool == ToolKind::Pen {
            pen.add_point(anchor);
        }
        Self {
            tool,
            anchor,
            current: anchor,
            style,
            seed: generate_tool_seed(),
            pen,
        }
    }

    /// Points accumulated by the pen tool.
    pub fn pen_points(&self) -> &[Point] {
        &self.pen.points
    }

    /// Shape to draw for the current state of the gesture.
    pub fn shape(&self) -> Option<Shape> {
        match self.tool {
            ToolKind::Pen if self.pen.is_drawable() => Some(Shape::Freehand(self.pen.clone())),
            ToolKind::Pen => None,
            tool => tool.shape(self.anchor, self.current),
        }
    }
}

/// Manages the current tool, its style, and the active gesture.
#[derive(Debug, Clone, Default)]
pub struct ToolManager {
    /// Currently selected tool.
    pub current_tool: ToolKind,
    /// Style applied to new gestures.
    pub style: ToolStyle,
    session: Option<DragSession>,
}

impl ToolManager {
    /// Create a new tool manager.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the current tool. An active gesture keeps the tool it started with.
    pub fn set_tool(&mut self, tool: ToolKind) {
        self.current_tool = tool;
    }

    /// Begin a gesture. Returns `false` if one is already active.
    pub fn begin(&mut self, point: Point) -> bool {
        if let Some(active) = &self.session {
            log::debug!(
                "Ignoring pointer-down at {:?}: {} drag already active",
                point,
                active.tool
            );
            return false;
        }
        self.session = Some(DragSession::new(self.current_tool, point, self.style.clone()));
        true
    }

    /// Update the active gesture with the live pointer position.
    pub fn update(&mut self, point: Point) -> Option<&DragSession> {
        let session = self.session.as_mut()?;
        session.current = point;
        if session.tool == ToolKind::Pen {
            session.pen.add_point(point);
        }
        Some(session)
    }

    /// End the active gesture and hand it back.
    pub fn end(&mut self) -> Option<DragSession> {
        self.session.take()
    }

    /// Check if a gesture is active.
    pub fn is_active(&self) -> bool {
        self.session.is_some()
    }

    /// The active gesture.
    pub fn session(&self) -> Option<&DragSession> {
        self.session.as_ref()
    }

    /// Get the preview shape for the current gesture.
    pub fn preview_shape(&self) -> Option<Shape> {
        self.session.as_ref().and_then(DragSession::shape)
    }
}
