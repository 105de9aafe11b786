//! Input state management for pointer and keyboard events.

use kurbo::{Point, Vec2};
use serde::{Deserialize, Serialize};

/// Mouse button identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MouseButton {
    #[default]
    Left,
    Right,
    Middle,
}

/// Modifier keys state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Modifiers {
    pub shift: bool,
    pub ctrl: bool,
    pub alt: bool,
    pub meta: bool,
}

impl Modifiers {
    pub const NONE: Modifiers = Modifiers {
        shift: false,
        ctrl: false,
        alt: false,
        meta: false,
    };

    pub const CTRL: Modifiers = Modifiers {
        ctrl: true,
        ..Modifiers::NONE
    };

    /// Ctrl on most platforms, Cmd on macOS.
    pub fn command(&self) -> bool {
        self.ctrl || self.meta
    }
}

/// Pointer event in page coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PointerEvent {
    Down { position: Point, button: MouseButton },
    Up { position: Point, button: MouseButton },
    Move { position: Point },
    Leave { position: Point },
}

impl PointerEvent {
    pub fn position(&self) -> Point {
        match *self {
            PointerEvent::Down { position, .. }
            | PointerEvent::Up { position, .. }
            | PointerEvent::Move { position }
            | PointerEvent::Leave { position } => position,
        }
    }
}

/// A key press with the modifiers held at the time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyEvent {
    pub key: String,
    #[serde(default)]
    pub modifiers: Modifiers,
}

impl KeyEvent {
    pub fn new(key: impl Into<String>, modifiers: Modifiers) -> Self {
        Self {
            key: key.into(),
            modifiers,
        }
    }
}

/// Any event the drawing surface reacts to, in the form it is recorded in
/// event scripts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum InputEvent {
    PointerDown {
        x: f64,
        y: f64,
        #[serde(default)]
        button: MouseButton,
    },
    PointerMove {
        x: f64,
        y: f64,
    },
    PointerUp {
        x: f64,
        y: f64,
        #[serde(default)]
        button: MouseButton,
    },
    PointerLeave {
        x: f64,
        y: f64,
    },
    Key(KeyEvent),
    /// Characters typed into the text overlay.
    Text {
        text: String,
    },
    Resize {
        width: u32,
        height: u32,
    },
}

impl InputEvent {
    /// The pointer event this describes, if it is one.
    pub fn as_pointer(&self) -> Option<PointerEvent> {
        match *self {
            InputEvent::PointerDown { x, y, button } => Some(PointerEvent::Down {
                position: Point::new(x, y),
                button,
            }),
            InputEvent::PointerUp { x, y, button } => Some(PointerEvent::Up {
                position: Point::new(x, y),
                button,
            }),
            InputEvent::PointerMove { x, y } => Some(PointerEvent::Move {
                position: Point::new(x, y),
            }),
            InputEvent::PointerLeave { x, y } => Some(PointerEvent::Leave {
                position: Point::new(x, y),
            }),
            _ => None,
        }
    }
}

/// Offset of the canvas's top-left corner in page coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CanvasOrigin {
    pub x: f64,
    pub y: f64,
}

impl Default for CanvasOrigin {
    fn default() -> Self {
        Self { x: 25.0, y: 82.0 }
    }
}

impl CanvasOrigin {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Convert a page position to canvas-local coordinates.
    pub fn to_local(&self, page: Point) -> Point {
        page - Vec2::new(self.x, self.y)
    }
}

/// What a pointer event means for the drawing surface, in canvas coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PointerAction {
    Begin(Point),
    Move(Point),
    End(Point),
    Leave(Point),
}

/// Tracks the pointer across events.
#[derive(Debug, Clone, Default)]
pub struct InputState {
    origin: CanvasOrigin,
    /// Current pointer position in canvas coordinates.
    pub pointer_position: Point,
    /// Whether the primary button is held.
    pub is_dragging: bool,
    /// Canvas position where the current drag started.
    pub drag_start: Option<Point>,
}

impl InputState {
    /// Create a new input state.
    pub fn new(origin: CanvasOrigin) -> Self {
        Self {
            origin,
            ..Self::default()
        }
    }

    pub fn origin(&self) -> CanvasOrigin {
        self.origin
    }

    /// Process a pointer event. Non-primary buttons yield no action.
    pub fn handle_pointer_event(&mut self, event: PointerEvent) -> Option<PointerAction> {
        let position = self.origin.to_local(event.position());
        self.pointer_position = position;

        match event {
            PointerEvent::Down { button, .. } => {
                if button != MouseButton::Left {
                    log::debug!("Ignoring {button:?} button press");
                    return None;
                }
                if !self.is_dragging {
                    self.is_dragging = true;
                    self.drag_start = Some(position);
                }
                Some(PointerAction::Begin(position))
            }
            PointerEvent::Up { button, .. } => {
                if button != MouseButton::Left {
                    return None;
                }
                self.is_dragging = false;
                self.drag_start = None;
                Some(PointerAction::End(position))
            }
            PointerEvent::Move { .. } => Some(PointerAction::Move(position)),
            PointerEvent::Leave { .. } => {
                self.is_dragging = false;
                self.drag_start = None;
                Some(PointerAction::Leave(position))
            }
        }
    }

    /// Rounded pointer coordinates for the position readout.
    pub fn readout(&self) -> (i64, i64) {
        (
            self.pointer_position.x.round() as i64,
            self.pointer_position.y.round() as i64,
        )
    }

    /// Get the drag delta from start position, if dragging.
    pub fn drag_delta(&self) -> Option<Vec2> {
        self.drag_start.map(|start| self.pointer_position - start)
    }
}
