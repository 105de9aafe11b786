//! Sketchpad Core Library
//!
//! Platform-agnostic logic for the Sketchpad drawing surface: tools and their
//! style, shape geometry, undo/redo history, input handling and storage.

pub mod history;
pub mod input;
pub mod shapes;
pub mod storage;
pub mod style;
pub mod text;
pub mod tools;

pub use history::{History, HistoryStep};
pub use input::{CanvasOrigin, InputEvent, InputState, KeyEvent, Modifiers, PointerAction, PointerEvent};
pub use shapes::{Shape, ShapeTrait};
pub use storage::{CanvasStore, MemoryStorage, Storage, StorageError, StorageResult};
pub use style::{Color, DashStyle, FontSpec, FontStyle, LineJoin, StyleError, ToolStyle};
pub use text::{TextEntry, TextToggle};
pub use tools::{DragSession, ToolKind, ToolManager};
