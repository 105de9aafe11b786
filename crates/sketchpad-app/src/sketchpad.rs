//! The drawing session: input, tools, surface, history and persistence.

use crate::app::AppConfig;
use crate::error::SketchResult;
use crate::shortcuts::{ShortcutAction, ShortcutRegistry};
use kurbo::Point;
use sketchpad_core::history::{History, HistoryStep};
use sketchpad_core::input::{InputEvent, InputState, KeyEvent, MouseButton, PointerAction, PointerEvent};
use sketchpad_core::storage::{CanvasStore, Storage};
use sketchpad_core::style::{Color, ToolStyle};
use sketchpad_core::text::{TextEntry, TextToggle};
use sketchpad_core::tools::{ToolKind, ToolManager};
use sketchpad_render::{
    FontBook, Pixmap, PixmapRenderer, Raster, RenderResult, SketchRenderer, StrokeOptions, Surface,
    draw_shape, draw_text, encode_png, from_data_url, to_data_url,
};
use std::sync::Arc;

/// File name offered for downloads.
pub const DOWNLOAD_FILE_NAME: &str = "drawing.png";

/// A PNG ready to be saved by the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Download {
    pub file_name: &'static str,
    pub bytes: Vec<u8>,
}

/// How the canvas was initialized from storage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RestoreOutcome {
    /// Nothing was stored.
    Fresh,
    /// The stored canvas was drawn and seeded as the only snapshot.
    Restored,
    /// The stored value could not be read or decoded and was left in place.
    Discarded(String),
}

/// An interactive drawing surface.
pub struct Sketchpad<S: Storage> {
    surface: Surface,
    history: History<Raster>,
    tools: ToolManager,
    input: InputState,
    text: TextEntry,
    fonts: FontBook,
    background: Color,
    default_background: Color,
    store: CanvasStore<S>,
    restore_outcome: RestoreOutcome,
}

impl<S: Storage> Sketchpad<S> {
    /// Create a session and restore any canvas saved in `storage`.
    pub fn new(config: &AppConfig, storage: Arc<S>) -> SketchResult<Self> {
        let history = match config.history_limit {
            Some(limit) => History::with_limit(limit),
            None => History::new(),
        };
        let mut sketchpad = Self {
            surface: Surface::new(config.width, config.height)?,
            history,
            tools: ToolManager::new(),
            input: InputState::new(config.origin),
            text: TextEntry::default(),
            fonts: config.load_fonts(),
            background: config.background,
            default_background: config.background,
            store: CanvasStore::new(storage),
            restore_outcome: RestoreOutcome::Fresh,
        };
        sketchpad.restore_outcome = sketchpad.restore();
        Ok(sketchpad)
    }

    /// Replace the fonts used by the text tool.
    pub fn with_fonts(mut self, fonts: FontBook) -> Self {
        self.fonts = fonts;
        self
    }

    fn restore(&mut self) -> RestoreOutcome {
        let encoded = match self.store.load() {
            Ok(Some(encoded)) => encoded,
            Ok(None) => return RestoreOutcome::Fresh,
            Err(e) => {
                log::warn!("Failed to read saved canvas: {}", e);
                return RestoreOutcome::Discarded(e.to_string());
            }
        };
        match from_data_url(&encoded) {
            Ok(pixmap) => {
                self.surface.restore(&Raster::new(pixmap));
                self.history.seed(self.surface.snapshot());
                log::info!("Restored saved canvas from '{}'", self.store.key());
                RestoreOutcome::Restored
            }
            Err(e) => {
                log::warn!("Saved canvas could not be decoded, starting blank: {}", e);
                RestoreOutcome::Discarded(e.to_string())
            }
        }
    }

    pub fn restore_outcome(&self) -> &RestoreOutcome {
        &self.restore_outcome
    }

    // --- Pointer input -----------------------------------------------------

    pub fn pointer_down(&mut self, position: Point, button: MouseButton) -> SketchResult<()> {
        self.handle_pointer(PointerEvent::Down { position, button })
    }

    pub fn pointer_move(&mut self, position: Point) -> SketchResult<()> {
        self.handle_pointer(PointerEvent::Move { position })
    }

    pub fn pointer_up(&mut self, position: Point, button: MouseButton) -> SketchResult<()> {
        self.handle_pointer(PointerEvent::Up { position, button })
    }

    pub fn pointer_leave(&mut self, position: Point) -> SketchResult<()> {
        self.handle_pointer(PointerEvent::Leave { position })
    }

    /// Process a pointer event in page coordinates.
    pub fn handle_pointer(&mut self, event: PointerEvent) -> SketchResult<()> {
        match self.input.handle_pointer_event(event) {
            Some(PointerAction::Begin(point)) => self.begin_gesture(point),
            Some(PointerAction::Move(point)) => self.drag_to(point),
            Some(PointerAction::End(_)) | Some(PointerAction::Leave(_)) => {
                self.finish_gesture()?;
            }
            None => {}
        }
        Ok(())
    }

    fn begin_gesture(&mut self, point: Point) {
        if !self.tools.begin(point) {
            return;
        }
        let Some(session) = self.tools.session() else {
            return;
        };
        log::debug!("Begin {} at {:?}", session.tool, point);

        match session.tool {
            ToolKind::Text => match self.text.toggle_at(point) {
                TextToggle::Opened(anchor) => log::debug!("Text entry opened at {:?}", anchor),
                TextToggle::Committed { anchor, text } => {
                    let font = session.style.font();
                    if self.fonts.resolve(&font.family).is_none() {
                        log::warn!("No font for '{}', text not drawn", font.family);
                    } else if let Err(e) = draw_text(
                        self.surface.preview_mut(),
                        &self.fonts,
                        anchor,
                        &text,
                        font,
                        session.style.stroke_color(),
                    ) {
                        log::warn!("Failed to draw text: {}", e);
                    }
                }
                TextToggle::Dismissed => log::debug!("Text entry dismissed"),
            },
            tool if tool.is_shape() => {
                // Zero-length stroke as immediate feedback.
                let opts = StrokeOptions::from_style(&session.style, session.seed);
                PixmapRenderer::new(self.surface.preview_mut()).dot(point, &opts);
            }
            _ => {}
        }
    }

    fn drag_to(&mut self, point: Point) {
        let Some(session) = self.tools.update(point) else {
            return;
        };
        if !session.tool.draws_on_drag() {
            return;
        }
        let Some(shape) = session.shape() else {
            return;
        };
        let opts = StrokeOptions::from_style(&session.style, session.seed);
        self.surface.clear_preview();
        draw_shape(&mut PixmapRenderer::new(self.surface.preview_mut()), &shape, &opts);
    }

    /// End the active gesture, committing whatever it drew.
    /// Returns whether a snapshot was committed.
    fn finish_gesture(&mut self) -> SketchResult<bool> {
        let Some(session) = self.tools.end() else {
            return Ok(false);
        };
        if !self.surface.merge_preview() {
            log::debug!("{} gesture drew nothing, no snapshot", session.tool);
            return Ok(false);
        }
        let snapshot = self.surface.snapshot();
        self.history.commit(snapshot.clone());
        log::debug!(
            "Committed snapshot {} of {}",
            self.history.cursor(),
            self.history.len()
        );
        self.persist(&snapshot)?;
        Ok(true)
    }

    /// Abandon an in-progress gesture without committing it.
    fn cancel_gesture(&mut self) {
        if self.tools.end().is_some() {
            self.surface.clear_preview();
        }
    }

    // --- Keyboard and event dispatch --------------------------------------

    /// Handle a key press: text entry first, then shortcuts.
    /// Returns whether the key was consumed.
    pub fn handle_key(&mut self, event: &KeyEvent) -> SketchResult<bool> {
        if self.text.is_open() && !event.modifiers.command() {
            match event.key.as_str() {
                "Backspace" => self.text.backspace(),
                "Escape" => self.text.cancel(),
                key if key.chars().count() == 1 => self.text.push_str(key),
                _ => return Ok(false),
            }
            return Ok(true);
        }

        match ShortcutRegistry::resolve(event) {
            Some(ShortcutAction::Undo) => {
                self.undo()?;
                Ok(true)
            }
            Some(ShortcutAction::Redo) => {
                self.redo()?;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Single entry point for recorded or forwarded events.
    pub fn handle_event(&mut self, event: &InputEvent) -> SketchResult<()> {
        if let Some(pointer) = event.as_pointer() {
            return self.handle_pointer(pointer);
        }
        match event {
            InputEvent::Key(key) => {
                self.handle_key(key)?;
            }
            InputEvent::Text { text } => self.text.push_str(text),
            InputEvent::Resize { width, height } => self.resize(*width, *height)?,
            _ => {}
        }
        Ok(())
    }

    // --- History -----------------------------------------------------------

    /// Step back one snapshot. Returns whether anything changed.
    ///
    /// Storage keeps the last committed canvas; moving through history does
    /// not rewrite it.
    pub fn undo(&mut self) -> SketchResult<bool> {
        self.cancel_gesture();
        match self.history.undo() {
            HistoryStep::Unchanged => return Ok(false),
            HistoryStep::Blank => self.surface.clear(),
            HistoryStep::Restore(raster) => self.surface.restore(raster),
        }
        log::debug!("Undo to {}", self.history.cursor());
        Ok(true)
    }

    /// Step forward one snapshot. Returns whether anything changed.
    pub fn redo(&mut self) -> SketchResult<bool> {
        self.cancel_gesture();
        match self.history.redo() {
            HistoryStep::Restore(raster) => self.surface.restore(raster),
            HistoryStep::Unchanged | HistoryStep::Blank => return Ok(false),
        }
        log::debug!("Redo to {}", self.history.cursor());
        Ok(true)
    }

    /// Drop all history, blank the canvas and reset the background.
    pub fn clear(&mut self) -> SketchResult<()> {
        self.cancel_gesture();
        self.text.cancel();
        self.history.clear();
        self.surface.clear();
        self.background = self.default_background;
        log::info!("Canvas cleared");
        self.persist(&self.surface.snapshot())
    }

    /// Write a raster to storage as a PNG data URL.
    fn persist(&self, raster: &Raster) -> SketchResult<()> {
        self.store.save(&to_data_url(raster.pixmap())?)?;
        Ok(())
    }

    pub fn history(&self) -> &History<Raster> {
        &self.history
    }

    // --- Toolbox ------------------------------------------------------------

    pub fn tool(&self) -> ToolKind {
        self.tools.current_tool
    }

    /// Select a tool. Leaving the text tool closes its overlay.
    pub fn set_tool(&mut self, tool: ToolKind) {
        if tool != ToolKind::Text {
            self.text.cancel();
        }
        self.tools.set_tool(tool);
    }

    pub fn tool_style(&self) -> &ToolStyle {
        &self.tools.style
    }

    /// Style for the next gesture. An active gesture keeps its own.
    pub fn set_tool_style(&mut self, style: ToolStyle) {
        self.tools.style = style;
    }

    pub fn background(&self) -> Color {
        self.background
    }

    pub fn set_background(&mut self, color: Color) {
        self.background = color;
    }

    pub fn text_entry(&self) -> &TextEntry {
        &self.text
    }

    pub fn text_entry_mut(&mut self) -> &mut TextEntry {
        &mut self.text
    }

    // --- Surface -----------------------------------------------------------

    pub fn is_drawing(&self) -> bool {
        self.tools.is_active()
    }

    /// Rounded canvas coordinates of the pointer.
    pub fn pointer_readout(&self) -> (i64, i64) {
        self.input.readout()
    }

    pub fn surface(&self) -> &Surface {
        &self.surface
    }

    /// Resize the canvas, keeping its content anchored top-left.
    pub fn resize(&mut self, width: u32, height: u32) -> SketchResult<()> {
        self.cancel_gesture();
        self.surface.resize(width, height)?;
        Ok(())
    }

    /// The frame to display: background, committed drawing and live preview.
    pub fn composite(&self) -> RenderResult<Pixmap> {
        self.surface.composite(self.background)
    }

    /// The committed drawing flattened onto the background, as a PNG.
    pub fn download(&self) -> SketchResult<Download> {
        let flat = self.surface.flatten(self.background)?;
        Ok(Download {
            file_name: DOWNLOAD_FILE_NAME,
            bytes: encode_png(&flat)?,
        })
    }
}
