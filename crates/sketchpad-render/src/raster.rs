//! Raster snapshots and the two-layer drawing surface.

use crate::error::{RenderError, RenderResult};
use sketchpad_core::style::Color;
use std::fmt;
use std::sync::Arc;
use tiny_skia::{Pixmap, PixmapPaint, Transform};

/// Create a transparent pixmap, rejecting zero dimensions.
pub(crate) fn new_pixmap(width: u32, height: u32) -> RenderResult<Pixmap> {
    Pixmap::new(width, height).ok_or(RenderError::InvalidSize { width, height })
}

pub(crate) fn to_skia_color(color: Color) -> tiny_skia::Color {
    tiny_skia::Color::from_rgba8(color.r, color.g, color.b, color.a)
}

/// An immutable full-canvas pixel capture. Cheap to clone.
#[derive(Clone)]
pub struct Raster(Arc<Pixmap>);

impl Raster {
    pub fn new(pixmap: Pixmap) -> Self {
        Self(Arc::new(pixmap))
    }

    pub fn width(&self) -> u32 {
        self.0.width()
    }

    pub fn height(&self) -> u32 {
        self.0.height()
    }

    pub fn pixmap(&self) -> &Pixmap {
        &self.0
    }

    /// Premultiplied RGBA bytes.
    pub fn data(&self) -> &[u8] {
        self.0.data()
    }

    /// Whether two handles share the same allocation.
    pub fn ptr_eq(&self, other: &Raster) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl PartialEq for Raster {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other)
            || (self.width() == other.width()
                && self.height() == other.height()
                && self.data() == other.data())
    }
}

impl Eq for Raster {}

impl fmt::Debug for Raster {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Raster")
            .field("width", &self.width())
            .field("height", &self.height())
            .finish()
    }
}

/// Drawing surface made of a committed layer and a preview layer on top.
///
/// Live previews are drawn on the preview layer only, so redrawing a preview
/// never touches committed pixels.
pub struct Surface {
    committed: Pixmap,
    preview: Pixmap,
    preview_dirty: bool,
}

impl Surface {
    pub fn new(width: u32, height: u32) -> RenderResult<Self> {
        Ok(Self {
            committed: new_pixmap(width, height)?,
            preview: new_pixmap(width, height)?,
            preview_dirty: false,
        })
    }

    pub fn width(&self) -> u32 {
        self.committed.width()
    }

    pub fn height(&self) -> u32 {
        self.committed.height()
    }

    pub fn committed(&self) -> &Pixmap {
        &self.committed
    }

    pub fn preview(&self) -> &Pixmap {
        &self.preview
    }

    /// Mutable access to the preview layer for drawing.
    pub fn preview_mut(&mut self) -> &mut Pixmap {
        self.preview_dirty = true;
        &mut self.preview
    }

    /// Whether anything was drawn on the preview layer since it was cleared.
    pub fn has_preview(&self) -> bool {
        self.preview_dirty
    }

    /// Capture the committed layer.
    pub fn snapshot(&self) -> Raster {
        Raster::new(self.committed.clone())
    }

    /// Replace the committed layer with a snapshot, anchored top-left.
    ///
    /// A snapshot of a different size is cropped or padded with transparency.
    pub fn restore(&mut self, raster: &Raster) {
        self.clear();
        self.committed.draw_pixmap(
            0,
            0,
            raster.pixmap().as_ref(),
            &PixmapPaint::default(),
            Transform::identity(),
            None,
        );
    }

    /// Clear both layers.
    pub fn clear(&mut self) {
        self.committed.fill(tiny_skia::Color::TRANSPARENT);
        self.clear_preview();
    }

    pub fn clear_preview(&mut self) {
        if self.preview_dirty {
            self.preview.fill(tiny_skia::Color::TRANSPARENT);
            self.preview_dirty = false;
        }
    }

    /// Composite the preview onto the committed layer and clear it.
    /// Returns whether anything was merged.
    pub fn merge_preview(&mut self) -> bool {
        if !self.preview_dirty {
            return false;
        }
        self.committed.draw_pixmap(
            0,
            0,
            self.preview.as_ref(),
            &PixmapPaint::default(),
            Transform::identity(),
            None,
        );
        self.clear_preview();
        true
    }

    /// Resize both layers, keeping committed content anchored top-left.
    pub fn resize(&mut self, width: u32, height: u32) -> RenderResult<()> {
        if width == self.width() && height == self.height() {
            return Ok(());
        }
        let mut committed = new_pixmap(width, height)?;
        committed.draw_pixmap(
            0,
            0,
            self.committed.as_ref(),
            &PixmapPaint::default(),
            Transform::identity(),
            None,
        );
        self.committed = committed;
        self.preview = new_pixmap(width, height)?;
        self.preview_dirty = false;
        log::debug!("Surface resized to {}x{}", width, height);
        Ok(())
    }

    /// Committed layer flattened onto an opaque background.
    pub fn flatten(&self, background: Color) -> RenderResult<Pixmap> {
        let mut out = new_pixmap(self.width(), self.height())?;
        out.fill(to_skia_color(background));
        out.draw_pixmap(
            0,
            0,
            self.committed.as_ref(),
            &PixmapPaint::default(),
            Transform::identity(),
            None,
        );
        Ok(out)
    }

    /// What the user sees: background, committed layer, then preview.
    pub fn composite(&self, background: Color) -> RenderResult<Pixmap> {
        let mut out = self.flatten(background)?;
        if self.preview_dirty {
            out.draw_pixmap(
                0,
                0,
                self.preview.as_ref(),
                &PixmapPaint::default(),
                Transform::identity(),
                None,
            );
        }
        Ok(out)
    }
}
