//! Sketchpad Render Library
//!
//! CPU rendering for Sketchpad: a two-layer raster surface, hand-drawn
//! strokes over tiny-skia, text rasterization and PNG / data-URL encoding.

pub mod codec;
mod error;
mod raster;
mod renderer;
pub mod rough;
pub mod text;

pub use codec::{PNG_DATA_URL_PREFIX, decode_image, encode_png, from_data_url, to_data_url};
pub use error::{RenderError, RenderResult};
pub use raster::{Raster, Surface};
pub use renderer::{PixmapRenderer, SketchRenderer, StrokeOptions, draw_shape};
pub use text::{FontBook, draw_text};

pub use tiny_skia::Pixmap;
