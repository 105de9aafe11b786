use sketchpad_core::storage::StorageError;
use sketchpad_core::style::StyleError;
use sketchpad_render::RenderError;
use thiserror::Error;

/// Errors surfaced by the sketchpad session and its front ends.
#[derive(Debug, Error)]
pub enum SketchError {
    #[error(transparent)]
    Storage(#[from] StorageError),
    #[error(transparent)]
    Style(#[from] StyleError),
    #[error(transparent)]
    Render(#[from] RenderError),
    #[error("Config error: {0}")]
    Config(String),
    #[error("Script error: {0}")]
    Script(String),
    #[error("IO error: {0}")]
    Io(String),
}

pub type SketchResult<T> = Result<T, SketchError>;
