//! Sketchpad Application
//!
//! The drawing session tying input, tools, rendering, history and
//! persistence together, with a headless replay CLI and WASM bindings.

mod app;
mod error;
mod script;
mod shortcuts;
mod sketchpad;

#[cfg(feature = "native")]
pub mod cli;

pub use app::AppConfig;
pub use error::{SketchError, SketchResult};
pub use script::{ScriptStep, ToolboxAction, parse_script};
pub use shortcuts::{Shortcut, ShortcutAction, ShortcutRegistry};
pub use sketchpad::{DOWNLOAD_FILE_NAME, Download, RestoreOutcome, Sketchpad};

#[cfg(target_arch = "wasm32")]
mod web;

#[cfg(target_arch = "wasm32")]
pub use web::{WebSketchpad, run_wasm};
