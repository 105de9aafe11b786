//! Application configuration.

use crate::error::{SketchError, SketchResult};
use serde::{Deserialize, Serialize};
use sketchpad_core::input::CanvasOrigin;
use sketchpad_core::style::Color;
use sketchpad_render::FontBook;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Application configuration, loadable from a JSON file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub title: String,
    /// Canvas width in pixels.
    pub width: u32,
    /// Canvas height in pixels.
    pub height: u32,
    /// Page position of the canvas's top-left corner.
    pub origin: CanvasOrigin,
    /// Background the canvas starts with and returns to on clear.
    pub background: Color,
    /// Directory for the persisted canvas. Platform data dir when unset.
    pub storage_dir: Option<PathBuf>,
    /// Font files by family name, for the text tool.
    pub fonts: BTreeMap<String, PathBuf>,
    /// Family used when the requested one has no font.
    pub fallback_font: Option<String>,
    /// Maximum undo snapshots kept. Unbounded when unset.
    pub history_limit: Option<usize>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            title: "Sketchpad".to_string(),
            width: 1230,
            height: 700,
            origin: CanvasOrigin::default(),
            background: Color::WHITE,
            storage_dir: None,
            fonts: BTreeMap::new(),
            fallback_font: None,
            history_limit: None,
        }
    }
}

impl AppConfig {
    /// Load from a JSON file. Missing fields take their defaults.
    pub fn load(path: &Path) -> SketchResult<Self> {
        let json = std::fs::read_to_string(path).map_err(|e| {
            SketchError::Config(format!("Failed to read {}: {}", path.display(), e))
        })?;
        Self::from_json(&json)
            .map_err(|e| SketchError::Config(format!("Failed to parse {}: {}", path.display(), e)))
    }

    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Load the configured fonts. Fonts that fail to load are skipped with a warning.
    pub fn load_fonts(&self) -> FontBook {
        let mut book = FontBook::new();
        for (family, path) in &self.fonts {
            if let Err(e) = book.load(family, path) {
                log::warn!("Skipping font '{}': {}", family, e);
            }
        }
        if let Some(fallback) = &self.fallback_font {
            if !book.set_fallback(fallback) {
                log::warn!("Fallback font '{}' is not loaded", fallback);
            }
        }
        book
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();
        assert_eq!((config.width, config.height), (1230, 700));
        assert_eq!(config.origin, CanvasOrigin::new(25.0, 82.0));
        assert_eq!(config.background, Color::WHITE);
        assert!(config.history_limit.is_none());
    }

    #[test]
    fn test_partial_json() {
        let config = AppConfig::from_json(
            r##"{"width": 300, "background": "#fafafa", "history_limit": 20}"##,
        )
        .unwrap();
        assert_eq!(config.width, 300);
        assert_eq!(config.height, 700);
        assert_eq!(config.background, Color::rgb(250, 250, 250));
        assert_eq!(config.history_limit, Some(20));
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, r#"{"title": "Board", "origin": {"x": 0, "y": 0}}"#).unwrap();

        let config = AppConfig::load(&path).unwrap();
        assert_eq!(config.title, "Board");
        assert_eq!(config.origin, CanvasOrigin::new(0.0, 0.0));
    }

    #[test]
    fn test_load_errors() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            AppConfig::load(&dir.path().join("missing.json")),
            Err(SketchError::Config(_))
        ));

        let path = dir.path().join("bad.json");
        std::fs::write(&path, "{ not json").unwrap();
        assert!(matches!(AppConfig::load(&path), Err(SketchError::Config(_))));
    }

    #[test]
    fn test_unloadable_fonts_are_skipped() {
        let mut config = AppConfig::default();
        config
            .fonts
            .insert("cursive".to_string(), PathBuf::from("/no/such/font.ttf"));
        config.fallback_font = Some("cursive".to_string());
        assert!(config.load_fonts().is_empty());
    }
}
