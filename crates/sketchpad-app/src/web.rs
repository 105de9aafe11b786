//! WebAssembly entry point and browser bindings.

use crate::app::AppConfig;
use crate::sketchpad::Sketchpad;
use kurbo::Point;
use serde::de::DeserializeOwned;
use sketchpad_core::input::{KeyEvent, Modifiers, MouseButton};
use sketchpad_core::storage::LocalStorage;
use sketchpad_core::style::{Color, FontSpec, ToolStyle};
use sketchpad_core::tools::ToolKind;
use std::sync::Arc;
use wasm_bindgen::prelude::*;

/// Initialize panic reporting and logging.
#[wasm_bindgen(start)]
pub fn run_wasm() {
    console_error_panic_hook::set_once();

    console_log::init_with_level(log::Level::Info).expect("Failed to initialize logger");
    log::info!("Starting Sketchpad (WASM)");
}

fn js_err(e: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&e.to_string())
}

/// Parse a lowercase enum name such as `"small"` or `"italic"`.
fn parse_named<T: DeserializeOwned>(name: &str) -> Result<T, JsValue> {
    serde_json::from_value(serde_json::Value::String(name.to_string())).map_err(js_err)
}

/// The drawing session as seen from JavaScript. Coordinates are page
/// coordinates; the configured origin maps them onto the canvas.
#[wasm_bindgen]
pub struct WebSketchpad {
    inner: Sketchpad<LocalStorage>,
}

#[wasm_bindgen]
impl WebSketchpad {
    /// Create a session restoring `canvasState` from `localStorage`.
    /// `config_json` is an optional JSON `AppConfig`.
    #[wasm_bindgen(constructor)]
    pub fn new(config_json: Option<String>) -> Result<WebSketchpad, JsValue> {
        let config = match config_json {
            Some(json) => AppConfig::from_json(&json).map_err(js_err)?,
            None => AppConfig::default(),
        };
        let storage = LocalStorage::new().map_err(js_err)?;
        let inner = Sketchpad::new(&config, Arc::new(storage)).map_err(js_err)?;
        Ok(Self { inner })
    }

    pub fn pointer_down(&mut self, x: f64, y: f64) -> Result<(), JsValue> {
        self.inner
            .pointer_down(Point::new(x, y), MouseButton::Left)
            .map_err(js_err)
    }

    pub fn pointer_move(&mut self, x: f64, y: f64) -> Result<(), JsValue> {
        self.inner.pointer_move(Point::new(x, y)).map_err(js_err)
    }

    pub fn pointer_up(&mut self, x: f64, y: f64) -> Result<(), JsValue> {
        self.inner
            .pointer_up(Point::new(x, y), MouseButton::Left)
            .map_err(js_err)
    }

    pub fn pointer_leave(&mut self, x: f64, y: f64) -> Result<(), JsValue> {
        self.inner.pointer_leave(Point::new(x, y)).map_err(js_err)
    }

    /// Returns true when the key was consumed and the default should be prevented.
    pub fn key_down(
        &mut self,
        key: String,
        ctrl: bool,
        shift: bool,
        alt: bool,
        meta: bool,
    ) -> Result<bool, JsValue> {
        let modifiers = Modifiers {
            shift,
            ctrl,
            alt,
            meta,
        };
        self.inner
            .handle_key(&KeyEvent::new(key, modifiers))
            .map_err(js_err)
    }

    /// Contents of the text overlay, if open.
    pub fn text_entry(&self) -> Option<String> {
        self.inner.text_entry().text().map(str::to_string)
    }

    pub fn set_text(&mut self, text: String) {
        self.inner.text_entry_mut().set_text(text);
    }

    pub fn set_tool(&mut self, name: &str) -> Result<(), JsValue> {
        let tool: ToolKind = name.parse().map_err(|e: String| JsValue::from_str(&e))?;
        self.inner.set_tool(tool);
        Ok(())
    }

    pub fn tool(&self) -> String {
        self.inner.tool().name().to_string()
    }

    pub fn set_stroke_color(&mut self, hex: &str) -> Result<(), JsValue> {
        let color = Color::from_hex(hex).map_err(js_err)?;
        self.update_style(|style| Ok(style.with_stroke_color(color)))
    }

    pub fn set_fill_color(&mut self, hex: &str) -> Result<(), JsValue> {
        let color = Color::from_hex(hex).map_err(js_err)?;
        self.update_style(|style| Ok(style.with_fill_color(color)))
    }

    pub fn set_fill_opacity(&mut self, opacity: f64) -> Result<(), JsValue> {
        self.update_style(|style| style.with_fill_opacity(opacity).map_err(js_err))
    }

    pub fn set_filled(&mut self, filled: bool) -> Result<(), JsValue> {
        self.update_style(|style| Ok(style.with_filled(filled)))
    }

    pub fn set_stroke_width(&mut self, width: f64) -> Result<(), JsValue> {
        self.update_style(|style| style.with_stroke_width(width).map_err(js_err))
    }

    pub fn set_dash(&mut self, name: &str) -> Result<(), JsValue> {
        let dash = parse_named(name)?;
        self.update_style(|style| Ok(style.with_dash(dash)))
    }

    pub fn set_line_join(&mut self, name: &str) -> Result<(), JsValue> {
        let join = parse_named(name)?;
        self.update_style(|style| Ok(style.with_line_join(join)))
    }

    pub fn set_roughness(&mut self, roughness: f64) -> Result<(), JsValue> {
        self.update_style(|style| style.with_roughness(roughness).map_err(js_err))
    }

    pub fn set_font(&mut self, size_rem: f64, style_name: &str, family: String) -> Result<(), JsValue> {
        let font = FontSpec {
            size_rem,
            style: parse_named(style_name)?,
            family,
        };
        self.update_style(|style| style.with_font(font).map_err(js_err))
    }

    pub fn set_background(&mut self, hex: &str) -> Result<(), JsValue> {
        self.inner.set_background(Color::from_hex(hex).map_err(js_err)?);
        Ok(())
    }

    pub fn undo(&mut self) -> Result<bool, JsValue> {
        self.inner.undo().map_err(js_err)
    }

    pub fn redo(&mut self) -> Result<bool, JsValue> {
        self.inner.redo().map_err(js_err)
    }

    pub fn clear(&mut self) -> Result<(), JsValue> {
        self.inner.clear().map_err(js_err)
    }

    pub fn resize(&mut self, width: u32, height: u32) -> Result<(), JsValue> {
        self.inner.resize(width, height).map_err(js_err)
    }

    /// Rounded pointer position as `[x, y]`.
    pub fn pointer_readout(&self) -> Vec<f64> {
        let (x, y) = self.inner.pointer_readout();
        vec![x as f64, y as f64]
    }

    pub fn width(&self) -> u32 {
        self.inner.surface().width()
    }

    pub fn height(&self) -> u32 {
        self.inner.surface().height()
    }

    /// Straight-alpha RGBA of the current frame, for `ImageData`.
    pub fn frame_rgba(&self) -> Result<Vec<u8>, JsValue> {
        let frame = self.inner.composite().map_err(js_err)?;
        let mut rgba = Vec::with_capacity(frame.data().len());
        for pixel in frame.pixels() {
            let c = pixel.demultiply();
            rgba.extend_from_slice(&[c.red(), c.green(), c.blue(), c.alpha()]);
        }
        Ok(rgba)
    }

    /// PNG data URL for an `<a download>` link.
    pub fn download_data_url(&self) -> Result<String, JsValue> {
        let flat = self
            .inner
            .surface()
            .flatten(self.inner.background())
            .map_err(js_err)?;
        sketchpad_render::to_data_url(&flat).map_err(js_err)
    }

    pub fn download_file_name(&self) -> String {
        crate::sketchpad::DOWNLOAD_FILE_NAME.to_string()
    }
}

impl WebSketchpad {
    fn update_style(
        &mut self,
        f: impl FnOnce(&ToolStyle) -> Result<ToolStyle, JsValue>,
    ) -> Result<(), JsValue> {
        let style = f(self.inner.tool_style())?;
        self.inner.set_tool_style(style);
        Ok(())
    }
}
