//! Tool style: colors, stroke, fill and font parameters.
//!
//! `ToolStyle` is an immutable value. Every setter is a `with_*` method that
//! validates its input and returns a new copy, so a style captured by a drag
//! session can never change underneath it.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Highest accepted roughness value.
pub const MAX_ROUGHNESS: f64 = 10.0;

/// CSS pixels per `rem` used for font sizes.
pub const PX_PER_REM: f64 = 16.0;

/// Style validation errors.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum StyleError {
    #[error("Stroke width must be positive and finite, got {0}")]
    InvalidWidth(f64),
    #[error("Opacity must be within [0, 1], got {0}")]
    InvalidOpacity(f64),
    #[error("Roughness must be within [0, 10], got {0}")]
    InvalidRoughness(f64),
    #[error("Font size must be positive and finite, got {0}")]
    InvalidFontSize(f64),
    #[error("Invalid color: {0}")]
    InvalidColor(String),
}

/// RGBA8 color, serialized as a `#rrggbbaa` hex string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const BLACK: Color = Color::new(0, 0, 0, 255);
    pub const WHITE: Color = Color::new(255, 255, 255, 255);
    pub const TRANSPARENT: Color = Color::new(0, 0, 0, 0);

    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self::new(r, g, b, 255)
    }

    /// Parse `#rgb`, `#rrggbb` or `#rrggbbaa`.
    pub fn from_hex(hex: &str) -> Result<Self, StyleError> {
        let invalid = || StyleError::InvalidColor(hex.to_string());
        let digits = hex.trim().strip_prefix('#').ok_or_else(invalid)?;
        if !digits.is_ascii() {
            return Err(invalid());
        }
        let byte = |s: &str| u8::from_str_radix(s, 16).map_err(|_| invalid());

        match digits.len() {
            3 => {
                let r = byte(&digits[0..1])? * 17;
                let g = byte(&digits[1..2])? * 17;
                let b = byte(&digits[2..3])? * 17;
                Ok(Self::rgb(r, g, b))
            }
            6 => Ok(Self::rgb(
                byte(&digits[0..2])?,
                byte(&digits[2..4])?,
                byte(&digits[4..6])?,
            )),
            8 => Ok(Self::new(
                byte(&digits[0..2])?,
                byte(&digits[2..4])?,
                byte(&digits[4..6])?,
                byte(&digits[6..8])?,
            )),
            _ => Err(invalid()),
        }
    }

    /// Format as `#rrggbb`, or `#rrggbbaa` when not fully opaque.
    pub fn to_hex(&self) -> String {
        if self.a == 255 {
            format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
        } else {
            format!("#{:02x}{:02x}{:02x}{:02x}", self.r, self.g, self.b, self.a)
        }
    }

    /// Scale the alpha channel by `opacity` (clamped to [0, 1]).
    pub fn with_opacity(&self, opacity: f64) -> Self {
        let alpha = (self.a as f64 * opacity.clamp(0.0, 1.0)).round() as u8;
        Self { a: alpha, ..*self }
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::BLACK
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl FromStr for Color {
    type Err = StyleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_hex(s)
    }
}

impl TryFrom<String> for Color {
    type Error = StyleError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::from_hex(&value)
    }
}

impl From<Color> for String {
    fn from(color: Color) -> Self {
        color.to_hex()
    }
}

impl From<peniko::Color> for Color {
    fn from(color: peniko::Color) -> Self {
        let rgba = color.to_rgba8();
        Self::new(rgba.r, rgba.g, rgba.b, rgba.a)
    }
}

impl From<Color> for peniko::Color {
    fn from(color: Color) -> Self {
        peniko::Color::from_rgba8(color.r, color.g, color.b, color.a)
    }
}

/// Coarse/fine dash selector for strokes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DashStyle {
    /// Continuous stroke.
    #[default]
    None,
    /// Short gaps.
    Small,
    /// Long gaps.
    Big,
}

impl DashStyle {
    /// Dash pattern `[dash, gap]` for a given stroke width, or `None` for solid.
    pub fn pattern(&self, width: f64) -> Option<[f64; 2]> {
        match self {
            DashStyle::None => None,
            DashStyle::Small => Some([5.0, width + 3.0]),
            DashStyle::Big => Some([5.0, width + 10.0]),
        }
    }

    /// Cycle to the next dash style.
    pub fn next(self) -> Self {
        match self {
            DashStyle::None => DashStyle::Small,
            DashStyle::Small => DashStyle::Big,
            DashStyle::Big => DashStyle::None,
        }
    }
}

/// Corner style where stroke segments meet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LineJoin {
    #[default]
    Round,
    Bevel,
    Miter,
}

/// Font face style for the text tool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FontStyle {
    #[default]
    Normal,
    Italic,
    Bold,
}

/// Font parameters for the text tool.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FontSpec {
    /// Size in `rem` units.
    pub size_rem: f64,
    pub style: FontStyle,
    /// Family name, resolved against the configured font book.
    pub family: String,
}

impl FontSpec {
    /// Font size in pixels.
    pub fn size_px(&self) -> f64 {
        self.size_rem * PX_PER_REM
    }
}

impl Default for FontSpec {
    fn default() -> Self {
        Self {
            size_rem: 1.0,
            style: FontStyle::Normal,
            family: "cursive".to_string(),
        }
    }
}

/// Style parameters applied to everything the tools draw.
///
/// Deserialized values go through the same range checks as the setters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawToolStyle")]
pub struct ToolStyle {
    stroke_color: Color,
    fill_color: Color,
    fill_opacity: f64,
    filled: bool,
    stroke_width: f64,
    dash: DashStyle,
    line_join: LineJoin,
    roughness: f64,
    font: FontSpec,
}

impl Default for ToolStyle {
    fn default() -> Self {
        Self {
            stroke_color: Color::BLACK,
            fill_color: Color::WHITE,
            fill_opacity: 0.3,
            filled: false,
            stroke_width: 1.0,
            dash: DashStyle::None,
            line_join: LineJoin::Round,
            roughness: 0.0,
            font: FontSpec::default(),
        }
    }
}

/// Unvalidated serialized form of `ToolStyle`; missing fields take defaults.
#[derive(Deserialize)]
#[serde(default)]
struct RawToolStyle {
    stroke_color: Color,
    fill_color: Color,
    fill_opacity: f64,
    filled: bool,
    stroke_width: f64,
    dash: DashStyle,
    line_join: LineJoin,
    roughness: f64,
    font: FontSpec,
}

impl Default for RawToolStyle {
    fn default() -> Self {
        let style = ToolStyle::default();
        Self {
            stroke_color: style.stroke_color,
            fill_color: style.fill_color,
            fill_opacity: style.fill_opacity,
            filled: style.filled,
            stroke_width: style.stroke_width,
            dash: style.dash,
            line_join: style.line_join,
            roughness: style.roughness,
            font: style.font,
        }
    }
}

impl TryFrom<RawToolStyle> for ToolStyle {
    type Error = StyleError;

    fn try_from(raw: RawToolStyle) -> Result<Self, Self::Error> {
        ToolStyle::default()
            .with_stroke_color(raw.stroke_color)
            .with_fill_color(raw.fill_color)
            .with_filled(raw.filled)
            .with_dash(raw.dash)
            .with_line_join(raw.line_join)
            .with_fill_opacity(raw.fill_opacity)?
            .with_stroke_width(raw.stroke_width)?
            .with_roughness(raw.roughness)?
            .with_font(raw.font)
    }
}

impl ToolStyle {
    pub fn stroke_color(&self) -> Color {
        self.stroke_color
    }

    pub fn fill_color(&self) -> Color {
        self.fill_color
    }

    pub fn fill_opacity(&self) -> f64 {
        self.fill_opacity
    }

    pub fn filled(&self) -> bool {
        self.filled
    }

    pub fn stroke_width(&self) -> f64 {
        self.stroke_width
    }

    pub fn dash(&self) -> DashStyle {
        self.dash
    }

    pub fn line_join(&self) -> LineJoin {
        self.line_join
    }

    pub fn roughness(&self) -> f64 {
        self.roughness
    }

    pub fn font(&self) -> &FontSpec {
        &self.font
    }

    /// Fill color with fill opacity applied, when filling is enabled.
    pub fn effective_fill(&self) -> Option<Color> {
        self.filled.then(|| self.fill_color.with_opacity(self.fill_opacity))
    }

    /// Dash pattern for the current width and dash style.
    pub fn dash_pattern(&self) -> Option<[f64; 2]> {
        self.dash.pattern(self.stroke_width)
    }

    pub fn with_stroke_color(&self, color: Color) -> Self {
        Self {
            stroke_color: color,
            ..self.clone()
        }
    }

    pub fn with_fill_color(&self, color: Color) -> Self {
        Self {
            fill_color: color,
            ..self.clone()
        }
    }

    pub fn with_fill_opacity(&self, opacity: f64) -> Result<Self, StyleError> {
        if !(0.0..=1.0).contains(&opacity) {
            return Err(StyleError::InvalidOpacity(opacity));
        }
        Ok(Self {
            fill_opacity: opacity,
            ..self.clone()
        })
    }

    pub fn with_filled(&self, filled: bool) -> Self {
        Self {
            filled,
            ..self.clone()
        }
    }

    pub fn with_stroke_width(&self, width: f64) -> Result<Self, StyleError> {
        if !width.is_finite() || width <= 0.0 {
            return Err(StyleError::InvalidWidth(width));
        }
        Ok(Self {
            stroke_width: width,
            ..self.clone()
        })
    }

    pub fn with_dash(&self, dash: DashStyle) -> Self {
        Self {
            dash,
            ..self.clone()
        }
    }

    pub fn with_line_join(&self, line_join: LineJoin) -> Self {
        Self {
            line_join,
            ..self.clone()
        }
    }

    pub fn with_roughness(&self, roughness: f64) -> Result<Self, StyleError> {
        if !(0.0..=MAX_ROUGHNESS).contains(&roughness) {
            return Err(StyleError::InvalidRoughness(roughness));
        }
        Ok(Self {
            roughness,
            ..self.clone()
        })
    }

    pub fn with_font(&self, font: FontSpec) -> Result<Self, StyleError> {
        if !font.size_rem.is_finite() || font.size_rem <= 0.0 {
            return Err(StyleError::InvalidFontSize(font.size_rem));
        }
        Ok(Self {
            font,
            ..self.clone()
        })
    }
}
