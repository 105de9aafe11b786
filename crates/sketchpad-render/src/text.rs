//! Text rasterization for the text tool.

use crate::error::{RenderError, RenderResult};
use crate::raster::new_pixmap;
use ab_glyph::{Font, FontArc, PxScale, ScaleFont, point};
use kurbo::Point;
use sketchpad_core::style::{Color, FontSpec, FontStyle};
use std::collections::HashMap;
use std::path::Path;
use tiny_skia::{Pixmap, PixmapPaint, PremultipliedColorU8, Transform};

/// Horizontal shear applied per pixel above the baseline for italics.
const ITALIC_SHEAR: f32 = 0.2;

/// Fonts by family name, with an optional fallback.
#[derive(Default, Clone)]
pub struct FontBook {
    families: HashMap<String, FontArc>,
    fallback: Option<FontArc>,
}

impl FontBook {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a font from raw TTF/OTF bytes.
    pub fn insert_bytes(&mut self, family: &str, bytes: Vec<u8>) -> RenderResult<()> {
        let font = FontArc::try_from_vec(bytes)
            .map_err(|e| RenderError::Font(format!("{family}: {e}")))?;
        if self.fallback.is_none() {
            self.fallback = Some(font.clone());
        }
        self.families.insert(family.to_string(), font);
        Ok(())
    }

    /// Register a font file.
    pub fn load(&mut self, family: &str, path: &Path) -> RenderResult<()> {
        let bytes = std::fs::read(path)
            .map_err(|e| RenderError::Font(format!("Failed to read {}: {}", path.display(), e)))?;
        self.insert_bytes(family, bytes)?;
        log::debug!("Loaded font '{}' from {}", family, path.display());
        Ok(())
    }

    /// Font used for families that were never registered.
    pub fn set_fallback(&mut self, family: &str) -> bool {
        match self.families.get(family) {
            Some(font) => {
                self.fallback = Some(font.clone());
                true
            }
            None => false,
        }
    }

    pub fn resolve(&self, family: &str) -> Option<&FontArc> {
        self.families.get(family).or(self.fallback.as_ref())
    }

    pub fn is_empty(&self) -> bool {
        self.families.is_empty()
    }
}

/// Pixel scale whose em size is `px`.
fn em_scale(font: &FontArc, px: f32) -> PxScale {
    let units_per_em = font.units_per_em().unwrap_or(1000.0);
    PxScale::from(px * font.height_unscaled() / units_per_em)
}

/// Draw `text` with its top-left corner at `anchor`. Lines are split on `\n`.
///
/// Returns `false` when nothing could be drawn (no font for the family).
pub fn draw_text(
    pixmap: &mut Pixmap,
    fonts: &FontBook,
    anchor: Point,
    text: &str,
    font_spec: &FontSpec,
    color: Color,
) -> RenderResult<bool> {
    let Some(font) = fonts.resolve(&font_spec.family) else {
        log::warn!("No font available for '{}', skipping text", font_spec.family);
        return Ok(false);
    };

    let scale = em_scale(font, font_spec.size_px() as f32);
    let scaled = font.as_scaled(scale);
    let line_height = scaled.height() + scaled.line_gap();
    let italic = font_spec.style == FontStyle::Italic;
    let bold = font_spec.style == FontStyle::Bold;

    let (width, height) = (pixmap.width(), pixmap.height());
    let mut coverage = vec![0.0f32; width as usize * height as usize];
    let mut plot = |x: i32, y: i32, cov: f32| {
        if x >= 0 && y >= 0 && (x as u32) < width && (y as u32) < height {
            let idx = y as usize * width as usize + x as usize;
            coverage[idx] = coverage[idx].max(cov);
        }
    };

    for (line_idx, line) in text.lines().enumerate() {
        let baseline = anchor.y as f32 + scaled.ascent() + line_idx as f32 * line_height;
        let mut caret = anchor.x as f32;
        let mut previous = None;

        for c in line.chars() {
            let glyph_id = font.glyph_id(c);
            if let Some(prev) = previous {
                caret += scaled.kern(prev, glyph_id);
            }
            previous = Some(glyph_id);

            let glyph = glyph_id.with_scale_and_position(scale, point(caret, baseline));
            caret += scaled.h_advance(glyph_id);

            let Some(outlined) = font.outline_glyph(glyph) else {
                continue;
            };
            let bounds = outlined.px_bounds();
            outlined.draw(|gx, gy, cov| {
                let y = bounds.min.y + gy as f32;
                let mut x = bounds.min.x + gx as f32;
                if italic {
                    x += (baseline - y) * ITALIC_SHEAR;
                }
                let (ix, iy) = (x.round() as i32, y as i32);
                plot(ix, iy, cov);
                if bold {
                    plot(ix + 1, iy, cov);
                }
            });
        }
    }

    let mut layer = new_pixmap(width, height)?;
    for (pixel, &cov) in layer.pixels_mut().iter_mut().zip(&coverage) {
        if cov <= 0.001 {
            continue;
        }
        let alpha = (color.a as f32 * cov.min(1.0)).round() as u8;
        let premul = |channel: u8| ((channel as u16 * alpha as u16 + 127) / 255) as u8;
        if let Some(px) = PremultipliedColorU8::from_rgba(
            premul(color.r),
            premul(color.g),
            premul(color.b),
            alpha,
        ) {
            *pixel = px;
        }
    }

    pixmap.draw_pixmap(
        0,
        0,
        layer.as_ref(),
        &PixmapPaint::default(),
        Transform::identity(),
        None,
    );
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;

    const DEJAVU_SANS: &[u8] = include_bytes!("../tests/fixtures/DejaVuSans.ttf");

    fn book() -> FontBook {
        let mut book = FontBook::new();
        book.insert_bytes("sans", DEJAVU_SANS.to_vec()).unwrap();
        book
    }

    fn sans_2rem(style: FontStyle) -> FontSpec {
        FontSpec {
            size_rem: 2.0,
            style,
            family: "sans".to_string(),
        }
    }

    fn render(text: &str, style: FontStyle) -> Pixmap {
        let mut pixmap = Pixmap::new(120, 100).unwrap();
        let drawn = draw_text(
            &mut pixmap,
            &book(),
            Point::new(10.0, 10.0),
            text,
            &sans_2rem(style),
            Color::rgb(255, 0, 0),
        )
        .unwrap();
        assert!(drawn);
        pixmap
    }

    /// (x, y, alpha) of every inked pixel.
    fn inked(pixmap: &Pixmap) -> Vec<(u32, u32, u8)> {
        let width = pixmap.width();
        pixmap
            .pixels()
            .iter()
            .enumerate()
            .filter(|(_, px)| px.alpha() > 0)
            .map(|(i, px)| (i as u32 % width, i as u32 / width, px.alpha()))
            .collect()
    }

    #[test]
    fn test_glyphs_sit_on_baseline_below_anchor() {
        let pixmap = render("H", FontStyle::Normal);
        let ink = inked(&pixmap);
        assert!(!ink.is_empty());
        assert!(ink.iter().all(|&(x, y, _)| x >= 10 && y >= 10));

        let font = book().resolve("sans").unwrap().clone();
        let ascent = font.as_scaled(em_scale(&font, 32.0)).ascent();
        let baseline = 10.0 + ascent;
        let bottom = ink.iter().map(|&(_, y, _)| y).max().unwrap() as f32 + 1.0;
        assert!((bottom - baseline).abs() <= 1.0, "bottom {bottom}, baseline {baseline}");
    }

    #[test]
    fn test_solid_pixels_use_text_color() {
        let pixmap = render("H", FontStyle::Normal);
        let solid = pixmap
            .pixels()
            .iter()
            .find(|px| px.alpha() == 255)
            .expect("a fully covered stem pixel")
            .demultiply();
        assert_eq!((solid.red(), solid.green(), solid.blue()), (255, 0, 0));
    }

    #[test]
    fn test_bold_adds_coverage() {
        let normal = inked(&render("Hi", FontStyle::Normal));
        let bold = inked(&render("Hi", FontStyle::Bold));
        assert!(bold.len() > normal.len());
    }

    #[test]
    fn test_italic_leans_right() {
        let mean_x = |ink: &[(u32, u32, u8)]| {
            let total: f64 = ink.iter().map(|&(_, _, a)| a as f64).sum();
            ink.iter().map(|&(x, _, a)| x as f64 * a as f64).sum::<f64>() / total
        };
        let normal = inked(&render("H", FontStyle::Normal));
        let italic = inked(&render("H", FontStyle::Italic));
        assert!(mean_x(&italic) > mean_x(&normal) + 0.5);
    }

    #[test]
    fn test_unknown_family_uses_fallback() {
        let book = book();
        assert!(book.resolve("cursive").is_some());

        let mut pixmap = Pixmap::new(60, 40).unwrap();
        let drawn = draw_text(
            &mut pixmap,
            &book,
            Point::new(2.0, 2.0),
            "ok",
            &FontSpec::default(),
            Color::BLACK,
        )
        .unwrap();
        assert!(drawn);
        assert!(!inked(&pixmap).is_empty());
    }

    #[test]
    fn test_second_line_is_lower() {
        let one = inked(&render("H", FontStyle::Normal));
        let two = inked(&render("H\nH", FontStyle::Normal));
        let lowest = |ink: &[(u32, u32, u8)]| ink.iter().map(|&(_, y, _)| y).max().unwrap();
        assert!(lowest(&two) > lowest(&one) + 20);
    }

    #[test]
    fn test_missing_font_skips_text() {
        let mut pixmap = Pixmap::new(20, 20).unwrap();
        let drawn = draw_text(
            &mut pixmap,
            &FontBook::new(),
            Point::new(1.0, 1.0),
            "hi",
            &FontSpec::default(),
            Color::BLACK,
        )
        .unwrap();
        assert!(!drawn);
        assert!(pixmap.data().iter().all(|&b| b == 0));
    }

    #[test]
    fn test_invalid_font_bytes() {
        let mut book = FontBook::new();
        let result = book.insert_bytes("cursive", vec![0, 1, 2, 3]);
        assert!(matches!(result, Err(RenderError::Font(_))));
        assert!(book.is_empty());
        assert!(book.resolve("cursive").is_none());
    }

    #[test]
    fn test_missing_font_file() {
        let mut book = FontBook::new();
        let result = book.load("serif", Path::new("/definitely/not/a/font.ttf"));
        assert!(matches!(result, Err(RenderError::Font(_))));
    }

    #[test]
    fn test_set_fallback_requires_known_family() {
        let mut book = FontBook::new();
        assert!(!book.set_fallback("cursive"));
    }
}
