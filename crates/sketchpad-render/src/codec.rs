//! PNG and data-URL encoding of rasters.

use crate::error::{RenderError, RenderResult};
use base64::{Engine, engine::general_purpose::STANDARD};
use tiny_skia::{IntSize, Pixmap};

/// Prefix of a base64 PNG data URL.
pub const PNG_DATA_URL_PREFIX: &str = "data:image/png;base64,";

/// Encode a pixmap as PNG bytes (straight alpha).
pub fn encode_png(pixmap: &Pixmap) -> RenderResult<Vec<u8>> {
    let rgba_data: Vec<u8> = pixmap
        .pixels()
        .iter()
        .flat_map(|px| {
            let c = px.demultiply();
            [c.red(), c.green(), c.blue(), c.alpha()]
        })
        .collect();

    let mut png_data = Vec::new();
    {
        let mut encoder = png::Encoder::new(&mut png_data, pixmap.width(), pixmap.height());
        encoder.set_color(png::ColorType::Rgba);
        encoder.set_depth(png::BitDepth::Eight);

        let mut writer = encoder
            .write_header()
            .map_err(|e| RenderError::Encode(format!("Failed to write PNG header: {e}")))?;
        writer
            .write_image_data(&rgba_data)
            .map_err(|e| RenderError::Encode(format!("Failed to write PNG data: {e}")))?;
    }
    Ok(png_data)
}

/// Decode any supported image format into a pixmap.
pub fn decode_image(bytes: &[u8]) -> RenderResult<Pixmap> {
    let decoded = image::load_from_memory(bytes).map_err(|e| RenderError::Decode(e.to_string()))?;
    let rgba = decoded.to_rgba8();
    let (width, height) = rgba.dimensions();

    let mut data = rgba.into_raw();
    for px in data.chunks_exact_mut(4) {
        let a = px[3] as u16;
        for channel in &mut px[..3] {
            *channel = ((*channel as u16 * a + 127) / 255) as u8;
        }
    }

    let size = IntSize::from_wh(width, height).ok_or(RenderError::InvalidSize { width, height })?;
    Pixmap::from_vec(data, size).ok_or(RenderError::InvalidSize { width, height })
}

/// Encode a pixmap as a `data:image/png;base64,` URL.
pub fn to_data_url(pixmap: &Pixmap) -> RenderResult<String> {
    let png = encode_png(pixmap)?;
    Ok(format!("{PNG_DATA_URL_PREFIX}{}", STANDARD.encode(png)))
}

/// Decode a base64 image data URL of any supported image type.
pub fn from_data_url(url: &str) -> RenderResult<Pixmap> {
    let rest = url
        .trim()
        .strip_prefix("data:")
        .ok_or_else(|| RenderError::Decode("Not a data URL".to_string()))?;
    let (_, payload) = rest
        .split_once(";base64,")
        .ok_or_else(|| RenderError::Decode("Data URL is not base64 encoded".to_string()))?;
    let bytes = STANDARD
        .decode(payload)
        .map_err(|e| RenderError::Decode(format!("Invalid base64: {e}")))?;
    decode_image(&bytes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tiny_skia::{Paint, Rect, Transform};

    fn sample() -> Pixmap {
        let mut pixmap = Pixmap::new(6, 4).unwrap();
        let mut paint = Paint::default();
        paint.set_color_rgba8(10, 200, 30, 255);
        pixmap.fill_rect(
            Rect::from_xywh(0.0, 0.0, 3.0, 4.0).unwrap(),
            &paint,
            Transform::identity(),
            None,
        );
        pixmap
    }

    #[test]
    fn test_png_signature() {
        let png = encode_png(&sample()).unwrap();
        assert_eq!(&png[..8], &[0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A]);
    }

    #[test]
    fn test_data_url_preserves_pixels() {
        let original = sample();
        let url = to_data_url(&original).unwrap();
        assert!(url.starts_with(PNG_DATA_URL_PREFIX));

        let decoded = from_data_url(&url).unwrap();
        assert_eq!((decoded.width(), decoded.height()), (6, 4));
        assert_eq!(decoded.data(), original.data());
    }

    #[test]
    fn test_rejects_non_data_url() {
        assert!(matches!(from_data_url("hello"), Err(RenderError::Decode(_))));
        assert!(matches!(
            from_data_url("data:image/png,rawbytes"),
            Err(RenderError::Decode(_))
        ));
    }

    #[test]
    fn test_rejects_corrupt_payload() {
        assert!(matches!(
            from_data_url("data:image/png;base64,!!!"),
            Err(RenderError::Decode(_))
        ));
        let not_png = format!("{PNG_DATA_URL_PREFIX}{}", STANDARD.encode(b"not an image"));
        assert!(matches!(from_data_url(&not_png), Err(RenderError::Decode(_))));
    }
}
