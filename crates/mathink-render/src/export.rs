//! PNG encoding and image preparation for the external services.

use crate::renderer::{RenderResult, RendererError};
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use mathink_core::surface::RasterBuffer;

/// Prefix of a PNG data URI.
pub const PNG_DATA_URI_PREFIX: &str = "data:image/png;base64,";

/// Encode RGBA pixel data to PNG bytes.
pub fn encode_png(raster: &RasterBuffer) -> RenderResult<Vec<u8>> {
    let (width, height) = (raster.width(), raster.height());
    if width == 0 || height == 0 {
        return Err(RendererError::InvalidDimensions { width, height });
    }

    let mut png_data = Vec::new();
    {
        let mut encoder = png::Encoder::new(&mut png_data, width, height);
        encoder.set_color(png::ColorType::Rgba);
        encoder.set_depth(png::BitDepth::Eight);

        let mut writer = encoder
            .write_header()
            .map_err(|e| RendererError::Encode(format!("header: {e}")))?;
        writer
            .write_image_data(raster.pixels())
            .map_err(|e| RendererError::Encode(format!("data: {e}")))?;
    }
    log::debug!("Encoded {}x{} PNG ({} bytes)", width, height, png_data.len());
    Ok(png_data)
}

/// Wrap PNG bytes in a `data:` URI.
pub fn png_data_uri(png: &[u8]) -> String {
    format!("{PNG_DATA_URI_PREFIX}{}", STANDARD.encode(png))
}

/// Prepare a flattened surface for handwriting recognition.
///
/// In dark mode the image is drawn onto white with a difference blend, so
/// light ink on a dark board becomes dark ink on white (`255 - c * alpha`).
pub fn prepare_for_ocr(flat: &RasterBuffer, dark_mode: bool) -> RasterBuffer {
    if !dark_mode {
        return flat.clone();
    }
    let mut out = flat.clone();
    for px in out.pixels_mut().chunks_exact_mut(4) {
        let alpha = px[3] as f32 / 255.0;
        for c in &mut px[..3] {
            *c = (255.0 - *c as f32 * alpha).round().clamp(0.0, 255.0) as u8;
        }
        px[3] = 255;
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use mathink_core::shapes::InkColor;

    #[test]
    fn test_encode_png_signature() {
        let raster = RasterBuffer::filled(3, 2, InkColor::BLACK);
        let png = encode_png(&raster).unwrap();
        assert_eq!(&png[..8], &[0x89, b'P', b'N', b'G', 0x0d, 0x0a, 0x1a, 0x0a]);
    }

    #[test]
    fn test_encode_png_rejects_empty() {
        let raster = RasterBuffer::new(0, 5);
        assert!(matches!(
            encode_png(&raster),
            Err(RendererError::InvalidDimensions { width: 0, height: 5 })
        ));
    }

    #[test]
    fn test_data_uri() {
        assert_eq!(png_data_uri(b"abc"), "data:image/png;base64,YWJj");
    }

    #[test]
    fn test_prepare_for_ocr_inverts_in_dark_mode() {
        let mut flat = RasterBuffer::new(2, 1);
        flat.set_pixel(0, 0, [255, 255, 255, 255]);
        let prepared = prepare_for_ocr(&flat, true);
        assert_eq!(prepared.pixel(0, 0), Some([0, 0, 0, 255]));
        // Transparent areas become white.
        assert_eq!(prepared.pixel(1, 0), Some([255, 255, 255, 255]));
    }

    #[test]
    fn test_prepare_for_ocr_light_mode_unchanged() {
        let flat = RasterBuffer::filled(2, 2, InkColor::new(1, 2, 3, 4));
        assert_eq!(prepare_for_ocr(&flat, false), flat);
    }
}
