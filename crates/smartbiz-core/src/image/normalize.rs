//! Square-crop normalization applied before an image is sent for editing.

use std::io::Cursor;

use image::imageops::FilterType;
use image::ImageFormat;

use smartbiz_types::error::ImageError;

/// Resize and center-crop `bytes` to exactly `width` x `height` (cover fit),
/// re-encoded as PNG.
pub fn cover_resize(bytes: &[u8], width: u32, height: u32) -> Result<Vec<u8>, ImageError> {
    let img = image::load_from_memory(bytes).map_err(|e| ImageError::Decode(e.to_string()))?;
    let resized = img.resize_to_fill(width, height, FilterType::Lanczos3);

    let mut out = Cursor::new(Vec::new());
    resized
        .write_to(&mut out, ImageFormat::Png)
        .map_err(|e| ImageError::Decode(format!("failed to encode PNG: {e}")))?;
    Ok(out.into_inner())
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::GenericImageView;

    use crate::testing::png_fixture;

    #[test]
    fn test_cover_resize_produces_square_png() {
        let bytes = png_fixture(300, 120);
        let normalized = cover_resize(&bytes, 64, 64).unwrap();

        let decoded = image::load_from_memory_with_format(&normalized, ImageFormat::Png).unwrap();
        assert_eq!(decoded.dimensions(), (64, 64));
    }

    #[test]
    fn test_cover_resize_rejects_non_image() {
        let err = cover_resize(b"definitely not an image", 64, 64).unwrap_err();
        assert!(matches!(err, ImageError::Decode(_)));
    }
}
