//! `data:` URI encoding and decoding for inline images.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;

use smartbiz_types::error::ImageError;
use smartbiz_types::image::ImageInput;

/// Mime type assumed for bare base64 payloads.
const DEFAULT_MIME: &str = "image/png";

/// Decode a `data:<mime>;base64,<payload>` URI or a bare base64 payload.
pub fn decode(input: &str) -> Result<ImageInput, ImageError> {
    let input = input.trim();
    let (mime_type, payload) = match input.strip_prefix("data:") {
        Some(rest) => {
            let (header, payload) = rest
                .split_once(',')
                .ok_or_else(|| ImageError::Decode("data URI has no payload".to_string()))?;
            let mime = header.split(';').next().unwrap_or_default();
            let mime = if mime.is_empty() { DEFAULT_MIME } else { mime };
            (mime.to_string(), payload)
        }
        None => (DEFAULT_MIME.to_string(), input),
    };

    if payload.is_empty() {
        return Err(ImageError::Decode("empty image payload".to_string()));
    }

    let bytes = STANDARD
        .decode(payload)
        .map_err(|e| ImageError::Decode(e.to_string()))?;

    Ok(ImageInput { bytes, mime_type })
}

/// Encode image bytes as a `data:` URI.
pub fn encode(image: &ImageInput) -> String {
    format!(
        "data:{};base64,{}",
        image.mime_type,
        STANDARD.encode(&image.bytes)
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_data_uri() {
        let image = decode("data:image/jpeg;base64,aGVsbG8=").unwrap();
        assert_eq!(image.mime_type, "image/jpeg");
        assert_eq!(image.bytes, b"hello");
    }

    #[test]
    fn test_decode_bare_base64_defaults_to_png() {
        let image = decode("aGVsbG8=").unwrap();
        assert_eq!(image.mime_type, "image/png");
    }

    #[test]
    fn test_decode_rejects_garbage() {
        assert!(matches!(decode("data:image/png;base64"), Err(ImageError::Decode(_))));
        assert!(matches!(decode("data:image/png;base64,"), Err(ImageError::Decode(_))));
        assert!(matches!(decode("not base64 at all!"), Err(ImageError::Decode(_))));
    }

    #[test]
    fn test_encode_roundtrip() {
        let image = ImageInput {
            bytes: vec![1, 2, 3, 4],
            mime_type: "image/webp".to_string(),
        };
        let uri = encode(&image);
        assert!(uri.starts_with("data:image/webp;base64,"));
        assert_eq!(decode(&uri).unwrap(), image);
    }
}
