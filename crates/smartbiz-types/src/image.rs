//! Image provider request/response shapes.

use serde::{Deserialize, Serialize};

/// An uploaded image: raw bytes plus the declared mime type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageInput {
    pub bytes: Vec<u8>,
    pub mime_type: String,
}

/// Fixed sampling parameters for image-to-image edits.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageEditParams {
    #[serde(default = "default_edit_model")]
    pub model_id: String,
    #[serde(default = "default_edit_size")]
    pub width: u32,
    #[serde(default = "default_edit_size")]
    pub height: u32,
    #[serde(default = "default_samples")]
    pub samples: u32,
    #[serde(default = "default_steps")]
    pub num_inference_steps: u32,
    #[serde(default = "default_guidance_scale")]
    pub guidance_scale: f64,
    #[serde(default = "default_strength")]
    pub strength: f64,
}

fn default_edit_model() -> String {
    "seedream-4.5-i2i".to_string()
}

fn default_edit_size() -> u32 {
    1024
}

fn default_samples() -> u32 {
    1
}

fn default_steps() -> u32 {
    30
}

fn default_guidance_scale() -> f64 {
    6.5
}

fn default_strength() -> f64 {
    0.5
}

impl Default for ImageEditParams {
    fn default() -> Self {
        Self {
            model_id: default_edit_model(),
            width: default_edit_size(),
            height: default_edit_size(),
            samples: default_samples(),
            num_inference_steps: default_steps(),
            guidance_scale: default_guidance_scale(),
            strength: default_strength(),
        }
    }
}

/// Request to an image-to-image provider.
#[derive(Debug, Clone)]
pub struct ImageEditRequest {
    /// Publicly reachable URL of the source image.
    pub init_image_url: String,
    pub prompt: String,
    pub params: ImageEditParams,
}

/// Response from an image-to-image provider.
///
/// `raw` keeps the full provider payload for error reporting when
/// `output_url` is absent.
#[derive(Debug, Clone)]
pub struct ImageEditResponse {
    pub output_url: Option<String>,
    pub raw: serde_json::Value,
}

/// A generated image hosted by the provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneratedImage {
    pub url: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_edit_params_defaults() {
        let params = ImageEditParams::default();
        assert_eq!(params.width, 1024);
        assert_eq!(params.height, 1024);
        assert_eq!(params.samples, 1);
        assert_eq!(params.num_inference_steps, 30);
        assert_eq!(params.guidance_scale, 6.5);
        assert_eq!(params.strength, 0.5);
    }
}
