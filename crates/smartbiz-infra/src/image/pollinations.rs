//! Text-to-image via Pollinations.
//!
//! Pollinations renders on first GET of `{base}/{prompt}`, so generation is
//! only URL construction: no request is made here and the client that
//! displays the URL triggers the render.

use reqwest::Url;

use smartbiz_core::image::provider::TextToImageProvider;
use smartbiz_observe::genai_attrs::PROVIDER_POLLINATIONS;
use smartbiz_types::error::ImageError;
use smartbiz_types::image::GeneratedImage;

pub struct PollinationsProvider {
    base: Url,
}

impl PollinationsProvider {
    /// `base_url` is the prompt endpoint, e.g. `https://image.pollinations.ai/prompt`.
    pub fn new(base_url: &str) -> Result<Self, ImageError> {
        let base = Url::parse(base_url.trim_end_matches('/'))
            .map_err(|e| ImageError::Configuration(format!("invalid image generation URL: {e}")))?;
        if base.cannot_be_a_base() {
            return Err(ImageError::Configuration(format!(
                "image generation URL cannot take a path: {base_url}"
            )));
        }
        Ok(Self { base })
    }

    /// The hosted image URL for `prompt`, with the prompt as one encoded path segment.
    pub fn image_url(&self, prompt: &str) -> Result<Url, ImageError> {
        let mut url = self.base.clone();
        url.path_segments_mut()
            .map_err(|_| ImageError::Configuration("image generation URL cannot take a path".to_string()))?
            .pop_if_empty()
            .push(prompt);
        Ok(url)
    }
}

impl TextToImageProvider for PollinationsProvider {
    fn name(&self) -> &str {
        PROVIDER_POLLINATIONS
    }

    async fn generate(&self, prompt: &str) -> Result<GeneratedImage, ImageError> {
        let url = self.image_url(prompt)?;
        tracing::debug!(host = ?url.host_str(), "Built text-to-image URL");
        Ok(GeneratedImage { url: url.into() })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prompt_is_one_encoded_segment() {
        let provider = PollinationsProvider::new("https://image.pollinations.ai/prompt").unwrap();
        let url = provider.image_url("red sneaker / white bg?\nBrand: Acme").unwrap();

        let text = url.as_str();
        assert!(text.starts_with("https://image.pollinations.ai/prompt/"));
        assert_eq!(url.path_segments().unwrap().count(), 2);
        assert!(!text.contains(' '));
        assert!(url.query().is_none());
    }

    #[test]
    fn test_trailing_slash_is_tolerated() {
        let provider = PollinationsProvider::new("https://image.pollinations.ai/prompt/").unwrap();
        let url = provider.image_url("logo").unwrap();
        assert_eq!(url.as_str(), "https://image.pollinations.ai/prompt/logo");
    }

    #[test]
    fn test_invalid_base_is_configuration_error() {
        assert!(matches!(
            PollinationsProvider::new("not a url"),
            Err(ImageError::Configuration(_))
        ));
        assert!(matches!(
            PollinationsProvider::new("mailto:someone@example.com"),
            Err(ImageError::Configuration(_))
        ));
    }

    #[tokio::test]
    async fn test_generate_returns_url() {
        let provider = PollinationsProvider::new("https://image.pollinations.ai/prompt").unwrap();
        let image = provider.generate("a cozy cafe").await.unwrap();
        assert_eq!(image.url, "https://image.pollinations.ai/prompt/a%20cozy%20cafe");
    }
}
