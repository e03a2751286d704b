//! Image provider trait definitions.

use smartbiz_types::error::ImageError;
use smartbiz_types::image::{GeneratedImage, ImageEditRequest, ImageEditResponse};

/// Turns a text prompt into a hosted image.
pub trait TextToImageProvider: Send + Sync {
    fn name(&self) -> &str;

    /// Generate an image for `prompt` and return where it is hosted.
    fn generate(
        &self,
        prompt: &str,
    ) -> impl std::future::Future<Output = Result<GeneratedImage, ImageError>> + Send;
}

/// Image-to-image editing backend.
///
/// A response without `output_url` is not an error at this layer; the
/// pipeline decides how to surface it.
pub trait ImageEditProvider: Send + Sync {
    fn name(&self) -> &str;

    fn edit(
        &self,
        request: &ImageEditRequest,
    ) -> impl std::future::Future<Output = Result<ImageEditResponse, ImageError>> + Send;
}
