//! Object-safe wrappers for the image provider traits.
//!
//! Same blanket-impl pattern as `BoxLlmProvider`.

use std::future::Future;
use std::pin::Pin;

use smartbiz_types::error::ImageError;
use smartbiz_types::image::{GeneratedImage, ImageEditRequest, ImageEditResponse};

use super::provider::{ImageEditProvider, TextToImageProvider};

type BoxedResult<'a, T> = Pin<Box<dyn Future<Output = Result<T, ImageError>> + Send + 'a>>;

pub trait TextToImageProviderDyn: Send + Sync {
    fn name(&self) -> &str;

    fn generate_boxed<'a>(&'a self, prompt: &'a str) -> BoxedResult<'a, GeneratedImage>;
}

impl<T: TextToImageProvider> TextToImageProviderDyn for T {
    fn name(&self) -> &str {
        TextToImageProvider::name(self)
    }

    fn generate_boxed<'a>(&'a self, prompt: &'a str) -> BoxedResult<'a, GeneratedImage> {
        Box::pin(self.generate(prompt))
    }
}

/// Type-erased text-to-image provider.
pub struct BoxTextToImageProvider {
    inner: Box<dyn TextToImageProviderDyn + Send + Sync>,
}

impl BoxTextToImageProvider {
    pub fn new<T: TextToImageProvider + 'static>(provider: T) -> Self {
        Self {
            inner: Box::new(provider),
        }
    }

    pub fn name(&self) -> &str {
        self.inner.name()
    }

    pub async fn generate(&self, prompt: &str) -> Result<GeneratedImage, ImageError> {
        self.inner.generate_boxed(prompt).await
    }
}

pub trait ImageEditProviderDyn: Send + Sync {
    fn name(&self) -> &str;

    fn edit_boxed<'a>(&'a self, request: &'a ImageEditRequest)
    -> BoxedResult<'a, ImageEditResponse>;
}

impl<T: ImageEditProvider> ImageEditProviderDyn for T {
    fn name(&self) -> &str {
        ImageEditProvider::name(self)
    }

    fn edit_boxed<'a>(
        &'a self,
        request: &'a ImageEditRequest,
    ) -> BoxedResult<'a, ImageEditResponse> {
        Box::pin(self.edit(request))
    }
}

/// Type-erased image-to-image provider.
pub struct BoxImageEditProvider {
    inner: Box<dyn ImageEditProviderDyn + Send + Sync>,
}

impl BoxImageEditProvider {
    pub fn new<T: ImageEditProvider + 'static>(provider: T) -> Self {
        Self {
            inner: Box::new(provider),
        }
    }

    pub fn name(&self) -> &str {
        self.inner.name()
    }

    pub async fn edit(&self, request: &ImageEditRequest) -> Result<ImageEditResponse, ImageError> {
        self.inner.edit_boxed(request).await
    }
}
