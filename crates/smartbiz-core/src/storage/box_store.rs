//! BoxObjectStore -- object-safe wrapper for ObjectStore.

use std::future::Future;
use std::pin::Pin;

use smartbiz_types::error::ImageError;

use super::object_store::{ObjectStore, UploadRequest};

pub trait ObjectStoreDyn: Send + Sync {
    fn name(&self) -> &str;

    fn upload_boxed<'a>(
        &'a self,
        bytes: &'a [u8],
        request: &'a UploadRequest,
    ) -> Pin<Box<dyn Future<Output = Result<String, ImageError>> + Send + 'a>>;
}

impl<T: ObjectStore> ObjectStoreDyn for T {
    fn name(&self) -> &str {
        ObjectStore::name(self)
    }

    fn upload_boxed<'a>(
        &'a self,
        bytes: &'a [u8],
        request: &'a UploadRequest,
    ) -> Pin<Box<dyn Future<Output = Result<String, ImageError>> + Send + 'a>> {
        Box::pin(self.upload(bytes, request))
    }
}

/// Type-erased object store.
pub struct BoxObjectStore {
    inner: Box<dyn ObjectStoreDyn + Send + Sync>,
}

impl BoxObjectStore {
    pub fn new<T: ObjectStore + 'static>(store: T) -> Self {
        Self {
            inner: Box::new(store),
        }
    }

    pub fn name(&self) -> &str {
        self.inner.name()
    }

    /// Upload `bytes` and return the public URL.
    pub async fn upload(&self, bytes: &[u8], request: &UploadRequest) -> Result<String, ImageError> {
        self.inner.upload_boxed(bytes, request).await
    }
}
