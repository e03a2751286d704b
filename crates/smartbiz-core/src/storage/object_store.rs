use smartbiz_types::error::ImageError;

/// Where and how an object should be stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadRequest {
    pub folder: String,
    /// Public id of the object inside `folder`, without extension.
    pub filename: String,
    pub mime_type: String,
}

/// Publishes bytes and returns a publicly reachable HTTPS URL.
///
/// Uploads overwrite any existing object with the same folder and filename.
pub trait ObjectStore: Send + Sync {
    fn name(&self) -> &str;

    fn upload(
        &self,
        bytes: &[u8],
        request: &UploadRequest,
    ) -> impl std::future::Future<Output = Result<String, ImageError>> + Send;
}
