//! Query parameter extractors for list endpoints.

use serde::Deserialize;

use smartbiz_types::conversation::ContentType;

use crate::http::error::AppError;

/// Query parameters for the content list endpoint.
#[derive(Debug, Deserialize, Default)]
pub struct ContentListQuery {
    /// Filter by content type (email, post, caption, code, image).
    #[serde(rename = "type")]
    pub content_type: Option<String>,
    /// Maximum results (defaults to 50).
    pub limit: Option<u32>,
}

impl ContentListQuery {
    pub fn content_type(&self) -> Result<Option<ContentType>, AppError> {
        match self.content_type.as_deref().map(str::trim) {
            None | Some("") => Ok(None),
            Some(raw) => raw.parse().map(Some).map_err(AppError::Validation),
        }
    }
}
