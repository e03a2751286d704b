use thiserror::Error;

use crate::llm::LlmError;

/// Errors from repository operations (used by trait definitions in smartbiz-core).
#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("database connection error")]
    Connection,

    #[error("query error: {0}")]
    Query(String),

    #[error("entity not found")]
    NotFound,

    #[error("conflict: {0}")]
    Conflict(String),
}

/// Errors from the image pipeline and its external providers.
#[derive(Debug, Error)]
pub enum ImageError {
    /// A required external-service credential or URL is missing.
    #[error("{0}")]
    Configuration(String),

    #[error("upload failed: {0}")]
    Upload(String),

    /// The edit provider answered without an output image.
    #[error("no image returned, provider response: {payload}")]
    Generation { payload: serde_json::Value },

    #[error("invalid image data: {0}")]
    Decode(String),

    #[error("image provider error: {0}")]
    Provider(String),

    #[error("image request timed out after {seconds}s")]
    Timeout { seconds: u64 },
}

/// Errors surfaced by agent, conversation and content operations.
#[derive(Debug, Error)]
pub enum AgentError {
    #[error("agent not found")]
    AgentNotFound,

    #[error("business not found")]
    BusinessNotFound,

    #[error("message not found")]
    MessageNotFound,

    #[error("content not found")]
    ContentNotFound,

    #[error("agent has no business profile")]
    NoBusiness,

    #[error("validation error: {0}")]
    Validation(String),

    #[error(transparent)]
    Repository(#[from] RepositoryError),

    #[error(transparent)]
    Llm(#[from] LlmError),

    #[error(transparent)]
    Image(#[from] ImageError),
}

impl AgentError {
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            AgentError::AgentNotFound
                | AgentError::BusinessNotFound
                | AgentError::MessageNotFound
                | AgentError::ContentNotFound
                | AgentError::Repository(RepositoryError::NotFound)
        )
    }
}
