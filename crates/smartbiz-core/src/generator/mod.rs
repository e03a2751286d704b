//! Single-call generators behind each orchestrator route.
//!
//! Each generator wraps exactly one provider call with a fixed prompt
//! template and budget. None of them retry or persist anything; failures
//! propagate to the caller.

pub mod chat;
pub mod content;
pub mod text_image;

use serde::Serialize;

use smartbiz_types::llm::Usage;

/// Output of a generator: reply text, media URLs and usage when known.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Generation {
    pub message: String,
    pub media: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub usage: Option<Usage>,
}

impl Generation {
    pub fn text(message: impl Into<String>, usage: Usage) -> Self {
        Self {
            message: message.into(),
            media: Vec::new(),
            usage: Some(usage),
        }
    }
}
