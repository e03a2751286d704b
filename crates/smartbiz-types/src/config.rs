//! Global configuration types.
//!
//! `GlobalConfig` represents the top-level `config.toml` in the data
//! directory: model selection, provider endpoints, timeouts, and the sizes of
//! the prompt context window.

use serde::{Deserialize, Serialize};

use crate::image::ImageEditParams;

/// Top-level configuration. All fields have defaults.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GlobalConfig {
    #[serde(default)]
    pub llm: LlmConfig,
    #[serde(default)]
    pub image: ImageConfig,
    #[serde(default)]
    pub context: ContextConfig,
}

/// Completion provider settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmConfig {
    #[serde(default = "default_llm_base_url")]
    pub base_url: String,
    /// Model used for classification, chat and content generation.
    #[serde(default = "default_text_model")]
    pub text_model: String,
    /// Model used for image analysis.
    #[serde(default = "default_vision_model")]
    pub vision_model: String,
    #[serde(default = "default_completion_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_llm_base_url() -> String {
    "https://api.openai.com/v1".to_string()
}

fn default_text_model() -> String {
    "gpt-4.1-mini".to_string()
}

fn default_vision_model() -> String {
    "gpt-4.1".to_string()
}

fn default_completion_timeout_secs() -> u64 {
    60
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            base_url: default_llm_base_url(),
            text_model: default_text_model(),
            vision_model: default_vision_model(),
            timeout_secs: default_completion_timeout_secs(),
        }
    }
}

/// Image generation, edit and upload settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImageConfig {
    /// Base URL the text-to-image prompt is appended to as a path segment.
    #[serde(default = "default_generation_base_url")]
    pub generation_base_url: String,
    #[serde(default = "default_edit_endpoint")]
    pub edit_endpoint: String,
    #[serde(default = "default_edit_timeout_secs")]
    pub edit_timeout_secs: u64,
    #[serde(default = "default_upload_timeout_secs")]
    pub upload_timeout_secs: u64,
    /// Object store folder for normalized edit sources.
    #[serde(default = "default_upload_folder")]
    pub upload_folder: String,
    #[serde(default)]
    pub edit: ImageEditParams,
}

fn default_generation_base_url() -> String {
    "https://image.pollinations.ai/prompt".to_string()
}

fn default_edit_endpoint() -> String {
    "https://modelslab.com/api/v7/images/image-to-image".to_string()
}

fn default_edit_timeout_secs() -> u64 {
    120
}

fn default_upload_timeout_secs() -> u64 {
    60
}

fn default_upload_folder() -> String {
    "ai-uploads".to_string()
}

impl Default for ImageConfig {
    fn default() -> Self {
        Self {
            generation_base_url: default_generation_base_url(),
            edit_endpoint: default_edit_endpoint(),
            edit_timeout_secs: default_edit_timeout_secs(),
            upload_timeout_secs: default_upload_timeout_secs(),
            upload_folder: default_upload_folder(),
            edit: ImageEditParams::default(),
        }
    }
}

/// How much history and memory goes into an assembled prompt.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContextConfig {
    #[serde(default = "default_recent_messages")]
    pub recent_messages: u32,
    #[serde(default = "default_relevant_memories")]
    pub relevant_memories: u32,
}

fn default_recent_messages() -> u32 {
    10
}

fn default_relevant_memories() -> u32 {
    3
}

impl Default for ContextConfig {
    fn default() -> Self {
        Self {
            recent_messages: default_recent_messages(),
            relevant_memories: default_relevant_memories(),
        }
    }
}
