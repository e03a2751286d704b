//! Uploaded-image handling: vision analysis or product scene edit.
//!
//! Analysis always produces a user-visible message; provider failures are
//! turned into a degraded reply. Editing fails hard: a missing provider or
//! store, an upload failure, or an edit response without an output image is
//! returned as an error and nothing is persisted.

use std::sync::Arc;

use chrono::Utc;
use serde::Serialize;
use tracing::{info, warn};

use smartbiz_types::agent::AgentId;
use smartbiz_types::config::{ImageConfig, LlmConfig};
use smartbiz_types::conversation::{ConversationMessage, Media, MessageId, SenderRole};
use smartbiz_types::error::{AgentError, ImageError};
use smartbiz_types::image::{ImageEditRequest, ImageInput};
use smartbiz_types::llm::{CompletionRequest, Message};

use super::data_uri;
use super::normalize::cover_resize;
use super::router::{ImageRoute, route};
use crate::generator::Generation;
use crate::providers::Providers;
use crate::repository::Repositories;
use crate::repository::conversation::ConversationRepository;
use crate::storage::object_store::UploadRequest;

const VISION_SYSTEM_PROMPT: &str =
    "You are an expert image analysis AI. Answer the user question about the image.";
pub const DEFAULT_VISION_PROMPT: &str = "Describe this image.";
const VISION_MAX_TOKENS: u32 = 300;
pub const VISION_FAILED_REPLY: &str = "Image analysis failed.";
const VISION_EMPTY_REPLY: &str = "No answer generated.";

const EDIT_PROMPT_PREFIX: &str = "Place the SAME product into a new scene.\n\
Preserve shape, label, and branding as closely as possible.\n\
Professional product photography.";
pub const EDIT_REPLY: &str = "Your product was placed into a new scene. Minor variations may occur.";

/// Result of routing an uploaded image.
#[derive(Debug, Clone, Serialize)]
pub struct ImageOutcome {
    pub route: ImageRoute,
    pub generation: Generation,
    /// Set when the pipeline persisted the assistant reply itself (edit path).
    pub message_id: Option<MessageId>,
}

pub struct ImagePipeline<R: Repositories> {
    repos: Arc<R>,
    providers: Arc<Providers>,
    llm_config: LlmConfig,
    image_config: ImageConfig,
}

impl<R: Repositories> ImagePipeline<R> {
    pub fn new(
        repos: Arc<R>,
        providers: Arc<Providers>,
        llm_config: LlmConfig,
        image_config: ImageConfig,
    ) -> Self {
        Self {
            repos,
            providers,
            llm_config,
            image_config,
        }
    }

    /// Analyze or edit `image` depending on what `prompt` asks for.
    pub async fn handle(
        &self,
        agent_id: &AgentId,
        image: &ImageInput,
        prompt: &str,
    ) -> Result<ImageOutcome, AgentError> {
        match route(prompt) {
            ImageRoute::Vision => Ok(ImageOutcome {
                route: ImageRoute::Vision,
                generation: self.analyze(image, prompt).await,
                message_id: None,
            }),
            ImageRoute::Edit => self.edit(agent_id, image, prompt).await,
        }
    }

    /// Answer `prompt` about `image`. Never fails.
    #[tracing::instrument(name = "analyze_image", skip_all, fields(model = %self.llm_config.vision_model))]
    pub async fn analyze(&self, image: &ImageInput, prompt: &str) -> Generation {
        let question = if prompt.trim().is_empty() {
            DEFAULT_VISION_PROMPT
        } else {
            prompt
        };
        let request = CompletionRequest {
            model: self.llm_config.vision_model.clone(),
            messages: vec![Message::user(question).with_image(data_uri::encode(image))],
            system: Some(VISION_SYSTEM_PROMPT.to_string()),
            max_tokens: VISION_MAX_TOKENS,
            temperature: None,
        };

        match self.providers.llm.complete(&request).await {
            Ok(response) if response.content.trim().is_empty() => {
                Generation::text(VISION_EMPTY_REPLY, response.usage)
            }
            Ok(response) => Generation::text(response.content, response.usage),
            Err(e) => {
                warn!(error = %e, "Image analysis failed, returning degraded reply");
                Generation {
                    message: VISION_FAILED_REPLY.to_string(),
                    media: Vec::new(),
                    usage: None,
                }
            }
        }
    }

    /// Place the product in `image` into the scene described by `prompt`.
    ///
    /// Persists the assistant reply and its media on success only.
    #[tracing::instrument(name = "edit_image", skip_all, fields(agent_id = %agent_id))]
    pub async fn edit(
        &self,
        agent_id: &AgentId,
        image: &ImageInput,
        prompt: &str,
    ) -> Result<ImageOutcome, AgentError> {
        let store = self
            .providers
            .object_store
            .as_ref()
            .ok_or_else(|| ImageError::Configuration("object storage is not configured".to_string()))?;
        let editor = self
            .providers
            .image_edit
            .as_ref()
            .ok_or_else(|| ImageError::Configuration("image edit provider is not configured".to_string()))?;

        let params = self.image_config.edit.clone();
        let (width, height) = (params.width, params.height);
        let source = image.bytes.clone();
        let normalized = tokio::task::spawn_blocking(move || cover_resize(&source, width, height))
            .await
            .map_err(|e| ImageError::Decode(format!("resize task failed: {e}")))??;

        let upload = UploadRequest {
            folder: self.image_config.upload_folder.clone(),
            filename: format!("sd-img2img-{}", Utc::now().timestamp_millis()),
            mime_type: "image/png".to_string(),
        };
        let public_url = store.upload(&normalized, &upload).await?;
        info!(url = %public_url, "Uploaded normalized image for edit");

        let request = ImageEditRequest {
            init_image_url: public_url,
            prompt: edit_prompt(prompt),
            params,
        };
        let response = editor.edit(&request).await?;

        let Some(output_url) = response.output_url else {
            warn!(payload = %response.raw, "Image edit returned no output");
            return Err(ImageError::Generation {
                payload: response.raw,
            }
            .into());
        };

        let reply = ConversationMessage::new(*agent_id, SenderRole::Assistant, EDIT_REPLY);
        let media = Media::from_url(*agent_id, reply.id, output_url.clone());
        let reply = self.repos.conversations().save_reply(&reply, &[media]).await?;

        Ok(ImageOutcome {
            route: ImageRoute::Edit,
            generation: Generation {
                message: EDIT_REPLY.to_string(),
                media: vec![output_url],
                usage: None,
            },
            message_id: Some(reply.id),
        })
    }
}

/// Wrap the user's scene request in the product-preservation prefix.
pub fn edit_prompt(prompt: &str) -> String {
    format!("{EDIT_PROMPT_PREFIX}\n{prompt}").trim().to_string()
}
