//! Agent Studio service.
//!
//! Manages businesses and their agents, keeps every agent's memory profile
//! in step with its business, and serves the direct (non-chat) generation
//! endpoints: content drafts and images. Conversational turns go through
//! [`crate::chat::orchestrator::ConversationOrchestrator`] instead.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::Utc;
use serde::Serialize;
use tracing::{info, warn};

use smartbiz_types::agent::{Agent, AgentId};
use smartbiz_types::business::{Business, BusinessId, BusinessPatch};
use smartbiz_types::config::GlobalConfig;
use smartbiz_types::conversation::{
    Content, ContentId, ContentPayload, ContentType, ContentWithMedia, ConversationMessage, Media,
    MediaId, MessageId, MessageWithMedia, SenderRole,
};
use smartbiz_types::error::{AgentError, RepositoryError};
use smartbiz_types::llm::Usage;
use smartbiz_types::memory::{MemorySnippet, SnippetKind};

use crate::generator::content::generate_content;
use crate::generator::text_image::generate_image;
use crate::memory::profile::build_memory_profile;
use crate::providers::Providers;
use crate::repository::Repositories;
use crate::repository::agent::AgentRepository;
use crate::repository::business::BusinessRepository;
use crate::repository::conversation::ConversationRepository;
use crate::repository::memory::MemoryRepository;

/// Default page size for content listings.
pub const DEFAULT_CONTENT_LIMIT: u32 = 50;

/// A stored content draft plus the assistant message that announced it.
#[derive(Debug, Clone, Serialize)]
pub struct ContentGeneration {
    pub content: Content,
    pub message_id: MessageId,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub usage: Option<Usage>,
}

/// A generated image, stored both as an image content record and as an
/// assistant message.
#[derive(Debug, Clone, Serialize)]
pub struct ImageGeneration {
    pub content_id: ContentId,
    pub message_id: MessageId,
    pub message: String,
    pub media: Vec<String>,
}

pub struct AgentService<R: Repositories> {
    repos: Arc<R>,
    providers: Arc<Providers>,
    config: GlobalConfig,
}

impl<R: Repositories> AgentService<R> {
    pub fn new(repos: Arc<R>, providers: Arc<Providers>, config: GlobalConfig) -> Self {
        Self {
            repos,
            providers,
            config,
        }
    }

    // --- businesses ---

    pub async fn create_business(&self, patch: BusinessPatch) -> Result<Business, AgentError> {
        let name = patch.name.as_deref().map(str::trim).unwrap_or_default();
        if name.is_empty() {
            return Err(AgentError::Validation("business name is required".to_string()));
        }

        let business = self.repos.businesses().create_business(&Business::from_patch(patch)).await?;
        info!(business_id = %business.id, name = %business.name, "Created business");
        Ok(business)
    }

    pub async fn get_business(&self, id: &BusinessId) -> Result<Business, AgentError> {
        self.repos
            .businesses()
            .get_business(id)
            .await?
            .ok_or(AgentError::BusinessNotFound)
    }

    /// Update a business and re-sync the memory of every agent it owns.
    pub async fn update_business(
        &self,
        id: &BusinessId,
        patch: BusinessPatch,
    ) -> Result<Business, AgentError> {
        if patch.name.as_deref().is_some_and(|n| n.trim().is_empty()) {
            return Err(AgentError::Validation("business name cannot be empty".to_string()));
        }

        let mut business = self.get_business(id).await?;
        business.apply(patch);
        let business = self
            .repos
            .businesses()
            .update_business(&business)
            .await
            .map_err(|e| match e {
                RepositoryError::NotFound => AgentError::BusinessNotFound,
                other => other.into(),
            })?;

        let agents = self.repos.agents().list_agents_for_business(id).await?;
        for agent in &agents {
            self.sync_memory(&agent.id, &business).await?;
        }
        info!(business_id = %business.id, agents = agents.len(), "Updated business");
        Ok(business)
    }

    // --- agents ---

    /// Create an agent, seeding its memory from the owning business if any.
    pub async fn create_agent(
        &self,
        name: &str,
        business_id: Option<BusinessId>,
    ) -> Result<Agent, AgentError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(AgentError::Validation("agent name is required".to_string()));
        }

        let business = match business_id {
            Some(ref id) => Some(self.get_business(id).await?),
            None => None,
        };

        let mut agent = Agent::new(name, business_id);
        if let Some(ref business) = business {
            agent.memory = build_memory_profile(business);
        }
        let agent = self.repos.agents().create_agent(&agent).await?;

        if business.is_some() {
            self.repos
                .memories()
                .replace_profile_snippet(&MemorySnippet::new(
                    agent.id,
                    SnippetKind::BusinessProfile,
                    agent.memory.clone(),
                ))
                .await?;
        }
        info!(agent_id = %agent.id, name = %agent.agent_name, "Created agent");
        Ok(agent)
    }

    pub async fn get_agent(&self, id: &AgentId) -> Result<Agent, AgentError> {
        self.repos
            .agents()
            .get_agent(id)
            .await?
            .ok_or(AgentError::AgentNotFound)
    }

    /// Agents of a business, newest first.
    pub async fn list_agents_for_business(
        &self,
        business_id: &BusinessId,
    ) -> Result<Vec<Agent>, AgentError> {
        self.get_business(business_id).await?;
        Ok(self.repos.agents().list_agents_for_business(business_id).await?)
    }

    /// Delete an agent together with its messages, content, media and memory.
    pub async fn delete_agent(&self, id: &AgentId) -> Result<(), AgentError> {
        self.repos.agents().delete_agent(id).await.map_err(|e| match e {
            RepositoryError::NotFound => AgentError::AgentNotFound,
            other => other.into(),
        })?;
        info!(agent_id = %id, "Deleted agent");
        Ok(())
    }

    /// Regenerate the agent's memory profile from its business.
    pub async fn refresh_agent_memory(&self, id: &AgentId) -> Result<Agent, AgentError> {
        let mut agent = self.get_agent(id).await?;
        let business_id = agent.business_id.ok_or(AgentError::NoBusiness)?;
        let business = self.get_business(&business_id).await?;

        agent.memory = self.sync_memory(id, &business).await?;
        Ok(agent)
    }

    /// Store a free-form note in the agent's searchable memory.
    pub async fn add_memory_note(&self, id: &AgentId, text: &str) -> Result<MemorySnippet, AgentError> {
        let text = text.trim();
        if text.is_empty() {
            return Err(AgentError::Validation("note text is required".to_string()));
        }
        self.get_agent(id).await?;

        let snippet = MemorySnippet::new(*id, SnippetKind::Note, text);
        Ok(self.repos.memories().save_snippet(&snippet).await?)
    }

    async fn sync_memory(&self, agent_id: &AgentId, business: &Business) -> Result<String, AgentError> {
        let profile = build_memory_profile(business);
        self.repos
            .agents()
            .update_agent_memory(agent_id, &profile)
            .await
            .map_err(|e| match e {
                RepositoryError::NotFound => AgentError::AgentNotFound,
                other => other.into(),
            })?;
        self.repos
            .memories()
            .replace_profile_snippet(&MemorySnippet::new(
                *agent_id,
                SnippetKind::BusinessProfile,
                profile.clone(),
            ))
            .await?;
        Ok(profile)
    }

    async fn agent_with_business(&self, id: &AgentId) -> Result<(Agent, Option<Business>), AgentError> {
        let agent = self.get_agent(id).await?;
        let business = match agent.business_id {
            Some(ref business_id) => self.repos.businesses().get_business(business_id).await?,
            None => None,
        };
        Ok((agent, business))
    }

    // --- conversation log ---

    /// The full conversation log, oldest first, each message with its media.
    pub async fn get_messages(&self, id: &AgentId) -> Result<Vec<MessageWithMedia>, AgentError> {
        self.get_agent(id).await?;

        let conversations = self.repos.conversations();
        let messages = conversations.list_messages(id).await?;
        let ids: Vec<MessageId> = messages.iter().map(|m| m.id).collect();
        let mut by_message: HashMap<MessageId, Vec<String>> = HashMap::new();
        for media in conversations.list_media_for_messages(&ids).await? {
            if let (Some(message_id), Some(source)) = (media.message_id, media.source()) {
                by_message.entry(message_id).or_default().push(source.to_string());
            }
        }

        Ok(messages
            .into_iter()
            .map(|message| {
                let media = by_message.remove(&message.id).unwrap_or_default();
                MessageWithMedia { message, media }
            })
            .collect())
    }

    /// Attach an image (URL, data URI or bare base64) to an existing message.
    pub async fn attach_message_media(
        &self,
        agent_id: &AgentId,
        message_id: &MessageId,
        source: &str,
        mime_type: Option<String>,
    ) -> Result<Media, AgentError> {
        let conversations = self.repos.conversations();
        match conversations.get_message(message_id).await? {
            Some(message) if message.agent_id == *agent_id => {}
            _ => return Err(AgentError::MessageNotFound),
        }

        let mut media = media_from_source(*agent_id, source, mime_type)?;
        media.message_id = Some(*message_id);
        Ok(conversations.save_media(&media).await?)
    }

    // --- content ---

    /// Generate and store one text content draft.
    pub async fn generate_content(
        &self,
        agent_id: &AgentId,
        content_type: ContentType,
        prompt: &str,
    ) -> Result<ContentGeneration, AgentError> {
        if !content_type.is_text() {
            return Err(AgentError::Validation(format!(
                "content type must be one of email, post, caption, code (got {content_type})"
            )));
        }
        let prompt = prompt.trim();
        if prompt.is_empty() {
            return Err(AgentError::Validation("prompt is required".to_string()));
        }

        let (agent, business) = self.agent_with_business(agent_id).await?;
        let generation = generate_content(
            &self.providers.llm,
            &self.config.llm.text_model,
            content_type,
            prompt,
            business.as_ref(),
        )
        .await?;

        let content = Content {
            id: ContentId::new(),
            agent_id: agent.id,
            content_type,
            payload: ContentPayload {
                prompt: prompt.to_string(),
                content: generation.message.clone(),
                business_name: business.as_ref().map(|b| b.name.clone()),
                brand_tone: business.as_ref().and_then(|b| b.brand_tone.clone()),
            },
            created_at: Utc::now(),
        };
        let conversations = self.repos.conversations();
        let content = conversations.save_content(&content).await?;
        let message = conversations
            .save_message(&ConversationMessage::new(
                agent.id,
                SenderRole::Assistant,
                generation.message,
            ))
            .await?;

        info!(agent_id = %agent.id, content_id = %content.id, content_type = %content_type, "Generated content");
        Ok(ContentGeneration {
            content,
            message_id: message.id,
            usage: generation.usage,
        })
    }

    /// Generate a brand-styled image and store it as content and as a reply.
    pub async fn generate_image(&self, agent_id: &AgentId, prompt: &str) -> Result<ImageGeneration, AgentError> {
        let prompt = prompt.trim();
        if prompt.is_empty() {
            return Err(AgentError::Validation("prompt is required".to_string()));
        }

        let (agent, business) = self.agent_with_business(agent_id).await?;
        let generation = generate_image(&self.providers.text_to_image, prompt, business.as_ref()).await?;

        let conversations = self.repos.conversations();
        let content = conversations
            .save_content(&Content {
                id: ContentId::new(),
                agent_id: agent.id,
                content_type: ContentType::Image,
                payload: ContentPayload {
                    prompt: prompt.to_string(),
                    content: generation.message.clone(),
                    business_name: business.as_ref().map(|b| b.name.clone()),
                    brand_tone: business.as_ref().and_then(|b| b.brand_tone.clone()),
                },
                created_at: Utc::now(),
            })
            .await?;
        let message = ConversationMessage::new(agent.id, SenderRole::Assistant, generation.message.clone());
        let media: Vec<Media> = generation
            .media
            .iter()
            .flat_map(|url| {
                let media = Media::from_url(agent.id, message.id, url.clone());
                let copy = media_copy_for_content(&media, content.id);
                [media, copy]
            })
            .collect();
        let message = conversations.save_reply(&message, &media).await?;

        info!(agent_id = %agent.id, content_id = %content.id, "Generated image");
        Ok(ImageGeneration {
            content_id: content.id,
            message_id: message.id,
            message: generation.message,
            media: generation.media,
        })
    }

    /// Content for an agent, newest first, each with its media.
    pub async fn list_content(
        &self,
        agent_id: &AgentId,
        content_type: Option<ContentType>,
        limit: Option<u32>,
    ) -> Result<Vec<ContentWithMedia>, AgentError> {
        self.get_agent(agent_id).await?;

        let conversations = self.repos.conversations();
        let limit = limit.unwrap_or(DEFAULT_CONTENT_LIMIT).clamp(1, 500);
        let contents = conversations.list_content(agent_id, content_type, limit).await?;
        let ids: Vec<ContentId> = contents.iter().map(|c| c.id).collect();
        let mut by_content: HashMap<ContentId, Vec<String>> = HashMap::new();
        for media in conversations.list_media_for_content(&ids).await? {
            if let (Some(content_id), Some(source)) = (media.content_id, media.source()) {
                by_content.entry(content_id).or_default().push(source.to_string());
            }
        }

        Ok(contents
            .into_iter()
            .map(|content| {
                let media = by_content.remove(&content.id).unwrap_or_default();
                ContentWithMedia { content, media }
            })
            .collect())
    }

    /// Attach an image (URL, data URI or bare base64) to a content record.
    pub async fn attach_content_media(
        &self,
        agent_id: &AgentId,
        content_id: &ContentId,
        source: &str,
        mime_type: Option<String>,
    ) -> Result<Media, AgentError> {
        let conversations = self.repos.conversations();
        match conversations.get_content(content_id).await? {
            Some(content) if content.agent_id == *agent_id => {}
            _ => return Err(AgentError::ContentNotFound),
        }

        let mut media = media_from_source(*agent_id, source, mime_type)?;
        media.content_id = Some(*content_id);
        Ok(conversations.save_media(&media).await?)
    }
}

fn media_copy_for_content(media: &Media, content_id: ContentId) -> Media {
    Media {
        id: MediaId::new(),
        ..media.clone()
    }
    .for_content(content_id)
}

/// Build an unlinked media row from a URL or an inline payload.
fn media_from_source(
    agent_id: AgentId,
    source: &str,
    mime_type: Option<String>,
) -> Result<Media, AgentError> {
    let source = source.trim();
    if source.is_empty() {
        return Err(AgentError::Validation("media url or base64 is required".to_string()));
    }

    let hosted = source.starts_with("https://") || source.starts_with("http://");
    if !hosted && mime_type.is_none() && !source.starts_with("data:") {
        warn!(agent_id = %agent_id, "Inline media without a mime type");
    }
    Ok(Media {
        id: MediaId::new(),
        agent_id,
        message_id: None,
        content_id: None,
        url: hosted.then(|| source.to_string()),
        base64: (!hosted).then(|| source.to_string()),
        mime_type,
        created_at: Utc::now(),
    })
}
