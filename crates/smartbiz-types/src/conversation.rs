//! Conversation log types: messages, generated content, and attached media.
//!
//! Messages are append-only. Media rows link to either a message or a
//! content record and carry either a public URL or an inline base64 payload.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::agent::AgentId;

uuid_id!(
    /// Unique identifier for a persisted conversation message.
    MessageId
);

uuid_id!(
    /// Unique identifier for a generated content record.
    ContentId
);

uuid_id!(
    /// Unique identifier for a media attachment.
    MediaId
);

/// Who authored a persisted message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SenderRole {
    User,
    Assistant,
}

impl fmt::Display for SenderRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SenderRole::User => write!(f, "user"),
            SenderRole::Assistant => write!(f, "assistant"),
        }
    }
}

impl FromStr for SenderRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "user" => Ok(SenderRole::User),
            "assistant" => Ok(SenderRole::Assistant),
            other => Err(format!("invalid sender role: '{other}'")),
        }
    }
}

/// A single turn in an agent's conversation log.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConversationMessage {
    pub id: MessageId,
    pub agent_id: AgentId,
    pub role: SenderRole,
    pub text: String,
    pub created_at: DateTime<Utc>,
}

impl ConversationMessage {
    pub fn new(agent_id: AgentId, role: SenderRole, text: impl Into<String>) -> Self {
        Self {
            id: MessageId::new(),
            agent_id,
            role,
            text: text.into(),
            created_at: Utc::now(),
        }
    }
}

/// Kind of generated content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentType {
    Email,
    Post,
    Caption,
    Code,
    Image,
}

impl ContentType {
    /// Text content types accepted by the content generator.
    pub const TEXT_TYPES: [ContentType; 4] = [
        ContentType::Email,
        ContentType::Post,
        ContentType::Caption,
        ContentType::Code,
    ];

    pub fn is_text(&self) -> bool {
        !matches!(self, ContentType::Image)
    }
}

impl fmt::Display for ContentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ContentType::Email => write!(f, "email"),
            ContentType::Post => write!(f, "post"),
            ContentType::Caption => write!(f, "caption"),
            ContentType::Code => write!(f, "code"),
            ContentType::Image => write!(f, "image"),
        }
    }
}

impl FromStr for ContentType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "email" => Ok(ContentType::Email),
            "post" => Ok(ContentType::Post),
            "caption" => Ok(ContentType::Caption),
            "code" => Ok(ContentType::Code),
            "image" => Ok(ContentType::Image),
            other => Err(format!("invalid content type: '{other}'")),
        }
    }
}

/// Snapshot stored with every generated content record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentPayload {
    pub prompt: String,
    pub content: String,
    pub business_name: Option<String>,
    pub brand_tone: Option<String>,
}

/// A generated piece of content (email, post, caption, code, image).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Content {
    pub id: ContentId,
    pub agent_id: AgentId,
    pub content_type: ContentType,
    pub payload: ContentPayload,
    pub created_at: DateTime<Utc>,
}

/// An image attached to a message or content record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Media {
    pub id: MediaId,
    pub agent_id: AgentId,
    pub message_id: Option<MessageId>,
    pub content_id: Option<ContentId>,
    pub url: Option<String>,
    pub base64: Option<String>,
    pub mime_type: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Media {
    /// Media hosted at a public URL, linked to a message.
    pub fn from_url(agent_id: AgentId, message_id: MessageId, url: impl Into<String>) -> Self {
        Self {
            id: MediaId::new(),
            agent_id,
            message_id: Some(message_id),
            content_id: None,
            url: Some(url.into()),
            base64: None,
            mime_type: None,
            created_at: Utc::now(),
        }
    }

    /// Inline media (base64 or data URI), linked to a message.
    pub fn inline(
        agent_id: AgentId,
        message_id: MessageId,
        base64: impl Into<String>,
        mime_type: impl Into<String>,
    ) -> Self {
        Self {
            id: MediaId::new(),
            agent_id,
            message_id: Some(message_id),
            content_id: None,
            url: None,
            base64: Some(base64.into()),
            mime_type: Some(mime_type.into()),
            created_at: Utc::now(),
        }
    }

    /// Re-link this media to a content record instead of a message.
    pub fn for_content(mut self, content_id: ContentId) -> Self {
        self.message_id = None;
        self.content_id = Some(content_id);
        self
    }

    /// The displayable source: the URL if hosted, otherwise the inline payload.
    pub fn source(&self) -> Option<&str> {
        self.url.as_deref().or(self.base64.as_deref())
    }
}

/// A message together with its media sources, in persisted order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageWithMedia {
    #[serde(flatten)]
    pub message: ConversationMessage,
    pub media: Vec<String>,
}

/// A content record together with its media sources.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContentWithMedia {
    #[serde(flatten)]
    pub content: Content,
    pub media: Vec<String>,
}
