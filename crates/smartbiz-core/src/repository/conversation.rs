//! Conversation log repository trait definition.
//!
//! Covers messages, generated content and their media. Messages and media
//! are append-only; ordering is by stored creation time.

use smartbiz_types::agent::AgentId;
use smartbiz_types::conversation::{
    Content, ContentId, ContentType, ConversationMessage, Media, MessageId,
};
use smartbiz_types::error::RepositoryError;

pub trait ConversationRepository: Send + Sync {
    fn save_message(
        &self,
        message: &ConversationMessage,
    ) -> impl std::future::Future<Output = Result<ConversationMessage, RepositoryError>> + Send;

    fn get_message(
        &self,
        id: &MessageId,
    ) -> impl std::future::Future<Output = Result<Option<ConversationMessage>, RepositoryError>> + Send;

    /// The `limit` most recent messages for an agent, newest first.
    fn list_recent_messages(
        &self,
        agent_id: &AgentId,
        limit: u32,
    ) -> impl std::future::Future<Output = Result<Vec<ConversationMessage>, RepositoryError>> + Send;

    /// Every message for an agent, oldest first.
    fn list_messages(
        &self,
        agent_id: &AgentId,
    ) -> impl std::future::Future<Output = Result<Vec<ConversationMessage>, RepositoryError>> + Send;

    /// Store a reply and its media together: either every row lands or none do.
    fn save_reply(
        &self,
        message: &ConversationMessage,
        media: &[Media],
    ) -> impl std::future::Future<Output = Result<ConversationMessage, RepositoryError>> + Send;

    fn save_media(
        &self,
        media: &Media,
    ) -> impl std::future::Future<Output = Result<Media, RepositoryError>> + Send;

    /// Media linked to any of `message_ids`, oldest first.
    fn list_media_for_messages(
        &self,
        message_ids: &[MessageId],
    ) -> impl std::future::Future<Output = Result<Vec<Media>, RepositoryError>> + Send;

    fn save_content(
        &self,
        content: &Content,
    ) -> impl std::future::Future<Output = Result<Content, RepositoryError>> + Send;

    fn get_content(
        &self,
        id: &ContentId,
    ) -> impl std::future::Future<Output = Result<Option<Content>, RepositoryError>> + Send;

    /// Content for an agent, newest first, optionally filtered by type.
    fn list_content(
        &self,
        agent_id: &AgentId,
        content_type: Option<ContentType>,
        limit: u32,
    ) -> impl std::future::Future<Output = Result<Vec<Content>, RepositoryError>> + Send;

    /// Media linked to any of `content_ids`, oldest first.
    fn list_media_for_content(
        &self,
        content_ids: &[ContentId],
    ) -> impl std::future::Future<Output = Result<Vec<Media>, RepositoryError>> + Send;
}
