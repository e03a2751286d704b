//! Conversation orchestrator: the single entry point for a user turn.
//!
//! A turn persists the inbound message (and any uploaded image), picks
//! exactly one generator, persists the assistant reply with its media and
//! returns a unified [`TurnResponse`].
//!
//! Routing:
//! - image attached: image pipeline (vision or edit), no classification
//! - visual keywords in the text, or an image intent: text-to-image
//! - content intent with a text content type: content generator
//! - everything else, including content intents without a usable type: chat
//!
//! Chat, content and text-to-image failures become a failed-turn response.
//! Image edit failures and storage errors are returned as errors.

use std::sync::Arc;

use tracing::{info, warn};

use smartbiz_types::agent::{Agent, AgentId};
use smartbiz_types::business::Business;
use smartbiz_types::config::GlobalConfig;
use smartbiz_types::conversation::{
    ContentType, ConversationMessage, Media, MessageId, SenderRole,
};
use smartbiz_types::error::AgentError;
use smartbiz_types::image::ImageInput;
use smartbiz_types::intent::{Intent, IntentKind};
use smartbiz_types::llm::{CompletionRequest, Message};

use super::turn::{TurnResponse, TurnRoute, TurnState, TurnTracker};
use crate::generator::Generation;
use crate::generator::chat::{CHAT_MAX_TOKENS, CHAT_TEMPERATURE, generate_chat};
use crate::generator::content::generate_content;
use crate::generator::text_image::generate_image;
use crate::image::data_uri;
use crate::image::pipeline::{DEFAULT_VISION_PROMPT, ImagePipeline};
use crate::image::router::ImageRoute;
use crate::intent::classifier::classify_intent;
use crate::intent::heuristics::mentions_image;
use crate::memory::context::ContextAssembler;
use crate::providers::Providers;
use crate::repository::Repositories;
use crate::repository::agent::AgentRepository;
use crate::repository::business::BusinessRepository;
use crate::repository::conversation::ConversationRepository;

/// Reply shown when generation fails after the user turn was stored.
pub const FAILED_TURN_REPLY: &str =
    "Sorry, I couldn't generate a reply right now. Please try again.";

/// Text route chosen after classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextRoute {
    Chat,
    Content(ContentType),
    TextToImage,
}

/// Pick the generator for a text-only message.
///
/// Keyword matches win over the classifier. A content intent without a
/// text content type falls through to chat.
pub fn choose_text_route(text: &str, intent: &Intent) -> TextRoute {
    if mentions_image(text) || intent.wants_image() {
        return TextRoute::TextToImage;
    }
    if intent.intent == IntentKind::Content {
        match intent.target.content_type() {
            Some(content_type) => return TextRoute::Content(content_type),
            None => warn!(intent = %intent, "Content intent without a content type, using chat"),
        }
    }
    TextRoute::Chat
}

/// An inbound user turn.
#[derive(Debug, Clone, Default)]
pub struct TurnRequest {
    pub text: String,
    pub image: Option<ImageInput>,
}

pub struct ConversationOrchestrator<R: Repositories> {
    repos: Arc<R>,
    providers: Arc<Providers>,
    config: GlobalConfig,
    images: ImagePipeline<R>,
    context: ContextAssembler<R>,
}

impl<R: Repositories> ConversationOrchestrator<R> {
    pub fn new(repos: Arc<R>, providers: Arc<Providers>, config: GlobalConfig) -> Self {
        let images = ImagePipeline::new(
            repos.clone(),
            providers.clone(),
            config.llm.clone(),
            config.image.clone(),
        );
        let context = ContextAssembler::new(repos.clone(), config.context.clone());
        Self {
            repos,
            providers,
            config,
            images,
            context,
        }
    }

    /// Handle one user turn end to end.
    #[tracing::instrument(name = "handle_turn", skip(self, request), fields(agent_id = %agent_id, has_image = request.image.is_some()))]
    pub async fn handle_turn(
        &self,
        agent_id: &AgentId,
        request: TurnRequest,
    ) -> Result<TurnResponse, AgentError> {
        let mut turn = TurnTracker::new(*agent_id);

        let text = match (request.text.trim(), &request.image) {
            ("", None) => {
                return Err(AgentError::Validation(
                    "message text or image is required".to_string(),
                ));
            }
            ("", Some(_)) => DEFAULT_VISION_PROMPT.to_string(),
            (text, _) => text.to_string(),
        };

        let agent = self.load_agent(agent_id).await?;
        let business = self.load_business(&agent).await?;

        let user_message = self.persist_user_turn(&agent, &text, request.image.as_ref()).await?;
        turn.advance(TurnState::PersistedUserTurn);

        match request.image {
            Some(image) => self.dispatch_image(&mut turn, &agent, user_message.id, &image, &text).await,
            None => {
                let intent = classify_intent(&self.providers.llm, &self.config.llm.text_model, &text).await;
                turn.advance(TurnState::Classified);
                self.dispatch_text(&mut turn, &agent, business.as_ref(), user_message.id, &text, intent)
                    .await
            }
        }
    }

    /// Reply as the agent with its full memory profile and recent history.
    #[tracing::instrument(name = "chat_with_context", skip(self, text), fields(agent_id = %agent_id))]
    pub async fn chat_with_context(
        &self,
        agent_id: &AgentId,
        text: &str,
    ) -> Result<TurnResponse, AgentError> {
        let text = text.trim();
        if text.is_empty() {
            return Err(AgentError::Validation("message text is required".to_string()));
        }

        let mut turn = TurnTracker::new(*agent_id);
        let context = self.context.assemble(agent_id, text).await?;

        let user_message = self.persist_user_turn(&context.agent, text, None).await?;
        turn.advance(TurnState::PersistedUserTurn);

        let mut messages: Vec<Message> = context
            .recent_messages
            .iter()
            .map(|m| match m.role {
                SenderRole::User => Message::user(m.text.clone()),
                SenderRole::Assistant => Message::assistant(m.text.clone()),
            })
            .collect();
        messages.push(Message::user(text));

        let request = CompletionRequest {
            model: self.config.llm.text_model.clone(),
            messages,
            system: Some(context.system_prompt),
            max_tokens: CHAT_MAX_TOKENS,
            temperature: Some(CHAT_TEMPERATURE),
        };

        turn.advance(TurnState::Dispatched);
        let generation = match self.providers.llm.complete(&request).await {
            Ok(response) => Generation::text(response.content, response.usage),
            Err(e) => {
                return Ok(failed_turn(&mut turn, user_message.id, TurnRoute::ContextChat, None, None, e.to_string()));
            }
        };

        self.finish_turn(&mut turn, &context.agent, user_message.id, TurnRoute::ContextChat, None, None, generation)
            .await
    }

    async fn load_agent(&self, agent_id: &AgentId) -> Result<Agent, AgentError> {
        self.repos
            .agents()
            .get_agent(agent_id)
            .await?
            .ok_or(AgentError::AgentNotFound)
    }

    async fn load_business(&self, agent: &Agent) -> Result<Option<Business>, AgentError> {
        match agent.business_id {
            Some(ref id) => Ok(self.repos.businesses().get_business(id).await?),
            None => Ok(None),
        }
    }

    async fn persist_user_turn(
        &self,
        agent: &Agent,
        text: &str,
        image: Option<&ImageInput>,
    ) -> Result<ConversationMessage, AgentError> {
        let conversations = self.repos.conversations();
        let message = conversations
            .save_message(&ConversationMessage::new(agent.id, SenderRole::User, text))
            .await?;

        if let Some(image) = image {
            conversations
                .save_media(&Media::inline(
                    agent.id,
                    message.id,
                    data_uri::encode(image),
                    image.mime_type.clone(),
                ))
                .await?;
        }
        Ok(message)
    }

    async fn dispatch_image(
        &self,
        turn: &mut TurnTracker,
        agent: &Agent,
        user_message_id: MessageId,
        image: &ImageInput,
        text: &str,
    ) -> Result<TurnResponse, AgentError> {
        turn.advance(TurnState::Dispatched);
        let outcome = match self.images.handle(&agent.id, image, text).await {
            Ok(outcome) => outcome,
            Err(e) => {
                turn.advance(TurnState::Failed);
                warn!(agent_id = %agent.id, error = %e, "Image turn failed");
                return Err(e);
            }
        };

        let route = match outcome.route {
            ImageRoute::Vision => TurnRoute::Vision,
            ImageRoute::Edit => TurnRoute::ImageEdit,
        };

        match outcome.message_id {
            // The edit path stores its own reply so it can link the media.
            Some(message_id) => {
                turn.advance(TurnState::PersistedAssistantTurn);
                turn.advance(TurnState::Responded);
                info!(agent_id = %agent.id, route = %route, "Turn complete");
                Ok(TurnResponse {
                    message: outcome.generation.message,
                    media: outcome.generation.media,
                    message_id: Some(message_id),
                    user_message_id,
                    route,
                    content_type: None,
                    intent: None,
                    state: turn.state(),
                    error: None,
                    usage: outcome.generation.usage,
                })
            }
            None => {
                self.finish_turn(turn, agent, user_message_id, route, None, None, outcome.generation)
                    .await
            }
        }
    }

    async fn dispatch_text(
        &self,
        turn: &mut TurnTracker,
        agent: &Agent,
        business: Option<&Business>,
        user_message_id: MessageId,
        text: &str,
        intent: Intent,
    ) -> Result<TurnResponse, AgentError> {
        let route = choose_text_route(text, &intent);
        turn.advance(TurnState::Dispatched);

        let model = &self.config.llm.text_model;
        let (turn_route, content_type, result) = match route {
            TextRoute::TextToImage => (
                TurnRoute::TextToImage,
                None,
                generate_image(&self.providers.text_to_image, text, business)
                    .await
                    .map_err(AgentError::from),
            ),
            TextRoute::Content(content_type) => (
                TurnRoute::Content,
                Some(content_type),
                generate_content(&self.providers.llm, model, content_type, text, business)
                    .await
                    .map_err(AgentError::from),
            ),
            TextRoute::Chat => (
                TurnRoute::Chat,
                None,
                generate_chat(&self.providers.llm, model, text)
                    .await
                    .map_err(AgentError::from),
            ),
        };

        match result {
            Ok(generation) => {
                self.finish_turn(turn, agent, user_message_id, turn_route, content_type, Some(intent), generation)
                    .await
            }
            Err(e) => Ok(failed_turn(
                turn,
                user_message_id,
                turn_route,
                content_type,
                Some(intent),
                e.to_string(),
            )),
        }
    }

    #[allow(clippy::too_many_arguments)]
    async fn finish_turn(
        &self,
        turn: &mut TurnTracker,
        agent: &Agent,
        user_message_id: MessageId,
        route: TurnRoute,
        content_type: Option<ContentType>,
        intent: Option<Intent>,
        generation: Generation,
    ) -> Result<TurnResponse, AgentError> {
        let reply = ConversationMessage::new(agent.id, SenderRole::Assistant, generation.message.clone());
        let media: Vec<Media> = generation
            .media
            .iter()
            .map(|url| Media::from_url(agent.id, reply.id, url.clone()))
            .collect();
        let reply = self.repos.conversations().save_reply(&reply, &media).await?;
        turn.advance(TurnState::PersistedAssistantTurn);
        turn.advance(TurnState::Responded);
        info!(agent_id = %agent.id, route = %route, media = generation.media.len(), "Turn complete");

        Ok(TurnResponse {
            message: generation.message,
            media: generation.media,
            message_id: Some(reply.id),
            user_message_id,
            route,
            content_type,
            intent,
            state: turn.state(),
            error: None,
            usage: generation.usage,
        })
    }
}

fn failed_turn(
    turn: &mut TurnTracker,
    user_message_id: MessageId,
    route: TurnRoute,
    content_type: Option<ContentType>,
    intent: Option<Intent>,
    error: String,
) -> TurnResponse {
    turn.advance(TurnState::Failed);
    warn!(route = %route, error = %error, "Generation failed, user turn kept");
    TurnResponse {
        message: FAILED_TURN_REPLY.to_string(),
        media: Vec::new(),
        message_id: None,
        user_message_id,
        route,
        content_type,
        intent,
        state: turn.state(),
        error: Some(error),
        usage: None,
    }
}
