//! Turn lifecycle types.

use serde::Serialize;
use std::fmt;
use tracing::{debug, warn};

use smartbiz_types::agent::AgentId;
use smartbiz_types::conversation::{ContentType, MessageId};
use smartbiz_types::intent::Intent;
use smartbiz_types::llm::Usage;

/// Where a turn is in its lifecycle.
///
/// `Failed` is terminal: the user turn is kept, no assistant turn exists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TurnState {
    Received,
    PersistedUserTurn,
    Classified,
    Dispatched,
    PersistedAssistantTurn,
    Responded,
    Failed,
}

impl TurnState {
    /// Whether `next` is a legal successor. Image turns skip `Classified`.
    pub fn can_advance_to(self, next: TurnState) -> bool {
        use TurnState::*;
        matches!(
            (self, next),
            (Received, PersistedUserTurn)
                | (PersistedUserTurn, Classified)
                | (PersistedUserTurn, Dispatched)
                | (Classified, Dispatched)
                | (Dispatched, PersistedAssistantTurn)
                | (PersistedAssistantTurn, Responded)
                | (Received | PersistedUserTurn | Classified | Dispatched, Failed)
        )
    }
}

impl fmt::Display for TurnState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            TurnState::Received => "received",
            TurnState::PersistedUserTurn => "persisted_user_turn",
            TurnState::Classified => "classified",
            TurnState::Dispatched => "dispatched",
            TurnState::PersistedAssistantTurn => "persisted_assistant_turn",
            TurnState::Responded => "responded",
            TurnState::Failed => "failed",
        };
        write!(f, "{s}")
    }
}

/// Which generator handled a turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TurnRoute {
    Chat,
    ContextChat,
    Content,
    TextToImage,
    Vision,
    ImageEdit,
}

impl fmt::Display for TurnRoute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            TurnRoute::Chat => "chat",
            TurnRoute::ContextChat => "context_chat",
            TurnRoute::Content => "content",
            TurnRoute::TextToImage => "text_to_image",
            TurnRoute::Vision => "vision",
            TurnRoute::ImageEdit => "image_edit",
        };
        write!(f, "{s}")
    }
}

/// Tracks one turn's state and logs every transition.
#[derive(Debug)]
pub struct TurnTracker {
    agent_id: AgentId,
    state: TurnState,
}

impl TurnTracker {
    pub fn new(agent_id: AgentId) -> Self {
        debug!(agent_id = %agent_id, state = %TurnState::Received, "Turn received");
        Self {
            agent_id,
            state: TurnState::Received,
        }
    }

    pub fn state(&self) -> TurnState {
        self.state
    }

    pub fn advance(&mut self, next: TurnState) {
        if !self.state.can_advance_to(next) {
            warn!(agent_id = %self.agent_id, from = %self.state, to = %next, "Unexpected turn transition");
        }
        debug!(agent_id = %self.agent_id, from = %self.state, to = %next, "Turn transition");
        self.state = next;
    }
}

/// What the orchestrator hands back for one turn.
#[derive(Debug, Clone, Serialize)]
pub struct TurnResponse {
    pub message: String,
    pub media: Vec<String>,
    /// The persisted assistant message; `None` when the turn failed.
    pub message_id: Option<MessageId>,
    pub user_message_id: MessageId,
    pub route: TurnRoute,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content_type: Option<ContentType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub intent: Option<Intent>,
    pub state: TurnState,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub usage: Option<Usage>,
}
