//! Conversation turn handlers.
//!
//! `POST /chat` runs the full routing pipeline (intent, content, image).
//! `POST /chat/context` replies with the agent's memory profile and recent
//! history as context.

use axum::Json;
use axum::extract::{Path, State};
use serde::Deserialize;

use smartbiz_core::chat::orchestrator::TurnRequest;
use smartbiz_core::chat::turn::TurnResponse;
use smartbiz_core::image::data_uri;
use smartbiz_types::agent::AgentId;

use crate::http::error::AppError;
use crate::http::extractors::path::parse_id;
use crate::http::response::{ApiResponse, RequestTimer};
use crate::state::AppState;

/// Body for `POST /agents/{id}/chat`.
#[derive(Debug, Default, Deserialize)]
pub struct ChatRequest {
    #[serde(default, alias = "message")]
    pub text: String,
    /// Inline image as a `data:` URI or bare base64.
    pub image: Option<String>,
}

impl ChatRequest {
    fn into_turn(self) -> Result<TurnRequest, AppError> {
        let image = match self.image.as_deref().map(str::trim) {
            None | Some("") => None,
            Some(raw) => Some(data_uri::decode(raw)?),
        };
        Ok(TurnRequest {
            text: self.text,
            image,
        })
    }
}

/// Body for `POST /agents/{id}/chat/context`.
#[derive(Debug, Deserialize)]
pub struct ContextChatRequest {
    #[serde(alias = "message")]
    pub text: String,
}

/// POST /api/v1/agents/{id}/chat - Handle one user turn.
///
/// A failed generation still answers 200 with `state: "failed"` and the
/// error text; the user's message stays persisted.
pub async fn chat(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(body): Json<ChatRequest>,
) -> Result<Json<ApiResponse<TurnResponse>>, AppError> {
    let timer = RequestTimer::start();
    let id: AgentId = parse_id(&id, "agent")?;
    let request = body.into_turn()?;

    let response = state.orchestrator.handle_turn(&id, request).await?;
    Ok(timer.json(response))
}

/// POST /api/v1/agents/{id}/chat/context - Reply with memory and history.
pub async fn chat_with_context(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(body): Json<ContextChatRequest>,
) -> Result<Json<ApiResponse<TurnResponse>>, AppError> {
    let timer = RequestTimer::start();
    let id: AgentId = parse_id(&id, "agent")?;

    let response = state.orchestrator.chat_with_context(&id, &body.text).await?;
    Ok(timer.json(response))
}
