//! Agent lifecycle, memory and message-log handlers for the REST API.

use axum::Json;
use axum::extract::{Path, State};
use serde::Deserialize;

use smartbiz_types::agent::{Agent, AgentId};
use smartbiz_types::business::BusinessId;
use smartbiz_types::conversation::{Media, MessageId, MessageWithMedia};
use smartbiz_types::memory::MemorySnippet;

use crate::http::error::AppError;
use crate::http::extractors::path::parse_id;
use crate::http::response::{ApiResponse, RequestTimer};
use crate::state::AppState;

/// Body for `POST /agents`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateAgentRequest {
    #[serde(alias = "name")]
    pub agent_name: String,
    pub business_id: Option<BusinessId>,
}

/// Body for `POST /agents/{id}/memory/notes`.
#[derive(Debug, Deserialize)]
pub struct MemoryNoteRequest {
    pub text: String,
}

/// Body for attaching media to a message or content record.
///
/// `source` is a public URL, a `data:` URI or bare base64.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttachMediaRequest {
    pub source: String,
    pub mime_type: Option<String>,
}

/// POST /api/v1/agents - Create an agent, optionally for a business.
pub async fn create_agent(
    State(state): State<AppState>,
    Json(body): Json<CreateAgentRequest>,
) -> Result<Json<ApiResponse<Agent>>, AppError> {
    let timer = RequestTimer::start();

    let agent = state
        .agent_service
        .create_agent(&body.agent_name, body.business_id)
        .await?;
    let self_link = format!("/api/v1/agents/{}", agent.id);
    let chat_link = format!("{self_link}/chat");

    Ok(Json(
        timer
            .respond(agent)
            .with_link("self", &self_link)
            .with_link("chat", &chat_link),
    ))
}

/// GET /api/v1/agents/{id} - Get an agent with its current memory profile.
pub async fn get_agent(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<Agent>>, AppError> {
    let timer = RequestTimer::start();
    let id: AgentId = parse_id(&id, "agent")?;

    let agent = state.agent_service.get_agent(&id).await?;
    Ok(timer.json(agent))
}

/// DELETE /api/v1/agents/{id} - Delete an agent and everything it owns.
pub async fn delete_agent(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<serde_json::Value>>, AppError> {
    let timer = RequestTimer::start();
    let id: AgentId = parse_id(&id, "agent")?;

    state.agent_service.delete_agent(&id).await?;
    Ok(timer.json(serde_json::json!({"deleted": true, "id": id})))
}

/// POST /api/v1/agents/{id}/memory/refresh - Rebuild memory from the business.
pub async fn refresh_memory(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<Agent>>, AppError> {
    let timer = RequestTimer::start();
    let id: AgentId = parse_id(&id, "agent")?;

    let agent = state.agent_service.refresh_agent_memory(&id).await?;
    Ok(timer.json(agent))
}

/// POST /api/v1/agents/{id}/memory/notes - Add a searchable memory note.
pub async fn add_memory_note(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(body): Json<MemoryNoteRequest>,
) -> Result<Json<ApiResponse<MemorySnippet>>, AppError> {
    let timer = RequestTimer::start();
    let id: AgentId = parse_id(&id, "agent")?;

    let snippet = state.agent_service.add_memory_note(&id, &body.text).await?;
    Ok(timer.json(snippet))
}

/// GET /api/v1/agents/{id}/messages - Full conversation log, oldest first.
pub async fn get_messages(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<Vec<MessageWithMedia>>>, AppError> {
    let timer = RequestTimer::start();
    let id: AgentId = parse_id(&id, "agent")?;

    let messages = state.agent_service.get_messages(&id).await?;
    Ok(timer.json(messages))
}

/// POST /api/v1/agents/{id}/messages/{message_id}/media - Attach media to a message.
pub async fn attach_message_media(
    State(state): State<AppState>,
    Path((id, message_id)): Path<(String, String)>,
    Json(body): Json<AttachMediaRequest>,
) -> Result<Json<ApiResponse<Media>>, AppError> {
    let timer = RequestTimer::start();
    let id: AgentId = parse_id(&id, "agent")?;
    let message_id: MessageId = parse_id(&message_id, "message")?;

    let media = state
        .agent_service
        .attach_message_media(&id, &message_id, &body.source, body.mime_type)
        .await?;
    Ok(timer.json(media))
}
