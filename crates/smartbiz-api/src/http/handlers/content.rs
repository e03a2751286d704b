//! Content studio handlers: text drafts, images and their media.

use axum::Json;
use axum::extract::{Path, Query, State};
use serde::Deserialize;

use smartbiz_core::service::agent::{ContentGeneration, ImageGeneration};
use smartbiz_types::agent::AgentId;
use smartbiz_types::conversation::{ContentId, ContentType, ContentWithMedia, Media};

use crate::http::error::AppError;
use crate::http::extractors::path::parse_id;
use crate::http::extractors::query::ContentListQuery;
use crate::http::handlers::agent::AttachMediaRequest;
use crate::http::response::{ApiResponse, RequestTimer};
use crate::state::AppState;

/// Body for `POST /agents/{id}/content`.
#[derive(Debug, Deserialize)]
pub struct GenerateContentRequest {
    #[serde(rename = "type")]
    pub content_type: String,
    pub prompt: String,
}

/// Body for `POST /agents/{id}/images`.
#[derive(Debug, Deserialize)]
pub struct GenerateImageRequest {
    pub prompt: String,
}

/// POST /api/v1/agents/{id}/content - Generate one text draft.
pub async fn generate_content(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(body): Json<GenerateContentRequest>,
) -> Result<Json<ApiResponse<ContentGeneration>>, AppError> {
    let timer = RequestTimer::start();
    let id: AgentId = parse_id(&id, "agent")?;
    let content_type: ContentType = body.content_type.parse().map_err(AppError::Validation)?;

    let generated = state
        .agent_service
        .generate_content(&id, content_type, &body.prompt)
        .await?;
    Ok(timer.json(generated))
}

/// GET /api/v1/agents/{id}/content - Stored content, newest first.
pub async fn list_content(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(query): Query<ContentListQuery>,
) -> Result<Json<ApiResponse<Vec<ContentWithMedia>>>, AppError> {
    let timer = RequestTimer::start();
    let id: AgentId = parse_id(&id, "agent")?;
    let content_type = query.content_type()?;

    let contents = state
        .agent_service
        .list_content(&id, content_type, query.limit)
        .await?;
    Ok(timer.json(contents))
}

/// POST /api/v1/agents/{id}/content/{content_id}/media - Attach media to content.
pub async fn attach_content_media(
    State(state): State<AppState>,
    Path((id, content_id)): Path<(String, String)>,
    Json(body): Json<AttachMediaRequest>,
) -> Result<Json<ApiResponse<Media>>, AppError> {
    let timer = RequestTimer::start();
    let id: AgentId = parse_id(&id, "agent")?;
    let content_id: ContentId = parse_id(&content_id, "content")?;

    let media = state
        .agent_service
        .attach_content_media(&id, &content_id, &body.source, body.mime_type)
        .await?;
    Ok(timer.json(media))
}

/// POST /api/v1/agents/{id}/images - Generate an image from a prompt.
pub async fn generate_image(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(body): Json<GenerateImageRequest>,
) -> Result<Json<ApiResponse<ImageGeneration>>, AppError> {
    let timer = RequestTimer::start();
    let id: AgentId = parse_id(&id, "agent")?;

    let generated = state.agent_service.generate_image(&id, &body.prompt).await?;
    Ok(timer.json(generated))
}
