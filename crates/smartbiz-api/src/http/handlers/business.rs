//! Business profile handlers for the REST API.

use axum::Json;
use axum::extract::{Path, State};

use smartbiz_types::agent::Agent;
use smartbiz_types::business::{Business, BusinessId, BusinessPatch};

use crate::http::error::AppError;
use crate::http::extractors::path::parse_id;
use crate::http::response::{ApiResponse, RequestTimer};
use crate::state::AppState;

/// POST /api/v1/businesses - Create a business profile.
pub async fn create_business(
    State(state): State<AppState>,
    Json(body): Json<BusinessPatch>,
) -> Result<Json<ApiResponse<Business>>, AppError> {
    let timer = RequestTimer::start();

    let business = state.agent_service.create_business(body).await?;
    let self_link = format!("/api/v1/businesses/{}", business.id);
    let agents_link = format!("{self_link}/agents");

    Ok(Json(
        timer
            .respond(business)
            .with_link("self", &self_link)
            .with_link("agents", &agents_link),
    ))
}

/// GET /api/v1/businesses/{id} - Get a business profile.
pub async fn get_business(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<Business>>, AppError> {
    let timer = RequestTimer::start();
    let id: BusinessId = parse_id(&id, "business")?;

    let business = state.agent_service.get_business(&id).await?;
    Ok(timer.json(business))
}

/// PUT /api/v1/businesses/{id} - Patch a business profile.
///
/// Every agent owned by the business gets a regenerated memory profile.
pub async fn update_business(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(body): Json<BusinessPatch>,
) -> Result<Json<ApiResponse<Business>>, AppError> {
    let timer = RequestTimer::start();
    let id: BusinessId = parse_id(&id, "business")?;

    let business = state.agent_service.update_business(&id, body).await?;
    Ok(timer.json(business))
}

/// GET /api/v1/businesses/{id}/agents - Agents acting for a business.
pub async fn list_agents(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<Vec<Agent>>>, AppError> {
    let timer = RequestTimer::start();
    let id: BusinessId = parse_id(&id, "business")?;

    let agents = state.agent_service.list_agents_for_business(&id).await?;
    Ok(timer.json(agents))
}
