//! Application error type mapping to HTTP status codes and envelope format.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use smartbiz_types::error::{AgentError, ImageError, RepositoryError};
use smartbiz_types::llm::LlmError;

use crate::http::response::ApiResponse;

/// Application-level error that maps to HTTP responses.
#[derive(Debug)]
pub enum AppError {
    /// Errors from the agent service or the orchestrator.
    Agent(AgentError),
    /// Malformed request input caught before reaching a service.
    Validation(String),
}

impl From<AgentError> for AppError {
    fn from(e: AgentError) -> Self {
        AppError::Agent(e)
    }
}

impl From<ImageError> for AppError {
    fn from(e: ImageError) -> Self {
        AppError::Agent(AgentError::Image(e))
    }
}

impl AppError {
    /// Status, machine code, message and optional details for this error.
    fn parts(&self) -> (StatusCode, &'static str, String, Option<serde_json::Value>) {
        let err = match self {
            AppError::Validation(msg) => {
                return (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone(), None);
            }
            AppError::Agent(err) => err,
        };

        let (status, code) = match err {
            AgentError::AgentNotFound => (StatusCode::NOT_FOUND, "AGENT_NOT_FOUND"),
            AgentError::BusinessNotFound => (StatusCode::NOT_FOUND, "BUSINESS_NOT_FOUND"),
            AgentError::MessageNotFound => (StatusCode::NOT_FOUND, "MESSAGE_NOT_FOUND"),
            AgentError::ContentNotFound => (StatusCode::NOT_FOUND, "CONTENT_NOT_FOUND"),
            AgentError::NoBusiness => (StatusCode::CONFLICT, "NO_BUSINESS"),
            AgentError::Validation(msg) => {
                return (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone(), None);
            }
            AgentError::Repository(RepositoryError::NotFound) => (StatusCode::NOT_FOUND, "NOT_FOUND"),
            AgentError::Repository(RepositoryError::Conflict(_)) => (StatusCode::CONFLICT, "CONFLICT"),
            AgentError::Repository(_) => (StatusCode::INTERNAL_SERVER_ERROR, "DATABASE_ERROR"),
            AgentError::Llm(LlmError::Timeout { .. }) => (StatusCode::GATEWAY_TIMEOUT, "PROVIDER_TIMEOUT"),
            AgentError::Llm(LlmError::RateLimited { .. }) => (StatusCode::TOO_MANY_REQUESTS, "RATE_LIMITED"),
            AgentError::Llm(_) => (StatusCode::BAD_GATEWAY, "PROVIDER_ERROR"),
            AgentError::Image(ImageError::Configuration(_)) => {
                (StatusCode::SERVICE_UNAVAILABLE, "CONFIGURATION_ERROR")
            }
            AgentError::Image(ImageError::Generation { payload }) => {
                return (
                    StatusCode::BAD_GATEWAY,
                    "GENERATION_ERROR",
                    err.to_string(),
                    Some(payload.clone()),
                );
            }
            AgentError::Image(ImageError::Decode(_)) => (StatusCode::BAD_REQUEST, "INVALID_IMAGE"),
            AgentError::Image(ImageError::Timeout { .. }) => (StatusCode::GATEWAY_TIMEOUT, "PROVIDER_TIMEOUT"),
            AgentError::Image(_) => (StatusCode::BAD_GATEWAY, "IMAGE_PROVIDER_ERROR"),
        };

        (status, code, err.to_string(), None)
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message, details) = self.parts();

        if status.is_server_error() {
            tracing::error!(code, error = %message, "Request failed");
        } else {
            tracing::debug!(code, error = %message, "Request rejected");
        }

        (status, Json(ApiResponse::error(code, message, details))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn status_of(err: impl Into<AppError>) -> StatusCode {
        err.into().into_response().status()
    }

    #[test]
    fn not_found_variants_map_to_404() {
        assert_eq!(status_of(AgentError::AgentNotFound), StatusCode::NOT_FOUND);
        assert_eq!(status_of(AgentError::BusinessNotFound), StatusCode::NOT_FOUND);
        assert_eq!(status_of(AgentError::ContentNotFound), StatusCode::NOT_FOUND);
    }

    #[test]
    fn validation_maps_to_400() {
        assert_eq!(status_of(AppError::Validation("bad id".into())), StatusCode::BAD_REQUEST);
        assert_eq!(
            status_of(AgentError::Validation("name is required".into())),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            status_of(ImageError::Decode("empty image payload".into())),
            StatusCode::BAD_REQUEST
        );
    }

    #[test]
    fn configuration_error_is_verbatim() {
        let err: AppError = ImageError::Configuration("CLOUDINARY_URL is not set".into()).into();
        let (status, code, message, _) = err.parts();
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(code, "CONFIGURATION_ERROR");
        assert_eq!(message, "CLOUDINARY_URL is not set");
    }

    #[test]
    fn generation_error_carries_payload() {
        let payload = serde_json::json!({"status": "processing", "eta": 12});
        let err: AppError = ImageError::Generation {
            payload: payload.clone(),
        }
        .into();
        let (status, code, _, details) = err.parts();
        assert_eq!(status, StatusCode::BAD_GATEWAY);
        assert_eq!(code, "GENERATION_ERROR");
        assert_eq!(details, Some(payload));
    }

    #[test]
    fn provider_failures_map_to_gateway_codes() {
        assert_eq!(
            status_of(AgentError::Llm(LlmError::Timeout { seconds: 60 })),
            StatusCode::GATEWAY_TIMEOUT
        );
        assert_eq!(
            status_of(AgentError::Llm(LlmError::AuthenticationFailed)),
            StatusCode::BAD_GATEWAY
        );
        assert_eq!(
            status_of(AgentError::Repository(RepositoryError::Query("locked".into()))),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
