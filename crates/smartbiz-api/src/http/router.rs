//! Axum router configuration with middleware.
//!
//! All routes are under `/api/v1/`.
//! Middleware: CORS, request tracing, request body limit.

use axum::Router;
use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use tower_http::cors::{Any, CorsLayer};
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::trace::TraceLayer;

use crate::http::handlers;
use crate::state::AppState;

/// Largest accepted request body. Chat turns carry inline base64 images.
pub const MAX_BODY_BYTES: usize = 20 * 1024 * 1024;

/// Build the complete API router with all routes and middleware.
pub fn build_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let api_routes = Router::new()
        // Businesses
        .route("/businesses", post(handlers::business::create_business))
        .route(
            "/businesses/{id}",
            get(handlers::business::get_business).put(handlers::business::update_business),
        )
        .route("/businesses/{id}/agents", get(handlers::business::list_agents))
        // Agents
        .route("/agents", post(handlers::agent::create_agent))
        .route(
            "/agents/{id}",
            get(handlers::agent::get_agent).delete(handlers::agent::delete_agent),
        )
        .route("/agents/{id}/memory/refresh", post(handlers::agent::refresh_memory))
        .route("/agents/{id}/memory/notes", post(handlers::agent::add_memory_note))
        // Conversation
        .route("/agents/{id}/chat", post(handlers::chat::chat))
        .route("/agents/{id}/chat/context", post(handlers::chat::chat_with_context))
        .route("/agents/{id}/messages", get(handlers::agent::get_messages))
        .route(
            "/agents/{id}/messages/{message_id}/media",
            post(handlers::agent::attach_message_media),
        )
        // Content studio
        .route(
            "/agents/{id}/content",
            get(handlers::content::list_content).post(handlers::content::generate_content),
        )
        .route(
            "/agents/{id}/content/{content_id}/media",
            post(handlers::content::attach_content_media),
        )
        .route("/agents/{id}/images", post(handlers::content::generate_image));

    Router::new()
        .nest("/api/v1", api_routes)
        .route("/health", get(health_check))
        .layer(DefaultBodyLimit::disable())
        .layer(RequestBodyLimitLayer::new(MAX_BODY_BYTES))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// GET /health - Simple health check endpoint.
async fn health_check() -> axum::Json<serde_json::Value> {
    axum::Json(serde_json::json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    use serde_json::{Value, json};
    use smartbiz_infra::config::{Credentials, OPENAI_API_KEY};
    use tempfile::TempDir;

    /// Serve the router on an ephemeral port against a temp data directory.
    async fn spawn_server() -> (String, TempDir) {
        let dir = TempDir::new().unwrap();
        let credentials =
            Credentials::from_lookup(|name| (name == OPENAI_API_KEY).then(|| "sk-test".to_string()));
        let state = AppState::init_in(dir.path(), &credentials).await.unwrap();

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, build_router(state)).await.unwrap();
        });

        (format!("http://{addr}"), dir)
    }

    async fn call(
        client: &reqwest::Client,
        method: reqwest::Method,
        url: String,
        body: Option<Value>,
    ) -> (u16, Value) {
        let mut request = client.request(method, url);
        if let Some(body) = body {
            request = request.json(&body);
        }
        let response = request.send().await.unwrap();
        let status = response.status().as_u16();
        (status, response.json().await.unwrap())
    }

    async fn create_agent(client: &reqwest::Client, base: &str) -> String {
        let (status, business) = call(
            client,
            reqwest::Method::POST,
            format!("{base}/api/v1/businesses"),
            Some(json!({"name": "Bean There", "industry": "Coffee", "brandTone": "warm"})),
        )
        .await;
        assert_eq!(status, 200);
        let business_id = business["data"]["id"].as_str().unwrap().to_string();

        let (status, agent) = call(
            client,
            reqwest::Method::POST,
            format!("{base}/api/v1/agents"),
            Some(json!({"agentName": "Nova", "businessId": business_id})),
        )
        .await;
        assert_eq!(status, 200);
        assert!(agent["data"]["memory"].as_str().unwrap().contains("- Name: Bean There"));
        agent["data"]["id"].as_str().unwrap().to_string()
    }

    #[tokio::test]
    async fn health_reports_ok() {
        let (base, _dir) = spawn_server().await;
        let body: Value = reqwest::get(format!("{base}/health"))
            .await
            .unwrap()
            .json()
            .await
            .unwrap();
        assert_eq!(body["status"], "ok");
    }

    #[tokio::test]
    async fn agent_lifecycle_and_error_envelopes() {
        let (base, _dir) = spawn_server().await;
        let client = reqwest::Client::new();
        let agent_id = create_agent(&client, &base).await;

        let (status, messages) = call(
            &client,
            reqwest::Method::GET,
            format!("{base}/api/v1/agents/{agent_id}/messages"),
            None,
        )
        .await;
        assert_eq!(status, 200);
        assert_eq!(messages["data"], json!([]));

        let (status, body) = call(
            &client,
            reqwest::Method::GET,
            format!("{base}/api/v1/agents/not-a-uuid"),
            None,
        )
        .await;
        assert_eq!(status, 400);
        assert_eq!(body["errors"][0]["code"], "VALIDATION_ERROR");
        assert!(body["data"].is_null());

        let (status, body) = call(
            &client,
            reqwest::Method::POST,
            format!("{base}/api/v1/agents/{agent_id}/chat"),
            Some(json!({"text": "   "})),
        )
        .await;
        assert_eq!(status, 400);
        assert_eq!(body["errors"][0]["code"], "VALIDATION_ERROR");

        let (status, body) = call(
            &client,
            reqwest::Method::POST,
            format!("{base}/api/v1/agents/{agent_id}/content"),
            Some(json!({"type": "poem", "prompt": "autumn"})),
        )
        .await;
        assert_eq!(status, 400);
        assert_eq!(body["errors"][0]["code"], "VALIDATION_ERROR");

        let (status, _) = call(
            &client,
            reqwest::Method::DELETE,
            format!("{base}/api/v1/agents/{agent_id}"),
            None,
        )
        .await;
        assert_eq!(status, 200);

        let (status, body) = call(
            &client,
            reqwest::Method::GET,
            format!("{base}/api/v1/agents/{agent_id}"),
            None,
        )
        .await;
        assert_eq!(status, 404);
        assert_eq!(body["errors"][0]["code"], "AGENT_NOT_FOUND");
    }

    #[tokio::test]
    async fn generated_image_appears_in_content_and_history() {
        let (base, _dir) = spawn_server().await;
        let client = reqwest::Client::new();
        let agent_id = create_agent(&client, &base).await;

        let (status, generated) = call(
            &client,
            reqwest::Method::POST,
            format!("{base}/api/v1/agents/{agent_id}/images"),
            Some(json!({"prompt": "a red mug"})),
        )
        .await;
        assert_eq!(status, 200);
        let url = generated["data"]["media"][0].as_str().unwrap().to_string();
        assert!(url.starts_with("https://image.pollinations.ai/prompt/"));

        let (_, contents) = call(
            &client,
            reqwest::Method::GET,
            format!("{base}/api/v1/agents/{agent_id}/content?type=image"),
            None,
        )
        .await;
        assert_eq!(contents["data"].as_array().unwrap().len(), 1);
        assert_eq!(contents["data"][0]["media"][0], url.as_str());

        let (_, messages) = call(
            &client,
            reqwest::Method::GET,
            format!("{base}/api/v1/agents/{agent_id}/messages"),
            None,
        )
        .await;
        assert_eq!(messages["data"][0]["role"], "assistant");
        assert_eq!(
            messages["data"][0]["text"],
            "Generated image for: a red mug"
        );
        assert_eq!(messages["data"][0]["media"][0], url.as_str());
    }
}
