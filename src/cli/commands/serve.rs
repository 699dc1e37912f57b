//! HTTP API server.
//!
//! Exposes the research pipeline as a single JSON endpoint.

use crate::agent::ResearchAgent;
use crate::cli::Output;
use crate::config::Settings;
use crate::schema::ResearchResponse;
use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tracing::{error, info};

/// Path of the research endpoint.
pub const RESEARCH_ROUTE: &str = "/api/v1/get_llm_response";

const QUERY_REQUIRED: &str = "Query Required!!";

/// Shared application state.
pub struct AppState {
    agent: ResearchAgent,
}

impl AppState {
    pub fn new(agent: ResearchAgent) -> Self {
        Self { agent }
    }
}

/// Build the API router.
pub fn router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(health))
        .route(RESEARCH_ROUTE, post(get_llm_response))
        .layer(cors)
        .with_state(state)
}

/// Run the HTTP API server.
pub async fn run_serve(
    host: Option<String>,
    port: Option<u16>,
    settings: Settings,
) -> anyhow::Result<()> {
    let agent = ResearchAgent::from_settings(&settings)?;
    let state = Arc::new(AppState::new(agent));
    let app = router(state);

    let host = host.unwrap_or_else(|| settings.server.host.clone());
    let port = port.unwrap_or(settings.server.port);
    let addr = format!("{}:{}", host, port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    Output::header("Scout API Server");
    println!();
    Output::success(&format!("Listening on http://{}", addr));
    println!();
    println!("Endpoints:");
    Output::kv("Health", "GET  /health");
    Output::kv("Research", &format!("POST {}", RESEARCH_ROUTE));
    println!();
    Output::info("Press Ctrl+C to stop the server.");

    axum::serve(listener, app).await?;

    Ok(())
}

// === Request/Response Types ===

#[derive(Deserialize)]
struct QueryRequest {
    #[serde(default)]
    query: Option<String>,
}

#[derive(Serialize)]
struct QueryResponse {
    response: ResearchResponse,
}

#[derive(Serialize)]
struct ErrorResponse {
    #[serde(rename = "Error")]
    error: String,
}

fn error_response(status: StatusCode, message: String) -> Response {
    (status, Json(ErrorResponse { error: message })).into_response()
}

// === Handlers ===

async fn health() -> impl IntoResponse {
    Json(serde_json::json!({ "status": "ok" }))
}

async fn get_llm_response(
    State(state): State<Arc<AppState>>,
    req: Result<Json<QueryRequest>, JsonRejection>,
) -> Response {
    let Json(req) = match req {
        Ok(req) => req,
        Err(rejection) => return error_response(rejection.status(), rejection.body_text()),
    };
    let query = req.query.unwrap_or_default();
    if query.trim().is_empty() {
        return error_response(StatusCode::NOT_FOUND, QUERY_REQUIRED.to_string());
    }

    info!("Research request: {}", query);

    match state.agent.research(&query).await {
        Ok(response) => (StatusCode::OK, Json(QueryResponse { response })).into_response(),
        Err(e) => {
            error!("Research failed: {}", e);
            error_response(StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agent::{ChatMessage, ChatModel, ModelTurn};
    use crate::config::AgentSettings;
    use crate::error::{Result, ScoutError};
    use crate::tools::{ToolDefinition, ToolRegistry};
    use async_trait::async_trait;
    use serde_json::{json, Value};

    /// Model that always answers with the same text, or always fails.
    struct FixedModel(Option<&'static str>);

    #[async_trait]
    impl ChatModel for FixedModel {
        fn name(&self) -> &str {
            "fixed"
        }

        async fn complete(
            &self,
            _messages: &[ChatMessage],
            _tools: &[ToolDefinition],
        ) -> Result<ModelTurn> {
            match self.0 {
                Some(answer) => Ok(ModelTurn::answer(answer)),
                None => Err(ScoutError::OpenAI("connection refused".to_string())),
            }
        }
    }

    async fn spawn_server(model: FixedModel) -> String {
        let agent = ResearchAgent::new(
            Arc::new(model),
            ToolRegistry::empty(),
            &AgentSettings::default(),
        );
        let app = router(Arc::new(AppState::new(agent)));

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{}{}", addr, RESEARCH_ROUTE)
    }

    async fn post(url: &str, body: Value) -> (StatusCode, Value) {
        let response = reqwest::Client::new()
            .post(url)
            .json(&body)
            .send()
            .await
            .unwrap();
        let status = StatusCode::from_u16(response.status().as_u16()).unwrap();
        (status, response.json().await.unwrap())
    }

    const ANSWER: &str = r#"{"topic": "Tides", "summary": "The moon pulls the oceans.", "sources": ["https://en.wikipedia.org/wiki/Tide"], "tools_used": ["wikipedia"]}"#;

    #[tokio::test]
    async fn test_successful_query() {
        let url = spawn_server(FixedModel(Some(ANSWER))).await;
        let (status, body) = post(&url, json!({"query": "What causes tides?"})).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["response"]["topic"], "Tides");
        assert_eq!(body["response"]["summary"], "The moon pulls the oceans.");
        assert!(body["response"]["sources"].is_array());
        assert_eq!(body["response"]["tools_used"], json!(["wikipedia"]));
    }

    #[tokio::test]
    async fn test_missing_or_empty_query() {
        let url = spawn_server(FixedModel(Some(ANSWER))).await;

        for body in [json!({}), json!({"query": ""}), json!({"query": "   "})] {
            let (status, body) = post(&url, body).await;
            assert_eq!(status, StatusCode::NOT_FOUND);
            assert_eq!(body, json!({"Error": "Query Required!!"}));
        }
    }

    #[tokio::test]
    async fn test_malformed_body_keeps_error_shape() {
        let url = spawn_server(FixedModel(Some(ANSWER))).await;

        let (status, body) = post(&url, json!({"query": 5})).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert!(body["Error"].is_string());

        let response = reqwest::Client::new()
            .post(&url)
            .header("content-type", "application/json")
            .body("not json")
            .send()
            .await
            .unwrap();
        assert_eq!(response.status().as_u16(), 400);
        let body: Value = response.json().await.unwrap();
        assert!(body["Error"].is_string());
    }

    #[tokio::test]
    async fn test_model_failure_is_500() {
        let url = spawn_server(FixedModel(None)).await;
        let (status, body) = post(&url, json!({"query": "What causes tides?"})).await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(body["Error"].as_str().unwrap().contains("connection refused"));
    }

    #[tokio::test]
    async fn test_unparseable_answer_is_500() {
        let url = spawn_server(FixedModel(Some("Tides are caused by the moon."))).await;
        let (status, body) = post(&url, json!({"query": "What causes tides?"})).await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(body["Error"]
            .as_str()
            .unwrap()
            .starts_with("Failed to parse ResearchResponse"));
    }

    #[tokio::test]
    async fn test_health() {
        let url = spawn_server(FixedModel(Some(ANSWER))).await;
        let health_url = url.replace(RESEARCH_ROUTE, "/health");
        let body: Value = reqwest::get(&health_url).await.unwrap().json().await.unwrap();
        assert_eq!(body["status"], "ok");
    }
}
