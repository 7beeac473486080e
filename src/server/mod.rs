//! Query server: serves the chat page and answers `POST /` queries.

pub mod page;
pub mod rate_limit;

use axum::{
    Json, Router,
    extract::{DefaultBodyLimit, Request, State},
    http::StatusCode,
    middleware::Next,
    response::{Html, IntoResponse},
    routing::{get, post},
};
use std::sync::Arc;
use std::time::Duration;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};
use uuid::Uuid;

use crate::AppState;
use crate::assistant::Assistant;
use crate::config::AppConfig;
use crate::protocol::{ErrorResponse, QueryRequest, QueryResponse};

/// Largest accepted request body.
const MAX_BODY_BYTES: usize = 64 * 1024;

/// Build the application router.
pub fn router(state: AppState) -> Router {
    // Disabling the timeout keeps the layer but makes it unreachable, so the
    // router type stays the same either way.
    let timeout_duration = if state.config.resilience.timeout_disabled {
        Duration::from_secs(365 * 24 * 60 * 60)
    } else {
        Duration::from_secs(state.config.resilience.timeout_secs)
    };

    // Only queries draw from the rate limit bucket; page loads never reach the LLM.
    let query = post(query_handler).route_layer(axum::middleware::from_fn_with_state(
        state.clone(),
        rate_limit::rate_limit_middleware,
    ));

    Router::new()
        .route("/", get(index_handler).merge(query))
        .layer(TraceLayer::new_for_http())
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .layer(axum::middleware::from_fn(
            move |req: Request, next: Next| async move {
                match tokio::time::timeout(timeout_duration, next.run(req)).await {
                    Ok(res) => res,
                    Err(_) => (StatusCode::REQUEST_TIMEOUT, "Request timed out").into_response(),
                }
            },
        ))
        .with_state(state)
}

/// Start the Axum server with the provided configuration.
pub async fn start_server(config: Arc<AppConfig>, assistant: Arc<dyn Assistant>) -> anyhow::Result<()> {
    let state = AppState::new(Arc::clone(&config), assistant);
    let app = router(state);

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    info!(
        name: "server.started",
        address = %addr,
        "Server started"
    );

    axum::serve(listener, app).await?;
    Ok(())
}

// ─────────────────────────────────────────────────────────────────────────────
// Handlers
// ─────────────────────────────────────────────────────────────────────────────

/// GET / - Chat page.
async fn index_handler() -> Html<String> {
    Html(page::chat_page())
}

/// POST / - Answer a chat query.
async fn query_handler(
    State(state): State<AppState>,
    Json(req): Json<QueryRequest>,
) -> Result<Json<QueryResponse>, (StatusCode, Json<ErrorResponse>)> {
    let request_id = Uuid::new_v4();
    info!(
        name: "query.received",
        request_id = %request_id,
        bytes = req.query.len(),
        "Received chat query"
    );

    match state.assistant.answer(&req.query).await {
        Ok(response) => {
            info!(name: "query.answered", request_id = %request_id, bytes = response.len(), "Query answered");
            Ok(Json(QueryResponse { response }))
        }
        Err(e) => {
            warn!(name: "query.failed", request_id = %request_id, error = %e, "Assistant failed");
            Err((
                StatusCode::BAD_GATEWAY,
                Json(ErrorResponse {
                    error: e.to_string(),
                }),
            ))
        }
    }
}
