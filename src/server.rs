//! Streaming responder: the mock `/chat` endpoint.
//!
//! Validates the chat request, then emits the scripted reply as a sequence
//! of SSE frames on a fixed cadence, closed by exactly one terminal event.

use std::convert::Infallible;
use std::sync::Arc;
use std::time::Duration;

use axum::{
    Json, Router,
    body::Body,
    extract::State,
    http::{HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    routing::post,
};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info;
use uuid::Uuid;

use crate::AppState;
use crate::config::AppConfig;
use crate::framing::encode_frame;
use crate::protocol::{ChatRequest, MODEL_ID, StreamEvent};
use crate::reply::{REPLY_TEXT, chunk_text};

/// Start the axum server with the provided configuration.
pub async fn start_server(config: Arc<AppConfig>) -> anyhow::Result<()> {
    let addr = format!("{}:{}", config.server.host, config.server.port);
    let app = router(AppState { config });

    let listener = tokio::net::TcpListener::bind(&addr).await?;

    info!(
        name: "server.started",
        address = %addr,
        "Mock chat server started"
    );

    axum::serve(listener, app).await?;
    Ok(())
}

/// Build the application router.
#[must_use]
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/chat", post(chat))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// POST /chat - validate the request, then stream the scripted reply.
async fn chat(State(state): State<AppState>, Json(req): Json<ChatRequest>) -> Response {
    if req.messages.len() != 1 || req.model != MODEL_ID {
        tracing::warn!(
            message_count = req.messages.len(),
            model = %req.model,
            "Rejected malformed chat request"
        );
        return (
            StatusCode::BAD_REQUEST,
            Json(serde_json::json!({ "error": "Invalid request format" })),
        )
            .into_response();
    }

    let conversation_id = Uuid::new_v4().simple().to_string();
    info!(
        conversation_id = %conversation_id,
        content_length = req.messages[0].content.len(),
        "Received chat request"
    );

    let chunks: Vec<String> = chunk_text(REPLY_TEXT, state.config.stream.chunk_chars)
        .into_iter()
        .map(str::to_owned)
        .collect();
    let tick = Duration::from_millis(state.config.stream.tick_ms);

    // The interval is owned by the body stream: dropping the response on
    // client disconnect cancels it along with any unsent frames.
    let sse_stream = async_stream::stream! {
        let mut ticks = tokio::time::interval(tick);
        for chunk in &chunks {
            ticks.tick().await;
            let event = StreamEvent::content(&conversation_id, chunk);
            yield Ok::<String, Infallible>(encode_frame(&event));
        }
        ticks.tick().await;
        yield Ok(encode_frame(&StreamEvent::terminal(&conversation_id)));
        tracing::debug!(conversation_id = %conversation_id, "Stream complete");
    };

    build_sse_response(Body::from_stream(sse_stream))
}

fn build_sse_response(body: Body) -> Response {
    let mut resp = Response::new(body);
    let h = resp.headers_mut();
    h.insert("Content-Type", HeaderValue::from_static("text/event-stream"));
    h.insert("Cache-Control", HeaderValue::from_static("no-cache"));
    h.insert("Connection", HeaderValue::from_static("keep-alive"));
    h.insert("X-Accel-Buffering", HeaderValue::from_static("no"));
    resp
}
