// SPDX-FileCopyrightText: 2026 Frontdesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP request handlers.

use axum::body::Body;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Query, State};
use axum::http::header::{ACCEPT, CACHE_CONTROL, CONTENT_TYPE};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{Html, IntoResponse, Response};
use axum::Json;
use frontdesk_core::TranscriptEntry;
use frontdesk_memory::{format_date, parse_date, today};
use serde::{Deserialize, Serialize};

use crate::chat::{self, ChatRequest};
use crate::error::ApiError;
use crate::markdown::strip_markdown;
use crate::recording;
use crate::sse;
use crate::state::GatewayState;

/// The chat page, compiled into the binary.
pub const INDEX_HTML: &str = include_str!("../static/index.html");

/// Query parameters for `GET /api/memory`.
#[derive(Debug, Deserialize)]
pub struct MemoryQuery {
    /// `YYYY-MM-DD`; today when absent or empty.
    pub date: Option<String>,
}

/// Response body for `GET /api/memory`.
#[derive(Debug, Serialize, Deserialize)]
pub struct MemoryResponse {
    pub date: String,
    pub messages: Vec<TranscriptEntry>,
}

/// Response body for `POST /api/reset`.
#[derive(Debug, Serialize, Deserialize)]
pub struct ResetResponse {
    pub success: bool,
    pub message: String,
}

/// Response body for `GET /api/health`.
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub api_key_configured: bool,
    pub memory_dir_exists: bool,
    pub model: String,
    pub knowledge_sections: usize,
    pub knowledge_version: u64,
    pub speech_enabled: bool,
    pub uptime_secs: u64,
}

/// Request body for `POST /api/tts`.
#[derive(Debug, Deserialize)]
pub struct TtsRequest {
    #[serde(default)]
    pub text: String,
}

/// GET / -- the chat page.
pub async fn index() -> Html<&'static str> {
    Html(INDEX_HTML)
}

/// POST /api/chat -- answer one message, as JSON or as an SSE stream.
pub async fn post_chat(
    State(state): State<GatewayState>,
    headers: HeaderMap,
    body: Result<Json<ChatRequest>, JsonRejection>,
) -> Result<Response, ApiError> {
    let Json(request) = body.map_err(json_rejection)?;
    let wants_stream = request.stream || accepts_event_stream(&headers);
    let turn = chat::prepare_turn(&state, request).await?;

    if wants_stream {
        Ok(sse::stream_turn(state, turn).await?.into_response())
    } else {
        Ok(Json(chat::complete_turn(&state, turn).await?).into_response())
    }
}

/// GET /api/memory -- one day's transcript.
pub async fn get_memory(
    State(state): State<GatewayState>,
    Query(query): Query<MemoryQuery>,
) -> Response {
    let date = match query.date.as_deref().filter(|d| !d.is_empty()) {
        Some(raw) => match parse_date(raw) {
            Some(date) => date,
            None => {
                tracing::debug!(date = raw, "rejected memory date");
                let body = serde_json::json!({ "error": "Invalid date format", "messages": [] });
                return (StatusCode::BAD_REQUEST, Json(body)).into_response();
            }
        },
        None => today(),
    };

    let messages = state.store.load_day(date).await;
    Json(MemoryResponse {
        date: format_date(date),
        messages,
    })
    .into_response()
}

/// POST /api/reset -- forget the in-memory conversation.
pub async fn post_reset(State(state): State<GatewayState>) -> Json<ResetResponse> {
    state.conversation.lock().await.clear();
    tracing::info!("conversation reset");
    Json(ResetResponse {
        success: true,
        message: "Conversation reset successfully".to_string(),
    })
}

/// GET /api/health -- liveness plus configuration summary.
pub async fn get_health(State(state): State<GatewayState>) -> Json<HealthResponse> {
    let snapshot = state.knowledge.snapshot();
    Json(HealthResponse {
        status: "healthy".to_string(),
        api_key_configured: state.provider.is_configured(),
        memory_dir_exists: state.store.dir_exists().await,
        model: state.provider.model().to_string(),
        knowledge_sections: snapshot.section_count(),
        knowledge_version: snapshot.version,
        speech_enabled: state.speech.is_some(),
        uptime_secs: state.start_time.elapsed().as_secs(),
    })
}

/// POST /api/tts -- synthesize an answer and stream the audio back.
pub async fn post_tts(
    State(state): State<GatewayState>,
    body: Result<Json<TtsRequest>, JsonRejection>,
) -> Result<Response, ApiError> {
    let Some(speech) = state.speech.clone() else {
        return Err(ApiError::ServiceUnavailable(
            "Text-to-speech is not enabled".to_string(),
        ));
    };
    let Json(request) = body.map_err(json_rejection)?;

    let plain = strip_markdown(&request.text);
    let max_chars = state.config.speech.max_text_length;
    let text: String = plain.chars().take(max_chars).collect();
    if text.trim().is_empty() {
        return Err(ApiError::bad_request("Text cannot be empty"));
    }
    if text.len() < plain.len() {
        tracing::debug!(max_chars, "truncated text for speech");
    }

    let audio = match speech.synthesize(&text).await {
        Ok(audio) => audio,
        Err(e) => {
            recording::record_tts("error");
            return Err(e.into());
        }
    };
    recording::record_tts("ok");

    Ok((
        [
            (CONTENT_TYPE, speech.content_type().to_string()),
            (CACHE_CONTROL, "no-store".to_string()),
        ],
        Body::from_stream(audio),
    )
        .into_response())
}

/// GET /metrics -- Prometheus text exposition.
pub async fn get_metrics(State(state): State<GatewayState>) -> Result<Response, ApiError> {
    let render = state.metrics_render.as_ref().ok_or(ApiError::NotFound)?;
    Ok((
        [(CONTENT_TYPE, "text/plain; version=0.0.4")],
        render(),
    )
        .into_response())
}

/// Fallback for unmatched routes.
pub async fn not_found() -> ApiError {
    ApiError::NotFound
}

fn accepts_event_stream(headers: &HeaderMap) -> bool {
    headers
        .get(ACCEPT)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v.contains("text/event-stream"))
}

fn json_rejection(rejection: JsonRejection) -> ApiError {
    match rejection {
        JsonRejection::MissingJsonContentType(_) => ApiError::bad_request("Request must be JSON"),
        other => {
            tracing::debug!(error = %other, "rejected request body");
            ApiError::bad_request("Invalid JSON body")
        }
    }
}
