// SPDX-FileCopyrightText: 2026 Frontdesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! One chat turn: validation, history, grounding, completion, recording.
//!
//! [`prepare_turn`] does everything up to the provider call so the buffered
//! ([`complete_turn`]) and streamed ([`crate::sse::stream_turn`]) paths
//! share it. Both finish through [`record_turn`].

use std::sync::Arc;
use std::time::Instant;

use frontdesk_core::{ChatMessage, FrontdeskError, Role, TranscriptEntry};
use frontdesk_knowledge::{format_grounding, retrieve};
use frontdesk_memory::today;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::error::{ApiError, NOT_CONFIGURED_MESSAGE};
use crate::markdown::render_markdown;
use crate::prompt::build_messages;
use crate::recording;
use crate::sanitize::sanitize_input;
use crate::state::GatewayState;

/// Request body for `POST /api/chat`.
#[derive(Debug, Clone, Deserialize)]
pub struct ChatRequest {
    #[serde(default)]
    pub message: String,
    /// Draw history from the transcript files and append this turn to them.
    #[serde(default = "default_use_memory")]
    pub use_memory: bool,
    /// Relay the answer as Server-Sent Events.
    #[serde(default)]
    pub stream: bool,
}

fn default_use_memory() -> bool {
    true
}

/// Buffered response body for `POST /api/chat`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatResponse {
    /// Raw assistant text (Markdown).
    pub response: String,
    /// `response` rendered to escaped HTML.
    pub html: String,
    pub timestamp: String,
    pub success: bool,
    /// Titles of the knowledge sections used for grounding.
    pub sources: Vec<String>,
}

/// A validated turn ready for the provider.
#[derive(Debug, Clone)]
pub struct PreparedTurn {
    /// Sanitized user message.
    pub message: String,
    pub messages: Vec<ChatMessage>,
    pub sources: Vec<String>,
    pub use_memory: bool,
}

/// Validates the request and assembles the provider messages.
pub async fn prepare_turn(
    state: &GatewayState,
    request: ChatRequest,
) -> Result<PreparedTurn, ApiError> {
    let message = sanitize_input(&request.message);
    if message.is_empty() {
        return Err(ApiError::bad_request("Message cannot be empty"));
    }

    let max_len = state.config.memory.max_message_length;
    if message.chars().count() > max_len {
        return Err(ApiError::bad_request(format!(
            "Message too long. Maximum {max_len} characters."
        )));
    }

    if !state.provider.is_configured() {
        tracing::error!("chat provider API key not configured");
        recording::record_chat("unconfigured", request.stream);
        return Err(ApiError::ServiceUnavailable(
            NOT_CONFIGURED_MESSAGE.to_string(),
        ));
    }

    let history = if request.use_memory {
        let memory = &state.config.memory;
        state
            .store
            .load_recent(today(), memory.recent_days, memory.max_context_messages)
            .await
    } else {
        state.conversation.lock().await.clone()
    };

    refresh_knowledge(state).await;
    let snapshot = state.knowledge.snapshot();
    let result = retrieve(&message, &snapshot, &state.retrieval);
    let grounding = format_grounding(&result);
    debug!(
        sections = result.len(),
        history = history.len(),
        snapshot_version = snapshot.version,
        "assembled chat context"
    );

    let sources = result.titles().into_iter().map(String::from).collect();
    let messages = build_messages(
        &state.system_prompt,
        grounding.as_deref(),
        &history,
        &message,
    );

    Ok(PreparedTurn {
        message,
        messages,
        sources,
        use_memory: request.use_memory,
    })
}

/// Re-scans the knowledge directory when no watcher keeps it current.
async fn refresh_knowledge(state: &GatewayState) {
    if state.watcher_active {
        return;
    }
    let knowledge = Arc::clone(&state.knowledge);
    match tokio::task::spawn_blocking(move || knowledge.reload_if_changed()).await {
        Ok(true) => {
            let sections = state.knowledge.snapshot().section_count();
            info!(sections, "knowledge base reloaded");
            recording::set_knowledge_sections(sections);
        }
        Ok(false) => {}
        Err(e) => warn!(error = %e, "knowledge reload task failed"),
    }
}

/// Calls the provider and waits for the whole answer.
pub async fn complete_turn(
    state: &GatewayState,
    turn: PreparedTurn,
) -> Result<ChatResponse, ApiError> {
    let started = Instant::now();
    let completion = match state.provider.complete(turn.messages).await {
        Ok(completion) => completion,
        Err(e) => {
            recording::record_chat(outcome_label(&e), false);
            return Err(e.into());
        }
    };
    recording::record_latency(started.elapsed().as_secs_f64());
    if let Some(usage) = &completion.usage {
        recording::record_tokens(
            &completion.model,
            usage.prompt_tokens,
            usage.completion_tokens,
        );
    }

    let timestamp = record_turn(state, &turn.message, &completion.content, turn.use_memory).await;
    recording::record_chat("ok", false);
    info!(
        model = %completion.model,
        sources = turn.sources.len(),
        "chat request processed"
    );

    Ok(ChatResponse {
        html: render_markdown(&completion.content),
        response: completion.content,
        timestamp,
        success: true,
        sources: turn.sources,
    })
}

/// Adds the exchange to the in-memory conversation and, when `use_memory`
/// is set, to today's transcript. Returns the shared timestamp.
///
/// Transcript failures are logged; the visitor still gets the answer.
pub async fn record_turn(
    state: &GatewayState,
    message: &str,
    reply: &str,
    use_memory: bool,
) -> String {
    let user = TranscriptEntry::now(Role::User, message);
    let assistant = TranscriptEntry {
        role: Role::Assistant.to_string(),
        content: reply.to_string(),
        timestamp: user.timestamp.clone(),
    };
    let timestamp = user.timestamp.clone();

    {
        let mut conversation = state.conversation.lock().await;
        conversation.push(user.clone());
        conversation.push(assistant.clone());
        let excess = conversation.len().saturating_sub(state.conversation_cap());
        conversation.drain(..excess);
    }

    if use_memory
        && let Err(e) = state.store.append(today(), &[user, assistant]).await
    {
        warn!(error = %e, "failed to save conversation");
    }

    timestamp
}

/// Metric label for a failed provider call.
pub fn outcome_label(err: &FrontdeskError) -> &'static str {
    match err {
        FrontdeskError::Config(_) => "unconfigured",
        FrontdeskError::Timeout { .. } => "timeout",
        FrontdeskError::Provider { .. } => "provider_error",
        _ => "error",
    }
}
