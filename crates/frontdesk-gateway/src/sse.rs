// SPDX-FileCopyrightText: 2026 Frontdesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Server-Sent Events relay for `POST /api/chat`.
//!
//! SSE event format:
//! ```text
//! event: text_delta
//! data: {"text": "partial content here"}
//!
//! event: message_stop
//! data: {"content": "full content", "html": "...", "timestamp": "...", "sources": [...]}
//!
//! event: error
//! data: {"error": "..."}
//! ```
//!
//! The exchange is recorded before `message_stop` is sent. A stream that
//! ends in `error` is not recorded, and neither is one whose client went
//! away: the relay stops reading from the provider as soon as the response
//! body is dropped.

use std::convert::Infallible;
use std::time::Instant;

use axum::response::sse::{Event, KeepAlive, KeepAliveStream, Sse};
use futures::StreamExt;
use tokio::sync::mpsc;
use tokio_stream::wrappers::ReceiverStream;
use tracing::{debug, info};

use crate::chat::{outcome_label, record_turn, PreparedTurn};
use crate::error::ApiError;
use crate::markdown::render_markdown;
use crate::recording;
use crate::state::GatewayState;

/// Events buffered between the provider task and the client.
const EVENT_BUFFER: usize = 64;

pub type EventStream = ReceiverStream<Result<Event, Infallible>>;

/// Starts the provider stream and relays it to the client.
///
/// Failures before the first delta are returned as a normal JSON error.
pub async fn stream_turn(
    state: GatewayState,
    turn: PreparedTurn,
) -> Result<Sse<KeepAliveStream<EventStream>>, ApiError> {
    let started = Instant::now();
    let mut deltas = match state.provider.stream(turn.messages.clone()).await {
        Ok(deltas) => deltas,
        Err(e) => {
            recording::record_chat(outcome_label(&e), true);
            return Err(e.into());
        }
    };

    let (tx, rx) = mpsc::channel(EVENT_BUFFER);
    tokio::spawn(async move {
        let mut content = String::new();
        loop {
            let item = tokio::select! {
                biased;
                () = tx.closed() => {
                    // Dropping `deltas` closes the upstream request.
                    debug!("client disconnected mid-stream, discarding turn");
                    return;
                }
                item = deltas.next() => item,
            };
            match item {
                None => break,
                Some(Ok(text)) if text.is_empty() => {}
                Some(Ok(text)) => {
                    content.push_str(&text);
                    if tx.send(Ok(text_delta_event(&text))).await.is_err() {
                        debug!("client disconnected mid-stream, discarding turn");
                        return;
                    }
                }
                Some(Err(e)) => {
                    recording::record_chat(outcome_label(&e), true);
                    let err = ApiError::from(e);
                    let _ = tx.send(Ok(error_event(err.message()))).await;
                    return;
                }
            }
        }

        recording::record_latency(started.elapsed().as_secs_f64());
        let timestamp = record_turn(&state, &turn.message, &content, turn.use_memory).await;
        let _ = tx
            .send(Ok(message_stop_event(&content, &timestamp, &turn.sources)))
            .await;
        recording::record_chat("ok", true);
        info!(
            chars = content.len(),
            sources = turn.sources.len(),
            "streamed chat request processed"
        );
    });

    Ok(Sse::new(ReceiverStream::new(rx)).keep_alive(KeepAlive::default()))
}

fn text_delta_event(text: &str) -> Event {
    Event::default()
        .event("text_delta")
        .data(serde_json::json!({ "text": text }).to_string())
}

fn message_stop_event(content: &str, timestamp: &str, sources: &[String]) -> Event {
    let stop = serde_json::json!({
        "content": content,
        "html": render_markdown(content),
        "timestamp": timestamp,
        "sources": sources,
    });
    Event::default().event("message_stop").data(stop.to_string())
}

fn error_event(message: &str) -> Event {
    Event::default()
        .event("error")
        .data(serde_json::json!({ "error": message }).to_string())
}
