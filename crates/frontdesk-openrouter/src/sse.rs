// SPDX-FileCopyrightText: 2026 Frontdesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! SSE stream parser for streaming chat completions.
//!
//! Each `data:` line carries a JSON chunk whose first choice holds a text
//! delta. `data: [DONE]` ends the stream. Comment lines (OpenRouter sends
//! `: OPENROUTER PROCESSING` keep-alives) are dropped by `eventsource-stream`.

use std::time::Duration;

use eventsource_stream::Eventsource;
use frontdesk_core::{FrontdeskError, TextStream};
use futures::stream::{self, StreamExt};

use crate::types::StreamChunk;

/// Payload that terminates a stream.
pub const DONE_MARKER: &str = "[DONE]";

enum Frame {
    Text(String),
    Skip,
    Done,
    Failed(FrontdeskError),
}

/// Turn a successful streaming response into a stream of text deltas.
///
/// Every event must arrive within `idle_timeout` of the previous one. A stall
/// yields [`FrontdeskError::Timeout`], and a body that ends before
/// `data: [DONE]` yields a provider error. Either error ends the stream.
pub fn parse_sse_stream(response: reqwest::Response, idle_timeout: Duration) -> TextStream {
    let events = Box::pin(response.bytes_stream().eventsource());

    let texts = stream::unfold(Some(events), move |state| async move {
        let Some(mut events) = state else {
            return None;
        };
        loop {
            let frame = match tokio::time::timeout(idle_timeout, events.next()).await {
                Err(_) => {
                    tracing::warn!(
                        idle_ms = idle_timeout.as_millis() as u64,
                        "chat stream stalled"
                    );
                    Frame::Failed(FrontdeskError::Timeout {
                        duration: idle_timeout,
                    })
                }
                Ok(Some(Ok(event))) => parse_data(event.data.trim()),
                Ok(Some(Err(e))) => {
                    Frame::Failed(FrontdeskError::provider(format!("SSE stream error: {e}")))
                }
                Ok(None) => Frame::Failed(FrontdeskError::provider(
                    "stream ended before the completion finished",
                )),
            };
            match frame {
                Frame::Text(text) => return Some((Ok(text), Some(events))),
                Frame::Skip => continue,
                Frame::Done => return None,
                // Stop after the first error so callers see it exactly once.
                Frame::Failed(e) => return Some((Err(e), None)),
            }
        }
    });

    Box::pin(texts)
}

fn parse_data(data: &str) -> Frame {
    if data == DONE_MARKER {
        return Frame::Done;
    }
    if data.is_empty() {
        return Frame::Skip;
    }
    match serde_json::from_str::<StreamChunk>(data) {
        Ok(chunk) => {
            if let Some(error) = chunk.error {
                return Frame::Failed(FrontdeskError::provider(format!(
                    "stream error from API: {}",
                    error.message
                )));
            }
            match chunk
                .choices
                .into_iter()
                .next()
                .and_then(|choice| choice.delta.content)
            {
                Some(text) if !text.is_empty() => Frame::Text(text),
                _ => Frame::Skip,
            }
        }
        Err(e) => {
            tracing::debug!(error = %e, "skipping unparseable stream chunk");
            Frame::Skip
        }
    }
}
