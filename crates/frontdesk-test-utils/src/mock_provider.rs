// SPDX-FileCopyrightText: 2026 Frontdesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mock chat provider for deterministic testing.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use frontdesk_core::{ChatMessage, ChatProvider, Completion, FrontdeskError, TextStream, TokenUsage};
use futures::{stream, StreamExt};
use tokio::sync::Mutex;

/// One scripted outcome of a provider call.
#[derive(Debug, Clone, PartialEq)]
pub enum MockReply {
    /// Succeed with this text. Streams deliver it word by word.
    Text(String),
    /// Fail with a provider error before any text.
    ProviderError(String),
    /// Fail with a timeout before any text.
    Timeout,
    /// Stream `partial`, then fail with a provider error.
    StreamError { partial: String, message: String },
    /// Stream `partial`, then never send anything again.
    Stall { partial: String },
}

/// A chat provider that replays queued replies and records every request.
///
/// Replies are popped from a FIFO queue. When the queue is empty the text
/// `"mock response"` is returned.
pub struct MockProvider {
    replies: Arc<Mutex<VecDeque<MockReply>>>,
    requests: Arc<Mutex<Vec<Vec<ChatMessage>>>>,
    open_streams: Arc<AtomicUsize>,
    configured: bool,
    model: String,
}

impl MockProvider {
    pub fn new() -> Self {
        Self {
            replies: Arc::new(Mutex::new(VecDeque::new())),
            requests: Arc::new(Mutex::new(Vec::new())),
            open_streams: Arc::new(AtomicUsize::new(0)),
            configured: true,
            model: "mock/model".to_string(),
        }
    }

    /// A provider pre-loaded with successful text replies.
    pub fn with_responses(responses: Vec<String>) -> Self {
        Self {
            replies: Arc::new(Mutex::new(
                responses.into_iter().map(MockReply::Text).collect(),
            )),
            ..Self::new()
        }
    }

    /// A provider that reports no API key, as when `OPENROUTER_API_KEY` is unset.
    pub fn unconfigured() -> Self {
        Self {
            configured: false,
            ..Self::new()
        }
    }

    pub async fn push_reply(&self, reply: MockReply) {
        self.replies.lock().await.push_back(reply);
    }

    /// Message lists received so far, oldest first.
    pub async fn requests(&self) -> Vec<Vec<ChatMessage>> {
        self.requests.lock().await.clone()
    }

    /// The most recent message list, if any call was made.
    pub async fn last_request(&self) -> Option<Vec<ChatMessage>> {
        self.requests.lock().await.last().cloned()
    }

    /// Streams handed out and not yet dropped.
    pub fn open_streams(&self) -> usize {
        self.open_streams.load(Ordering::SeqCst)
    }

    async fn next_reply(&self, messages: Vec<ChatMessage>) -> Result<MockReply, FrontdeskError> {
        if !self.configured {
            return Err(FrontdeskError::Config(
                "API key not configured. Please set OPENROUTER_API_KEY.".into(),
            ));
        }
        self.requests.lock().await.push(messages);
        Ok(self
            .replies
            .lock()
            .await
            .pop_front()
            .unwrap_or_else(|| MockReply::Text("mock response".to_string())))
    }
}

impl Default for MockProvider {
    fn default() -> Self {
        Self::new()
    }
}

fn words(text: &str) -> Vec<Result<String, FrontdeskError>> {
    text.split_inclusive(' ').map(|w| Ok(w.to_string())).collect()
}

/// Decrements the open-stream count when the stream holding it is dropped.
struct StreamGuard(Arc<AtomicUsize>);

impl StreamGuard {
    fn new(count: &Arc<AtomicUsize>) -> Self {
        count.fetch_add(1, Ordering::SeqCst);
        Self(Arc::clone(count))
    }
}

impl Drop for StreamGuard {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

fn timeout() -> FrontdeskError {
    FrontdeskError::Timeout {
        duration: Duration::from_secs(30),
    }
}

#[async_trait]
impl ChatProvider for MockProvider {
    fn model(&self) -> &str {
        &self.model
    }

    fn is_configured(&self) -> bool {
        self.configured
    }

    async fn complete(&self, messages: Vec<ChatMessage>) -> Result<Completion, FrontdeskError> {
        match self.next_reply(messages).await? {
            MockReply::Text(content) => Ok(Completion {
                content,
                model: self.model.clone(),
                usage: Some(TokenUsage {
                    prompt_tokens: 10,
                    completion_tokens: 20,
                    total_tokens: 30,
                }),
            }),
            MockReply::ProviderError(message) => Err(FrontdeskError::provider(message)),
            MockReply::Timeout => Err(timeout()),
            MockReply::StreamError { message, .. } => Err(FrontdeskError::provider(message)),
            MockReply::Stall { .. } => Err(timeout()),
        }
    }

    async fn stream(&self, messages: Vec<ChatMessage>) -> Result<TextStream, FrontdeskError> {
        let (items, stall) = match self.next_reply(messages).await? {
            MockReply::Text(text) => (words(&text), false),
            MockReply::ProviderError(message) => return Err(FrontdeskError::provider(message)),
            MockReply::Timeout => return Err(timeout()),
            MockReply::StreamError { partial, message } => {
                let mut items = words(&partial);
                items.push(Err(FrontdeskError::provider(message)));
                (items, false)
            }
            MockReply::Stall { partial } => (words(&partial), true),
        };
        let guard = StreamGuard::new(&self.open_streams);
        let head = stream::iter(items);
        let deltas = if stall {
            head.chain(stream::pending()).boxed()
        } else {
            head.boxed()
        };
        Ok(Box::pin(deltas.map(move |item| {
            let _held = &guard;
            item
        })))
    }
}
