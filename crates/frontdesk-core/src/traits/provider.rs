// SPDX-FileCopyrightText: 2026 Frontdesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Chat provider trait for LLM integrations.

use std::pin::Pin;

use async_trait::async_trait;
use futures_core::Stream;

use crate::error::FrontdeskError;
use crate::types::{ChatMessage, Completion};

/// Stream of text deltas produced by a streaming completion.
pub type TextStream = Pin<Box<dyn Stream<Item = Result<String, FrontdeskError>> + Send>>;

/// Adapter for chat-completion APIs.
///
/// Implementations handle authentication and wire format; the gateway only
/// ever sees fully assembled message lists and plain text back.
#[async_trait]
pub trait ChatProvider: Send + Sync + 'static {
    /// Returns the model identifier requests are sent to.
    fn model(&self) -> &str;

    /// Whether credentials are present. Unconfigured providers fail every call.
    fn is_configured(&self) -> bool;

    /// Sends the conversation and waits for the full answer.
    async fn complete(&self, messages: Vec<ChatMessage>) -> Result<Completion, FrontdeskError>;

    /// Sends the conversation and returns the answer as incremental text deltas.
    async fn stream(&self, messages: Vec<ChatMessage>) -> Result<TextStream, FrontdeskError>;
}
