// SPDX-FileCopyrightText: 2026 Frontdesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! OpenRouter provider for Frontdesk.
//!
//! Implements [`ChatProvider`] over any OpenAI-compatible chat-completions
//! endpoint, with buffered and SSE streaming responses.

pub mod client;
pub mod sse;
pub mod types;

use async_trait::async_trait;
use frontdesk_config::LlmConfig;
use frontdesk_core::{ChatMessage, ChatProvider, Completion, FrontdeskError, TextStream};
use tracing::info;

use crate::client::OpenRouterClient;
use crate::types::ChatRequest;

/// Chat provider backed by OpenRouter (or any compatible endpoint).
#[derive(Debug, Clone)]
pub struct OpenRouterProvider {
    client: OpenRouterClient,
    model: String,
    temperature: f32,
    max_tokens: u32,
}

impl OpenRouterProvider {
    pub fn new(config: &LlmConfig) -> Result<Self, FrontdeskError> {
        let client = OpenRouterClient::new(config)?;
        info!(
            model = %config.model,
            api_url = %config.api_url,
            configured = client.has_api_key(),
            "OpenRouter provider initialized"
        );
        Ok(Self {
            client,
            model: config.model.clone(),
            temperature: config.temperature,
            max_tokens: config.max_tokens,
        })
    }

    fn request(&self, messages: Vec<ChatMessage>) -> ChatRequest {
        ChatRequest {
            model: self.model.clone(),
            messages,
            temperature: self.temperature,
            max_tokens: self.max_tokens,
            stream: false,
        }
    }
}

#[async_trait]
impl ChatProvider for OpenRouterProvider {
    fn model(&self) -> &str {
        &self.model
    }

    fn is_configured(&self) -> bool {
        self.client.has_api_key()
    }

    async fn complete(&self, messages: Vec<ChatMessage>) -> Result<Completion, FrontdeskError> {
        let response = self.client.complete(&self.request(messages)).await?;
        let model = response.model.unwrap_or_else(|| self.model.clone());
        let choice = response
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| FrontdeskError::provider("invalid response from API: no choices"))?;

        Ok(Completion {
            content: choice.message.content.unwrap_or_default(),
            model,
            usage: response.usage,
        })
    }

    async fn stream(&self, messages: Vec<ChatMessage>) -> Result<TextStream, FrontdeskError> {
        self.client.stream(&self.request(messages)).await
    }
}
