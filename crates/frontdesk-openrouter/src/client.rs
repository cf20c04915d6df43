// SPDX-FileCopyrightText: 2026 Frontdesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP client for OpenAI-compatible chat completion APIs.
//!
//! Provides [`OpenRouterClient`], which handles request construction,
//! attribution headers, streaming SSE responses, and a single retry on
//! transient errors.

use std::time::Duration;

use frontdesk_config::LlmConfig;
use frontdesk_core::{FrontdeskError, TextStream};
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use tracing::{debug, warn};

use crate::sse;
use crate::types::{ApiErrorResponse, ChatRequest, ChatResponse};

/// Delay before the single retry of a transient failure.
const RETRY_DELAY: Duration = Duration::from_secs(1);

/// Bound on establishing a connection, separate from the request timeout.
const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// HTTP client for one chat-completions endpoint.
#[derive(Debug, Clone)]
pub struct OpenRouterClient {
    client: reqwest::Client,
    api_url: String,
    timeout: Duration,
    max_retries: u32,
    has_key: bool,
}

impl OpenRouterClient {
    /// Builds a client from the `[llm]` section.
    ///
    /// A missing API key is allowed here; requests then fail with a
    /// configuration error so the gateway can report 503.
    pub fn new(config: &LlmConfig) -> Result<Self, FrontdeskError> {
        let mut headers = HeaderMap::new();
        let has_key = config.has_api_key();
        if let Some(key) = config.api_key.as_deref().filter(|_| has_key) {
            let mut value = HeaderValue::from_str(&format!("Bearer {}", key.trim()))
                .map_err(|e| FrontdeskError::Config(format!("invalid API key header value: {e}")))?;
            value.set_sensitive(true);
            headers.insert(AUTHORIZATION, value);
        }
        headers.insert(
            "HTTP-Referer",
            HeaderValue::from_str(&config.referer)
                .map_err(|e| FrontdeskError::Config(format!("invalid referer header value: {e}")))?,
        );
        headers.insert(
            "X-Title",
            HeaderValue::from_str(&config.app_title)
                .map_err(|e| FrontdeskError::Config(format!("invalid title header value: {e}")))?,
        );
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .connect_timeout(CONNECT_TIMEOUT)
            .build()
            .map_err(|e| FrontdeskError::Provider {
                message: format!("failed to build HTTP client: {e}"),
                source: Some(Box::new(e)),
            })?;

        Ok(Self {
            client,
            api_url: config.api_url.clone(),
            timeout: Duration::from_secs(config.timeout_secs),
            max_retries: 1,
            has_key,
        })
    }

    pub fn has_api_key(&self) -> bool {
        self.has_key
    }

    /// Sends a non-streaming request and returns the parsed response.
    ///
    /// The configured timeout covers the whole exchange.
    pub async fn complete(&self, request: &ChatRequest) -> Result<ChatResponse, FrontdeskError> {
        let mut req = request.clone();
        req.stream = false;

        let response = self.send_with_retry(&req).await?;
        let body = tokio::time::timeout(self.timeout, response.text())
            .await
            .map_err(|_| FrontdeskError::Timeout {
                duration: self.timeout,
            })?
            .map_err(|e| self.transport_error(e))?;

        serde_json::from_str(&body).map_err(|e| FrontdeskError::Provider {
            message: format!("invalid response from API: {e}"),
            source: Some(Box::new(e)),
        })
    }

    /// Sends a streaming request and returns the text deltas.
    ///
    /// The configured timeout covers waiting for the response headers and
    /// then each gap between streamed events.
    pub async fn stream(&self, request: &ChatRequest) -> Result<TextStream, FrontdeskError> {
        let mut req = request.clone();
        req.stream = true;

        let response = self.send_with_retry(&req).await?;
        Ok(sse::parse_sse_stream(response, self.timeout))
    }

    /// POSTs `request`, retrying once after [`RETRY_DELAY`] on a transient status.
    async fn send_with_retry(
        &self,
        request: &ChatRequest,
    ) -> Result<reqwest::Response, FrontdeskError> {
        if !self.has_key {
            return Err(FrontdeskError::Config(
                "API key not configured. Please set OPENROUTER_API_KEY.".into(),
            ));
        }

        let mut last_error = None;

        for attempt in 0..=self.max_retries {
            if attempt > 0 {
                warn!(attempt, "retrying chat request after transient error");
                tokio::time::sleep(RETRY_DELAY).await;
            }

            let send = self.client.post(&self.api_url).json(request).send();
            let response = tokio::time::timeout(self.timeout, send)
                .await
                .map_err(|_| FrontdeskError::Timeout {
                    duration: self.timeout,
                })?
                .map_err(|e| self.transport_error(e))?;

            let status = response.status();
            debug!(status = %status, attempt, stream = request.stream, "chat response received");

            if status.is_success() {
                return Ok(response);
            }

            let body = response.text().await.unwrap_or_default();
            if is_transient_error(status) && attempt < self.max_retries {
                warn!(status = %status, body = %body, "transient error, will retry");
                last_error = Some(FrontdeskError::provider(format!(
                    "API returned {status}: {body}"
                )));
                continue;
            }

            return Err(FrontdeskError::provider(describe_error(status, &body)));
        }

        Err(last_error
            .unwrap_or_else(|| FrontdeskError::provider("chat request failed after retries")))
    }

    fn transport_error(&self, e: reqwest::Error) -> FrontdeskError {
        if e.is_timeout() {
            FrontdeskError::Timeout {
                duration: self.timeout,
            }
        } else {
            FrontdeskError::Provider {
                message: format!("failed to connect to API: {e}"),
                source: Some(Box::new(e)),
            }
        }
    }
}

/// Returns true for HTTP status codes worth one retry.
fn is_transient_error(status: reqwest::StatusCode) -> bool {
    matches!(status.as_u16(), 429 | 500 | 502 | 503)
}

fn describe_error(status: reqwest::StatusCode, body: &str) -> String {
    match serde_json::from_str::<ApiErrorResponse>(body) {
        Ok(api_err) => format!("API error ({status}): {}", api_err.error.message),
        Err(_) => format!("API returned {status}: {body}"),
    }
}
