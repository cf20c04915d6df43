// SPDX-FileCopyrightText: 2026 Frontdesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Text-to-speech proxy for Frontdesk.
//!
//! Forwards text to an ElevenLabs-style streaming endpoint
//! (`POST {api_url}/{voice_id}/stream`) and relays the encoded audio bytes
//! without buffering them.

use std::time::Duration;

use async_trait::async_trait;
use frontdesk_config::SpeechConfig;
use frontdesk_core::{AudioStream, FrontdeskError, SpeechSynthesizer};
use futures::stream::StreamExt;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, CONTENT_TYPE};
use serde::Serialize;
use tracing::{debug, info};

/// MIME type requested from and relayed for the TTS API.
pub const AUDIO_MPEG: &str = "audio/mpeg";

/// Longest upstream error body echoed into an error message.
const MAX_ERROR_BODY: usize = 300;

#[derive(Debug, Serialize)]
struct SynthesisRequest<'a> {
    text: &'a str,
    model_id: &'a str,
}

/// Streaming text-to-speech client.
#[derive(Debug, Clone)]
pub struct SpeechClient {
    client: reqwest::Client,
    endpoint: String,
    model_id: String,
    timeout: Duration,
}

impl SpeechClient {
    /// Builds a client from the `[speech]` section. Requires an API key.
    pub fn new(config: &SpeechConfig) -> Result<Self, FrontdeskError> {
        let key = config
            .api_key
            .as_deref()
            .map(str::trim)
            .filter(|k| !k.is_empty())
            .ok_or_else(|| {
                FrontdeskError::Config("speech API key not configured. Please set TTS_API_KEY.".into())
            })?;

        let mut headers = HeaderMap::new();
        let mut value = HeaderValue::from_str(key)
            .map_err(|e| FrontdeskError::Config(format!("invalid speech API key header value: {e}")))?;
        value.set_sensitive(true);
        headers.insert("xi-api-key", value);
        headers.insert(ACCEPT, HeaderValue::from_static(AUDIO_MPEG));
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .connect_timeout(Duration::from_secs(10))
            .build()
            .map_err(|e| FrontdeskError::Speech {
                message: format!("failed to build HTTP client: {e}"),
                source: Some(Box::new(e)),
            })?;

        let endpoint = format!(
            "{}/{}/stream",
            config.api_url.trim_end_matches('/'),
            config.voice_id
        );
        info!(endpoint = %endpoint, model = %config.model_id, "speech client initialized");

        Ok(Self {
            client,
            endpoint,
            model_id: config.model_id.clone(),
            timeout: Duration::from_secs(config.timeout_secs),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl SpeechSynthesizer for SpeechClient {
    fn content_type(&self) -> &str {
        AUDIO_MPEG
    }

    async fn synthesize(&self, text: &str) -> Result<AudioStream, FrontdeskError> {
        let body = SynthesisRequest {
            text,
            model_id: &self.model_id,
        };
        let send = self.client.post(&self.endpoint).json(&body).send();
        let response = tokio::time::timeout(self.timeout, send)
            .await
            .map_err(|_| FrontdeskError::Timeout {
                duration: self.timeout,
            })?
            .map_err(|e| {
                if e.is_timeout() {
                    FrontdeskError::Timeout {
                        duration: self.timeout,
                    }
                } else {
                    FrontdeskError::Speech {
                        message: format!("failed to connect to speech API: {e}"),
                        source: Some(Box::new(e)),
                    }
                }
            })?;

        let status = response.status();
        debug!(status = %status, chars = text.chars().count(), "speech response received");
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let body: String = body.chars().take(MAX_ERROR_BODY).collect();
            return Err(FrontdeskError::speech(format!(
                "speech API returned {status}: {body}"
            )));
        }

        let audio = response.bytes_stream().map(|chunk| {
            chunk.map_err(|e| FrontdeskError::Speech {
                message: format!("audio stream interrupted: {e}"),
                source: Some(Box::new(e)),
            })
        });
        Ok(Box::pin(audio))
    }
}
