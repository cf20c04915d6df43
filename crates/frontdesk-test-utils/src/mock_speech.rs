// SPDX-FileCopyrightText: 2026 Frontdesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mock speech synthesizer returning fixed audio bytes.

use std::sync::Arc;

use async_trait::async_trait;
use bytes::Bytes;
use frontdesk_core::{AudioStream, FrontdeskError, SpeechSynthesizer};
use futures::stream;
use tokio::sync::Mutex;

/// Fake MPEG frame header followed by padding.
pub const MOCK_AUDIO: &[u8] = &[0xFF, 0xFB, 0x90, 0x64, 0x00, 0x00, 0x00, 0x00];

/// A synthesizer that streams [`MOCK_AUDIO`] in two chunks, or fails.
pub struct MockSpeech {
    fail_with: Option<String>,
    texts: Arc<Mutex<Vec<String>>>,
}

impl MockSpeech {
    pub fn new() -> Self {
        Self {
            fail_with: None,
            texts: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// A synthesizer whose every call fails with a speech error.
    pub fn failing(message: impl Into<String>) -> Self {
        Self {
            fail_with: Some(message.into()),
            ..Self::new()
        }
    }

    /// Texts received so far.
    pub async fn texts(&self) -> Vec<String> {
        self.texts.lock().await.clone()
    }
}

impl Default for MockSpeech {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SpeechSynthesizer for MockSpeech {
    fn content_type(&self) -> &str {
        "audio/mpeg"
    }

    async fn synthesize(&self, text: &str) -> Result<AudioStream, FrontdeskError> {
        self.texts.lock().await.push(text.to_string());
        if let Some(message) = &self.fail_with {
            return Err(FrontdeskError::speech(message.clone()));
        }
        let (head, tail) = MOCK_AUDIO.split_at(MOCK_AUDIO.len() / 2);
        Ok(Box::pin(stream::iter([
            Ok(Bytes::from_static(head)),
            Ok(Bytes::from_static(tail)),
        ])))
    }
}
