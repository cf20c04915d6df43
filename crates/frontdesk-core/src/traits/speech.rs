// SPDX-FileCopyrightText: 2026 Frontdesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Speech synthesizer trait for text-to-speech proxies.

use std::pin::Pin;

use async_trait::async_trait;
use bytes::Bytes;
use futures_core::Stream;

use crate::error::FrontdeskError;

/// Stream of encoded audio bytes.
pub type AudioStream = Pin<Box<dyn Stream<Item = Result<Bytes, FrontdeskError>> + Send>>;

/// Adapter for text-to-speech APIs.
#[async_trait]
pub trait SpeechSynthesizer: Send + Sync + 'static {
    /// MIME type of the audio produced (e.g. `audio/mpeg`).
    fn content_type(&self) -> &str;

    /// Synthesizes `text` and streams the encoded audio back.
    async fn synthesize(&self, text: &str) -> Result<AudioStream, FrontdeskError>;
}
