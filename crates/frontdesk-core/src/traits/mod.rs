// SPDX-FileCopyrightText: 2026 Frontdesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Adapter traits implemented by the external-service clients.
//!
//! Both traits use `#[async_trait]` so the gateway can hold them as
//! `Arc<dyn ...>` and swap in mocks under test.

pub mod provider;
pub mod speech;

pub use provider::{ChatProvider, TextStream};
pub use speech::{AudioStream, SpeechSynthesizer};
