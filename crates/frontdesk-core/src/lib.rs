// SPDX-FileCopyrightText: 2026 Frontdesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for Frontdesk.
//!
//! Holds the shared error type, chat/transcript types, and the adapter
//! traits the gateway talks to. Every other crate in the workspace depends
//! on this one and nothing here depends on them.

pub mod error;
pub mod traits;
pub mod types;

pub use error::FrontdeskError;
pub use traits::{AudioStream, ChatProvider, SpeechSynthesizer, TextStream};
pub use types::{ChatMessage, Completion, Role, TokenUsage, TranscriptEntry};
