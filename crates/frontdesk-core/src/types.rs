// SPDX-FileCopyrightText: 2026 Frontdesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Chat and transcript types shared by the gateway, store, and providers.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Speaker of a chat message.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

/// A single message sent to an LLM provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }
}

/// One line of a persisted conversation transcript.
///
/// `role` is kept as a plain string so transcripts written by other tools
/// (or by hand) still load; use [`TranscriptEntry::role`] to interpret it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranscriptEntry {
    pub role: String,
    pub content: String,
    /// ISO 8601 local timestamp.
    #[serde(default)]
    pub timestamp: String,
}

impl TranscriptEntry {
    /// Creates an entry stamped with the current local time.
    pub fn now(role: Role, content: impl Into<String>) -> Self {
        Self {
            role: role.to_string(),
            content: content.into(),
            timestamp: chrono::Local::now().format("%Y-%m-%dT%H:%M:%S%.6f").to_string(),
        }
    }

    /// Parses the stored role, if it is one Frontdesk understands.
    pub fn role(&self) -> Option<Role> {
        self.role.parse().ok()
    }

    /// Converts to a provider message when the role is `user` or `assistant`.
    ///
    /// System entries and unknown roles never re-enter the prompt as history.
    pub fn to_history_message(&self) -> Option<ChatMessage> {
        match self.role()? {
            Role::User | Role::Assistant => Some(ChatMessage {
                role: self.role()?,
                content: self.content.clone(),
            }),
            Role::System => None,
        }
    }
}

/// Token accounting reported by the provider.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenUsage {
    #[serde(default)]
    pub prompt_tokens: u32,
    #[serde(default)]
    pub completion_tokens: u32,
    #[serde(default)]
    pub total_tokens: u32,
}

/// A complete (non-streamed) provider answer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Completion {
    pub content: String,
    pub model: String,
    pub usage: Option<TokenUsage>,
}
