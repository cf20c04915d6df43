// SPDX-FileCopyrightText: 2026 Frontdesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! System prompt loading and message assembly.

use frontdesk_config::{LlmConfig, DEFAULT_SYSTEM_PROMPT};
use frontdesk_core::{ChatMessage, TranscriptEntry};
use tracing::info;

/// Placed between the system prompt and the retrieved sections.
pub const GROUNDING_PREAMBLE: &str = "Use the following university information to answer \
the question. If it does not cover the question, say so and suggest where the user might \
find the answer.";

/// Loads the system prompt following config priority: file > inline > default.
pub async fn load_system_prompt(config: &LlmConfig) -> String {
    if let Some(ref file_path) = config.system_prompt_file {
        match tokio::fs::read_to_string(file_path).await {
            Ok(content) => {
                let trimmed = content.trim();
                if !trimmed.is_empty() {
                    info!(path = file_path.as_str(), "loaded system prompt from file");
                    return trimmed.to_string();
                }
                tracing::warn!(path = file_path.as_str(), "system prompt file is empty, falling back");
            }
            Err(e) => {
                tracing::warn!(
                    path = file_path.as_str(),
                    error = %e,
                    "failed to read system prompt file, falling back"
                );
            }
        }
    }

    if let Some(prompt) = config.system_prompt.as_deref().map(str::trim)
        && !prompt.is_empty()
    {
        return prompt.to_string();
    }

    DEFAULT_SYSTEM_PROMPT.to_string()
}

/// Builds the provider message list for one turn.
///
/// The grounding block, when present, is appended to the system prompt.
/// Only `user` and `assistant` history entries are forwarded.
pub fn build_messages(
    system_prompt: &str,
    grounding: Option<&str>,
    history: &[TranscriptEntry],
    user_message: &str,
) -> Vec<ChatMessage> {
    let system = match grounding {
        Some(block) => format!("{system_prompt}\n\n{GROUNDING_PREAMBLE}\n\n{block}"),
        None => system_prompt.to_string(),
    };

    let mut messages = Vec::with_capacity(history.len() + 2);
    messages.push(ChatMessage::system(system));
    messages.extend(history.iter().filter_map(TranscriptEntry::to_history_message));
    messages.push(ChatMessage::user(user_message));
    messages
}
