// SPDX-FileCopyrightText: 2026 Frontdesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! User input sanitization.
//!
//! Drops control characters, collapses whitespace and removes well-known
//! prompt-injection phrases. HTML escaping happens on output in
//! [`crate::markdown`], so stored transcripts keep the text as typed.

use std::borrow::Cow;
use std::sync::LazyLock;

use regex::Regex;

static INJECTION_PATTERNS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)ignore (?:all )?previous instructions|ignore all instructions|system prompt:|\bjailbreak\b|\bdan mode\b|developer mode:",
    )
    .unwrap()
});

/// Sanitizes a chat message. The result may be empty.
pub fn sanitize_input(text: &str) -> String {
    let cleaned: String = text
        .chars()
        .filter(|c| !c.is_control() || c.is_whitespace())
        .collect();
    let mut sanitized = collapse_whitespace(&cleaned);

    // Removing one phrase can join the halves of another.
    loop {
        let stripped = match INJECTION_PATTERNS.replace_all(&sanitized, "") {
            Cow::Borrowed(_) => break,
            Cow::Owned(stripped) => stripped,
        };
        sanitized = collapse_whitespace(&stripped);
    }

    sanitized
}

fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
