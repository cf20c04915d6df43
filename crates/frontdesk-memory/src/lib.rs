// SPDX-FileCopyrightText: 2026 Frontdesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Conversation transcripts for Frontdesk.
//!
//! One JSON file per day at `<dir>/<YYYY-MM-DD>/conversations.json`.
//! Reads are forgiving (missing or corrupt files read as empty), writes go
//! through a temporary file and a rename.

pub mod date;
pub mod store;

pub use date::{format_date, parse_date, today};
pub use store::{ConversationStore, DayTranscript, TRANSCRIPT_FILE};
