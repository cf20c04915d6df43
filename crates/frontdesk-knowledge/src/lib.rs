// SPDX-FileCopyrightText: 2026 Frontdesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Knowledge base for Frontdesk.
//!
//! Loads Markdown and text files from a directory, splits them into titled
//! sections, and answers queries with a pure keyword scorer over an
//! immutable snapshot. The loader swaps in a new snapshot when files change,
//! either on demand ([`KnowledgeBase::reload_if_changed`]) or from a
//! filesystem watcher ([`spawn_watcher`]).

pub mod chunker;
pub mod loader;
pub mod retrieval;
pub mod tokenizer;
pub mod types;
pub mod watcher;

pub use chunker::chunk_document;
pub use loader::KnowledgeBase;
pub use retrieval::{
    format_grounding, retrieve, RetrievalConfig, RetrievalResult, RetrievedSection,
};
pub use types::{Document, Section, Snapshot};
pub use watcher::{spawn_watcher, KnowledgeWatcher};
