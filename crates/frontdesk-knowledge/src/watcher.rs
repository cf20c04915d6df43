// SPDX-FileCopyrightText: 2026 Frontdesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Filesystem watcher that reloads the knowledge base on change.

use std::sync::Arc;
use std::time::Duration;

use frontdesk_core::FrontdeskError;
use notify::{RecommendedWatcher, RecursiveMode, Watcher};
use notify_debouncer_mini::{new_debouncer, DebounceEventResult, Debouncer};

use crate::loader::{is_knowledge_file, KnowledgeBase};

/// Keeps the watcher alive; dropping it stops watching.
pub struct KnowledgeWatcher {
    _debouncer: Debouncer<RecommendedWatcher>,
}

impl std::fmt::Debug for KnowledgeWatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KnowledgeWatcher").finish_non_exhaustive()
    }
}

/// Watch the knowledge directory and call
/// [`KnowledgeBase::reload_if_changed`] after each debounced batch of events
/// touching a knowledge file.
pub fn spawn_watcher(
    kb: Arc<KnowledgeBase>,
    debounce: Duration,
) -> Result<KnowledgeWatcher, FrontdeskError> {
    let dir = kb.dir().to_path_buf();
    let handler_kb = Arc::clone(&kb);

    let mut debouncer = new_debouncer(debounce, move |result: DebounceEventResult| {
        match result {
            Ok(events) => {
                if events.iter().any(|e| is_knowledge_file(&e.path)) {
                    handler_kb.reload_if_changed();
                }
            }
            Err(e) => tracing::warn!(error = ?e, "knowledge watcher error"),
        }
    })
    .map_err(|e| FrontdeskError::Knowledge {
        message: "failed to create knowledge watcher".to_string(),
        source: Some(Box::new(e)),
    })?;

    debouncer
        .watcher()
        .watch(&dir, RecursiveMode::NonRecursive)
        .map_err(|e| FrontdeskError::Knowledge {
            message: format!("failed to watch {}", dir.display()),
            source: Some(Box::new(e)),
        })?;

    tracing::info!(dir = %dir.display(), debounce_ms = debounce.as_millis() as u64, "watching knowledge directory");
    Ok(KnowledgeWatcher {
        _debouncer: debouncer,
    })
}
