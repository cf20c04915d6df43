// SPDX-FileCopyrightText: 2026 Frontdesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Loads a directory of knowledge files and publishes snapshots.
//!
//! The current snapshot lives behind an [`ArcSwap`]: readers take an
//! `Arc<Snapshot>` and keep it for the whole request while a reload builds
//! the replacement on the side and swaps it in with one store.

use std::collections::BTreeMap;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::SystemTime;

use arc_swap::ArcSwap;

use crate::chunker::chunk_document;
use crate::types::{Document, Snapshot};

/// File extensions treated as knowledge documents.
pub const KNOWLEDGE_EXTENSIONS: &[&str] = &["md", "txt"];

/// Modification time and length of every knowledge file, keyed by path.
type Fingerprint = BTreeMap<PathBuf, (SystemTime, u64)>;

/// The knowledge directory and its latest snapshot.
pub struct KnowledgeBase {
    dir: PathBuf,
    current: ArcSwap<Snapshot>,
    /// `None` until the first scan. Held for the duration of a reload so
    /// concurrent callers never build two snapshots for the same change.
    fingerprint: Mutex<Option<Fingerprint>>,
}

impl KnowledgeBase {
    /// Load every knowledge file in `dir`.
    ///
    /// A missing directory is not an error: the snapshot is empty and a later
    /// reload picks the files up once the directory appears.
    pub fn open(dir: impl Into<PathBuf>) -> Self {
        let dir = dir.into();
        if !dir.is_dir() {
            tracing::warn!(dir = %dir.display(), "knowledge directory not found");
        }
        let kb = Self {
            dir,
            current: ArcSwap::from_pointee(Snapshot::empty()),
            fingerprint: Mutex::new(None),
        };
        kb.reload_if_changed();
        kb
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// The latest published snapshot.
    pub fn snapshot(&self) -> Arc<Snapshot> {
        self.current.load_full()
    }

    /// Rescan the directory and rebuild the snapshot if any file was added,
    /// removed, or modified since the last load.
    ///
    /// Returns whether a new snapshot was published.
    pub fn reload_if_changed(&self) -> bool {
        let mut last = self
            .fingerprint
            .lock()
            .unwrap_or_else(PoisonError::into_inner);

        let scanned = match scan(&self.dir) {
            Ok(scanned) => scanned,
            Err(e) => {
                tracing::error!(dir = %self.dir.display(), error = %e, "failed to scan knowledge directory");
                return false;
            }
        };

        if last.as_ref() == Some(&scanned) {
            return false;
        }

        let version = self.current.load().version + 1;
        let documents = load_documents(&scanned);
        let snapshot = Snapshot::new(documents, version);
        tracing::info!(
            dir = %self.dir.display(),
            files = scanned.len(),
            documents = snapshot.documents.len(),
            sections = snapshot.section_count(),
            version,
            "knowledge base loaded"
        );

        self.current.store(Arc::new(snapshot));
        *last = Some(scanned);
        true
    }
}

impl std::fmt::Debug for KnowledgeBase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KnowledgeBase")
            .field("dir", &self.dir)
            .field("version", &self.current.load().version)
            .finish()
    }
}

/// Whether `path` has a knowledge file extension.
pub fn is_knowledge_file(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| KNOWLEDGE_EXTENSIONS.iter().any(|k| ext.eq_ignore_ascii_case(k)))
}

fn scan(dir: &Path) -> io::Result<Fingerprint> {
    let entries = match std::fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Fingerprint::new()),
        Err(e) => return Err(e),
    };

    let mut fingerprint = Fingerprint::new();
    for entry in entries {
        let path = entry?.path();
        if !is_knowledge_file(&path) {
            continue;
        }
        // Files can vanish between listing and stat; the next scan settles it.
        let Ok(metadata) = std::fs::metadata(&path) else {
            continue;
        };
        if metadata.is_file() {
            let modified = metadata.modified().unwrap_or(SystemTime::UNIX_EPOCH);
            fingerprint.insert(path, (modified, metadata.len()));
        }
    }
    Ok(fingerprint)
}

fn load_documents(fingerprint: &Fingerprint) -> Vec<Document> {
    fingerprint
        .keys()
        .filter_map(|path| {
            let content = match std::fs::read_to_string(path) {
                Ok(content) => content,
                Err(e) => {
                    tracing::error!(path = %path.display(), error = %e, "failed to read knowledge file");
                    return None;
                }
            };
            let id = path
                .file_stem()
                .map(|s| s.to_string_lossy().into_owned())
                .unwrap_or_default();
            let sections = chunk_document(&content, &id);
            if sections.is_empty() {
                tracing::debug!(path = %path.display(), "knowledge file has no usable sections");
            }
            Some(Document { id, sections })
        })
        .collect()
}
