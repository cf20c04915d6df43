// SPDX-FileCopyrightText: 2026 Frontdesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Per-day transcript files.

use std::io;
use std::path::{Path, PathBuf};

use chrono::{Days, NaiveDate};
use frontdesk_core::{FrontdeskError, TranscriptEntry};
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;

use crate::date::format_date;

/// File name inside each day directory.
pub const TRANSCRIPT_FILE: &str = "conversations.json";

/// On-disk shape of one day's transcript.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DayTranscript {
    pub date: String,
    #[serde(default)]
    pub messages: Vec<TranscriptEntry>,
}

/// Reads and appends per-day transcript files under one directory.
#[derive(Debug)]
pub struct ConversationStore {
    dir: PathBuf,
    /// Serializes read-modify-write cycles across concurrent requests.
    write_lock: Mutex<()>,
}

impl ConversationStore {
    /// Open the store, creating `dir` if needed.
    pub async fn open(dir: impl Into<PathBuf>) -> Result<Self, FrontdeskError> {
        let dir = dir.into();
        tokio::fs::create_dir_all(&dir)
            .await
            .map_err(FrontdeskError::storage)?;
        tracing::debug!(dir = %dir.display(), "conversation store opened");
        Ok(Self {
            dir,
            write_lock: Mutex::new(()),
        })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Whether the store directory currently exists.
    pub async fn dir_exists(&self) -> bool {
        tokio::fs::metadata(&self.dir)
            .await
            .is_ok_and(|m| m.is_dir())
    }

    /// Path of the transcript file for `date`.
    pub fn day_path(&self, date: NaiveDate) -> PathBuf {
        self.dir.join(format_date(date)).join(TRANSCRIPT_FILE)
    }

    /// Messages recorded on `date`.
    ///
    /// A missing file reads as no messages. An unreadable or corrupt file is
    /// logged and also reads as no messages.
    pub async fn load_day(&self, date: NaiveDate) -> Vec<TranscriptEntry> {
        let path = self.day_path(date);
        match read_transcript(&path).await {
            Ok(Some(day)) => day.messages,
            Ok(None) => Vec::new(),
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "ignoring unreadable transcript");
                Vec::new()
            }
        }
    }

    /// Append `entries` to the transcript for `date`.
    ///
    /// An existing file that is not a valid transcript is replaced rather
    /// than appended to. Any other read failure is returned and the file is
    /// left alone.
    pub async fn append(
        &self,
        date: NaiveDate,
        entries: &[TranscriptEntry],
    ) -> Result<(), FrontdeskError> {
        if entries.is_empty() {
            return Ok(());
        }
        let _guard = self.write_lock.lock().await;

        let path = self.day_path(date);
        let mut day = match read_transcript(&path).await {
            Ok(Some(day)) => day,
            Ok(None) => DayTranscript::default(),
            Err(e) if e.kind() == io::ErrorKind::InvalidData => {
                tracing::warn!(path = %path.display(), error = %e, "replacing corrupt transcript");
                DayTranscript::default()
            }
            Err(e) => return Err(FrontdeskError::storage(e)),
        };
        day.date = format_date(date);
        day.messages.extend_from_slice(entries);

        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(FrontdeskError::storage)?;
        }
        let json = serde_json::to_string_pretty(&day).map_err(FrontdeskError::storage)?;
        write_atomically(&path, json.as_bytes())
            .await
            .map_err(FrontdeskError::storage)?;

        tracing::debug!(
            date = %day.date,
            appended = entries.len(),
            total = day.messages.len(),
            "transcript saved"
        );
        Ok(())
    }

    /// The last `max_messages` messages from the `days` days ending at `today`.
    ///
    /// Days are read oldest first so the tail is always the most recent talk.
    pub async fn load_recent(
        &self,
        today: NaiveDate,
        days: u32,
        max_messages: usize,
    ) -> Vec<TranscriptEntry> {
        let mut messages = Vec::new();
        for back in (0..days).rev() {
            let Some(date) = today.checked_sub_days(Days::new(u64::from(back))) else {
                continue;
            };
            messages.extend(self.load_day(date).await);
        }
        let skip = messages.len().saturating_sub(max_messages);
        messages.split_off(skip)
    }
}

async fn read_transcript(path: &Path) -> io::Result<Option<DayTranscript>> {
    let raw = match tokio::fs::read(path).await {
        Ok(raw) => raw,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(e),
    };
    serde_json::from_slice(&raw)
        .map(Some)
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))
}

async fn write_atomically(path: &Path, contents: &[u8]) -> io::Result<()> {
    let tmp = path.with_extension("json.tmp");
    tokio::fs::write(&tmp, contents).await?;
    if let Err(e) = tokio::fs::rename(&tmp, path).await {
        let _ = tokio::fs::remove_file(&tmp).await;
        return Err(e);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use frontdesk_core::Role;
    use tracing_test::traced_test;

    #[tokio::test]
    #[traced_test]
    async fn corrupt_file_is_logged_and_read_as_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = ConversationStore::open(dir.path()).await.unwrap();
        let date = NaiveDate::from_ymd_opt(2026, 5, 4).unwrap();

        let path = store.day_path(date);
        tokio::fs::create_dir_all(path.parent().unwrap()).await.unwrap();
        tokio::fs::write(&path, b"{not json").await.unwrap();

        assert!(store.load_day(date).await.is_empty());
        assert!(logs_contain("ignoring unreadable transcript"));
    }

    #[tokio::test]
    async fn append_replaces_corrupt_file() {
        let dir = tempfile::tempdir().unwrap();
        let store = ConversationStore::open(dir.path()).await.unwrap();
        let date = NaiveDate::from_ymd_opt(2026, 5, 4).unwrap();

        let path = store.day_path(date);
        tokio::fs::create_dir_all(path.parent().unwrap()).await.unwrap();
        tokio::fs::write(&path, b"[]").await.unwrap();

        store
            .append(date, &[TranscriptEntry::now(Role::User, "hello")])
            .await
            .unwrap();
        assert_eq!(store.load_day(date).await.len(), 1);
        assert!(!path.with_extension("json.tmp").exists());
    }

    #[cfg(unix)]
    #[tokio::test]
    #[traced_test]
    async fn append_keeps_file_it_cannot_read() {
        let dir = tempfile::tempdir().unwrap();
        let store = ConversationStore::open(dir.path()).await.unwrap();
        let date = NaiveDate::from_ymd_opt(2026, 5, 4).unwrap();

        // A self-referencing link fails to read with a loop error, not bad data.
        let path = store.day_path(date);
        tokio::fs::create_dir_all(path.parent().unwrap()).await.unwrap();
        tokio::fs::symlink(&path, &path).await.unwrap();

        let result = store
            .append(date, &[TranscriptEntry::now(Role::User, "hello")])
            .await;
        assert!(matches!(result, Err(FrontdeskError::Storage { .. })), "got {result:?}");

        let meta = tokio::fs::symlink_metadata(&path).await.unwrap();
        assert!(meta.file_type().is_symlink());
        assert!(!path.with_extension("json.tmp").exists());
        assert!(!logs_contain("replacing corrupt transcript"));
    }
}
