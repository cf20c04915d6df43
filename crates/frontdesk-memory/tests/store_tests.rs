// SPDX-FileCopyrightText: 2026 Frontdesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Transcript store behavior against a real directory.

use std::sync::Arc;

use chrono::NaiveDate;
use frontdesk_core::{Role, TranscriptEntry};
use frontdesk_memory::{ConversationStore, DayTranscript};

fn day(d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 3, d).unwrap()
}

fn entry(role: Role, content: &str) -> TranscriptEntry {
    TranscriptEntry {
        role: role.to_string(),
        content: content.to_string(),
        timestamp: "2026-03-01T10:00:00".to_string(),
    }
}

#[tokio::test]
async fn open_creates_directory() {
    let parent = tempfile::tempdir().unwrap();
    let dir = parent.path().join("memory");
    let store = ConversationStore::open(&dir).await.unwrap();
    assert!(dir.is_dir());
    assert!(store.dir_exists().await);
}

#[tokio::test]
async fn missing_day_is_empty() {
    let dir = tempfile::tempdir().unwrap();
    let store = ConversationStore::open(dir.path()).await.unwrap();
    assert!(store.load_day(day(1)).await.is_empty());
}

#[tokio::test]
async fn append_then_load_preserves_order() {
    let dir = tempfile::tempdir().unwrap();
    let store = ConversationStore::open(dir.path()).await.unwrap();

    store
        .append(
            day(1),
            &[
                entry(Role::User, "When is the deadline?"),
                entry(Role::Assistant, "March 31."),
            ],
        )
        .await
        .unwrap();
    store
        .append(day(1), &[entry(Role::User, "Thanks")])
        .await
        .unwrap();

    let messages = store.load_day(day(1)).await;
    let contents: Vec<_> = messages.iter().map(|m| m.content.as_str()).collect();
    assert_eq!(contents, ["When is the deadline?", "March 31.", "Thanks"]);
}

#[tokio::test]
async fn file_format_matches_day_layout() {
    let dir = tempfile::tempdir().unwrap();
    let store = ConversationStore::open(dir.path()).await.unwrap();
    store
        .append(day(2), &[entry(Role::User, "Selamat pagi, yuran pengajian?")])
        .await
        .unwrap();

    let path = dir.path().join("2026-03-02").join("conversations.json");
    let raw = std::fs::read_to_string(&path).unwrap();
    assert!(raw.contains("\n  \"date\": \"2026-03-02\""));
    assert!(raw.contains("Selamat pagi"));

    let parsed: DayTranscript = serde_json::from_str(&raw).unwrap();
    assert_eq!(parsed.date, "2026-03-02");
    assert_eq!(parsed.messages[0].role, "user");
}

#[tokio::test]
async fn non_ascii_is_written_unescaped() {
    let dir = tempfile::tempdir().unwrap();
    let store = ConversationStore::open(dir.path()).await.unwrap();
    store
        .append(day(3), &[entry(Role::User, "café résumé 学费")])
        .await
        .unwrap();
    let raw = std::fs::read_to_string(store.day_path(day(3))).unwrap();
    assert!(raw.contains("café résumé 学费"));
}

#[tokio::test]
async fn load_recent_spans_days_oldest_first_and_keeps_tail() {
    let dir = tempfile::tempdir().unwrap();
    let store = ConversationStore::open(dir.path()).await.unwrap();

    store.append(day(1), &[entry(Role::User, "too old")]).await.unwrap();
    store.append(day(5), &[entry(Role::User, "five-a"), entry(Role::Assistant, "five-b")]).await.unwrap();
    store.append(day(7), &[entry(Role::User, "seven-a"), entry(Role::Assistant, "seven-b")]).await.unwrap();

    let all = store.load_recent(day(7), 3, 10).await;
    let contents: Vec<_> = all.iter().map(|m| m.content.as_str()).collect();
    assert_eq!(contents, ["five-a", "five-b", "seven-a", "seven-b"]);

    let tail = store.load_recent(day(7), 7, 3).await;
    let contents: Vec<_> = tail.iter().map(|m| m.content.as_str()).collect();
    assert_eq!(contents, ["five-b", "seven-a", "seven-b"]);
}

#[tokio::test]
async fn load_recent_with_zero_days_is_empty() {
    let dir = tempfile::tempdir().unwrap();
    let store = ConversationStore::open(dir.path()).await.unwrap();
    store.append(day(7), &[entry(Role::User, "today")]).await.unwrap();
    assert!(store.load_recent(day(7), 0, 10).await.is_empty());
}

#[tokio::test]
async fn concurrent_appends_are_not_lost() {
    let dir = tempfile::tempdir().unwrap();
    let store = Arc::new(ConversationStore::open(dir.path()).await.unwrap());

    let mut handles = Vec::new();
    for i in 0..20 {
        let store = Arc::clone(&store);
        handles.push(tokio::spawn(async move {
            store
                .append(day(9), &[entry(Role::User, &format!("message {i}"))])
                .await
                .unwrap();
        }));
    }
    for handle in handles {
        handle.await.unwrap();
    }

    assert_eq!(store.load_day(day(9)).await.len(), 20);
}
