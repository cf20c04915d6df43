// SPDX-FileCopyrightText: 2026 Frontdesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Keyword extraction for sections and queries.
//!
//! Text is lowercased and split on anything that is not alphanumeric.
//! Words shorter than three characters and English/Malay stopwords are
//! dropped, and a trailing plural `s` is stripped so `fees` meets `fee`.

use std::collections::{BTreeSet, HashSet};
use std::sync::LazyLock;

/// Words shorter than this carry no retrieval signal.
pub const MIN_TOKEN_CHARS: usize = 3;

static STOPWORDS: LazyLock<HashSet<&'static str>> = LazyLock::new(|| {
    [
        // English
        "the", "and", "for", "are", "but", "not", "you", "all", "any", "can", "had", "her", "was",
        "one", "our", "out", "has", "have", "his", "how", "its", "may", "who", "did", "get", "got",
        "him", "she", "too", "use", "what", "when", "where", "which", "while", "with", "why",
        "will", "would", "could", "should", "about", "this", "that", "these", "those", "there",
        "their", "them", "then", "than", "they", "from", "into", "your", "yours", "been", "being",
        "were", "does", "doing", "some", "such", "only", "also", "just", "more", "most", "other",
        "very", "here", "each", "both", "over", "again", "once", "because", "until", "after",
        "before", "during", "through", "off", "own", "same", "nor", "let", "please", "tell",
        "know", "want", "need", "like", "much", "many", "any", "anyone", "someone", "whom",
        // Malay
        "yang", "dan", "untuk", "dengan", "ini", "itu", "ada", "apa", "bagaimana", "berapa",
        "bila", "mana", "siapa", "saya", "kami", "kita", "anda", "awak", "boleh", "akan",
        "dalam", "pada", "dari", "kepada", "atau", "juga", "tidak", "tak", "sudah", "telah",
        "masih", "lagi", "nak", "mahu", "ingin", "tolong", "sila", "adalah", "ialah", "bagi",
        "oleh", "kerana", "sebab", "jika", "kalau", "macam", "mengenai", "tentang", "berkenaan",
    ]
    .into_iter()
    .collect()
});

/// Whole queries treated as small talk, compared after normalization.
static GREETING_PHRASES: LazyLock<HashSet<&'static str>> = LazyLock::new(|| {
    [
        "hi", "hello", "hey", "hai", "helo", "yo", "hi there", "hello there", "hey there",
        "good morning", "good afternoon", "good evening", "good night", "thanks", "thank you",
        "thank you so much", "thanks a lot", "many thanks", "thx", "ty", "ok", "okay",
        "ok thanks", "okay thanks", "ok thank you", "bye", "goodbye", "see you", "how are you",
        "whats up", "what s up", "who are you", "terima kasih", "terima kasih banyak",
        "selamat pagi", "selamat petang", "selamat tengahari", "selamat malam",
        "selamat datang", "assalamualaikum", "salam", "apa khabar", "hai semua",
    ]
    .into_iter()
    .collect()
});

/// Words that never count as meaningful query tokens.
static GREETING_WORDS: LazyLock<HashSet<&'static str>> = LazyLock::new(|| {
    [
        "hello", "hey", "hai", "helo", "thanks", "thank", "thx", "terima", "kasih", "selamat",
        "pagi", "petang", "tengahari", "malam", "morning", "afternoon", "evening", "goodbye",
        "bye", "okay", "assalamualaikum", "salam", "khabar", "good", "there",
    ]
    .into_iter()
    .collect()
});

/// Lowercased alphanumeric runs of `text`, in order, unfiltered.
pub fn words(text: &str) -> impl Iterator<Item = String> + '_ {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|w| !w.is_empty())
        .map(str::to_lowercase)
}

/// Keyword set of `text`.
pub fn tokenize(text: &str) -> BTreeSet<String> {
    words(text).filter_map(|w| keyword(&w)).collect()
}

/// Keyword set of a query with greeting words removed.
pub fn query_tokens(query: &str) -> BTreeSet<String> {
    words(query)
        .filter(|w| !GREETING_WORDS.contains(w.as_str()))
        .filter_map(|w| keyword(&w))
        .collect()
}

/// Whether the whole query is a known greeting or small-talk phrase.
pub fn is_greeting(query: &str) -> bool {
    let normalized = words(query).collect::<Vec<_>>().join(" ");
    GREETING_PHRASES.contains(normalized.as_str())
}

fn keyword(word: &str) -> Option<String> {
    if word.chars().count() < MIN_TOKEN_CHARS || STOPWORDS.contains(word) {
        return None;
    }
    Some(stem(word))
}

/// Strip a plural `s` (`fees` -> `fee`) but keep `-ss` words and short words intact.
fn stem(word: &str) -> String {
    if word.chars().count() > MIN_TOKEN_CHARS
        && word.ends_with('s')
        && !word.ends_with("ss")
    {
        word[..word.len() - 1].to_string()
    } else {
        word.to_string()
    }
}
