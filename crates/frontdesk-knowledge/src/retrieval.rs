// SPDX-FileCopyrightText: 2026 Frontdesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Keyword retrieval over a knowledge snapshot.
//!
//! Each section is scored against the query's keyword set `Q`:
//!
//! ```text
//! keyword_weight * |Q ∩ S| / |Q|
//!   + title_weight * |Q ∩ T| / |Q|
//!   + fuzzy_weight * Σ_{q ∈ Q \ S} best_sim(q, S) / |Q|
//! ```
//!
//! where `S` is the section's keyword set and `T` its title's. `best_sim` is
//! the best Jaro-Winkler similarity at or above `fuzzy_threshold`, or the
//! length ratio when one token contains the other, and is always below 1.
//! Sections under `min_score` are dropped, the rest sorted by score (ties
//! keep snapshot order) and truncated to `max_sections`.

use std::collections::BTreeSet;

use frontdesk_config::KnowledgeConfig;

use crate::tokenizer;
use crate::types::{Section, Snapshot};

/// Shorter token length required before containment counts as a fuzzy match.
const MIN_CONTAINMENT_CHARS: usize = 4;

/// Separator placed between sections in the grounding block.
pub const SECTION_SEPARATOR: &str = "\n\n---\n\n";

/// Thresholds and weights for [`retrieve`].
#[derive(Debug, Clone, PartialEq)]
pub struct RetrievalConfig {
    pub min_query_tokens: usize,
    pub min_score: f64,
    pub max_sections: usize,
    pub keyword_weight: f64,
    pub title_weight: f64,
    pub fuzzy_weight: f64,
    pub fuzzy_threshold: f64,
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self::from(&KnowledgeConfig::default())
    }
}

impl From<&KnowledgeConfig> for RetrievalConfig {
    fn from(config: &KnowledgeConfig) -> Self {
        Self {
            min_query_tokens: config.min_query_tokens,
            min_score: config.min_score,
            max_sections: config.max_sections,
            keyword_weight: config.keyword_weight,
            title_weight: config.title_weight,
            fuzzy_weight: config.fuzzy_weight,
            fuzzy_threshold: config.fuzzy_threshold,
        }
    }
}

/// A section selected for the prompt.
#[derive(Debug, Clone, PartialEq)]
pub struct RetrievedSection {
    pub document: String,
    pub title: String,
    pub body: String,
    pub score: f64,
}

/// Selected sections, best first. Empty is a normal outcome.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RetrievalResult {
    pub sections: Vec<RetrievedSection>,
}

impl RetrievalResult {
    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }

    pub fn len(&self) -> usize {
        self.sections.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &RetrievedSection> {
        self.sections.iter()
    }

    /// Titles in result order.
    pub fn titles(&self) -> Vec<&str> {
        self.sections.iter().map(|s| s.title.as_str()).collect()
    }
}

/// Select the sections of `snapshot` relevant to `query`.
pub fn retrieve(query: &str, snapshot: &Snapshot, config: &RetrievalConfig) -> RetrievalResult {
    if tokenizer::is_greeting(query) {
        tracing::trace!("greeting query, skipping retrieval");
        return RetrievalResult::default();
    }

    let query_tokens = tokenizer::query_tokens(query);
    if query_tokens.is_empty() || query_tokens.len() < config.min_query_tokens {
        tracing::trace!(
            tokens = query_tokens.len(),
            min = config.min_query_tokens,
            "query too short for retrieval"
        );
        return RetrievalResult::default();
    }

    let mut scored: Vec<_> = snapshot
        .sections()
        .map(|(doc, section)| (score_section(&query_tokens, section, config), doc, section))
        .filter(|(score, _, _)| *score >= config.min_score)
        .collect();

    // `sort_by` is stable, so equal scores keep snapshot order.
    scored.sort_by(|a, b| b.0.total_cmp(&a.0));
    scored.truncate(config.max_sections);

    let result = RetrievalResult {
        sections: scored
            .into_iter()
            .map(|(score, doc, section)| RetrievedSection {
                document: doc.id.clone(),
                title: section.title.clone(),
                body: section.body.clone(),
                score,
            })
            .collect(),
    };

    tracing::debug!(
        query_tokens = query_tokens.len(),
        matched = result.len(),
        snapshot_version = snapshot.version,
        "retrieval complete"
    );
    result
}

/// Relevance of `section` to an already tokenized query.
pub fn score_section(
    query_tokens: &BTreeSet<String>,
    section: &Section,
    config: &RetrievalConfig,
) -> f64 {
    if query_tokens.is_empty() {
        return 0.0;
    }
    let total = query_tokens.len() as f64;
    let tokens = section.tokens();

    let mut exact = 0usize;
    let mut in_title = 0usize;
    let mut fuzzy = 0.0;
    for q in query_tokens {
        if tokens.contains(q) {
            exact += 1;
        } else {
            fuzzy += best_similarity(q, tokens, config.fuzzy_threshold);
        }
        if section.title_tokens().contains(q) {
            in_title += 1;
        }
    }

    config.keyword_weight * exact as f64 / total
        + config.title_weight * in_title as f64 / total
        + config.fuzzy_weight * fuzzy / total
}

/// Best partial match of `token` against `candidates`, in `[0, 1)`.
fn best_similarity(token: &str, candidates: &BTreeSet<String>, threshold: f64) -> f64 {
    candidates
        .iter()
        .map(|candidate| similarity(token, candidate, threshold))
        .fold(0.0, f64::max)
}

fn similarity(a: &str, b: &str, threshold: f64) -> f64 {
    if a == b {
        return 0.0;
    }
    let jw = strsim::jaro_winkler(a, b);
    let jw = if jw >= threshold { jw } else { 0.0 };

    let (a_len, b_len) = (a.chars().count(), b.chars().count());
    let (short, long, short_len, long_len) = if a_len <= b_len {
        (a, b, a_len, b_len)
    } else {
        (b, a, b_len, a_len)
    };
    let containment = if short_len >= MIN_CONTAINMENT_CHARS && long.contains(short) {
        short_len as f64 / long_len as f64
    } else {
        0.0
    };

    jw.max(containment)
}

/// Render a result as the grounding block appended to the system prompt.
///
/// Returns `None` when nothing was retrieved.
pub fn format_grounding(result: &RetrievalResult) -> Option<String> {
    if result.is_empty() {
        return None;
    }
    let blocks: Vec<String> = result
        .iter()
        .map(|s| {
            if s.body.is_empty() {
                format!("## {}", s.title)
            } else {
                format!("## {}\n{}", s.title, s.body)
            }
        })
        .collect();
    Some(blocks.join(SECTION_SEPARATOR))
}
