// SPDX-FileCopyrightText: 2026 Frontdesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Documents, sections, and the immutable snapshot readers share.

use std::collections::BTreeSet;

use chrono::{DateTime, Utc};

use crate::tokenizer;

/// A titled block of a knowledge document; the unit of retrieval.
#[derive(Debug, Clone, PartialEq)]
pub struct Section {
    pub title: String,
    pub body: String,
    tokens: BTreeSet<String>,
    title_tokens: BTreeSet<String>,
}

impl Section {
    /// Builds a section and derives its keyword sets from title and body.
    ///
    /// A section with a non-empty body always gets at least one token: when
    /// every word is filtered out, the raw words are kept, and failing that
    /// the trimmed body itself.
    pub fn new(title: impl Into<String>, body: impl Into<String>) -> Self {
        let title = title.into();
        let body = body.into();
        let text = format!("{title}\n{body}");

        let mut tokens = tokenizer::tokenize(&text);
        if tokens.is_empty() && !body.trim().is_empty() {
            tokens = tokenizer::words(&text).collect();
            if tokens.is_empty() {
                tokens.insert(body.trim().to_lowercase());
            }
        }

        Self {
            title_tokens: tokenizer::tokenize(&title),
            title,
            body,
            tokens,
        }
    }

    /// Keywords from title and body.
    pub fn tokens(&self) -> &BTreeSet<String> {
        &self.tokens
    }

    /// Keywords from the title alone.
    pub fn title_tokens(&self) -> &BTreeSet<String> {
        &self.title_tokens
    }
}

/// One knowledge file, split into sections in file order.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    /// File stem, e.g. `tuition` for `tuition.md`.
    pub id: String,
    pub sections: Vec<Section>,
}

/// Every loaded document at one point in time.
///
/// Never mutated after construction; the loader publishes a new one on change.
#[derive(Debug, Clone)]
pub struct Snapshot {
    pub documents: Vec<Document>,
    pub loaded_at: DateTime<Utc>,
    /// Increments with every reload; `0` means nothing was ever loaded.
    pub version: u64,
}

impl Snapshot {
    pub fn new(documents: Vec<Document>, version: u64) -> Self {
        Self {
            documents,
            loaded_at: Utc::now(),
            version,
        }
    }

    pub fn empty() -> Self {
        Self::new(Vec::new(), 0)
    }

    /// All sections in document order, then section order.
    pub fn sections(&self) -> impl Iterator<Item = (&Document, &Section)> {
        self.documents
            .iter()
            .flat_map(|doc| doc.sections.iter().map(move |section| (doc, section)))
    }

    pub fn section_count(&self) -> usize {
        self.documents.iter().map(|d| d.sections.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.section_count() == 0
    }
}

impl Default for Snapshot {
    fn default() -> Self {
        Self::empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn section_tokens_include_title_and_body() {
        let section = Section::new("Tuition", "You can pay the fees online.");
        assert!(section.tokens().contains("tuition"));
        assert!(section.tokens().contains("fee"));
        assert!(section.tokens().contains("pay"));
        assert_eq!(section.title_tokens().len(), 1);
    }

    #[test]
    fn stopword_only_body_still_has_tokens() {
        let section = Section::new("", "what is this");
        assert!(!section.tokens().is_empty());
        assert!(section.tokens().contains("what"));
    }

    #[test]
    fn punctuation_only_body_falls_back_to_text() {
        let section = Section::new("", " --- ");
        assert_eq!(section.tokens().len(), 1);
        assert!(section.tokens().contains("---"));
    }

    #[test]
    fn empty_section_has_no_tokens() {
        assert!(Section::new("", "").tokens().is_empty());
    }

    #[test]
    fn snapshot_iterates_in_document_order() {
        let snapshot = Snapshot::new(
            vec![
                Document {
                    id: "a".into(),
                    sections: vec![Section::new("One", "first"), Section::new("Two", "second")],
                },
                Document {
                    id: "b".into(),
                    sections: vec![Section::new("Three", "third")],
                },
            ],
            1,
        );
        let titles: Vec<_> = snapshot.sections().map(|(_, s)| s.title.as_str()).collect();
        assert_eq!(titles, ["One", "Two", "Three"]);
        assert_eq!(snapshot.section_count(), 3);
        assert!(Snapshot::empty().is_empty());
    }
}
