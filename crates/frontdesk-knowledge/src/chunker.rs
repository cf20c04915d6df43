// SPDX-FileCopyrightText: 2026 Frontdesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Splits a knowledge file into sections at `## ` headings.

use crate::types::Section;

/// Chunks shorter than this (in characters, heading included) are dropped.
pub const MIN_CHUNK_CHARS: usize = 30;

/// Split `content` into sections.
///
/// Every line starting with `## ` opens a new section titled by the rest of
/// the line. Text before the first such heading becomes a section titled by
/// the file's `# ` heading, or by `doc_id` when there is none. If every chunk
/// is too short but the file as a whole is not, the whole file becomes a
/// single section.
pub fn chunk_document(content: &str, doc_id: &str) -> Vec<Section> {
    let title = document_title(content).unwrap_or(doc_id);

    let mut sections: Vec<Section> = split_chunks(content)
        .into_iter()
        .filter_map(|chunk| {
            let chunk = chunk.trim();
            if chunk.is_empty() || chunk.chars().count() < MIN_CHUNK_CHARS {
                return None;
            }
            Some(match heading(chunk, "## ") {
                Some((heading, body)) => Section::new(heading, body.trim()),
                None => Section::new(title, strip_title_line(chunk)),
            })
        })
        .collect();

    let whole = content.trim();
    if sections.is_empty() && whole.chars().count() >= MIN_CHUNK_CHARS {
        sections.push(Section::new(title, strip_title_line(whole)));
    }

    sections
}

/// Text of the first `# ` heading line, if any.
fn document_title(content: &str) -> Option<&str> {
    content
        .lines()
        .find_map(|line| line.strip_prefix("# "))
        .map(str::trim)
        .filter(|t| !t.is_empty())
}

fn split_chunks(content: &str) -> Vec<&str> {
    let mut chunks = Vec::new();
    let mut start = 0;
    let mut offset = 0;
    for line in content.split_inclusive('\n') {
        if line.starts_with("## ") && offset > start {
            chunks.push(&content[start..offset]);
            start = offset;
        }
        offset += line.len();
    }
    if start < content.len() {
        chunks.push(&content[start..]);
    }
    chunks
}

/// Splits `chunk` into heading text and body when its first line starts with `prefix`.
fn heading<'a>(chunk: &'a str, prefix: &str) -> Option<(&'a str, &'a str)> {
    let (first, rest) = chunk.split_once('\n').unwrap_or((chunk, ""));
    let text = first.strip_prefix(prefix)?.trim();
    (!text.is_empty()).then_some((text, rest))
}

fn strip_title_line(chunk: &str) -> &str {
    match heading(chunk, "# ") {
        Some((_, body)) => body.trim(),
        None => chunk,
    }
}
