// SPDX-FileCopyrightText: 2026 Frontdesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `frontdesk ask` command implementation.
//!
//! Runs retrieval for one question against the configured knowledge base and
//! prints the scored sections plus the grounding block the model would see.
//! No model is called.

use frontdesk_config::FrontdeskConfig;
use frontdesk_knowledge::{format_grounding, retrieve, KnowledgeBase, RetrievalConfig};

/// Run the `frontdesk ask` command.
pub fn run_ask(config: &FrontdeskConfig, query: &str) {
    print!("{}", render_ask(config, query));
}

fn render_ask(config: &FrontdeskConfig, query: &str) -> String {
    let kb = KnowledgeBase::open(&config.knowledge.dir);
    let snapshot = kb.snapshot();
    let retrieval = RetrievalConfig::from(&config.knowledge);
    let result = retrieve(query, &snapshot, &retrieval);

    let mut out = String::new();
    out.push_str(&format!(
        "\n  query: {query}\n  knowledge: {} section(s) in {}\n\n",
        snapshot.section_count(),
        config.knowledge.dir
    ));

    let Some(grounding) = format_grounding(&result) else {
        out.push_str("  No relevant sections; the answer would not be grounded.\n\n");
        return out;
    };

    for (rank, section) in result.iter().enumerate() {
        out.push_str(&format!(
            "  {}. {:.3}  {} ({})\n",
            rank + 1,
            section.score,
            section.title,
            section.document
        ));
    }
    out.push_str("\n  grounding block:\n\n");
    for line in grounding.lines() {
        out.push_str("    ");
        out.push_str(line);
        out.push('\n');
    }
    out.push('\n');
    out
}
