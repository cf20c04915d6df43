// SPDX-FileCopyrightText: 2026 Frontdesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `frontdesk check` command implementation.
//!
//! Reports whether the loaded configuration is ready to serve: API keys,
//! transcript directory, knowledge base, and system prompt.

use std::path::Path;

use frontdesk_config::FrontdeskConfig;
use frontdesk_knowledge::KnowledgeBase;

/// Status of a single check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckStatus {
    Pass,
    Warn,
    Fail,
}

/// Result of a single check.
#[derive(Debug, Clone)]
pub struct CheckResult {
    pub name: &'static str,
    pub status: CheckStatus,
    pub message: String,
}

impl CheckResult {
    fn new(name: &'static str, status: CheckStatus, message: impl Into<String>) -> Self {
        Self {
            name,
            status,
            message: message.into(),
        }
    }
}

/// Run the `frontdesk check` command.
pub fn run_check(config: &FrontdeskConfig) {
    let results = run_checks(config);

    println!();
    println!("  frontdesk check");
    println!("  {}", "-".repeat(50));
    println!(
        "    {:<20} {}:{}",
        "Listen address", config.server.host, config.server.port
    );
    println!("    {:<20} {}", "Model", config.llm.model);
    println!();

    for result in &results {
        let tag = match result.status {
            CheckStatus::Pass => "[OK]  ",
            CheckStatus::Warn => "[WARN]",
            CheckStatus::Fail => "[FAIL]",
        };
        println!("    {tag} {:<20} {}", result.name, result.message);
    }
    println!();

    let issues = results
        .iter()
        .filter(|r| r.status != CheckStatus::Pass)
        .count();
    if issues == 0 {
        println!("  All checks passed.");
    } else {
        let issue_word = if issues == 1 { "issue" } else { "issues" };
        println!("  {issues} {issue_word} found.");
    }
    println!();
}

/// Every check, in display order.
pub fn run_checks(config: &FrontdeskConfig) -> Vec<CheckResult> {
    vec![
        check_api_key(config),
        check_memory_dir(&config.memory.dir),
        check_knowledge(&config.knowledge.dir),
        check_system_prompt(config),
        check_speech(config),
    ]
}

fn check_api_key(config: &FrontdeskConfig) -> CheckResult {
    match config.llm.api_key.as_deref() {
        Some(key) if !key.trim().is_empty() => {
            CheckResult::new("OpenRouter API key", CheckStatus::Pass, "configured")
        }
        _ => CheckResult::new(
            "OpenRouter API key",
            CheckStatus::Fail,
            "not set (chat requests will return 503)",
        ),
    }
}

fn check_memory_dir(dir: &str) -> CheckResult {
    if Path::new(dir).is_dir() {
        CheckResult::new("Transcripts", CheckStatus::Pass, dir.to_string())
    } else {
        CheckResult::new(
            "Transcripts",
            CheckStatus::Warn,
            format!("not found: {dir} (will be created on first run)"),
        )
    }
}

fn check_knowledge(dir: &str) -> CheckResult {
    if !Path::new(dir).is_dir() {
        return CheckResult::new(
            "Knowledge base",
            CheckStatus::Warn,
            format!("not found: {dir} (answers will not be grounded)"),
        );
    }
    let kb = KnowledgeBase::open(dir);
    let snapshot = kb.snapshot();
    if snapshot.is_empty() {
        CheckResult::new(
            "Knowledge base",
            CheckStatus::Warn,
            format!("no sections found in {dir}"),
        )
    } else {
        CheckResult::new(
            "Knowledge base",
            CheckStatus::Pass,
            format!(
                "{} document(s), {} section(s)",
                snapshot.documents.len(),
                snapshot.section_count()
            ),
        )
    }
}

fn check_system_prompt(config: &FrontdeskConfig) -> CheckResult {
    match (&config.llm.system_prompt_file, &config.llm.system_prompt) {
        (Some(path), _) if Path::new(path).is_file() => {
            CheckResult::new("System prompt", CheckStatus::Pass, format!("file {path}"))
        }
        (Some(path), _) => CheckResult::new(
            "System prompt",
            CheckStatus::Warn,
            format!("file not found: {path} (falling back)"),
        ),
        (None, Some(_)) => CheckResult::new("System prompt", CheckStatus::Pass, "inline"),
        (None, None) => CheckResult::new("System prompt", CheckStatus::Pass, "built-in default"),
    }
}

fn check_speech(config: &FrontdeskConfig) -> CheckResult {
    if !config.speech.enabled {
        return CheckResult::new("Text-to-speech", CheckStatus::Pass, "disabled");
    }
    match config.speech.api_key.as_deref() {
        Some(key) if !key.trim().is_empty() => CheckResult::new(
            "Text-to-speech",
            CheckStatus::Pass,
            format!("voice {}", config.speech.voice_id),
        ),
        _ => CheckResult::new(
            "Text-to-speech",
            CheckStatus::Fail,
            "enabled but no API key set",
        ),
    }
}
