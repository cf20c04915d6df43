// SPDX-FileCopyrightText: 2026 Frontdesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration model structs for Frontdesk.
//!
//! All structs use `#[serde(deny_unknown_fields)]` to reject unrecognized
//! config keys at startup, providing actionable error messages.

use serde::{Deserialize, Serialize};

/// System prompt used when neither `llm.system_prompt` nor
/// `llm.system_prompt_file` is set.
pub const DEFAULT_SYSTEM_PROMPT: &str = "You are a friendly and helpful university AI receptionist. \
You provide accurate information about the university including admissions, \
tuition, programs, campus location, hours of operation, and frequently asked questions. \
Be concise, professional, and welcoming. Use the conversation history \
to provide context-aware responses. If you don't know something, admit it \
and suggest where the user might find the information.";

/// Top-level Frontdesk configuration.
///
/// Loaded from TOML files following XDG hierarchy, with environment variable overrides.
/// All sections are optional and default to sensible values.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct FrontdeskConfig {
    /// HTTP listener, CORS, and rate limiting.
    #[serde(default)]
    pub server: ServerConfig,

    /// Log output settings.
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Chat-completion API settings.
    #[serde(default)]
    pub llm: LlmConfig,

    /// Text-to-speech proxy settings.
    #[serde(default)]
    pub speech: SpeechConfig,

    /// Conversation transcript settings.
    #[serde(default)]
    pub memory: MemoryConfig,

    /// Knowledge base and retrieval settings.
    #[serde(default)]
    pub knowledge: KnowledgeConfig,
}

/// HTTP server configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ServerConfig {
    /// Address to bind.
    #[serde(default = "default_host")]
    pub host: String,

    /// Port to bind.
    #[serde(default = "default_port")]
    pub port: u16,

    /// Origins allowed to call `/api/*` cross-origin.
    #[serde(default = "default_cors_origins")]
    pub cors_origins: Vec<String>,

    /// Requests allowed per client within one rate-limit window.
    #[serde(default = "default_rate_limit")]
    pub rate_limit: u32,

    /// Length of the sliding rate-limit window in seconds.
    #[serde(default = "default_rate_limit_window_secs")]
    pub rate_limit_window_secs: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            cors_origins: default_cors_origins(),
            rate_limit: default_rate_limit(),
            rate_limit_window_secs: default_rate_limit_window_secs(),
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    5000
}

fn default_cors_origins() -> Vec<String> {
    vec![
        "http://localhost:5000".to_string(),
        "http://127.0.0.1:5000".to_string(),
    ]
}

fn default_rate_limit() -> u32 {
    30
}

fn default_rate_limit_window_secs() -> u64 {
    60
}

/// Logging configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct LoggingConfig {
    /// Logging level (trace, debug, info, warn, error). `RUST_LOG` wins when set.
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

/// OpenAI-compatible chat-completion API configuration (OpenRouter by default).
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct LlmConfig {
    /// API key. Also read from `OPENROUTER_API_KEY`.
    #[serde(default)]
    pub api_key: Option<String>,

    /// Full chat-completions endpoint URL.
    #[serde(default = "default_api_url")]
    pub api_url: String,

    /// Model identifier sent with every request.
    #[serde(default = "default_model")]
    pub model: String,

    /// Sampling temperature.
    #[serde(default = "default_temperature")]
    pub temperature: f32,

    /// Maximum tokens to generate per answer.
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,

    /// Per-request timeout in seconds.
    #[serde(default = "default_llm_timeout_secs")]
    pub timeout_secs: u64,

    /// Value of the `HTTP-Referer` attribution header.
    #[serde(default = "default_referer")]
    pub referer: String,

    /// Value of the `X-Title` attribution header.
    #[serde(default = "default_app_title")]
    pub app_title: String,

    /// Inline system prompt. Overridden by `system_prompt_file` if both set.
    #[serde(default)]
    pub system_prompt: Option<String>,

    /// Path to a text file containing the system prompt.
    #[serde(default)]
    pub system_prompt_file: Option<String>,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            api_url: default_api_url(),
            model: default_model(),
            temperature: default_temperature(),
            max_tokens: default_max_tokens(),
            timeout_secs: default_llm_timeout_secs(),
            referer: default_referer(),
            app_title: default_app_title(),
            system_prompt: None,
            system_prompt_file: None,
        }
    }
}

impl LlmConfig {
    /// Whether a non-blank API key is present.
    pub fn has_api_key(&self) -> bool {
        self.api_key
            .as_deref()
            .is_some_and(|key| !key.trim().is_empty())
    }
}

fn default_api_url() -> String {
    "https://openrouter.ai/api/v1/chat/completions".to_string()
}

fn default_model() -> String {
    "qwen/qwen3.5-flash-02-23".to_string()
}

fn default_temperature() -> f32 {
    0.7
}

fn default_max_tokens() -> u32 {
    500
}

fn default_llm_timeout_secs() -> u64 {
    30
}

fn default_referer() -> String {
    "http://localhost:5000".to_string()
}

fn default_app_title() -> String {
    "University AI Receptionist".to_string()
}

/// Text-to-speech proxy configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct SpeechConfig {
    /// Enable `POST /api/tts`.
    #[serde(default)]
    pub enabled: bool,

    /// API key. Also read from `TTS_API_KEY`.
    #[serde(default)]
    pub api_key: Option<String>,

    /// Base URL; the voice id and `/stream` are appended.
    #[serde(default = "default_speech_url")]
    pub api_url: String,

    /// Voice identifier.
    #[serde(default = "default_voice_id")]
    pub voice_id: String,

    /// Synthesis model identifier.
    #[serde(default = "default_speech_model")]
    pub model_id: String,

    /// Per-request timeout in seconds.
    #[serde(default = "default_speech_timeout_secs")]
    pub timeout_secs: u64,

    /// Longest text accepted for synthesis, in characters.
    #[serde(default = "default_max_text_length")]
    pub max_text_length: usize,
}

impl Default for SpeechConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            api_key: None,
            api_url: default_speech_url(),
            voice_id: default_voice_id(),
            model_id: default_speech_model(),
            timeout_secs: default_speech_timeout_secs(),
            max_text_length: default_max_text_length(),
        }
    }
}

fn default_speech_url() -> String {
    "https://api.elevenlabs.io/v1/text-to-speech".to_string()
}

fn default_voice_id() -> String {
    "21m00Tcm4TlvDq8ikWAM".to_string()
}

fn default_speech_model() -> String {
    "eleven_multilingual_v2".to_string()
}

fn default_speech_timeout_secs() -> u64 {
    30
}

fn default_max_text_length() -> usize {
    2000
}

/// Conversation transcript configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct MemoryConfig {
    /// Directory holding one `YYYY-MM-DD/conversations.json` per day.
    #[serde(default = "default_memory_dir")]
    pub dir: String,

    /// Number of days (including today) scanned for history.
    #[serde(default = "default_recent_days")]
    pub recent_days: u32,

    /// Most recent messages included in the prompt as history.
    #[serde(default = "default_max_context_messages")]
    pub max_context_messages: usize,

    /// Longest accepted user message, in characters.
    #[serde(default = "default_max_message_length")]
    pub max_message_length: usize,
}

impl Default for MemoryConfig {
    fn default() -> Self {
        Self {
            dir: default_memory_dir(),
            recent_days: default_recent_days(),
            max_context_messages: default_max_context_messages(),
            max_message_length: default_max_message_length(),
        }
    }
}

fn default_memory_dir() -> String {
    "memory".to_string()
}

fn default_recent_days() -> u32 {
    7
}

fn default_max_context_messages() -> usize {
    10
}

fn default_max_message_length() -> usize {
    1000
}

/// Knowledge base and retrieval configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct KnowledgeConfig {
    /// Directory of `.md` / `.txt` knowledge documents.
    #[serde(default = "default_knowledge_dir")]
    pub dir: String,

    /// Reload on filesystem events. When false, every chat request checks
    /// modification times instead.
    #[serde(default = "default_watch")]
    pub watch: bool,

    /// Debounce interval for filesystem events, in milliseconds.
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,

    /// Minimum meaningful query tokens before retrieval is attempted.
    #[serde(default = "default_min_query_tokens")]
    pub min_query_tokens: usize,

    /// Minimum relevance score for a section to be included.
    #[serde(default = "default_min_score")]
    pub min_score: f64,

    /// Maximum sections injected into the prompt.
    #[serde(default = "default_max_sections")]
    pub max_sections: usize,

    /// Weight of exact query-token coverage.
    #[serde(default = "default_keyword_weight")]
    pub keyword_weight: f64,

    /// Weight of query tokens found in the section title.
    #[serde(default = "default_title_weight")]
    pub title_weight: f64,

    /// Weight of fuzzy matches for tokens not shared exactly.
    #[serde(default = "default_fuzzy_weight")]
    pub fuzzy_weight: f64,

    /// Minimum Jaro-Winkler similarity counted as a fuzzy match.
    #[serde(default = "default_fuzzy_threshold")]
    pub fuzzy_threshold: f64,
}

impl Default for KnowledgeConfig {
    fn default() -> Self {
        Self {
            dir: default_knowledge_dir(),
            watch: default_watch(),
            debounce_ms: default_debounce_ms(),
            min_query_tokens: default_min_query_tokens(),
            min_score: default_min_score(),
            max_sections: default_max_sections(),
            keyword_weight: default_keyword_weight(),
            title_weight: default_title_weight(),
            fuzzy_weight: default_fuzzy_weight(),
            fuzzy_threshold: default_fuzzy_threshold(),
        }
    }
}

fn default_knowledge_dir() -> String {
    "knowledge".to_string()
}

fn default_watch() -> bool {
    true
}

fn default_debounce_ms() -> u64 {
    500
}

fn default_min_query_tokens() -> usize {
    1
}

fn default_min_score() -> f64 {
    0.15
}

fn default_max_sections() -> usize {
    3
}

fn default_keyword_weight() -> f64 {
    0.6
}

fn default_title_weight() -> f64 {
    0.25
}

fn default_fuzzy_weight() -> f64 {
    0.15
}

fn default_fuzzy_threshold() -> f64 {
    0.88
}
