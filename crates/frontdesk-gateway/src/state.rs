// SPDX-FileCopyrightText: 2026 Frontdesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Shared state for axum request handlers.

use std::sync::Arc;
use std::time::{Duration, Instant};

use frontdesk_config::FrontdeskConfig;
use frontdesk_core::{ChatProvider, SpeechSynthesizer, TranscriptEntry};
use frontdesk_knowledge::{KnowledgeBase, RetrievalConfig};
use frontdesk_memory::ConversationStore;
use tokio::sync::Mutex;

use crate::rate_limit::RateLimiter;

/// Renders collected metrics in Prometheus text format.
pub type MetricsRender = Arc<dyn Fn() -> String + Send + Sync>;

/// Everything a handler needs. Cheap to clone.
#[derive(Clone)]
pub struct GatewayState {
    /// Validated configuration.
    pub config: Arc<FrontdeskConfig>,
    /// Chat-completion backend.
    pub provider: Arc<dyn ChatProvider>,
    /// Text-to-speech backend, `None` when speech is disabled.
    pub speech: Option<Arc<dyn SpeechSynthesizer>>,
    /// Per-day transcript files.
    pub store: Arc<ConversationStore>,
    /// Current knowledge snapshot and its loader.
    pub knowledge: Arc<KnowledgeBase>,
    /// Retrieval thresholds derived from `config.knowledge`.
    pub retrieval: Arc<RetrievalConfig>,
    /// Resolved system prompt.
    pub system_prompt: Arc<str>,
    /// Recent exchange used as history when `use_memory` is false.
    pub conversation: Arc<Mutex<Vec<TranscriptEntry>>>,
    /// Limiter for chat, memory and speech routes.
    pub limiter: RateLimiter,
    /// When true a filesystem watcher keeps the knowledge base current and
    /// chat requests skip the on-demand reload check.
    pub watcher_active: bool,
    /// Prometheus renderer; `GET /metrics` is 404 without one.
    pub metrics_render: Option<MetricsRender>,
    /// Process start time for uptime calculation.
    pub start_time: Instant,
}

impl GatewayState {
    pub fn new(
        config: FrontdeskConfig,
        provider: Arc<dyn ChatProvider>,
        store: Arc<ConversationStore>,
        knowledge: Arc<KnowledgeBase>,
        system_prompt: impl Into<Arc<str>>,
    ) -> Self {
        let limiter = RateLimiter::new(
            config.server.rate_limit,
            Duration::from_secs(config.server.rate_limit_window_secs),
        );
        let retrieval = RetrievalConfig::from(&config.knowledge);
        Self {
            config: Arc::new(config),
            provider,
            speech: None,
            store,
            knowledge,
            retrieval: Arc::new(retrieval),
            system_prompt: system_prompt.into(),
            conversation: Arc::new(Mutex::new(Vec::new())),
            limiter,
            watcher_active: false,
            metrics_render: None,
            start_time: Instant::now(),
        }
    }

    pub fn with_speech(mut self, speech: Arc<dyn SpeechSynthesizer>) -> Self {
        self.speech = Some(speech);
        self
    }

    pub fn with_watcher_active(mut self, active: bool) -> Self {
        self.watcher_active = active;
        self
    }

    /// Most entries kept in the in-memory conversation.
    pub fn with_metrics_render(mut self, render: MetricsRender) -> Self {
        self.metrics_render = Some(render);
        self
    }

    pub fn conversation_cap(&self) -> usize {
        self.config.memory.max_context_messages * 2
    }
}

impl std::fmt::Debug for GatewayState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GatewayState")
            .field("model", &self.provider.model())
            .field("speech", &self.speech.is_some())
            .field("store", &self.store.dir())
            .field("knowledge", &self.knowledge.dir())
            .field("limiter", &self.limiter)
            .field("watcher_active", &self.watcher_active)
            .field("metrics", &self.metrics_render.is_some())
            .finish_non_exhaustive()
    }
}
