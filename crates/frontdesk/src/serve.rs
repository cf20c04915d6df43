// SPDX-FileCopyrightText: 2026 Frontdesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `frontdesk serve` command implementation.
//!
//! Wires the OpenRouter provider, the optional speech client, the conversation
//! store and the knowledge base into the gateway, then serves until SIGINT or
//! SIGTERM.

use std::sync::Arc;
use std::time::Duration;

use frontdesk_config::FrontdeskConfig;
use frontdesk_core::{ChatProvider, FrontdeskError, SpeechSynthesizer};
use frontdesk_gateway::prompt::load_system_prompt;
use frontdesk_gateway::recording;
use frontdesk_gateway::{start_server, GatewayState, MetricsRender};
use frontdesk_knowledge::{spawn_watcher, KnowledgeBase, KnowledgeWatcher};
use frontdesk_memory::ConversationStore;
use frontdesk_openrouter::OpenRouterProvider;
use frontdesk_speech::SpeechClient;
use tracing::{debug, info, warn};

/// Runs the `frontdesk serve` command.
pub async fn run_serve(config: FrontdeskConfig) -> Result<(), FrontdeskError> {
    init_tracing(&config.logging.level);

    let provider = OpenRouterProvider::new(&config.llm)?;
    if !provider.is_configured() {
        warn!("no OpenRouter API key configured; chat requests will be rejected");
    }
    let provider: Arc<dyn ChatProvider> = Arc::new(provider);

    let speech = if config.speech.enabled {
        let client: Arc<dyn SpeechSynthesizer> = Arc::new(SpeechClient::new(&config.speech)?);
        info!(voice = %config.speech.voice_id, "text-to-speech enabled");
        Some(client)
    } else {
        debug!("text-to-speech disabled");
        None
    };

    let store = Arc::new(ConversationStore::open(&config.memory.dir).await?);

    let knowledge = Arc::new(KnowledgeBase::open(&config.knowledge.dir));
    let snapshot = knowledge.snapshot();
    info!(
        dir = %knowledge.dir().display(),
        documents = snapshot.documents.len(),
        sections = snapshot.section_count(),
        "knowledge base ready"
    );

    // Held for the lifetime of the server; dropping it stops watching.
    let watcher = start_watcher(&config, &knowledge);

    let system_prompt = load_system_prompt(&config.llm).await;

    let mut state = GatewayState::new(config, provider, store, knowledge, system_prompt)
        .with_watcher_active(watcher.is_some());
    if let Some(speech) = speech {
        state = state.with_speech(speech);
    }
    if let Some(render) = metrics_render() {
        state = state.with_metrics_render(render);
    }

    start_server(state, shutdown_signal()).await?;
    drop(watcher);
    info!("frontdesk stopped");
    Ok(())
}

/// Installs the Prometheus recorder for `GET /metrics`.
///
/// Serving continues without metrics if the recorder cannot be installed.
fn metrics_render() -> Option<MetricsRender> {
    match recording::install_recorder() {
        Ok(handle) => Some(Arc::new(move || handle.render()) as MetricsRender),
        Err(e) => {
            warn!(error = %e, "metrics disabled");
            None
        }
    }
}

/// Falls back to reloading on each request when the watcher cannot start.
fn start_watcher(
    config: &FrontdeskConfig,
    knowledge: &Arc<KnowledgeBase>,
) -> Option<KnowledgeWatcher> {
    if !config.knowledge.watch {
        debug!("knowledge watching disabled, reloading on demand");
        return None;
    }
    let debounce = Duration::from_millis(config.knowledge.debounce_ms);
    match spawn_watcher(Arc::clone(knowledge), debounce) {
        Ok(watcher) => Some(watcher),
        Err(e) => {
            warn!(error = %e, "knowledge watcher unavailable, reloading on demand");
            None
        }
    }
}

/// Resolves on SIGINT (Ctrl+C) or SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!(error = %e, "failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};
        match signal(SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                warn!(error = %e, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("received SIGINT (Ctrl+C), initiating shutdown"),
        _ = terminate => info!("received SIGTERM, initiating shutdown"),
    }
}

/// Initializes the tracing subscriber with the configured log level.
///
/// `RUST_LOG` takes precedence when set.
fn init_tracing(log_level: &str) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("frontdesk={log_level},warn")));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_names(false)
        .init();
}
