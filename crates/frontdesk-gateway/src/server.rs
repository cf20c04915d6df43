// SPDX-FileCopyrightText: 2026 Frontdesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Gateway HTTP server built on axum.
//!
//! Sets up routes, middleware, and shared state for the gateway.

use std::future::Future;
use std::net::SocketAddr;

use axum::{
    middleware as axum_middleware,
    routing::{get, post},
    Router,
};
use frontdesk_core::FrontdeskError;
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::rate_limit::rate_limit_middleware;
use crate::recording;
use crate::security::{cors_layer, security_headers};
use crate::state::GatewayState;

/// Build the application router.
///
/// - GET  /            chat page
/// - POST /api/chat    (rate limited)
/// - GET  /api/memory  (rate limited)
/// - POST /api/tts     (rate limited)
/// - POST /api/reset
/// - GET  /api/health
/// - GET  /metrics     (when a Prometheus renderer is set)
pub fn build_router(state: GatewayState) -> Router {
    let limited_routes = Router::new()
        .route("/api/chat", post(handlers::post_chat))
        .route("/api/memory", get(handlers::get_memory))
        .route("/api/tts", post(handlers::post_tts))
        .route_layer(axum_middleware::from_fn_with_state(
            state.limiter.clone(),
            rate_limit_middleware,
        ));

    let api_routes = Router::new()
        .route("/api/reset", post(handlers::post_reset))
        .route("/api/health", get(handlers::get_health))
        .merge(limited_routes)
        .layer(cors_layer(&state.config.server.cors_origins));

    Router::new()
        .route("/", get(handlers::index))
        .route("/metrics", get(handlers::get_metrics))
        .merge(api_routes)
        .fallback(handlers::not_found)
        .layer(axum_middleware::from_fn(security_headers))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Bind the configured address and serve until `shutdown` resolves.
pub async fn start_server<F>(state: GatewayState, shutdown: F) -> Result<(), FrontdeskError>
where
    F: Future<Output = ()> + Send + 'static,
{
    let addr = format!("{}:{}", state.config.server.host, state.config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| FrontdeskError::Internal(format!("failed to bind gateway to {addr}: {e}")))?;

    recording::set_knowledge_sections(state.knowledge.snapshot().section_count());

    let limiter = state.limiter.clone();
    let pruner = tokio::spawn(async move {
        let mut interval = tokio::time::interval(limiter.window());
        loop {
            interval.tick().await;
            limiter.prune();
        }
    });

    let app = build_router(state);
    tracing::info!("gateway listening on http://{addr}");

    let served = axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown)
    .await;
    pruner.abort();

    served.map_err(|e| FrontdeskError::Internal(format!("gateway server error: {e}")))?;
    tracing::info!("gateway stopped");
    Ok(())
}
