// SPDX-FileCopyrightText: 2026 Frontdesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Per-client sliding-window rate limiting.
//!
//! Each client keeps the instants of its accepted requests inside the
//! window. A request is rejected with 429 once the window is full.

use std::collections::VecDeque;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::extract::{ConnectInfo, Request, State};
use axum::http::HeaderMap;
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use dashmap::DashMap;

use crate::error::ApiError;
use crate::recording;

/// Client key used when neither a forwarded address nor the peer is known.
pub const UNKNOWN_CLIENT: &str = "unknown";

/// Shared sliding-window limiter keyed by client address.
#[derive(Clone)]
pub struct RateLimiter {
    max_requests: usize,
    window: Duration,
    buckets: Arc<DashMap<String, VecDeque<Instant>>>,
}

impl RateLimiter {
    pub fn new(max_requests: u32, window: Duration) -> Self {
        Self {
            max_requests: max_requests as usize,
            window,
            buckets: Arc::new(DashMap::new()),
        }
    }

    pub fn window(&self) -> Duration {
        self.window
    }

    /// Records a request for `client` and reports whether it is allowed.
    pub fn check(&self, client: &str) -> bool {
        self.check_at(client, Instant::now())
    }

    fn check_at(&self, client: &str, now: Instant) -> bool {
        let mut bucket = self.buckets.entry(client.to_string()).or_default();
        while bucket
            .front()
            .is_some_and(|&t| now.saturating_duration_since(t) >= self.window)
        {
            bucket.pop_front();
        }
        if bucket.len() >= self.max_requests {
            return false;
        }
        bucket.push_back(now);
        true
    }

    /// Drops clients with no request inside the window.
    pub fn prune(&self) {
        let now = Instant::now();
        self.buckets.retain(|_, bucket| {
            bucket
                .back()
                .is_some_and(|&t| now.saturating_duration_since(t) < self.window)
        });
    }

    /// Number of clients currently tracked.
    pub fn tracked_clients(&self) -> usize {
        self.buckets.len()
    }
}

impl std::fmt::Debug for RateLimiter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RateLimiter")
            .field("max_requests", &self.max_requests)
            .field("window", &self.window)
            .field("tracked_clients", &self.buckets.len())
            .finish()
    }
}

/// First `X-Forwarded-For` entry, else the peer address.
pub fn client_key(headers: &HeaderMap, peer: Option<SocketAddr>) -> String {
    let forwarded = headers
        .get("x-forwarded-for")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(',').next())
        .map(str::trim)
        .filter(|v| !v.is_empty());

    match (forwarded, peer) {
        (Some(ip), _) => ip.to_string(),
        (None, Some(addr)) => addr.ip().to_string(),
        (None, None) => UNKNOWN_CLIENT.to_string(),
    }
}

/// Axum middleware enforcing the limit on the routes it wraps.
pub async fn rate_limit_middleware(
    State(limiter): State<RateLimiter>,
    request: Request,
    next: Next,
) -> Response {
    let peer = request
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| *addr);
    let client = client_key(request.headers(), peer);

    if limiter.check(&client) {
        next.run(request).await
    } else {
        tracing::warn!(%client, path = %request.uri().path(), "rate limit exceeded");
        recording::record_rate_limited();
        ApiError::TooManyRequests.into_response()
    }
}
