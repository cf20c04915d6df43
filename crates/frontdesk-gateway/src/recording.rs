// SPDX-FileCopyrightText: 2026 Frontdesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Metric registration and recording helpers.
//!
//! Uses the metrics-rs facade with the Prometheus exporter. The binary calls
//! [`install_recorder`] once and hands the render function to the gateway,
//! which serves it at `GET /metrics`.

use frontdesk_core::FrontdeskError;
use metrics::{describe_counter, describe_gauge, describe_histogram};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};

/// Install the Prometheus recorder globally and register descriptions.
///
/// Only one recorder can be installed per process.
pub fn install_recorder() -> Result<PrometheusHandle, FrontdeskError> {
    let handle = PrometheusBuilder::new().install_recorder().map_err(|e| {
        FrontdeskError::Internal(format!("failed to install Prometheus recorder: {e}"))
    })?;
    register_metrics();
    tracing::info!("prometheus metrics recorder installed");
    Ok(handle)
}

/// Register all Frontdesk metric descriptions.
pub fn register_metrics() {
    describe_counter!("frontdesk_chat_requests_total", "Chat turns by outcome");
    describe_counter!("frontdesk_tokens_total", "Tokens consumed by the chat provider");
    describe_counter!(
        "frontdesk_rate_limited_total",
        "Requests rejected by the rate limiter"
    );
    describe_counter!("frontdesk_tts_requests_total", "Speech synthesis requests");
    describe_gauge!(
        "frontdesk_knowledge_sections",
        "Sections in the current knowledge snapshot"
    );
    describe_histogram!(
        "frontdesk_response_latency_seconds",
        "Chat provider latency in seconds"
    );
}

/// Record a finished chat turn. `outcome` is `ok` or an error class.
pub fn record_chat(outcome: &'static str, streamed: bool) {
    let mode = if streamed { "stream" } else { "json" };
    metrics::counter!("frontdesk_chat_requests_total", "outcome" => outcome, "mode" => mode)
        .increment(1);
}

/// Record token consumption reported by the provider.
pub fn record_tokens(model: &str, input: u32, output: u32) {
    metrics::counter!("frontdesk_tokens_total", "model" => model.to_string(), "type" => "input")
        .increment(u64::from(input));
    metrics::counter!("frontdesk_tokens_total", "model" => model.to_string(), "type" => "output")
        .increment(u64::from(output));
}

pub fn record_rate_limited() {
    metrics::counter!("frontdesk_rate_limited_total").increment(1);
}

pub fn record_tts(outcome: &'static str) {
    metrics::counter!("frontdesk_tts_requests_total", "outcome" => outcome).increment(1);
}

pub fn set_knowledge_sections(count: usize) {
    metrics::gauge!("frontdesk_knowledge_sections").set(count as f64);
}

/// Record chat provider latency.
pub fn record_latency(seconds: f64) {
    metrics::histogram!("frontdesk_response_latency_seconds").record(seconds);
}
