// SPDX-FileCopyrightText: 2026 Frontdesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP gateway for Frontdesk.
//!
//! Serves the embedded chat page and the `/api/*` JSON endpoints. A chat
//! turn sanitizes the message, gathers history, grounds the system prompt
//! with retrieved knowledge sections, calls the [`ChatProvider`] and records
//! the exchange. Answers are returned as JSON or relayed as Server-Sent
//! Events.
//!
//! [`ChatProvider`]: frontdesk_core::ChatProvider

pub mod chat;
pub mod error;
pub mod handlers;
pub mod markdown;
pub mod prompt;
pub mod rate_limit;
pub mod recording;
pub mod sanitize;
pub mod security;
pub mod server;
pub mod sse;
pub mod state;

pub use error::ApiError;
pub use server::{build_router, start_server};
pub use state::{GatewayState, MetricsRender};
