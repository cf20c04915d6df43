// SPDX-FileCopyrightText: 2026 Frontdesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP error type for the gateway.
//!
//! Every failure leaves the gateway as `{"error": "..."}` with a matching
//! status code. Upstream details are logged, not returned to the browser.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use frontdesk_core::FrontdeskError;

/// Shown when the chat provider has no API key.
pub const NOT_CONFIGURED_MESSAGE: &str =
    "API key not configured. Please set OPENROUTER_API_KEY.";

/// API error with a client-facing message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    /// Malformed or rejected input.
    BadRequest(String),
    /// No route matched.
    NotFound,
    /// The client exceeded its request budget.
    TooManyRequests,
    /// An upstream service is missing or failing.
    ServiceUnavailable(String),
    /// An upstream service did not answer in time.
    GatewayTimeout(String),
    /// Anything else.
    Internal(String),
}

impl ApiError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::BadRequest(message.into())
    }

    pub fn status(&self) -> StatusCode {
        match self {
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::NotFound => StatusCode::NOT_FOUND,
            Self::TooManyRequests => StatusCode::TOO_MANY_REQUESTS,
            Self::ServiceUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            Self::GatewayTimeout(_) => StatusCode::GATEWAY_TIMEOUT,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn message(&self) -> &str {
        match self {
            Self::BadRequest(msg)
            | Self::ServiceUnavailable(msg)
            | Self::GatewayTimeout(msg)
            | Self::Internal(msg) => msg,
            Self::NotFound => "Not found",
            Self::TooManyRequests => "Too many requests. Please try again later.",
        }
    }
}

impl From<FrontdeskError> for ApiError {
    fn from(err: FrontdeskError) -> Self {
        match err {
            FrontdeskError::Config(detail) => {
                tracing::error!(%detail, "provider not configured");
                Self::ServiceUnavailable(NOT_CONFIGURED_MESSAGE.to_string())
            }
            FrontdeskError::Timeout { duration } => {
                tracing::error!(?duration, "upstream request timed out");
                Self::GatewayTimeout("Request timed out. Please try again.".to_string())
            }
            FrontdeskError::Provider { message, .. } => {
                tracing::error!(%message, "chat provider failed");
                Self::ServiceUnavailable(
                    "The assistant is unavailable right now. Please try again later.".to_string(),
                )
            }
            FrontdeskError::Speech { message, .. } => {
                tracing::error!(%message, "speech synthesis failed");
                Self::ServiceUnavailable("Text-to-speech is unavailable right now.".to_string())
            }
            other => {
                tracing::error!(error = %other, "unexpected gateway error");
                Self::Internal("An unexpected error occurred".to_string())
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = serde_json::json!({ "error": self.message() });
        (self.status(), Json(body)).into_response()
    }
}
