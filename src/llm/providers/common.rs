// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 Blackman Artificial Intelligence Technologies Inc.

use reqwest::header::{HeaderMap, RETRY_AFTER};
use serde::Deserialize;

use crate::error::{ApiError, MockshellError};

/// Fallback wait when a 429 carries no usable Retry-After.
pub(crate) const DEFAULT_RETRY_AFTER_SECS: u32 = 60;

/// Parse numeric Retry-After header (seconds).
pub(crate) fn parse_retry_after_seconds(headers: &HeaderMap) -> Option<u32> {
    headers
        .get(RETRY_AFTER)
        .and_then(|v| v.to_str().ok())
        .and_then(|s| s.trim().parse::<u32>().ok())
}

/// Construct a standardized server error.
pub(crate) fn server_error(status: u16, message: impl Into<String>) -> MockshellError {
    MockshellError::Api(ApiError::ServerError {
        status,
        message: message.into(),
    })
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorField,
}

/// Either `{"error": "text"}` or `{"error": {"message": "text"}}`.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ErrorField {
    Text(String),
    Detail { message: String },
}

/// Pull a human readable message out of an error body, if it has one.
pub(crate) fn error_message(body: &str) -> Option<String> {
    let envelope: ErrorEnvelope = serde_json::from_str(body).ok()?;
    let message = match envelope.error {
        ErrorField::Text(text) => text,
        ErrorField::Detail { message } => message,
    };
    (!message.trim().is_empty()).then_some(message)
}
