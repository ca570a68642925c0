// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 Blackman Artificial Intelligence Technologies Inc.

//! Error types for mockshell
//!
//! This module defines the error types shared by the terminal session, the
//! command service and the model client. Errors at the HTTP boundary are
//! modelled separately in [`crate::server::ServiceError`].

use thiserror::Error;

/// Main error type for mockshell operations
#[derive(Error, Debug)]
pub enum MockshellError {
    /// API-related errors
    #[error("API error: {0}")]
    Api(#[from] ApiError),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Session errors
    #[error("Session error: {0}")]
    Session(String),

    /// Server startup or transport errors
    #[error("Server error: {0}")]
    Server(String),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// HTTP request errors
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

/// API-specific error types
#[derive(Error, Debug)]
pub enum ApiError {
    /// Authentication failed (invalid API key)
    #[error("Authentication failed: invalid API key")]
    AuthenticationFailed,

    /// Rate limited by the remote side
    #[error("Rate limited: retry after {0} seconds")]
    RateLimited(u32),

    /// The command was refused by the remote side
    #[error("Command not permitted: {0}")]
    Forbidden(String),

    /// Network connectivity error
    #[error("Network error: {0}")]
    Network(String),

    /// Invalid response from API
    #[error("Invalid API response: {0}")]
    InvalidResponse(String),

    /// API returned an error
    #[error("API error ({status}): {message}")]
    ServerError { status: u16, message: String },

    /// Timeout waiting for response
    #[error("Request timed out")]
    Timeout,
}

impl ApiError {
    /// Map a transport failure from reqwest onto the API taxonomy.
    pub fn from_transport(err: &reqwest::Error) -> Self {
        if err.is_timeout() {
            ApiError::Timeout
        } else if err.is_decode() {
            ApiError::InvalidResponse(err.to_string())
        } else {
            ApiError::Network(err.to_string())
        }
    }
}

/// Result type alias for mockshell operations
pub type Result<T> = std::result::Result<T, MockshellError>;
