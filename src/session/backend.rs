// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 Blackman Artificial Intelligence Technologies Inc.

//! Where remote-bound commands are answered
//!
//! [`LocalBackend`] runs the command service in-process; [`RemoteBackend`]
//! posts to a running `mockshell serve` over HTTP.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;

use crate::error::{ApiError, MockshellError, Result};
use crate::llm::providers::common::{
    error_message, parse_retry_after_seconds, DEFAULT_RETRY_AFTER_SECS,
};
use crate::server::{CommandReply, CommandRequest, CommandService, ServiceError};

/// Identity the in-process backend presents to the rate governor.
pub const LOCAL_IDENTITY: &str = "local";

/// Answers commands that need the model.
#[async_trait]
pub trait CommandBackend: Send + Sync {
    fn name(&self) -> &str;

    /// Execute one command and return the text to display.
    async fn execute(&self, request: CommandRequest) -> Result<String>;
}

/// Runs the command service in the same process.
pub struct LocalBackend {
    service: Arc<CommandService>,
    identity: String,
}

impl LocalBackend {
    pub fn new(service: Arc<CommandService>) -> Self {
        Self {
            service,
            identity: LOCAL_IDENTITY.to_string(),
        }
    }

    pub fn with_identity(mut self, identity: impl Into<String>) -> Self {
        self.identity = identity.into();
        self
    }
}

/// Translate a service rejection into the error a remote caller would see.
fn rejection(err: ServiceError) -> ApiError {
    let status = err.status_code();
    match err {
        ServiceError::Forbidden(message) => ApiError::Forbidden(message),
        ServiceError::RateLimited { retry_after, .. } => {
            ApiError::RateLimited(u32::try_from(retry_after).unwrap_or(u32::MAX))
        }
        ServiceError::UpstreamTimeout => ApiError::Timeout,
        ServiceError::BadRequest(message) | ServiceError::Internal(message) => {
            ApiError::ServerError { status, message }
        }
    }
}

#[async_trait]
impl CommandBackend for LocalBackend {
    fn name(&self) -> &str {
        "local"
    }

    async fn execute(&self, request: CommandRequest) -> Result<String> {
        let response = self.service.handle(&self.identity, request).await;
        let reply = response.result.map_err(rejection)?;
        reply_content(reply)
    }
}

fn reply_content(reply: CommandReply) -> Result<String> {
    reply
        .choices
        .into_iter()
        .next()
        .map(|choice| choice.message.content)
        .ok_or_else(|| {
            MockshellError::Api(ApiError::InvalidResponse(
                "Invalid API response format".to_string(),
            ))
        })
}

/// Talks to a command endpoint over HTTP.
#[derive(Debug, Clone)]
pub struct RemoteBackend {
    client: Client,
    url: String,
}

impl RemoteBackend {
    /// `base_url` is the server root, e.g. `http://127.0.0.1:3000`.
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            url: format!("{}/api/command", base_url.trim_end_matches('/')),
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl CommandBackend for RemoteBackend {
    fn name(&self) -> &str {
        "remote"
    }

    async fn execute(&self, request: CommandRequest) -> Result<String> {
        let response = self
            .client
            .post(&self.url)
            .json(&request)
            .send()
            .await
            .map_err(|e| ApiError::from_transport(&e))?;

        let status = response.status().as_u16();
        if !response.status().is_success() {
            let retry_after = parse_retry_after_seconds(response.headers());
            let body = response.text().await.unwrap_or_default();
            let message = error_message(&body);
            tracing::debug!(target: "mockshell.session", status, "command endpoint refused request");

            let err = match status {
                403 => ApiError::Forbidden(
                    message.unwrap_or_else(|| "this command has been disabled".to_string()),
                ),
                429 => ApiError::RateLimited(retry_after.unwrap_or(DEFAULT_RETRY_AFTER_SECS)),
                _ => ApiError::ServerError {
                    status,
                    message: message.unwrap_or_else(|| "Command failed".to_string()),
                },
            };
            return Err(err.into());
        }

        let reply: CommandReply = response.json().await.map_err(|_| {
            MockshellError::Api(ApiError::InvalidResponse(
                "Invalid API response format".to_string(),
            ))
        })?;
        reply_content(reply)
    }
}
