// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 Blackman Artificial Intelligence Technologies Inc.

//! Command service
//!
//! [`CommandService`] is the framework-free server boundary: it checks the
//! credential, consults the rate governor, validates the request, classifies
//! the command and either answers locally or asks the model. The axum layer
//! in [`http`] only moves bytes and headers around it.

use std::sync::Arc;

use thiserror::Error;

use crate::command::{
    command_not_found, help_text, Classifier, CommandCategory, CommandLine,
    FOREIGN_SCRIPT_MESSAGE, NOT_PERMITTED_MESSAGE,
};
use crate::config::{ModelConfig, Settings};
use crate::error::{ApiError, MockshellError, Result};
use crate::llm::providers::OpenAiCompatProvider;
use crate::llm::{CompletionRequest, LlmProvider};
use crate::prompt::PromptBuilder;
use crate::rate_limit::RateGovernor;

pub mod http;
pub mod wire;

pub use http::{router, serve};
pub use wire::{CommandReply, CommandRequest, ErrorBody};

/// Failures reported to terminal clients, one per HTTP status category.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ServiceError {
    /// Malformed or oversized request (400)
    #[error("{0}")]
    BadRequest(String),

    /// Disallowed command (403)
    #[error("{0}")]
    Forbidden(String),

    /// Client exceeded its request budget (429)
    #[error("Too many requests, please try again later")]
    RateLimited { remaining: usize, retry_after: u64 },

    /// Misconfiguration or upstream failure (500)
    #[error("{0}")]
    Internal(String),

    /// The model did not answer in time (504)
    #[error("The request timed out, please try again later")]
    UpstreamTimeout,
}

impl ServiceError {
    pub fn status_code(&self) -> u16 {
        match self {
            ServiceError::BadRequest(_) => 400,
            ServiceError::Forbidden(_) => 403,
            ServiceError::RateLimited { .. } => 429,
            ServiceError::Internal(_) => 500,
            ServiceError::UpstreamTimeout => 504,
        }
    }

    pub fn body(&self) -> ErrorBody {
        let (remaining, retry_after) = match self {
            ServiceError::RateLimited {
                remaining,
                retry_after,
            } => (Some(*remaining), Some(*retry_after)),
            _ => (None, None),
        };
        ErrorBody {
            error: self.to_string(),
            remaining,
            retry_after,
        }
    }

    /// Map a model failure to what the client is allowed to see.
    fn from_upstream(err: &MockshellError) -> Self {
        match err {
            MockshellError::Api(ApiError::Timeout) => ServiceError::UpstreamTimeout,
            MockshellError::Api(ApiError::AuthenticationFailed) => ServiceError::Internal(
                "The model service rejected the configured credential".to_string(),
            ),
            MockshellError::Api(ApiError::RateLimited(_)) => ServiceError::Internal(
                "The model service is busy, please try again later".to_string(),
            ),
            _ => ServiceError::Internal("Internal server error".to_string()),
        }
    }
}

/// Result of one handled request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceResponse {
    /// Quota left for the caller; absent when the request never reached
    /// the rate governor
    pub remaining: Option<usize>,
    pub result: std::result::Result<CommandReply, ServiceError>,
}

impl ServiceResponse {
    fn rejected(remaining: Option<usize>, err: ServiceError) -> Self {
        Self {
            remaining,
            result: Err(err),
        }
    }
}

/// Server-side command pipeline.
pub struct CommandService {
    classifier: Classifier,
    prompts: PromptBuilder,
    governor: RateGovernor,
    provider: Option<Arc<dyn LlmProvider>>,
    model: ModelConfig,
    max_command_length: usize,
}

impl std::fmt::Debug for CommandService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CommandService")
            .field("governor", &self.governor)
            .field("provider", &self.provider.as_ref().map(|p| p.name().to_string()))
            .field("model", &self.model.model)
            .field("max_command_length", &self.max_command_length)
            .finish()
    }
}

impl CommandService {
    /// Create a service. A `None` provider means no credential is configured
    /// and every request fails with a 500.
    pub fn new(provider: Option<Arc<dyn LlmProvider>>, governor: RateGovernor) -> Self {
        Self {
            classifier: Classifier::default(),
            prompts: PromptBuilder::new(),
            governor,
            provider,
            model: ModelConfig::default(),
            max_command_length: crate::config::ServerConfig::default().max_command_length,
        }
    }

    /// Build the service described by the settings, talking to the
    /// configured OpenAI-compatible endpoint.
    pub fn from_settings(settings: &Settings) -> Result<Self> {
        let provider: Option<Arc<dyn LlmProvider>> = match settings.get_api_key() {
            Some(key) => Some(Arc::new(OpenAiCompatProvider::from_config(
                &settings.model,
                key,
            )?)),
            None => {
                tracing::error!(
                    target: "mockshell.server",
                    "missing API key: {} is not set",
                    settings.model.api_key_env
                );
                None
            }
        };

        Ok(Self::new(provider, RateGovernor::from_config(&settings.rate_limit))
            .with_model_config(settings.model.clone())
            .with_max_command_length(settings.server.max_command_length))
    }

    pub fn with_classifier(mut self, classifier: Classifier) -> Self {
        self.classifier = classifier;
        self
    }

    pub fn with_prompt_builder(mut self, prompts: PromptBuilder) -> Self {
        self.prompts = prompts;
        self
    }

    pub fn with_model_config(mut self, model: ModelConfig) -> Self {
        self.model = model;
        self
    }

    pub fn with_max_command_length(mut self, max_command_length: usize) -> Self {
        self.max_command_length = max_command_length;
        self
    }

    pub fn governor(&self) -> &RateGovernor {
        &self.governor
    }

    pub fn classifier(&self) -> &Classifier {
        &self.classifier
    }

    pub fn has_provider(&self) -> bool {
        self.provider.is_some()
    }

    /// Handle a typed request from `identity`.
    pub async fn handle(&self, identity: &str, request: CommandRequest) -> ServiceResponse {
        self.process(identity, move || Ok(request)).await
    }

    /// Handle a raw JSON body from `identity`. The body is only parsed after
    /// the credential and rate checks, so malformed bodies still count
    /// against the caller's budget.
    pub async fn handle_json(&self, identity: &str, body: &[u8]) -> ServiceResponse {
        self.process(identity, || {
            serde_json::from_slice::<CommandRequest>(body)
                .map_err(|_| ServiceError::BadRequest("Invalid request format".to_string()))
        })
        .await
    }

    async fn process<F>(&self, identity: &str, parse: F) -> ServiceResponse
    where
        F: FnOnce() -> std::result::Result<CommandRequest, ServiceError>,
    {
        let provider = match &self.provider {
            Some(provider) => Arc::clone(provider),
            None => {
                return ServiceResponse::rejected(
                    None,
                    ServiceError::Internal("API key is not configured".to_string()),
                );
            }
        };

        let decision = self.governor.admit_now(identity);
        if !decision.admitted {
            let retry_after = decision.retry_after_secs(std::time::Instant::now());
            tracing::info!(
                target: "mockshell.server",
                identity,
                retry_after,
                "rate limited"
            );
            return ServiceResponse::rejected(
                Some(decision.remaining),
                ServiceError::RateLimited {
                    remaining: decision.remaining,
                    retry_after,
                },
            );
        }
        let remaining = Some(decision.remaining);

        let request = match parse() {
            Ok(request) => request,
            Err(err) => return ServiceResponse::rejected(remaining, err),
        };

        let line = CommandLine::new(request.command);
        if line.trimmed().chars().count() > self.max_command_length {
            return ServiceResponse::rejected(
                remaining,
                ServiceError::BadRequest(format!(
                    "Command exceeds the {} character limit",
                    self.max_command_length
                )),
            );
        }

        let category = self.classifier.classify_line(&line);
        tracing::info!(
            target: "mockshell.server",
            identity,
            category = category.label(),
            "classified command"
        );
        if request.ascii_art.is_some_and(|hint| hint != category.is_ascii_art()) {
            tracing::debug!(
                target: "mockshell.server",
                "client ascii_art hint disagrees with classification"
            );
        }

        let result = match &category {
            CommandCategory::Empty => Err(ServiceError::BadRequest("Command is empty".to_string())),
            CommandCategory::ContainsForeignScript => {
                Ok(CommandReply::text(FOREIGN_SCRIPT_MESSAGE))
            }
            CommandCategory::Unrecognized { token } => {
                Ok(CommandReply::text(command_not_found(token)))
            }
            CommandCategory::DangerousRejected => {
                Err(ServiceError::Forbidden(NOT_PERMITTED_MESSAGE.to_string()))
            }
            CommandCategory::BuiltinHelp => Ok(CommandReply::text(help_text())),
            CommandCategory::BuiltinClear
            | CommandCategory::BuiltinToggleAnimation(_)
            | CommandCategory::AnimationTrigger(_) => Ok(CommandReply::text("")),
            CommandCategory::AsciiArtRequest(_) | CommandCategory::PassThrough => {
                self.ask_model(provider.as_ref(), &category, &line).await
            }
        };

        ServiceResponse { remaining, result }
    }

    async fn ask_model(
        &self,
        provider: &dyn LlmProvider,
        category: &CommandCategory,
        line: &CommandLine,
    ) -> std::result::Result<CommandReply, ServiceError> {
        let prompt = self.prompts.build(category, line).ok_or_else(|| {
            ServiceError::Internal("No prompt for this command".to_string())
        })?;
        let request = CompletionRequest::from_config(&self.model, prompt);

        match provider.complete(request).await {
            Ok(response) => Ok(CommandReply::text(response.content)),
            Err(err) => {
                tracing::warn!(
                    target: "mockshell.server",
                    provider = provider.name(),
                    error = %err,
                    "model call failed"
                );
                Err(ServiceError::from_upstream(&err))
            }
        }
    }
}
