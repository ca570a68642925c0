// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 Blackman Artificial Intelligence Technologies Inc.

//! LLM Provider trait and related types
//!
//! The command service only needs one operation from a model backend: turn a
//! system/user prompt pair into text.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::config::ModelConfig;
use crate::error::Result;
use crate::prompt::Prompt;

/// Main trait for LLM providers
#[async_trait]
pub trait LlmProvider: Send + Sync {
    /// Get the provider name (e.g., "openai-compat", "mock")
    fn name(&self) -> &str;

    /// Non-streaming completion
    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse>;
}

/// Request for completion
#[derive(Debug, Clone, PartialEq)]
pub struct CompletionRequest {
    /// Model to use
    pub model: String,

    /// System prompt
    pub system: String,

    /// User content
    pub user: String,

    /// Maximum tokens in response
    pub max_tokens: u32,

    /// Sampling temperature
    pub temperature: f32,

    /// Nucleus sampling
    pub top_p: f32,
}

impl CompletionRequest {
    /// Create a request with the default generation parameters.
    pub fn new(model: impl Into<String>, prompt: Prompt) -> Self {
        let defaults = ModelConfig::default();
        Self {
            model: model.into(),
            system: prompt.system,
            user: prompt.user,
            max_tokens: defaults.max_tokens,
            temperature: defaults.temperature,
            top_p: defaults.top_p,
        }
    }

    /// Create a request using the model section of the settings.
    pub fn from_config(config: &ModelConfig, prompt: Prompt) -> Self {
        Self {
            model: config.model.clone(),
            system: prompt.system,
            user: prompt.user,
            max_tokens: config.max_tokens,
            temperature: config.temperature,
            top_p: config.top_p,
        }
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }
}

/// Response from a completion request
#[derive(Debug, Clone, PartialEq)]
pub struct CompletionResponse {
    /// Response ID, when the backend reports one
    pub id: Option<String>,

    /// Model used
    pub model: String,

    /// Generated text of the first choice
    pub content: String,

    /// Why generation stopped, as reported by the backend
    pub finish_reason: Option<String>,

    /// Token usage
    pub usage: Usage,
}

/// Token usage statistics
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Usage {
    #[serde(default)]
    pub prompt_tokens: u32,
    #[serde(default)]
    pub completion_tokens: u32,
}
