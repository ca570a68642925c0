// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 Blackman Artificial Intelligence Technologies Inc.

//! OpenAI-compatible chat completions provider
//!
//! Talks to any endpoint that speaks the `/v1/chat/completions` dialect
//! (SiliconFlow, DeepSeek, OpenRouter and friends). Only non-streaming
//! completions are needed.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use super::common::{
    error_message, parse_retry_after_seconds, server_error, DEFAULT_RETRY_AFTER_SECS,
};
use crate::config::ModelConfig;
use crate::error::{ApiError, MockshellError, Result};
use crate::llm::provider::{CompletionRequest, CompletionResponse, LlmProvider, Usage};

/// Provider for OpenAI-compatible chat completion endpoints
pub struct OpenAiCompatProvider {
    client: Client,
    api_key: String,
    api_url: String,
}

impl std::fmt::Debug for OpenAiCompatProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenAiCompatProvider")
            .field("api_url", &self.api_url)
            .finish_non_exhaustive()
    }
}

impl OpenAiCompatProvider {
    /// Create a provider whose requests give up after `timeout`.
    pub fn new(
        api_key: impl Into<String>,
        api_url: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            api_key: api_key.into(),
            api_url: api_url.into(),
        })
    }

    /// Create a provider from the model section of the settings.
    pub fn from_config(config: &ModelConfig, api_key: impl Into<String>) -> Result<Self> {
        Self::new(
            api_key,
            config.api_url.clone(),
            Duration::from_secs(config.timeout_secs),
        )
    }

    pub fn api_url(&self) -> &str {
        &self.api_url
    }

    fn build_request<'a>(&self, request: &'a CompletionRequest) -> ChatRequest<'a> {
        ChatRequest {
            model: &request.model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: &request.system,
                },
                ChatMessage {
                    role: "user",
                    content: &request.user,
                },
            ],
            max_tokens: request.max_tokens,
            temperature: request.temperature,
            top_p: request.top_p,
            stream: false,
        }
    }

    /// Parse an error response
    fn parse_error(status: u16, retry_after: Option<u32>, body: &str) -> MockshellError {
        match status {
            401 => MockshellError::Api(ApiError::AuthenticationFailed),
            429 => MockshellError::Api(ApiError::RateLimited(
                retry_after.unwrap_or(DEFAULT_RETRY_AFTER_SECS),
            )),
            _ => {
                let message = error_message(body).unwrap_or_else(|| {
                    format!("upstream returned status {}", status)
                });
                server_error(status, message)
            }
        }
    }
}

#[async_trait]
impl LlmProvider for OpenAiCompatProvider {
    fn name(&self) -> &str {
        "openai-compat"
    }

    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse> {
        let body = self.build_request(&request);

        tracing::debug!(
            target: "mockshell.llm",
            url = %self.api_url,
            model = %request.model,
            "sending completion request"
        );

        let response = self
            .client
            .post(&self.api_url)
            .header("Authorization", format!("Bearer {}", &self.api_key))
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await
            .map_err(|e| ApiError::from_transport(&e))?;

        let status = response.status().as_u16();

        if !response.status().is_success() {
            let retry_after = parse_retry_after_seconds(response.headers());
            let body = response.text().await.unwrap_or_default();
            tracing::warn!(
                target: "mockshell.llm",
                status,
                body = %body,
                "completion request failed"
            );
            return Err(Self::parse_error(status, retry_after, &body));
        }

        let api_response: ChatResponse = response
            .json()
            .await
            .map_err(|e| ApiError::from_transport(&e))?;

        let choice = api_response.choices.into_iter().next().ok_or_else(|| {
            MockshellError::Api(ApiError::InvalidResponse(
                "No choices in response".to_string(),
            ))
        })?;

        Ok(CompletionResponse {
            id: api_response.id,
            model: api_response.model.unwrap_or(request.model),
            content: choice.message.content.unwrap_or_default(),
            finish_reason: choice.finish_reason,
            usage: api_response.usage.unwrap_or_default(),
        })
    }
}

// Wire types

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    max_tokens: u32,
    temperature: f32,
    top_p: f32,
    stream: bool,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    id: Option<String>,
    #[serde(default)]
    model: Option<String>,
    #[serde(default)]
    choices: Vec<ChatChoice>,
    #[serde(default)]
    usage: Option<Usage>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
    #[serde(default)]
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ChatChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prompt::Prompt;

    fn provider() -> OpenAiCompatProvider {
        OpenAiCompatProvider::new(
            "sk-test",
            "http://localhost:1/v1/chat/completions",
            Duration::from_secs(5),
        )
        .unwrap()
    }

    fn request() -> CompletionRequest {
        CompletionRequest::new(
            "Qwen/Qwen2.5-Coder-7B-Instruct",
            Prompt {
                system: "sys".to_string(),
                user: "uptime".to_string(),
            },
        )
    }

    #[test]
    fn test_provider_name() {
        assert_eq!(provider().name(), "openai-compat");
    }

    #[test]
    fn test_from_config_uses_api_url() {
        let config = ModelConfig::default();
        let provider = OpenAiCompatProvider::from_config(&config, "key").unwrap();
        assert_eq!(provider.api_url(), config.api_url);
    }

    #[test]
    fn test_debug_hides_api_key() {
        let debug = format!("{:?}", provider());
        assert!(!debug.contains("sk-test"));
    }

    #[test]
    fn test_build_request_shape() {
        let provider = provider();
        let request = request();
        let body = serde_json::to_value(provider.build_request(&request)).unwrap();

        assert_eq!(body["model"], "Qwen/Qwen2.5-Coder-7B-Instruct");
        assert_eq!(body["stream"], false);
        assert_eq!(body["max_tokens"], 512);
        assert_eq!(body["messages"][0]["role"], "system");
        assert_eq!(body["messages"][0]["content"], "sys");
        assert_eq!(body["messages"][1]["role"], "user");
        assert_eq!(body["messages"][1]["content"], "uptime");
    }

    #[test]
    fn test_parse_error_authentication() {
        let err = OpenAiCompatProvider::parse_error(401, None, "");
        assert!(matches!(err, MockshellError::Api(ApiError::AuthenticationFailed)));
    }

    #[test]
    fn test_parse_error_rate_limit() {
        let err = OpenAiCompatProvider::parse_error(429, Some(7), "");
        assert!(matches!(err, MockshellError::Api(ApiError::RateLimited(7))));

        let err = OpenAiCompatProvider::parse_error(429, None, "");
        assert!(matches!(err, MockshellError::Api(ApiError::RateLimited(60))));
    }

    #[test]
    fn test_parse_error_server_message() {
        let err = OpenAiCompatProvider::parse_error(
            503,
            None,
            r#"{"error": {"message": "model is overloaded"}}"#,
        );
        match err {
            MockshellError::Api(ApiError::ServerError { status, message }) => {
                assert_eq!(status, 503);
                assert_eq!(message, "model is overloaded");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_parse_error_opaque_body() {
        let err = OpenAiCompatProvider::parse_error(502, None, "<html>oops</html>");
        assert!(err.to_string().contains("status 502"));
        assert!(!err.to_string().contains("html"));
    }

    #[test]
    fn test_response_deserialize_minimal() {
        let response: ChatResponse =
            serde_json::from_str(r#"{"choices":[{"message":{"content":"hi"}}]}"#).unwrap();
        assert!(response.id.is_none());
        assert_eq!(response.choices[0].message.content.as_deref(), Some("hi"));
    }
}
