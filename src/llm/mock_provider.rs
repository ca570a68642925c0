// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 Blackman Artificial Intelligence Technologies Inc.

//! Mock LLM provider for testing
//!
//! Provides a configurable mock implementation of the LlmProvider trait
//! that can be used in tests without making real API calls.

use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use crate::error::{ApiError, MockshellError, Result};
use crate::llm::provider::{CompletionRequest, CompletionResponse, LlmProvider, Usage};

/// A scripted outcome for one `complete` call.
#[derive(Clone, Debug)]
pub enum MockResponse {
    /// Return this text as the first choice
    Text(String),
    /// Fail with this API error
    Error(MockFailure),
}

/// Cloneable description of an API failure.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum MockFailure {
    AuthenticationFailed,
    RateLimited(u32),
    Network(String),
    InvalidResponse(String),
    ServerError { status: u16, message: String },
    Timeout,
}

impl From<MockFailure> for MockshellError {
    fn from(failure: MockFailure) -> Self {
        let api = match failure {
            MockFailure::AuthenticationFailed => ApiError::AuthenticationFailed,
            MockFailure::RateLimited(secs) => ApiError::RateLimited(secs),
            MockFailure::Network(message) => ApiError::Network(message),
            MockFailure::InvalidResponse(message) => ApiError::InvalidResponse(message),
            MockFailure::ServerError { status, message } => {
                ApiError::ServerError { status, message }
            }
            MockFailure::Timeout => ApiError::Timeout,
        };
        MockshellError::Api(api)
    }
}

/// A mock LLM provider for testing
#[derive(Clone)]
pub struct MockProvider {
    /// Provider name
    name: String,
    /// Configured responses
    responses: Arc<Mutex<Vec<MockResponse>>>,
    /// Call counter
    call_count: Arc<AtomicUsize>,
    /// Recorded requests
    recorded_requests: Arc<Mutex<Vec<CompletionRequest>>>,
    /// Artificial latency before answering
    delay: Option<Duration>,
}

impl Default for MockProvider {
    fn default() -> Self {
        Self::new()
    }
}

fn lock_recover<'a, T>(mutex: &'a Mutex<T>) -> MutexGuard<'a, T> {
    match mutex.lock() {
        Ok(guard) => guard,
        Err(poisoned) => {
            tracing::warn!("Mock provider lock was poisoned, recovering");
            poisoned.into_inner()
        }
    }
}

impl MockProvider {
    /// Create a new mock provider
    pub fn new() -> Self {
        Self {
            name: "mock".to_string(),
            responses: Arc::new(Mutex::new(vec![MockResponse::Text(
                "Mock response".to_string(),
            )])),
            call_count: Arc::new(AtomicUsize::new(0)),
            recorded_requests: Arc::new(Mutex::new(vec![])),
            delay: None,
        }
    }

    /// Create a mock provider with a custom name
    pub fn with_name(name: impl Into<String>) -> Self {
        let mut provider = Self::new();
        provider.name = name.into();
        provider
    }

    /// Set the text response
    pub fn with_response(self, text: impl Into<String>) -> Self {
        self.with_script(vec![MockResponse::Text(text.into())])
    }

    /// Queue multiple responses (returned in order, the last one repeats)
    pub fn with_responses(self, texts: Vec<String>) -> Self {
        self.with_script(texts.into_iter().map(MockResponse::Text).collect())
    }

    /// Fail every call with the given error
    pub fn with_error(self, failure: MockFailure) -> Self {
        self.with_script(vec![MockResponse::Error(failure)])
    }

    /// Replace the scripted outcomes
    pub fn with_script(self, script: Vec<MockResponse>) -> Self {
        let mut responses = lock_recover(&self.responses);
        *responses = script;
        drop(responses);
        self
    }

    /// Sleep before answering each call
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Get the number of times complete() was called
    pub fn call_count(&self) -> usize {
        self.call_count.load(Ordering::SeqCst)
    }

    /// Get all recorded requests
    pub fn recorded_requests(&self) -> Vec<CompletionRequest> {
        lock_recover(&self.recorded_requests).clone()
    }

    /// Get the last request made
    pub fn last_request(&self) -> Option<CompletionRequest> {
        lock_recover(&self.recorded_requests).last().cloned()
    }

    /// Reset call count and recorded requests
    pub fn reset(&self) {
        self.call_count.store(0, Ordering::SeqCst);
        lock_recover(&self.recorded_requests).clear();
    }

    /// Get the next response
    fn next_response(&self) -> MockResponse {
        let count = self.call_count.fetch_add(1, Ordering::SeqCst);
        let responses = lock_recover(&self.responses);
        // Step through responses, then keep returning the last one
        match responses.last() {
            None => MockResponse::Text(String::new()),
            Some(last) => responses.get(count).unwrap_or(last).clone(),
        }
    }
}

#[async_trait]
impl LlmProvider for MockProvider {
    fn name(&self) -> &str {
        &self.name
    }

    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse> {
        lock_recover(&self.recorded_requests).push(request.clone());

        let response = self.next_response();

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        match response {
            MockResponse::Text(text) => Ok(CompletionResponse {
                id: Some(format!("cmpl_{}", uuid::Uuid::new_v4().simple())),
                model: request.model,
                usage: Usage {
                    prompt_tokens: (request.user.len() / 4).max(1) as u32,
                    completion_tokens: (text.len() / 4).max(1) as u32,
                },
                content: text,
                finish_reason: Some("stop".to_string()),
            }),
            MockResponse::Error(failure) => Err(failure.into()),
        }
    }
}
