// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 Blackman Artificial Intelligence Technologies Inc.

use std::time::Duration;

use mockshell::error::{ApiError, MockshellError};
use mockshell::llm::providers::OpenAiCompatProvider;
use mockshell::llm::{CompletionRequest, LlmProvider};
use mockshell::prompt::Prompt;
use serde_json::json;
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn request() -> CompletionRequest {
    CompletionRequest::new(
        "test-model",
        Prompt {
            system: "You are a Linux terminal.".to_string(),
            user: "uname -a".to_string(),
        },
    )
}

async fn provider_for(server: &MockServer, timeout: Duration) -> OpenAiCompatProvider {
    OpenAiCompatProvider::new(
        "sk-test",
        format!("{}/v1/chat/completions", server.uri()),
        timeout,
    )
    .unwrap()
}

#[tokio::test]
async fn test_complete_success() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .and(header("authorization", "Bearer sk-test"))
        .and(body_partial_json(json!({
            "model": "test-model",
            "stream": false,
            "messages": [
                {"role": "system", "content": "You are a Linux terminal."},
                {"role": "user", "content": "uname -a"}
            ]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "cmpl-1",
            "model": "test-model",
            "choices": [{
                "message": {"role": "assistant", "content": "Linux mockshell 6.1.0 x86_64"},
                "finish_reason": "stop"
            }],
            "usage": {"prompt_tokens": 12, "completion_tokens": 8}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let provider = provider_for(&server, Duration::from_secs(5)).await;
    let response = provider.complete(request()).await.unwrap();

    assert_eq!(response.content, "Linux mockshell 6.1.0 x86_64");
    assert_eq!(response.id.as_deref(), Some("cmpl-1"));
    assert_eq!(response.finish_reason.as_deref(), Some("stop"));
    assert_eq!(response.usage.prompt_tokens, 12);
    assert_eq!(response.usage.completion_tokens, 8);
}

#[tokio::test]
async fn test_unauthorized_maps_to_authentication_failed() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(401).set_body_string("{\"error\":\"bad key\"}"))
        .mount(&server)
        .await;

    let provider = provider_for(&server, Duration::from_secs(5)).await;
    let err = provider.complete(request()).await.unwrap_err();
    assert!(matches!(
        err,
        MockshellError::Api(ApiError::AuthenticationFailed)
    ));
}

#[tokio::test]
async fn test_rate_limited_reads_retry_after() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(429).insert_header("retry-after", "17"))
        .mount(&server)
        .await;

    let provider = provider_for(&server, Duration::from_secs(5)).await;
    let err = provider.complete(request()).await.unwrap_err();
    assert!(matches!(err, MockshellError::Api(ApiError::RateLimited(17))));
}

#[tokio::test]
async fn test_server_error_extracts_message() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(
            ResponseTemplate::new(503)
                .set_body_json(json!({"error": {"message": "model overloaded"}})),
        )
        .mount(&server)
        .await;

    let provider = provider_for(&server, Duration::from_secs(5)).await;
    match provider.complete(request()).await.unwrap_err() {
        MockshellError::Api(ApiError::ServerError { status, message }) => {
            assert_eq!(status, 503);
            assert_eq!(message, "model overloaded");
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn test_server_error_without_body() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let provider = provider_for(&server, Duration::from_secs(5)).await;
    let err = provider.complete(request()).await.unwrap_err();
    assert!(err.to_string().contains("upstream returned status 500"));
}

#[tokio::test]
async fn test_missing_choices_is_invalid_response() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"choices": []})))
        .mount(&server)
        .await;

    let provider = provider_for(&server, Duration::from_secs(5)).await;
    let err = provider.complete(request()).await.unwrap_err();
    assert!(matches!(
        err,
        MockshellError::Api(ApiError::InvalidResponse(_))
    ));
}

#[tokio::test]
async fn test_slow_upstream_times_out() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"choices": []}))
                .set_delay(Duration::from_secs(2)),
        )
        .mount(&server)
        .await;

    let provider = provider_for(&server, Duration::from_millis(200)).await;
    let err = provider.complete(request()).await.unwrap_err();
    assert!(matches!(err, MockshellError::Api(ApiError::Timeout)));
}

#[tokio::test]
async fn test_unreachable_endpoint_is_network_error() {
    let provider = OpenAiCompatProvider::new(
        "sk-test",
        "http://127.0.0.1:9/v1/chat/completions",
        Duration::from_secs(2),
    )
    .unwrap();
    let err = provider.complete(request()).await.unwrap_err();
    assert!(matches!(
        err,
        MockshellError::Api(ApiError::Network(_)) | MockshellError::Api(ApiError::Timeout)
    ));
}

#[test]
fn test_provider_debug_hides_key() {
    let provider =
        OpenAiCompatProvider::new("sk-secret", "http://localhost/v1", Duration::from_secs(1))
            .unwrap();
    let debug = format!("{provider:?}");
    assert!(!debug.contains("sk-secret"));
    assert!(debug.contains("http://localhost/v1"));
    assert_eq!(provider.api_url(), "http://localhost/v1");
}
