// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 Blackman Artificial Intelligence Technologies Inc.

//! HTTP endpoint tests against a live listener.

use std::sync::Arc;
use std::time::Duration;

use mockshell::error::{ApiError, MockshellError};
use mockshell::llm::mock_provider::{MockFailure, MockProvider};
use mockshell::llm::LlmProvider;
use mockshell::rate_limit::RateGovernor;
use mockshell::server::{self, CommandReply, CommandRequest, CommandService, ErrorBody};
use mockshell::session::{CommandBackend, RemoteBackend};
use serde_json::json;
use tokio::net::TcpListener;

async fn spawn_server(service: CommandService) -> String {
    let router = server::router(Arc::new(service), "x-forwarded-for").unwrap();
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    format!("http://{addr}")
}

fn service(provider: MockProvider, ceiling: usize) -> CommandService {
    let provider: Arc<dyn LlmProvider> = Arc::new(provider);
    CommandService::new(
        Some(provider),
        RateGovernor::new(ceiling, Duration::from_secs(60)),
    )
}

async fn post(base: &str, body: serde_json::Value, client_ip: &str) -> reqwest::Response {
    reqwest::Client::new()
        .post(format!("{base}/api/command"))
        .header("x-forwarded-for", client_ip)
        .json(&body)
        .send()
        .await
        .unwrap()
}

#[tokio::test]
async fn test_health_check() {
    let base = spawn_server(service(MockProvider::new(), 20)).await;
    let response = reqwest::get(format!("{base}/health")).await.unwrap();
    assert_eq!(response.status(), 200);
    assert_eq!(response.text().await.unwrap(), "OK");
}

#[tokio::test]
async fn test_pass_through_reply_and_headers() {
    let provider = MockProvider::new().with_response("/home/user");
    let base = spawn_server(service(provider.clone(), 20)).await;

    let response = post(&base, json!({"command": "pwd"}), "198.51.100.1").await;

    assert_eq!(response.status(), 200);
    assert_eq!(response.headers()["cache-control"], "no-store, no-cache");
    assert_eq!(response.headers()["x-ratelimit-remaining"], "19");
    let reply: CommandReply = response.json().await.unwrap();
    assert_eq!(reply.content(), Some("/home/user"));
    assert_eq!(provider.last_request().unwrap().user, "pwd");
}

#[tokio::test]
async fn test_dangerous_is_403() {
    let provider = MockProvider::new();
    let base = spawn_server(service(provider.clone(), 20)).await;

    let response = post(&base, json!({"command": "sudo reboot"}), "198.51.100.2").await;

    assert_eq!(response.status(), 403);
    let body: ErrorBody = response.json().await.unwrap();
    assert!(body.error.contains("Operation not permitted"));
    assert_eq!(provider.call_count(), 0);
}

#[tokio::test]
async fn test_malformed_body_is_400() {
    let base = spawn_server(service(MockProvider::new(), 20)).await;

    let response = reqwest::Client::new()
        .post(format!("{base}/api/command"))
        .header("content-type", "application/json")
        .body("{not json")
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 400);
    assert_eq!(response.headers()["x-ratelimit-remaining"], "19");

    let response = post(&base, json!({"cmd": "ls"}), "unknown").await;
    assert_eq!(response.status(), 400);
    let body: ErrorBody = response.json().await.unwrap();
    assert_eq!(body.error, "Invalid request format");
}

#[tokio::test]
async fn test_rate_limit_per_forwarded_address() {
    let base = spawn_server(service(MockProvider::new(), 3)).await;

    for expected in ["2", "1", "0"] {
        let response = post(&base, json!({"command": "help"}), "203.0.113.7").await;
        assert_eq!(response.status(), 200);
        assert_eq!(response.headers()["x-ratelimit-remaining"], expected);
    }

    let response = post(&base, json!({"command": "help"}), "203.0.113.7, 10.0.0.1").await;
    assert_eq!(response.status(), 429);
    let retry_after: u64 = response.headers()["retry-after"]
        .to_str()
        .unwrap()
        .parse()
        .unwrap();
    assert!(retry_after > 0 && retry_after <= 60);
    let body: ErrorBody = response.json().await.unwrap();
    assert_eq!(body.remaining, Some(0));
    assert_eq!(body.retry_after, Some(retry_after));

    let other = post(&base, json!({"command": "help"}), "203.0.113.8").await;
    assert_eq!(other.status(), 200);
}

#[tokio::test]
async fn test_missing_credential_is_500_without_quota() {
    let service = CommandService::new(None, RateGovernor::new(20, Duration::from_secs(60)));
    let base = spawn_server(service).await;

    let response = post(&base, json!({"command": "ls"}), "198.51.100.3").await;

    assert_eq!(response.status(), 500);
    assert!(response.headers().get("x-ratelimit-remaining").is_none());
}

#[tokio::test]
async fn test_upstream_failures() {
    let timeout = service(MockProvider::new().with_error(MockFailure::Timeout), 20);
    let base = spawn_server(timeout).await;
    let response = post(&base, json!({"command": "top"}), "a").await;
    assert_eq!(response.status(), 504);

    let failing = service(
        MockProvider::new().with_error(MockFailure::ServerError {
            status: 502,
            message: "upstream stack trace".to_string(),
        }),
        20,
    );
    let base = spawn_server(failing).await;
    let response = post(&base, json!({"command": "top"}), "a").await;
    assert_eq!(response.status(), 500);
    assert!(!response.text().await.unwrap().contains("stack trace"));
}

#[tokio::test]
async fn test_remote_backend_round_trip() {
    let provider = MockProvider::new().with_response("Mon Oct 19 09:00:00 UTC 2026");
    let base = spawn_server(service(provider, 20)).await;
    let backend = RemoteBackend::new(&base, Duration::from_secs(5)).unwrap();

    let text = backend.execute(CommandRequest::new("date")).await.unwrap();
    assert_eq!(text, "Mon Oct 19 09:00:00 UTC 2026");

    let err = backend
        .execute(CommandRequest::new("rm -rf /"))
        .await
        .unwrap_err();
    assert!(matches!(err, MockshellError::Api(ApiError::Forbidden(_))));
}

#[tokio::test]
async fn test_remote_backend_sees_rate_limit() {
    let base = spawn_server(service(MockProvider::new(), 1)).await;
    let backend = RemoteBackend::new(&base, Duration::from_secs(5)).unwrap();

    backend.execute(CommandRequest::new("help")).await.unwrap();
    let err = backend
        .execute(CommandRequest::new("help"))
        .await
        .unwrap_err();
    match err {
        MockshellError::Api(ApiError::RateLimited(secs)) => assert!(secs > 0 && secs <= 60),
        other => panic!("unexpected error: {other:?}"),
    }
}
