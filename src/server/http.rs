// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 Blackman Artificial Intelligence Technologies Inc.

//! axum front end for the command service.

use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::State,
    http::{header, HeaderMap, HeaderName, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::Instrument;

use super::{CommandService, ServiceError, ServiceResponse};
use crate::error::{MockshellError, Result};
use crate::rate_limit::client_identity;

const NO_STORE: &str = "no-store, no-cache";
const RATE_LIMIT_REMAINING: &str = "x-ratelimit-remaining";

#[derive(Clone)]
struct AppState {
    service: Arc<CommandService>,
    client_ip_header: HeaderName,
}

impl IntoResponse for ServiceError {
    fn into_response(self) -> Response {
        let status =
            StatusCode::from_u16(self.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        let retry_after = match &self {
            ServiceError::RateLimited { retry_after, .. } => Some(*retry_after),
            _ => None,
        };

        let mut response = (status, Json(self.body())).into_response();
        if let Some(secs) = retry_after {
            response
                .headers_mut()
                .insert(header::RETRY_AFTER, HeaderValue::from(secs));
        }
        response
    }
}

impl IntoResponse for ServiceResponse {
    fn into_response(self) -> Response {
        let mut response = match self.result {
            Ok(reply) => (StatusCode::OK, Json(reply)).into_response(),
            Err(err) => err.into_response(),
        };

        let headers = response.headers_mut();
        headers.insert(header::CACHE_CONTROL, HeaderValue::from_static(NO_STORE));
        if let Some(remaining) = self.remaining {
            headers.insert(
                HeaderName::from_static(RATE_LIMIT_REMAINING),
                HeaderValue::from(remaining),
            );
        }
        response
    }
}

/// Build the router: `POST /api/command` and `GET /health`.
pub fn router(service: Arc<CommandService>, client_ip_header: &str) -> Result<Router> {
    let client_ip_header = HeaderName::from_bytes(client_ip_header.as_bytes()).map_err(|_| {
        MockshellError::Config(format!("invalid client IP header name: {client_ip_header}"))
    })?;

    let state = AppState {
        service,
        client_ip_header,
    };

    Ok(Router::new()
        .route("/api/command", post(handle_command))
        .route("/health", get(health_check))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state))
}

/// Bind `addr` and serve until Ctrl-C.
pub async fn serve(router: Router, addr: &str) -> Result<()> {
    let listener = TcpListener::bind(addr)
        .await
        .map_err(|e| MockshellError::Server(format!("failed to bind {addr}: {e}")))?;
    let local = listener.local_addr()?;
    tracing::info!(target: "mockshell.server", "listening on http://{}", local);

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| MockshellError::Server(e.to_string()))
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(target: "mockshell.server", "failed to listen for Ctrl-C: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!(target: "mockshell.server", "shutting down");
}

async fn handle_command(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> ServiceResponse {
    let identity = client_identity(
        headers
            .get(&state.client_ip_header)
            .and_then(|v| v.to_str().ok()),
    );
    let request_id = uuid::Uuid::new_v4();
    let span = tracing::info_span!(
        target: "mockshell.server",
        "command",
        %request_id,
        identity = %identity
    );

    async {
        let response = state.service.handle_json(&identity, &body).await;
        match &response.result {
            Ok(_) => tracing::info!(target: "mockshell.server", status = 200, "answered"),
            Err(err) => tracing::info!(
                target: "mockshell.server",
                status = err.status_code(),
                error = %err,
                "rejected"
            ),
        }
        response
    }
    .instrument(span)
    .await
}

async fn health_check() -> &'static str {
    "OK"
}
