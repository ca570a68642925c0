// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 Blackman Artificial Intelligence Technologies Inc.

//! Settings management for mockshell
//!
//! Handles loading settings from ~/.mockshell/settings.json and applying
//! environment overrides for the model endpoint.

use serde::{Deserialize, Serialize};

mod io;
mod validation;

pub use io::{ENV_MAX_TOKENS, ENV_MODEL_API_URL, ENV_MODEL_NAME};

/// Main settings structure, stored in ~/.mockshell/settings.json
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Settings {
    /// Remote model endpoint and generation parameters
    #[serde(default)]
    pub model: ModelConfig,

    /// Per-client request limits
    #[serde(default)]
    pub rate_limit: RateLimitConfig,

    /// HTTP endpoint settings
    #[serde(default)]
    pub server: ServerConfig,

    /// Interactive terminal settings
    #[serde(default)]
    pub terminal: TerminalConfig,
}

/// Remote model configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelConfig {
    /// Chat completions URL of an OpenAI-compatible API
    #[serde(default = "default_api_url")]
    pub api_url: String,

    /// Model identifier sent with every request
    #[serde(default = "default_model")]
    pub model: String,

    /// API key (if stored directly, not recommended)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    /// Environment variable name for API key
    #[serde(default = "default_api_key_env")]
    pub api_key_env: String,

    /// Maximum tokens for response
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,

    /// Sampling temperature
    #[serde(default = "default_temperature")]
    pub temperature: f32,

    /// Nucleus sampling
    #[serde(default = "default_top_p")]
    pub top_p: f32,

    /// Upper bound for a single model call
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            api_url: default_api_url(),
            model: default_model(),
            api_key: None,
            api_key_env: default_api_key_env(),
            max_tokens: default_max_tokens(),
            temperature: default_temperature(),
            top_p: default_top_p(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

/// Sliding window rate limit configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RateLimitConfig {
    /// Requests admitted per window and client
    #[serde(default = "default_max_requests")]
    pub max_requests: usize,

    /// Window length in seconds
    #[serde(default = "default_window_secs")]
    pub window_secs: u64,

    /// Chance (0.0-1.0) that a request sweeps stale clients
    #[serde(default = "default_sweep_probability")]
    pub sweep_probability: f64,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            max_requests: default_max_requests(),
            window_secs: default_window_secs(),
            sweep_probability: default_sweep_probability(),
        }
    }
}

/// HTTP endpoint configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Listen address
    #[serde(default = "default_bind")]
    pub bind: String,

    /// Longest accepted command, in characters
    #[serde(default = "default_max_command_length")]
    pub max_command_length: usize,

    /// Header carrying the client address
    #[serde(default = "default_client_ip_header")]
    pub client_ip_header: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: default_bind(),
            max_command_length: default_max_command_length(),
            client_ip_header: default_client_ip_header(),
        }
    }
}

/// Interactive terminal configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TerminalConfig {
    /// Command endpoint to use; the service runs in-process when unset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub server_url: Option<String>,

    /// Viewport width in pixels, used to place animations
    #[serde(default = "default_viewport_width")]
    pub viewport_width: f32,

    /// Viewport height in pixels
    #[serde(default = "default_viewport_height")]
    pub viewport_height: f32,
}

impl Default for TerminalConfig {
    fn default() -> Self {
        Self {
            server_url: None,
            viewport_width: default_viewport_width(),
            viewport_height: default_viewport_height(),
        }
    }
}

fn default_api_url() -> String {
    "https://api.siliconflow.cn/v1/chat/completions".to_string()
}

fn default_model() -> String {
    "Qwen/Qwen2.5-Coder-7B-Instruct".to_string()
}

fn default_api_key_env() -> String {
    "DEEPSEEK_API_KEY".to_string()
}

fn default_max_tokens() -> u32 {
    512
}

fn default_temperature() -> f32 {
    0.7
}

fn default_top_p() -> f32 {
    0.95
}

fn default_timeout_secs() -> u64 {
    180
}

fn default_max_requests() -> usize {
    20
}

fn default_window_secs() -> u64 {
    60
}

fn default_sweep_probability() -> f64 {
    0.1
}

fn default_bind() -> String {
    "127.0.0.1:3000".to_string()
}

fn default_max_command_length() -> usize {
    500
}

fn default_client_ip_header() -> String {
    "x-forwarded-for".to_string()
}

fn default_viewport_width() -> f32 {
    800.0
}

fn default_viewport_height() -> f32 {
    600.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_model_config_default() {
        let config = ModelConfig::default();
        assert!(config.api_key.is_none());
        assert_eq!(config.api_key_env, "DEEPSEEK_API_KEY");
        assert_eq!(config.max_tokens, 512);
        assert_eq!(config.timeout_secs, 180);
        assert!(config.api_url.ends_with("/chat/completions"));
    }

    #[test]
    fn test_rate_limit_config_default() {
        let config = RateLimitConfig::default();
        assert_eq!(config.max_requests, 20);
        assert_eq!(config.window_secs, 60);
        assert!((config.sweep_probability - 0.1).abs() < f64::EPSILON);
    }

    #[test]
    fn test_server_config_default() {
        let config = ServerConfig::default();
        assert_eq!(config.max_command_length, 500);
        assert_eq!(config.client_ip_header, "x-forwarded-for");
    }

    #[test]
    fn test_partial_json_fills_defaults() {
        let settings: Settings =
            serde_json::from_str(r#"{"rate_limit": {"max_requests": 5}}"#).unwrap();
        assert_eq!(settings.rate_limit.max_requests, 5);
        assert_eq!(settings.rate_limit.window_secs, 60);
        assert_eq!(settings.model.max_tokens, 512);
        assert!(settings.terminal.server_url.is_none());
    }

    #[test]
    fn test_api_key_not_serialized_when_absent() {
        let json = serde_json::to_string(&Settings::default()).unwrap();
        assert!(!json.contains("\"api_key\""));
        assert!(json.contains("api_key_env"));
    }
}
