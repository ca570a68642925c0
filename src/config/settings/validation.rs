// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 Blackman Artificial Intelligence Technologies Inc.

use crate::error::{MockshellError, Result};

use super::Settings;

impl Settings {
    /// Get the model API key, checking env var first.
    pub fn get_api_key(&self) -> Option<String> {
        // Priority: env var > config file.
        std::env::var(&self.model.api_key_env)
            .ok()
            .or_else(|| self.model.api_key.clone())
            .filter(|key| !key.trim().is_empty())
    }

    /// Whether a model credential is available. Only presence is checked.
    pub fn has_api_key(&self) -> bool {
        self.get_api_key().is_some()
    }

    /// Reject values that would make the service misbehave.
    pub fn validate(&self) -> Result<()> {
        if self.model.api_url.trim().is_empty() {
            return Err(MockshellError::Config("model.api_url is empty".to_string()));
        }
        if self.model.max_tokens == 0 {
            return Err(MockshellError::Config(
                "model.max_tokens must be greater than zero".to_string(),
            ));
        }
        if self.model.timeout_secs == 0 {
            return Err(MockshellError::Config(
                "model.timeout_secs must be greater than zero".to_string(),
            ));
        }
        if self.rate_limit.max_requests == 0 {
            return Err(MockshellError::Config(
                "rate_limit.max_requests must be greater than zero".to_string(),
            ));
        }
        if self.rate_limit.window_secs == 0 {
            return Err(MockshellError::Config(
                "rate_limit.window_secs must be greater than zero".to_string(),
            ));
        }
        if !(0.0..=1.0).contains(&self.rate_limit.sweep_probability) {
            return Err(MockshellError::Config(format!(
                "rate_limit.sweep_probability must be within 0.0-1.0, got {}",
                self.rate_limit.sweep_probability
            )));
        }
        if self.server.max_command_length == 0 {
            return Err(MockshellError::Config(
                "server.max_command_length must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}
