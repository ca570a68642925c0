// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 Blackman Artificial Intelligence Technologies Inc.

use std::path::{Path, PathBuf};

use crate::error::Result;

use super::Settings;

/// Overrides the model endpoint URL.
pub const ENV_MODEL_API_URL: &str = "AI_MODEL_API_URL";
/// Overrides the model identifier.
pub const ENV_MODEL_NAME: &str = "AI_MODEL_NAME";
/// Overrides the response token ceiling.
pub const ENV_MAX_TOKENS: &str = "AI_MODEL_MAX_TOKENS";

impl Settings {
    /// Get the default settings file path.
    pub fn default_path() -> PathBuf {
        Self::mockshell_home().join("settings.json")
    }

    /// Load settings from the default path.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::default_path())
    }

    /// Load settings from a specific path, then apply environment overrides.
    pub fn load_from(path: &Path) -> Result<Self> {
        let mut settings = if path.exists() {
            let content = std::fs::read_to_string(path)?;
            serde_json::from_str(&content)?
        } else {
            Self::default()
        };

        settings.apply_env_overrides();
        Ok(settings)
    }

    /// Save settings to a specific path.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Apply `AI_MODEL_*` environment variables on top of file values.
    pub fn apply_env_overrides(&mut self) {
        if let Ok(url) = std::env::var(ENV_MODEL_API_URL) {
            if !url.trim().is_empty() {
                self.model.api_url = url;
            }
        }
        if let Ok(model) = std::env::var(ENV_MODEL_NAME) {
            if !model.trim().is_empty() {
                self.model.model = model;
            }
        }
        if let Ok(raw) = std::env::var(ENV_MAX_TOKENS) {
            match raw.trim().parse::<u32>() {
                Ok(max_tokens) => self.model.max_tokens = max_tokens,
                Err(_) => {
                    tracing::warn!("Ignoring non-numeric {}={:?}", ENV_MAX_TOKENS, raw);
                }
            }
        }
    }

    /// Get the mockshell home directory (~/.mockshell or $MOCKSHELL_HOME).
    pub fn mockshell_home() -> PathBuf {
        if let Ok(home) = std::env::var("MOCKSHELL_HOME") {
            return PathBuf::from(home);
        }
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".mockshell")
    }
}
