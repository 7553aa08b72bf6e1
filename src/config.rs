// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Alexander Minges

//! Application configuration.
//!
//! Priority (highest to lowest): CLI flags, environment variables, TOML file, defaults.

use std::path::{Path, PathBuf};

use serde::Deserialize;
use url::Url;

use crate::error::ConfigError;

/// Webhook that receives statement submissions.
pub const DEFAULT_WEBHOOK_URL: &str = "https://workflows.snowealth.com.br/webhook-test/extrato";

/// Config file picked up from the working directory when no path is given.
pub const DEFAULT_CONFIG_FILE: &str = "extratos.toml";

/// Hosted data/auth service settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct BackendConfig {
    /// Base URL of the REST service; empty runs against the in-memory store.
    pub url: String,
    /// Public (anon) API key sent with every request.
    pub anon_key: String,
}

impl BackendConfig {
    pub fn is_offline(&self) -> bool {
        self.url.trim().is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub webhook_url: String,
    pub log_level: String,
    pub backend: BackendConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            webhook_url: DEFAULT_WEBHOOK_URL.to_string(),
            log_level: "info".to_string(),
            backend: BackendConfig::default(),
        }
    }
}

/// Overrides taken from the command line.
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    pub config_file: Option<PathBuf>,
    pub log_level: Option<String>,
}

impl AppConfig {
    /// Load configuration from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content =
            std::fs::read_to_string(path).map_err(|e| ConfigError::Io(e.to_string()))?;
        Self::from_toml(&content)
    }

    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Apply environment variable overrides.
    pub fn with_env_override(self) -> Self {
        self.with_overrides(|key| std::env::var(key).ok())
    }

    fn with_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(url) = lookup("EXTRATOS_WEBHOOK_URL") {
            self.webhook_url = url;
        }
        if let Some(url) = lookup("EXTRATOS_BACKEND_URL") {
            self.backend.url = url;
        }
        if let Some(key) = lookup("EXTRATOS_BACKEND_KEY") {
            self.backend.anon_key = key;
        }
        if let Some(level) = lookup("EXTRATOS_LOG_LEVEL") {
            self.log_level = level;
        }
        self
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        check_http_url("webhook_url", &self.webhook_url)?;
        if !self.backend.is_offline() {
            check_http_url("backend.url", &self.backend.url)?;
        }
        Ok(())
    }
}

fn check_http_url(name: &str, raw: &str) -> Result<Url, ConfigError> {
    let url = Url::parse(raw.trim())
        .map_err(|e| ConfigError::Invalid(format!("{name} is not a valid URL: {e}")))?;
    if !matches!(url.scheme(), "http" | "https") || url.host_str().is_none() {
        return Err(ConfigError::Invalid(format!(
            "{name} must be an http/https URL with a host"
        )));
    }
    Ok(url)
}

/// Build configuration from all sources.
pub fn build_config(cli: &CliOverrides) -> Result<AppConfig, ConfigError> {
    let mut config = match &cli.config_file {
        Some(path) => AppConfig::from_file(path)?,
        None => {
            let fallback = Path::new(DEFAULT_CONFIG_FILE);
            if fallback.exists() {
                AppConfig::from_file(fallback)?
            } else {
                AppConfig::default()
            }
        }
    }
    .with_env_override();

    if let Some(level) = &cli.log_level {
        config.log_level = level.clone();
    }

    config.validate()?;
    Ok(config)
}
