// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Client configuration loaded from environment variables.
//!
//! A `.env` file in the working directory is honored for local development.
//! Command-line flags in the binary override what is loaded here.

use std::env;
use std::path::PathBuf;

/// Gateway base URL used when nothing is configured.
pub const DEFAULT_API_BASE_URL: &str = "http://localhost:8082/api";

/// Application ID the auth service expects on login.
pub const DEFAULT_APP_ID: i64 = 1;

/// Client configuration, loaded once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    /// Gateway base URL, including the `/api` prefix
    pub api_base_url: String,
    /// Application ID sent with login requests
    pub app_id: i64,
    /// Per-request timeout in seconds
    pub request_timeout_secs: u64,
    /// Where the bearer credential is persisted between runs
    pub credentials_path: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            app_id: DEFAULT_APP_ID,
            request_timeout_secs: 10,
            credentials_path: PathBuf::from(".sport-box/credentials.json"),
        }
    }
}

impl Config {
    /// Load configuration from environment variables, falling back to
    /// defaults for anything unset.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok(); // Load .env file if present

        let defaults = Self::default();

        Ok(Self {
            api_base_url: env::var("SPORT_BOX_API_URL")
                .map(|v| v.trim().trim_end_matches('/').to_string())
                .unwrap_or(defaults.api_base_url),
            app_id: parse_var("SPORT_BOX_APP_ID")?.unwrap_or(defaults.app_id),
            request_timeout_secs: parse_var("SPORT_BOX_TIMEOUT_SECS")?
                .unwrap_or(defaults.request_timeout_secs),
            credentials_path: env::var("SPORT_BOX_CREDENTIALS")
                .map(PathBuf::from)
                .unwrap_or(defaults.credentials_path),
        })
    }

    /// Config pointing at a local mock gateway, for tests.
    pub fn test_default(api_base_url: &str) -> Self {
        Self {
            api_base_url: api_base_url.trim_end_matches('/').to_string(),
            request_timeout_secs: 5,
            credentials_path: env::temp_dir().join("sport-box-test-credentials.json"),
            ..Self::default()
        }
    }
}

fn parse_var<T: std::str::FromStr>(name: &'static str) -> Result<Option<T>, ConfigError> {
    match env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| ConfigError::Invalid(name, raw)),
        Err(_) => Ok(None),
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for environment variable {0}: {1:?}")]
    Invalid(&'static str, String),
}
