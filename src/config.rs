// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Configuration loaded from environment variables.
//!
//! A `.env` file in the working directory is honoured for local runs. The
//! scheduled job supplies the same variables from its secrets store.

use std::env;
use std::path::PathBuf;

const DEFAULT_API_BASE: &str = "https://api.prod.whoop.com/developer/v2";
const DEFAULT_AUTH_URL: &str = "https://api.prod.whoop.com/oauth/oauth2/auth";
const DEFAULT_TOKEN_URL: &str = "https://api.prod.whoop.com/oauth/oauth2/token";
const DEFAULT_REDIRECT_URI: &str = "http://localhost:8080/callback";
const DEFAULT_FETCH_DAYS: i64 = 30;

/// Longest accepted fetch window (ten years).
pub const MAX_FETCH_DAYS: i64 = 3650;

/// Where the pipeline reads and writes its files.
///
/// The visualizer only needs these, so they load without credentials.
#[derive(Debug, Clone)]
pub struct PathConfig {
    /// Persisted OAuth token record
    pub tokens_file: PathBuf,
    /// Directory holding one JSON file per resource category
    pub data_dir: PathBuf,
    /// Directory the SVG charts are written to
    pub chart_dir: PathBuf,
}

impl Default for PathConfig {
    fn default() -> Self {
        Self {
            tokens_file: PathBuf::from("tokens.json"),
            data_dir: PathBuf::from("data"),
            chart_dir: PathBuf::from("."),
        }
    }
}

impl PathConfig {
    /// Load path settings from the environment.
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        Self {
            tokens_file: lookup("WHOOP_TOKENS_FILE")
                .map(PathBuf::from)
                .unwrap_or(defaults.tokens_file),
            data_dir: lookup("WHOOP_DATA_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.data_dir),
            chart_dir: lookup("WHOOP_CHART_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.chart_dir),
        }
    }
}

/// Configuration for the stages that talk to WHOOP.
#[derive(Debug, Clone)]
pub struct Config {
    // --- Credentials ---
    /// WHOOP OAuth client ID
    pub whoop_client_id: String,
    /// WHOOP OAuth client secret
    pub whoop_client_secret: String,
    /// Refresh token used to bootstrap when no token file exists
    pub bootstrap_refresh_token: Option<String>,

    // --- Endpoints ---
    /// Redirect URI registered with the WHOOP developer app
    pub redirect_uri: String,
    /// Base URL of the v2 developer API
    pub api_base: String,
    /// OAuth authorization endpoint
    pub auth_url: String,
    /// OAuth token endpoint
    pub token_url: String,

    // --- Fetch behaviour ---
    /// Length of the trailing window, in days
    pub fetch_window_days: i64,

    pub paths: PathConfig,
}

impl Default for Config {
    /// Default config for testing only.
    fn default() -> Self {
        Self {
            whoop_client_id: "test_client_id".to_string(),
            whoop_client_secret: "test_secret".to_string(),
            bootstrap_refresh_token: None,
            redirect_uri: DEFAULT_REDIRECT_URI.to_string(),
            api_base: DEFAULT_API_BASE.to_string(),
            auth_url: DEFAULT_AUTH_URL.to_string(),
            token_url: DEFAULT_TOKEN_URL.to_string(),
            fetch_window_days: DEFAULT_FETCH_DAYS,
            paths: PathConfig::default(),
        }
    }
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok(); // Load .env file if present
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let secret = |key: &'static str| -> Result<String, ConfigError> {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
                .ok_or(ConfigError::Missing(key))
        };

        Ok(Self {
            whoop_client_id: secret("WHOOP_CLIENT_ID")?,
            whoop_client_secret: secret("WHOOP_CLIENT_SECRET")?,
            bootstrap_refresh_token: secret("WHOOP_REFRESH_TOKEN").ok(),

            redirect_uri: lookup("REDIRECT_URI")
                .unwrap_or_else(|| DEFAULT_REDIRECT_URI.to_string()),
            api_base: lookup("WHOOP_API_BASE")
                .map(|v| v.trim_end_matches('/').to_string())
                .unwrap_or_else(|| DEFAULT_API_BASE.to_string()),
            auth_url: lookup("WHOOP_AUTH_URL").unwrap_or_else(|| DEFAULT_AUTH_URL.to_string()),
            token_url: lookup("WHOOP_TOKEN_URL").unwrap_or_else(|| DEFAULT_TOKEN_URL.to_string()),

            fetch_window_days: match lookup("WHOOP_FETCH_DAYS") {
                Some(raw) => raw
                    .trim()
                    .parse()
                    .ok()
                    .filter(|days: &i64| (1..=MAX_FETCH_DAYS).contains(days))
                    .ok_or(ConfigError::Invalid("WHOOP_FETCH_DAYS", raw))?,
                None => DEFAULT_FETCH_DAYS,
            },

            paths: PathConfig::from_lookup(&lookup),
        })
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    Missing(&'static str),

    #[error("Invalid value for {0}: {1:?}")]
    Invalid(&'static str, String),
}
