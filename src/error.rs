// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Application error types shared by the three pipeline stages.

use crate::config::ConfigError;

/// Application error type.
///
/// Every binary surfaces these through `main`, which turns any error into a
/// nonzero exit for the scheduling layer.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("WHOOP API error: {0}")]
    WhoopApi(String),

    #[error("OAuth error: {0}")]
    OAuth(String),

    #[error("Token store error: {0}")]
    TokenStore(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    /// Marker message for a 401 from the WHOOP API.
    pub const WHOOP_TOKEN_ERROR: &'static str = "Unauthorized: access token rejected";

    /// Marker message for a 429 from the WHOOP API.
    pub const WHOOP_RATE_LIMIT: &'static str = "Rate limit exceeded";

    /// True if this error means the access token was rejected upstream.
    pub fn is_whoop_token_error(&self) -> bool {
        matches!(self, AppError::WhoopApi(msg) if msg == Self::WHOOP_TOKEN_ERROR)
    }

    /// True if WHOOP asked us to slow down.
    pub fn is_rate_limited(&self) -> bool {
        matches!(self, AppError::WhoopApi(msg) if msg == Self::WHOOP_RATE_LIMIT)
    }
}

/// Result type alias used throughout the crate.
pub type Result<T> = std::result::Result<T, AppError>;
