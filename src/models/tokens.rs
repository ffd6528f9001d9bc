// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! OAuth token record persisted between runs.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};

/// Margin before token expiration when we proactively refresh (5 minutes).
pub const TOKEN_REFRESH_MARGIN_SECS: i64 = 5 * 60;

/// Token endpoint response, for both the code exchange and refresh grants.
#[derive(Debug, Clone, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    /// WHOOP omits this on some refreshes; the previous one stays valid then.
    #[serde(default)]
    pub refresh_token: Option<String>,
    /// Lifetime of the access token in seconds
    pub expires_in: i64,
    #[serde(default)]
    pub scope: Option<String>,
    #[serde(default)]
    pub token_type: Option<String>,
}

/// The token file contents.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TokenRecord {
    pub access_token: String,
    pub refresh_token: String,
    /// When the access token stops being accepted
    pub expires_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scope: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token_type: Option<String>,
}

impl TokenRecord {
    /// Build a record from a code exchange response.
    ///
    /// The authorization code grant must hand back a refresh token since we
    /// ask for the `offline` scope.
    pub fn from_response(response: TokenResponse, now: DateTime<Utc>) -> Result<Self> {
        let expires_at = expiry(now, response.expires_in)?;
        let refresh_token = response.refresh_token.ok_or_else(|| {
            AppError::OAuth(
                "Token response has no refresh token; was the offline scope granted?".to_string(),
            )
        })?;
        Ok(Self {
            access_token: response.access_token,
            refresh_token,
            expires_at,
            scope: response.scope,
            token_type: response.token_type,
        })
    }

    /// Record that only knows a refresh token.
    ///
    /// The access token is empty and already expired, so the first use
    /// forces a refresh.
    pub fn from_refresh_token(refresh_token: String) -> Self {
        Self {
            access_token: String::new(),
            refresh_token,
            expires_at: DateTime::<Utc>::UNIX_EPOCH,
            scope: None,
            token_type: None,
        }
    }

    /// Fold a refresh response into this record.
    ///
    /// The record is left untouched if the response is rejected.
    pub fn apply_refresh(&mut self, response: TokenResponse, now: DateTime<Utc>) -> Result<()> {
        self.expires_at = expiry(now, response.expires_in)?;
        self.access_token = response.access_token;
        if let Some(refresh_token) = response.refresh_token {
            self.refresh_token = refresh_token;
        }
        if response.scope.is_some() {
            self.scope = response.scope;
        }
        if response.token_type.is_some() {
            self.token_type = response.token_type;
        }
        Ok(())
    }

    /// True if the access token is expired or expires within the margin.
    pub fn needs_refresh(&self, now: DateTime<Utc>) -> bool {
        self.access_token.is_empty()
            || now + Duration::seconds(TOKEN_REFRESH_MARGIN_SECS) >= self.expires_at
    }
}

/// `now + expires_in` seconds, rejecting lifetimes chrono cannot represent.
fn expiry(now: DateTime<Utc>, expires_in: i64) -> Result<DateTime<Utc>> {
    Duration::try_seconds(expires_in)
        .and_then(|lifetime| now.checked_add_signed(lifetime))
        .ok_or_else(|| AppError::OAuth(format!("Invalid token lifetime: {}s", expires_in)))
}
