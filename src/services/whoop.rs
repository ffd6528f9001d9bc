// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! WHOOP API client for the OAuth grants and read-only data endpoints.
//!
//! Handles:
//! - Authorization code exchange and token refresh
//! - Collection fetching over a time window, following `next_token`
//! - Proactive refresh when the stored token is expiring
//! - One reactive refresh when WHOOP rejects a token we thought was valid

use crate::config::Config;
use crate::db::TokenStore;
use crate::error::{AppError, Result};
use crate::models::{ResourceKind, TokenRecord, TokenResponse};
use crate::time_utils::FetchWindow;
use chrono::Utc;
use serde::de::DeserializeOwned;
use serde_json::Value;

/// Scopes requested during authorization. `offline` yields a refresh token.
pub const SCOPES: &[&str] = &[
    "read:recovery",
    "read:cycles",
    "read:sleep",
    "read:workout",
    "read:profile",
    "read:body_measurement",
    "offline",
];

/// Largest page WHOOP serves for collection endpoints.
pub const PAGE_LIMIT: u32 = 25;

/// Stop following `next_token` after this many pages.
pub const MAX_PAGES: usize = 20;

/// Low-level WHOOP API client.
#[derive(Clone)]
pub struct WhoopClient {
    http: reqwest::Client,
    api_base: String,
    auth_url: String,
    token_url: String,
    client_id: String,
    client_secret: String,
    redirect_uri: String,
}

impl WhoopClient {
    /// Create a client from the loaded configuration.
    pub fn new(config: &Config) -> Self {
        Self {
            http: reqwest::Client::new(),
            api_base: config.api_base.clone(),
            auth_url: config.auth_url.clone(),
            token_url: config.token_url.clone(),
            client_id: config.whoop_client_id.clone(),
            client_secret: config.whoop_client_secret.clone(),
            redirect_uri: config.redirect_uri.clone(),
        }
    }

    pub fn redirect_uri(&self) -> &str {
        &self.redirect_uri
    }

    /// URL the operator visits to grant access.
    pub fn authorize_url(&self, state: &str) -> String {
        format!(
            "{}?client_id={}&redirect_uri={}&response_type=code&scope={}&state={}",
            self.auth_url,
            urlencoding::encode(&self.client_id),
            urlencoding::encode(&self.redirect_uri),
            urlencoding::encode(&SCOPES.join(" ")),
            urlencoding::encode(state),
        )
    }

    /// Exchange an authorization code for tokens.
    pub async fn exchange_code(&self, code: &str) -> Result<TokenResponse> {
        self.post_token_form(
            &[
                ("grant_type", "authorization_code"),
                ("code", code),
                ("client_id", self.client_id.as_str()),
                ("client_secret", self.client_secret.as_str()),
                ("redirect_uri", self.redirect_uri.as_str()),
            ],
            "Token exchange",
        )
        .await
    }

    /// Refresh an expired access token.
    pub async fn refresh_token(&self, refresh_token: &str) -> Result<TokenResponse> {
        self.post_token_form(
            &[
                ("grant_type", "refresh_token"),
                ("refresh_token", refresh_token),
                ("client_id", self.client_id.as_str()),
                ("client_secret", self.client_secret.as_str()),
                ("scope", "offline"),
            ],
            "Token refresh",
        )
        .await
    }

    /// GET an endpoint relative to the API base and return the raw JSON.
    pub async fn get_resource(
        &self,
        access_token: &str,
        endpoint: &str,
        query: &[(&str, String)],
    ) -> Result<Value> {
        let url = format!("{}/{}", self.api_base, endpoint);

        let response = self
            .http
            .get(&url)
            .bearer_auth(access_token)
            .query(query)
            .send()
            .await
            .map_err(|e| AppError::WhoopApi(e.to_string()))?;

        check_response_json(response).await
    }

    async fn post_token_form(&self, form: &[(&str, &str)], what: &str) -> Result<TokenResponse> {
        let response = self
            .http
            .post(&self.token_url)
            .form(form)
            .send()
            .await
            .map_err(|e| AppError::OAuth(format!("{} request failed: {}", what, e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            tracing::error!(status = %status, body = %body, "WHOOP {} failed", what);
            return Err(AppError::OAuth(format!(
                "{} failed: {} - {}",
                what, status, body
            )));
        }

        response
            .json()
            .await
            .map_err(|e| AppError::OAuth(format!("Failed to parse token response: {}", e)))
    }
}

/// Check response status and parse the JSON body.
async fn check_response_json<T: DeserializeOwned>(response: reqwest::Response) -> Result<T> {
    if !response.status().is_success() {
        let status = response.status();
        let body = response.text().await.unwrap_or_default();

        if status.as_u16() == 429 {
            tracing::warn!("WHOOP rate limit hit (429)");
            return Err(AppError::WhoopApi(AppError::WHOOP_RATE_LIMIT.to_string()));
        }

        if status.as_u16() == 401 {
            return Err(AppError::WhoopApi(AppError::WHOOP_TOKEN_ERROR.to_string()));
        }

        return Err(AppError::WhoopApi(format!("HTTP {}: {}", status, body)));
    }

    response
        .json()
        .await
        .map_err(|e| AppError::WhoopApi(format!("JSON parse error: {}", e)))
}

// ─────────────────────────────────────────────────────────────────────────────
// WhoopService - token lifecycle on top of the client
// ─────────────────────────────────────────────────────────────────────────────

/// High-level WHOOP service that owns the token record for one run.
///
/// Every refresh is written back to the token store before the refreshed
/// access token is used.
pub struct WhoopService {
    client: WhoopClient,
    store: TokenStore,
    tokens: TokenRecord,
}

impl WhoopService {
    pub fn new(client: WhoopClient, store: TokenStore, tokens: TokenRecord) -> Self {
        Self {
            client,
            store,
            tokens,
        }
    }

    /// Load the stored token record, or bootstrap one from
    /// `WHOOP_REFRESH_TOKEN` when the file does not exist yet.
    pub fn from_config(config: &Config) -> Result<Self> {
        let store = TokenStore::new(&config.paths.tokens_file);

        let tokens = match store.load()? {
            Some(tokens) => tokens,
            None => match &config.bootstrap_refresh_token {
                Some(refresh_token) => {
                    tracing::info!(
                        path = %store.path().display(),
                        "No token file, bootstrapping from WHOOP_REFRESH_TOKEN"
                    );
                    TokenRecord::from_refresh_token(refresh_token.clone())
                }
                None => {
                    return Err(AppError::TokenStore(format!(
                        "{} not found. Run whoop-auth first to authenticate.",
                        store.path().display()
                    )))
                }
            },
        };

        Ok(Self::new(WhoopClient::new(config), store, tokens))
    }

    // ─── Token Management ────────────────────────────────────────────────────

    /// Get a valid (non-expired) access token, refreshing first if needed.
    pub async fn get_valid_access_token(&mut self) -> Result<String> {
        if self.tokens.needs_refresh(Utc::now()) {
            tracing::info!(
                expires_at = %self.tokens.expires_at,
                "Access token expired, refreshing"
            );
            self.refresh().await?;
        }
        Ok(self.tokens.access_token.clone())
    }

    /// Exchange the refresh token and persist the result.
    pub async fn refresh(&mut self) -> Result<()> {
        let response = self.client.refresh_token(&self.tokens.refresh_token).await?;
        self.tokens.apply_refresh(response, Utc::now())?;
        self.store.save(&self.tokens)?;

        tracing::info!(expires_at = %self.tokens.expires_at, "Token refreshed and saved");
        Ok(())
    }

    /// GET with the current token; on a 401 refresh once and repeat.
    async fn get_authorized(
        &mut self,
        endpoint: &str,
        query: &[(&str, String)],
    ) -> Result<Value> {
        let access_token = self.get_valid_access_token().await?;

        match self.client.get_resource(&access_token, endpoint, query).await {
            Err(e) if e.is_whoop_token_error() => {
                tracing::info!(endpoint, "Access token rejected, refreshing");
                self.refresh().await?;
                self.client
                    .get_resource(&self.tokens.access_token, endpoint, query)
                    .await
            }
            other => other,
        }
    }

    // ─── API Wrappers ────────────────────────────────────────────────────────

    /// Fetch one resource category.
    ///
    /// Collections are fetched over `window`; multiple pages are merged into
    /// the first page's document with `next_token` cleared.
    pub async fn fetch_resource(
        &mut self,
        kind: ResourceKind,
        window: &FetchWindow,
    ) -> Result<Value> {
        if !kind.is_collection() {
            return self.get_authorized(kind.endpoint(), &[]).await;
        }

        let mut document: Option<Value> = None;
        let mut next_token: Option<String> = None;

        for page in 1..=MAX_PAGES {
            let mut query: Vec<(&str, String)> = window.query_params().to_vec();
            query.push(("limit", PAGE_LIMIT.to_string()));
            if let Some(token) = &next_token {
                query.push(("nextToken", token.clone()));
            }

            let mut page_doc = self.get_authorized(kind.endpoint(), &query).await?;
            next_token = page_doc
                .get("next_token")
                .and_then(Value::as_str)
                .filter(|t| !t.is_empty())
                .map(str::to_string);

            document = Some(match document.take() {
                None => page_doc,
                Some(mut merged) => {
                    append_records(&mut merged, &mut page_doc);
                    merged
                }
            });

            if next_token.is_none() {
                break;
            }
            if page == MAX_PAGES {
                tracing::warn!(%kind, pages = page, "Page limit reached, data truncated");
            } else {
                tracing::debug!(%kind, page, "Following next_token");
            }
        }

        let mut document = document.unwrap_or_else(|| serde_json::json!({ "records": [] }));
        if let Some(obj) = document.as_object_mut() {
            if obj.contains_key("next_token") {
                obj.insert("next_token".to_string(), Value::Null);
            }
        }
        Ok(document)
    }
}

/// Move the `records` of `page` onto the end of `merged`'s `records`.
fn append_records(merged: &mut Value, page: &mut Value) {
    let Some(Value::Array(more)) = page.get_mut("records").map(Value::take) else {
        return;
    };
    match merged.get_mut("records") {
        Some(Value::Array(records)) => records.extend(more),
        _ => {
            if let Some(obj) = merged.as_object_mut() {
                obj.insert("records".to_string(), Value::Array(more));
            }
        }
    }
}
