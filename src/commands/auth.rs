// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Interactive OAuth authorization: browser consent, code exchange, token file.

use chrono::Utc;

use crate::config::Config;
use crate::db::TokenStore;
use crate::error::Result;
use crate::models::TokenRecord;
use crate::routes::callback;
use crate::services::whoop::WhoopClient;

pub async fn run(config: &Config) -> Result<TokenRecord> {
    let client = WhoopClient::new(config);
    let store = TokenStore::new(&config.paths.tokens_file);

    let state = callback::generate_state()?;
    let (listener, path) = callback::bind_redirect_listener(client.redirect_uri()).await?;
    let auth_url = client.authorize_url(&state);

    eprintln!("\nOpen this URL in your browser to authenticate:\n");
    eprintln!("{}\n", auth_url);

    // Try to open the browser automatically
    if open::that(&auth_url).is_err() {
        eprintln!("(Could not open browser automatically, please copy the URL above)");
    }

    let code = callback::serve_until_callback(listener, &path, state)
        .await?
        .into_code()?;
    tracing::info!("Authorization code received, exchanging for tokens");

    complete(&client, &store, &code).await
}

/// Exchange `code` and persist the resulting token record.
pub async fn complete(
    client: &WhoopClient,
    store: &TokenStore,
    code: &str,
) -> Result<TokenRecord> {
    let response = client.exchange_code(code).await?;
    let record = TokenRecord::from_response(response, Utc::now())?;

    store.save(&record)?;

    tracing::info!(
        access_token = %prefix(&record.access_token),
        refresh_token = %prefix(&record.refresh_token),
        expires_at = %record.expires_at,
        path = %store.path().display(),
        "Authentication successful, tokens saved"
    );
    Ok(record)
}

/// First 20 characters, enough to tell tokens apart in logs.
fn prefix(token: &str) -> String {
    let head: String = token.chars().take(20).collect();
    format!("{}...", head)
}
