// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! One-shot OAuth redirect listener used by `whoop-auth`.
//!
//! The router serves only the redirect URI's path. The first request there
//! that carries a verdict (a code, a provider error, or a bad state) is
//! handed to the waiting caller and the server shuts down.

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::Html,
    routing::get,
    Router,
};
use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use ring::rand::{SecureRandom, SystemRandom};
use serde::Deserialize;
use std::sync::{Arc, Mutex};
use tokio::net::TcpListener;
use tokio::sync::oneshot;
use tower_http::trace::TraceLayer;

use crate::error::{AppError, Result};
use crate::markup::escape_markup;

/// What the browser brought back.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CallbackOutcome {
    /// Authorization granted.
    Code(String),
    /// The user (or WHOOP) refused.
    Denied {
        error: String,
        description: Option<String>,
    },
    /// `state` did not match the value we sent.
    StateMismatch,
}

struct CallbackState {
    expected_state: String,
    outcome_tx: Mutex<Option<oneshot::Sender<CallbackOutcome>>>,
}

/// Query parameters WHOOP appends to the redirect URI.
#[derive(Deserialize)]
pub struct CallbackParams {
    #[serde(default)]
    code: Option<String>,
    #[serde(default)]
    state: Option<String>,
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    error_description: Option<String>,
}

/// Build the callback router for `path` and the receiver for its verdict.
pub fn create_router(
    path: &str,
    expected_state: String,
) -> (Router, oneshot::Receiver<CallbackOutcome>) {
    let (outcome_tx, outcome_rx) = oneshot::channel();
    let state = Arc::new(CallbackState {
        expected_state,
        outcome_tx: Mutex::new(Some(outcome_tx)),
    });

    let router = Router::new()
        .route(path, get(oauth_callback))
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    (router, outcome_rx)
}

/// Handle the redirect from WHOOP.
async fn oauth_callback(
    State(state): State<Arc<CallbackState>>,
    Query(params): Query<CallbackParams>,
) -> (StatusCode, Html<String>) {
    let (outcome, status, html) = if params.state.as_deref() != Some(state.expected_state.as_str())
    {
        tracing::warn!("OAuth callback state mismatch");
        (
            CallbackOutcome::StateMismatch,
            StatusCode::BAD_REQUEST,
            page(
                "Error: Invalid State",
                "State validation failed. This may be a CSRF attack.",
            ),
        )
    } else if let Some(code) = params.code {
        (
            CallbackOutcome::Code(code),
            StatusCode::OK,
            page(
                "Authentication Successful!",
                "You can close this window and return to the terminal.",
            ),
        )
    } else {
        let error = params.error.unwrap_or_else(|| "Unknown error".to_string());
        let description = params.error_description;
        tracing::warn!(error = %error, "OAuth error from WHOOP");
        let body = page(
            &format!("Error: {}", error),
            description.as_deref().unwrap_or(""),
        );
        (
            CallbackOutcome::Denied { error, description },
            StatusCode::BAD_REQUEST,
            body,
        )
    };

    let sender = state.outcome_tx.lock().ok().and_then(|mut tx| tx.take());
    match sender {
        Some(tx) => {
            let _ = tx.send(outcome);
        }
        None => tracing::debug!("Callback already answered, ignoring"),
    }

    (status, Html(html))
}

fn page(heading: &str, message: &str) -> String {
    format!(
        "<html><body><h1>{}</h1><p>{}</p></body></html>",
        escape_markup(heading),
        escape_markup(message)
    )
}

/// Random `state` value: 32 bytes of CSPRNG output, URL-safe base64.
pub fn generate_state() -> Result<String> {
    let mut bytes = [0u8; 32];
    SystemRandom::new()
        .fill(&mut bytes)
        .map_err(|_| AppError::Internal(anyhow::anyhow!("System RNG unavailable")))?;
    Ok(URL_SAFE_NO_PAD.encode(bytes))
}

/// Bind the listener for `redirect_uri`; returns it with the path to serve.
///
/// Bound before the operator is sent to WHOOP so a quick redirect cannot
/// arrive before anything is listening.
pub async fn bind_redirect_listener(redirect_uri: &str) -> Result<(TcpListener, String)> {
    let url = reqwest::Url::parse(redirect_uri)
        .map_err(|e| AppError::OAuth(format!("Invalid redirect URI {}: {}", redirect_uri, e)))?;
    let host = url
        .host_str()
        .ok_or_else(|| AppError::OAuth(format!("Redirect URI has no host: {}", redirect_uri)))?;
    let port = url.port_or_known_default().unwrap_or(80);

    let listener = TcpListener::bind((host, port)).await?;
    tracing::info!(
        address = %format!("{}:{}", host, port),
        path = url.path(),
        "Listening for OAuth callback"
    );
    Ok((listener, url.path().to_string()))
}

impl CallbackOutcome {
    /// The authorization code, or the reason there is none.
    pub fn into_code(self) -> Result<String> {
        match self {
            CallbackOutcome::Code(code) => Ok(code),
            CallbackOutcome::StateMismatch => Err(AppError::OAuth(
                "State validation failed on callback".to_string(),
            )),
            CallbackOutcome::Denied { error, description } => Err(AppError::OAuth(format!(
                "Authorization denied: {} {}",
                error,
                description.unwrap_or_default()
            ))),
        }
    }
}

/// Serve the callback router on `listener` until one verdict arrives.
pub async fn serve_until_callback(
    listener: TcpListener,
    path: &str,
    expected_state: String,
) -> Result<CallbackOutcome> {
    let (router, outcome_rx) = create_router(path, expected_state);
    let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();

    let server = tokio::spawn(async move {
        axum::serve(listener, router)
            .with_graceful_shutdown(async move {
                let _ = shutdown_rx.await;
            })
            .await
    });

    let outcome = outcome_rx
        .await
        .map_err(|_| AppError::OAuth("Callback listener stopped without a result".to_string()));

    let _ = shutdown_tx.send(());
    server
        .await
        .map_err(|e| AppError::Internal(anyhow::anyhow!("Callback server task failed: {}", e)))??;

    outcome
}
