// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! In-process stand-in for the WHOOP API.
//!
//! Serves the OAuth token endpoint and the v2 data endpoints on a random
//! local port and records every request in arrival order.

#![allow(dead_code)]

use axum::{
    extract::{Path, Query, State},
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Form, Json, Router,
};
use chrono::{DateTime, Duration, Utc};
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use whoop_tracker::config::{Config, PathConfig};
use whoop_tracker::db::TokenStore;
use whoop_tracker::models::TokenRecord;

pub const REFRESH_TOKEN: &str = "valid_refresh";
pub const AUTH_CODE: &str = "good_code";
pub const FRESH_ACCESS: &str = "fresh_access";

/// One request as seen by the mock.
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    /// `"POST token"` or `"GET <endpoint>"`
    pub call: String,
    pub params: HashMap<String, String>,
}

#[derive(Default)]
pub struct MockBehavior {
    /// Endpoint answering 500
    pub fail_endpoint: Option<&'static str>,
    /// Endpoint answering 401 to every token, refreshed or not
    pub reject_token_endpoint: Option<&'static str>,
    /// Endpoint answering 403 with an `Unauthorized` body
    pub forbidden_endpoint: Option<&'static str>,
    /// Endpoint answering 429
    pub rate_limit_endpoint: Option<&'static str>,
    /// Split the `cycle` collection over two pages
    pub paginate_cycles: bool,
    /// `cycle` always hands back another `next_token`
    pub endless_cycles: bool,
}

pub struct MockState {
    accepted_token: Mutex<String>,
    requests: Mutex<Vec<RecordedRequest>>,
    behavior: MockBehavior,
}

impl MockState {
    fn record(&self, call: String, params: HashMap<String, String>) {
        self.requests
            .lock()
            .unwrap()
            .push(RecordedRequest { call, params });
    }
}

pub struct MockWhoop {
    pub base_url: String,
    state: Arc<MockState>,
}

impl MockWhoop {
    /// Start a mock that accepts `accepted_token` until a refresh happens.
    pub async fn start(accepted_token: &str) -> Self {
        Self::start_with(accepted_token, MockBehavior::default()).await
    }

    pub async fn start_with(accepted_token: &str, behavior: MockBehavior) -> Self {
        let state = Arc::new(MockState {
            accepted_token: Mutex::new(accepted_token.to_string()),
            requests: Mutex::new(Vec::new()),
            behavior,
        });

        let router = Router::new()
            .route("/oauth/oauth2/token", post(token))
            .route("/developer/v2/{*endpoint}", get(resource))
            .with_state(state.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });

        Self {
            base_url: format!("http://{}", addr),
            state,
        }
    }

    /// Config pointing at this mock, with all files under `dir`.
    pub fn config(&self, dir: &std::path::Path) -> Config {
        Config {
            api_base: format!("{}/developer/v2", self.base_url),
            token_url: format!("{}/oauth/oauth2/token", self.base_url),
            paths: PathConfig {
                tokens_file: dir.join("tokens.json"),
                data_dir: dir.join("data"),
                chart_dir: dir.to_path_buf(),
            },
            ..Config::default()
        }
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.state.requests.lock().unwrap().clone()
    }

    /// Just the `call` column of `requests()`.
    pub fn calls(&self) -> Vec<String> {
        self.requests().into_iter().map(|r| r.call).collect()
    }
}

/// Write a token record that expires at `expires_at`.
pub fn seed_tokens(config: &Config, access_token: &str, expires_at: DateTime<Utc>) -> TokenRecord {
    let record = TokenRecord {
        access_token: access_token.to_string(),
        refresh_token: REFRESH_TOKEN.to_string(),
        expires_at,
        scope: Some("offline read:sleep".to_string()),
        token_type: Some("bearer".to_string()),
    };
    TokenStore::new(&config.paths.tokens_file)
        .save(&record)
        .unwrap();
    record
}

/// The data requests every complete run makes, in order.
pub fn expected_data_calls() -> Vec<String> {
    [
        "user/profile/basic",
        "cycle",
        "recovery",
        "activity/sleep",
        "activity/workout",
    ]
    .iter()
    .map(|e| format!("GET {}", e))
    .collect()
}

async fn token(
    State(state): State<Arc<MockState>>,
    Form(form): Form<HashMap<String, String>>,
) -> Response {
    state.record("POST token".to_string(), form.clone());

    let grant_type = form.get("grant_type").map(String::as_str);
    let granted = match grant_type {
        Some("refresh_token") => {
            form.get("refresh_token").map(String::as_str) == Some(REFRESH_TOKEN)
        }
        Some("authorization_code") => form.get("code").map(String::as_str) == Some(AUTH_CODE),
        _ => false,
    };
    if !granted {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({"error": "invalid_grant"})),
        )
            .into_response();
    }

    *state.accepted_token.lock().unwrap() = FRESH_ACCESS.to_string();

    let mut body = json!({
        "access_token": FRESH_ACCESS,
        "expires_in": 3600,
        "scope": "offline read:recovery read:cycles read:sleep read:workout read:profile",
        "token_type": "bearer",
    });
    if grant_type == Some("authorization_code") {
        body["refresh_token"] = json!("issued_refresh");
    }
    Json(body).into_response()
}

async fn resource(
    State(state): State<Arc<MockState>>,
    Path(endpoint): Path<String>,
    Query(params): Query<HashMap<String, String>>,
    headers: HeaderMap,
) -> Response {
    let endpoint = endpoint.trim_start_matches('/').to_string();
    state.record(format!("GET {}", endpoint), params.clone());

    if state.behavior.reject_token_endpoint == Some(endpoint.as_str()) {
        return (
            StatusCode::UNAUTHORIZED,
            Json(json!({"error": "Unauthorized"})),
        )
            .into_response();
    }

    let expected = format!("Bearer {}", state.accepted_token.lock().unwrap());
    let presented = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default();
    if presented != expected {
        return (
            StatusCode::UNAUTHORIZED,
            Json(json!({"error": "Unauthorized"})),
        )
            .into_response();
    }

    if state.behavior.fail_endpoint == Some(endpoint.as_str()) {
        return (StatusCode::INTERNAL_SERVER_ERROR, "upstream exploded").into_response();
    }
    if state.behavior.forbidden_endpoint == Some(endpoint.as_str()) {
        return (
            StatusCode::FORBIDDEN,
            Json(json!({"error": "Unauthorized", "detail": "invalid_token scope"})),
        )
            .into_response();
    }
    if state.behavior.rate_limit_endpoint == Some(endpoint.as_str()) {
        return (
            StatusCode::TOO_MANY_REQUESTS,
            Json(json!({"error": "Too Many Requests"})),
        )
            .into_response();
    }

    let body = match endpoint.as_str() {
        "user/profile/basic" => json!({
            "user_id": 10129,
            "email": "jane@example.com",
            "first_name": "Jane",
            "last_name": "Doe",
        }),
        "cycle" if state.behavior.endless_cycles => {
            let page: i64 = params
                .get("nextToken")
                .and_then(|t| t.strip_prefix("page-"))
                .and_then(|n| n.parse().ok())
                .unwrap_or(1);
            json!({"records": [cycle(page, 10.0)], "next_token": format!("page-{}", page + 1)})
        }
        "cycle" if state.behavior.paginate_cycles => match params.get("nextToken") {
            None => json!({"records": [cycle(2, 14.2)], "next_token": "page-2"}),
            Some(_) => json!({"records": [cycle(1, 9.8)], "next_token": null}),
        },
        "cycle" => json!({"records": [cycle(1, 9.8), cycle(2, 14.2)], "next_token": null}),
        "recovery" => json!({"records": [
            {"cycle_id": 1, "created_at": day(1), "score": {"recovery_score": 44}},
            {"cycle_id": 2, "created_at": day(2), "score": {"recovery_score": 81}},
        ], "next_token": null}),
        "activity/sleep" => json!({"records": [
            {"id": "s1", "created_at": day(1), "score": {
                "sleep_performance_percentage": 78,
                "stage_summary": {"total_in_bed_time_milli": 27_000_000}
            }},
        ], "next_token": null}),
        "activity/workout" => json!({"records": [
            {"id": "w1", "created_at": day(2), "sport_name": "running", "score": {"strain": 8.1}},
        ], "next_token": null}),
        _ => return StatusCode::NOT_FOUND.into_response(),
    };
    Json(body).into_response()
}

fn day(n: i64) -> String {
    (DateTime::<Utc>::UNIX_EPOCH + Duration::days(20_000 + n))
        .format("%Y-%m-%dT07:00:00.000Z")
        .to_string()
}

fn cycle(n: i64, strain: f64) -> Value {
    json!({"id": n, "created_at": day(n), "score": {"strain": strain}})
}
