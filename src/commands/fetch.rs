// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Fetch every resource category for the trailing window and store it.

use chrono::Utc;
use serde_json::Value;
use std::path::PathBuf;

use crate::config::Config;
use crate::db::DataStore;
use crate::error::{AppError, Result};
use crate::models::{metrics, ResourceKind};
use crate::services::whoop::WhoopService;
use crate::time_utils::FetchWindow;

/// One category that made it to disk.
#[derive(Debug)]
pub struct FetchedResource {
    pub kind: ResourceKind,
    pub path: PathBuf,
    /// Record count for collections
    pub records: Option<usize>,
    /// `user_id` for the profile
    pub user_id: Option<Value>,
}

/// Outcome of one fetch run. Categories are independent; some may fail.
#[derive(Debug, Default)]
pub struct FetchReport {
    pub fetched: Vec<FetchedResource>,
    pub failed: Vec<(ResourceKind, AppError)>,
}

impl FetchReport {
    pub fn is_complete(&self) -> bool {
        self.failed.is_empty()
    }

    fn log_summary(&self) {
        for resource in &self.fetched {
            match (&resource.records, &resource.user_id) {
                (Some(count), _) => {
                    tracing::info!(kind = %resource.kind, records = count, "Fetched")
                }
                (None, Some(user_id)) => {
                    tracing::info!(kind = %resource.kind, user_id = %user_id, "Fetched")
                }
                (None, None) => tracing::info!(kind = %resource.kind, "Fetched"),
            }
        }
        for (kind, error) in &self.failed {
            tracing::error!(%kind, error = %error, "Fetch failed");
        }
    }

    /// Turn a partial run into an error naming the failed categories.
    pub fn into_result(self) -> Result<Self> {
        if self.is_complete() {
            return Ok(self);
        }
        let failed: Vec<&str> = self.failed.iter().map(|(kind, _)| kind.as_str()).collect();
        Err(AppError::WhoopApi(format!(
            "Failed to fetch: {}",
            failed.join(", ")
        )))
    }
}

pub async fn run(config: &Config) -> Result<FetchReport> {
    let mut service = WhoopService::from_config(config)?;
    let data = DataStore::new(&config.paths.data_dir);
    let window = FetchWindow::trailing_days(Utc::now(), config.fetch_window_days);

    tracing::info!(
        days = config.fetch_window_days,
        data_dir = %config.paths.data_dir.display(),
        "Fetching WHOOP data"
    );

    let report = fetch_all(&mut service, &data, &window).await?;
    report.log_summary();
    report.into_result()
}

/// Fetch and write each category in order.
///
/// The token is made valid once up front; a refresh failure aborts the run
/// before any data request is issued. Per-category failures are collected
/// and do not stop later categories.
pub async fn fetch_all(
    service: &mut WhoopService,
    data: &DataStore,
    window: &FetchWindow,
) -> Result<FetchReport> {
    service.get_valid_access_token().await?;

    let mut report = FetchReport::default();
    for (i, kind) in ResourceKind::ALL.into_iter().enumerate() {
        tracing::info!(step = i + 1, %kind, "Fetching");

        let result = match service.fetch_resource(kind, window).await {
            Ok(document) => data.write(kind, &document).map(|path| FetchedResource {
                kind,
                path,
                records: metrics::records(&document).map(Vec::len),
                user_id: document.get("user_id").cloned(),
            }),
            Err(e) => Err(e),
        };

        match result {
            Ok(resource) => {
                tracing::debug!(%kind, path = %resource.path.display(), "Saved");
                report.fetched.push(resource);
            }
            Err(e) => report.failed.push((kind, e)),
        }
    }

    Ok(report)
}
