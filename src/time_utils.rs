// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Shared helpers for date/time formatting.

use chrono::{DateTime, Duration, SecondsFormat, Utc};

/// Format a UTC timestamp as RFC3339 using a `Z` suffix.
pub fn format_utc_rfc3339(date: DateTime<Utc>) -> String {
    date.to_rfc3339_opts(SecondsFormat::Secs, true)
}

/// A closed time range used for collection queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchWindow {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl FetchWindow {
    /// The `days` days leading up to `now`.
    pub fn trailing_days(now: DateTime<Utc>, days: i64) -> Self {
        Self {
            start: now - Duration::days(days),
            end: now,
        }
    }

    /// Query parameters understood by the WHOOP collection endpoints.
    pub fn query_params(&self) -> [(&'static str, String); 2] {
        [
            ("start", format_utc_rfc3339(self.start)),
            ("end", format_utc_rfc3339(self.end)),
        ]
    }
}

/// Short `MM/DD` label for an ISO timestamp.
///
/// The date is taken in the timestamp's own offset. Falls back to the first
/// five characters when the input does not parse.
pub fn short_date_label(timestamp: &str) -> String {
    match DateTime::parse_from_rfc3339(timestamp) {
        Ok(dt) => dt.format("%m/%d").to_string(),
        Err(_) => timestamp.chars().take(5).collect(),
    }
}
