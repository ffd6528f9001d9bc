// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Numeric series pulled out of stored WHOOP collection documents.
//!
//! The stored documents are kept verbatim, so extraction is tolerant: a
//! missing or non-numeric field reads as zero, and a document without a
//! `records` array yields no points.

use serde_json::Value;

/// One data point of a chart series.
#[derive(Debug, Clone, PartialEq)]
pub struct MetricPoint {
    /// Record creation timestamp, as stored
    pub created_at: String,
    pub value: f64,
}

/// The `records` array of a collection document, if there is one.
pub fn records(document: &Value) -> Option<&Vec<Value>> {
    document.get("records").and_then(Value::as_array)
}

/// Extract `field_path` from every record, ordered by `created_at`.
///
/// `scale` is applied to each value (e.g. milliseconds to hours).
pub fn extract_series(document: &Value, field_path: &[&str], scale: f64) -> Vec<MetricPoint> {
    let Some(records) = records(document) else {
        return Vec::new();
    };

    let mut points: Vec<MetricPoint> = records
        .iter()
        .map(|record| {
            let created_at = record
                .get("created_at")
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string();
            let value = field_path
                .iter()
                .try_fold(record, |node, key| node.get(key))
                .and_then(Value::as_f64)
                .unwrap_or(0.0);
            MetricPoint {
                created_at,
                value: value * scale,
            }
        })
        .collect();

    // Stable, so records with equal timestamps keep upstream order.
    points.sort_by(|a, b| a.created_at.cmp(&b.created_at));
    points
}

/// Arithmetic mean, `None` for an empty series.
pub fn average(points: &[MetricPoint]) -> Option<f64> {
    if points.is_empty() {
        return None;
    }
    Some(points.iter().map(|p| p.value).sum::<f64>() / points.len() as f64)
}
