// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Render every chart from the stored data files.

use serde_json::Value;
use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;

use crate::config::PathConfig;
use crate::db::DataStore;
use crate::error::Result;
use crate::models::{metrics, ResourceKind};
use crate::services::charts::{ChartSpec, CHARTS};

/// A chart file that was written.
#[derive(Debug)]
pub struct RenderedChart {
    pub path: PathBuf,
    pub points: usize,
    pub average: Option<f64>,
}

pub fn run(paths: &PathConfig) -> Result<Vec<RenderedChart>> {
    let data = DataStore::new(&paths.data_dir);
    fs::create_dir_all(&paths.chart_dir)?;

    // Each source is read once; a missing or unreadable file leaves its
    // charts empty without touching the others.
    let mut sources: HashMap<ResourceKind, Option<Value>> = HashMap::new();
    let mut rendered = Vec::with_capacity(CHARTS.len());

    for spec in CHARTS {
        let document = sources
            .entry(spec.source)
            .or_insert_with(|| load_source(&data, spec.source));

        let chart = render_chart(spec, document.as_ref(), paths)?;
        match chart.average {
            Some(avg) => tracing::info!(
                chart = spec.file_name,
                points = chart.points,
                avg = %format!("{:.1}", avg),
                "Chart written"
            ),
            None => tracing::warn!(chart = spec.file_name, "No data, wrote empty chart"),
        }
        rendered.push(chart);
    }

    Ok(rendered)
}

fn load_source(data: &DataStore, kind: ResourceKind) -> Option<Value> {
    match data.read(kind) {
        Ok(Some(document)) => Some(document),
        Ok(None) => {
            tracing::warn!(file = %data.path_for(kind).display(), "Data file not found");
            None
        }
        Err(e) => {
            tracing::warn!(
                file = %data.path_for(kind).display(),
                error = %e,
                "Unreadable data file"
            );
            None
        }
    }
}

fn render_chart(
    spec: &ChartSpec,
    document: Option<&Value>,
    paths: &PathConfig,
) -> Result<RenderedChart> {
    let points = document
        .map(|doc| metrics::extract_series(doc, spec.field_path, spec.scale))
        .unwrap_or_default();

    let path = paths.chart_dir.join(spec.file_name);
    fs::write(&path, spec.render(&points))?;

    Ok(RenderedChart {
        path,
        points: points.len(),
        average: metrics::average(&points),
    })
}
