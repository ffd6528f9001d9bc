// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Render SVG charts from the stored WHOOP data.

use whoop_tracker::{commands, config::PathConfig, logging};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // RUST_LOG and LOG_FORMAT may come from .env
    dotenvy::dotenv().ok();
    logging::init_logging();

    let paths = PathConfig::from_env();
    let charts = commands::visualize::run(&paths)?;

    tracing::info!(
        charts = charts.len(),
        chart_dir = %paths.chart_dir.display(),
        "Visualization complete"
    );
    Ok(())
}
