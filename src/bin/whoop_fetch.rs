// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Fetch the trailing window of WHOOP data into the data directory.

use whoop_tracker::{commands, config::Config, logging};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // RUST_LOG and LOG_FORMAT may come from .env
    dotenvy::dotenv().ok();
    logging::init_logging();

    let config = Config::from_env()?;
    let report = commands::fetch::run(&config).await?;

    tracing::info!(categories = report.fetched.len(), "Data fetch complete");
    Ok(())
}
