// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! One-time WHOOP OAuth authorization.

use whoop_tracker::{commands, config::Config, logging};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // RUST_LOG and LOG_FORMAT may come from .env
    dotenvy::dotenv().ok();
    logging::init_logging();

    let config = Config::from_env()?;
    tracing::info!(redirect_uri = %config.redirect_uri, "Starting WHOOP authentication");

    commands::auth::run(&config).await?;

    eprintln!("You're all set! Run whoop-fetch to fetch your data.");
    Ok(())
}
