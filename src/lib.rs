// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! WHOOP Tracker: pull personal WHOOP health metrics and chart them.
//!
//! Three stages share this crate, one binary each:
//! - `whoop-auth` runs the OAuth consent flow and writes the token file
//! - `whoop-fetch` refreshes the token if needed and stores the raw data
//! - `whoop-visualize` renders SVG charts from the stored data

pub mod commands;
pub mod config;
pub mod db;
pub mod error;
pub mod logging;
pub mod markup;
pub mod models;
pub mod routes;
pub mod services;
pub mod time_utils;
