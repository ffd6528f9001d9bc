// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Services module - business logic layer.

pub mod charts;
pub mod whoop;

pub use charts::{ChartSpec, CHARTS};
pub use whoop::{WhoopClient, WhoopService};
