// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Data models for the application.

pub mod metrics;
pub mod resource;
pub mod tokens;

pub use metrics::MetricPoint;
pub use resource::ResourceKind;
pub use tokens::{TokenRecord, TokenResponse};
