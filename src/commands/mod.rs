// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! The three pipeline stages, each run by its own binary.

pub mod auth;
pub mod fetch;
pub mod visualize;
