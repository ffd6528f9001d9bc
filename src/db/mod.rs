// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Persistence layer: the token file and the per-category data files.

pub mod files;

pub use files::{DataStore, TokenStore};
