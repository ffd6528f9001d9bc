// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Flat-file persistence for tokens and fetched data.
//!
//! One writer at a time is assumed; nothing here locks. Writes go to a
//! sibling temp file first and are renamed into place, so an interrupted run
//! leaves the previous file intact rather than a truncated one.

use crate::error::{AppError, Result};
use crate::models::{ResourceKind, TokenRecord};
use serde::Serialize;
use serde_json::Value;
use std::fs::{self, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

/// The persisted OAuth token record.
#[derive(Debug, Clone)]
pub struct TokenStore {
    path: PathBuf,
}

impl TokenStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the token record, `None` if the file does not exist.
    pub fn load(&self) -> Result<Option<TokenRecord>> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        let record = serde_json::from_str(&raw).map_err(|e| {
            AppError::TokenStore(format!(
                "Failed to parse {}: {}",
                self.path.display(),
                e
            ))
        })?;
        Ok(Some(record))
    }

    /// Overwrite the token record (owner-only permissions on Unix).
    pub fn save(&self, record: &TokenRecord) -> Result<()> {
        write_json_atomic(&self.path, record, true)?;
        tracing::debug!(path = %self.path.display(), "Token record saved");
        Ok(())
    }
}

/// The directory of raw API responses, one file per resource category.
#[derive(Debug, Clone)]
pub struct DataStore {
    dir: PathBuf,
}

impl DataStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn path_for(&self, kind: ResourceKind) -> PathBuf {
        self.dir.join(kind.file_name())
    }

    /// Write a category's document verbatim, replacing any previous one.
    pub fn write(&self, kind: ResourceKind, document: &Value) -> Result<PathBuf> {
        fs::create_dir_all(&self.dir)?;
        let path = self.path_for(kind);
        write_json_atomic(&path, document, false)?;
        Ok(path)
    }

    /// Read a category's document. `None` if it was never fetched.
    pub fn read(&self, kind: ResourceKind) -> Result<Option<Value>> {
        match fs::read_to_string(self.path_for(kind)) {
            Ok(raw) => Ok(Some(serde_json::from_str(&raw)?)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }
}

fn write_json_atomic<T: Serialize>(path: &Path, value: &T, private: bool) -> Result<()> {
    let mut body = serde_json::to_string_pretty(value)?;
    body.push('\n');

    let file_name = path
        .file_name()
        .ok_or_else(|| AppError::Internal(anyhow::anyhow!("Not a file path: {}", path.display())))?;
    let mut tmp_name = file_name.to_os_string();
    tmp_name.push(".tmp");
    let tmp_path = path.with_file_name(tmp_name);

    // A leftover temp file keeps its old mode.
    match fs::remove_file(&tmp_path) {
        Err(e) if e.kind() != ErrorKind::NotFound => return Err(e.into()),
        _ => {}
    }

    let mut options = OpenOptions::new();
    options.write(true).create_new(true);
    if private {
        owner_only(&mut options);
    }
    let mut file = options.open(&tmp_path)?;
    file.write_all(body.as_bytes())?;
    file.sync_all()?;
    drop(file);

    fs::rename(&tmp_path, path)?;
    Ok(())
}

#[cfg(unix)]
fn owner_only(options: &mut OpenOptions) {
    use std::os::unix::fs::OpenOptionsExt;
    options.mode(0o600);
}

#[cfg(not(unix))]
fn owner_only(_options: &mut OpenOptions) {}
