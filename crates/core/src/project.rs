// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Persisted per-project state

use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

/// State file name inside the forge directory.
pub const PROJECT_FILE: &str = "project.json";

/// Mutable project metadata, persisted after every change.
///
/// Callers guard this with a lock; `save` is expected to run under it (or
/// immediately after, while the fields are stable).
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct ProjectState {
    /// Build counter, incremented by commands that declare `build_number`.
    #[serde(default)]
    pub build_number: u64,
}

/// Errors from reading or writing the state file
#[derive(Debug, Error)]
pub enum ProjectError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: String,
        source: std::io::Error,
    },
    #[error("failed to write {path}: {source}")]
    Write {
        path: String,
        source: std::io::Error,
    },
    #[error("invalid project state: {0}")]
    Parse(#[from] serde_json::Error),
}

impl ProjectState {
    /// Load from `<forge_dir>/project.json`. A missing file yields defaults.
    pub fn load(forge_dir: &Path) -> Result<Self, ProjectError> {
        let path = forge_dir.join(PROJECT_FILE);
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(&path).map_err(|source| ProjectError::Read {
            path: path.display().to_string(),
            source,
        })?;
        Ok(serde_json::from_str(&content)?)
    }

    /// Write the current state to `<forge_dir>/project.json`.
    pub fn save(&self, forge_dir: &Path) -> Result<(), ProjectError> {
        let path = forge_dir.join(PROJECT_FILE);
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(&path, content).map_err(|source| ProjectError::Write {
            path: path.display().to_string(),
            source,
        })
    }
}

#[cfg(test)]
#[path = "project_tests.rs"]
mod tests;
