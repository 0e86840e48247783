// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Engine error taxonomy

use std::path::PathBuf;
use thiserror::Error;

/// Errors surfaced by parsing, resolution, and execution.
///
/// Cycle errors are fatal at the process level: the CLI runs the cleanup
/// hook and exits non-zero when it sees one. Everything else aborts only
/// the current invocation; the chain driver logs and moves on.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("invalid command: {path} yields an empty name")]
    InvalidName { path: PathBuf },
    #[error("unknown chain command: {name}")]
    UnknownCommand { name: String },
    #[error("cycle detected: {name} appears more than {limit} time(s) along the chain")]
    CycleDetected { name: String, limit: usize },
    #[error("unknown dependency: {name}")]
    UnknownDependency { name: String },
    #[error("command already registered: {name}")]
    DuplicateCommand { name: String },
    #[error(transparent)]
    Schema(#[from] forge_script::SchemaError),
    #[error(transparent)]
    Bind(#[from] forge_script::BindError),
    #[error(transparent)]
    Header(#[from] forge_script::HeaderError),
    #[error(transparent)]
    Commandfile(#[from] forge_script::CommandfileError),
    #[error(transparent)]
    Project(#[from] forge_core::ProjectError),
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to spawn {name}: {source}")]
    Spawn {
        name: String,
        source: std::io::Error,
    },
    #[error("command {name} failed with exit code {code}")]
    CommandFailed { name: String, code: i32 },
}

impl EngineError {
    /// True for errors the process must not survive.
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::CycleDetected { .. })
    }
}
