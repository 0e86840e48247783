// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The resolved command record

use forge_script::{format_schema, ArgSchema};
use std::path::PathBuf;
use std::sync::Arc;

/// A named, executable unit: a script on disk or an inline commandfile
/// body, plus the metadata its header declared.
#[derive(Debug, Clone, Default)]
pub struct Command {
    pub name: String,
    /// Backing script path; empty for commandfile-origin commands, whose
    /// body lives in `run_command`.
    pub path: PathBuf,
    /// Declared argument schema.
    pub args: ArgSchema,
    /// Positional args bound when this command is a chain link; takes
    /// precedence over call-site args.
    pub params: Vec<String>,
    pub help: String,
    pub manual: String,
    /// Commands to run before this command's own body.
    pub chain: Vec<Arc<Command>>,
    /// Dependency specs, each `name [arg ...]`; a dependency runs only when
    /// one of its own outputs is missing.
    pub dependencies: Vec<String>,
    /// Paths whose existence marks this command up to date.
    pub outputs: Vec<PathBuf>,
    /// Detach via a terminal-multiplexer session.
    pub async_run: bool,
    /// Increment the persisted build counter on every run.
    pub build_number: bool,
    /// Inline body for commandfile-origin commands.
    pub run_command: String,
}

impl Command {
    /// Per-invocation copy carrying bound positional params.
    ///
    /// Only the template surface travels: name, path, schema, docs, chain,
    /// body, and the build-counter flag. `async_run`, `dependencies`, and
    /// `outputs` revert to defaults in the copy — the registry entry itself
    /// is never mutated.
    pub fn with_params(&self, params: Vec<String>) -> Self {
        Self {
            name: self.name.clone(),
            path: self.path.clone(),
            args: self.args.clone(),
            params,
            help: self.help.clone(),
            manual: self.manual.clone(),
            chain: self.chain.clone(),
            build_number: self.build_number,
            run_command: self.run_command.clone(),
            ..Self::default()
        }
    }

    /// One-line usage string for listings and `forge help`.
    pub fn usage(&self) -> String {
        if self.args.is_empty() {
            self.name.clone()
        } else {
            format!("{} {}", self.name, format_schema(&self.args))
        }
    }
}

#[cfg(test)]
#[path = "command_tests.rs"]
mod tests;
