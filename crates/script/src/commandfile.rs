// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Commandfile parsing
//!
//! `.forge/commands.toml` declares commands inline, without backing script
//! files:
//!
//! ```toml
//! language = "/bin/sh"
//! globals = "VERSION=1.2"
//!
//! [commands.build]
//! args = "target:string"
//! help = "compile the project"
//! outputs = ["bin/app"]
//! run = "cc -o bin/app src/*.c"
//!
//! [commands.release]
//! chain = "clean -> build target=release"
//! build_number = true
//! run = "tar czf app.tgz bin/app"
//! ```

use indexmap::IndexMap;
use serde::Deserialize;
use std::path::Path;
use thiserror::Error;

/// Commandfile name inside the forge directory.
pub const COMMANDFILE: &str = "commands.toml";

/// Inline command declarations.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Commandfile {
    /// Interpreter override for every inline command.
    pub language: Option<String>,
    /// Inline globals prelude, used when no globals script exists.
    pub globals: Option<String>,
    /// name → declaration, in file order.
    pub commands: IndexMap<String, CommandEntry>,
}

/// One inline command declaration. Field meanings mirror the script header
/// directives.
#[derive(Debug, Default, Clone, Deserialize)]
#[serde(default)]
pub struct CommandEntry {
    pub args: String,
    pub chain: String,
    pub help: String,
    pub manual: String,
    pub dependencies: Vec<String>,
    pub outputs: Vec<String>,
    #[serde(rename = "async")]
    pub async_run: bool,
    pub build_number: bool,
    /// Inline script body.
    pub run: String,
}

/// Errors from loading the commandfile
#[derive(Debug, Error)]
pub enum CommandfileError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: String,
        source: std::io::Error,
    },
    #[error("invalid commandfile: {0}")]
    Parse(#[from] toml::de::Error),
}

impl Commandfile {
    pub fn parse(content: &str) -> Result<Self, CommandfileError> {
        Ok(toml::from_str(content)?)
    }

    /// Load `<forge_dir>/commands.toml`; `None` when the file is absent.
    pub fn load(forge_dir: &Path) -> Result<Option<Self>, CommandfileError> {
        let path = forge_dir.join(COMMANDFILE);
        if !path.exists() {
            return Ok(None);
        }
        let content = std::fs::read_to_string(&path).map_err(|source| CommandfileError::Read {
            path: path.display().to_string(),
            source,
        })?;
        Ok(Some(Self::parse(&content)?))
    }
}

#[cfg(test)]
#[path = "commandfile_tests.rs"]
mod tests;
