// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Orchestrator configuration

use serde::Deserialize;
use std::path::Path;
use thiserror::Error;

/// Config file name inside the forge directory.
pub const CONFIG_FILE: &str = "config.toml";

/// Runtime configuration, loaded from `.forge/config.toml`.
///
/// Every field has a default so a missing or partial file is fine; the CLI
/// layers its flag overrides on top of whatever was loaded.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Pass the interpreter's stop-on-first-failure flag (`-e`).
    pub stop_on_error: bool,
    /// Print the assembled script with line numbers when a command fails.
    pub dump_script_on_error: bool,
    /// Dump every assembled script before running it.
    pub debug: bool,
    /// How many times one command name may appear along a single
    /// chain-resolution path before it counts as a cycle.
    pub recursion_depth: usize,
    /// Shell used to run command bodies.
    pub interpreter: String,
    /// Script file extension inside the forge directory (without the dot).
    pub extension: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            stop_on_error: false,
            dump_script_on_error: false,
            debug: false,
            recursion_depth: 1,
            interpreter: "/bin/bash".to_string(),
            extension: "sh".to_string(),
        }
    }
}

/// Errors from loading the config file
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: String,
        source: std::io::Error,
    },
    #[error("invalid config: {0}")]
    Parse(#[from] toml::de::Error),
}

impl Config {
    /// Load from `<forge_dir>/config.toml`. A missing file yields defaults.
    pub fn load(forge_dir: &Path) -> Result<Self, ConfigError> {
        let path = forge_dir.join(CONFIG_FILE);
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(&path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;
        Ok(toml::from_str(&content)?)
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
