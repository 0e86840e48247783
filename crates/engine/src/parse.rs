// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Discovery and script parsing
//!
//! Walks the forge directory (non-recursively), loads the globals prelude,
//! and turns every matching script into a registry entry via `add_command`.
//! Past a size threshold the parse work is sharded onto two workers and
//! joined with a barrier. Per-script failures are collected and reported
//! in bulk; only cycle errors abort discovery.

use crate::command::Command;
use crate::engine::Engine;
use crate::error::EngineError;
use crate::jobs::ParseJob;
use crate::registry::CommandRegistry;
use forge_script::{parse_arg_schema, parse_chain, parse_header, Commandfile};
use std::future::Future;
use std::path::{Path, PathBuf};
use std::pin::Pin;
use std::sync::Arc;

/// Parse work is split across two workers above this many scripts.
pub(crate) const PARALLEL_PARSE_THRESHOLD: usize = 10;

/// Basename prefix marking the globals prelude file.
const GLOBALS_PREFIX: &str = "globals";

/// One script that failed to parse during discovery.
#[derive(Debug)]
pub struct ScriptError {
    pub path: PathBuf,
    pub error: EngineError,
}

impl Engine {
    /// Discover and register every command under the forge directory.
    ///
    /// Returns the per-script errors collected along the way (already
    /// logged); a cycle error aborts instead.
    pub async fn bootstrap(&self) -> Result<Vec<ScriptError>, EngineError> {
        if let Some(file) = Commandfile::load(&self.dir)? {
            *self.commandfile.lock() = Some(file);
        }

        let mut errors = self.discover_scripts().await?;

        // Commandfile globals apply only when no globals script exists.
        let inline_globals = {
            self.commandfile
                .lock()
                .as_ref()
                .and_then(|file| file.globals.clone())
        };
        if let Some(text) = inline_globals {
            let mut globals = self.globals.lock();
            if globals.is_empty() {
                globals.extend_from_slice(text.as_bytes());
                globals.extend_from_slice(b"\n\n");
            }
        }

        errors.extend(self.register_commandfile_commands().await?);

        for name in self.registry.names() {
            if CommandRegistry::conflicts(&name) {
                tracing::warn!(command = %name, "command shadows a built-in name");
            }
        }
        Ok(errors)
    }

    /// Parse one script and register its command.
    ///
    /// Concurrent callers for the same path collapse onto a single parse:
    /// the first claims a job, the rest wait for its removal and return.
    pub async fn add_command(&self, path: &Path, silent: bool) -> Result<(), EngineError> {
        let name = command_name(path)?;
        if self.registry.contains(&name) {
            return Ok(());
        }
        let job = ParseJob::new(path, silent);
        if !self.jobs.try_add(path, &job) {
            self.jobs.wait_for(path).await;
            return Ok(());
        }
        let result = self.parse_script(path, &job).await;
        self.jobs.remove(path);
        let command = result?;
        match self.registry.add(command, false) {
            // The resolver may have registered us mid-parse (self-referential
            // chains under a recursion depth > 1); that is not a failure.
            Err(EngineError::DuplicateCommand { .. }) => Ok(()),
            other => other,
        }
    }

    /// Decode one script file into a command, resolving its chain.
    ///
    /// Boxed: chain resolution can recurse back into `parse_script` for
    /// referenced scripts, sharing `job` so the cycle bound spans the
    /// whole resolution frontier.
    pub(crate) fn parse_script<'a>(
        &'a self,
        path: &'a Path,
        job: &'a Arc<ParseJob>,
    ) -> Pin<Box<dyn Future<Output = Result<Arc<Command>, EngineError>> + Send + 'a>> {
        Box::pin(async move {
            let name = command_name(path)?;
            let content =
                tokio::fs::read_to_string(path)
                    .await
                    .map_err(|source| EngineError::Io {
                        path: path.to_path_buf(),
                        source,
                    })?;
            let header = parse_header(&content)?;
            let schema = parse_arg_schema(&header.args)?;
            let links = parse_chain(&header.chain);
            let chain = self.resolve_chain(&links, job).await?;
            if !job.silent {
                tracing::debug!(command = %name, path = %path.display(), "parsed script");
            }
            Ok(Arc::new(Command {
                name,
                path: path.to_path_buf(),
                args: schema,
                help: header.help,
                manual: header.manual,
                chain,
                dependencies: header.dependencies,
                outputs: header.outputs.iter().map(PathBuf::from).collect(),
                async_run: header.async_run,
                build_number: header.build_number,
                ..Command::default()
            }))
        })
    }

    async fn discover_scripts(&self) -> Result<Vec<ScriptError>, EngineError> {
        let entries = std::fs::read_dir(&self.dir).map_err(|source| EngineError::Io {
            path: self.dir.clone(),
            source,
        })?;

        let mut scripts = Vec::new();
        for entry in entries.flatten() {
            let path = entry.path();
            // Subdirectories are skipped; the walk is non-recursive.
            if path.is_dir() {
                continue;
            }
            if path.extension().and_then(|e| e.to_str()) != Some(self.config.extension.as_str()) {
                continue;
            }
            let stem = path.file_stem().and_then(|s| s.to_str()).unwrap_or_default();
            if stem.starts_with(GLOBALS_PREFIX) {
                self.load_globals(&path)?;
            } else {
                scripts.push(path);
            }
        }
        scripts.sort();

        let mut errors = if scripts.len() > PARALLEL_PARSE_THRESHOLD {
            let mid = scripts.len() / 2;
            let right_half = scripts.split_off(mid);
            let left = self.clone();
            let right = self.clone();
            let left_task = tokio::spawn(async move { parse_all(&left, scripts).await });
            let right_task = tokio::spawn(async move { parse_all(&right, right_half).await });

            let mut errors = Vec::new();
            for task in [left_task, right_task] {
                match task.await {
                    Ok(worker_errors) => errors.extend(worker_errors),
                    Err(error) => tracing::error!(%error, "parse worker failed"),
                }
            }
            errors
        } else {
            parse_all(self, scripts).await
        };

        if let Some(pos) = errors.iter().position(|e| e.error.is_fatal()) {
            return Err(errors.swap_remove(pos).error);
        }
        for e in &errors {
            tracing::error!(path = %e.path.display(), error = %e.error, "script failed to parse");
        }
        Ok(errors)
    }

    fn load_globals(&self, path: &Path) -> Result<(), EngineError> {
        let mut bytes = std::fs::read(path).map_err(|source| EngineError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        bytes.extend_from_slice(b"\n\n");
        tracing::debug!(path = %path.display(), len = bytes.len(), "globals prelude loaded");
        *self.globals.lock() = bytes;
        Ok(())
    }

    /// Register commandfile entries that no script claimed.
    async fn register_commandfile_commands(&self) -> Result<Vec<ScriptError>, EngineError> {
        let names: Vec<String> = {
            self.commandfile
                .lock()
                .as_ref()
                .map(|file| file.commands.keys().cloned().collect())
                .unwrap_or_default()
        };

        let mut errors = Vec::new();
        for name in names {
            if self.registry.contains(&name) {
                continue;
            }
            let job = ParseJob::new(PathBuf::new(), false);
            match self.synthesize_command(&name, &job).await {
                Ok(command) => {
                    let _ = self.registry.add(command, false);
                }
                Err(error) if error.is_fatal() => return Err(error),
                Err(error) => {
                    tracing::error!(command = %name, %error, "commandfile entry failed");
                    errors.push(ScriptError {
                        path: self.dir.join(forge_script::COMMANDFILE),
                        error,
                    });
                }
            }
        }
        Ok(errors)
    }
}

/// Command name of a script: basename minus extension, never empty.
pub(crate) fn command_name(path: &Path) -> Result<String, EngineError> {
    match path.file_stem().and_then(|s| s.to_str()) {
        Some(stem) if !stem.is_empty() => Ok(stem.to_string()),
        _ => Err(EngineError::InvalidName {
            path: path.to_path_buf(),
        }),
    }
}

async fn parse_all(engine: &Engine, scripts: Vec<PathBuf>) -> Vec<ScriptError> {
    let mut errors = Vec::new();
    for path in scripts {
        if let Err(error) = engine.add_command(&path, false).await {
            errors.push(ScriptError { path, error });
        }
    }
    errors
}

#[cfg(test)]
#[path = "parse_tests.rs"]
mod tests;
