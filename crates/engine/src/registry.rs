// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Command registry

use crate::command::Command;
use crate::error::EngineError;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;

/// Names reserved by the CLI surface. Registering one of these is legal;
/// discovery reports the conflict as a warning.
pub const BUILTIN_COMMANDS: &[&str] = &[
    "run", "list", "help", "exit", "clear", "info", "config", "data", "version", "globals",
    "procs", "edit",
];

/// Canonical name → command mapping. All access goes through the internal
/// lock; inserted commands are fully constructed before the name becomes
/// visible.
#[derive(Default)]
pub struct CommandRegistry {
    inner: Mutex<HashMap<String, Arc<Command>>>,
}

impl CommandRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a command. Re-adding an existing name requires `force`.
    pub fn add(&self, command: Arc<Command>, force: bool) -> Result<(), EngineError> {
        let mut inner = self.inner.lock();
        if !force && inner.contains_key(&command.name) {
            return Err(EngineError::DuplicateCommand {
                name: command.name.clone(),
            });
        }
        inner.insert(command.name.clone(), command);
        Ok(())
    }

    pub fn lookup(&self, name: &str) -> Option<Arc<Command>> {
        self.inner.lock().get(name).cloned()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.inner.lock().contains_key(name)
    }

    /// Does `name` shadow a built-in? The registry only reports this;
    /// it never rejects the entry.
    pub fn conflicts(name: &str) -> bool {
        BUILTIN_COMMANDS.contains(&name)
    }

    /// Registered names, sorted.
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.inner.lock().keys().cloned().collect();
        names.sort();
        names
    }

    pub fn len(&self) -> usize {
        self.inner.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.lock().is_empty()
    }
}

#[cfg(test)]
#[path = "registry_tests.rs"]
mod tests;
