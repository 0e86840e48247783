// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Chain driver
//!
//! Top-level entry for running a textual chain: parse, resolve, count,
//! execute in order. Progress counters are scoped to one invocation —
//! concurrent chain runs do not interfere.

use crate::command::Command;
use crate::engine::Engine;
use crate::error::EngineError;
use crate::jobs::ParseJob;
use forge_script::parse_chain;
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// Per-invocation progress counters for the `[i/N]` display.
///
/// `total` grows when the executor schedules extra work (triggered
/// dependencies); `current` advances as commands finish.
#[derive(Clone, Default)]
pub struct ChainProgress {
    inner: Arc<Counters>,
}

#[derive(Default)]
struct Counters {
    total: AtomicUsize,
    current: AtomicUsize,
}

impl ChainProgress {
    pub fn new(total: usize) -> Self {
        let progress = Self::default();
        progress.add_total(total);
        progress
    }

    pub fn add_total(&self, n: usize) {
        self.inner.total.fetch_add(n, Ordering::Relaxed);
    }

    /// Mark one command finished; returns `(current, total)` after.
    pub fn advance(&self) -> (usize, usize) {
        let current = self.inner.current.fetch_add(1, Ordering::Relaxed) + 1;
        (current, self.inner.total.load(Ordering::Relaxed))
    }

    pub fn total(&self) -> usize {
        self.inner.total.load(Ordering::Relaxed)
    }

    pub fn current(&self) -> usize {
        self.inner.current.load(Ordering::Relaxed)
    }
}

/// Outcome of one chain invocation.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ChainSummary {
    /// Top-level links executed.
    pub executed: usize,
    /// Links whose invocation ended in an error.
    pub failures: usize,
}

impl Engine {
    /// Parse and run a chain string like `clean -> build target=x`.
    ///
    /// Per-link errors are logged and do not stop later links. Cycle
    /// errors propagate — the caller owns process teardown.
    pub async fn run_chain(&self, chain: &str) -> Result<ChainSummary, EngineError> {
        let links = parse_chain(chain);
        if links.is_empty() {
            return Ok(ChainSummary::default());
        }

        let job = ParseJob::new(PathBuf::new(), false);
        let commands = self.resolve_chain(&links, &job).await?;

        let total: usize = commands.iter().map(|c| count_commands(c)).sum();
        let progress = ChainProgress::new(total);

        let mut summary = ChainSummary {
            executed: commands.len(),
            failures: 0,
        };
        for command in &commands {
            if let Err(error) = self
                .run_command(command, &[], command.async_run, &progress)
                .await
            {
                summary.failures += 1;
                tracing::error!(command = %command.name, %error, "chain link failed");
            }
        }
        Ok(summary)
    }
}

/// A link counts itself plus its nested chain, transitively.
fn count_commands(command: &Command) -> usize {
    1 + command
        .chain
        .iter()
        .map(|link| count_commands(link))
        .sum::<usize>()
}

#[cfg(test)]
#[path = "driver_tests.rs"]
mod tests;
