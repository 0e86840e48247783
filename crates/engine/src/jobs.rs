// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Parse-job table
//!
//! Discovery parallelism and chain-resolution recursion can both demand
//! the same script concurrently. The table guarantees single-parse
//! semantics: one in-flight job per path, with late arrivals blocking on a
//! per-path notification until the job is removed. Waiting is signal-based
//! (`tokio::sync::Notify`), never a poll loop.

use parking_lot::Mutex;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::Notify;

/// In-flight tracking record for one chain-resolution frontier.
///
/// `commands` accumulates every `(name, args)` invocation seen while this
/// frontier resolves; the resolver's cycle bound counts occurrences in it.
/// Nested parses share the record, so the count spans the whole frontier.
#[derive(Debug)]
pub struct ParseJob {
    /// Root script path (empty for driver-initiated chains).
    pub path: PathBuf,
    /// Suppress per-command parse logging.
    pub silent: bool,
    commands: Mutex<Vec<Vec<String>>>,
}

impl ParseJob {
    pub fn new(path: impl Into<PathBuf>, silent: bool) -> Arc<Self> {
        Arc::new(Self {
            path: path.into(),
            silent,
            commands: Mutex::new(Vec::new()),
        })
    }

    /// Append a resolved `(name, args)` tuple to the frontier.
    pub fn record(&self, name: &str, args: &[String]) {
        let mut entry = Vec::with_capacity(args.len() + 1);
        entry.push(name.to_string());
        entry.extend(args.iter().cloned());
        self.commands.lock().push(entry);
    }

    /// How many times `name` has been resolved along this frontier.
    pub fn occurrences(&self, name: &str) -> usize {
        self.commands
            .lock()
            .iter()
            .filter(|entry| entry.first().is_some_and(|n| n == name))
            .count()
    }
}

struct JobEntry {
    job: Arc<ParseJob>,
    done: Arc<Notify>,
}

/// path → in-flight job, with per-path completion notification.
#[derive(Default)]
pub struct JobTable {
    inner: Mutex<HashMap<PathBuf, JobEntry>>,
}

impl JobTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Claim `path` for `job`. Returns false when another job already owns
    /// it — the caller should wait instead. Check-and-claim is atomic.
    pub fn try_add(&self, path: &Path, job: &Arc<ParseJob>) -> bool {
        let mut inner = self.inner.lock();
        if inner.contains_key(path) {
            return false;
        }
        inner.insert(
            path.to_path_buf(),
            JobEntry {
                job: Arc::clone(job),
                done: Arc::new(Notify::new()),
            },
        );
        true
    }

    pub fn exists(&self, path: &Path) -> bool {
        self.inner.lock().contains_key(path)
    }

    /// Is `path` currently claimed by this exact frontier?
    ///
    /// A frontier re-encountering one of its own paths must not wait on
    /// itself; the resolver re-parses and lets the cycle bound terminate.
    pub fn owned_by(&self, path: &Path, job: &Arc<ParseJob>) -> bool {
        self.inner
            .lock()
            .get(path)
            .is_some_and(|entry| Arc::ptr_eq(&entry.job, job))
    }

    /// Block until no job exists for `path`.
    ///
    /// Interest is registered before the table is re-checked, so a removal
    /// racing this call can never strand the waiter.
    pub async fn wait_for(&self, path: &Path) {
        loop {
            let done = {
                let inner = self.inner.lock();
                match inner.get(path) {
                    Some(entry) => Arc::clone(&entry.done),
                    None => return,
                }
            };
            let notified = done.notified();
            tokio::pin!(notified);
            notified.as_mut().enable();
            // Re-check after enabling interest: if the job vanished (or was
            // replaced) in between, its wakeup already fired and awaiting
            // would hang. Identity matters, not mere existence.
            let same = {
                let inner = self.inner.lock();
                inner
                    .get(path)
                    .is_some_and(|entry| Arc::ptr_eq(&entry.done, &done))
            };
            if !same {
                continue;
            }
            notified.await;
        }
    }

    /// Release `path` and wake every waiter.
    pub fn remove(&self, path: &Path) {
        let entry = self.inner.lock().remove(path);
        if let Some(entry) = entry {
            entry.done.notify_waiters();
        }
    }

    pub fn len(&self) -> usize {
        self.inner.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.lock().is_empty()
    }
}

#[cfg(test)]
#[path = "jobs_tests.rs"]
mod tests;
