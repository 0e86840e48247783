// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Process table
//!
//! Tracks live subprocesses by an opaque random id plus the OS pid when
//! one is known. Detached sessions get a pid-less entry reaped by the
//! executor's liveness poller.

use forge_core::ProcessId;
use nix::sys::signal::{kill, Signal};
use nix::unistd::Pid;
use parking_lot::Mutex;
use std::collections::HashMap;

/// One tracked subprocess.
#[derive(Debug, Clone)]
pub struct ProcessEntry {
    pub name: String,
    pub pid: Option<u32>,
}

#[derive(Default)]
pub struct ProcessTable {
    inner: Mutex<HashMap<ProcessId, ProcessEntry>>,
}

impl ProcessTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a subprocess; returns its table id.
    pub fn add(&self, name: &str, pid: Option<u32>) -> ProcessId {
        let id = ProcessId::new();
        self.inner.lock().insert(
            id.clone(),
            ProcessEntry {
                name: name.to_string(),
                pid,
            },
        );
        id
    }

    /// Remove one entry by id. Unknown ids are a no-op.
    pub fn delete(&self, id: &ProcessId) {
        self.inner.lock().remove(id);
    }

    /// Remove every entry carrying `pid`. Idempotent; `None` is a no-op.
    pub fn delete_by_pid(&self, pid: Option<u32>) {
        let Some(pid) = pid else { return };
        self.inner.lock().retain(|_, entry| entry.pid != Some(pid));
    }

    /// Snapshot of the current entries.
    pub fn entries(&self) -> Vec<(ProcessId, ProcessEntry)> {
        self.inner
            .lock()
            .iter()
            .map(|(id, entry)| (id.clone(), entry.clone()))
            .collect()
    }

    /// Teardown: SIGTERM everything with a known pid, then clear the table.
    /// Best-effort — delivery failures are ignored.
    pub fn kill_all(&self) {
        let mut inner = self.inner.lock();
        for entry in inner.values() {
            if let Some(pid) = entry.pid {
                let _ = kill(Pid::from_raw(pid as i32), Signal::SIGTERM);
            }
        }
        inner.clear();
    }

    pub fn len(&self) -> usize {
        self.inner.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.lock().is_empty()
    }
}

#[cfg(test)]
#[path = "process_tests.rs"]
mod tests;
