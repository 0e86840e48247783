// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The engine context
//!
//! One [`Engine`] value owns every shared table the orchestrator needs:
//! registry, job table, process table, project state, and the globals
//! prelude. It replaces the source design's process-wide singletons; the
//! CLI constructs one and threads it everywhere. Cloning is cheap (all
//! state is behind `Arc`s).

use crate::jobs::JobTable;
use crate::process::ProcessTable;
use crate::registry::CommandRegistry;
use crate::EngineError;
use forge_core::{Config, ProjectState};
use forge_script::Commandfile;
use parking_lot::Mutex;
use std::path::{Path, PathBuf};
use std::sync::Arc;

#[derive(Clone)]
pub struct Engine {
    pub(crate) config: Arc<Config>,
    /// The forge directory (scripts, config, commandfile, project state).
    pub(crate) dir: PathBuf,
    pub(crate) registry: Arc<CommandRegistry>,
    pub(crate) jobs: Arc<JobTable>,
    pub(crate) processes: Arc<ProcessTable>,
    pub(crate) project: Arc<Mutex<ProjectState>>,
    /// Globals prelude bytes, prepended to every assembled script.
    pub(crate) globals: Arc<Mutex<Vec<u8>>>,
    pub(crate) commandfile: Arc<Mutex<Option<Commandfile>>>,
}

impl Engine {
    /// Build an engine rooted at `dir` (the `.forge` directory).
    pub fn new(config: Config, dir: impl Into<PathBuf>) -> Result<Self, EngineError> {
        let dir = dir.into();
        let project = ProjectState::load(&dir)?;
        Ok(Self {
            config: Arc::new(config),
            dir,
            registry: Arc::new(CommandRegistry::new()),
            jobs: Arc::new(JobTable::new()),
            processes: Arc::new(ProcessTable::new()),
            project: Arc::new(Mutex::new(project)),
            globals: Arc::new(Mutex::new(Vec::new())),
            commandfile: Arc::new(Mutex::new(None)),
        })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn registry(&self) -> &CommandRegistry {
        &self.registry
    }

    pub fn processes(&self) -> &ProcessTable {
        &self.processes
    }

    /// Current build counter.
    pub fn build_number(&self) -> u64 {
        self.project.lock().build_number
    }

    /// Cleanup hook for fatal teardown: signal every tracked subprocess.
    pub fn cleanup(&self) {
        let count = self.processes.len();
        if count > 0 {
            tracing::warn!(count, "signalling tracked subprocesses");
        }
        self.processes.kill_all();
    }
}
