// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Shared helpers for engine tests

use crate::engine::Engine;
use forge_core::Config;
use std::path::{Path, PathBuf};

/// Test config: `/bin/sh`, default everything else.
pub(crate) fn test_config() -> Config {
    Config {
        interpreter: "/bin/sh".to_string(),
        ..Config::default()
    }
}

pub(crate) fn engine_in(dir: &Path) -> Engine {
    Engine::new(test_config(), dir).unwrap()
}

pub(crate) fn engine_with(config: Config, dir: &Path) -> Engine {
    Engine::new(config, dir).unwrap()
}

/// Write `<dir>/<name>.sh` with the given content; returns its path.
pub(crate) fn write_script(dir: &Path, name: &str, content: &str) -> PathBuf {
    let path = dir.join(format!("{name}.sh"));
    std::fs::write(&path, content).unwrap();
    path
}
