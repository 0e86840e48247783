// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use std::path::{Path, PathBuf};
use std::sync::OnceLock;

/// Create a `.forge/` tree inside a fresh tempdir; returns (tempdir, dir).
pub fn forge_dir() -> (tempfile::TempDir, PathBuf) {
    let root = tempfile::tempdir().unwrap();
    let dir = root.path().join(".forge");
    std::fs::create_dir(&dir).unwrap();
    (root, dir)
}

pub fn write_script(dir: &Path, name: &str, content: &str) {
    std::fs::write(dir.join(format!("{name}.sh")), content).unwrap();
}

/// Locate (building if necessary) the `forge` binary produced by the `forge` package.
///
/// `forge` is a separate workspace member from this integration-test package, so
/// Cargo does not populate `CARGO_BIN_EXE_forge` for us; ask cargo directly instead.
fn forge_bin_path() -> &'static Path {
    static BIN: OnceLock<PathBuf> = OnceLock::new();
    BIN.get_or_init(|| {
        let output = std::process::Command::new(env!("CARGO"))
            .args(["build", "-p", "forge", "--message-format=json"])
            .output()
            .unwrap();
        assert!(output.status.success(), "failed to build forge binary");
        let stdout = String::from_utf8(output.stdout).unwrap();
        for line in stdout.lines() {
            let msg: serde_json::Value = serde_json::from_str(line).unwrap();
            if msg.get("reason").and_then(|r| r.as_str()) == Some("compiler-artifact")
                && msg["target"]["name"] == "forge"
            {
                if let Some(executable) = msg.get("executable").and_then(|e| e.as_str()) {
                    return PathBuf::from(executable);
                }
            }
        }
        panic!("forge binary not found in cargo build output");
    })
    .as_path()
}

/// The `forge` binary pointed at `dir`, with sh as the interpreter.
pub fn forge(dir: &Path) -> assert_cmd::Command {
    std::fs::write(dir.join("config.toml"), "interpreter = \"/bin/sh\"\n").unwrap();
    let mut cmd = assert_cmd::Command::new(forge_bin_path());
    cmd.arg("--dir").arg(dir);
    cmd
}
