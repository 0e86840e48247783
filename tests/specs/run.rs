// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::helpers::{forge, forge_dir, write_script};

#[test]
fn runs_a_chain_in_order() {
    let (root, dir) = forge_dir();
    let log = root.path().join("log");
    write_script(&dir, "one", &format!("echo one >> {}\n", log.display()));
    write_script(&dir, "two", &format!("echo two >> {}\n", log.display()));

    forge(&dir)
        .args(["run", "one", "->", "two"])
        .assert()
        .success();

    assert_eq!(std::fs::read_to_string(&log).unwrap(), "one\ntwo\n");
}

#[test]
fn chain_args_reach_the_script() {
    let (root, dir) = forge_dir();
    let out = root.path().join("out");
    write_script(
        &dir,
        "greet",
        &format!(
            "# @forge-args: name:string\nprintf '%s' \"$name\" > {}\n",
            out.display()
        ),
    );

    forge(&dir).args(["run", "greet", "name=joe"]).assert().success();
    assert_eq!(std::fs::read_to_string(&out).unwrap(), "joe");
}

#[test]
fn existing_output_skips_the_command() {
    let (root, dir) = forge_dir();
    let output = root.path().join("out.bin");
    std::fs::write(&output, "built").unwrap();
    let marker = root.path().join("ran");
    write_script(
        &dir,
        "build",
        &format!(
            "# @forge-outputs: {}\ntouch {}\n",
            output.display(),
            marker.display()
        ),
    );

    let assert = forge(&dir).args(["run", "build"]).assert().success();
    let stderr = String::from_utf8_lossy(&assert.get_output().stderr).into_owned();
    assert!(stderr.contains("skipping"), "stderr: {stderr}");
    assert!(!marker.exists());
}

#[test]
fn failing_link_sets_exit_code_but_chain_continues() {
    let (root, dir) = forge_dir();
    let log = root.path().join("log");
    write_script(&dir, "boom", "exit 7\n");
    write_script(&dir, "after", &format!("echo after >> {}\n", log.display()));

    forge(&dir)
        .args(["run", "boom", "->", "after"])
        .assert()
        .code(1);

    assert_eq!(std::fs::read_to_string(&log).unwrap(), "after\n");
}

#[test]
fn mutual_chain_cycle_terminates_with_code_2() {
    let (_root, dir) = forge_dir();
    write_script(&dir, "a", "# @forge-chain: b\necho a\n");
    write_script(&dir, "b", "# @forge-chain: a\necho b\n");

    let assert = forge(&dir).args(["run", "a"]).assert().code(2);
    let stderr = String::from_utf8_lossy(&assert.get_output().stderr).into_owned();
    assert!(stderr.contains("cycle"), "stderr: {stderr}");
}

#[test]
fn build_number_persists_across_runs() {
    let (_root, dir) = forge_dir();
    write_script(&dir, "stamp", "# @forge-build-number\ntrue\n");

    forge(&dir).args(["run", "stamp"]).assert().success();
    forge(&dir).args(["run", "stamp"]).assert().success();

    let state: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(dir.join("project.json")).unwrap()).unwrap();
    assert_eq!(state["build_number"], 2);
}

#[test]
fn dependencies_run_when_their_outputs_are_missing() {
    let (root, dir) = forge_dir();
    let gen_out = root.path().join("generated");
    let log = root.path().join("log");
    write_script(
        &dir,
        "generate",
        &format!(
            "# @forge-outputs: {out}\necho generate >> {log}\ntouch {out}\n",
            out = gen_out.display(),
            log = log.display()
        ),
    );
    write_script(
        &dir,
        "build",
        &format!("# @forge-deps: generate\necho build >> {}\n", log.display()),
    );

    forge(&dir).args(["run", "build"]).assert().success();
    assert_eq!(
        std::fs::read_to_string(&log).unwrap(),
        "generate\nbuild\n"
    );

    // Second run: the dependency's output exists, so only build runs.
    forge(&dir).args(["run", "build"]).assert().success();
    assert_eq!(
        std::fs::read_to_string(&log).unwrap(),
        "generate\nbuild\nbuild\n"
    );
}

#[test]
fn commandfile_command_runs_inline_body() {
    let (root, dir) = forge_dir();
    let out = root.path().join("out");
    std::fs::write(
        dir.join("commands.toml"),
        format!(
            "[commands.hello]\nrun = \"printf hi > {}\"\n",
            out.display()
        ),
    )
    .unwrap();

    forge(&dir).args(["run", "hello"]).assert().success();
    assert_eq!(std::fs::read_to_string(&out).unwrap(), "hi");
}

#[test]
fn globals_prelude_is_visible_to_scripts() {
    let (root, dir) = forge_dir();
    let out = root.path().join("out");
    write_script(&dir, "globals", "GREETING=hello");
    write_script(
        &dir,
        "show",
        &format!("printf '%s' \"$GREETING\" > {}\n", out.display()),
    );

    forge(&dir).args(["run", "show"]).assert().success();
    assert_eq!(std::fs::read_to_string(&out).unwrap(), "hello");
}

#[test]
fn missing_forge_dir_is_an_error() {
    let root = tempfile::tempdir().unwrap();
    let mut cmd = assert_cmd::Command::cargo_bin("forge").unwrap();
    let assert = cmd
        .arg("--dir")
        .arg(root.path().join("nope"))
        .args(["run", "x"])
        .assert()
        .code(1);
    let stderr = String::from_utf8_lossy(&assert.get_output().stderr).into_owned();
    assert!(stderr.contains("not found"), "stderr: {stderr}");
}
