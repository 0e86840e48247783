// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::helpers::{forge, forge_dir, write_script};

#[test]
fn list_shows_usage_and_help() {
    let (_root, dir) = forge_dir();
    write_script(
        &dir,
        "build",
        "# @forge-args: target:string\n# @forge-help: compile the project\necho hi\n",
    );
    write_script(&dir, "clean", "echo clean\n");

    let assert = forge(&dir).arg("list").assert().success();
    let stdout = String::from_utf8_lossy(&assert.get_output().stdout).into_owned();
    assert!(stdout.contains("build target:string"), "stdout: {stdout}");
    assert!(stdout.contains("compile the project"), "stdout: {stdout}");
    assert!(stdout.contains("clean"), "stdout: {stdout}");
}

#[test]
fn list_marks_builtin_shadowing() {
    let (_root, dir) = forge_dir();
    write_script(&dir, "help", "echo custom help\n");

    let assert = forge(&dir).arg("list").assert().success();
    let stdout = String::from_utf8_lossy(&assert.get_output().stdout).into_owned();
    assert!(stdout.contains("shadows built-in"), "stdout: {stdout}");
}

#[test]
fn help_shows_manual_and_metadata() {
    let (_root, dir) = forge_dir();
    write_script(
        &dir,
        "release",
        "# @forge-help: cut a release\n\
         # @forge-chain: build\n\
         # @forge-deps: generate\n\
         # @forge-outputs: dist/app.tgz\n\
         # @forge-manual:\n\
         #   Packages the build output for distribution.\n\
         echo release\n",
    );
    write_script(&dir, "build", "echo build\n");
    write_script(&dir, "generate", "# @forge-outputs: gen.c\ntouch gen.c\n");

    let assert = forge(&dir).args(["help", "release"]).assert().success();
    let stdout = String::from_utf8_lossy(&assert.get_output().stdout).into_owned();
    assert!(stdout.contains("usage: release"), "stdout: {stdout}");
    assert!(stdout.contains("cut a release"), "stdout: {stdout}");
    assert!(
        stdout.contains("Packages the build output"),
        "stdout: {stdout}"
    );
    assert!(stdout.contains("chain: build"), "stdout: {stdout}");
    assert!(stdout.contains("dependencies: generate"), "stdout: {stdout}");
    assert!(stdout.contains("outputs: dist/app.tgz"), "stdout: {stdout}");
}

#[test]
fn help_for_unknown_command_fails() {
    let (_root, dir) = forge_dir();
    write_script(&dir, "build", "echo hi\n");

    let assert = forge(&dir).args(["help", "ghost"]).assert().code(1);
    let stderr = String::from_utf8_lossy(&assert.get_output().stderr).into_owned();
    assert!(stderr.contains("unknown command"), "stderr: {stderr}");
}
