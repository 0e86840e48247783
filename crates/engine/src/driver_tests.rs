// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use crate::testutil::{engine_in, write_script};

#[test]
fn progress_counts() {
    let progress = ChainProgress::new(2);
    assert_eq!(progress.total(), 2);
    assert_eq!(progress.current(), 0);

    assert_eq!(progress.advance(), (1, 2));
    progress.add_total(1);
    assert_eq!(progress.advance(), (2, 3));
    assert_eq!(progress.current(), 2);
}

#[test]
fn count_commands_is_transitive() {
    let leaf = Arc::new(Command {
        name: "leaf".to_string(),
        ..Command::default()
    });
    let mid = Arc::new(Command {
        name: "mid".to_string(),
        chain: vec![Arc::clone(&leaf)],
        ..Command::default()
    });
    let top = Command {
        name: "top".to_string(),
        chain: vec![mid, leaf],
        ..Command::default()
    };
    assert_eq!(count_commands(&top), 4);
}

#[tokio::test]
async fn empty_chain_is_a_noop() {
    let dir = tempfile::tempdir().unwrap();
    let engine = engine_in(dir.path());
    let summary = engine.run_chain("").await.unwrap();
    assert_eq!(summary, ChainSummary::default());
}

#[tokio::test]
async fn chain_links_run_in_order() {
    let dir = tempfile::tempdir().unwrap();
    let log = dir.path().join("log");
    write_script(dir.path(), "one", &format!("echo one >> {}\n", log.display()));
    write_script(dir.path(), "two", &format!("echo two >> {}\n", log.display()));

    let engine = engine_in(dir.path());
    engine.bootstrap().await.unwrap();

    let summary = engine.run_chain("one -> two").await.unwrap();
    assert_eq!(summary.executed, 2);
    assert_eq!(summary.failures, 0);
    assert_eq!(std::fs::read_to_string(&log).unwrap(), "one\ntwo\n");
}

#[tokio::test]
async fn chain_args_bind_through_params() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("out");
    write_script(
        dir.path(),
        "greet",
        &format!(
            "# @forge-args: name:string\nprintf '%s' \"$name\" > {}\n",
            out.display()
        ),
    );

    let engine = engine_in(dir.path());
    engine.bootstrap().await.unwrap();

    engine.run_chain("greet name=joe").await.unwrap();
    assert_eq!(std::fs::read_to_string(&out).unwrap(), "joe");
}

#[tokio::test]
async fn failing_link_does_not_stop_the_chain() {
    let dir = tempfile::tempdir().unwrap();
    let log = dir.path().join("log");
    write_script(dir.path(), "boom", "exit 1\n");
    write_script(dir.path(), "after", &format!("echo after >> {}\n", log.display()));

    let engine = engine_in(dir.path());
    engine.bootstrap().await.unwrap();

    let summary = engine.run_chain("boom -> after").await.unwrap();
    assert_eq!(summary.executed, 2);
    assert_eq!(summary.failures, 1);
    assert_eq!(std::fs::read_to_string(&log).unwrap(), "after\n");
}

#[tokio::test]
async fn chain_resolves_undiscovered_scripts() {
    // Running a chain without bootstrap parses scripts on demand.
    let dir = tempfile::tempdir().unwrap();
    let log = dir.path().join("log");
    write_script(dir.path(), "solo", &format!("echo solo >> {}\n", log.display()));

    let engine = engine_in(dir.path());
    let summary = engine.run_chain("solo").await.unwrap();
    assert_eq!(summary.executed, 1);
    assert_eq!(std::fs::read_to_string(&log).unwrap(), "solo\n");
}

#[tokio::test]
async fn cycle_propagates_out_of_run_chain() {
    let dir = tempfile::tempdir().unwrap();
    write_script(dir.path(), "a", "# @forge-chain: b\necho a\n");
    write_script(dir.path(), "b", "# @forge-chain: a\necho b\n");

    let engine = engine_in(dir.path());
    let error = engine.run_chain("a").await.unwrap_err();
    assert!(error.is_fatal());
}

#[tokio::test]
async fn nested_chain_counts_toward_total() {
    let dir = tempfile::tempdir().unwrap();
    let log = dir.path().join("log");
    write_script(
        dir.path(),
        "release",
        &format!("# @forge-chain: build\necho release >> {}\n", log.display()),
    );
    write_script(dir.path(), "build", &format!("echo build >> {}\n", log.display()));

    let engine = engine_in(dir.path());
    engine.bootstrap().await.unwrap();

    let summary = engine.run_chain("release").await.unwrap();
    assert_eq!(summary.executed, 1);
    assert_eq!(
        std::fs::read_to_string(&log).unwrap(),
        "build\nrelease\n"
    );
}
