// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use forge_script::parse_arg_schema;
use std::path::PathBuf;

fn sample() -> Command {
    Command {
        name: "build".to_string(),
        path: PathBuf::from("/tmp/forge/build.sh"),
        args: parse_arg_schema("target:string, jobs:int?=4").unwrap(),
        help: "compile".to_string(),
        manual: "long form".to_string(),
        chain: vec![Arc::new(Command {
            name: "clean".to_string(),
            ..Command::default()
        })],
        dependencies: vec!["generate".to_string()],
        outputs: vec![PathBuf::from("bin/app")],
        async_run: true,
        build_number: true,
        run_command: "echo inline".to_string(),
        ..Command::default()
    }
}

#[test]
fn with_params_carries_template_surface() {
    let command = sample();
    let copy = command.with_params(vec!["target=x".to_string()]);

    assert_eq!(copy.name, command.name);
    assert_eq!(copy.path, command.path);
    assert_eq!(copy.args, command.args);
    assert_eq!(copy.help, command.help);
    assert_eq!(copy.manual, command.manual);
    assert_eq!(copy.chain.len(), 1);
    assert!(copy.build_number);
    assert_eq!(copy.run_command, command.run_command);
    assert_eq!(copy.params, vec!["target=x"]);
}

#[test]
fn with_params_resets_non_template_fields() {
    let copy = sample().with_params(vec!["target=x".to_string()]);
    // The copy is a per-invocation view: detachment, dependencies, and
    // outputs stay on the registry entry only.
    assert!(!copy.async_run);
    assert!(copy.dependencies.is_empty());
    assert!(copy.outputs.is_empty());
}

#[test]
fn with_params_leaves_original_untouched() {
    let command = sample();
    let _copy = command.with_params(vec!["target=x".to_string()]);
    assert!(command.params.is_empty());
    assert!(command.async_run);
}

#[test]
fn usage_includes_schema() {
    let command = sample();
    assert_eq!(command.usage(), "build target:string, jobs:int?=4");
}

#[test]
fn usage_without_args_is_just_the_name() {
    let command = Command {
        name: "clean".to_string(),
        ..Command::default()
    };
    assert_eq!(command.usage(), "clean");
}
