// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Subcommand handlers

use anyhow::{bail, Result};
use forge_engine::{CommandRegistry, Engine, EngineError};

/// `forge run <chain>` — discover, resolve, execute.
///
/// Per-link failures are logged by the driver and reflected in the exit
/// code; a cycle tears the process down.
pub async fn run_chain(engine: &Engine, chain: &str) -> Result<i32> {
    bootstrap(engine).await?;
    match engine.run_chain(chain).await {
        Ok(summary) if summary.failures > 0 => Ok(1),
        Ok(_) => Ok(0),
        Err(error) if error.is_fatal() => fatal(engine, &error),
        Err(error) => Err(error.into()),
    }
}

/// `forge list` — registered commands with usage and help.
pub async fn list(engine: &Engine) -> Result<i32> {
    bootstrap(engine).await?;
    let names = engine.registry().names();
    if names.is_empty() {
        println!("no commands found in {}", engine.dir().display());
        return Ok(0);
    }
    for name in names {
        let Some(command) = engine.registry().lookup(&name) else {
            continue;
        };
        let conflict = if CommandRegistry::conflicts(&name) {
            " (shadows built-in)"
        } else {
            ""
        };
        if command.help.is_empty() {
            println!("{}{conflict}", command.usage());
        } else {
            println!("{:<32} {}{conflict}", command.usage(), command.help);
        }
    }
    Ok(0)
}

/// `forge help <name>` — full description of one command.
pub async fn help(engine: &Engine, name: &str) -> Result<i32> {
    bootstrap(engine).await?;
    let Some(command) = engine.registry().lookup(name) else {
        bail!("unknown command: {name}");
    };

    println!("usage: {}", command.usage());
    if !command.help.is_empty() {
        println!("{}", command.help);
    }
    if !command.manual.is_empty() {
        println!("\n{}", command.manual);
    }
    if !command.chain.is_empty() {
        let links: Vec<&str> = command.chain.iter().map(|c| c.name.as_str()).collect();
        println!("\nchain: {}", links.join(" -> "));
    }
    if !command.dependencies.is_empty() {
        println!("dependencies: {}", command.dependencies.join(", "));
    }
    if !command.outputs.is_empty() {
        let outputs: Vec<String> = command
            .outputs
            .iter()
            .map(|o| o.display().to_string())
            .collect();
        println!("outputs: {}", outputs.join(", "));
    }
    Ok(0)
}

async fn bootstrap(engine: &Engine) -> Result<()> {
    match engine.bootstrap().await {
        // Per-script errors were already reported; discovery goes on.
        Ok(_) => Ok(()),
        Err(error) if error.is_fatal() => fatal(engine, &error),
        Err(error) => Err(error.into()),
    }
}

/// Cycle teardown: run the cleanup hook, then leave with a non-zero code.
fn fatal(engine: &Engine, error: &EngineError) -> ! {
    tracing::error!(%error, "fatal error, tearing down");
    engine.cleanup();
    std::process::exit(2);
}
