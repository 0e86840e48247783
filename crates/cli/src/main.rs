// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! forge — shell-script build orchestrator
//!
//! Discovers scripted commands under `.forge/`, resolves chains, and runs
//! them with freshness gating and dependency recursion.

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use forge_core::Config;
use forge_engine::Engine;
use std::path::PathBuf;

mod commands;

#[derive(Parser)]
#[command(
    name = "forge",
    version,
    about = "Shell-script build orchestrator",
    disable_help_subcommand = true
)]
struct Cli {
    /// Forge directory (defaults to ./.forge)
    #[arg(long, global = true)]
    dir: Option<PathBuf>,

    /// Dump every assembled script before running it
    #[arg(long, global = true)]
    debug: bool,

    /// Pass the interpreter's stop-on-first-failure flag
    #[arg(long, global = true)]
    stop_on_error: bool,

    /// Print the assembled script with line numbers when a command fails
    #[arg(long, global = true)]
    dump_script_on_error: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a command chain, e.g. `forge run clean -> build target=x`
    Run {
        /// Chain words; joined into one chain spec
        #[arg(trailing_var_arg = true, allow_hyphen_values = true, required = true)]
        chain: Vec<String>,
    },
    /// List discovered commands
    List,
    /// Show a command's usage, manual, dependencies, and outputs
    Help {
        /// Command name
        name: String,
    },
}

#[tokio::main]
async fn main() {
    init_tracing();
    let cli = Cli::parse();
    match run(cli).await {
        Ok(code) => std::process::exit(code),
        Err(error) => {
            tracing::error!("{error:#}");
            std::process::exit(1);
        }
    }
}

fn init_tracing() {
    use tracing_subscriber::EnvFilter;
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

async fn run(cli: Cli) -> Result<i32> {
    let dir = cli.dir.unwrap_or_else(|| PathBuf::from(".forge"));
    if !dir.is_dir() {
        bail!(
            "forge directory {} not found (create it or pass --dir)",
            dir.display()
        );
    }

    let mut config = Config::load(&dir).context("loading config")?;
    if cli.debug {
        config.debug = true;
    }
    if cli.stop_on_error {
        config.stop_on_error = true;
    }
    if cli.dump_script_on_error {
        config.dump_script_on_error = true;
    }

    let engine = Engine::new(config, &dir)?;
    match cli.command {
        Commands::Run { chain } => commands::run_chain(&engine, &chain.join(" ")).await,
        Commands::List => commands::list(&engine).await,
        Commands::Help { name } => commands::help(&engine, &name).await,
    }
}
