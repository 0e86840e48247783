// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Command execution
//!
//! One invocation walks: freshness gate → dependency recursion → chain →
//! argument materialization → script assembly → spawn → wait (or detach).
//! Synchronous commands inherit the parent's stdio; async commands detach
//! into a screen session whose liveness is polled until the multiplexer
//! drops it.

use crate::command::Command;
use crate::driver::ChainProgress;
use crate::engine::Engine;
use crate::error::EngineError;
use std::future::Future;
use std::os::unix::fs::PermissionsExt;
use std::pin::Pin;
use std::process::Stdio;
use std::time::{Duration, Instant};

/// Delay after launching an async body, so the caller's log lines stay
/// ordered relative to the detached task's.
const ASYNC_PACING_DELAY: Duration = Duration::from_millis(50);

/// Interval between liveness checks of a detached session.
const DETACH_POLL_INTERVAL: Duration = Duration::from_secs(2);

impl Engine {
    /// Run one command.
    ///
    /// `detach` mirrors the command's `async_run` at the call site: when
    /// set, the body runs in a spawned task (errors logged, not
    /// propagated) and this call returns after a short pacing delay.
    ///
    /// Boxed: dependencies and chain links recurse back into `run_command`.
    pub fn run_command<'a>(
        &'a self,
        command: &'a Command,
        args: &'a [String],
        detach: bool,
        progress: &'a ChainProgress,
    ) -> Pin<Box<dyn Future<Output = Result<(), EngineError>> + Send + 'a>> {
        Box::pin(async move {
            if detach {
                let engine = self.clone();
                let command = command.clone();
                let args = args.to_vec();
                let progress = progress.clone();
                tokio::spawn(async move {
                    if let Err(error) = engine.run_command(&command, &args, false, &progress).await
                    {
                        tracing::error!(command = %command.name, %error, "async command failed");
                    }
                });
                tokio::time::sleep(ASYNC_PACING_DELAY).await;
                return Ok(());
            }

            let started = Instant::now();

            // Freshness gate: any existing output marks the command up to
            // date — body, chain, and dependencies are all skipped.
            for output in &command.outputs {
                if output.exists() {
                    tracing::info!(
                        command = %command.name,
                        output = %output.display(),
                        "outputs up to date, skipping"
                    );
                    return Ok(());
                }
            }

            self.run_dependencies(command, progress).await?;

            // Params bound at chain-resolution time beat call-site args.
            let args: &[String] = if command.params.is_empty() {
                args
            } else {
                &command.params
            };

            // Chained commands must satisfy their needs via their own
            // params or defaults; they get no caller args.
            for link in &command.chain {
                self.run_command(link, &[], link.async_run, progress).await?;
            }

            let arg_buffer = forge_script::bind_args(&command.args, args)?;
            let script = self.assemble_script(command, &arg_buffer).await?;
            if self.config.debug {
                eprintln!("--- script for {} ---\n{script}\n---", command.name);
            }

            self.spawn_and_wait(command, &script, started, progress).await
        })
    }

    /// Run every dependency whose declared outputs are incomplete.
    ///
    /// A dependency with no declared outputs is never triggered here.
    async fn run_dependencies(
        &self,
        command: &Command,
        progress: &ChainProgress,
    ) -> Result<(), EngineError> {
        for spec in &command.dependencies {
            let mut tokens = spec.split_whitespace();
            let Some(dep_name) = tokens.next() else {
                continue;
            };
            let dep_args: Vec<String> = tokens.map(String::from).collect();

            let Some(dep) = self.registry.lookup(dep_name) else {
                return Err(EngineError::UnknownDependency {
                    name: dep_name.to_string(),
                });
            };
            if dep.outputs.is_empty() || dep.outputs.iter().all(|output| output.exists()) {
                continue;
            }
            progress.add_total(1);
            self.run_command(&dep, &dep_args, dep.async_run, progress)
                .await?;
        }
        Ok(())
    }

    /// Assemble the generated script: globals prelude, argument buffer,
    /// then the body (inline `run_command`, or the file contents after
    /// making the script owner-executable).
    async fn assemble_script(
        &self,
        command: &Command,
        arg_buffer: &str,
    ) -> Result<String, EngineError> {
        let globals = { self.globals.lock().clone() };
        let mut script = String::from_utf8_lossy(&globals).into_owned();
        script.push_str(arg_buffer);

        if !command.run_command.is_empty() {
            script.push_str(&command.run_command);
        } else if !command.path.as_os_str().is_empty() {
            tokio::fs::set_permissions(&command.path, std::fs::Permissions::from_mode(0o700))
                .await
                .map_err(|source| EngineError::Io {
                    path: command.path.clone(),
                    source,
                })?;
            let body = tokio::fs::read_to_string(&command.path)
                .await
                .map_err(|source| EngineError::Io {
                    path: command.path.clone(),
                    source,
                })?;
            script.push_str(&body);
        }
        Ok(script)
    }

    /// Interpreter for generated scripts: the commandfile's `language`
    /// override when present, else the configured one.
    fn interpreter(&self) -> String {
        let language = {
            self.commandfile
                .lock()
                .as_ref()
                .and_then(|file| file.language.clone())
        };
        language.unwrap_or_else(|| self.config.interpreter.clone())
    }

    async fn spawn_and_wait(
        &self,
        command: &Command,
        script: &str,
        started: Instant,
        progress: &ChainProgress,
    ) -> Result<(), EngineError> {
        let (program, argv) = build_invocation(
            &command.name,
            command.async_run,
            &self.interpreter(),
            self.config.stop_on_error,
            script,
        );

        let mut process = tokio::process::Command::new(&program);
        process.args(&argv);
        if command.async_run {
            process
                .stdin(Stdio::null())
                .stdout(Stdio::null())
                .stderr(Stdio::null());
        } else {
            process
                .stdin(Stdio::inherit())
                .stdout(Stdio::inherit())
                .stderr(Stdio::inherit());
        }

        let mut child = process.spawn().map_err(|source| EngineError::Spawn {
            name: command.name.clone(),
            source,
        })?;
        let pid = child.id();

        // Bookkeeping happens before any wait.
        let process_id = self.processes.add(&command.name, pid);
        if command.build_number {
            let state = {
                let mut project = self.project.lock();
                project.build_number += 1;
                project.clone()
            };
            state.save(&self.dir)?;
            tracing::info!(build_number = state.build_number, "build counter incremented");
        }

        let status = child.wait().await.map_err(|source| EngineError::Spawn {
            name: command.name.clone(),
            source,
        })?;
        self.processes.delete(&process_id);
        self.processes.delete_by_pid(pid);

        if !status.success() {
            let code = status.code().unwrap_or(-1);
            if self.config.dump_script_on_error {
                dump_script(script);
            }
            return Err(EngineError::CommandFailed {
                name: command.name.clone(),
                code,
            });
        }

        if command.async_run {
            // The launcher exiting cleanly means the session is up; track
            // it until the multiplexer drops it.
            self.watch_detached(&command.name);
            tracing::info!(command = %command.name, session = %command.name, "detached");
        }

        let (current, total) = progress.advance();
        let elapsed_ms = started.elapsed().as_millis() as u64;
        tracing::info!(
            command = %command.name,
            elapsed_ms,
            "[{current}/{total}] finished"
        );
        Ok(())
    }

    /// Poll the multiplexer every 2 s; reap the table entry when the
    /// session disappears. A liveness probe, not a precise wait.
    fn watch_detached(&self, session: &str) {
        let id = self.processes.add(session, None);
        let engine = self.clone();
        let session = session.to_string();
        tokio::spawn(async move {
            loop {
                tokio::time::sleep(DETACH_POLL_INTERVAL).await;
                if !screen_session_alive(&session).await {
                    engine.processes.delete(&id);
                    tracing::debug!(session = %session, "detached session finished");
                    break;
                }
            }
        });
    }
}

/// Build the shell invocation for an assembled script.
///
/// Sync: `<interpreter> [-e] -c <script>`. Detached:
/// `screen -L -S <name> -dm <interpreter> [-e] -c <script>`. `-e` rides on
/// `stop_on_error`.
pub(crate) fn build_invocation(
    name: &str,
    detach: bool,
    interpreter: &str,
    stop_on_error: bool,
    script: &str,
) -> (String, Vec<String>) {
    let mut argv = Vec::new();
    let program = if detach {
        argv.extend([
            "-L".to_string(),
            "-S".to_string(),
            name.to_string(),
            "-dm".to_string(),
            interpreter.to_string(),
        ]);
        "screen".to_string()
    } else {
        interpreter.to_string()
    };
    if stop_on_error {
        argv.push("-e".to_string());
    }
    argv.push("-c".to_string());
    argv.push(script.to_string());
    (program, argv)
}

/// Print the assembled script with 1-based line numbers.
fn dump_script(script: &str) {
    eprintln!("--- failing script ---");
    for (i, line) in script.lines().enumerate() {
        eprintln!("{:>4} | {line}", i + 1);
    }
    eprintln!("---");
}

async fn screen_session_alive(session: &str) -> bool {
    let output = tokio::process::Command::new("screen")
        .arg("-ls")
        .output()
        .await;
    match output {
        Ok(output) => {
            String::from_utf8_lossy(&output.stdout).contains(&format!(".{session}\t"))
        }
        Err(_) => false,
    }
}

#[cfg(test)]
#[path = "exec_tests.rs"]
mod tests;
