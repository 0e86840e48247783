// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Chain resolution
//!
//! Materializes a parsed chain into executable command references. A name
//! resolves in order against: the registry, a script file in the forge
//! directory, the commandfile. Resolution of an unparsed script recurses
//! into the parser, which is also how transitive discovery happens — the
//! recursion is bounded by the occurrence count on the shared [`ParseJob`].

use crate::command::Command;
use crate::engine::Engine;
use crate::error::EngineError;
use crate::jobs::ParseJob;
use forge_script::{parse_arg_schema, parse_chain, ChainLink};
use std::future::Future;
use std::path::PathBuf;
use std::pin::Pin;
use std::sync::Arc;

impl Engine {
    /// Resolve chain links into commands, in order.
    ///
    /// A name whose occurrence count on `job` exceeds the configured
    /// recursion depth is a cycle — fatal to the process once it reaches
    /// the CLI. Links with positional args get a params-carrying copy;
    /// the registry entry is never touched.
    pub(crate) fn resolve_chain<'a>(
        &'a self,
        links: &'a [ChainLink],
        job: &'a Arc<ParseJob>,
    ) -> Pin<Box<dyn Future<Output = Result<Vec<Arc<Command>>, EngineError>> + Send + 'a>> {
        Box::pin(async move {
            let mut chain = Vec::with_capacity(links.len());
            for link in links {
                if job.occurrences(&link.name) > self.config.recursion_depth {
                    return Err(EngineError::CycleDetected {
                        name: link.name.clone(),
                        limit: self.config.recursion_depth,
                    });
                }
                job.record(&link.name, &link.args);

                let command = self.resolve_command(&link.name, job).await?;
                let command = if link.args.is_empty() {
                    command
                } else {
                    Arc::new(command.with_params(link.args.clone()))
                };
                chain.push(command);
            }
            Ok(chain)
        })
    }

    /// Resolve one name to a command, parsing its backing script on demand.
    async fn resolve_command(
        &self,
        name: &str,
        job: &Arc<ParseJob>,
    ) -> Result<Arc<Command>, EngineError> {
        if let Some(command) = self.registry.lookup(name) {
            return Ok(command);
        }

        let path = self.dir.join(format!("{}.{}", name, self.config.extension));
        if !path.exists() {
            // Not directory-backed: the commandfile is the only source left.
            let command = self.synthesize_command(name, job).await?;
            let _ = self.registry.add(Arc::clone(&command), false);
            return Ok(command);
        }

        if self.jobs.owned_by(&path, job) {
            // Our own frontier is mid-parse of this script. Waiting would
            // deadlock; re-parse and let the recursion bound end true cycles.
            let command = self.parse_script(&path, job).await?;
            let _ = self.registry.add(Arc::clone(&command), false);
            return Ok(command);
        }
        if self.jobs.exists(&path) {
            self.jobs.wait_for(&path).await;
            if let Some(command) = self.registry.lookup(name) {
                return Ok(command);
            }
            // The parse we waited for failed; try it ourselves below.
        }

        if self.jobs.try_add(&path, job) {
            let result = self.parse_script(&path, job).await;
            self.jobs.remove(&path);
            let command = result?;
            let _ = self.registry.add(Arc::clone(&command), false);
            return Ok(command);
        }

        // Lost the claim race to another frontier.
        self.jobs.wait_for(&path).await;
        match self.registry.lookup(name) {
            Some(command) => Ok(command),
            None => Err(EngineError::UnknownCommand {
                name: name.to_string(),
            }),
        }
    }

    /// Build a command from its commandfile entry.
    pub(crate) async fn synthesize_command(
        &self,
        name: &str,
        job: &Arc<ParseJob>,
    ) -> Result<Arc<Command>, EngineError> {
        let entry = {
            self.commandfile
                .lock()
                .as_ref()
                .and_then(|file| file.commands.get(name).cloned())
        };
        let Some(entry) = entry else {
            return Err(EngineError::UnknownCommand {
                name: name.to_string(),
            });
        };

        let schema = parse_arg_schema(&entry.args)?;
        let links = parse_chain(&entry.chain);
        let chain = self.resolve_chain(&links, job).await?;
        Ok(Arc::new(Command {
            name: name.to_string(),
            path: PathBuf::new(),
            args: schema,
            help: entry.help,
            manual: entry.manual,
            chain,
            dependencies: entry.dependencies,
            outputs: entry.outputs.iter().map(PathBuf::from).collect(),
            async_run: entry.async_run,
            build_number: entry.build_number,
            run_command: entry.run,
            ..Command::default()
        }))
    }
}

#[cfg(test)]
#[path = "resolve_tests.rs"]
mod tests;
