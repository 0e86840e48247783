// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Script header decoding
//!
//! A script declares its metadata in a leading comment block of
//! `# @forge-<key>:` directives:
//!
//! ```text
//! #!/bin/bash
//! # @forge-help: build the release binary
//! # @forge-args: target:string, verbose:bool?
//! # @forge-chain: clean -> configure target=release
//! # @forge-deps: generate, vendor pkg=core
//! # @forge-outputs: bin/app
//! # @forge-async
//! # @forge-build-number
//! # @forge-manual:
//! #   Longer prose for `forge help`.
//! ```
//!
//! The block ends at the first line that is not a comment. After a
//! `@forge-manual:` directive, plain comment lines accumulate into the
//! manual text until the next directive.

use thiserror::Error;

const DIRECTIVE_PREFIX: &str = "@forge-";

/// Decoded script metadata. `args` and `chain` stay textual here; the
/// engine runs them through the schema and chain parsers.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ScriptHeader {
    /// Argument schema string.
    pub args: String,
    /// Chain spec string.
    pub chain: String,
    pub help: String,
    pub manual: String,
    /// Dependency specs, each `name [arg ...]`.
    pub dependencies: Vec<String>,
    /// Output paths guarding the freshness gate.
    pub outputs: Vec<String>,
    pub async_run: bool,
    pub build_number: bool,
}

/// Errors from decoding a header block
#[derive(Debug, Error, PartialEq, Eq)]
pub enum HeaderError {
    #[error("unknown header directive: @forge-{directive}")]
    UnknownDirective { directive: String },
}

/// Decode the leading comment block of a script.
///
/// A script without directives decodes into the default (empty) header.
pub fn parse_header(content: &str) -> Result<ScriptHeader, HeaderError> {
    let mut header = ScriptHeader::default();
    let mut manual_lines: Vec<String> = Vec::new();
    let mut in_manual = false;

    for line in content.lines() {
        let trimmed = line.trim();
        if trimmed.starts_with("#!") {
            continue;
        }
        let Some(comment) = trimmed.strip_prefix('#') else {
            break;
        };
        let comment = comment.trim_start();

        let Some(directive) = comment.strip_prefix(DIRECTIVE_PREFIX) else {
            if in_manual {
                manual_lines.push(comment.trim_end().to_string());
            }
            continue;
        };
        in_manual = false;

        let (key, value) = match directive.split_once(':') {
            Some((key, value)) => (key.trim(), value.trim()),
            None => (directive.trim(), ""),
        };
        match key {
            "args" => header.args = value.to_string(),
            "chain" => header.chain = value.to_string(),
            "help" => header.help = value.to_string(),
            "deps" => header.dependencies = split_list(value),
            "outputs" => header.outputs = split_list(value),
            "async" => header.async_run = true,
            "build-number" => header.build_number = true,
            "manual" => {
                in_manual = true;
                if !value.is_empty() {
                    manual_lines.push(value.to_string());
                }
            }
            _ => {
                return Err(HeaderError::UnknownDirective {
                    directive: key.to_string(),
                })
            }
        }
    }

    header.manual = manual_lines.join("\n");
    Ok(header)
}

fn split_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}

#[cfg(test)]
#[path = "header_tests.rs"]
mod tests;
