// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! forge-script: script metadata decoding
//!
//! Everything needed to turn a script file (or a commandfile entry) into
//! typed command metadata: the header directive decoder, the argument
//! schema parser and call-site validator, and the chain parser.

pub mod chain;
pub mod commandfile;
pub mod header;
pub mod schema;

pub use chain::{parse_chain, ChainLink};
pub use commandfile::{CommandEntry, Commandfile, CommandfileError, COMMANDFILE};
pub use header::{parse_header, HeaderError, ScriptHeader};
pub use schema::{
    bind_args, format_schema, parse_arg_schema, ArgSchema, ArgSpec, ArgType, BindError,
    SchemaError,
};
