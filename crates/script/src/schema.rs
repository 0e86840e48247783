// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Argument schema parsing and call-site validation
//!
//! A schema string declares a command's labeled, typed arguments:
//!
//! ```text
//! target:string, jobs:int?=4, verbose:bool?
//! ```
//!
//! Entries are comma-separated `label:type` pairs; a trailing `?` marks the
//! argument optional, and optional arguments may carry a `=default`.
//! Call-site bindings are `label=value` strings validated lexically against
//! the declared types and flushed into a textual argument buffer of one
//! `label=value` line per declared argument.

use indexmap::IndexMap;
use std::collections::HashSet;
use thiserror::Error;

/// Primitive type of a declared argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArgType {
    Bool,
    Int,
    Float,
    String,
}

impl ArgType {
    fn from_keyword(keyword: &str) -> Option<Self> {
        match keyword {
            "bool" => Some(Self::Bool),
            "int" => Some(Self::Int),
            "float" => Some(Self::Float),
            "string" => Some(Self::String),
            _ => None,
        }
    }

    pub fn keyword(&self) -> &'static str {
        match self {
            Self::Bool => "bool",
            Self::Int => "int",
            Self::Float => "float",
            Self::String => "string",
        }
    }

    /// Lexical type check: does `value` parse as this primitive?
    pub fn accepts(&self, value: &str) -> bool {
        match self {
            Self::Bool => value.parse::<bool>().is_ok(),
            Self::Int => value.parse::<i64>().is_ok(),
            Self::Float => value.parse::<f64>().is_ok(),
            Self::String => true,
        }
    }

    /// Zero value emitted for an unbound optional without a default.
    pub fn zero(&self) -> &'static str {
        match self {
            Self::Bool => "false",
            Self::Int => "0",
            Self::Float => "0.0",
            Self::String => "",
        }
    }
}

impl std::fmt::Display for ArgType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.keyword())
    }
}

/// One declared argument.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArgSpec {
    pub name: String,
    pub arg_type: ArgType,
    pub optional: bool,
    /// Textual default, only permitted on optional arguments.
    pub default: Option<String>,
}

/// Declared schema of a command: label → spec, in declaration order.
pub type ArgSchema = IndexMap<String, ArgSpec>;

/// Errors from parsing a schema string
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SchemaError {
    #[error("duplicate argument label: {label}")]
    DuplicateLabel { label: String },
    #[error("malformed schema entry: {entry:?}, expected label:type[?][=default]")]
    Syntax { entry: String },
    #[error("unknown argument type {keyword:?} for {label}")]
    UnknownType { label: String, keyword: String },
    #[error("default value on mandatory argument {label} (mark it optional with '?')")]
    DefaultOnMandatory { label: String },
}

/// Errors from binding call-site arguments against a schema
#[derive(Debug, Error, PartialEq, Eq)]
pub enum BindError {
    #[error("malformed argument {arg:?}, expected label=value")]
    Malformed { arg: String },
    #[error("unknown argument label: {label}")]
    UnknownLabel { label: String },
    #[error("invalid value {value:?} for {label}: expected {expected}")]
    TypeMismatch {
        label: String,
        value: String,
        expected: &'static str,
    },
    #[error("argument {label} bound more than once")]
    DuplicateBinding { label: String },
    #[error("missing mandatory argument: {label}")]
    Missing { label: String },
}

/// Parse a declared argument spec string into a typed schema.
///
/// An empty (or all-whitespace) string yields an empty schema.
pub fn parse_arg_schema(spec: &str) -> Result<ArgSchema, SchemaError> {
    let mut schema = ArgSchema::new();
    if spec.trim().is_empty() {
        return Ok(schema);
    }

    for entry in spec.split(',') {
        let entry = entry.trim();
        let (decl, default) = match entry.split_once('=') {
            Some((decl, default)) => (decl, Some(default.trim().to_string())),
            None => (entry, None),
        };
        let Some((label, keyword)) = decl.split_once(':') else {
            return Err(SchemaError::Syntax {
                entry: entry.to_string(),
            });
        };

        let label = label.trim();
        let mut keyword = keyword.trim();
        let optional = keyword.ends_with('?');
        if optional {
            keyword = keyword[..keyword.len() - 1].trim_end();
        }
        if label.is_empty() || keyword.is_empty() {
            return Err(SchemaError::Syntax {
                entry: entry.to_string(),
            });
        }

        let Some(arg_type) = ArgType::from_keyword(keyword) else {
            return Err(SchemaError::UnknownType {
                label: label.to_string(),
                keyword: keyword.to_string(),
            });
        };
        if default.is_some() && !optional {
            return Err(SchemaError::DefaultOnMandatory {
                label: label.to_string(),
            });
        }
        if schema.contains_key(label) {
            return Err(SchemaError::DuplicateLabel {
                label: label.to_string(),
            });
        }

        schema.insert(
            label.to_string(),
            ArgSpec {
                name: label.to_string(),
                arg_type,
                optional,
                default,
            },
        );
    }

    Ok(schema)
}

/// Emit a schema back into its canonical spec string.
pub fn format_schema(schema: &ArgSchema) -> String {
    let mut entries = Vec::with_capacity(schema.len());
    for spec in schema.values() {
        let mut entry = format!("{}:{}", spec.name, spec.arg_type.keyword());
        if spec.optional {
            entry.push('?');
        }
        if let Some(ref default) = spec.default {
            entry.push('=');
            entry.push_str(default);
        }
        entries.push(entry);
    }
    entries.join(", ")
}

/// Validate call-site bindings and flush them into the argument buffer.
///
/// Each binding must be `label=value` with a declared label and a value that
/// lexically matches the declared type. The buffer holds one `label=value`
/// line per schema entry: the bound value, else a non-empty default, else
/// the type zero. An unbound mandatory argument fails.
///
/// Binding is a pure function of (schema, args) — nothing is stored on the
/// schema, so a command can be invoked again immediately.
pub fn bind_args(schema: &ArgSchema, args: &[String]) -> Result<String, BindError> {
    let mut bound: IndexMap<&str, &str> = IndexMap::new();
    let mut seen: HashSet<&str> = HashSet::new();

    for arg in args {
        let Some((label, value)) = arg.split_once('=') else {
            return Err(BindError::Malformed { arg: arg.clone() });
        };
        let Some(spec) = schema.get(label) else {
            return Err(BindError::UnknownLabel {
                label: label.to_string(),
            });
        };
        if !spec.arg_type.accepts(value) {
            return Err(BindError::TypeMismatch {
                label: label.to_string(),
                value: value.to_string(),
                expected: spec.arg_type.keyword(),
            });
        }
        if !seen.insert(label) {
            return Err(BindError::DuplicateBinding {
                label: label.to_string(),
            });
        }
        bound.insert(label, value);
    }

    let mut buffer = String::new();
    for (label, spec) in schema {
        let value = match bound.get(label.as_str()) {
            Some(value) => *value,
            None if !spec.optional => {
                return Err(BindError::Missing {
                    label: label.clone(),
                })
            }
            None => match spec.default {
                Some(ref default) if !default.is_empty() => default.as_str(),
                _ => spec.arg_type.zero(),
            },
        };
        buffer.push_str(label);
        buffer.push('=');
        buffer.push_str(value);
        buffer.push('\n');
    }

    Ok(buffer)
}

#[cfg(test)]
#[path = "schema_tests.rs"]
mod tests;
