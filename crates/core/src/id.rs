// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Random opaque tokens for process-table entries

/// Length of the random token.
const TOKEN_LEN: usize = 12;

/// Opaque id for one tracked subprocess.
///
/// Used instead of the OS pid when the handle is unavailable (detached
/// mode), and as the process table key in general.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ProcessId(String);

impl ProcessId {
    /// Generate a new random id
    pub fn new() -> Self {
        Self(nanoid::nanoid!(TOKEN_LEN))
    }

    /// Wrap an existing string (for tests and lookups)
    pub fn from_string(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for ProcessId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for ProcessId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::borrow::Borrow<str> for ProcessId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
#[path = "id_tests.rs"]
mod tests;
