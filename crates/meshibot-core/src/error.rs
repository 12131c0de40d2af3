// SPDX-FileCopyrightText: 2026 Meshibot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for the Meshibot workspace.

use thiserror::Error;

/// The primary error type used across all Meshibot crates.
#[derive(Debug, Error)]
pub enum MeshibotError {
    /// Configuration errors (invalid TOML, missing required fields).
    #[error("configuration error: {0}")]
    Config(String),

    /// User input that fails a fixed validation rule (e.g. a budget
    /// outside the bracket table).
    #[error("validation error: {0}")]
    Validation(String),

    /// A required record is absent. Missing criteria rows are programmer
    /// errors -- the pipeline pre-creates them -- so this must fail loudly.
    #[error("{entity} not found: {key}")]
    NotFound { entity: &'static str, key: String },

    /// Storage backend errors (database connection, query failure).
    #[error("storage error: {source}")]
    Storage {
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Directory errors: network failure or an expected markup anchor
    /// missing from a fetched page. Callers degrade rather than crash.
    #[error("directory error: {message}")]
    Directory {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Notification sink errors (reply delivery failure).
    #[error("notify error: {message}")]
    Notify {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Internal or unexpected errors.
    #[error("internal error: {0}")]
    Internal(String),
}

impl MeshibotError {
    /// Shorthand for a directory error without an underlying cause.
    pub fn directory(message: impl Into<String>) -> Self {
        MeshibotError::Directory {
            message: message.into(),
            source: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_messages_render() {
        let e = MeshibotError::NotFound {
            entity: "criteria",
            key: "user-1".into(),
        };
        assert_eq!(e.to_string(), "criteria not found: user-1");

        let e = MeshibotError::directory("page anchor missing");
        assert_eq!(e.to_string(), "directory error: page anchor missing");
    }
}
