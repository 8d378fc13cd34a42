//! Error types for agentsync.
//!
//! Library crates use [`AgentSyncError`] via `thiserror`.
//! App crates (cli) wrap this with `color-eyre` for rich diagnostics.

use std::path::PathBuf;

/// Top-level error type for all agentsync operations.
#[derive(Debug, thiserror::Error)]
pub enum AgentSyncError {
    /// Configuration loading or validation error.
    #[error("config error: {message}")]
    Config { message: String },

    /// Transport-level HTTP error talking to the control plane.
    #[error("network error: {0}")]
    Network(String),

    /// The control plane answered with a non-success status.
    #[error("control plane error (HTTP {status}): {message}")]
    Api { status: u16, message: String },

    /// A resolution stage returned an empty result. Fatal to the pipeline.
    #[error("no {stage} found for '{input}'")]
    NotFound { stage: String, input: String },

    /// User input validation error (blank name, malformed URL, etc.).
    #[error("validation error: {message}")]
    Validation { message: String },

    /// Filesystem I/O error.
    #[error("I/O error at {path:?}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Convenience alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, AgentSyncError>;

impl AgentSyncError {
    /// Create a config error from any displayable message.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config {
            message: msg.into(),
        }
    }

    /// Create a `NotFound` for a resolution stage, naming the unresolved input.
    pub fn not_found(stage: impl Into<String>, input: impl Into<String>) -> Self {
        Self::NotFound {
            stage: stage.into(),
            input: input.into(),
        }
    }

    /// Create a validation error from any displayable message.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation {
            message: msg.into(),
        }
    }

    /// Wrap a `std::io::Error` with a path for context.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
