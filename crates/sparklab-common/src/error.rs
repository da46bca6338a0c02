//! Unified error types for the sparklab workspace.
//!
//! Parsing and validation errors are raised before any artifact is written,
//! so callers can rely on "error means nothing on disk changed" for every
//! variant except [`SparkLabError::Io`] and [`SparkLabError::Runtime`].

use std::path::PathBuf;

use thiserror::Error;

/// Top-level error type shared across the workspace.
#[derive(Debug, Error)]
pub enum SparkLabError {
    /// An I/O operation failed.
    #[error("I/O error at {}: {source}", path.display())]
    Io {
        /// Path where the I/O error occurred.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// The configuration document is not valid YAML or has mistyped values.
    #[error("malformed configuration in {}: {source}", path.display())]
    Parse {
        /// Path of the offending document.
        path: PathBuf,
        /// Underlying YAML error.
        source: serde_yaml::Error,
    },

    /// YAML text that did not come from a file failed to parse or serialize.
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// A required section or field is absent.
    #[error("missing required {what} (`{path}`)")]
    MissingField {
        /// Dotted path of the field in the configuration document.
        path: &'static str,
        /// Human-readable name of the field.
        what: &'static str,
    },

    /// A field is present but its value is not acceptable.
    #[error("invalid {what} (`{path}`): {message}")]
    InvalidField {
        /// Dotted path of the field in the configuration document.
        path: &'static str,
        /// Human-readable name of the field.
        what: &'static str,
        /// Why the value was rejected.
        message: String,
    },

    /// A required resource was not found.
    #[error("{kind} not found: {id}")]
    NotFound {
        /// Type of the missing resource.
        kind: &'static str,
        /// Identifier of the missing resource.
        id: String,
    },

    /// The external container runtime reported a failure.
    #[error("`{command}` {}", describe_exit(*code))]
    Runtime {
        /// Command line that was executed.
        command: String,
        /// Exit code, or `None` if the process was terminated by a signal.
        code: Option<i32>,
    },

    /// JSON serialization failed.
    #[error("serialization error: {source}")]
    Serialization {
        /// Underlying serialization error.
        #[from]
        source: serde_json::Error,
    },
}

fn describe_exit(code: Option<i32>) -> String {
    code.map_or_else(
        || "was terminated by a signal".to_string(),
        |c| format!("exited with status {c}"),
    )
}

impl SparkLabError {
    /// Builds an [`SparkLabError::Io`] for the given path.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Returns `true` for errors raised before anything was written.
    #[must_use]
    pub const fn is_input_error(&self) -> bool {
        matches!(
            self,
            Self::Parse { .. } | Self::MissingField { .. } | Self::InvalidField { .. }
        )
    }
}

/// Convenience alias used throughout the workspace.
pub type Result<T> = std::result::Result<T, SparkLabError>;
