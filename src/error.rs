//! Error types for sqlc-ir.

use thiserror::Error;

/// The main error type for IR generation.
///
/// Every variant aborts the whole generation request; degraded cases
/// (unknown column types and the like) are logged instead of returned.
#[derive(Debug, Error)]
pub enum GenError {
    /// The query uses a command with no representable querier shape.
    #[error("Support for {cmd} is not implemented (query '{query}')")]
    NotImplemented { query: String, cmd: String },

    /// `query_parameter_limit` was negative.
    #[error("Invalid query parameter limit: {0} (expected 0 or a positive number)")]
    InvalidParameterLimit(i32),

    /// A command tag that classification does not know about.
    #[error("Unknown command '{cmd}' for query '{query}'")]
    UnknownCommand { query: String, cmd: String },

    /// Two declarations of the models file resolve to the same name.
    #[error("Name collision: {kind} '{name}' is generated from both {first} and {second}")]
    NameCollision {
        kind: &'static str,
        name: String,
        first: String,
        second: String,
    },

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Malformed JSON request or plugin options.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Malformed TOML configuration file.
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl GenError {
    /// Create a "not implemented" error for a query command.
    pub fn not_implemented(query: impl Into<String>, cmd: impl Into<String>) -> Self {
        Self::NotImplemented {
            query: query.into(),
            cmd: cmd.into(),
        }
    }

    /// Create an unknown command error.
    pub fn unknown_command(query: impl Into<String>, cmd: impl Into<String>) -> Self {
        Self::UnknownCommand {
            query: query.into(),
            cmd: cmd.into(),
        }
    }
}

/// Result type alias for IR generation.
pub type GenResult<T> = Result<T, GenError>;
