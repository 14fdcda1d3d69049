//! Error types for the mediamill-core library.

use std::process::ExitStatus;
use thiserror::Error;

/// Custom error types for mediamill
#[derive(Error, Debug)]
pub enum CoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("engine initialization failed: {0}")]
    EngineInit(String),

    #[error("engine unavailable: {0}")]
    EngineUnavailable(String),

    #[error("required dependency not found: {0}")]
    DependencyNotFound(String),

    #[error("failed to start {tool}: {message}")]
    CommandStart { tool: String, message: String },

    #[error("error waiting for {tool}: {message}")]
    CommandWait { tool: String, message: String },

    #[error("{tool} failed ({status}): {stderr}")]
    CommandFailed {
        tool: String,
        status: ExitStatus,
        stderr: String,
    },

    #[error("invalid request: {0}")]
    InvalidRequest(String),

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("probe failed: {0}")]
    ProbeFailed(String),

    #[error("engine produced no output: {0}")]
    OutputMissing(String),
}

/// Result type for mediamill operations
pub type CoreResult<T> = std::result::Result<T, CoreError>;

/// Builds a `CommandStart` error for a tool that could not be launched.
pub fn command_start_error(tool: &str, message: impl std::fmt::Display) -> CoreError {
    CoreError::CommandStart {
        tool: tool.to_string(),
        message: message.to_string(),
    }
}

/// Builds a `CommandWait` error for a tool whose exit could not be collected.
pub fn command_wait_error(tool: &str, message: impl std::fmt::Display) -> CoreError {
    CoreError::CommandWait {
        tool: tool.to_string(),
        message: message.to_string(),
    }
}

/// Builds a `CommandFailed` error carrying the tool's diagnostic output.
pub fn command_failed_error(
    tool: &str,
    status: ExitStatus,
    stderr: impl Into<String>,
) -> CoreError {
    CoreError::CommandFailed {
        tool: tool.to_string(),
        status,
        stderr: stderr.into(),
    }
}
