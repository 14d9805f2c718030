//! Error types for the checkpush workflow
//!
//! Every failure aborts the remaining sequence, so variants carry enough
//! context to be read directly in a CI log.

use crate::config::ConfigError;
use std::time::Duration;
use thiserror::Error;

/// Result type alias for workflow operations
pub type Result<T> = std::result::Result<T, WorkflowError>;

#[derive(Debug, Error)]
pub enum WorkflowError {
    /// External command exited non-zero
    #[error("`{command}` failed with exit code {exit_code}: {stderr}")]
    CommandFailure {
        command: String,
        exit_code: i32,
        stderr: String,
    },

    /// External command exceeded its execution budget and was killed
    #[error("`{command}` timed out after {timeout_secs}s: {stderr}")]
    Timeout {
        command: String,
        timeout_secs: u64,
        stdout: String,
        stderr: String,
    },

    /// The process could not be started at all
    #[error("Failed to start `{command}`: {source}")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },

    /// The pushed branch is missing from the remote ref listing
    #[error("No remote ref found for branch '{branch}'")]
    RefNotFound { branch: String },

    /// The latest check run completed with a conclusion other than success
    #[error("{repository} commit {sha} github checks failed with conclusion {conclusion}")]
    ChecksFailed {
        repository: String,
        branch: String,
        sha: String,
        conclusion: String,
    },

    /// Checks were still running when the polling budget ran out
    #[error("{repository} commit {sha} checks still '{last_status}' after {waited:?}")]
    PollDeadlineExceeded {
        repository: String,
        sha: String,
        last_status: String,
        waited: Duration,
    },

    /// The run was interrupted, either during a command or between polls
    #[error("Run cancelled")]
    Cancelled,

    /// The check-runs API call failed
    #[error("Check-runs request failed: {0:#}")]
    Api(anyhow::Error),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl WorkflowError {
    /// Short machine-readable kind, used in the final log line
    pub fn kind(&self) -> &'static str {
        match self {
            WorkflowError::CommandFailure { .. } => "COMMAND_FAILURE",
            WorkflowError::Timeout { .. } => "TIMEOUT",
            WorkflowError::Spawn { .. } => "SPAWN",
            WorkflowError::RefNotFound { .. } => "REF_NOT_FOUND",
            WorkflowError::ChecksFailed { .. } => "CHECKS_FAILED",
            WorkflowError::PollDeadlineExceeded { .. } => "POLL_DEADLINE_EXCEEDED",
            WorkflowError::Cancelled => "CANCELLED",
            WorkflowError::Api(_) => "API",
            WorkflowError::Config(_) => "CONFIG",
            WorkflowError::Io(_) => "IO",
        }
    }
}
