//! Configuration validation utilities
//!
//! Checks applied to environment-derived settings before the workflow
//! touches the working tree.

use checkpush_github::split_repository;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    /// A required environment variable is unset or empty
    #[error("Missing required environment variable {key}")]
    Missing { key: String },

    /// A variable is set to something the workflow cannot use
    #[error("Invalid value '{value}' for {key}: {reason}")]
    InvalidValue {
        key: String,
        value: String,
        reason: String,
    },
}

impl ConfigError {
    pub(crate) fn invalid(key: &str, value: &str, reason: &str) -> Self {
        ConfigError::InvalidValue {
            key: key.to_string(),
            value: value.to_string(),
            reason: reason.to_string(),
        }
    }
}

/// Validate a git branch name
///
/// Rejects names git would refuse, or that would be parsed as an option
pub fn validate_branch_name(key: &str, branch: &Option<String>) -> Result<(), ConfigError> {
    if let Some(name) = branch {
        if name.trim().is_empty() {
            return Err(ConfigError::invalid(
                key,
                name,
                "branch name cannot be empty or whitespace only",
            ));
        }

        if name.starts_with('-')
            || name.ends_with('.')
            || name.ends_with('/')
            || name.contains("..")
            || name.chars().any(|c| c.is_whitespace() || c.is_control())
        {
            return Err(ConfigError::invalid(key, name, "invalid Git branch name format"));
        }
    }
    Ok(())
}

/// Validate commit message
///
/// Ensures commit messages are not whitespace only when provided
pub fn validate_commit_message(key: &str, message: &Option<String>) -> Result<(), ConfigError> {
    if let Some(msg) = message
        && msg.trim().is_empty()
    {
        return Err(ConfigError::invalid(
            key,
            msg,
            "commit message cannot be whitespace only",
        ));
    }
    Ok(())
}

/// Validate an `owner/repo` slug
pub fn validate_repository(key: &str, repository: &str) -> Result<(), ConfigError> {
    split_repository(repository)
        .map(|_| ())
        .map_err(|_| ConfigError::invalid(key, repository, "expected owner/repo"))
}
