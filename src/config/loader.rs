//! Environment-derived workflow configuration
//!
//! Settings are read once at startup into an immutable [`WorkflowConfig`]
//! which is then passed by reference to every stage.

use super::validation::{self, ConfigError};
use crate::constants::{checks, env, runner};
use crate::git::Logger;
use checkpush_github::DEFAULT_API_BASE;
use serde::{Serialize, Serializer};
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

/// A normalized environment value
#[derive(Debug, Clone, PartialEq)]
pub enum EnvValue {
    Bool(bool),
    Text(String),
}

/// Normalize a raw environment value
///
/// `"True"`/`"true"` and `"False"`/`"false"` become booleans, empty values
/// are treated as unset and everything else passes through as text.
pub fn normalize_env_value(raw: Option<String>) -> Option<EnvValue> {
    match raw.as_deref() {
        None | Some("") => None,
        Some("True") | Some("true") => Some(EnvValue::Bool(true)),
        Some("False") | Some("false") => Some(EnvValue::Bool(false)),
        Some(_) => raw.map(EnvValue::Text),
    }
}

/// When the published branch is deleted once checks have been awaited
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum CleanupPolicy {
    /// Delete only after checks were verified and succeeded
    #[default]
    OnSuccess,
    /// Delete whenever deletion is requested, even if checks failed or were skipped
    Always,
}

impl FromStr for CleanupPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "on-success" | "on_success" | "delete_on_success_only" => Ok(CleanupPolicy::OnSuccess),
            "always" | "delete_always" => Ok(CleanupPolicy::Always),
            other => Err(format!(
                "unknown cleanup policy '{}', expected 'on-success' or 'always'",
                other
            )),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct WorkflowConfig {
    #[serde(serialize_with = "redact")]
    pub github_token: Option<String>,
    pub dest_branch: Option<String>,
    pub verify_checks: bool,
    pub commit_message: Option<String>,
    pub delete_after_checks: bool,
    pub cleanup_policy: CleanupPolicy,
    pub files: Vec<String>,
    pub repository: Option<String>,
    pub head_ref: Option<String>,
    pub actor: String,
    pub api_base: String,
    pub home_dir: PathBuf,
    pub workdir: Option<PathBuf>,
    pub poll_interval_secs: u64,
    pub max_wait_secs: u64,
    pub command_timeout_secs: u64,
}

fn redact<S: Serializer>(token: &Option<String>, serializer: S) -> Result<S::Ok, S::Error> {
    match token {
        Some(_) => serializer.serialize_str("***"),
        None => serializer.serialize_none(),
    }
}

impl WorkflowConfig {
    /// Load configuration from the process environment
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let reader = EnvReader { lookup };

        let actor = reader
            .text(env::ACTOR)?
            .ok_or_else(|| ConfigError::Missing {
                key: env::ACTOR.to_string(),
            })?;
        let home_dir = reader
            .text(env::HOME)?
            .map(PathBuf::from)
            .ok_or_else(|| ConfigError::Missing {
                key: env::HOME.to_string(),
            })?;

        let cleanup_policy = match reader.text(env::DELETE_POLICY)? {
            Some(raw) => raw
                .parse()
                .map_err(|reason: String| ConfigError::invalid(env::DELETE_POLICY, &raw, &reason))?,
            None => CleanupPolicy::default(),
        };

        let files = match reader.text(env::FILES)? {
            Some(raw) => shlex::split(&raw).ok_or_else(|| {
                ConfigError::invalid(env::FILES, &raw, "unbalanced quotes in file list")
            })?,
            None => Vec::new(),
        };

        let config = Self {
            github_token: reader.text(env::GITHUB_TOKEN)?,
            dest_branch: reader.text(env::DEST_BRANCH)?,
            verify_checks: reader.flag(env::VERIFY_CHECKS)?,
            commit_message: reader.text(env::COMMIT_MESSAGE)?,
            delete_after_checks: reader.flag(env::DELETE_AFTER_CHECKS)?,
            cleanup_policy,
            files,
            repository: reader.text(env::REPOSITORY)?,
            head_ref: reader.text(env::HEAD_REF)?,
            actor,
            api_base: reader
                .text(env::API_URL)?
                .unwrap_or_else(|| DEFAULT_API_BASE.to_string()),
            home_dir,
            workdir: None,
            poll_interval_secs: reader
                .seconds(env::POLL_INTERVAL)?
                .unwrap_or(checks::DEFAULT_POLL_INTERVAL_SECS),
            max_wait_secs: reader
                .seconds(env::MAX_WAIT)?
                .unwrap_or(checks::DEFAULT_MAX_WAIT_SECS),
            command_timeout_secs: reader
                .seconds(env::COMMAND_TIMEOUT)?
                .unwrap_or(runner::DEFAULT_COMMAND_TIMEOUT_SECS),
        };

        config.validate()?;
        Ok(config)
    }

    /// Validate cross-field rules
    pub fn validate(&self) -> Result<(), ConfigError> {
        validation::validate_branch_name(env::DEST_BRANCH, &self.dest_branch)?;
        validation::validate_commit_message(env::COMMIT_MESSAGE, &self.commit_message)?;

        match &self.repository {
            Some(repository) => validation::validate_repository(env::REPOSITORY, repository)?,
            None if self.verify_checks => {
                return Err(ConfigError::Missing {
                    key: env::REPOSITORY.to_string(),
                });
            }
            None => {}
        }

        Ok(())
    }

    /// Run every command from this directory instead of the process cwd
    pub fn with_workdir(mut self, workdir: impl Into<PathBuf>) -> Self {
        self.workdir = Some(workdir.into());
        self
    }

    pub fn workdir(&self) -> Option<&Path> {
        self.workdir.as_deref()
    }

    pub fn netrc_path(&self) -> PathBuf {
        self.home_dir.join(crate::constants::git::NETRC_FILE)
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval_secs)
    }

    pub fn max_wait(&self) -> Duration {
        Duration::from_secs(self.max_wait_secs)
    }
}

struct EnvReader<F> {
    lookup: F,
}

impl<F: Fn(&str) -> Option<String>> EnvReader<F> {
    fn value(&self, key: &str) -> Option<EnvValue> {
        normalize_env_value((self.lookup)(key))
    }

    /// A text setting. A boolean-looking value is kept verbatim.
    fn text(&self, key: &str) -> Result<Option<String>, ConfigError> {
        Ok(match self.value(key) {
            Some(EnvValue::Text(text)) => Some(text),
            Some(EnvValue::Bool(_)) => (self.lookup)(key),
            None => None,
        })
    }

    /// A boolean setting. Any other non-empty text counts as set.
    fn flag(&self, key: &str) -> Result<bool, ConfigError> {
        match self.value(key) {
            Some(EnvValue::Bool(b)) => Ok(b),
            Some(EnvValue::Text(text)) => {
                Logger::new("config").warn(&format!(
                    "{key}='{text}' is not true/false, treating it as enabled"
                ));
                Ok(true)
            }
            None => Ok(false),
        }
    }

    fn seconds(&self, key: &str) -> Result<Option<u64>, ConfigError> {
        let Some(raw) = self.text(key)? else {
            return Ok(None);
        };
        match raw.trim().parse::<u64>() {
            Ok(secs) if secs > 0 => Ok(Some(secs)),
            _ => Err(ConfigError::invalid(
                key,
                &raw,
                "expected a positive number of seconds",
            )),
        }
    }
}
