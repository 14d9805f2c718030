//! Check-run operations

use crate::client::{GitHubClient, USER_AGENT};
use crate::util::split_repository;
use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use std::fmt;

/// Lifecycle phase of a check run
#[derive(Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum CheckStatus {
    Queued,
    InProgress,
    Completed,
    Waiting,
    Requested,
    Pending,
    #[default]
    #[serde(other)]
    Unknown,
}

impl CheckStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            CheckStatus::Queued => "queued",
            CheckStatus::InProgress => "in_progress",
            CheckStatus::Completed => "completed",
            CheckStatus::Waiting => "waiting",
            CheckStatus::Requested => "requested",
            CheckStatus::Pending => "pending",
            CheckStatus::Unknown => "unknown",
        }
    }

    pub fn is_completed(&self) -> bool {
        matches!(self, CheckStatus::Completed)
    }
}

impl fmt::Display for CheckStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Terminal outcome of a completed check run
#[derive(Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum CheckConclusion {
    Success,
    Failure,
    Neutral,
    Cancelled,
    TimedOut,
    Skipped,
    Stale,
    ActionRequired,
    StartupFailure,
    #[serde(other)]
    Other,
}

impl CheckConclusion {
    pub fn as_str(&self) -> &'static str {
        match self {
            CheckConclusion::Success => "success",
            CheckConclusion::Failure => "failure",
            CheckConclusion::Neutral => "neutral",
            CheckConclusion::Cancelled => "cancelled",
            CheckConclusion::TimedOut => "timed_out",
            CheckConclusion::Skipped => "skipped",
            CheckConclusion::Stale => "stale",
            CheckConclusion::ActionRequired => "action_required",
            CheckConclusion::StartupFailure => "startup_failure",
            CheckConclusion::Other => "other",
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, CheckConclusion::Success)
    }
}

impl fmt::Display for CheckConclusion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One verification job recorded against a commit
#[derive(Deserialize, Debug, Clone, Default)]
pub struct CheckRun {
    #[serde(default)]
    pub id: u64,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub status: CheckStatus,
    pub conclusion: Option<CheckConclusion>,
    pub started_at: Option<DateTime<Utc>>,
    pub html_url: Option<String>,
}

/// Response body of `GET /repos/{owner}/{repo}/commits/{ref}/check-runs`
#[derive(Deserialize, Debug, Clone, Default)]
pub struct CheckRunList {
    #[serde(default)]
    pub total_count: u64,
    #[serde(default)]
    pub check_runs: Vec<CheckRun>,
}

impl CheckRunList {
    /// The check run treated as the most recent one
    ///
    /// GitHub does not document an ordering for this list. The run with the
    /// newest `started_at` wins; runs without a timestamp never displace an
    /// earlier pick, so a list with no timestamps yields its first entry.
    pub fn latest(&self) -> Option<&CheckRun> {
        self.check_runs.iter().fold(None, |best, run| match best {
            Some(current) if run.started_at <= current.started_at => Some(current),
            _ => Some(run),
        })
    }
}

impl GitHubClient {
    /// List the check runs GitHub has registered for a commit
    ///
    /// # Arguments
    /// * `repository` - `owner/repo` slug
    /// * `sha` - Full commit hash
    ///
    /// # Errors
    /// Returns an error if the slug is malformed, the request fails, the API
    /// answers with a non-success status, or the body cannot be parsed
    pub async fn list_check_runs(&self, repository: &str, sha: &str) -> Result<CheckRunList> {
        let (owner, repo) = split_repository(repository)?;
        let url = format!(
            "{}/repos/{}/{}/commits/{}/check-runs",
            self.api_base, owner, repo, sha
        );

        let mut request = self
            .client
            .get(&url)
            .header("User-Agent", USER_AGENT)
            .header("Accept", "application/vnd.github+json");

        if let Some(token) = &self.token {
            request = request.header("Authorization", format!("token {}", token));
        }

        let response = request
            .send()
            .await
            .with_context(|| format!("Failed to reach {}", url))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(anyhow::anyhow!(
                "Failed to list check runs ({} {}): {}",
                status.as_u16(),
                status.canonical_reason().unwrap_or("Unknown"),
                error_text
            ));
        }

        let runs: CheckRunList = response
            .json()
            .await
            .context("Failed to parse check-runs response")?;
        Ok(runs)
    }
}
