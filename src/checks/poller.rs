//! Check-status polling state machine
//!
//! A freshly pushed commit has no check runs for a moment, so the poller
//! waits one interval before every query:
//!
//! ```text
//! UNKNOWN -> (QUEUED | IN_PROGRESS)* -> COMPLETED
//! ```
//!
//! Reaching `completed` ends the loop and the conclusion of that same run
//! decides the outcome. The loop also ends when `max_wait` has elapsed or
//! the cancellation token fires, whichever comes first.

use super::source::CheckRunSource;
use crate::config::WorkflowConfig;
use crate::errors::{Result, WorkflowError};
use crate::git::{BranchRef, Logger, resolve_branch_ref};
use crate::runner::CommandExecutor;
use checkpush_github::{CheckConclusion, CheckRun, CheckStatus};
use std::time::Duration;
use tokio::time::{Instant, sleep};
use tokio_util::sync::CancellationToken;

/// Timing of the poll loop
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollSettings {
    pub interval: Duration,
    pub max_wait: Duration,
}

impl PollSettings {
    pub fn from_config(config: &WorkflowConfig) -> Self {
        Self {
            interval: config.poll_interval(),
            max_wait: config.max_wait(),
        }
    }
}

pub struct CheckStatusPoller<'a> {
    config: &'a WorkflowConfig,
    runner: &'a dyn CommandExecutor,
    source: &'a dyn CheckRunSource,
    settings: PollSettings,
    cancel: CancellationToken,
    logger: Logger,
}

impl<'a> CheckStatusPoller<'a> {
    pub fn new(
        config: &'a WorkflowConfig,
        runner: &'a dyn CommandExecutor,
        source: &'a dyn CheckRunSource,
        cancel: CancellationToken,
    ) -> Self {
        Self {
            config,
            runner,
            source,
            settings: PollSettings::from_config(config),
            cancel,
            logger: Logger::new("checks"),
        }
    }

    pub fn with_settings(mut self, settings: PollSettings) -> Self {
        self.settings = settings;
        self
    }

    pub fn settings(&self) -> PollSettings {
        self.settings
    }

    /// Wait until the latest check run on `branch` completes
    ///
    /// # Errors
    /// - [`WorkflowError::RefNotFound`] if the branch is missing on the remote
    /// - [`WorkflowError::ChecksFailed`] if the run concluded with anything but success
    /// - [`WorkflowError::PollDeadlineExceeded`] if `max_wait` elapsed first
    /// - [`WorkflowError::Cancelled`] if the token fired between polls
    pub async fn await_completion(
        &self,
        branch: &BranchRef,
        repository: &str,
    ) -> Result<CheckConclusion> {
        let resolved = resolve_branch_ref(self.config, self.runner, branch).await?;
        let Some(sha) = resolved.commit_hash.as_deref() else {
            return Err(WorkflowError::RefNotFound {
                branch: branch.name.clone(),
            });
        };

        let started = Instant::now();
        let mut status = CheckStatus::Unknown;

        loop {
            self.logger.info(&format!(
                "Verifying github checks against {sha}, current status: {status}"
            ));

            tokio::select! {
                biased;
                _ = self.cancel.cancelled() => return Err(WorkflowError::Cancelled),
                _ = sleep(self.settings.interval) => {}
            }
            if self.cancel.is_cancelled() {
                return Err(WorkflowError::Cancelled);
            }

            let runs = self.source.check_runs(repository, sha).await?;
            match runs.latest() {
                Some(run) if run.status.is_completed() => {
                    return self.evaluate(run, &resolved, repository, sha);
                }
                Some(run) => status = run.status,
                None => {
                    self.logger.info("No check runs registered yet");
                    status = CheckStatus::Unknown;
                }
            }

            let waited = started.elapsed();
            if waited >= self.settings.max_wait {
                self.logger.error(&format!(
                    "Gave up on {repository} commit {sha} after {}s",
                    waited.as_secs()
                ));
                return Err(WorkflowError::PollDeadlineExceeded {
                    repository: repository.to_string(),
                    sha: sha.to_string(),
                    last_status: status.to_string(),
                    waited,
                });
            }
        }
    }

    fn evaluate(
        &self,
        run: &CheckRun,
        branch: &BranchRef,
        repository: &str,
        sha: &str,
    ) -> Result<CheckConclusion> {
        match run.conclusion {
            Some(conclusion) if conclusion.is_success() => {
                self.logger
                    .success(&format!("{repository} commit {sha} github checks passed"));
                Ok(conclusion)
            }
            other => {
                let conclusion = other.map_or("none", |c| c.as_str()).to_string();
                self.logger.error(&format!(
                    "{repository} commit {sha} github checks failed with conclusion {conclusion}"
                ));
                match &run.html_url {
                    Some(url) => self.logger.error(&format!("See {url}")),
                    None => self.logger.error(&format!(
                        "Visit {} branch checks for more information",
                        branch.name
                    )),
                }
                Err(WorkflowError::ChecksFailed {
                    repository: repository.to_string(),
                    branch: branch.name.clone(),
                    sha: sha.to_string(),
                    conclusion,
                })
            }
        }
    }
}
