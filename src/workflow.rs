//! Workflow orchestration
//!
//! Runs publish, then optional check verification, then optional branch
//! cleanup. Skipped stages are not failures; any error ends the run and is
//! surfaced unchanged so the binary exits non-zero.

use crate::checks::{CheckConclusion, CheckRunSource, CheckStatusPoller};
use crate::config::{CleanupPolicy, ConfigError, WorkflowConfig};
use crate::constants::env;
use crate::errors::{Result, WorkflowError};
use crate::git::{self, BranchRef, Logger};
use crate::runner::CommandExecutor;
use tokio_util::sync::CancellationToken;

/// What a successful run did
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkflowReport {
    pub branch: BranchRef,
    pub conclusion: Option<CheckConclusion>,
    pub branch_deleted: bool,
}

impl WorkflowReport {
    pub fn summary(&self) -> String {
        let checks = match self.conclusion {
            Some(conclusion) => format!("checks {conclusion}"),
            None => "checks not verified".to_string(),
        };
        let cleanup = if self.branch_deleted {
            "branch deleted"
        } else {
            "branch kept"
        };
        format!("Published {}, {}, {}", self.branch.name, checks, cleanup)
    }
}

pub struct Workflow<'a> {
    config: &'a WorkflowConfig,
    runner: &'a dyn CommandExecutor,
    checks: &'a dyn CheckRunSource,
    cancel: CancellationToken,
    logger: Logger,
}

impl<'a> Workflow<'a> {
    pub fn new(
        config: &'a WorkflowConfig,
        runner: &'a dyn CommandExecutor,
        checks: &'a dyn CheckRunSource,
        cancel: CancellationToken,
    ) -> Self {
        Self {
            config,
            runner,
            checks,
            cancel,
            logger: Logger::new("workflow"),
        }
    }

    /// Run every configured stage in order
    ///
    /// The first failure ends the run. With [`CleanupPolicy::Always`] the
    /// branch is still deleted after failed checks, and the check failure is
    /// what gets reported.
    pub async fn run(&self) -> Result<WorkflowReport> {
        let branch = git::publish(self.config, self.runner).await?;

        if self.cancel.is_cancelled() {
            return Err(WorkflowError::Cancelled);
        }

        let verification = self.verify(&branch).await;

        let branch_deleted = if self.should_delete(&verification) {
            match (git::delete_branch(self.config, self.runner, &branch).await, &verification) {
                (Ok(()), _) => true,
                (Err(cleanup_err), Err(_)) => {
                    self.logger
                        .error(&format!("Branch cleanup also failed: {cleanup_err}"));
                    false
                }
                (Err(cleanup_err), Ok(_)) => return Err(cleanup_err),
            }
        } else {
            false
        };

        let conclusion = verification?;
        let report = WorkflowReport {
            branch,
            conclusion,
            branch_deleted,
        };
        self.logger.success(&report.summary());
        Ok(report)
    }

    async fn verify(&self, branch: &BranchRef) -> Result<Option<CheckConclusion>> {
        if !self.config.verify_checks {
            self.logger.info("Check verification not requested, skipping");
            return Ok(None);
        }

        let repository =
            self.config
                .repository
                .as_deref()
                .ok_or_else(|| ConfigError::Missing {
                    key: env::REPOSITORY.to_string(),
                })?;

        CheckStatusPoller::new(self.config, self.runner, self.checks, self.cancel.clone())
            .await_completion(branch, repository)
            .await
            .map(Some)
    }

    fn should_delete(&self, verification: &Result<Option<CheckConclusion>>) -> bool {
        if !self.config.delete_after_checks {
            return false;
        }
        if self.config.dest_branch.is_none() {
            self.logger
                .warn("No destination branch configured, refusing to delete the source branch");
            return false;
        }
        match (self.config.cleanup_policy, verification) {
            (CleanupPolicy::Always, _) => true,
            (CleanupPolicy::OnSuccess, Ok(Some(_))) => true,
            (CleanupPolicy::OnSuccess, Ok(None)) => {
                self.logger
                    .info("Checks were not verified, keeping branch (policy: on-success)");
                false
            }
            (CleanupPolicy::OnSuccess, Err(_)) => {
                self.logger
                    .warn("Checks did not pass, keeping branch for inspection");
                false
            }
        }
    }
}
