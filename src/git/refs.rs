//! Branch references and remote hash resolution

use super::common::git;
use crate::config::WorkflowConfig;
use crate::constants::git::REMOTE;
use crate::errors::{Result, WorkflowError};
use crate::runner::CommandExecutor;

/// A published branch, optionally resolved to the commit the remote holds
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BranchRef {
    pub name: String,
    pub commit_hash: Option<String>,
}

impl BranchRef {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            commit_hash: None,
        }
    }

    pub fn with_hash(mut self, hash: impl Into<String>) -> Self {
        self.commit_hash = Some(hash.into());
        self
    }
}

/// Find the hash of `branch` in `git ls-remote` output
///
/// An exact `refs/heads/<branch>` line wins. Otherwise the first line whose
/// text contains the branch name is used, so `feature` may match
/// `refs/heads/feature-old` when no exact ref exists.
pub fn find_ref_hash(listing: &str, branch: &str) -> Option<String> {
    let exact = format!("refs/heads/{branch}");
    let mut first_match = None;

    for line in listing.lines() {
        let mut tokens = line.split_whitespace();
        let Some(hash) = tokens.next() else {
            continue;
        };
        if tokens.next() == Some(exact.as_str()) {
            return Some(hash.to_string());
        }
        if first_match.is_none() && line.contains(branch) {
            first_match = Some(hash.to_string());
        }
    }

    first_match
}

/// Resolve the commit the remote holds for `branch`
///
/// # Errors
/// [`WorkflowError::RefNotFound`] when no listed ref matches; a failing
/// `git ls-remote` propagates unchanged.
pub async fn resolve_branch_ref(
    config: &WorkflowConfig,
    runner: &dyn CommandExecutor,
    branch: &BranchRef,
) -> Result<BranchRef> {
    let listing = runner.execute(git(config, ["ls-remote", "-q", REMOTE])).await?;

    match find_ref_hash(&listing.stdout, &branch.name) {
        Some(hash) => Ok(branch.clone().with_hash(hash)),
        None => Err(WorkflowError::RefNotFound {
            branch: branch.name.clone(),
        }),
    }
}
