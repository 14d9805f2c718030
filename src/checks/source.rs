//! Where check runs come from

use crate::errors::{Result, WorkflowError};
use async_trait::async_trait;
use checkpush_github::{CheckRunList, GitHubClient};

/// Fetches the check runs registered for a commit
///
/// Every call is a fresh query; implementations must not cache.
#[async_trait]
pub trait CheckRunSource: Send + Sync {
    async fn check_runs(&self, repository: &str, sha: &str) -> Result<CheckRunList>;
}

#[async_trait]
impl CheckRunSource for GitHubClient {
    async fn check_runs(&self, repository: &str, sha: &str) -> Result<CheckRunList> {
        self.list_check_runs(repository, sha)
            .await
            .map_err(WorkflowError::Api)
    }
}
