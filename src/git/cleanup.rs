//! Removal of the published branch once it is no longer needed

use super::common::{Logger, git};
use super::refs::BranchRef;
use crate::config::WorkflowConfig;
use crate::constants::git::{REMOTE, THROWAWAY_BRANCH_PREFIX, UUID_LENGTH};
use crate::errors::Result;
use crate::runner::CommandExecutor;
use uuid::Uuid;

/// Name for the disposable branch checked out while deleting
pub fn throwaway_branch_name() -> String {
    format!(
        "{}-{}",
        THROWAWAY_BRANCH_PREFIX,
        &Uuid::new_v4().simple().to_string()[..UUID_LENGTH]
    )
}

/// Delete `branch` locally and on the remote
///
/// A disposable branch is checked out first so the target is not the
/// current branch. Every step must succeed; a half-finished cleanup leaves
/// branches behind for someone to remove by hand.
pub async fn delete_branch(
    config: &WorkflowConfig,
    runner: &dyn CommandExecutor,
    branch: &BranchRef,
) -> Result<()> {
    let logger = Logger::new("cleanup");
    let throwaway = throwaway_branch_name();

    runner
        .execute(git(config, ["checkout", "-b", throwaway.as_str()]))
        .await?;
    runner
        .execute(git(config, ["branch", "-d", branch.name.as_str()]))
        .await?;
    runner
        .execute(git(config, ["push", REMOTE, "--delete", branch.name.as_str()]))
        .await?;

    logger.success(&format!("Deleted branch {}", branch.name));
    Ok(())
}
