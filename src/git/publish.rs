//! Git operations that publish local changes to a branch
//!
//! ## Sequence
//!
//! 1. Configure the commit identity from the actor
//! 2. Write netrc credentials for the push
//! 3. Stage the configured files, or everything
//! 4. Commit with the configured or generated message
//! 5. Force-push to the destination branch, or push the current branch
//!
//! The first failing command aborts the sequence.

use super::common::{Logger, git};
use super::credentials::write_credentials;
use super::refs::BranchRef;
use crate::config::WorkflowConfig;
use crate::constants::git::{CREDENTIALS_HOST, DEFAULT_COMMIT_MSG, REMOTE};
use crate::errors::Result;
use crate::runner::CommandExecutor;

/// Commit message for this run
///
/// The configured message wins; otherwise the message names the ref that
/// triggered the workflow.
pub fn commit_message(config: &WorkflowConfig) -> String {
    match (&config.commit_message, &config.head_ref) {
        (Some(message), _) => message.clone(),
        (None, Some(src_ref)) => format!("Automated from {src_ref}"),
        (None, None) => DEFAULT_COMMIT_MSG.to_string(),
    }
}

/// Arguments for `git add`
pub fn add_args(files: &[String]) -> Vec<String> {
    let mut args = vec!["add".to_string()];
    if files.is_empty() {
        args.push("-A".to_string());
    } else {
        args.push("--".to_string());
        args.extend(files.iter().cloned());
    }
    args
}

/// Stage, commit and push the working tree changes
///
/// # Returns
/// The branch that was pushed, with its hash still unresolved
pub async fn publish(config: &WorkflowConfig, runner: &dyn CommandExecutor) -> Result<BranchRef> {
    let logger = Logger::new("publish");

    let email = format!("{}@noreply", config.actor);
    runner
        .execute(git(config, ["config", "user.email", email.as_str()]))
        .await?;
    runner
        .execute(git(config, ["config", "user.name", config.actor.as_str()]))
        .await?;

    match &config.github_token {
        Some(token) => {
            write_credentials(&config.netrc_path(), CREDENTIALS_HOST, &config.actor, token)?;
            logger.info(&format!("Wrote credentials to {}", config.netrc_path().display()));
        }
        None => logger.warn("No token configured, pushing with existing git credentials"),
    }

    runner.execute(git(config, add_args(&config.files))).await?;
    runner.execute(git(config, ["status"])).await?;

    let message = commit_message(config);
    runner
        .execute(git(config, ["commit", "-m", message.as_str()]))
        .await?;

    let branch = match &config.dest_branch {
        Some(dest) => {
            runner
                .execute(git(config, ["switch", "-c", dest.as_str()]))
                .await?;
            runner
                .execute(git(config, ["push", REMOTE, dest.as_str(), "-f", "-v"]))
                .await?;
            BranchRef::new(dest.as_str())
        }
        None => {
            runner
                .execute(git(config, ["config", "push.default", "current"]))
                .await?;
            runner.execute(git(config, ["push"])).await?;
            let current = runner
                .execute(git(config, ["branch", "--show-current"]))
                .await?;
            BranchRef::new(current.stdout.trim())
        }
    };

    logger.success(&format!("Pushed changes to {}", branch.name));
    Ok(branch)
}
