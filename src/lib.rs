//! Checkpush - commit, push and wait for GitHub checks from a CI job

pub mod checks;
pub mod config;
pub mod constants;
pub mod errors;
pub mod git;
pub mod runner;
pub mod utils;
pub mod workflow;

pub use errors::{Result, WorkflowError};

// Re-export commonly used types
pub use checks::{CheckRunSource, CheckStatusPoller, PollSettings};
pub use config::{CleanupPolicy, WorkflowConfig};
pub use git::BranchRef;
pub use runner::{CommandExecutor, CommandRunner, ExecutionResult, Invocation};
pub use workflow::{Workflow, WorkflowReport};
