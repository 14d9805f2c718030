//! Git operations using system git commands
//!
//! ## Sub-modules
//!
//! - [`publish`]: stage, commit and push local changes
//! - [`refs`]: branch references and remote hash resolution
//! - [`cleanup`]: delete the published branch locally and remotely
//! - [`credentials`]: netrc record for authenticated pushes
//! - [`common`]: `Logger` and the `git` invocation builder
//!
//! Every command is issued through a [`CommandExecutor`](crate::runner::CommandExecutor)
//! as a structured argument list.

pub mod cleanup;
pub mod common;
pub mod credentials;
pub mod publish;
pub mod refs;

pub use cleanup::{delete_branch, throwaway_branch_name};
pub use common::{Logger, git};
pub use credentials::write_credentials;
pub use publish::{commit_message, publish};
pub use refs::{BranchRef, find_ref_hash, resolve_branch_ref};
