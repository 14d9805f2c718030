//! GitHub check-runs API client
//!
//! Low-level access to the REST endpoints the workflow needs to verify a
//! pushed commit.
//!
//! ## Modules
//!
//! - [`client`]: Core GitHub client implementation
//! - [`check_runs`]: Check-run listing and wire types
//! - [`util`]: Repository slug parsing

mod check_runs;
mod client;
mod util;

// Re-export public API
pub use check_runs::{CheckConclusion, CheckRun, CheckRunList, CheckStatus};
pub use client::{DEFAULT_API_BASE, GitHubClient};
pub use util::split_repository;
