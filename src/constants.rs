//! Central constants for the checkpush action

/// Default values for Git operations
pub mod git {
    /// Default commit message when neither a message nor a source ref is available
    pub const DEFAULT_COMMIT_MSG: &str = "Automated changes";

    /// Prefix of the disposable branch checked out before deleting the published branch
    pub const THROWAWAY_BRANCH_PREFIX: &str = "throw-away";

    /// Length of UUID suffix used in disposable branch names
    pub const UUID_LENGTH: usize = 6;

    /// Remote that branches are published to and deleted from
    pub const REMOTE: &str = "origin";

    /// Host the netrc credentials are scoped to
    pub const CREDENTIALS_HOST: &str = "github.com";

    /// File name of the credentials record in the home directory
    pub const NETRC_FILE: &str = ".netrc";
}

/// Default values for command execution
pub mod runner {
    /// Seconds a single external command may run before it is killed
    pub const DEFAULT_COMMAND_TIMEOUT_SECS: u64 = 60;

    /// Milliseconds allowed for draining output after a killed process
    pub const DRAIN_GRACE_MS: u64 = 2_000;

    /// Banner printed around captured output blocks
    pub const BANNER_EDGE: &str = "*****";
}

/// Default values for check verification
pub mod checks {
    /// Seconds between check-run queries
    pub const DEFAULT_POLL_INTERVAL_SECS: u64 = 10;

    /// Seconds before polling gives up on a check that never completes
    pub const DEFAULT_MAX_WAIT_SECS: u64 = 3_600;
}

/// Environment variables read at startup
pub mod env {
    pub const GITHUB_TOKEN: &str = "INPUT_GITHUB-TOKEN";
    pub const DEST_BRANCH: &str = "INPUT_DEST-BRANCH";
    pub const VERIFY_CHECKS: &str = "INPUT_VERIFY-CHECKS";
    pub const COMMIT_MESSAGE: &str = "INPUT_COMMIT-MESSAGE";
    pub const DELETE_AFTER_CHECKS: &str = "INPUT_DELETE-AFTER-CHECKS";
    pub const DELETE_POLICY: &str = "INPUT_DELETE-POLICY";
    pub const FILES: &str = "INPUT_FILES";
    pub const POLL_INTERVAL: &str = "INPUT_POLL-INTERVAL";
    pub const MAX_WAIT: &str = "INPUT_MAX-WAIT";
    pub const COMMAND_TIMEOUT: &str = "INPUT_COMMAND-TIMEOUT";
    pub const REPOSITORY: &str = "GITHUB_REPOSITORY";
    pub const HEAD_REF: &str = "GITHUB_HEAD_REF";
    pub const ACTOR: &str = "GITHUB_ACTOR";
    pub const API_URL: &str = "GITHUB_API_URL";
    pub const HOME: &str = "HOME";
}

/// Delay before a top-level failure is surfaced, in milliseconds
pub const FAILURE_EXIT_DELAY_MS: u64 = 1_000;
