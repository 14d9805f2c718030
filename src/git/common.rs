//! Common git utilities and shared helpers
//!
//! Logging shared by the command runner and every workflow stage, and the
//! builder for git invocations.

use crate::config::WorkflowConfig;
use crate::constants::runner::BANNER_EDGE;
use crate::runner::Invocation;
use colored::*;

/// Build a `git` invocation bound to the configured working directory and timeout
pub fn git<I, S>(config: &WorkflowConfig, args: I) -> Invocation
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let command = std::iter::once("git".to_string()).chain(args.into_iter().map(Into::into));
    Invocation::new(command)
        .in_dir(config.workdir())
        .timeout_secs(config.command_timeout_secs)
}

/// Logger for workflow stages with consistent formatting
///
/// Each line is prefixed with the stage label in cyan/bold so the
/// interleaved output of git commands stays attributable in a CI log.
///
/// ## Example
///
/// ```rust
/// use checkpush::git::Logger;
///
/// let logger = Logger::new("publish");
/// logger.info("Staging files");
/// logger.success("Pushed ci/verify");
/// ```
#[derive(Debug, Clone, Copy)]
pub struct Logger {
    label: &'static str,
}

impl Default for Logger {
    fn default() -> Self {
        Self::new("checkpush")
    }
}

impl Logger {
    pub fn new(label: &'static str) -> Self {
        Self { label }
    }

    pub fn label(&self) -> &'static str {
        self.label
    }

    pub fn info(&self, msg: &str) {
        println!("{} | {}", self.label.cyan().bold(), msg);
    }

    pub fn success(&self, msg: &str) {
        println!("{} | {}", self.label.cyan().bold(), msg.green());
    }

    pub fn warn(&self, msg: &str) {
        println!("{} | {}", self.label.cyan().bold(), msg.yellow());
    }

    pub fn error(&self, msg: &str) {
        eprintln!("{} | {}", self.label.cyan().bold(), msg.red());
    }

    /// Print a captured output block under a `***** title *****` banner
    pub fn block(&self, title: &str, body: &str) {
        println!("{} {} {}", BANNER_EDGE, title, BANNER_EDGE);
        println!("{}", body.trim_end());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_logger_label() {
        assert_eq!(Logger::default().label(), "checkpush");
        assert_eq!(Logger::new("checks").label(), "checks");
    }
}
