//! Common test support utilities and fixtures
//!
//! Test doubles for the command and check-run seams, plus helpers for
//! scratch git repositories.

#![allow(dead_code)]

use async_trait::async_trait;
use checkpush::checks::{CheckRunList, CheckRunSource};
use checkpush::{CommandExecutor, ExecutionResult, Invocation, WorkflowConfig, WorkflowError};
use checkpush::config::CleanupPolicy;
use std::collections::VecDeque;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;
use std::sync::Mutex;

/// Configuration with every optional stage off
pub fn base_config(home: &Path) -> WorkflowConfig {
    WorkflowConfig {
        github_token: Some("ghp_test".to_string()),
        dest_branch: None,
        verify_checks: false,
        commit_message: None,
        delete_after_checks: false,
        cleanup_policy: CleanupPolicy::OnSuccess,
        files: Vec::new(),
        repository: Some("octo/hello".to_string()),
        head_ref: Some("feature-src".to_string()),
        actor: "octocat".to_string(),
        api_base: "http://127.0.0.1:9".to_string(),
        home_dir: home.to_path_buf(),
        workdir: None,
        poll_interval_secs: 10,
        max_wait_secs: 3_600,
        command_timeout_secs: 30,
    }
}

fn ok(stdout: &str) -> ExecutionResult {
    ExecutionResult {
        stdout: stdout.to_string(),
        stderr: String::new(),
        exit_code: 0,
        timed_out: false,
    }
}

/// Command runner that records invocations and replays scripted results
///
/// A rule matches when its tokens are a prefix of the command. Commands
/// without a matching rule succeed with empty output.
#[derive(Default)]
pub struct RecordingRunner {
    rules: Vec<(Vec<String>, ExecutionResult)>,
    calls: Mutex<Vec<Invocation>>,
}

impl RecordingRunner {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn respond(mut self, prefix: &[&str], stdout: &str) -> Self {
        self.rules
            .push((prefix.iter().map(|s| s.to_string()).collect(), ok(stdout)));
        self
    }

    pub fn fail(mut self, prefix: &[&str], exit_code: i32, stderr: &str) -> Self {
        let result = ExecutionResult {
            stdout: String::new(),
            stderr: stderr.to_string(),
            exit_code,
            timed_out: false,
        };
        self.rules
            .push((prefix.iter().map(|s| s.to_string()).collect(), result));
        self
    }

    /// Remote listing served to `git ls-remote`
    pub fn with_remote_ref(self, hash: &str, branch: &str) -> Self {
        let listing = format!("{hash}\trefs/heads/{branch}\n");
        self.respond(&["git", "ls-remote"], &listing)
    }

    pub fn invocations(&self) -> Vec<Invocation> {
        self.calls.lock().unwrap().clone()
    }

    pub fn commands(&self) -> Vec<String> {
        self.invocations().iter().map(|i| i.to_string()).collect()
    }

    pub fn ran(&self, command: &str) -> bool {
        self.commands().iter().any(|c| c == command)
    }

    pub fn ran_prefix(&self, prefix: &str) -> bool {
        self.commands().iter().any(|c| c.starts_with(prefix))
    }
}

#[async_trait]
impl CommandExecutor for RecordingRunner {
    async fn execute(&self, invocation: Invocation) -> checkpush::Result<ExecutionResult> {
        self.calls.lock().unwrap().push(invocation.clone());

        let result = self
            .rules
            .iter()
            .find(|(prefix, _)| invocation.command().starts_with(prefix))
            .map(|(_, result)| result.clone())
            .unwrap_or_else(|| ok(""));

        if invocation.raise_on_failure() && !result.success() {
            return Err(WorkflowError::CommandFailure {
                command: invocation.to_string(),
                exit_code: result.exit_code,
                stderr: result.stderr,
            });
        }
        Ok(result)
    }
}

/// Check-run source replaying canned API responses
///
/// The last response repeats once the script runs out.
pub struct ScriptedChecks {
    responses: Mutex<VecDeque<Result<CheckRunList, String>>>,
    queries: Mutex<Vec<(String, String)>>,
}

impl ScriptedChecks {
    pub fn new(bodies: &[&str]) -> Self {
        let responses = bodies
            .iter()
            .map(|body| Ok(serde_json::from_str(body).expect("invalid test JSON")))
            .collect();
        Self {
            responses: Mutex::new(responses),
            queries: Mutex::new(Vec::new()),
        }
    }

    /// A source whose every query fails
    pub fn failing(message: &str) -> Self {
        Self {
            responses: Mutex::new(VecDeque::from([Err(message.to_string())])),
            queries: Mutex::new(Vec::new()),
        }
    }

    pub fn queries(&self) -> Vec<(String, String)> {
        self.queries.lock().unwrap().clone()
    }

    pub fn query_count(&self) -> usize {
        self.queries.lock().unwrap().len()
    }
}

#[async_trait]
impl CheckRunSource for ScriptedChecks {
    async fn check_runs(&self, repository: &str, sha: &str) -> checkpush::Result<CheckRunList> {
        self.queries
            .lock()
            .unwrap()
            .push((repository.to_string(), sha.to_string()));

        let mut responses = self.responses.lock().unwrap();
        let next = if responses.len() > 1 {
            responses.pop_front()
        } else {
            responses.front().cloned()
        };
        match next {
            Some(Ok(list)) => Ok(list),
            Some(Err(message)) => Err(WorkflowError::Api(anyhow::anyhow!(message))),
            None => Ok(CheckRunList::default()),
        }
    }
}

pub const QUEUED: &str = r#"{"check_runs":[{"status":"queued","conclusion":null}]}"#;
pub const IN_PROGRESS: &str = r#"{"check_runs":[{"status":"in_progress","conclusion":null}]}"#;
pub const SUCCESS: &str = r#"{"check_runs":[{"status":"completed","conclusion":"success"}]}"#;
pub const FAILURE: &str = r#"{"check_runs":[{"status":"completed","conclusion":"failure"}]}"#;
pub const EMPTY: &str = r#"{"total_count":0,"check_runs":[]}"#;

fn git(dir: &Path, args: &[&str]) {
    let output = Command::new("git")
        .args(args)
        .current_dir(dir)
        .output()
        .expect("Failed to run git");
    if !output.status.success() {
        panic!(
            "git {:?} failed: {}",
            args,
            String::from_utf8_lossy(&output.stderr)
        );
    }
}

pub fn git_output(dir: &Path, args: &[&str]) -> String {
    let output = Command::new("git")
        .args(args)
        .current_dir(dir)
        .output()
        .expect("Failed to run git");
    String::from_utf8_lossy(&output.stdout).trim().to_string()
}

/// Create a working repository on branch `work` with a bare `origin` next to it
///
/// Returns `(working_dir, remote_dir)`
pub fn init_repo_with_remote(root: &Path) -> (PathBuf, PathBuf) {
    let remote = root.join("remote.git");
    let work = root.join("work");
    fs::create_dir_all(&remote).unwrap();
    fs::create_dir_all(&work).unwrap();

    git(&remote, &["init", "--bare", "-q"]);
    git(&work, &["init", "-q"]);
    git(&work, &["checkout", "-q", "-b", "work"]);
    git(&work, &["config", "user.name", "Test User"]);
    git(&work, &["config", "user.email", "test@example.com"]);
    git(&work, &["config", "commit.gpgsign", "false"]);
    fs::write(work.join("README.md"), "# Test Repository\n").unwrap();
    git(&work, &["add", "."]);
    git(&work, &["commit", "-q", "-m", "Initial commit"]);
    git(
        &work,
        &["remote", "add", "origin", remote.to_str().expect("Remote path not UTF-8")],
    );
    git(&work, &["push", "-q", "origin", "work"]);

    (work, remote)
}
