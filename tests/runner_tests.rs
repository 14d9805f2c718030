// Integration tests for CommandRunner against real processes
// Tests cover output capture, failure classification and timeout handling

use checkpush::{CommandExecutor, CommandRunner, Invocation, WorkflowError};
use std::time::{Duration, Instant};
use tempfile::TempDir;
use tokio_util::sync::CancellationToken;

fn sh(script: &str) -> Invocation {
    Invocation::new(["sh", "-c", script])
}

#[tokio::test]
async fn test_successful_command_captures_stdout() {
    let runner = CommandRunner::new();
    let result = runner
        .execute(Invocation::new(["echo", "hello world"]))
        .await
        .unwrap();

    assert_eq!(result.stdout, "hello world\n");
    assert!(result.stderr.is_empty());
    assert_eq!(result.exit_code, 0);
    assert!(!result.timed_out);
    assert!(result.success());
}

#[tokio::test]
async fn test_exit_zero_never_raises() {
    let runner = CommandRunner::new().quiet();
    for invocation in [sh("echo warn >&2; exit 0"), sh("exit 0").allow_failure()] {
        let result = runner.execute(invocation).await.unwrap();
        assert_eq!(result.exit_code, 0);
    }
}

#[tokio::test]
async fn test_stderr_captured_separately() {
    let runner = CommandRunner::new();
    let result = runner
        .execute(sh("echo out; echo err >&2"))
        .await
        .unwrap();

    assert_eq!(result.stdout, "out\n");
    assert_eq!(result.stderr, "err\n");
}

#[tokio::test]
async fn test_non_zero_exit_raises_command_failure_with_stderr() {
    let runner = CommandRunner::new();
    let err = runner
        .execute(sh("echo 'fatal: not a git repository' >&2; exit 3"))
        .await
        .unwrap_err();

    match err {
        WorkflowError::CommandFailure {
            exit_code, stderr, ..
        } => {
            assert_eq!(exit_code, 3);
            assert!(stderr.contains("fatal: not a git repository"));
        }
        other => panic!("expected CommandFailure, got {other:?}"),
    }
}

#[tokio::test]
async fn test_non_zero_exit_returned_when_failure_allowed() {
    let runner = CommandRunner::new();
    let result = runner
        .execute(sh("echo partial; exit 7").allow_failure())
        .await
        .unwrap();

    assert_eq!(result.exit_code, 7);
    assert_eq!(result.stdout, "partial\n");
    assert!(!result.success());
}

#[tokio::test]
async fn test_timeout_kills_process_within_bounded_time() {
    let runner = CommandRunner::new();
    let started = Instant::now();
    let result = runner
        .execute(
            Invocation::new(["sleep", "30"])
                .timeout_secs(1)
                .allow_failure(),
        )
        .await
        .unwrap();

    assert!(result.timed_out);
    assert_ne!(result.exit_code, 0);
    assert!(!result.success());
    assert!(started.elapsed() < Duration::from_secs(10));
}

#[tokio::test]
async fn test_timeout_raises_when_failure_not_allowed() {
    let runner = CommandRunner::new().quiet();
    let err = runner
        .execute(Invocation::new(["sleep", "30"]).timeout_secs(1))
        .await
        .unwrap_err();

    match err {
        WorkflowError::Timeout { timeout_secs, .. } => assert_eq!(timeout_secs, 1),
        other => panic!("expected Timeout, got {other:?}"),
    }
}

#[tokio::test]
async fn test_output_written_before_timeout_is_kept() {
    let runner = CommandRunner::new().quiet();
    let result = runner
        .execute(
            sh("echo started; echo oops >&2; sleep 30")
                .timeout_secs(1)
                .allow_failure(),
        )
        .await
        .unwrap();

    assert!(result.timed_out);
    assert_eq!(result.stdout, "started\n");
    assert_eq!(result.stderr, "oops\n");
}

#[tokio::test]
async fn test_timeout_error_carries_captured_output() {
    let runner = CommandRunner::new().quiet();
    let err = runner
        .execute(sh("echo started; echo oops >&2; sleep 30").timeout_secs(1))
        .await
        .unwrap_err();

    match err {
        WorkflowError::Timeout { stdout, stderr, .. } => {
            assert_eq!(stdout, "started\n");
            assert_eq!(stderr, "oops\n");
        }
        other => panic!("expected Timeout, got {other:?}"),
    }
}

#[tokio::test]
async fn test_cancellation_kills_running_command() {
    let cancel = CancellationToken::new();
    let runner = CommandRunner::new().quiet().with_cancellation(cancel.clone());

    let trigger = cancel.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(200)).await;
        trigger.cancel();
    });

    let started = Instant::now();
    let err = runner
        .execute(Invocation::new(["sleep", "30"]).timeout_secs(30))
        .await
        .unwrap_err();

    assert!(matches!(err, WorkflowError::Cancelled));
    assert!(started.elapsed() < Duration::from_secs(10));
}

#[tokio::test]
async fn test_cancelled_runner_does_not_wait_for_command() {
    let cancel = CancellationToken::new();
    cancel.cancel();
    let runner = CommandRunner::new().quiet().with_cancellation(cancel);

    let err = runner
        .execute(Invocation::new(["sleep", "30"]).allow_failure())
        .await
        .unwrap_err();

    assert_eq!(err.kind(), "CANCELLED");
}

#[tokio::test]
async fn test_working_directory_is_used() {
    let temp_dir = TempDir::new().unwrap();
    std::fs::write(temp_dir.path().join("marker.txt"), "x").unwrap();

    let runner = CommandRunner::new();
    let result = runner
        .execute(Invocation::new(["ls"]).in_dir(Some(temp_dir.path())))
        .await
        .unwrap();

    assert!(result.stdout.contains("marker.txt"));
}

#[tokio::test]
async fn test_missing_program_is_spawn_error() {
    let runner = CommandRunner::new();
    let err = runner
        .execute(Invocation::new(["definitely-not-a-real-binary-xyz"]))
        .await
        .unwrap_err();

    assert!(matches!(err, WorkflowError::Spawn { .. }));
    assert_eq!(err.kind(), "SPAWN");
}

#[tokio::test]
async fn test_each_invocation_gets_its_own_budget() {
    let runner = CommandRunner::new();
    for _ in 0..2 {
        let result = runner
            .execute(Invocation::new(["sleep", "1"]).timeout_secs(3))
            .await
            .unwrap();
        assert!(!result.timed_out);
    }
}
