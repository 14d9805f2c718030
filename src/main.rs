use anyhow::Result;
use checkpush::constants::FAILURE_EXIT_DELAY_MS;
use checkpush::git::Logger;
use checkpush::{CommandRunner, Workflow, WorkflowConfig, WorkflowError};
use checkpush_github::GitHubClient;
use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

#[derive(Parser)]
#[command(name = "checkpush")]
#[command(about = "Commit and push local changes, then optionally wait for GitHub checks")]
#[command(version)]
struct Cli {
    /// Run git commands in this directory instead of the current one
    #[arg(short = 'C', long)]
    workdir: Option<PathBuf>,

    /// Don't echo captured command output
    #[arg(short, long)]
    quiet: bool,

    /// Print the resolved configuration as JSON and exit
    #[arg(long)]
    print_config: bool,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            let kind = err
                .downcast_ref::<WorkflowError>()
                .map_or("ERROR", WorkflowError::kind);
            Logger::default().error(&format!("[{kind}] {err:#}"));
            tokio::time::sleep(Duration::from_millis(FAILURE_EXIT_DELAY_MS)).await;
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<()> {
    let mut config = WorkflowConfig::from_env().map_err(WorkflowError::from)?;
    if let Some(dir) = cli.workdir {
        config = config.with_workdir(dir);
    }

    if cli.print_config {
        println!("{}", serde_json::to_string_pretty(&config)?);
        return Ok(());
    }

    // Ctrl-C kills the running git command and stops polling
    let cancel = CancellationToken::new();
    let mut runner = CommandRunner::new().with_cancellation(cancel.clone());
    if cli.quiet {
        runner = runner.quiet();
    }
    let client = GitHubClient::with_api_base(&config.api_base, config.github_token.clone());

    let on_interrupt = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            on_interrupt.cancel();
        }
    });

    Workflow::new(&config, &runner, &client, cancel).run().await?;
    Ok(())
}
