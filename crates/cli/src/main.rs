//! relnotes CLI entry point.
//!
//! This binary is the composition root. Responsibilities:
//!
//! 1. **Parse configuration**: flags and `ATLASSIAN_*` environment variables.
//! 2. **Wire observability**: `tracing-subscriber` on stderr, optionally
//!    exporting spans over OTLP. Every run gets a fresh [`RunId`].
//! 3. **Construct infrastructure**: a [`JiraClient`], injected into
//!    [`ReleaseNotes`] as its branch lookup.
//! 4. **Print**: the bucketed release notes first, then the branch merge
//!    list. A failed branch aggregation still leaves the notes on stdout but
//!    makes the process exit non-zero.

mod args;
mod telemetry;

use std::process::ExitCode;
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use clap::Parser;
use jira::{JiraClient, JiraConfig, JiraError, Status};
use release::report::{render_branch_list, render_title, DEFAULT_TITLE_PADDING};
use release::{ReleaseNotes, RunId};
use tracing::{error, info, warn, Instrument};

use crate::args::Args;
use crate::telemetry::TelemetryConfig;

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();

    let _telemetry = match telemetry::init(&TelemetryConfig {
        log_level: args.log_level.clone(),
        json: args.log_json,
        otlp_endpoint: args.otlp_endpoint.clone(),
    }) {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("Error: {e:#}");
            return ExitCode::FAILURE;
        }
    };

    let run_id = RunId::new_random();
    let span = tracing::info_span!("relnotes", run_id = %run_id);

    match run(args).instrument(span).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(run_id = %run_id, error = format!("{e:#}"), "Run failed");
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

async fn run(args: Args) -> Result<()> {
    let host = args.site_host().to_string();
    let config = JiraConfig::new(
        &host,
        args.username.clone(),
        args.api_token.clone(),
    )
    .with_request_timeout(args.request_timeout())
    .with_dev_status_application(args.dev_status_application.clone());
    let client = Arc::new(JiraClient::new(config).context("cannot connect to Jira")?);

    let board = client
        .find_board(&args.board_name)
        .await
        .context("cannot resolve board")?;
    let project = client
        .board_project(board.id)
        .await
        .with_context(|| format!("cannot resolve the project of board '{}'", board.name))?;
    info!(board = %board.name, project = %project.key, "Resolved project");

    validate_status(client.statuses().await, &args.issue_status_name)?;

    let issues = client
        .search_issues(&project.key, &args.issue_status_name)
        .await
        .context("cannot fetch issues")?;

    let notes = ReleaseNotes::new(Arc::clone(&client), host)
        .with_concurrency_limit(args.concurrency_limit());

    print!("{}", render_title("RELEASE NOTES", DEFAULT_TITLE_PADDING));
    println!("{}", notes.report(&issues));

    let branches = notes
        .aggregate(&issues, &args.repo_filter())
        .await
        .context("cannot collect issue branches")?;

    print!("{}", render_title("BRANCHES", DEFAULT_TITLE_PADDING));
    println!("{}", render_branch_list(&branches));
    Ok(())
}

/// Fails early with the list of valid names when `status` is not a workflow
/// status on the site. If statuses cannot be listed the check is skipped.
fn validate_status(listed: Result<Vec<Status>, JiraError>, status: &str) -> Result<()> {
    let statuses = match listed {
        Ok(statuses) => statuses,
        Err(e) => {
            warn!(error = %e, "Cannot list statuses; skipping status check");
            return Ok(());
        }
    };

    if statuses
        .iter()
        .any(|s| s.name.trim().eq_ignore_ascii_case(status.trim()))
    {
        return Ok(());
    }

    let mut known: Vec<&str> = statuses.iter().map(|s| s.name.as_str()).collect();
    known.sort_unstable();
    known.dedup();
    bail!(
        "unknown issue status '{status}'; available statuses: {}",
        known.join(", ")
    );
}
