//! Command-line arguments.
//!
//! Credentials and the site host are normally supplied through the
//! `ATLASSIAN_*` environment variables; everything else is a flag. The
//! camelCase aliases keep existing invocation scripts working.

use std::time::Duration;

use clap::Parser;
use jira::DEFAULT_DEV_STATUS_APPLICATION;
use release::{ConcurrencyLimit, RepoFilter};
use secrecy::SecretString;

/// Print release notes and the branch merge list for a Jira board.
#[derive(Parser)]
#[command(name = "relnotes", version, about, long_about = None)]
pub struct Args {
    /// Jira site host, e.g. acme.atlassian.net
    #[arg(long, env = "ATLASSIAN_HOST")]
    pub host: String,

    /// Account e-mail used to authenticate
    #[arg(long, env = "ATLASSIAN_USERNAME")]
    pub username: String,

    /// API token for the account
    #[arg(long, env = "ATLASSIAN_API_TOKEN", hide_env_values = true)]
    pub api_token: SecretString,

    /// Board whose project the release is cut from (matched ignoring case and punctuation)
    #[arg(long, alias = "boardName")]
    pub board_name: String,

    /// Only list branches from this repository
    #[arg(long, alias = "repoName")]
    pub repo_name: String,

    /// Workflow status the released issues are in, e.g. "Ready For Release"
    #[arg(long, alias = "issueStatusName")]
    pub issue_status_name: String,

    /// Maximum branch lookups in flight at once
    #[arg(long, default_value_t = ConcurrencyLimit::DEFAULT as u16, value_parser = clap::value_parser!(u16).range(1..))]
    pub concurrency: u16,

    /// Per-request timeout in seconds
    #[arg(long, default_value_t = 30, value_parser = clap::value_parser!(u64).range(1..))]
    pub request_timeout_secs: u64,

    /// Dev-status integration to read branches from
    #[arg(long, default_value = DEFAULT_DEV_STATUS_APPLICATION)]
    pub dev_status_application: String,

    /// Log level used when RUST_LOG is not set
    #[arg(long, env = "RELNOTES_LOG_LEVEL", default_value = "warn")]
    pub log_level: String,

    /// Emit logs as JSON
    #[arg(long, env = "RELNOTES_LOG_JSON")]
    pub log_json: bool,

    /// Export spans to this OTLP/gRPC endpoint, e.g. http://localhost:4317
    #[arg(long, env = "OTEL_EXPORTER_OTLP_ENDPOINT")]
    pub otlp_endpoint: Option<String>,
}

impl Args {
    /// Site host without scheme or trailing slash, as used in issue links.
    pub fn site_host(&self) -> &str {
        let host = self.host.trim();
        let host = host
            .strip_prefix("https://")
            .or_else(|| host.strip_prefix("http://"))
            .unwrap_or(host);
        host.trim_end_matches('/')
    }

    pub fn concurrency_limit(&self) -> ConcurrencyLimit {
        ConcurrencyLimit::new(usize::from(self.concurrency)).unwrap_or_default()
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn repo_filter(&self) -> RepoFilter {
        RepoFilter::new(&self.repo_name)
    }
}
