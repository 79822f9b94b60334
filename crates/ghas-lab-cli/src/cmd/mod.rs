pub mod lab;
pub mod orgs;
pub mod repo;

use anyhow::{Context, Result};
use clap::Args;
use ghas_lab_core::config::{self, DEFAULT_BASE_URL, DEFAULT_TIMEOUT_MINUTES};
use ghas_lab_engine::{RunError, RunOptions};
use github_client::{CredentialRotator, GithubClient, StaticCredential, Transport};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

use crate::logging::LogFormat;
use crate::output;

/// Flags shared by every subcommand.
#[derive(Args, Debug, Clone)]
pub struct GlobalArgs {
    /// GitHub token(s), comma-separated; rotated during lab creation
    #[arg(long, global = true, env = "GITHUB_TOKEN", hide_env_values = true)]
    pub token: Option<String>,

    /// GitHub API base URL (GHES: https://<host>/api/v3)
    #[arg(long, global = true, env = "GITHUB_API_URL", default_value = DEFAULT_BASE_URL)]
    pub base_url: String,

    /// Enterprise that owns the lab organizations
    #[arg(long, global = true, env = "GITHUB_ENTERPRISE_SLUG")]
    pub enterprise_slug: Option<String>,

    /// Overall deadline for lab-wide runs, in minutes (0 = none)
    #[arg(long, global = true, default_value_t = DEFAULT_TIMEOUT_MINUTES)]
    pub timeout_minutes: u64,

    /// Also write logs to <dir>/<command>-<timestamp>.json
    #[arg(long, global = true)]
    pub log_dir: Option<PathBuf>,

    /// Log line format
    #[arg(long, global = true, value_enum, default_value = "json")]
    pub log_format: LogFormat,

    /// Print the run summary as JSON on stdout
    #[arg(long, global = true, short = 'j')]
    pub json: bool,
}

impl GlobalArgs {
    pub fn tokens(&self) -> Result<Vec<String>> {
        Ok(config::parse_credentials(
            self.token.as_deref().unwrap_or_default(),
        )?)
    }

    pub fn enterprise_slug(&self) -> Result<&str> {
        self.enterprise_slug
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .context("--enterprise-slug (or GITHUB_ENTERPRISE_SLUG) is required")
    }

    pub fn run_options(&self, cancel: CancellationToken) -> RunOptions {
        let timeout = (self.timeout_minutes > 0)
            .then(|| Duration::from_secs(self.timeout_minutes * 60));
        RunOptions::default()
            .with_timeout(timeout)
            .with_cancel(cancel)
    }

    /// Client whose transport follows a shared token rotator.
    pub fn rotating_client(&self) -> Result<(Arc<GithubClient>, Arc<CredentialRotator>)> {
        let rotator = Arc::new(CredentialRotator::new(self.tokens()?)?);
        let transport = Transport::github(http_client()?, rotator.clone());
        Ok((
            Arc::new(GithubClient::new(transport, &self.base_url)),
            rotator,
        ))
    }

    /// Client that always presents the first token.
    pub fn static_client(&self) -> Result<Arc<GithubClient>> {
        let credential = Arc::new(StaticCredential::first_of(&self.tokens()?));
        let transport = Transport::github(http_client()?, credential);
        Ok(Arc::new(GithubClient::new(transport, &self.base_url)))
    }
}

fn http_client() -> Result<reqwest::Client> {
    reqwest::Client::builder()
        .build()
        .context("failed to build HTTP client")
}

/// Print whatever counters a finished or aborted run produced, then pass the
/// result through.
pub fn report_run(
    result: std::result::Result<ghas_lab_engine::RunSummary, RunError>,
    json: bool,
) -> Result<()> {
    match result {
        Ok(summary) => output::print_run_summary(&summary, json),
        Err(e) => {
            if let Some(summary) = e.summary() {
                output::print_run_summary(summary, json)?;
            }
            Err(e.into())
        }
    }
}
