use github_client::GithubError;
use thiserror::Error;

use crate::outcome::RunSummary;

#[derive(Debug, Error)]
pub enum RunError {
    #[error("failed to get enterprise '{slug}': {source}")]
    Enterprise {
        slug: String,
        #[source]
        source: GithubError,
    },

    #[error(
        "deadline exceeded after {processed} of {expected} participants ({repos} repositories created)",
        processed = .summary.processed,
        expected = .summary.expected,
        repos = .summary.repos_created
    )]
    DeadlineExceeded { summary: RunSummary },

    #[error(
        "run cancelled after {processed} of {expected} participants",
        processed = .summary.processed,
        expected = .summary.expected
    )]
    Cancelled { summary: RunSummary },

    #[error("workers finished but only {processed} of {expected} participants were processed")]
    Incomplete {
        expected: usize,
        processed: usize,
        summary: RunSummary,
    },

    #[error("{failed} of {expected} participants failed", expected = .summary.expected)]
    Failures { failed: u64, summary: RunSummary },

    #[error("failed to get organization '{org}': {source}")]
    Organization {
        org: String,
        #[source]
        source: GithubError,
    },

    #[error("failed to list repositories in '{org}': {source}")]
    ListRepositories {
        org: String,
        #[source]
        source: GithubError,
    },

    #[error("failed to create any of {attempted} repositories in '{org}'")]
    NothingCreated { org: String, attempted: usize },

    #[error("failed to delete any of {attempted} repositories in '{org}'")]
    NothingDeleted { org: String, attempted: usize },
}

impl RunError {
    /// Counters accumulated before the run ended, when the run got that far.
    pub fn summary(&self) -> Option<&RunSummary> {
        match self {
            RunError::DeadlineExceeded { summary }
            | RunError::Cancelled { summary }
            | RunError::Incomplete { summary, .. }
            | RunError::Failures { summary, .. } => Some(summary),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, RunError>;
