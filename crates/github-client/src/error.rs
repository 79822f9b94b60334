use thiserror::Error;

#[derive(Debug, Error)]
pub enum GithubError {
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("request cannot be sent: {0}")]
    Request(String),

    #[error("unauthorized: check the supplied token")]
    Unauthorized,

    #[error("rate limit exceeded (status {status})")]
    RateLimited { status: u16 },

    #[error("GitHub API error: {status} - {message}")]
    Api { status: u16, message: String },

    #[error("GraphQL error: {}", .0.join("; "))]
    GraphQl(Vec<String>),

    #[error("invalid response from GitHub: {0}")]
    InvalidResponse(String),

    #[error("enterprise not found: {0}")]
    EnterpriseNotFound(String),

    #[error(transparent)]
    Lab(#[from] ghas_lab_core::LabError),
}

impl GithubError {
    pub fn api(status: u16, message: impl Into<String>) -> Self {
        Self::Api {
            status,
            message: message.into(),
        }
    }
}

/// Every credential in the pool has been used up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("no more tokens available: already at index {index} of {last}", last = .total.saturating_sub(1))]
pub struct ExhaustedError {
    pub index: usize,
    pub total: usize,
}
