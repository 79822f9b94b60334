//! `github-client` — GitHub driver for lab provisioning.
//!
//! Every request flows through a [`Transport`] that stamps GitHub's static
//! headers and an `Authorization` value resolved from a
//! [`CredentialSource`]. The source is either a [`CredentialRotator`]
//! (a token pool that the engine advances as repositories pile up) or a
//! [`StaticCredential`].
//!
//! # Architecture
//!
//! ```text
//! GithubApi (trait)        ← what the engine calls
//!     │
//!     ▼
//! GithubClient             ← REST + GraphQL request builders
//!     │
//!     ▼
//! Transport                ← static headers, auth, request/response logging
//!     │   consults
//!     ▼
//! dyn CredentialSource     ← CredentialRotator | StaticCredential
//! ```
//!
//! # Quick start
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use github_client::{CredentialRotator, GithubApi, GithubClient, Transport};
//!
//! let rotator = Arc::new(CredentialRotator::new(vec!["ghp_a".into(), "ghp_b".into()])?);
//! let transport = Transport::github(reqwest::Client::new(), rotator.clone());
//! let client = GithubClient::new(transport, "https://api.github.com");
//!
//! let enterprise = client.get_enterprise("acme").await?;
//! ```

pub mod api;
pub mod client;
pub mod credentials;
pub mod error;
pub mod transport;
pub mod types;


pub use api::GithubApi;
pub use client::GithubClient;
pub use credentials::{CredentialRotator, CredentialSource, StaticCredential};
pub use error::{ExhaustedError, GithubError};
pub use transport::Transport;
pub use types::{Enterprise, Organization, Repository};

/// Convenience `Result` alias for this crate.
pub type Result<T> = std::result::Result<T, GithubError>;
