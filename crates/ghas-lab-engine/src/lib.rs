//! `ghas-lab-engine` — concurrent provisioning and teardown of lab
//! organizations.
//!
//! # Architecture
//!
//! ```text
//! create_lab_environment / destroy_lab_environment      (lab)
//!     │  resolve enterprise, build job
//!     ▼
//! run_pool                                              (coordinator)
//!     │  queue ── async-channel (MPMC, capacity N)
//!     │  workers ── JoinSet, min(9, N) tasks
//!     │  results ── mpsc, closed by the supervisor task
//!     ▼
//! provision / teardown loops                            (worker)
//!     │  dyn GithubApi, shared RunCounters, CredentialRotator
//!     ▼
//! RunSummary | RunError
//! ```
//!
//! Single-organization repository batches live in [`repos`] and run
//! sequentially without the pool.

pub mod coordinator;
pub mod error;
pub mod lab;
pub mod outcome;
pub mod repos;
mod worker;

#[cfg(test)]
mod testing;

pub use coordinator::RunOptions;
pub use error::{Result, RunError};
pub use lab::{create_lab_environment, destroy_lab_environment, LabContext};
pub use outcome::{Outcome, RepoBatchSummary, RunCounters, RunSummary};
pub use repos::{create_repos_in_org, delete_repos_in_org};
