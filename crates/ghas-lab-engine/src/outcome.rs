use serde::Serialize;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

/// Terminal result for one participant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Provisioned { user: String, org: String },
    Deleted { user: String, org: String },
    Failed {
        user: String,
        org: String,
        error: String,
    },
}

impl Outcome {
    pub fn org(&self) -> &str {
        match self {
            Outcome::Provisioned { org, .. }
            | Outcome::Deleted { org, .. }
            | Outcome::Failed { org, .. } => org,
        }
    }

    pub fn user(&self) -> &str {
        match self {
            Outcome::Provisioned { user, .. }
            | Outcome::Deleted { user, .. }
            | Outcome::Failed { user, .. } => user,
        }
    }

    pub fn is_failure(&self) -> bool {
        matches!(self, Outcome::Failed { .. })
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::Failed { org, .. } => write!(f, "failed:{org}"),
            other => f.write_str(other.org()),
        }
    }
}

// ─── RunCounters ──────────────────────────────────────────────────────────

/// Counters shared by every worker of a run. Only ever incremented.
#[derive(Debug, Default)]
pub struct RunCounters {
    repos_created: AtomicU64,
    succeeded: AtomicU64,
    failed: AtomicU64,
}

impl RunCounters {
    /// Record one created repository; returns the post-increment total.
    pub fn record_repo(&self) -> u64 {
        self.repos_created.fetch_add(1, Ordering::AcqRel) + 1
    }

    pub fn record_success(&self) {
        self.succeeded.fetch_add(1, Ordering::AcqRel);
    }

    pub fn record_failure(&self) {
        self.failed.fetch_add(1, Ordering::AcqRel);
    }

    pub fn repos_created(&self) -> u64 {
        self.repos_created.load(Ordering::Acquire)
    }

    pub fn succeeded(&self) -> u64 {
        self.succeeded.load(Ordering::Acquire)
    }

    pub fn failed(&self) -> u64 {
        self.failed.load(Ordering::Acquire)
    }
}

// ─── Summaries ────────────────────────────────────────────────────────────

/// Aggregate view of a lab-wide run, reported on success and failure alike.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RunSummary {
    /// Participants enqueued.
    pub expected: usize,
    /// Outcomes received by the coordinator.
    pub processed: usize,
    pub succeeded: u64,
    pub failed: u64,
    pub repos_created: u64,
    pub workers: usize,
}

impl RunSummary {
    pub(crate) fn capture(
        expected: usize,
        processed: usize,
        workers: usize,
        counters: &RunCounters,
    ) -> Self {
        Self {
            expected,
            processed,
            succeeded: counters.succeeded(),
            failed: counters.failed(),
            repos_created: counters.repos_created(),
            workers,
        }
    }
}

/// Result of a sequential repository batch in one organization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RepoBatchSummary {
    pub org: String,
    pub attempted: usize,
    pub succeeded: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn failed_outcome_displays_with_prefix() {
        let failed = Outcome::Failed {
            user: "bob".into(),
            org: "ghas-labs-d-bob".into(),
            error: "boom".into(),
        };
        assert_eq!(failed.to_string(), "failed:ghas-labs-d-bob");
        assert!(failed.is_failure());

        let ok = Outcome::Deleted {
            user: "bob".into(),
            org: "ghas-labs-d-bob".into(),
        };
        assert_eq!(ok.to_string(), "ghas-labs-d-bob");
        assert!(!ok.is_failure());
    }

    #[test]
    fn record_repo_returns_running_total() {
        let counters = RunCounters::default();
        assert_eq!(counters.record_repo(), 1);
        assert_eq!(counters.record_repo(), 2);
        assert_eq!(counters.repos_created(), 2);
    }

    #[test]
    fn summary_serializes_counts() {
        let counters = RunCounters::default();
        counters.record_success();
        counters.record_failure();
        counters.record_repo();
        let summary = RunSummary::capture(2, 1, 2, &counters);
        let json = serde_json::to_value(&summary).unwrap();
        assert_eq!(json["expected"], 2);
        assert_eq!(json["succeeded"], 1);
        assert_eq!(json["failed"], 1);
        assert_eq!(json["repos_created"], 1);
    }
}
