//! Bounded worker pool over a shared participant queue.
//!
//! The coordinator seeds a queue sized to the participant count, starts
//! `min(MAX_WORKERS, N)` workers, enqueues every participant and closes the
//! queue. A supervisor task owns the first results sender and drops it
//! once every worker has returned, so the results stream ends exactly when
//! the pool is done. The coordinator drains that stream through a
//! [`RunScope`], which also guards the setup calls made before the pool
//! starts.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use ghas_lab_core::config::{self, DEFAULT_TIMEOUT_MINUTES, ROTATE_EVERY};
use tokio::sync::mpsc;
use tokio::task::JoinSet;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

use crate::error::RunError;
use crate::outcome::{Outcome, RunCounters, RunSummary};
use crate::worker::WorkerHandle;

/// Knobs for one lab-wide run.
#[derive(Debug, Clone)]
pub struct RunOptions {
    /// Overall deadline. `None` runs until the pool drains.
    pub timeout: Option<Duration>,
    /// Caller-side cancellation (e.g. Ctrl-C).
    pub cancel: CancellationToken,
    /// Rotate the credential every this many repository creations.
    pub rotate_every: u64,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            timeout: Some(Duration::from_secs(DEFAULT_TIMEOUT_MINUTES * 60)),
            cancel: CancellationToken::new(),
            rotate_every: ROTATE_EVERY,
        }
    }
}

impl RunOptions {
    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_cancel(mut self, cancel: CancellationToken) -> Self {
        self.cancel = cancel;
        self
    }

    pub fn with_rotate_every(mut self, rotate_every: u64) -> Self {
        self.rotate_every = rotate_every.max(1);
        self
    }
}

// ─── RunScope ─────────────────────────────────────────────────────────────

/// Why a guarded step did not finish.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Interrupt {
    Cancelled,
    Deadline,
}

/// Cancellation and deadline shared by every phase of one run.
///
/// The token is a child of the caller's, so reaching the deadline stops this
/// run's workers without cancelling the caller.
#[derive(Debug)]
pub(crate) struct RunScope {
    token: CancellationToken,
    deadline: Option<Instant>,
}

impl RunScope {
    pub fn start(options: &RunOptions) -> Self {
        Self {
            token: options.cancel.child_token(),
            deadline: options.timeout.map(|t| Instant::now() + t),
        }
    }

    async fn deadline_elapsed(&self) {
        match self.deadline {
            Some(at) => tokio::time::sleep_until(at).await,
            None => std::future::pending().await,
        }
    }

    /// Await `step` unless the run is cancelled or its deadline passes first.
    /// Reaching the deadline cancels the run token.
    pub async fn guard<F: Future>(&self, step: F) -> Result<F::Output, Interrupt> {
        tokio::select! {
            biased;

            _ = self.token.cancelled() => Err(Interrupt::Cancelled),
            _ = self.deadline_elapsed() => {
                self.token.cancel();
                Err(Interrupt::Deadline)
            }
            out = step => Ok(out),
        }
    }

    pub fn interrupted(
        &self,
        operation: &'static str,
        interrupt: Interrupt,
        summary: RunSummary,
    ) -> RunError {
        match interrupt {
            Interrupt::Cancelled => {
                warn!(
                    operation,
                    processed = summary.processed,
                    expected = summary.expected,
                    "run cancelled"
                );
                RunError::Cancelled { summary }
            }
            Interrupt::Deadline => {
                error!(
                    operation,
                    processed = summary.processed,
                    expected = summary.expected,
                    repos_created = summary.repos_created,
                    "run deadline exceeded"
                );
                RunError::DeadlineExceeded { summary }
            }
        }
    }
}

// ─── Pool ─────────────────────────────────────────────────────────────────

/// What the coordinator saw before the results stream closed.
#[derive(Debug)]
pub(crate) struct Drained {
    pub summary: RunSummary,
    pub failures: Vec<Outcome>,
}

/// Run `work` on a pool of workers, one call per worker task, and drain
/// their outcomes.
///
/// Returns once every worker has finished, or early with
/// [`RunError::DeadlineExceeded`] / [`RunError::Cancelled`]. On early return
/// the pool is told to stop; in-flight API calls are not interrupted.
pub(crate) async fn run_pool<W, Fut>(
    operation: &'static str,
    users: Vec<String>,
    scope: &RunScope,
    counters: Arc<RunCounters>,
    work: W,
) -> Result<Drained, RunError>
where
    W: Fn(WorkerHandle) -> Fut,
    Fut: Future<Output = ()> + Send + 'static,
{
    let expected = users.len();
    let workers = config::worker_count(expected);

    info!(operation, participants = expected, workers, "starting worker pool");

    let (queue_tx, queue_rx) = async_channel::bounded::<String>(expected.max(1));
    let (results_tx, mut results_rx) = mpsc::channel::<Outcome>(expected.max(1));

    let mut pool = JoinSet::new();
    for id in 0..workers {
        pool.spawn(work(WorkerHandle {
            id,
            queue: queue_rx.clone(),
            results: results_tx.clone(),
            cancel: scope.token.clone(),
        }));
    }
    drop(queue_rx);

    tokio::spawn(async move {
        while let Some(joined) = pool.join_next().await {
            if let Err(e) = joined {
                error!(operation, error = %e, "worker task failed");
            }
        }
        drop(results_tx);
    });

    for user in users {
        if queue_tx.send(user).await.is_err() {
            warn!(operation, "all workers stopped before the queue was filled");
            break;
        }
    }
    drop(queue_tx);

    let mut processed = 0usize;
    let mut failures = Vec::new();
    let snapshot =
        |processed: usize| RunSummary::capture(expected, processed, workers, &counters);

    loop {
        match scope.guard(results_rx.recv()).await {
            Ok(Some(outcome)) => {
                processed += 1;
                info!(operation, org = %outcome, processed, expected, "participant processed");
                if outcome.is_failure() {
                    failures.push(outcome);
                }
            }
            Ok(None) => break,
            Err(interrupt) => {
                return Err(scope.interrupted(operation, interrupt, snapshot(processed)));
            }
        }
    }

    Ok(Drained {
        summary: snapshot(processed),
        failures,
    })
}
