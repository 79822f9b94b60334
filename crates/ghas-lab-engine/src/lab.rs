use std::sync::Arc;

use ghas_lab_core::{LabSpec, TemplateRepo};
use github_client::{CredentialRotator, Enterprise, GithubApi};
use tracing::{error, info, warn};

use crate::coordinator::{run_pool, RunOptions, RunScope};
use crate::error::{Result, RunError};
use crate::outcome::{RunCounters, RunSummary};
use crate::worker::{self, ProvisionJob, TeardownJob};

/// Everything a lab-wide run needs besides its participants.
#[derive(Clone)]
pub struct LabContext {
    pub api: Arc<dyn GithubApi>,
    pub enterprise_slug: String,
    pub lab: LabSpec,
    pub options: RunOptions,
}

impl LabContext {
    pub fn new(api: Arc<dyn GithubApi>, enterprise_slug: impl Into<String>, lab: LabSpec) -> Self {
        Self {
            api,
            enterprise_slug: enterprise_slug.into(),
            lab,
            options: RunOptions::default(),
        }
    }

    pub fn with_options(mut self, options: RunOptions) -> Self {
        self.options = options;
        self
    }
}

/// Look up the enterprise before any worker starts. The lookup is bounded by
/// the same cancellation and deadline as the pool that follows it.
async fn resolve_enterprise(
    ctx: &LabContext,
    scope: &RunScope,
    operation: &'static str,
    expected: usize,
) -> Result<Enterprise> {
    match scope.guard(ctx.api.get_enterprise(&ctx.enterprise_slug)).await {
        Ok(Ok(enterprise)) => Ok(enterprise),
        Ok(Err(source)) => Err(RunError::Enterprise {
            slug: ctx.enterprise_slug.clone(),
            source,
        }),
        Err(interrupt) => {
            let summary = RunSummary {
                expected,
                ..RunSummary::default()
            };
            Err(scope.interrupted(operation, interrupt, summary))
        }
    }
}

/// Create one organization per participant and populate it from `templates`.
///
/// `rotator` must be the same credential source the client's transport
/// consults; workers advance it every `rotate_every` repository creations.
pub async fn create_lab_environment(
    ctx: &LabContext,
    rotator: Arc<CredentialRotator>,
    users: Vec<String>,
    templates: Vec<TemplateRepo>,
) -> Result<RunSummary> {
    let scope = RunScope::start(&ctx.options);
    let enterprise = resolve_enterprise(ctx, &scope, "provision", users.len()).await?;
    info!(
        enterprise = %enterprise.slug,
        lab_date = %ctx.lab.lab_date,
        templates = templates.len(),
        "creating lab environment"
    );

    let counters = Arc::new(RunCounters::default());
    let job = Arc::new(ProvisionJob {
        api: ctx.api.clone(),
        rotator,
        enterprise,
        lab: ctx.lab.clone(),
        templates,
        counters: counters.clone(),
        rotate_every: ctx.options.rotate_every.max(1),
    });

    let drained = run_pool("provision", users, &scope, counters, |handle| {
        worker::provision(handle, job.clone())
    })
    .await?;

    let summary = drained.summary;
    if summary.processed != summary.expected {
        error!(
            expected = summary.expected,
            processed = summary.processed,
            failed = summary.failed,
            "lab environment incomplete"
        );
        return Err(RunError::Incomplete {
            expected: summary.expected,
            processed: summary.processed,
            summary,
        });
    }

    info!(
        organizations = summary.processed,
        repos_created = summary.repos_created,
        "lab environment created"
    );
    Ok(summary)
}

/// Delete the organization of every participant.
///
/// Every participant gets an outcome; any failed deletion fails the run after
/// all of them have been attempted.
pub async fn destroy_lab_environment(ctx: &LabContext, users: Vec<String>) -> Result<RunSummary> {
    let scope = RunScope::start(&ctx.options);
    let enterprise = resolve_enterprise(ctx, &scope, "teardown", users.len()).await?;
    info!(
        enterprise = %enterprise.slug,
        lab_date = %ctx.lab.lab_date,
        participants = users.len(),
        "destroying lab environment"
    );

    let counters = Arc::new(RunCounters::default());
    let job = Arc::new(TeardownJob {
        api: ctx.api.clone(),
        lab: ctx.lab.clone(),
        counters: counters.clone(),
    });

    let drained = run_pool("teardown", users, &scope, counters, |handle| {
        worker::teardown(handle, job.clone())
    })
    .await?;

    let summary = drained.summary;
    info!(
        deleted = summary.succeeded,
        failed = summary.failed,
        processed = summary.processed,
        "lab environment teardown finished"
    );

    if summary.processed < summary.expected {
        return Err(RunError::Incomplete {
            expected: summary.expected,
            processed: summary.processed,
            summary,
        });
    }
    if !drained.failures.is_empty() {
        for failed in &drained.failures {
            warn!(user = failed.user(), org = failed.org(), "organization not deleted");
        }
        return Err(RunError::Failures {
            failed: drained.failures.len() as u64,
            summary,
        });
    }
    Ok(summary)
}
