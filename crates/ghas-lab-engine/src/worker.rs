//! Per-participant work loops run by the pool in [`crate::coordinator`].

use std::sync::Arc;

use async_channel::Receiver;
use ghas_lab_core::{LabSpec, TemplateRepo};
use github_client::{CredentialRotator, Enterprise, GithubApi};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

use crate::outcome::{Outcome, RunCounters};

/// Channels and identity handed to one worker task.
pub(crate) struct WorkerHandle {
    pub id: usize,
    pub queue: Receiver<String>,
    pub results: mpsc::Sender<Outcome>,
    pub cancel: CancellationToken,
}

impl WorkerHandle {
    /// Next participant, or `None` once the queue is drained or the run is
    /// cancelled.
    async fn next(&self) -> Option<String> {
        if self.cancel.is_cancelled() {
            warn!(worker_id = self.id, "run cancelled, worker stopping");
            return None;
        }
        let user = self.queue.recv().await.ok()?;
        if self.cancel.is_cancelled() {
            warn!(worker_id = self.id, user = %user, "run cancelled, worker stopping");
            return None;
        }
        Some(user)
    }

    /// Deliver an outcome. `false` means the coordinator has stopped listening.
    async fn emit(&self, outcome: Outcome) -> bool {
        self.results.send(outcome).await.is_ok()
    }
}

// ─── Provisioning ─────────────────────────────────────────────────────────

/// State every provisioning worker reads.
pub(crate) struct ProvisionJob {
    pub api: Arc<dyn GithubApi>,
    pub rotator: Arc<CredentialRotator>,
    pub enterprise: Enterprise,
    pub lab: LabSpec,
    pub templates: Vec<TemplateRepo>,
    pub counters: Arc<RunCounters>,
    pub rotate_every: u64,
}

pub(crate) async fn provision(worker: WorkerHandle, job: Arc<ProvisionJob>) {
    info!(worker_id = worker.id, "provisioning worker started");

    while let Some(user) = worker.next().await {
        let login = job.lab.org_login(&user);
        let admins = job.lab.admins_for(&user);

        let org = match job.api.create_org(&job.enterprise, &login, &admins).await {
            Ok(org) => org,
            Err(e) => {
                error!(
                    worker_id = worker.id,
                    user = %user,
                    org = %login,
                    error = %e,
                    "failed to create organization"
                );
                job.counters.record_failure();
                continue;
            }
        };
        info!(worker_id = worker.id, user = %user, org = %org.login, "organization created");

        for template in &job.templates {
            match job.api.create_repo_from_template(&org.login, template).await {
                Ok(repo) => {
                    info!(
                        worker_id = worker.id,
                        org = %org.login,
                        repo = %repo.full_name,
                        "repository created"
                    );
                }
                Err(e) => {
                    error!(
                        worker_id = worker.id,
                        org = %org.login,
                        template = %template.template,
                        error = %e,
                        "failed to create repository"
                    );
                    continue;
                }
            }

            let created = job.counters.record_repo();
            if created % job.rotate_every == 0 {
                info!(
                    worker_id = worker.id,
                    repos_created = created,
                    "repository creation threshold reached, rotating token"
                );
                if let Err(e) = job.rotator.advance() {
                    error!(
                        worker_id = worker.id,
                        org = %org.login,
                        error = %e,
                        "credential pool exhausted, worker stopping"
                    );
                    return;
                }
            }
        }

        job.counters.record_success();
        let org_login = org.login;
        if !worker
            .emit(Outcome::Provisioned {
                user,
                org: org_login.clone(),
            })
            .await
        {
            return;
        }
        info!(worker_id = worker.id, org = %org_login, "finished provisioning organization");
    }

    info!(worker_id = worker.id, "provisioning worker finished");
}

// ─── Teardown ─────────────────────────────────────────────────────────────

pub(crate) struct TeardownJob {
    pub api: Arc<dyn GithubApi>,
    pub lab: LabSpec,
    pub counters: Arc<RunCounters>,
}

pub(crate) async fn teardown(worker: WorkerHandle, job: Arc<TeardownJob>) {
    info!(worker_id = worker.id, "teardown worker started");

    while let Some(user) = worker.next().await {
        let org = job.lab.org_login(&user);
        let outcome = match job.api.delete_org(&org).await {
            Ok(()) => {
                info!(worker_id = worker.id, user = %user, org = %org, "organization deleted");
                job.counters.record_success();
                Outcome::Deleted { user, org }
            }
            Err(e) => {
                error!(
                    worker_id = worker.id,
                    user = %user,
                    org = %org,
                    error = %e,
                    "failed to delete organization"
                );
                job.counters.record_failure();
                Outcome::Failed {
                    user,
                    org,
                    error: e.to_string(),
                }
            }
        };
        if !worker.emit(outcome).await {
            return;
        }
    }

    info!(worker_id = worker.id, "teardown worker finished");
}
