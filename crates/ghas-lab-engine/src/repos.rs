//! Sequential repository batches against a single organization.

use ghas_lab_core::TemplateRepo;
use github_client::GithubApi;
use tracing::{error, info, warn};

use crate::error::{Result, RunError};
use crate::outcome::RepoBatchSummary;

/// Generate every template inside `org`, in order.
///
/// Individual failures are logged and skipped; the batch only fails when
/// templates were given and none of them produced a repository.
pub async fn create_repos_in_org(
    api: &dyn GithubApi,
    org: &str,
    templates: &[TemplateRepo],
) -> Result<RepoBatchSummary> {
    let org = resolve_org(api, org).await?;
    info!(org = %org, templates = templates.len(), "creating repositories");

    let mut succeeded = 0usize;
    for template in templates {
        match api.create_repo_from_template(&org, template).await {
            Ok(repo) => {
                succeeded += 1;
                info!(org = %org, repo = %repo.full_name, "repository created");
            }
            Err(e) => {
                error!(
                    org = %org,
                    template = %template.template,
                    error = %e,
                    "failed to create repository"
                );
            }
        }
    }

    if succeeded == 0 && !templates.is_empty() {
        return Err(RunError::NothingCreated {
            org,
            attempted: templates.len(),
        });
    }

    info!(org = %org, succeeded, attempted = templates.len(), "repository creation finished");
    Ok(RepoBatchSummary {
        org,
        attempted: templates.len(),
        succeeded,
    })
}

/// Delete `names` from `org`, or every repository in it when `names` is
/// empty.
pub async fn delete_repos_in_org(
    api: &dyn GithubApi,
    org: &str,
    names: Vec<String>,
) -> Result<RepoBatchSummary> {
    let org = resolve_org(api, org).await?;

    let names = if names.is_empty() {
        info!(org = %org, "no repository names given, deleting every repository");
        api.list_repositories(&org)
            .await
            .map_err(|source| RunError::ListRepositories {
                org: org.clone(),
                source,
            })?
    } else {
        names
    };

    if names.is_empty() {
        warn!(org = %org, "organization has no repositories to delete");
        return Ok(RepoBatchSummary {
            org,
            attempted: 0,
            succeeded: 0,
        });
    }

    let mut succeeded = 0usize;
    for name in &names {
        match api.delete_repository(&org, name).await {
            Ok(()) => {
                succeeded += 1;
                info!(org = %org, repo = %name, "repository deleted");
            }
            Err(e) => {
                error!(org = %org, repo = %name, error = %e, "failed to delete repository");
            }
        }
    }

    if succeeded == 0 {
        return Err(RunError::NothingDeleted {
            org,
            attempted: names.len(),
        });
    }

    info!(org = %org, succeeded, attempted = names.len(), "repository deletion finished");
    Ok(RepoBatchSummary {
        org,
        attempted: names.len(),
        succeeded,
    })
}

async fn resolve_org(api: &dyn GithubApi, org: &str) -> Result<String> {
    api.get_organization(org)
        .await
        .map(|o| o.login)
        .map_err(|source| RunError::Organization {
            org: org.to_owned(),
            source,
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::FakeGithub;

    fn templates(refs: &[&str]) -> Vec<TemplateRepo> {
        refs.iter().map(|r| TemplateRepo::new(*r, false)).collect()
    }

    #[tokio::test]
    async fn creates_templates_in_order() {
        let fake = FakeGithub::default();
        fake.seed_org("lab-org", &[]);

        let summary = create_repos_in_org(&fake, "lab-org", &templates(&["acme/one", "acme/two"]))
            .await
            .unwrap();

        assert_eq!(summary.attempted, 2);
        assert_eq!(summary.succeeded, 2);
        assert_eq!(fake.org("lab-org").unwrap().repos, vec!["one", "two"]);
    }

    #[tokio::test]
    async fn partial_creation_is_success() {
        let fake = FakeGithub::default().fail_template("acme/one");
        fake.seed_org("lab-org", &[]);

        let summary = create_repos_in_org(&fake, "lab-org", &templates(&["acme/one", "acme/two"]))
            .await
            .unwrap();
        assert_eq!(summary.succeeded, 1);
    }

    #[tokio::test]
    async fn nothing_created_is_an_error() {
        let fake = FakeGithub::default().fail_template("acme/one");
        fake.seed_org("lab-org", &[]);

        let err = create_repos_in_org(&fake, "lab-org", &templates(&["acme/one"]))
            .await
            .unwrap_err();
        assert!(matches!(err, RunError::NothingCreated { attempted: 1, .. }), "got {err:?}");
    }

    #[tokio::test]
    async fn empty_template_list_is_a_noop() {
        let fake = FakeGithub::default();
        fake.seed_org("lab-org", &[]);

        let summary = create_repos_in_org(&fake, "lab-org", &[]).await.unwrap();
        assert_eq!(summary.attempted, 0);
        assert_eq!(summary.succeeded, 0);
    }

    #[tokio::test]
    async fn unknown_org_fails_before_any_repository_call() {
        let fake = FakeGithub::default();
        let err = create_repos_in_org(&fake, "missing", &templates(&["acme/one"]))
            .await
            .unwrap_err();
        assert!(matches!(err, RunError::Organization { ref org, .. } if org == "missing"));
    }

    #[tokio::test]
    async fn deletes_named_repositories() {
        let fake = FakeGithub::default();
        fake.seed_org("lab-org", &["one", "two", "three"]);

        let summary = delete_repos_in_org(&fake, "lab-org", vec!["one".into(), "three".into()])
            .await
            .unwrap();
        assert_eq!(summary.succeeded, 2);
        assert_eq!(fake.org("lab-org").unwrap().repos, vec!["two"]);
    }

    #[tokio::test]
    async fn no_names_deletes_everything() {
        let fake = FakeGithub::default();
        fake.seed_org("lab-org", &["one", "two"]);

        let summary = delete_repos_in_org(&fake, "lab-org", Vec::new()).await.unwrap();
        assert_eq!(summary.attempted, 2);
        assert_eq!(summary.succeeded, 2);
        assert!(fake.org("lab-org").unwrap().repos.is_empty());
    }

    #[tokio::test]
    async fn empty_org_delete_succeeds_with_zero_deletions() {
        let fake = FakeGithub::default();
        fake.seed_org("lab-org", &[]);

        let summary = delete_repos_in_org(&fake, "lab-org", Vec::new()).await.unwrap();
        assert_eq!(summary.attempted, 0);
        assert_eq!(summary.succeeded, 0);
    }

    #[tokio::test]
    async fn nothing_deleted_is_an_error() {
        let fake = FakeGithub::default().fail_repo_delete("one");
        fake.seed_org("lab-org", &["one"]);

        let err = delete_repos_in_org(&fake, "lab-org", vec!["one".into()])
            .await
            .unwrap_err();
        assert!(matches!(err, RunError::NothingDeleted { attempted: 1, .. }), "got {err:?}");
    }
}
