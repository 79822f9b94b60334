use async_trait::async_trait;
use ghas_lab_core::TemplateRepo;

use crate::types::{Enterprise, Organization, Repository};
use crate::Result;

/// Enterprise, organization and repository operations the lab engine needs.
///
/// [`GithubClient`](crate::GithubClient) is the real implementation; the
/// engine only sees this trait so it can be driven by an in-memory fake.
#[async_trait]
pub trait GithubApi: Send + Sync {
    async fn get_enterprise(&self, slug: &str) -> Result<Enterprise>;

    /// Create `login` inside `enterprise` with the given admins.
    async fn create_org(
        &self,
        enterprise: &Enterprise,
        login: &str,
        admins: &[String],
    ) -> Result<Organization>;

    async fn delete_org(&self, login: &str) -> Result<()>;

    async fn get_organization(&self, login: &str) -> Result<Organization>;

    /// Generate a repository named after the template inside `org`.
    async fn create_repo_from_template(
        &self,
        org: &str,
        template: &TemplateRepo,
    ) -> Result<Repository>;

    /// Names of every repository in `org`.
    async fn list_repositories(&self, org: &str) -> Result<Vec<String>>;

    async fn delete_repository(&self, org: &str, name: &str) -> Result<()>;
}
