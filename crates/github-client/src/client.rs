use async_trait::async_trait;
use ghas_lab_core::TemplateRepo;
use reqwest::{Method, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::api::GithubApi;
use crate::transport::Transport;
use crate::types::{
    ApiErrorBody, CreateOrgData, Enterprise, EnterpriseData, GenerateRepoBody, GraphQlRequest,
    GraphQlResponse, Organization, Repository, RepositoryName, RestOrganization,
};
use crate::{GithubError, Result};

const PER_PAGE: usize = 100;

const ENTERPRISE_QUERY: &str = r#"query($slug: String!) {
  enterprise(slug: $slug) { id slug billingEmail }
}"#;

const CREATE_ORG_MUTATION: &str = r#"mutation(
  $enterpriseId: ID!
  $login: String!
  $profileName: String!
  $billingEmail: String!
  $adminLogins: [String!]!
) {
  createEnterpriseOrganization(input: {
    enterpriseId: $enterpriseId
    login: $login
    profileName: $profileName
    billingEmail: $billingEmail
    adminLogins: $adminLogins
  }) {
    organization { id login name }
  }
}"#;

// ─── GithubClient ─────────────────────────────────────────────────────────

/// GitHub REST + GraphQL client. Every call goes through [`Transport`].
#[derive(Debug)]
pub struct GithubClient {
    transport: Transport,
    rest_base: String,
    graphql_url: String,
}

impl GithubClient {
    /// `base_url` is the REST root, e.g. `https://api.github.com` or
    /// `https://ghe.example.com/api/v3`.
    pub fn new(transport: Transport, base_url: &str) -> Self {
        let rest_base = base_url.trim_end_matches('/').to_owned();
        let graphql_url = graphql_url_for(&rest_base);
        Self {
            transport,
            rest_base,
            graphql_url,
        }
    }

    fn rest(&self, method: Method, path: &str) -> RequestBuilder {
        self.transport
            .client()
            .request(method, format!("{}{path}", self.rest_base))
    }

    async fn send(&self, builder: RequestBuilder) -> Result<Response> {
        let request = builder.build()?;
        let response = self.transport.execute(&request).await?;
        check_status(response).await
    }

    async fn send_json<T: DeserializeOwned>(&self, builder: RequestBuilder) -> Result<T> {
        let response = self.send(builder).await?;
        response
            .json()
            .await
            .map_err(|e| GithubError::InvalidResponse(e.to_string()))
    }

    async fn graphql<V: Serialize, T: DeserializeOwned>(
        &self,
        query: &str,
        variables: V,
    ) -> Result<T> {
        let builder = self
            .transport
            .client()
            .post(&self.graphql_url)
            .json(&GraphQlRequest { query, variables });
        let body: GraphQlResponse<T> = self.send_json(builder).await?;
        if !body.errors.is_empty() {
            return Err(GithubError::GraphQl(
                body.errors.into_iter().map(|e| e.message).collect(),
            ));
        }
        body.data
            .ok_or_else(|| GithubError::InvalidResponse("GraphQL response without data".into()))
    }
}

#[async_trait]
impl GithubApi for GithubClient {
    async fn get_enterprise(&self, slug: &str) -> Result<Enterprise> {
        let data: EnterpriseData = self
            .graphql(ENTERPRISE_QUERY, serde_json::json!({ "slug": slug }))
            .await?;
        data.enterprise
            .ok_or_else(|| GithubError::EnterpriseNotFound(slug.to_owned()))
    }

    async fn create_org(
        &self,
        enterprise: &Enterprise,
        login: &str,
        admins: &[String],
    ) -> Result<Organization> {
        let billing_email = enterprise.billing_email.as_deref().ok_or_else(|| {
            GithubError::Request(format!(
                "enterprise '{}' has no billing email visible to this token",
                enterprise.slug
            ))
        })?;

        tracing::info!(org = login, admins = admins.len(), "creating organization");
        let data: CreateOrgData = self
            .graphql(
                CREATE_ORG_MUTATION,
                serde_json::json!({
                    "enterpriseId": enterprise.id,
                    "login": login,
                    "profileName": login,
                    "billingEmail": billing_email,
                    "adminLogins": admins,
                }),
            )
            .await?;

        data.create_enterprise_organization
            .and_then(|p| p.organization)
            .ok_or_else(|| {
                GithubError::InvalidResponse(format!("no organization returned for '{login}'"))
            })
    }

    async fn delete_org(&self, login: &str) -> Result<()> {
        self.send(self.rest(Method::DELETE, &format!("/orgs/{login}")))
            .await
            .map(drop)
    }

    async fn get_organization(&self, login: &str) -> Result<Organization> {
        let org: RestOrganization = self
            .send_json(self.rest(Method::GET, &format!("/orgs/{login}")))
            .await?;
        Ok(org.into())
    }

    async fn create_repo_from_template(
        &self,
        org: &str,
        template: &TemplateRepo,
    ) -> Result<Repository> {
        let (owner, name) = template.owner_and_name()?;
        let body = GenerateRepoBody {
            owner: org,
            name,
            include_all_branches: template.include_all_branches,
            private: true,
        };
        self.send_json(
            self.rest(Method::POST, &format!("/repos/{owner}/{name}/generate"))
                .json(&body),
        )
        .await
    }

    async fn list_repositories(&self, org: &str) -> Result<Vec<String>> {
        let mut names = Vec::new();
        let mut page = 1usize;
        loop {
            let batch: Vec<RepositoryName> = self
                .send_json(
                    self.rest(Method::GET, &format!("/orgs/{org}/repos"))
                        .query(&[("per_page", PER_PAGE), ("page", page)]),
                )
                .await?;
            let len = batch.len();
            names.extend(batch.into_iter().map(|r| r.name));
            if len < PER_PAGE {
                break;
            }
            page += 1;
        }
        Ok(names)
    }

    async fn delete_repository(&self, org: &str, name: &str) -> Result<()> {
        self.send(self.rest(Method::DELETE, &format!("/repos/{org}/{name}")))
            .await
            .map(drop)
    }
}

// ─── Helpers ──────────────────────────────────────────────────────────────

/// GraphQL endpoint for a REST base. GitHub Enterprise Server serves REST
/// under `/api/v3` and GraphQL under `/api/graphql`.
fn graphql_url_for(rest_base: &str) -> String {
    match rest_base.strip_suffix("/api/v3") {
        Some(host) => format!("{host}/api/graphql"),
        None => format!("{rest_base}/graphql"),
    }
}

/// Map non-2xx responses onto [`GithubError`].
async fn check_status(response: Response) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let code = status.as_u16();
    let quota_exhausted = response
        .headers()
        .get("x-ratelimit-remaining")
        .is_some_and(|v| v.as_bytes() == b"0");

    if code == 401 {
        return Err(GithubError::Unauthorized);
    }
    if code == 429 || (code == 403 && quota_exhausted) {
        return Err(GithubError::RateLimited { status: code });
    }

    let body = response.text().await.unwrap_or_default();
    let message = serde_json::from_str::<ApiErrorBody>(&body)
        .map(|b| b.message)
        .unwrap_or(body);
    Err(GithubError::api(code, message))
}

// ─── Tests ────────────────────────────────────────────────────────────────
