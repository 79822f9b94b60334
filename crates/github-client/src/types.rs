use serde::{Deserialize, Serialize};

// ─── Value objects ────────────────────────────────────────────────────────

/// Enterprise account that owns the lab organizations.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Enterprise {
    /// GraphQL node ID.
    pub id: String,
    pub slug: String,
    #[serde(default)]
    pub billing_email: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Organization {
    /// GraphQL node ID.
    pub id: String,
    pub login: String,
    #[serde(default)]
    pub name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Repository {
    pub id: i64,
    pub full_name: String,
    #[serde(default)]
    pub html_url: String,
}

/// REST shape of an organization; `id` there is numeric, so the node ID is
/// taken from `node_id`.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct RestOrganization {
    pub node_id: String,
    pub login: String,
    #[serde(default)]
    pub name: Option<String>,
}

impl From<RestOrganization> for Organization {
    fn from(org: RestOrganization) -> Self {
        Organization {
            id: org.node_id,
            login: org.login,
            name: org.name,
        }
    }
}

/// Minimal repository listing entry.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct RepositoryName {
    pub name: String,
}

// ─── GraphQL envelopes ────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub(crate) struct GraphQlRequest<'a, V: Serialize> {
    pub query: &'a str,
    pub variables: V,
}

#[derive(Debug, Deserialize)]
pub(crate) struct GraphQlResponse<T> {
    pub data: Option<T>,
    #[serde(default)]
    pub errors: Vec<GraphQlError>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct GraphQlError {
    pub message: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct EnterpriseData {
    pub enterprise: Option<Enterprise>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct CreateOrgData {
    pub create_enterprise_organization: Option<CreateOrgPayload>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct CreateOrgPayload {
    pub organization: Option<Organization>,
}

// ─── REST bodies ──────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub(crate) struct GenerateRepoBody<'a> {
    pub owner: &'a str,
    pub name: &'a str,
    pub include_all_branches: bool,
    pub private: bool,
}

/// Error body shape shared by REST endpoints.
#[derive(Debug, Deserialize)]
pub(crate) struct ApiErrorBody {
    pub message: String,
}
