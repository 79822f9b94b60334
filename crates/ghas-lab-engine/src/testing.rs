//! In-memory [`GithubApi`] for engine tests.

use std::collections::{BTreeMap, HashSet};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use ghas_lab_core::TemplateRepo;
use github_client::{Enterprise, GithubApi, GithubError, Organization, Repository};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct FakeOrg {
    pub admins: Vec<String>,
    pub repos: Vec<String>,
}

#[derive(Default)]
pub(crate) struct FakeGithub {
    orgs: Mutex<BTreeMap<String, FakeOrg>>,
    fail_create_org: HashSet<String>,
    fail_templates: HashSet<String>,
    fail_repo_delete: HashSet<String>,
    no_enterprise: bool,
    delay: Option<Duration>,
    enterprise_delay: Option<Duration>,
}

impl FakeGithub {
    pub fn fail_create_org(mut self, login: &str) -> Self {
        self.fail_create_org.insert(login.to_owned());
        self
    }

    pub fn fail_template(mut self, template: &str) -> Self {
        self.fail_templates.insert(template.to_owned());
        self
    }

    pub fn fail_repo_delete(mut self, name: &str) -> Self {
        self.fail_repo_delete.insert(name.to_owned());
        self
    }

    pub fn without_enterprise(mut self) -> Self {
        self.no_enterprise = true;
        self
    }

    /// Delay applied to every organization and repository mutation.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn with_enterprise_delay(mut self, delay: Duration) -> Self {
        self.enterprise_delay = Some(delay);
        self
    }

    pub fn seed_org(&self, login: &str, repos: &[&str]) {
        self.orgs.lock().unwrap().insert(
            login.to_owned(),
            FakeOrg {
                admins: Vec::new(),
                repos: repos.iter().map(|r| r.to_string()).collect(),
            },
        );
    }

    pub fn org(&self, login: &str) -> Option<FakeOrg> {
        self.orgs.lock().unwrap().get(login).cloned()
    }

    pub fn org_count(&self) -> usize {
        self.orgs.lock().unwrap().len()
    }

    async fn pause(&self) {
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
    }

    fn not_found(what: &str) -> GithubError {
        GithubError::Api {
            status: 404,
            message: format!("{what} not found"),
        }
    }
}

#[async_trait]
impl GithubApi for FakeGithub {
    async fn get_enterprise(&self, slug: &str) -> github_client::Result<Enterprise> {
        if let Some(delay) = self.enterprise_delay {
            tokio::time::sleep(delay).await;
        }
        if self.no_enterprise {
            return Err(GithubError::EnterpriseNotFound(slug.to_owned()));
        }
        Ok(Enterprise {
            id: "E_1".into(),
            slug: slug.to_owned(),
            billing_email: Some("billing@example.com".into()),
        })
    }

    async fn create_org(
        &self,
        _enterprise: &Enterprise,
        login: &str,
        admins: &[String],
    ) -> github_client::Result<Organization> {
        self.pause().await;
        if self.fail_create_org.contains(login) {
            return Err(GithubError::Api {
                status: 422,
                message: "organization login is unavailable".into(),
            });
        }
        self.orgs.lock().unwrap().insert(
            login.to_owned(),
            FakeOrg {
                admins: admins.to_vec(),
                repos: Vec::new(),
            },
        );
        Ok(Organization {
            id: format!("O_{login}"),
            login: login.to_owned(),
            name: Some(login.to_owned()),
        })
    }

    async fn delete_org(&self, login: &str) -> github_client::Result<()> {
        self.pause().await;
        match self.orgs.lock().unwrap().remove(login) {
            Some(_) => Ok(()),
            None => Err(Self::not_found(login)),
        }
    }

    async fn get_organization(&self, login: &str) -> github_client::Result<Organization> {
        if self.orgs.lock().unwrap().contains_key(login) {
            Ok(Organization {
                id: format!("O_{login}"),
                login: login.to_owned(),
                name: None,
            })
        } else {
            Err(Self::not_found(login))
        }
    }

    async fn create_repo_from_template(
        &self,
        org: &str,
        template: &TemplateRepo,
    ) -> github_client::Result<Repository> {
        self.pause().await;
        if self.fail_templates.contains(&template.template) {
            return Err(GithubError::Api {
                status: 422,
                message: "template is not a template repository".into(),
            });
        }
        let name = template.repo_name()?.to_owned();
        let mut orgs = self.orgs.lock().unwrap();
        let entry = orgs.get_mut(org).ok_or_else(|| Self::not_found(org))?;
        entry.repos.push(name.clone());
        Ok(Repository {
            id: entry.repos.len() as i64,
            full_name: format!("{org}/{name}"),
            html_url: format!("https://github.com/{org}/{name}"),
        })
    }

    async fn list_repositories(&self, org: &str) -> github_client::Result<Vec<String>> {
        self.orgs
            .lock()
            .unwrap()
            .get(org)
            .map(|o| o.repos.clone())
            .ok_or_else(|| Self::not_found(org))
    }

    async fn delete_repository(&self, org: &str, name: &str) -> github_client::Result<()> {
        self.pause().await;
        if self.fail_repo_delete.contains(name) {
            return Err(GithubError::Api {
                status: 403,
                message: "must have admin rights to repository".into(),
            });
        }
        let mut orgs = self.orgs.lock().unwrap();
        let entry = orgs.get_mut(org).ok_or_else(|| Self::not_found(org))?;
        let before = entry.repos.len();
        entry.repos.retain(|r| r != name);
        if entry.repos.len() == before {
            return Err(Self::not_found(name));
        }
        Ok(())
    }
}
