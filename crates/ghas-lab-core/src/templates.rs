use crate::error::{LabError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// A repository to generate from a GitHub template.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "TemplateEntry")]
pub struct TemplateRepo {
    /// Template reference in `owner/name` form.
    pub template: String,
    pub include_all_branches: bool,
}

/// A bare string is shorthand for `{ template, include_all_branches: false }`.
#[derive(Deserialize)]
#[serde(untagged)]
enum TemplateEntry {
    Short(String),
    Full {
        template: String,
        #[serde(default)]
        include_all_branches: bool,
    },
}

impl From<TemplateEntry> for TemplateRepo {
    fn from(entry: TemplateEntry) -> Self {
        match entry {
            TemplateEntry::Short(template) => TemplateRepo {
                template,
                include_all_branches: false,
            },
            TemplateEntry::Full {
                template,
                include_all_branches,
            } => TemplateRepo {
                template,
                include_all_branches,
            },
        }
    }
}

impl TemplateRepo {
    pub fn new(template: impl Into<String>, include_all_branches: bool) -> Self {
        Self {
            template: template.into(),
            include_all_branches,
        }
    }

    /// Split the reference into `(owner, name)`.
    pub fn owner_and_name(&self) -> Result<(&str, &str)> {
        match self.template.split_once('/') {
            Some((owner, name))
                if !owner.is_empty() && !name.is_empty() && !name.contains('/') =>
            {
                Ok((owner, name))
            }
            _ => Err(LabError::InvalidTemplate(self.template.clone())),
        }
    }

    /// Name the generated repository takes inside the target organization.
    pub fn repo_name(&self) -> Result<&str> {
        self.owner_and_name().map(|(_, name)| name)
    }
}

#[derive(Debug, Deserialize)]
struct TemplateReposFile {
    #[serde(rename = "lab-env-setup")]
    lab_env_setup: LabEnvSetup,
}

#[derive(Debug, Deserialize)]
struct LabEnvSetup {
    #[serde(default)]
    repos: Vec<TemplateRepo>,
}

/// Parse a template repositories document:
///
/// ```json
/// {"lab-env-setup": {"repos": [
///     "owner/a",
///     {"template": "owner/b", "include_all_branches": true}
/// ]}}
/// ```
pub fn parse(json: &str) -> Result<Vec<TemplateRepo>> {
    let file: TemplateReposFile = serde_json::from_str(json)?;
    let repos = file.lab_env_setup.repos;
    for repo in &repos {
        repo.owner_and_name()?;
    }
    Ok(repos)
}

pub fn load(path: &Path) -> Result<Vec<TemplateRepo>> {
    let data = std::fs::read_to_string(path).map_err(|source| LabError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    parse(&data)
}

/// Repository names listed in a template file, for targeted deletion.
pub fn load_repo_names(path: &Path) -> Result<Vec<String>> {
    load(path)?
        .iter()
        .map(|t| t.repo_name().map(str::to_owned))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn bare_string_is_shorthand() {
        let repo: TemplateRepo = serde_json::from_str(r#""octo/template-repo""#).unwrap();
        assert_eq!(repo, TemplateRepo::new("octo/template-repo", false));
    }

    #[test]
    fn object_form_keeps_flag() {
        let repo: TemplateRepo =
            serde_json::from_str(r#"{"template":"octo/x","include_all_branches":true}"#).unwrap();
        assert_eq!(repo, TemplateRepo::new("octo/x", true));
    }

    #[test]
    fn object_form_flag_defaults_false() {
        let repo: TemplateRepo = serde_json::from_str(r#"{"template":"octo/x"}"#).unwrap();
        assert!(!repo.include_all_branches);
    }

    #[test]
    fn parse_mixed_document_preserves_order() {
        let json = r#"{
            "lab-env-setup": {
                "repos": [
                    "octo/first",
                    {"template": "octo/second", "include_all_branches": true},
                    "octo/third"
                ]
            }
        }"#;
        let repos = parse(json).unwrap();
        let names: Vec<_> = repos.iter().map(|r| r.template.as_str()).collect();
        assert_eq!(names, vec!["octo/first", "octo/second", "octo/third"]);
        assert!(repos[1].include_all_branches);
    }

    #[test]
    fn parse_rejects_bad_reference() {
        let json = r#"{"lab-env-setup": {"repos": ["no-owner"]}}"#;
        assert!(matches!(parse(json), Err(LabError::InvalidTemplate(_))));
    }

    #[test]
    fn parse_rejects_missing_section() {
        assert!(matches!(parse(r#"{"repos": []}"#), Err(LabError::Json(_))));
    }

    #[test]
    fn repo_name_is_last_segment() {
        let repo = TemplateRepo::new("octo/juice-shop", false);
        assert_eq!(repo.repo_name().unwrap(), "juice-shop");
        assert_eq!(repo.owner_and_name().unwrap(), ("octo", "juice-shop"));
    }

    #[test]
    fn load_repo_names_from_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("repos.json");
        std::fs::write(
            &path,
            r#"{"lab-env-setup": {"repos": ["octo/a", {"template": "octo/b"}]}}"#,
        )
        .unwrap();
        assert_eq!(load_repo_names(&path).unwrap(), vec!["a", "b"]);
    }
}
