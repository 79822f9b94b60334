use crate::error::{LabError, Result};
use serde::{Deserialize, Serialize};

/// Prefix shared by every lab organization login.
pub const ORG_PREFIX: &str = "ghas-labs";

/// Organization login for `user` in the lab held on `lab_date`.
///
/// Create and delete paths both go through here, so the same inputs always
/// address the same organization.
pub fn org_login(lab_date: &str, user: &str) -> String {
    format!("{ORG_PREFIX}-{lab_date}-{user}")
}

/// One time-boxed training exercise.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LabSpec {
    /// Date string identifying the lab, e.g. `2024-06-15`.
    pub lab_date: String,
    /// GitHub logins added as admins to every participant organization.
    #[serde(default)]
    pub facilitators: Vec<String>,
}

impl LabSpec {
    pub fn new(lab_date: impl Into<String>, facilitators: Vec<String>) -> Result<Self> {
        let lab_date = lab_date.into().trim().to_owned();
        if lab_date.is_empty() {
            return Err(LabError::EmptyLabDate);
        }
        Ok(Self {
            lab_date,
            facilitators,
        })
    }

    pub fn org_login(&self, user: &str) -> String {
        org_login(&self.lab_date, user)
    }

    /// Admin logins for a participant's organization: the participant first,
    /// then facilitators (skipping a facilitator equal to the participant).
    pub fn admins_for(&self, user: &str) -> Vec<String> {
        let mut admins = Vec::with_capacity(self.facilitators.len() + 1);
        admins.push(user.to_owned());
        admins.extend(
            self.facilitators
                .iter()
                .filter(|f| f.as_str() != user)
                .cloned(),
        );
        admins
    }
}
