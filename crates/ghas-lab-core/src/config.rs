use crate::error::{LabError, Result};

/// Default GitHub REST endpoint; GraphQL lives at `<base>/graphql`.
pub const DEFAULT_BASE_URL: &str = "https://api.github.com";

/// Upper bound on concurrent provisioning/teardown workers.
pub const MAX_WORKERS: usize = 9;

/// Number of repository creations after which the active token is rotated.
pub const ROTATE_EVERY: u64 = 150;

/// Default run deadline for lab-wide operations.
pub const DEFAULT_TIMEOUT_MINUTES: u64 = 60;

/// Worker pool size for `participants` work units.
pub fn worker_count(participants: usize) -> usize {
    participants.min(MAX_WORKERS)
}

/// Split a comma-separated flag value, trimming entries and dropping blanks.
pub fn split_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_owned)
        .collect()
}

/// Parse the `--token` value into an ordered credential set.
///
/// The set is captured once at startup and must not be empty.
pub fn parse_credentials(raw: &str) -> Result<Vec<String>> {
    let tokens = split_list(raw);
    if tokens.is_empty() {
        return Err(LabError::NoCredentials);
    }
    Ok(tokens)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn worker_count_is_capped() {
        assert_eq!(worker_count(0), 0);
        assert_eq!(worker_count(3), 3);
        assert_eq!(worker_count(9), 9);
        assert_eq!(worker_count(250), 9);
    }

    #[test]
    fn split_list_trims_and_drops_blanks() {
        assert_eq!(
            split_list(" alice, bob ,,carol,"),
            vec!["alice", "bob", "carol"]
        );
        assert!(split_list("").is_empty());
    }

    #[test]
    fn parse_credentials_keeps_order() {
        let tokens = parse_credentials("ghp_one,ghp_two, ghp_three").unwrap();
        assert_eq!(tokens, vec!["ghp_one", "ghp_two", "ghp_three"]);
    }

    #[test]
    fn parse_credentials_rejects_empty() {
        assert!(matches!(
            parse_credentials(" , "),
            Err(LabError::NoCredentials)
        ));
    }
}
