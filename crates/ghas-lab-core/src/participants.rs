//! Participant list loading.
//!
//! Supported formats, chosen by file extension:
//!
//! - `.txt`  — identifiers separated by commas and/or newlines
//! - `.yaml` / `.yml` — a sequence of strings
//! - `.json` — an array of strings
//!
//! Entries are trimmed, blanks dropped, and duplicates removed keeping the
//! first occurrence so every participant maps to exactly one work unit.

use crate::error::{LabError, Result};
use std::collections::HashSet;
use std::path::Path;

pub fn load(path: &Path) -> Result<Vec<String>> {
    let data = std::fs::read_to_string(path).map_err(|source| LabError::Read {
        path: path.to_path_buf(),
        source,
    })?;

    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or_default()
        .to_ascii_lowercase();

    let raw = match extension.as_str() {
        "txt" => parse_text(&data),
        "yaml" | "yml" => parse_yaml(&data)?,
        "json" => serde_json::from_str::<Vec<String>>(&data)?,
        _ => {
            return Err(LabError::UnsupportedExtension {
                path: path.to_path_buf(),
                extension,
            })
        }
    };

    Ok(normalize(raw))
}

fn parse_text(data: &str) -> Vec<String> {
    data.split([',', '\n'])
        .map(|s| s.trim().to_owned())
        .collect()
}

fn parse_yaml(data: &str) -> Result<Vec<String>> {
    // An empty or comment-only document deserializes as null.
    let list: Option<Vec<String>> = serde_yaml::from_str(data)?;
    Ok(list.unwrap_or_default())
}

fn normalize(raw: Vec<String>) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut users = Vec::with_capacity(raw.len());
    for entry in raw {
        let entry = entry.trim();
        if entry.is_empty() {
            continue;
        }
        if !seen.insert(entry.to_owned()) {
            tracing::warn!(user = entry, "duplicate participant ignored");
            continue;
        }
        users.push(entry.to_owned());
    }
    users
}
