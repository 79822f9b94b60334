use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum LabError {
    #[error("no credentials provided: pass at least one token")]
    NoCredentials,

    #[error("lab date must not be empty")]
    EmptyLabDate,

    #[error("unsupported file extension '{extension}' for {path}")]
    UnsupportedExtension { path: PathBuf, extension: String },

    #[error("invalid template reference '{0}': expected 'owner/name'")]
    InvalidTemplate(String),

    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Yaml(#[from] serde_yaml::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, LabError>;
