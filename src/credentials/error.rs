use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CredentialError {
    #[error("No cached credential for project '{project}': {reason}")]
    NotCached { project: String, reason: String },

    #[error("Failed to read credentials from '{0}'")]
    Read(PathBuf, #[source] std::io::Error),

    #[error("Credentials file '{0}' is malformed: {1}")]
    Malformed(PathBuf, #[source] serde_json::Error),

    #[error("Could not determine the user configuration directory")]
    NoConfigDir,

    #[error("Failed to write credentials to '{0}'")]
    Write(PathBuf, #[source] std::io::Error),

    #[error("Failed to serialize credentials: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("Interactive authentication failed: {0}")]
    Interactive(String),

    #[error("Authentication failed after re-authenticating once: {first}; then: {second}")]
    Exhausted {
        first: Box<CredentialError>,
        second: Box<CredentialError>,
    },
}
