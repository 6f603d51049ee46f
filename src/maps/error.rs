use crate::credentials::error::CredentialError;
use reqwest::StatusCode;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum MapError {
    #[error("Network request to {0} failed")]
    NetworkRequest(String, #[source] reqwest::Error),

    #[error("Tile service at {url} returned HTTP status {status}")]
    HttpStatus {
        url: String,
        status: StatusCode,
        #[source]
        source: reqwest::Error,
    },

    #[error("Tile service response could not be decoded: {0}")]
    InvalidResponse(#[source] reqwest::Error),

    #[error("Failed to write map to '{0}'")]
    Write(PathBuf, #[source] std::io::Error),

    #[error("Failed to render map page: {0}")]
    Template(#[from] tera::Error),

    #[error("Failed to encode map settings: {0}")]
    Encode(#[from] serde_json::Error),

    #[error("Unknown map theme '{0}'")]
    UnknownTheme(String),

    #[error(transparent)]
    Credential(#[from] CredentialError),
}
