//! Credentials for the geospatial tile service and the policy for obtaining them.

pub mod error;
pub mod resolver;
pub mod source;

use secrecy::SecretString;
use serde::Deserialize;

/// A bearer token scoped to one cloud project. The token never shows up in `Debug`
/// output.
#[derive(Debug, Clone, Deserialize)]
pub struct Credential {
    pub project: String,
    pub token: SecretString,
}

impl Credential {
    pub fn new(project: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            project: project.into(),
            token: SecretString::from(token.into()),
        }
    }
}

/// An initialized, project-scoped session.
#[derive(Debug, Clone)]
pub struct Session {
    credential: Credential,
    source: String,
}

impl Session {
    pub fn new(credential: Credential, source: impl Into<String>) -> Self {
        Self {
            credential,
            source: source.into(),
        }
    }

    pub fn project(&self) -> &str {
        &self.credential.project
    }

    pub fn token(&self) -> &SecretString {
        &self.credential.token
    }

    /// Name of the credential source the session was initialized from.
    pub fn source(&self) -> &str {
        &self.source
    }
}
