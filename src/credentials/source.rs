//! Where credentials come from: a token file on disk, or an interactive flow.

use crate::credentials::error::CredentialError;
use crate::credentials::Credential;
use crate::utils::{ensure_dir_exists, get_config_dir};
use log::{debug, info};
use secrecy::ExposeSecret;
use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

pub const CREDENTIALS_FILE_NAME: &str = "credentials.json";

pub trait CredentialSource {
    fn name(&self) -> &str;

    fn obtain(&self, project: &str) -> Result<Credential, CredentialError>;
}

/// Tokens persisted as a JSON object mapping project to token.
#[derive(Debug, Clone)]
pub struct CachedCredentialSource {
    path: PathBuf,
}

impl CachedCredentialSource {
    /// Uses `credentials.json` in the user configuration directory.
    pub fn new() -> Result<Self, CredentialError> {
        let dir = get_config_dir().ok_or(CredentialError::NoConfigDir)?;
        Ok(Self::in_dir(dir))
    }

    pub fn in_dir(dir: impl AsRef<Path>) -> Self {
        Self {
            path: dir.as_ref().join(CREDENTIALS_FILE_NAME),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Adds or replaces the token of `credential.project`, keeping other projects.
    ///
    /// # Errors
    ///
    /// An unreadable or malformed file is left untouched and reported as
    /// [`CredentialError::Read`] or [`CredentialError::Malformed`].
    pub fn store(&self, credential: &Credential) -> Result<(), CredentialError> {
        let mut tokens = self.read_all()?;
        tokens.insert(
            credential.project.clone(),
            credential.token.expose_secret().to_string(),
        );
        if let Some(parent) = self.path.parent() {
            ensure_dir_exists(parent)
                .map_err(|e| CredentialError::Write(parent.to_path_buf(), e))?;
        }
        let json = serde_json::to_string_pretty(&tokens)?;
        fs::write(&self.path, json).map_err(|e| CredentialError::Write(self.path.clone(), e))?;
        info!("Stored credential for project '{}'", credential.project);
        Ok(())
    }

    /// Every cached token. A missing file is an empty cache.
    fn read_all(&self) -> Result<BTreeMap<String, String>, CredentialError> {
        let text = match fs::read_to_string(&self.path) {
            Ok(text) => text,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(BTreeMap::new()),
            Err(e) => return Err(CredentialError::Read(self.path.clone(), e)),
        };
        serde_json::from_str(&text).map_err(|e| CredentialError::Malformed(self.path.clone(), e))
    }
}

impl CredentialSource for CachedCredentialSource {
    fn name(&self) -> &str {
        "cached"
    }

    fn obtain(&self, project: &str) -> Result<Credential, CredentialError> {
        let tokens = self.read_all()?;
        let token = tokens
            .get(project)
            .ok_or_else(|| CredentialError::NotCached {
                project: project.to_string(),
                reason: format!("no token in {}", self.path.display()),
            })?;
        debug!("Using cached credential for project '{}'", project);
        Ok(Credential::new(project, token.clone()))
    }
}

/// Runs an interactive flow (browser sign-in, prompt, ...) that yields a token, and
/// persists the token to a cache so later runs skip the flow.
pub struct InteractiveCredentialSource<F> {
    flow: F,
    cache: CachedCredentialSource,
}

impl<F> InteractiveCredentialSource<F>
where
    F: Fn(&str) -> Result<String, CredentialError>,
{
    pub fn new(flow: F, cache: CachedCredentialSource) -> Self {
        Self { flow, cache }
    }
}

impl<F> CredentialSource for InteractiveCredentialSource<F>
where
    F: Fn(&str) -> Result<String, CredentialError>,
{
    fn name(&self) -> &str {
        "interactive"
    }

    fn obtain(&self, project: &str) -> Result<Credential, CredentialError> {
        info!("Starting interactive authentication for project '{}'", project);
        let token = (self.flow)(project)?;
        let credential = Credential::new(project, token);
        self.cache.store(&credential)?;
        Ok(credential)
    }
}
