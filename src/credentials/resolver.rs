//! Two-stage session initialization: the cached credential first, the interactive
//! flow at most once after that.

use crate::credentials::error::CredentialError;
use crate::credentials::source::CredentialSource;
use crate::credentials::Session;
use log::{info, warn};

pub struct SessionResolver<C, I> {
    cached: C,
    interactive: I,
}

impl<C, I> SessionResolver<C, I>
where
    C: CredentialSource,
    I: CredentialSource,
{
    pub fn new(cached: C, interactive: I) -> Self {
        Self {
            cached,
            interactive,
        }
    }

    /// Initializes a session for `project`.
    ///
    /// When the cached credential is missing, the interactive source runs once and
    /// initialization is attempted once more against the cache it refreshed.
    ///
    /// # Errors
    ///
    /// [`CredentialError::Exhausted`] holding the first failure and the failure of
    /// the second attempt.
    pub fn resolve(&self, project: &str) -> Result<Session, CredentialError> {
        let first = match self.cached.obtain(project) {
            Ok(credential) => return Ok(Session::new(credential, self.cached.name())),
            Err(e) => e,
        };
        warn!("Initialization failed ({first}), re-authenticating");

        let second = match self
            .interactive
            .obtain(project)
            .and_then(|_| self.cached.obtain(project))
        {
            Ok(credential) => {
                info!("Session initialized after interactive authentication");
                return Ok(Session::new(credential, self.interactive.name()));
            }
            Err(e) => e,
        };
        Err(CredentialError::Exhausted {
            first: Box::new(first),
            second: Box::new(second),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::credentials::source::{CachedCredentialSource, InteractiveCredentialSource};
    use crate::credentials::Credential;
    use secrecy::ExposeSecret;
    use std::cell::Cell;
    use tempfile::tempdir;

    #[test]
    fn test_cached_credential_skips_interactive() {
        let dir = tempdir().unwrap();
        let cache = CachedCredentialSource::in_dir(dir.path());
        cache.store(&Credential::new("demo", "cached-token")).unwrap();
        let calls = Cell::new(0);
        let interactive = InteractiveCredentialSource::new(
            |_: &str| {
                calls.set(calls.get() + 1);
                Ok("new".to_string())
            },
            cache.clone(),
        );

        let session = SessionResolver::new(cache, interactive).resolve("demo").unwrap();
        assert_eq!(session.token().expose_secret(), "cached-token");
        assert_eq!(session.source(), "cached");
        assert_eq!(calls.get(), 0);
    }

    #[test]
    fn test_interactive_runs_once_when_cache_is_empty() {
        let dir = tempdir().unwrap();
        let cache = CachedCredentialSource::in_dir(dir.path());
        let calls = Cell::new(0);
        let interactive = InteractiveCredentialSource::new(
            |_: &str| {
                calls.set(calls.get() + 1);
                Ok("browser-token".to_string())
            },
            cache.clone(),
        );

        let session = SessionResolver::new(cache, interactive).resolve("demo").unwrap();
        assert_eq!(session.token().expose_secret(), "browser-token");
        assert_eq!(session.project(), "demo");
        assert_eq!(session.source(), "interactive");
        assert_eq!(calls.get(), 1);
    }

    #[test]
    fn test_second_failure_is_fatal() {
        let dir = tempdir().unwrap();
        let cache = CachedCredentialSource::in_dir(dir.path());
        let calls = Cell::new(0);
        let interactive = InteractiveCredentialSource::new(
            |_: &str| {
                calls.set(calls.get() + 1);
                Err(CredentialError::Interactive("user cancelled".to_string()))
            },
            cache.clone(),
        );

        let result = SessionResolver::new(cache, interactive).resolve("demo");
        match result {
            Err(CredentialError::Exhausted { first, second }) => {
                assert!(matches!(*first, CredentialError::NotCached { .. }));
                assert!(matches!(*second, CredentialError::Interactive(_)));
            }
            other => panic!("expected exhausted, got {other:?}"),
        }
        assert_eq!(calls.get(), 1);
    }
}
