// src/auth.rs
//! Credential resolution for outgoing requests.
//!
//! Strategies form an explicit ordered list tried in sequence; the first one
//! that yields credentials wins, and if every strategy fails the last error is
//! surfaced. The anonymous session header is the primary model; a bearer token
//! from the environment is kept as a legacy override and the two are never
//! combined on a single request.

use anyhow::Result;
use uuid::Uuid;

use crate::session::SessionStore;

const TOKEN_ENV_VAR: &str = "NEXUS_API_TOKEN";

/// What a request carries to identify its caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Credentials {
    /// Legacy flow: token minted by a third-party auth provider.
    Bearer(String),
    /// Anonymous guest attribution via the persisted session identifier.
    Session(Uuid),
}

impl Credentials {
    /// Header name and value this credential contributes.
    pub fn header(&self) -> (&'static str, String) {
        match self {
            Credentials::Bearer(token) => ("Authorization", format!("Bearer {}", token)),
            Credentials::Session(id) => ("X-Session-ID", id.to_string()),
        }
    }
}

#[derive(Debug, Clone, Copy)]
enum Strategy {
    BearerFromEnv,
    AnonymousSession,
}

const STRATEGY_ORDER: [Strategy; 2] = [Strategy::BearerFromEnv, Strategy::AnonymousSession];

/// Resolve credentials for this invocation.
pub fn resolve_credentials(store: &SessionStore) -> Result<Credentials> {
    resolve_with_token(std::env::var(TOKEN_ENV_VAR).ok(), store)
}

fn resolve_with_token(token: Option<String>, store: &SessionStore) -> Result<Credentials> {
    let mut last_err = None;

    for strategy in STRATEGY_ORDER {
        match strategy.attempt(token.as_deref(), store) {
            Ok(Some(credentials)) => return Ok(credentials),
            Ok(None) => continue,
            Err(e) => last_err = Some(e),
        }
    }

    Err(last_err.unwrap_or_else(|| anyhow::anyhow!("No credential strategy produced a result")))
}

impl Strategy {
    /// `Ok(None)` means "not applicable, try the next one".
    fn attempt(&self, token: Option<&str>, store: &SessionStore) -> Result<Option<Credentials>> {
        match self {
            Strategy::BearerFromEnv => Ok(token
                .map(str::trim)
                .filter(|t| !t.is_empty())
                .map(|t| Credentials::Bearer(t.to_string()))),
            Strategy::AnonymousSession => {
                store.get_or_create().map(|id| Some(Credentials::Session(id)))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_bearer_token_wins_when_present() {
        let dir = tempdir().unwrap();
        let store = SessionStore::new(dir.path());
        let credentials = resolve_with_token(Some("tok-123".to_string()), &store).unwrap();
        assert_eq!(credentials, Credentials::Bearer("tok-123".to_string()));
    }

    #[test]
    fn test_blank_token_falls_through_to_session() {
        let dir = tempdir().unwrap();
        let store = SessionStore::new(dir.path());
        let credentials = resolve_with_token(Some("   ".to_string()), &store).unwrap();
        assert!(matches!(credentials, Credentials::Session(_)));
    }

    #[test]
    fn test_session_fallback_is_stable() {
        let dir = tempdir().unwrap();
        let store = SessionStore::new(dir.path());
        let first = resolve_with_token(None, &store).unwrap();
        let second = resolve_with_token(None, &store).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_bearer_header_shape() {
        let (name, value) = Credentials::Bearer("abc".to_string()).header();
        assert_eq!(name, "Authorization");
        assert_eq!(value, "Bearer abc");
    }

    #[test]
    fn test_session_header_shape() {
        let id = Uuid::new_v4();
        let (name, value) = Credentials::Session(id).header();
        assert_eq!(name, "X-Session-ID");
        assert_eq!(value, id.to_string());
    }
}
