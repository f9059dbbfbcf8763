//! Session identity resolution.
//!
//! The persisted credential is read once, decoded once, and the result is
//! handed to every view as a [`SessionContext`]. Views never touch client
//! storage themselves.

pub mod store;

use thiserror::Error;

use crate::auth::{decode_credential, Claims};
use crate::config::{AuthPolicy, SessionConfig};
use crate::types::UserId;

pub use store::{CredentialStore, FileCredentialStore, MemoryCredentialStore};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SessionError {
    #[error("No session credential stored")]
    NoCredential,

    #[error("Invalid session credential: {0}")]
    InvalidCredential(String),

    #[error("Credential storage error: {0}")]
    Storage(String),
}

impl SessionError {
    pub fn invalid(reason: impl Into<String>) -> Self {
        SessionError::InvalidCredential(reason.into())
    }
}

/// Why a session resolved to nobody
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Unauthenticated {
    NoCredential,
    InvalidCredential(String),
}

/// Resolved identity for the lifetime of one command.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionContext {
    state: SessionState,
}

#[derive(Debug, Clone, PartialEq)]
enum SessionState {
    Authenticated { claims: Claims, token: String },
    Unauthenticated(Unauthenticated),
}

/// What a view may do after checking its policy
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Access {
    /// Carry on, as this user or anonymously
    Granted(Option<UserId>),
    RedirectToLogin,
}

impl SessionContext {
    pub fn authenticated(claims: Claims, token: impl Into<String>) -> Self {
        Self {
            state: SessionState::Authenticated {
                claims,
                token: token.into(),
            },
        }
    }

    pub fn anonymous() -> Self {
        Self {
            state: SessionState::Unauthenticated(Unauthenticated::NoCredential),
        }
    }

    fn rejected(reason: String) -> Self {
        Self {
            state: SessionState::Unauthenticated(Unauthenticated::InvalidCredential(reason)),
        }
    }

    pub fn user_id(&self) -> Option<&UserId> {
        match &self.state {
            SessionState::Authenticated { claims, .. } => Some(&claims.user_id),
            SessionState::Unauthenticated(_) => None,
        }
    }

    pub fn claims(&self) -> Option<&Claims> {
        match &self.state {
            SessionState::Authenticated { claims, .. } => Some(claims),
            SessionState::Unauthenticated(_) => None,
        }
    }

    /// Raw credential, for `Authorization: Bearer` on write endpoints
    pub fn token(&self) -> Option<&str> {
        match &self.state {
            SessionState::Authenticated { token, .. } => Some(token),
            SessionState::Unauthenticated(_) => None,
        }
    }

    pub fn unauthenticated_reason(&self) -> Option<&Unauthenticated> {
        match &self.state {
            SessionState::Authenticated { .. } => None,
            SessionState::Unauthenticated(reason) => Some(reason),
        }
    }

    pub fn authorize(&self, policy: &AuthPolicy) -> Access {
        match &self.state {
            SessionState::Authenticated { claims, .. } => Access::Granted(Some(claims.user_id.clone())),
            SessionState::Unauthenticated(Unauthenticated::NoCredential) => {
                if policy.redirect_on_missing {
                    Access::RedirectToLogin
                } else {
                    Access::Granted(None)
                }
            }
            SessionState::Unauthenticated(Unauthenticated::InvalidCredential(reason)) => {
                if policy.redirect_on_invalid {
                    Access::RedirectToLogin
                } else {
                    tracing::warn!("ignoring unreadable session credential: {}", reason);
                    Access::Granted(None)
                }
            }
        }
    }
}

/// Reads the credential out of client storage and decodes it.
pub struct SessionResolver<'a> {
    store: &'a dyn CredentialStore,
    config: &'a SessionConfig,
}

impl<'a> SessionResolver<'a> {
    pub fn new(store: &'a dyn CredentialStore, config: &'a SessionConfig) -> Self {
        Self { store, config }
    }

    /// Decode the stored credential, keeping missing and malformed apart.
    pub fn resolve(&self) -> Result<Claims, SessionError> {
        let raw = self.store.get(&self.config.credential_key)?;
        resolve_credential(raw.as_deref(), self.config.validate_expiry)
    }

    /// Build the context views receive. Storage failures count as no
    /// credential: the user can still log in again.
    pub fn context(&self) -> SessionContext {
        let raw = match self.store.get(&self.config.credential_key) {
            Ok(raw) => raw,
            Err(e) => {
                tracing::warn!("could not read credential storage: {}", e);
                None
            }
        };

        match resolve_credential(raw.as_deref(), self.config.validate_expiry) {
            Ok(claims) => {
                tracing::debug!(user_id = %claims.user_id, "session resolved");
                // resolve_credential only succeeds on a present token
                SessionContext::authenticated(claims, raw.unwrap_or_default().trim())
            }
            Err(SessionError::InvalidCredential(reason)) => SessionContext::rejected(reason),
            Err(_) => SessionContext::anonymous(),
        }
    }

    pub fn store_credential(&self, token: &str) -> Result<Claims, SessionError> {
        let claims = resolve_credential(Some(token), self.config.validate_expiry)?;
        self.store.set(&self.config.credential_key, token.trim())?;
        Ok(claims)
    }

    pub fn clear(&self) -> Result<(), SessionError> {
        self.store.remove(&self.config.credential_key)
    }
}

/// `None` and blank strings are both "no credential".
pub fn resolve_credential(raw: Option<&str>, validate_expiry: bool) -> Result<Claims, SessionError> {
    match raw {
        None => Err(SessionError::NoCredential),
        Some(token) => decode_credential(token, validate_expiry),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AppConfig;
    use crate::testing::mint_token;
    use serde_json::json;

    fn config() -> SessionConfig {
        AppConfig::development().session
    }

    #[test]
    fn absent_and_malformed_are_distinct() {
        assert_eq!(resolve_credential(None, false), Err(SessionError::NoCredential));
        assert_eq!(resolve_credential(Some(""), false), Err(SessionError::NoCredential));
        assert!(matches!(
            resolve_credential(Some("a.b.c"), false),
            Err(SessionError::InvalidCredential(_))
        ));
    }

    #[test]
    fn context_exposes_user_id_and_token() {
        let store = MemoryCredentialStore::new();
        let token = mint_token(json!({ "id": 3 }));
        store.set("token", &token).unwrap();

        let cfg = config();
        let ctx = SessionResolver::new(&store, &cfg).context();
        assert_eq!(ctx.user_id(), Some(&UserId::new("3")));
        assert_eq!(ctx.token(), Some(token.as_str()));
        assert!(ctx.unauthenticated_reason().is_none());
    }

    #[test]
    fn context_without_credential_is_anonymous() {
        let store = MemoryCredentialStore::new();
        let cfg = config();
        let ctx = SessionResolver::new(&store, &cfg).context();
        assert_eq!(ctx.user_id(), None);
        assert_eq!(ctx.unauthenticated_reason(), Some(&Unauthenticated::NoCredential));
    }

    #[test]
    fn policy_decides_redirects() {
        let missing = SessionContext::anonymous();
        let invalid = SessionContext::rejected("bad".into());

        assert_eq!(missing.authorize(&AuthPolicy::REQUIRED), Access::RedirectToLogin);
        assert_eq!(invalid.authorize(&AuthPolicy::REQUIRED), Access::RedirectToLogin);
        assert_eq!(missing.authorize(&AuthPolicy::ANONYMOUS), Access::Granted(None));
        assert_eq!(invalid.authorize(&AuthPolicy::ANONYMOUS), Access::Granted(None));

        let mixed = AuthPolicy {
            redirect_on_missing: false,
            redirect_on_invalid: true,
        };
        assert_eq!(missing.authorize(&mixed), Access::Granted(None));
        assert_eq!(invalid.authorize(&mixed), Access::RedirectToLogin);
    }

    #[test]
    fn store_credential_rejects_garbage_without_writing() {
        let store = MemoryCredentialStore::new();
        let cfg = config();
        let resolver = SessionResolver::new(&store, &cfg);

        assert!(resolver.store_credential("garbage").is_err());
        assert_eq!(store.get("token").unwrap(), None);

        let token = mint_token(json!({ "id": "u1" }));
        let claims = resolver.store_credential(&token).unwrap();
        assert_eq!(claims.user_id, UserId::new("u1"));
        assert_eq!(resolver.resolve().unwrap().user_id, UserId::new("u1"));

        resolver.clear().unwrap();
        assert_eq!(resolver.resolve(), Err(SessionError::NoCredential));
    }
}
