// src/types/credentials.rs
//! Access tokens and the credential store seam.
//!
//! Tokens are owned by an external credential store keyed by a logical
//! user identity. This crate never persists them; it only borrows one per
//! client. A missing token fails fast as `AppError::NotConnected` before
//! any network call — it is not a retryable condition.

use crate::error::{AppError, ValidationError};
use std::collections::HashMap;
use std::fmt;

/// Opaque bearer token for API authentication.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccessToken(String);

impl AccessToken {
    /// Create a new token with validation.
    pub fn new(token: impl Into<String>) -> Result<Self, ValidationError> {
        let token = token.into();

        if token.is_empty() {
            return Err(ValidationError::InvalidToken {
                reason: "token cannot be empty".to_string(),
            });
        }

        if !token.starts_with("secret_") && !token.starts_with("ntn_") {
            return Err(ValidationError::InvalidToken {
                reason: "token must start with 'secret_' or 'ntn_'".to_string(),
            });
        }

        if token.len() < 20 {
            return Err(ValidationError::InvalidToken {
                reason: "token is too short".to_string(),
            });
        }

        Ok(Self(token))
    }

    /// Get the token as a string reference
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Create a token without validation (only for testing)
    #[cfg(test)]
    pub fn new_unchecked(token: impl Into<String>) -> Self {
        Self(token.into())
    }
}

impl fmt::Display for AccessToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Redact in display — tokens must never land in logs
        write!(f, "{}...", &self.0[..self.0.len().min(10)])
    }
}

/// Logical user identity a credential is stored under.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct UserKey(String);

impl UserKey {
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for UserKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The ability to look up a user's API token.
///
/// Implemented by whatever owns credentials in the host application.
/// Absence of a token is `AppError::NotConnected`.
pub trait CredentialStore: Send + Sync {
    fn token_for(&self, user: &UserKey) -> Result<AccessToken, AppError>;
}

/// In-memory credential store for tests and embedding callers.
#[derive(Debug, Default)]
pub struct InMemoryCredentialStore {
    tokens: HashMap<UserKey, AccessToken>,
}

impl InMemoryCredentialStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, user: UserKey, token: AccessToken) {
        self.tokens.insert(user, token);
    }
}

impl CredentialStore for InMemoryCredentialStore {
    fn token_for(&self, user: &UserKey) -> Result<AccessToken, AppError> {
        self.tokens
            .get(user)
            .cloned()
            .ok_or_else(|| AppError::NotConnected(user.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn token_validation() {
        assert!(AccessToken::new("secret_abcdefghijklmnopqrs").is_ok());
        assert!(AccessToken::new("ntn_abcdefghijklmnopqrstu").is_ok());
        assert!(AccessToken::new("").is_err());
        assert!(AccessToken::new("invalid_token").is_err());
        assert!(AccessToken::new("secret_short").is_err());
    }

    #[test]
    fn display_redacts() {
        let token = AccessToken::new("secret_abcdefghijklmnopqrs").unwrap();
        let shown = token.to_string();
        assert!(shown.ends_with("..."));
        assert!(!shown.contains("ijklmnopqrs"));
    }

    #[test]
    fn missing_credential_is_not_connected() {
        let store = InMemoryCredentialStore::new();
        let err = store.token_for(&UserKey::new("user-7")).unwrap_err();
        assert!(matches!(err, AppError::NotConnected(_)));
    }

    #[test]
    fn present_credential_is_returned() {
        let mut store = InMemoryCredentialStore::new();
        store.insert(
            UserKey::new("user-7"),
            AccessToken::new_unchecked("secret_abcdefghijklmnopqrs"),
        );
        assert!(store.token_for(&UserKey::new("user-7")).is_ok());
    }
}
