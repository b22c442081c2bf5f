use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use tracing::debug;

use super::{AuthError, Token, TokenClaims, TokenStore};

/// Buffer time before expiry to trigger refresh (5 minutes)
const TOKEN_REFRESH_BUFFER_MINUTES: i64 = 5;

/// Owns the lifecycle of the single bearer token.
///
/// Authentication state is never cached: every check re-reads the store
/// and re-decodes the token.
#[derive(Clone)]
pub struct SessionManager {
    store: Arc<dyn TokenStore>,
}

impl SessionManager {
    pub fn new(store: Arc<dyn TokenStore>) -> Self {
        Self { store }
    }

    /// Read the persisted token. No validation is performed.
    pub fn get_token(&self) -> Result<Option<Token>, AuthError> {
        self.store.get()
    }

    pub fn set_token(&self, token: &Token) -> Result<(), AuthError> {
        self.store.set(token)
    }

    /// Delete the persisted token. Safe to call when nothing is stored.
    pub fn remove_token(&self) -> Result<(), AuthError> {
        self.store.remove()
    }

    /// Whether a token is stored and its `exp` is still in the future.
    ///
    /// A stored token that cannot be decoded is an error, not `false`.
    pub fn is_authenticated(&self) -> Result<bool, AuthError> {
        self.is_authenticated_at(Utc::now())
    }

    pub fn is_authenticated_at(&self, now: DateTime<Utc>) -> Result<bool, AuthError> {
        match self.claims()? {
            Some(claims) => {
                let valid = claims.is_valid_at(now);
                debug!(exp = claims.exp, valid, "Checked token expiry");
                Ok(valid)
            }
            None => Ok(false),
        }
    }

    /// Decoded payload of the stored token, if any
    pub fn claims(&self) -> Result<Option<TokenClaims>, AuthError> {
        match self.store.get()? {
            Some(token) => token.claims().map(Some),
            None => Ok(None),
        }
    }

    pub fn username(&self) -> Result<Option<String>, AuthError> {
        Ok(self
            .claims()?
            .and_then(|c| c.display_name().map(str::to_string)))
    }

    pub fn expires_at(&self) -> Result<Option<DateTime<Utc>>, AuthError> {
        Ok(self.claims()?.and_then(|c| c.expires_at()))
    }

    /// Check if the token will expire soon and should be refreshed
    pub fn needs_refresh_at(&self, now: DateTime<Utc>) -> Result<bool, AuthError> {
        Ok(match self.expires_at()? {
            Some(expiry) => now > expiry - Duration::minutes(TOKEN_REFRESH_BUFFER_MINUTES),
            None => false,
        })
    }

    pub fn needs_refresh(&self) -> Result<bool, AuthError> {
        self.needs_refresh_at(Utc::now())
    }

    /// Get minutes remaining until expiry (for display)
    pub fn minutes_until_expiry(&self) -> Result<Option<i64>, AuthError> {
        Ok(self
            .expires_at()?
            .map(|expiry| (expiry - Utc::now()).num_minutes().max(0)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::token::test_support::token_with_payload;
    use crate::auth::MemoryTokenStore;
    use chrono::TimeZone;
    use serde_json::json;

    fn manager() -> SessionManager {
        SessionManager::new(Arc::new(MemoryTokenStore::new()))
    }

    #[test]
    fn test_set_then_get_returns_same_token() {
        let session = manager();
        let token = Token::new("header.payload.sig-with-_chars==");
        session.set_token(&token).unwrap();
        assert_eq!(session.get_token().unwrap().unwrap().as_str(), token.as_str());
    }

    #[test]
    fn test_remove_token_twice() {
        let session = manager();
        session.set_token(&Token::new("a.b.c")).unwrap();
        session.remove_token().unwrap();
        session.remove_token().unwrap();
        assert!(session.get_token().unwrap().is_none());
    }

    #[test]
    fn test_not_authenticated_without_token() {
        assert!(!manager().is_authenticated().unwrap());
    }

    #[test]
    fn test_authenticated_follows_exp() {
        let session = manager();
        let now = Utc.timestamp_opt(1_700_000_000, 0).unwrap();

        for (exp, expected) in [(1_700_000_001, true), (1_700_000_000, false), (1_600_000_000, false)] {
            session
                .set_token(&token_with_payload(&json!({"exp": exp, "username": "alice"})))
                .unwrap();
            assert_eq!(session.is_authenticated_at(now).unwrap(), expected, "exp = {}", exp);
        }
    }

    #[test]
    fn test_malformed_token_is_an_error() {
        let session = manager();
        session.set_token(&Token::new("garbage")).unwrap();
        assert!(matches!(
            session.is_authenticated(),
            Err(AuthError::MalformedToken(_))
        ));
    }

    #[test]
    fn test_needs_refresh_within_buffer() {
        let session = manager();
        let now = Utc.timestamp_opt(1_700_000_000, 0).unwrap();

        session
            .set_token(&token_with_payload(&json!({"exp": 1_700_000_000 + 60})))
            .unwrap();
        assert!(session.needs_refresh_at(now).unwrap());

        session
            .set_token(&token_with_payload(&json!({"exp": 1_700_000_000 + 3600})))
            .unwrap();
        assert!(!session.needs_refresh_at(now).unwrap());
    }

    #[test]
    fn test_username_from_claims() {
        let session = manager();
        assert_eq!(session.username().unwrap(), None);
        session
            .set_token(&token_with_payload(&json!({"exp": 1, "sub": "admin"})))
            .unwrap();
        assert_eq!(session.username().unwrap().as_deref(), Some("admin"));
    }
}
