//! Page-load authentication guard.
//!
//! Runs once per page load: pages other than the login page require a
//! stored, unexpired token, and the signed-in user's name is written into
//! the page's user slot when it has one. There is no re-check after load.

use chrono::{DateTime, Utc};
use tracing::{debug, warn};

use crate::auth::SessionManager;
use crate::navigation::{Navigator, LOGIN_PATH};
use crate::page::Page;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuardOutcome {
    /// The login page is never guarded
    Skipped,
    RedirectedToLogin,
    Authenticated { username: Option<String> },
}

pub struct PageGuard<'a> {
    session: &'a SessionManager,
    navigator: &'a dyn Navigator,
}

impl<'a> PageGuard<'a> {
    pub fn new(session: &'a SessionManager, navigator: &'a dyn Navigator) -> Self {
        Self { session, navigator }
    }

    pub fn check(&self, page: &mut Page) -> GuardOutcome {
        self.check_at(page, Utc::now())
    }

    /// A token that cannot be decoded counts as signed out.
    pub fn check_at(&self, page: &mut Page, now: DateTime<Utc>) -> GuardOutcome {
        if page.path() == LOGIN_PATH {
            return GuardOutcome::Skipped;
        }

        let claims = match self.session.claims() {
            Ok(Some(claims)) if claims.is_valid_at(now) => claims,
            Ok(Some(claims)) => {
                debug!(exp = claims.exp, "Token expired, redirecting to login");
                return self.redirect();
            }
            Ok(None) => {
                debug!(path = page.path(), "No token, redirecting to login");
                return self.redirect();
            }
            Err(e) => {
                warn!(error = %e, "Stored token is unreadable, redirecting to login");
                return self.redirect();
            }
        };

        let username = claims.display_name().map(str::to_string);
        if let Some(ref name) = username {
            page.set_current_user(name);
        }
        GuardOutcome::Authenticated { username }
    }

    fn redirect(&self) -> GuardOutcome {
        self.navigator.navigate(LOGIN_PATH);
        GuardOutcome::RedirectedToLogin
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use chrono::TimeZone;
    use serde_json::json;

    use super::*;
    use crate::auth::token::test_support::token_with_payload;
    use crate::auth::{MemoryTokenStore, Token};
    use crate::navigation::MemoryNavigator;

    const NOW: i64 = 1_700_000_000;

    fn setup(token: Option<Token>) -> (SessionManager, MemoryNavigator) {
        let store = match token {
            Some(t) => MemoryTokenStore::with_token(t),
            None => MemoryTokenStore::new(),
        };
        (
            SessionManager::new(Arc::new(store)),
            MemoryNavigator::new("/dashboard"),
        )
    }

    fn now() -> DateTime<Utc> {
        Utc.timestamp_opt(NOW, 0).unwrap()
    }

    #[test]
    fn test_login_page_is_skipped() {
        let (session, nav) = setup(None);
        let mut page = Page::dashboard(LOGIN_PATH);
        assert_eq!(PageGuard::new(&session, &nav).check_at(&mut page, now()), GuardOutcome::Skipped);
        assert!(nav.history().is_empty());
    }

    #[test]
    fn test_expired_token_redirects_without_populating() {
        let (session, nav) = setup(Some(token_with_payload(&json!({"exp": NOW - 10, "username": "alice"}))));
        let mut page = Page::dashboard("/dashboard");

        let outcome = PageGuard::new(&session, &nav).check_at(&mut page, now());
        assert_eq!(outcome, GuardOutcome::RedirectedToLogin);
        assert_eq!(nav.history(), vec![LOGIN_PATH.to_string()]);
        assert_eq!(page.current_user(), Some(""));
    }

    #[test]
    fn test_missing_token_redirects() {
        let (session, nav) = setup(None);
        let mut page = Page::new("/users");
        assert_eq!(
            PageGuard::new(&session, &nav).check_at(&mut page, now()),
            GuardOutcome::RedirectedToLogin
        );
        assert_eq!(nav.current_path(), LOGIN_PATH);
    }

    #[test]
    fn test_valid_token_populates_user_slot() {
        let (session, nav) = setup(Some(token_with_payload(&json!({"exp": NOW + 600, "username": "alice"}))));
        let mut page = Page::dashboard("/dashboard");

        let outcome = PageGuard::new(&session, &nav).check_at(&mut page, now());
        assert_eq!(outcome, GuardOutcome::Authenticated { username: Some("alice".to_string()) });
        assert_eq!(page.current_user(), Some("alice"));
        assert!(nav.history().is_empty());
    }

    #[test]
    fn test_valid_token_without_user_slot() {
        let (session, nav) = setup(Some(token_with_payload(&json!({"exp": NOW + 600, "sub": "owner"}))));
        let mut page = Page::new("/analytics");

        let outcome = PageGuard::new(&session, &nav).check_at(&mut page, now());
        assert_eq!(outcome, GuardOutcome::Authenticated { username: Some("owner".to_string()) });
        assert_eq!(page.current_user(), None);
    }

    #[test]
    fn test_malformed_token_fails_closed() {
        let (session, nav) = setup(Some(Token::new("not-a-jwt")));
        let mut page = Page::dashboard("/dashboard");
        assert_eq!(
            PageGuard::new(&session, &nav).check_at(&mut page, now()),
            GuardOutcome::RedirectedToLogin
        );
    }
}
