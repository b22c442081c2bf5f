//! Session coordinator for the dashboard.
//!
//! `Dashboard` ties the `ApiClient` to a `Navigator`: it owns the login and
//! logout flow and decides what an `ApiError::Unauthorized` means (clear the
//! token and go to the login page).

use std::sync::Arc;

use anyhow::Result;
use serde_json::Value;
use tracing::{error, info, warn};

use crate::api::{AdminUser, ApiClient, ApiError, LoginRequest, LoginResponse, RequestOptions};
use crate::auth::{AuthError, SessionManager, Token};
use crate::config::Config;
use crate::guard::{GuardOutcome, PageGuard};
use crate::navigation::{Navigator, LOGIN_PATH};
use crate::page::Page;

pub const LOGIN_ENDPOINT: &str = "/auth/login";
pub const REFRESH_ENDPOINT: &str = "/auth/refresh";
pub const CURRENT_USER_ENDPOINT: &str = "/auth/me";

#[derive(Clone)]
pub struct Dashboard {
    api: ApiClient,
    navigator: Arc<dyn Navigator>,
}

impl Dashboard {
    pub fn new(api: ApiClient, navigator: Arc<dyn Navigator>) -> Self {
        Self { api, navigator }
    }

    /// Build the client stack described by `config`
    pub fn from_config(config: &Config, navigator: Arc<dyn Navigator>) -> Result<Self> {
        let session = SessionManager::new(config.token_store()?);
        let api = ApiClient::with_timeout(&config.api_base_url, session, config.request_timeout())?;
        Ok(Self::new(api, navigator))
    }

    pub fn api(&self) -> &ApiClient {
        &self.api
    }

    pub fn session(&self) -> &SessionManager {
        self.api.session()
    }

    /// Issue an authenticated request.
    ///
    /// A 401 logs the user out and yields `Ok(None)`; every other failure is
    /// returned unchanged and leaves the stored token alone.
    pub async fn request(&self, endpoint: &str, options: RequestOptions) -> Result<Option<Value>, ApiError> {
        match self.api.request(endpoint, options).await {
            Ok(value) => Ok(Some(value)),
            Err(ApiError::Unauthorized) => {
                warn!(endpoint, "Session rejected by API, logging out");
                // logout has already logged the store failure and navigated
                let _ = self.logout();
                Ok(None)
            }
            Err(e) => Err(e),
        }
    }

    /// Exchange credentials for a token and store it.
    ///
    /// Never fails: any error, including bad credentials, is logged and
    /// reported as `false`.
    pub async fn login(&self, username: &str, password: &str) -> bool {
        match self.try_login(username, password).await {
            Ok(true) => {
                info!(username, "Logged in");
                true
            }
            Ok(false) => {
                error!(username, "Login error: credentials rejected or no access token in response");
                false
            }
            Err(e) => {
                error!(username, error = %e, "Login error");
                false
            }
        }
    }

    /// A 401 goes through the forced-logout path, so a rejected login also
    /// drops whatever token was stored before.
    async fn try_login(&self, username: &str, password: &str) -> Result<bool, ApiError> {
        let options = RequestOptions::post().json(&LoginRequest { username, password })?;
        match self.request(LOGIN_ENDPOINT, options).await? {
            Some(value) => self.store_token_from(value),
            None => Ok(false),
        }
    }

    fn store_token_from(&self, value: Value) -> Result<bool, ApiError> {
        let response: LoginResponse = serde_json::from_value(value).unwrap_or_default();
        match response.access_token.filter(|t| !t.is_empty()) {
            Some(token) => {
                self.session().set_token(&Token::new(token))?;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Clear the token and go to the login page.
    ///
    /// Navigation happens even if the store could not be cleared.
    pub fn logout(&self) -> Result<(), AuthError> {
        let removed = self.session().remove_token();
        if let Err(ref e) = removed {
            warn!(error = %e, "Failed to clear stored token");
        }
        info!("Logged out");
        self.navigator.navigate(LOGIN_PATH);
        removed
    }

    /// Swap the current token for a fresh one.
    ///
    /// Returns `false` when the API rejected the session (already logged out)
    /// or answered without a token.
    pub async fn refresh_token(&self) -> Result<bool, ApiError> {
        match self.request(REFRESH_ENDPOINT, RequestOptions::post()).await? {
            Some(value) => {
                let stored = self.store_token_from(value)?;
                if stored {
                    info!("Token refreshed");
                }
                Ok(stored)
            }
            None => Ok(false),
        }
    }

    /// Refresh only when the token is close to expiry
    pub async fn refresh_if_needed(&self) -> Result<bool, ApiError> {
        if self.session().needs_refresh()? && self.session().is_authenticated()? {
            self.refresh_token().await
        } else {
            Ok(false)
        }
    }

    /// The signed-in admin account, or `None` after a forced logout
    pub async fn current_user(&self) -> Result<Option<AdminUser>, ApiError> {
        match self.request(CURRENT_USER_ENDPOINT, RequestOptions::get()).await? {
            Some(value) => serde_json::from_value(value)
                .map(Some)
                .map_err(|e| ApiError::InvalidResponse(format!("Unexpected user payload: {}", e))),
            None => Ok(None),
        }
    }

    /// Run the page-load guard for `page`
    pub fn check_page(&self, page: &mut Page) -> GuardOutcome {
        PageGuard::new(self.session(), self.navigator.as_ref()).check(page)
    }
}
