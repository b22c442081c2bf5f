//! Core library for the DianaBot dashboard client.
//!
//! This crate provides:
//! - `auth`: bearer token storage and the `SessionManager` expiry checks
//! - `api`: the `ApiClient` that attaches the bearer token to every request
//! - `Dashboard`: the session coordinator (login, logout, forced logout on 401)
//! - `guard`: the page-load authentication guard
//! - `ui`: presentation helpers (formatting, alerts, loading state, tables)

pub mod api;
pub mod auth;
pub mod config;
pub mod dashboard;
pub mod guard;
pub mod navigation;
pub mod page;
pub mod ui;

pub use api::{ApiClient, ApiError, RequestOptions};
pub use auth::{SessionManager, Token, TokenClaims, TokenStore};
pub use config::Config;
pub use dashboard::Dashboard;
pub use guard::{GuardOutcome, PageGuard};
pub use navigation::{Navigator, LOGIN_PATH};
pub use page::Page;
