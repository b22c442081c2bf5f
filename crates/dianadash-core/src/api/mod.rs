//! REST API client module for the DianaBot dashboard API.
//!
//! This module provides the `ApiClient` for issuing JSON requests against
//! the dashboard API base path.
//!
//! The API uses JWT bearer token authentication. The token is read from the
//! `SessionManager` on every request; a 401 response is reported as
//! `ApiError::Unauthorized` and left for the caller to act on.

pub mod client;
pub mod error;
pub mod types;

pub use client::{ApiClient, RequestOptions};
pub use error::ApiError;
pub use types::{AdminUser, LoginRequest, LoginResponse};

pub use reqwest::Method;
