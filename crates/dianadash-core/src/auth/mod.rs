//! Authentication module for managing the dashboard bearer token.
//!
//! This module provides:
//! - `Token` / `TokenClaims`: the opaque bearer token and its decoded payload
//! - `TokenStore`: durable single-slot storage for the token
//! - `SessionManager`: get/set/remove plus the expiry-derived auth check
//!
//! The token is never verified client-side. Only its payload segment is
//! decoded, to read `exp` and the user name.

pub mod credentials;
pub mod error;
pub mod session;
pub mod store;
pub mod token;

pub use credentials::KeyringTokenStore;
pub use error::AuthError;
pub use session::SessionManager;
pub use store::{FileTokenStore, MemoryTokenStore, TokenStore, TOKEN_KEY};
pub use token::{Token, TokenClaims};
