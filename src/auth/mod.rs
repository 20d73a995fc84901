//! Authentication module
//!
//! Supports: Bearer, Basic, API Key, IAM (API key exchanged for a token)
//!
//! The `Authenticator` handles all auth types and caches the exchanged
//! token for IAM until shortly before it expires.

mod authenticator;
mod types;

pub use authenticator::Authenticator;
pub use types::{
    AuthConfig, CachedToken, Location, DEFAULT_IAM_TOKEN_URL, IAM_APIKEY_GRANT_TYPE,
};
