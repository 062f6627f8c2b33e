//! Request extractors that gate handlers.
//!
//! - [`auth::AuthUser`]: the caller identified by a Bearer access token.

pub mod auth;
