//! Request extractors shared by handlers.
//!
//! - [`auth::AuthUser`] -- the signed-in user behind a Bearer access token.

pub mod auth;
