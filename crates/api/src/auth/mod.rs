//! Authentication primitives.
//!
//! - [`password`] -- Argon2id hashing and the rules for new passwords.
//! - [`jwt`] -- access-token signing/validation and refresh-token helpers.

pub mod jwt;
pub mod password;
