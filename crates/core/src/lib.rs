//! Domain logic for the recipe book service.
//!
//! Everything here is pure: no database handles, no HTTP types. The `db`
//! crate persists what these modules compute and the `api` crate maps
//! [`error::CoreError`] onto HTTP responses.

pub mod charts;
pub mod difficulty;
pub mod error;
pub mod pagination;
pub mod picture;
pub mod types;
pub mod validation;
