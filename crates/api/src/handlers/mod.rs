//! Request handlers.
//!
//! Each submodule provides async handler functions for one resource.
//! Handlers validate input with `recipebook_core`, delegate to the matching
//! repository in `recipebook_db`, and map errors via [`crate::error::AppError`].

pub mod auth;
pub mod ingredients;
pub mod recipe_ingredients;
pub mod recipes;
pub mod search;
