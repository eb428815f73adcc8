//! Recipe model and DTOs.
//!
//! `ingredient_count` and `difficulty` are derived columns. No DTO carries
//! them; the repositories compute both on every write.

use recipebook_core::difficulty::Difficulty;
use recipebook_core::types::{DbId, Minutes, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

/// A row from the `recipes` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Recipe {
    pub id: DbId,
    pub name: String,
    pub cooking_time: Minutes,
    pub ingredient_count: i32,
    /// Number of ingredient rows the creator said the recipe would have.
    pub target_ingredient_count: i32,
    #[sqlx(try_from = "String")]
    pub difficulty: Difficulty,
    pub created_by: DbId,
    pub picture: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Compact recipe listing used by ingredient search results.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct RecipeSummary {
    pub id: DbId,
    pub name: String,
    pub cooking_time: Minutes,
    pub ingredient_count: i32,
    #[sqlx(try_from = "String")]
    pub difficulty: Difficulty,
}

/// DTO for creating a recipe. The owner comes from the authenticated session.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateRecipe {
    #[validate(length(
        min = 1,
        max = 255,
        message = "name must be between 1 and 255 characters"
    ))]
    pub name: String,
    #[validate(range(min = 0, message = "cooking_time must not be negative"))]
    pub cooking_time: Minutes,
    #[validate(range(min = 1, message = "target_ingredient_count must be at least 1"))]
    pub target_ingredient_count: i32,
}

/// DTO for updating a recipe. All fields are optional.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateRecipe {
    #[validate(length(
        min = 1,
        max = 255,
        message = "name must be between 1 and 255 characters"
    ))]
    pub name: Option<String>,
    #[validate(range(min = 0, message = "cooking_time must not be negative"))]
    pub cooking_time: Option<Minutes>,
}
