//! Ingredient model and DTOs.

use recipebook_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

/// A row from the `ingredients` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Ingredient {
    pub id: DbId,
    pub name: String,
    pub description: Option<String>,
    /// Relative picture reference, `no_picture.jpg` when none was uploaded.
    pub picture: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for registering an ingredient explicitly.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateIngredient {
    #[validate(length(
        min = 1,
        max = 120,
        message = "name must be between 1 and 120 characters"
    ))]
    pub name: String,
    pub description: Option<String>,
}

/// DTO for updating an ingredient. The name is the natural key and stays fixed.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateIngredient {
    pub description: Option<String>,
}
