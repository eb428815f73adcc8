//! Recipe-ingredient association model and DTOs.

use recipebook_core::difficulty::Difficulty;
use recipebook_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

use crate::models::recipe::Recipe;

/// An association row joined with the ingredient name, as shown on a recipe.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct RecipeIngredientDetail {
    pub id: DbId,
    pub recipe_id: DbId,
    pub ingredient_id: DbId,
    pub ingredient_name: String,
    pub quantity: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// An association row joined with its recipe, as shown on an ingredient.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct IngredientUsage {
    pub id: DbId,
    pub recipe_id: DbId,
    pub recipe_name: String,
    pub quantity: String,
    #[sqlx(try_from = "String")]
    pub difficulty: Difficulty,
}

/// One ingredient line of a recipe form.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct AddIngredient {
    #[validate(length(min = 1, message = "ingredient is required"))]
    pub ingredient: String,
    #[validate(length(min = 1, message = "quantity is required"))]
    pub quantity: String,
}

/// DTO for `PUT /recipes/{id}/ingredients/{assoc_id}`.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpdateQuantity {
    #[validate(length(min = 1, message = "quantity is required"))]
    pub quantity: String,
}

/// Association rows written by one call, plus the recipe after its derived
/// fields were refreshed.
#[derive(Debug, Clone, Serialize)]
pub struct AddedIngredients {
    pub associations: Vec<RecipeIngredientDetail>,
    pub recipe: Recipe,
}

/// Result of adding one or more ingredients to a recipe.
#[derive(Debug)]
pub enum AddIngredientsOutcome {
    Added(AddedIngredients),
    RecipeNotFound,
    /// The recipe already lists this ingredient. Nothing was written.
    Duplicate { ingredient: String },
}
