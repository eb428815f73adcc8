//! Aggregate rows backing the statistics charts.

use chrono::NaiveDate;
use recipebook_core::difficulty::Difficulty;
use sqlx::FromRow;

/// Recipes of one difficulty that use a given ingredient.
#[derive(Debug, Clone, FromRow)]
pub struct DifficultyCount {
    #[sqlx(try_from = "String")]
    pub difficulty: Difficulty,
    pub recipe_count: i64,
}

/// Number of recipes that use an ingredient.
#[derive(Debug, Clone, FromRow)]
pub struct IngredientPopularity {
    pub name: String,
    pub recipe_count: i64,
}

/// Number of recipes created on one UTC calendar day.
#[derive(Debug, Clone, FromRow)]
pub struct DailyRecipeCount {
    pub day: NaiveDate,
    pub recipe_count: i64,
}
