//! Read-only aggregates behind the search page charts.

use recipebook_core::types::DbId;
use sqlx::PgPool;

use crate::models::stats::{DailyRecipeCount, DifficultyCount, IngredientPopularity};

/// Aggregate queries over recipes and their ingredients.
pub struct StatsRepo;

impl StatsRepo {
    /// Recipes using `ingredient_id`, counted per difficulty.
    ///
    /// Only difficulties with at least one recipe are returned.
    pub async fn difficulty_counts_for_ingredient(
        pool: &PgPool,
        ingredient_id: DbId,
    ) -> Result<Vec<DifficultyCount>, sqlx::Error> {
        sqlx::query_as::<_, DifficultyCount>(
            "SELECT r.difficulty, COUNT(*) AS recipe_count
             FROM recipes r
             JOIN recipe_ingredients ri ON ri.recipe_id = r.id
             WHERE ri.ingredient_id = $1
             GROUP BY r.difficulty",
        )
        .bind(ingredient_id)
        .fetch_all(pool)
        .await
    }

    /// The `limit` ingredients used by the most recipes.
    ///
    /// Ties are ordered by ingredient name so the ranking is stable.
    pub async fn popular_ingredients(
        pool: &PgPool,
        limit: i64,
    ) -> Result<Vec<IngredientPopularity>, sqlx::Error> {
        sqlx::query_as::<_, IngredientPopularity>(
            "SELECT i.name, COUNT(ri.recipe_id) AS recipe_count
             FROM ingredients i
             JOIN recipe_ingredients ri ON ri.ingredient_id = i.id
             GROUP BY i.id, i.name
             ORDER BY recipe_count DESC, i.name ASC
             LIMIT $1",
        )
        .bind(limit)
        .fetch_all(pool)
        .await
    }

    /// Number of recipes created on each UTC day, oldest first.
    pub async fn daily_recipe_counts(pool: &PgPool) -> Result<Vec<DailyRecipeCount>, sqlx::Error> {
        sqlx::query_as::<_, DailyRecipeCount>(
            "SELECT (created_at AT TIME ZONE 'UTC')::date AS day, COUNT(*) AS recipe_count
             FROM recipes
             GROUP BY day
             ORDER BY day",
        )
        .fetch_all(pool)
        .await
    }
}
