//! Repository for the `recipes` table.
//!
//! Every write path computes `difficulty` with [`Difficulty::classify`].
//! `ingredient_count` is only ever written by
//! [`RecipeRepo::refresh_derived_fields`], which recounts the association
//! rows inside the caller's transaction.

use recipebook_core::difficulty::Difficulty;
use recipebook_core::pagination::{clamp_limit, clamp_offset, DEFAULT_PAGE_LIMIT, MAX_PAGE_LIMIT};
use recipebook_core::picture::NO_PICTURE;
use recipebook_core::types::DbId;
use recipebook_core::validation::normalize_name;
use sqlx::{PgConnection, PgPool};

use crate::models::recipe::{CreateRecipe, Recipe, RecipeSummary, UpdateRecipe};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, name, cooking_time, ingredient_count, target_ingredient_count, \
                       difficulty, created_by, picture, created_at, updated_at";

/// Provides CRUD operations for recipes.
pub struct RecipeRepo;

impl RecipeRepo {
    /// Insert a new recipe owned by `owner`, returning the created row.
    ///
    /// The recipe starts with no ingredients, so its difficulty is
    /// classified against an ingredient count of zero.
    pub async fn create(
        pool: &PgPool,
        owner: DbId,
        input: &CreateRecipe,
    ) -> Result<Recipe, sqlx::Error> {
        let difficulty = Difficulty::classify(input.cooking_time, 0);
        let query = format!(
            "INSERT INTO recipes
                (name, cooking_time, ingredient_count, target_ingredient_count,
                 difficulty, created_by, picture)
             VALUES ($1, $2, 0, $3, $4, $5, $6)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Recipe>(&query)
            .bind(normalize_name(&input.name))
            .bind(input.cooking_time)
            .bind(input.target_ingredient_count)
            .bind(difficulty.as_str())
            .bind(owner)
            .bind(NO_PICTURE)
            .fetch_one(pool)
            .await
    }

    /// Find a recipe by internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Recipe>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM recipes WHERE id = $1");
        sqlx::query_as::<_, Recipe>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List recipes newest first, one page at a time.
    pub async fn list(
        pool: &PgPool,
        limit: Option<i64>,
        offset: Option<i64>,
    ) -> Result<Vec<Recipe>, sqlx::Error> {
        let limit = clamp_limit(limit, DEFAULT_PAGE_LIMIT, MAX_PAGE_LIMIT);
        let offset = clamp_offset(offset);
        let query = format!(
            "SELECT {COLUMNS} FROM recipes
             ORDER BY created_at DESC, id DESC
             LIMIT $1 OFFSET $2"
        );
        sqlx::query_as::<_, Recipe>(&query)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
    }

    /// Recipes that list the given ingredient, ordered by name.
    pub async fn list_by_ingredient(
        pool: &PgPool,
        ingredient_id: DbId,
    ) -> Result<Vec<RecipeSummary>, sqlx::Error> {
        sqlx::query_as::<_, RecipeSummary>(
            "SELECT r.id, r.name, r.cooking_time, r.ingredient_count, r.difficulty
             FROM recipes r
             JOIN recipe_ingredients ri ON ri.recipe_id = r.id
             WHERE ri.ingredient_id = $1
             ORDER BY r.name, r.id",
        )
        .bind(ingredient_id)
        .fetch_all(pool)
        .await
    }

    /// Update a recipe's name and/or cooking time.
    ///
    /// The row is locked while the new difficulty is computed against the
    /// current ingredient count. Returns `None` if no recipe matched.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateRecipe,
    ) -> Result<Option<Recipe>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let current: Option<(i32, i32)> = sqlx::query_as(
            "SELECT cooking_time, ingredient_count FROM recipes WHERE id = $1 FOR UPDATE",
        )
        .bind(id)
        .fetch_optional(&mut *tx)
        .await?;

        let Some((cooking_time, ingredient_count)) = current else {
            tx.rollback().await?;
            return Ok(None);
        };

        let cooking_time = input.cooking_time.unwrap_or(cooking_time);
        let difficulty = Difficulty::classify(cooking_time, ingredient_count);

        let query = format!(
            "UPDATE recipes SET
                 name = COALESCE($2, name),
                 cooking_time = $3,
                 difficulty = $4
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        let recipe = sqlx::query_as::<_, Recipe>(&query)
            .bind(id)
            .bind(input.name.as_deref().map(normalize_name))
            .bind(cooking_time)
            .bind(difficulty.as_str())
            .fetch_one(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(Some(recipe))
    }

    /// Point a recipe at a newly stored picture.
    pub async fn set_picture(
        pool: &PgPool,
        id: DbId,
        picture: &str,
    ) -> Result<Option<Recipe>, sqlx::Error> {
        let query = format!(
            "UPDATE recipes SET picture = $2
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Recipe>(&query)
            .bind(id)
            .bind(picture)
            .fetch_optional(pool)
            .await
    }

    /// Delete a recipe. Its association rows are removed by cascade.
    ///
    /// Returns `true` if a recipe was deleted.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM recipes WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    // -----------------------------------------------------------------------
    // Derived fields (transaction-scoped)
    // -----------------------------------------------------------------------

    /// Take the row lock on a recipe for the rest of the transaction.
    ///
    /// Returns `false` if the recipe does not exist.
    pub(crate) async fn lock(conn: &mut PgConnection, id: DbId) -> Result<bool, sqlx::Error> {
        let locked: Option<DbId> =
            sqlx::query_scalar("SELECT id FROM recipes WHERE id = $1 FOR UPDATE")
                .bind(id)
                .fetch_optional(&mut *conn)
                .await?;
        Ok(locked.is_some())
    }

    /// Recount a recipe's association rows and persist the count together
    /// with the difficulty it implies.
    ///
    /// Must run in the same transaction as the association change, after
    /// the recipe row has been locked with [`RecipeRepo::lock`].
    pub(crate) async fn refresh_derived_fields(
        conn: &mut PgConnection,
        id: DbId,
    ) -> Result<Recipe, sqlx::Error> {
        let (cooking_time, live_count): (i32, i64) = sqlx::query_as(
            "SELECT r.cooking_time,
                    (SELECT COUNT(*) FROM recipe_ingredients ri WHERE ri.recipe_id = r.id)
             FROM recipes r
             WHERE r.id = $1",
        )
        .bind(id)
        .fetch_one(&mut *conn)
        .await?;

        let ingredient_count = i32::try_from(live_count).unwrap_or(i32::MAX);
        let difficulty = Difficulty::classify(cooking_time, ingredient_count);

        let query = format!(
            "UPDATE recipes SET ingredient_count = $2, difficulty = $3
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        let recipe = sqlx::query_as::<_, Recipe>(&query)
            .bind(id)
            .bind(ingredient_count)
            .bind(difficulty.as_str())
            .fetch_one(&mut *conn)
            .await?;

        tracing::debug!(
            recipe_id = id,
            ingredient_count,
            difficulty = %difficulty,
            "Recipe derived fields refreshed"
        );
        Ok(recipe)
    }
}
