//! Repository for the `ingredients` table.
//!
//! Ingredient names are the natural key. [`IngredientRepo::find_or_create`]
//! is the only implicit way to create a row and inserts at most one.

use recipebook_core::pagination::{clamp_limit, clamp_offset, DEFAULT_PAGE_LIMIT, MAX_PAGE_LIMIT};
use recipebook_core::picture::NO_PICTURE;
use recipebook_core::types::DbId;
use recipebook_core::validation::normalize_name;
use sqlx::{PgConnection, PgExecutor, PgPool};

use crate::models::ingredient::{CreateIngredient, Ingredient, UpdateIngredient};
use crate::repositories::recipe_repo::RecipeRepo;

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, name, description, picture, created_at, updated_at";

/// Provides CRUD operations for ingredients.
pub struct IngredientRepo;

impl IngredientRepo {
    /// Insert a new ingredient, returning the created row.
    ///
    /// Fails with a unique violation on `uq_ingredients_name` when the name
    /// is taken.
    pub async fn create(pool: &PgPool, input: &CreateIngredient) -> Result<Ingredient, sqlx::Error> {
        let query = format!(
            "INSERT INTO ingredients (name, description, picture)
             VALUES ($1, $2, $3)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Ingredient>(&query)
            .bind(normalize_name(&input.name))
            .bind(&input.description)
            .bind(NO_PICTURE)
            .fetch_one(pool)
            .await
    }

    /// Return the ingredient named `name`, creating it with no description
    /// and the default picture if it does not exist yet.
    ///
    /// A single `INSERT ... ON CONFLICT` statement, so concurrent callers
    /// always converge on the same row. Works on a pool or inside an open
    /// transaction.
    pub async fn find_or_create<'e, E>(executor: E, name: &str) -> Result<Ingredient, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let query = format!(
            "INSERT INTO ingredients (name, picture)
             VALUES ($1, $2)
             ON CONFLICT (name) DO UPDATE SET name = EXCLUDED.name
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Ingredient>(&query)
            .bind(normalize_name(name))
            .bind(NO_PICTURE)
            .fetch_one(executor)
            .await
    }

    /// Find an ingredient by internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Ingredient>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM ingredients WHERE id = $1");
        sqlx::query_as::<_, Ingredient>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find an ingredient by its exact (trimmed) name.
    pub async fn find_by_name(pool: &PgPool, name: &str) -> Result<Option<Ingredient>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM ingredients WHERE name = $1");
        sqlx::query_as::<_, Ingredient>(&query)
            .bind(normalize_name(name))
            .fetch_optional(pool)
            .await
    }

    /// List ingredients alphabetically, one page at a time.
    pub async fn list(
        pool: &PgPool,
        limit: Option<i64>,
        offset: Option<i64>,
    ) -> Result<Vec<Ingredient>, sqlx::Error> {
        let limit = clamp_limit(limit, DEFAULT_PAGE_LIMIT, MAX_PAGE_LIMIT);
        let offset = clamp_offset(offset);
        let query = format!(
            "SELECT {COLUMNS} FROM ingredients
             ORDER BY name, id
             LIMIT $1 OFFSET $2"
        );
        sqlx::query_as::<_, Ingredient>(&query)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
    }

    /// Update an ingredient's description. Returns `None` if no row matched.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateIngredient,
    ) -> Result<Option<Ingredient>, sqlx::Error> {
        let query = format!(
            "UPDATE ingredients SET description = COALESCE($2, description)
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Ingredient>(&query)
            .bind(id)
            .bind(&input.description)
            .fetch_optional(pool)
            .await
    }

    /// Point an ingredient at a newly stored picture.
    pub async fn set_picture(
        pool: &PgPool,
        id: DbId,
        picture: &str,
    ) -> Result<Option<Ingredient>, sqlx::Error> {
        let query = format!(
            "UPDATE ingredients SET picture = $2
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Ingredient>(&query)
            .bind(id)
            .bind(picture)
            .fetch_optional(pool)
            .await
    }

    /// Delete an ingredient and every association that references it.
    ///
    /// Locks are taken in the same order as association writes: the recipes
    /// that use the ingredient (in id order), then the ingredient itself.
    /// Those recipes have their derived fields refreshed before the
    /// transaction commits. Returns `true` if an ingredient was deleted.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        loop {
            let mut tx = pool.begin().await?;

            let locked: Vec<DbId> = sqlx::query_scalar(
                "SELECT r.id FROM recipes r
                 WHERE r.id IN (SELECT recipe_id FROM recipe_ingredients WHERE ingredient_id = $1)
                 ORDER BY r.id
                 FOR UPDATE",
            )
            .bind(id)
            .fetch_all(&mut *tx)
            .await?;

            // Blocks new associations to this ingredient until we commit.
            let exists: Option<DbId> =
                sqlx::query_scalar("SELECT id FROM ingredients WHERE id = $1 FOR UPDATE")
                    .bind(id)
                    .fetch_optional(&mut *tx)
                    .await?;
            if exists.is_none() {
                tx.rollback().await?;
                return Ok(false);
            }

            let affected = Self::recipes_using(&mut *tx, id).await?;
            if affected.iter().any(|recipe_id| !locked.contains(recipe_id)) {
                // An association committed between the two locks.
                tx.rollback().await?;
                tracing::debug!(ingredient_id = id, "Ingredient gained a recipe during delete, retrying");
                continue;
            }

            sqlx::query("DELETE FROM ingredients WHERE id = $1")
                .bind(id)
                .execute(&mut *tx)
                .await?;

            for recipe_id in &affected {
                RecipeRepo::refresh_derived_fields(&mut *tx, *recipe_id).await?;
            }

            tx.commit().await?;
            tracing::debug!(
                ingredient_id = id,
                recipes_refreshed = affected.len(),
                "Ingredient deleted"
            );
            return Ok(true);
        }
    }

    async fn recipes_using(conn: &mut PgConnection, id: DbId) -> Result<Vec<DbId>, sqlx::Error> {
        sqlx::query_scalar(
            "SELECT DISTINCT recipe_id FROM recipe_ingredients
             WHERE ingredient_id = $1
             ORDER BY recipe_id",
        )
        .bind(id)
        .fetch_all(&mut *conn)
        .await
    }
}
