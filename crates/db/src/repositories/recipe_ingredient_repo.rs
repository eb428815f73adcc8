//! Repository for the `recipe_ingredients` join table.
//!
//! Every write follows the same transaction shape: lock the owning recipe,
//! change association rows, then refresh the recipe's derived fields. A
//! reader therefore never sees an association change without the matching
//! `ingredient_count` and `difficulty`.

use recipebook_core::types::DbId;
use recipebook_core::validation::normalize_name;
use sqlx::{PgConnection, PgPool};

use crate::models::recipe::Recipe;
use crate::models::recipe_ingredient::{
    AddIngredient, AddIngredientsOutcome, AddedIngredients, IngredientUsage,
    RecipeIngredientDetail,
};
use crate::repositories::ingredient_repo::IngredientRepo;
use crate::repositories::recipe_repo::RecipeRepo;

/// Association columns joined with the ingredient name.
const DETAIL_COLUMNS: &str = "ri.id, ri.recipe_id, ri.ingredient_id, i.name AS ingredient_name, \
                              ri.quantity, ri.created_at, ri.updated_at";

/// Manages recipe-ingredient associations and the recipe counters they drive.
pub struct RecipeIngredientRepo;

impl RecipeIngredientRepo {
    /// Add one ingredient to a recipe, creating the ingredient if needed.
    pub async fn add_ingredient(
        pool: &PgPool,
        recipe_id: DbId,
        ingredient: &str,
        quantity: &str,
    ) -> Result<AddIngredientsOutcome, sqlx::Error> {
        let row = AddIngredient {
            ingredient: ingredient.to_string(),
            quantity: quantity.to_string(),
        };
        Self::add_ingredients(pool, recipe_id, std::slice::from_ref(&row)).await
    }

    /// Add several ingredients to a recipe in one transaction.
    ///
    /// Rows whose ingredient or quantity is blank are skipped. If any
    /// remaining row names an ingredient the recipe already has (or repeats
    /// an earlier row), the whole batch is rolled back, including any
    /// ingredient it created.
    pub async fn add_ingredients(
        pool: &PgPool,
        recipe_id: DbId,
        rows: &[AddIngredient],
    ) -> Result<AddIngredientsOutcome, sqlx::Error> {
        let mut tx = pool.begin().await?;

        if !RecipeRepo::lock(&mut *tx, recipe_id).await? {
            tx.rollback().await?;
            return Ok(AddIngredientsOutcome::RecipeNotFound);
        }

        let mut association_ids = Vec::with_capacity(rows.len());
        for row in rows {
            let name = normalize_name(&row.ingredient);
            let quantity = row.quantity.trim();
            if name.is_empty() || quantity.is_empty() {
                continue;
            }

            let ingredient = IngredientRepo::find_or_create(&mut *tx, name).await?;

            let exists: bool = sqlx::query_scalar(
                "SELECT EXISTS(
                     SELECT 1 FROM recipe_ingredients
                     WHERE recipe_id = $1 AND ingredient_id = $2
                 )",
            )
            .bind(recipe_id)
            .bind(ingredient.id)
            .fetch_one(&mut *tx)
            .await?;

            if exists {
                tx.rollback().await?;
                return Ok(AddIngredientsOutcome::Duplicate {
                    ingredient: ingredient.name,
                });
            }

            let id: DbId = sqlx::query_scalar(
                "INSERT INTO recipe_ingredients (recipe_id, ingredient_id, quantity)
                 VALUES ($1, $2, $3)
                 RETURNING id",
            )
            .bind(recipe_id)
            .bind(ingredient.id)
            .bind(quantity)
            .fetch_one(&mut *tx)
            .await?;
            association_ids.push(id);
        }

        let recipe = RecipeRepo::refresh_derived_fields(&mut *tx, recipe_id).await?;

        let mut associations = Vec::with_capacity(association_ids.len());
        for id in association_ids {
            associations.push(Self::fetch_detail(&mut *tx, id).await?);
        }

        tx.commit().await?;
        Ok(AddIngredientsOutcome::Added(AddedIngredients {
            associations,
            recipe,
        }))
    }

    /// Change the quantity of one association row.
    ///
    /// Returns `None` if the row does not exist or belongs to another recipe.
    pub async fn update_quantity(
        pool: &PgPool,
        recipe_id: DbId,
        id: DbId,
        quantity: &str,
    ) -> Result<Option<RecipeIngredientDetail>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        if !RecipeRepo::lock(&mut *tx, recipe_id).await? {
            tx.rollback().await?;
            return Ok(None);
        }

        let result = sqlx::query(
            "UPDATE recipe_ingredients SET quantity = $3
             WHERE id = $1 AND recipe_id = $2",
        )
        .bind(id)
        .bind(recipe_id)
        .bind(quantity.trim())
        .execute(&mut *tx)
        .await?;

        if result.rows_affected() == 0 {
            tx.rollback().await?;
            return Ok(None);
        }

        RecipeRepo::refresh_derived_fields(&mut *tx, recipe_id).await?;
        let detail = Self::fetch_detail(&mut *tx, id).await?;

        tx.commit().await?;
        Ok(Some(detail))
    }

    /// Remove one association row from a recipe.
    ///
    /// Returns the recipe with refreshed derived fields, or `None` if the
    /// row does not exist or belongs to another recipe.
    pub async fn remove(
        pool: &PgPool,
        recipe_id: DbId,
        id: DbId,
    ) -> Result<Option<Recipe>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        if !RecipeRepo::lock(&mut *tx, recipe_id).await? {
            tx.rollback().await?;
            return Ok(None);
        }

        let result = sqlx::query("DELETE FROM recipe_ingredients WHERE id = $1 AND recipe_id = $2")
            .bind(id)
            .bind(recipe_id)
            .execute(&mut *tx)
            .await?;

        if result.rows_affected() == 0 {
            tx.rollback().await?;
            return Ok(None);
        }

        let recipe = RecipeRepo::refresh_derived_fields(&mut *tx, recipe_id).await?;
        tx.commit().await?;
        Ok(Some(recipe))
    }

    /// All ingredient rows of a recipe, ordered by ingredient name.
    pub async fn list_for_recipe(
        pool: &PgPool,
        recipe_id: DbId,
    ) -> Result<Vec<RecipeIngredientDetail>, sqlx::Error> {
        let query = format!(
            "SELECT {DETAIL_COLUMNS}
             FROM recipe_ingredients ri
             JOIN ingredients i ON i.id = ri.ingredient_id
             WHERE ri.recipe_id = $1
             ORDER BY i.name, ri.id"
        );
        sqlx::query_as::<_, RecipeIngredientDetail>(&query)
            .bind(recipe_id)
            .fetch_all(pool)
            .await
    }

    /// Every recipe row that uses an ingredient, ordered by recipe name.
    pub async fn list_for_ingredient(
        pool: &PgPool,
        ingredient_id: DbId,
    ) -> Result<Vec<IngredientUsage>, sqlx::Error> {
        sqlx::query_as::<_, IngredientUsage>(
            "SELECT ri.id, ri.recipe_id, r.name AS recipe_name, ri.quantity, r.difficulty
             FROM recipe_ingredients ri
             JOIN recipes r ON r.id = ri.recipe_id
             WHERE ri.ingredient_id = $1
             ORDER BY r.name, ri.id",
        )
        .bind(ingredient_id)
        .fetch_all(pool)
        .await
    }

    async fn fetch_detail(
        conn: &mut PgConnection,
        id: DbId,
    ) -> Result<RecipeIngredientDetail, sqlx::Error> {
        let query = format!(
            "SELECT {DETAIL_COLUMNS}
             FROM recipe_ingredients ri
             JOIN ingredients i ON i.id = ri.ingredient_id
             WHERE ri.id = $1"
        );
        sqlx::query_as::<_, RecipeIngredientDetail>(&query)
            .bind(id)
            .fetch_one(&mut *conn)
            .await
    }
}
