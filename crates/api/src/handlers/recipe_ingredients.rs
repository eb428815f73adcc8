//! Handlers for a recipe's ingredient rows.
//!
//! Nested under recipes: `/recipes/{recipe_id}/ingredients[/{id}]`. Every
//! write returns or refreshes the recipe's derived fields in the same
//! transaction as the row change.

use axum::extract::{Path, State};
use axum::response::IntoResponse;
use axum::Json;
use recipebook_core::error::CoreError;
use recipebook_core::types::DbId;
use recipebook_core::validation::{validate_ingredient_name, validate_input, validate_quantity};
use recipebook_db::models::recipe_ingredient::{AddIngredient, AddIngredientsOutcome, UpdateQuantity};
use recipebook_db::repositories::{RecipeIngredientRepo, RecipeRepo};
use serde::Deserialize;

use crate::error::{AppError, AppResult};
use crate::handlers::recipes::not_found as recipe_not_found;
use crate::middleware::auth::AuthUser;
use crate::response::{created, DataResponse};
use crate::state::AppState;

/// Body of `POST /recipes/{id}/ingredients`: one row, or a form-style batch.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum AddIngredientsRequest {
    Batch { ingredients: Vec<AddIngredient> },
    Single(AddIngredient),
}

fn association_not_found(id: DbId) -> AppError {
    AppError::Core(CoreError::NotFound {
        entity: "RecipeIngredient",
        id,
    })
}

/// A form row missing its ingredient or its quantity. Such rows are skipped
/// in a batch.
fn is_incomplete(row: &AddIngredient) -> bool {
    row.ingredient.trim().is_empty() || row.quantity.trim().is_empty()
}

fn validate_row(row: &AddIngredient) -> Result<(), CoreError> {
    validate_ingredient_name(&row.ingredient)?;
    validate_quantity(&row.quantity)
}

/// GET /api/v1/recipes/{recipe_id}/ingredients
pub async fn list(
    _auth: AuthUser,
    State(state): State<AppState>,
    Path(recipe_id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    RecipeRepo::find_by_id(&state.pool, recipe_id)
        .await?
        .ok_or_else(|| recipe_not_found(recipe_id))?;

    let rows = RecipeIngredientRepo::list_for_recipe(&state.pool, recipe_id).await?;
    Ok(Json(DataResponse { data: rows }))
}

/// POST /api/v1/recipes/{recipe_id}/ingredients
///
/// Unknown ingredient names are registered on the fly. Returns 409 if the
/// recipe already lists one of the ingredients; nothing is written then.
/// In a batch, rows missing an ingredient or a quantity are skipped.
pub async fn add(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(recipe_id): Path<DbId>,
    Json(input): Json<AddIngredientsRequest>,
) -> AppResult<impl IntoResponse> {
    let rows = match input {
        AddIngredientsRequest::Single(row) => {
            validate_input(&row)?;
            validate_row(&row)?;
            vec![row]
        }
        AddIngredientsRequest::Batch { ingredients } => {
            let mut kept = Vec::with_capacity(ingredients.len());
            for row in ingredients.into_iter().filter(|r| !is_incomplete(r)) {
                validate_row(&row)?;
                kept.push(row);
            }
            kept
        }
    };
    if rows.is_empty() {
        return Err(AppError::Core(CoreError::Validation(
            "At least one ingredient row is required".into(),
        )));
    }

    let outcome = RecipeIngredientRepo::add_ingredients(&state.pool, recipe_id, &rows).await?;

    match outcome {
        AddIngredientsOutcome::Added(added) => {
            tracing::info!(
                recipe_id,
                user_id = auth.user_id,
                added = added.associations.len(),
                ingredient_count = added.recipe.ingredient_count,
                difficulty = %added.recipe.difficulty,
                "Ingredients added to recipe",
            );
            Ok(created(added))
        }
        AddIngredientsOutcome::RecipeNotFound => Err(recipe_not_found(recipe_id)),
        AddIngredientsOutcome::Duplicate { ingredient } => Err(AppError::Core(
            CoreError::Conflict(format!("Recipe already contains ingredient '{ingredient}'")),
        )),
    }
}

/// PUT /api/v1/recipes/{recipe_id}/ingredients/{id}
pub async fn update_quantity(
    auth: AuthUser,
    State(state): State<AppState>,
    Path((recipe_id, id)): Path<(DbId, DbId)>,
    Json(input): Json<UpdateQuantity>,
) -> AppResult<impl IntoResponse> {
    validate_input(&input)?;
    validate_quantity(&input.quantity)?;

    let row = RecipeIngredientRepo::update_quantity(&state.pool, recipe_id, id, &input.quantity)
        .await?
        .ok_or_else(|| association_not_found(id))?;

    tracing::info!(
        recipe_id,
        association_id = id,
        user_id = auth.user_id,
        "Ingredient quantity updated",
    );

    Ok(Json(DataResponse { data: row }))
}

/// DELETE /api/v1/recipes/{recipe_id}/ingredients/{id}
///
/// Returns the recipe with its refreshed ingredient count and difficulty.
pub async fn remove(
    auth: AuthUser,
    State(state): State<AppState>,
    Path((recipe_id, id)): Path<(DbId, DbId)>,
) -> AppResult<impl IntoResponse> {
    let recipe = RecipeIngredientRepo::remove(&state.pool, recipe_id, id)
        .await?
        .ok_or_else(|| association_not_found(id))?;

    tracing::info!(
        recipe_id,
        association_id = id,
        user_id = auth.user_id,
        ingredient_count = recipe.ingredient_count,
        "Ingredient removed from recipe",
    );

    Ok(Json(DataResponse { data: recipe }))
}
