//! Handlers for the `/ingredients` resource.
//!
//! Listing and detail are public; every write requires [`AuthUser`].

use axum::extract::{Multipart, Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use recipebook_core::error::CoreError;
use recipebook_core::picture::PictureOwner;
use recipebook_core::types::DbId;
use recipebook_core::validation::{validate_ingredient_name, validate_input};
use recipebook_db::models::ingredient::{CreateIngredient, Ingredient, UpdateIngredient};
use recipebook_db::models::recipe_ingredient::IngredientUsage;
use recipebook_db::repositories::{IngredientRepo, RecipeIngredientRepo};
use serde::Serialize;

use crate::error::{AppError, AppResult};
use crate::media::{read_picture_field, remove_picture, store_picture};
use crate::middleware::auth::AuthUser;
use crate::query::PaginationParams;
use crate::response::{created, DataResponse};
use crate::state::AppState;

/// Ingredient detail with the recipes that use it.
#[derive(Debug, Serialize)]
pub struct IngredientDetail {
    #[serde(flatten)]
    pub ingredient: Ingredient,
    pub recipes: Vec<IngredientUsage>,
}

fn not_found(id: DbId) -> AppError {
    AppError::Core(CoreError::NotFound {
        entity: "Ingredient",
        id,
    })
}

/// GET /api/v1/ingredients
pub async fn list(
    State(state): State<AppState>,
    Query(params): Query<PaginationParams>,
) -> AppResult<impl IntoResponse> {
    let ingredients = IngredientRepo::list(&state.pool, params.limit, params.offset).await?;
    Ok(Json(DataResponse { data: ingredients }))
}

/// POST /api/v1/ingredients
///
/// Register an ingredient explicitly. Returns 409 if the name is taken.
pub async fn create(
    auth: AuthUser,
    State(state): State<AppState>,
    Json(input): Json<CreateIngredient>,
) -> AppResult<impl IntoResponse> {
    validate_input(&input)?;
    validate_ingredient_name(&input.name)?;

    let ingredient = IngredientRepo::create(&state.pool, &input).await?;

    tracing::info!(
        ingredient_id = ingredient.id,
        user_id = auth.user_id,
        name = %ingredient.name,
        "Ingredient created",
    );

    Ok(created(ingredient))
}

/// GET /api/v1/ingredients/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let ingredient = IngredientRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| not_found(id))?;
    let recipes = RecipeIngredientRepo::list_for_ingredient(&state.pool, id).await?;

    Ok(Json(DataResponse {
        data: IngredientDetail {
            ingredient,
            recipes,
        },
    }))
}

/// PUT /api/v1/ingredients/{id}
///
/// Only the description can change; the name is the natural key.
pub async fn update(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateIngredient>,
) -> AppResult<impl IntoResponse> {
    let ingredient = IngredientRepo::update(&state.pool, id, &input)
        .await?
        .ok_or_else(|| not_found(id))?;

    tracing::info!(ingredient_id = id, user_id = auth.user_id, "Ingredient updated");

    Ok(Json(DataResponse { data: ingredient }))
}

/// DELETE /api/v1/ingredients/{id}
///
/// Removes the ingredient from every recipe and refreshes those recipes'
/// ingredient counts and difficulty.
pub async fn delete(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    let previous = IngredientRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| not_found(id))?
        .picture;
    if !IngredientRepo::delete(&state.pool, id).await? {
        return Err(not_found(id));
    }
    remove_picture(&state.config.media_root, &previous).await;

    tracing::info!(ingredient_id = id, user_id = auth.user_id, "Ingredient deleted");

    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/v1/ingredients/{id}/picture
///
/// Multipart upload with a single `picture` field (PNG, JPEG or WebP).
pub async fn upload_picture(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    mut multipart: Multipart,
) -> AppResult<impl IntoResponse> {
    let previous = IngredientRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| not_found(id))?
        .picture;

    let data = read_picture_field(&mut multipart).await?;
    let reference = store_picture(
        &state.config.media_root,
        PictureOwner::Ingredient,
        &data,
        state.config.max_upload_bytes,
    )
    .await?;

    let Some(ingredient) = IngredientRepo::set_picture(&state.pool, id, &reference).await? else {
        // Deleted while the upload was in flight.
        remove_picture(&state.config.media_root, &reference).await;
        return Err(not_found(id));
    };
    remove_picture(&state.config.media_root, &previous).await;

    tracing::info!(
        ingredient_id = id,
        user_id = auth.user_id,
        picture = %reference,
        "Ingredient picture uploaded",
    );

    Ok(Json(DataResponse { data: ingredient }))
}
