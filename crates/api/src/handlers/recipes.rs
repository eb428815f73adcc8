//! Handlers for the `/recipes` resource.
//!
//! All endpoints require authentication. A new recipe is owned by the caller;
//! its ingredient count and difficulty are never taken from the request.

use axum::extract::{Multipart, Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use recipebook_core::error::CoreError;
use recipebook_core::picture::PictureOwner;
use recipebook_core::types::DbId;
use recipebook_core::validation::{
    validate_cooking_time, validate_input, validate_recipe_name, validate_target_ingredient_count,
};
use recipebook_db::models::recipe::{CreateRecipe, Recipe, UpdateRecipe};
use recipebook_db::models::recipe_ingredient::RecipeIngredientDetail;
use recipebook_db::repositories::{RecipeIngredientRepo, RecipeRepo};
use serde::Serialize;

use crate::error::{AppError, AppResult};
use crate::media::{read_picture_field, remove_picture, store_picture};
use crate::middleware::auth::AuthUser;
use crate::query::PaginationParams;
use crate::response::{created, DataResponse};
use crate::state::AppState;

/// Recipe detail with its ingredient rows.
#[derive(Debug, Serialize)]
pub struct RecipeDetail {
    #[serde(flatten)]
    pub recipe: Recipe,
    pub ingredients: Vec<RecipeIngredientDetail>,
}

pub(crate) fn not_found(id: DbId) -> AppError {
    AppError::Core(CoreError::NotFound {
        entity: "Recipe",
        id,
    })
}

// ---------------------------------------------------------------------------
// CRUD
// ---------------------------------------------------------------------------

/// GET /api/v1/recipes
///
/// Newest first. Supports `?limit=&offset=`.
pub async fn list(
    _auth: AuthUser,
    State(state): State<AppState>,
    Query(params): Query<PaginationParams>,
) -> AppResult<impl IntoResponse> {
    let recipes = RecipeRepo::list(&state.pool, params.limit, params.offset).await?;
    Ok(Json(DataResponse { data: recipes }))
}

/// POST /api/v1/recipes
pub async fn create(
    auth: AuthUser,
    State(state): State<AppState>,
    Json(input): Json<CreateRecipe>,
) -> AppResult<impl IntoResponse> {
    validate_input(&input)?;
    validate_recipe_name(&input.name)?;
    validate_cooking_time(input.cooking_time)?;
    validate_target_ingredient_count(input.target_ingredient_count)?;

    let recipe = RecipeRepo::create(&state.pool, auth.user_id, &input).await?;

    tracing::info!(
        recipe_id = recipe.id,
        user_id = auth.user_id,
        cooking_time = recipe.cooking_time,
        difficulty = %recipe.difficulty,
        "Recipe created",
    );

    Ok(created(recipe))
}

/// GET /api/v1/recipes/{id}
pub async fn get_by_id(
    _auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let recipe = RecipeRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| not_found(id))?;
    let ingredients = RecipeIngredientRepo::list_for_recipe(&state.pool, id).await?;

    Ok(Json(DataResponse {
        data: RecipeDetail {
            recipe,
            ingredients,
        },
    }))
}

/// PUT /api/v1/recipes/{id}
///
/// Changing the cooking time recomputes the difficulty.
pub async fn update(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateRecipe>,
) -> AppResult<impl IntoResponse> {
    validate_input(&input)?;
    if let Some(name) = &input.name {
        validate_recipe_name(name)?;
    }

    let recipe = RecipeRepo::update(&state.pool, id, &input)
        .await?
        .ok_or_else(|| not_found(id))?;

    tracing::info!(
        recipe_id = id,
        user_id = auth.user_id,
        difficulty = %recipe.difficulty,
        "Recipe updated",
    );

    Ok(Json(DataResponse { data: recipe }))
}

/// DELETE /api/v1/recipes/{id}
pub async fn delete(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    let previous = RecipeRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| not_found(id))?
        .picture;
    if !RecipeRepo::delete(&state.pool, id).await? {
        return Err(not_found(id));
    }
    remove_picture(&state.config.media_root, &previous).await;

    tracing::info!(recipe_id = id, user_id = auth.user_id, "Recipe deleted");

    Ok(StatusCode::NO_CONTENT)
}

// ---------------------------------------------------------------------------
// Picture
// ---------------------------------------------------------------------------

/// POST /api/v1/recipes/{id}/picture
///
/// Multipart upload with a single `picture` field (PNG, JPEG or WebP).
pub async fn upload_picture(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    mut multipart: Multipart,
) -> AppResult<impl IntoResponse> {
    let previous = RecipeRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| not_found(id))?
        .picture;

    let data = read_picture_field(&mut multipart).await?;
    let reference = store_picture(
        &state.config.media_root,
        PictureOwner::Recipe,
        &data,
        state.config.max_upload_bytes,
    )
    .await?;

    let Some(recipe) = RecipeRepo::set_picture(&state.pool, id, &reference).await? else {
        // Deleted while the upload was in flight.
        remove_picture(&state.config.media_root, &reference).await;
        return Err(not_found(id));
    };
    remove_picture(&state.config.media_root, &previous).await;

    tracing::info!(
        recipe_id = id,
        user_id = auth.user_id,
        picture = %reference,
        "Recipe picture uploaded",
    );

    Ok(Json(DataResponse { data: recipe }))
}
