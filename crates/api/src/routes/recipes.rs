//! Route definitions for the `/recipes` resource and its ingredient rows.

use axum::routing::{get, post, put};
use axum::Router;

use crate::handlers::{recipe_ingredients, recipes};
use crate::state::AppState;

/// Routes mounted at `/recipes`.
///
/// ```text
/// GET    /                          -> list
/// POST   /                          -> create
/// GET    /{id}                      -> get_by_id
/// PUT    /{id}                      -> update
/// DELETE /{id}                      -> delete
/// POST   /{id}/picture              -> upload_picture
/// GET    /{id}/ingredients          -> recipe_ingredients::list
/// POST   /{id}/ingredients          -> recipe_ingredients::add
/// PUT    /{id}/ingredients/{row_id} -> recipe_ingredients::update_quantity
/// DELETE /{id}/ingredients/{row_id} -> recipe_ingredients::remove
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(recipes::list).post(recipes::create))
        .route(
            "/{id}",
            get(recipes::get_by_id)
                .put(recipes::update)
                .delete(recipes::delete),
        )
        .route("/{id}/picture", post(recipes::upload_picture))
        .route(
            "/{id}/ingredients",
            get(recipe_ingredients::list).post(recipe_ingredients::add),
        )
        .route(
            "/{id}/ingredients/{row_id}",
            put(recipe_ingredients::update_quantity).delete(recipe_ingredients::remove),
        )
}
