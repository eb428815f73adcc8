//! Route definitions for the `/ingredients` resource.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::ingredients;
use crate::state::AppState;

/// Routes mounted at `/ingredients`.
///
/// ```text
/// GET    /               -> list (public)
/// POST   /               -> create
/// GET    /{id}           -> get_by_id (public)
/// PUT    /{id}           -> update
/// DELETE /{id}           -> delete
/// POST   /{id}/picture   -> upload_picture
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(ingredients::list).post(ingredients::create))
        .route(
            "/{id}",
            get(ingredients::get_by_id)
                .put(ingredients::update)
                .delete(ingredients::delete),
        )
        .route("/{id}/picture", post(ingredients::upload_picture))
}
