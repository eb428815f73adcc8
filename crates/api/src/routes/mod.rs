pub mod auth;
pub mod health;
pub mod ingredients;
pub mod recipes;
pub mod search;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /auth/register                          register (public)
/// /auth/login                             login (public)
/// /auth/refresh                           refresh (public)
/// /auth/logout                            logout (requires auth)
///
/// /ingredients                            list (public), create
/// /ingredients/{id}                       get (public), update, delete
/// /ingredients/{id}/picture               upload picture (POST, multipart)
///
/// /recipes                                list, create
/// /recipes/{id}                           get, update, delete
/// /recipes/{id}/picture                   upload picture (POST, multipart)
/// /recipes/{id}/ingredients               list, add one or a batch
/// /recipes/{id}/ingredients/{row_id}      update quantity, remove
///
/// /search                                 recipes by ingredient + chart (GET)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/auth", auth::router())
        .nest("/ingredients", ingredients::router())
        // Recipes and their ingredient rows.
        .nest("/recipes", recipes::router())
        .nest("/search", search::router())
}
