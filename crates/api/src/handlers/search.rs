//! Handler for the search page: recipes by ingredient plus a statistics chart.

use axum::extract::{Query, State};
use axum::response::IntoResponse;
use axum::Json;
use recipebook_core::charts::{self, Chart, ChartQuery, POPULAR_INGREDIENT_LIMIT};
use recipebook_core::error::CoreError;
use recipebook_db::models::ingredient::Ingredient;
use recipebook_db::models::recipe::RecipeSummary;
use recipebook_db::repositories::{IngredientRepo, RecipeRepo, StatsRepo};
use recipebook_db::DbPool;
use serde::Serialize;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::query::SearchParams;
use crate::response::DataResponse;
use crate::state::AppState;

/// Payload of `GET /search`.
#[derive(Debug, Serialize)]
pub struct SearchResponse {
    /// The searched ingredient, when one was given.
    pub ingredient: Option<Ingredient>,
    /// Recipes that use the searched ingredient.
    pub recipes: Vec<RecipeSummary>,
    pub chart: Option<Chart>,
}

/// GET /api/v1/search?ingredient=&chart=difficulty|popular|growth
///
/// An ingredient on its own selects the difficulty chart for it. Returns
/// 404 if the named ingredient does not exist.
pub async fn search(
    auth: AuthUser,
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> AppResult<impl IntoResponse> {
    let query = ChartQuery::from_params(params.chart, params.ingredient.as_deref())?;

    let ingredient = match params.ingredient.as_deref().map(str::trim) {
        Some(name) if !name.is_empty() => Some(
            IngredientRepo::find_by_name(&state.pool, name)
                .await?
                .ok_or_else(|| {
                    AppError::Core(CoreError::NotFoundByName {
                        entity: "Ingredient",
                        name: name.to_string(),
                    })
                })?,
        ),
        _ => None,
    };

    let recipes = match &ingredient {
        Some(ingredient) => RecipeRepo::list_by_ingredient(&state.pool, ingredient.id).await?,
        None => Vec::new(),
    };

    let chart = match &query {
        Some(query) => Some(build_chart(&state.pool, query, ingredient.as_ref()).await?),
        None => None,
    };

    tracing::info!(
        user_id = auth.user_id,
        ingredient = ?params.ingredient,
        chart = ?query.as_ref().map(ChartQuery::kind),
        recipes = recipes.len(),
        "Search executed",
    );

    Ok(Json(DataResponse {
        data: SearchResponse {
            ingredient,
            recipes,
            chart,
        },
    }))
}

/// Run the aggregate behind `query` and shape it into a chart.
async fn build_chart(
    pool: &DbPool,
    query: &ChartQuery,
    ingredient: Option<&Ingredient>,
) -> AppResult<Chart> {
    match query {
        ChartQuery::DifficultyDistribution { ingredient: name } => {
            let ingredient = ingredient.ok_or_else(|| {
                AppError::Core(CoreError::NotFoundByName {
                    entity: "Ingredient",
                    name: name.clone(),
                })
            })?;
            let counts =
                StatsRepo::difficulty_counts_for_ingredient(pool, ingredient.id).await?;
            Ok(charts::difficulty_distribution(
                &ingredient.name,
                counts.into_iter().map(|c| (c.difficulty, c.recipe_count)),
            ))
        }
        ChartQuery::PopularIngredients => {
            let usage = StatsRepo::popular_ingredients(pool, POPULAR_INGREDIENT_LIMIT).await?;
            Ok(charts::popular_ingredients(
                usage.into_iter().map(|u| (u.name, u.recipe_count)),
            ))
        }
        ChartQuery::GrowthOverTime => {
            let daily = StatsRepo::daily_recipe_counts(pool).await?;
            Ok(charts::growth_over_time(
                daily.into_iter().map(|d| (d.day, d.recipe_count)),
            ))
        }
    }
}
