//! Integration tests for the chart aggregates.

use chrono::NaiveDate;
use recipebook_core::charts;
use recipebook_core::difficulty::Difficulty;
use recipebook_db::models::recipe::{CreateRecipe, Recipe};
use recipebook_db::models::user::CreateUser;
use recipebook_db::repositories::{IngredientRepo, RecipeIngredientRepo, RecipeRepo, StatsRepo, UserRepo};
use sqlx::PgPool;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

async fn create_owner(pool: &PgPool) -> i64 {
    UserRepo::create(
        pool,
        &CreateUser {
            username: "cook".to_string(),
            email: "cook@example.com".to_string(),
            password_hash: "not-a-real-hash".to_string(),
        },
    )
    .await
    .unwrap()
    .id
}

async fn create_recipe(pool: &PgPool, owner: i64, name: &str, cooking_time: i32) -> Recipe {
    RecipeRepo::create(
        pool,
        owner,
        &CreateRecipe {
            name: name.to_string(),
            cooking_time,
            target_ingredient_count: 1,
        },
    )
    .await
    .unwrap()
}

async fn add(pool: &PgPool, recipe_id: i64, ingredient: &str) {
    RecipeIngredientRepo::add_ingredient(pool, recipe_id, ingredient, "1")
        .await
        .unwrap();
}

async fn backdate(pool: &PgPool, recipe_id: i64, timestamp: &str) {
    sqlx::query("UPDATE recipes SET created_at = $2::timestamptz WHERE id = $1")
        .bind(recipe_id)
        .bind(timestamp)
        .execute(pool)
        .await
        .unwrap();
}

// ---------------------------------------------------------------------------
// Test: Difficulty distribution
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_difficulty_distribution_for_onion(pool: PgPool) {
    let owner = create_owner(&pool).await;

    let easy = create_recipe(&pool, owner, "Onion dip", 5).await;
    add(&pool, easy.id, "Onion").await;

    let hard = create_recipe(&pool, owner, "French onion soup", 60).await;
    for name in ["Onion", "Butter", "Stock", "Gruyere"] {
        add(&pool, hard.id, name).await;
    }

    let unrelated = create_recipe(&pool, owner, "Plain rice", 15).await;
    add(&pool, unrelated.id, "Rice").await;

    let onion = IngredientRepo::find_by_name(&pool, "Onion")
        .await
        .unwrap()
        .unwrap();
    let counts = StatsRepo::difficulty_counts_for_ingredient(&pool, onion.id)
        .await
        .unwrap();

    let chart = charts::difficulty_distribution(
        &onion.name,
        counts.into_iter().map(|c| (c.difficulty, c.recipe_count)),
    );
    let series: Vec<(String, i64)> = chart
        .points
        .into_iter()
        .map(|p| (p.label, p.value))
        .collect();
    assert_eq!(
        series,
        [
            ("Easy".to_string(), 1),
            ("Medium".to_string(), 0),
            ("Intermediate".to_string(), 0),
            ("Hard".to_string(), 1),
        ]
    );
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_difficulty_counts_follow_recomputation(pool: PgPool) {
    let owner = create_owner(&pool).await;
    let recipe = create_recipe(&pool, owner, "Garlic bread", 8).await;
    for name in ["Garlic", "Bread", "Butter", "Parsley"] {
        add(&pool, recipe.id, name).await;
    }

    let garlic = IngredientRepo::find_by_name(&pool, "Garlic")
        .await
        .unwrap()
        .unwrap();
    let counts = StatsRepo::difficulty_counts_for_ingredient(&pool, garlic.id)
        .await
        .unwrap();
    assert_eq!(counts.len(), 1);
    assert_eq!(counts[0].difficulty, Difficulty::Medium);
    assert_eq!(counts[0].recipe_count, 1);
}

// ---------------------------------------------------------------------------
// Test: Popular ingredients
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_popular_ingredients_top_ten(pool: PgPool) {
    let owner = create_owner(&pool).await;

    // Ingredient i (1..=11) is used by i recipes.
    let mut recipes = Vec::new();
    for n in 0..11 {
        recipes.push(create_recipe(&pool, owner, &format!("Recipe {n}"), 5).await);
    }
    for i in 1..=11 {
        for recipe in recipes.iter().take(i) {
            add(&pool, recipe.id, &format!("Ingredient {i:02}")).await;
        }
    }

    let popular = StatsRepo::popular_ingredients(&pool, charts::POPULAR_INGREDIENT_LIMIT)
        .await
        .unwrap();
    assert_eq!(popular.len(), 10);
    assert_eq!(popular[0].name, "Ingredient 11");
    assert_eq!(popular[0].recipe_count, 11);
    assert_eq!(popular[9].name, "Ingredient 02");
    assert!(popular
        .windows(2)
        .all(|w| w[0].recipe_count >= w[1].recipe_count));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_popular_ties_are_ordered_by_name(pool: PgPool) {
    let owner = create_owner(&pool).await;
    let recipe = create_recipe(&pool, owner, "Trail mix", 1).await;
    for name in ["Raisins", "Almonds", "Cashews"] {
        add(&pool, recipe.id, name).await;
    }

    let names: Vec<String> = StatsRepo::popular_ingredients(&pool, 10)
        .await
        .unwrap()
        .into_iter()
        .map(|p| p.name)
        .collect();
    assert_eq!(names, ["Almonds", "Cashews", "Raisins"]);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_unused_ingredients_are_not_popular(pool: PgPool) {
    IngredientRepo::find_or_create(&pool, "Saffron").await.unwrap();
    let popular = StatsRepo::popular_ingredients(&pool, 10).await.unwrap();
    assert!(popular.is_empty());
}

// ---------------------------------------------------------------------------
// Test: Growth over time
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_daily_counts_group_by_utc_day(pool: PgPool) {
    let owner = create_owner(&pool).await;
    let a = create_recipe(&pool, owner, "A", 5).await;
    let b = create_recipe(&pool, owner, "B", 5).await;
    let c = create_recipe(&pool, owner, "C", 5).await;

    backdate(&pool, a.id, "2025-03-05T23:30:00Z").await;
    backdate(&pool, b.id, "2025-03-01T00:15:00Z").await;
    backdate(&pool, c.id, "2025-03-05T08:00:00Z").await;

    let daily = StatsRepo::daily_recipe_counts(&pool).await.unwrap();
    let series: Vec<(NaiveDate, i64)> = daily.into_iter().map(|d| (d.day, d.recipe_count)).collect();

    let day = |d| NaiveDate::from_ymd_opt(2025, 3, d).unwrap();
    assert_eq!(series, [(day(1), 1), (day(5), 2)]);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_daily_counts_empty(pool: PgPool) {
    let daily = StatsRepo::daily_recipe_counts(&pool).await.unwrap();
    assert!(daily.is_empty());
}
