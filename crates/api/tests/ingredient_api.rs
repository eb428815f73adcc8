//! HTTP-level tests for the ingredient registry endpoints.

mod common;

use axum::http::StatusCode;
use common::{
    add_ingredient, body_json, create_recipe, delete_auth, get, post_json, post_json_auth,
    post_multipart_auth, put_json_auth, register_and_token, PNG_HEADER,
};
use serde_json::json;
use sqlx::PgPool;

#[sqlx::test(migrations = "../../db/migrations")]
async fn listing_and_detail_are_public(pool: PgPool) {
    let app = common::build_test_app(pool);
    let token = register_and_token(&app, "chef").await;

    for name in ["Salt", "Basil", "Pepper"] {
        let response = post_json_auth(&app, "/api/v1/ingredients", &token, json!({ "name": name })).await;
        assert_eq!(response.status(), StatusCode::CREATED);
    }

    let response = get(&app, "/api/v1/ingredients").await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    let names: Vec<&str> = json["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|i| i["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, ["Basil", "Pepper", "Salt"]);

    let page = body_json(get(&app, "/api/v1/ingredients?limit=1&offset=1").await).await;
    assert_eq!(page["data"].as_array().unwrap().len(), 1);
    assert_eq!(page["data"][0]["name"], "Pepper");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn create_requires_auth(pool: PgPool) {
    let app = common::build_test_app(pool);

    let response = post_json(&app, "/api/v1/ingredients", json!({ "name": "Salt" })).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn create_defaults_and_duplicate_name(pool: PgPool) {
    let app = common::build_test_app(pool);
    let token = register_and_token(&app, "chef").await;

    let response = post_json_auth(
        &app,
        "/api/v1/ingredients",
        &token,
        json!({ "name": "  Saffron  " }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let json = body_json(response).await;
    assert_eq!(json["data"]["name"], "Saffron");
    assert_eq!(json["data"]["picture"], "no_picture.jpg");
    assert!(json["data"]["description"].is_null());

    let dup = post_json_auth(&app, "/api/v1/ingredients", &token, json!({ "name": "Saffron" })).await;
    assert_eq!(dup.status(), StatusCode::CONFLICT);
    assert_eq!(body_json(dup).await["code"], "CONFLICT");

    let blank = post_json_auth(&app, "/api/v1/ingredients", &token, json!({ "name": "   " })).await;
    assert_eq!(blank.status(), StatusCode::BAD_REQUEST);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn detail_lists_recipes_using_the_ingredient(pool: PgPool) {
    let app = common::build_test_app(pool);
    let token = register_and_token(&app, "chef").await;

    let recipe = create_recipe(&app, &token, "Tomato Soup", 30).await;
    let recipe_id = recipe["id"].as_i64().unwrap();
    let added = body_json(add_ingredient(&app, &token, recipe_id, "Tomato", "4").await).await;
    let ingredient_id = added["data"]["associations"][0]["ingredient_id"].as_i64().unwrap();

    let response = get(&app, &format!("/api/v1/ingredients/{ingredient_id}")).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["name"], "Tomato");
    assert_eq!(json["data"]["recipes"][0]["recipe_name"], "Tomato Soup");
    assert_eq!(json["data"]["recipes"][0]["quantity"], "4");

    let missing = get(&app, "/api/v1/ingredients/999999").await;
    assert_eq!(missing.status(), StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn update_changes_description(pool: PgPool) {
    let app = common::build_test_app(pool);
    let token = register_and_token(&app, "chef").await;

    let created = body_json(
        post_json_auth(&app, "/api/v1/ingredients", &token, json!({ "name": "Thyme" })).await,
    )
    .await;
    let id = created["data"]["id"].as_i64().unwrap();

    let response = put_json_auth(
        &app,
        &format!("/api/v1/ingredients/{id}"),
        &token,
        json!({ "description": "Woody herb" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["data"]["description"], "Woody herb");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn delete_refreshes_recipes_that_used_it(pool: PgPool) {
    let app = common::build_test_app(pool);
    let token = register_and_token(&app, "chef").await;

    let recipe = create_recipe(&app, &token, "Quick Salad", 5).await;
    let recipe_id = recipe["id"].as_i64().unwrap();
    let mut onion_id = 0;
    for name in ["Lettuce", "Onion", "Tomato", "Cucumber"] {
        let json = body_json(add_ingredient(&app, &token, recipe_id, name, "1").await).await;
        if name == "Onion" {
            onion_id = json["data"]["associations"][0]["ingredient_id"].as_i64().unwrap();
        }
    }

    let before = body_json(common::get_auth(&app, &format!("/api/v1/recipes/{recipe_id}"), &token).await).await;
    assert_eq!(before["data"]["ingredient_count"], 4);
    assert_eq!(before["data"]["difficulty"], "Medium");

    let response = delete_auth(&app, &format!("/api/v1/ingredients/{onion_id}"), &token).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let after = body_json(common::get_auth(&app, &format!("/api/v1/recipes/{recipe_id}"), &token).await).await;
    assert_eq!(after["data"]["ingredient_count"], 3);
    assert_eq!(after["data"]["difficulty"], "Easy");

    let again = delete_auth(&app, &format!("/api/v1/ingredients/{onion_id}"), &token).await;
    assert_eq!(again.status(), StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn picture_upload_stores_file_under_media_root(pool: PgPool) {
    let media = tempfile::tempdir().unwrap();
    let app = common::build_test_app_with_media(pool, media.path());
    let token = register_and_token(&app, "chef").await;

    let created = body_json(
        post_json_auth(&app, "/api/v1/ingredients", &token, json!({ "name": "Garlic" })).await,
    )
    .await;
    let id = created["data"]["id"].as_i64().unwrap();

    let response = post_multipart_auth(
        &app,
        &format!("/api/v1/ingredients/{id}/picture"),
        &token,
        "picture",
        PNG_HEADER,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    let reference = json["data"]["picture"].as_str().unwrap();
    assert!(reference.starts_with("ingredients/"), "got {reference}");
    assert!(reference.ends_with(".png"), "got {reference}");

    let stored = std::fs::read(media.path().join(reference)).unwrap();
    assert_eq!(stored, PNG_HEADER);

    let response = delete_auth(&app, &format!("/api/v1/ingredients/{id}"), &token).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);
    assert!(!media.path().join(reference).exists());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn picture_upload_rejects_non_images(pool: PgPool) {
    let media = tempfile::tempdir().unwrap();
    let app = common::build_test_app_with_media(pool, media.path());
    let token = register_and_token(&app, "chef").await;

    let created = body_json(
        post_json_auth(&app, "/api/v1/ingredients", &token, json!({ "name": "Garlic" })).await,
    )
    .await;
    let id = created["data"]["id"].as_i64().unwrap();

    let text = post_multipart_auth(
        &app,
        &format!("/api/v1/ingredients/{id}/picture"),
        &token,
        "picture",
        b"just some text",
    )
    .await;
    assert_eq!(text.status(), StatusCode::BAD_REQUEST);

    let wrong_field = post_multipart_auth(
        &app,
        &format!("/api/v1/ingredients/{id}/picture"),
        &token,
        "photo",
        PNG_HEADER,
    )
    .await;
    assert_eq!(wrong_field.status(), StatusCode::BAD_REQUEST);

    let detail = body_json(get(&app, &format!("/api/v1/ingredients/{id}")).await).await;
    assert_eq!(detail["data"]["picture"], "no_picture.jpg");
}
