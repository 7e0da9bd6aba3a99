// ABOUTME: Route-level tests over an in-memory store and a stub authenticator
// ABOUTME: Covers auth gating, ownership checks before writes, and the error envelope
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2026 Mealplan Server Project

#![allow(missing_docs)]
#![allow(clippy::unwrap_used)]

mod common;

use std::sync::Arc;

use axum::body::Body;
use axum::Router;
use http::{Request, StatusCode};
use serde_json::Value;
use tower::ServiceExt;
use uuid::Uuid;

use chrono::NaiveDate;
use common::{owned_meal_plan, owned_recipe, MockAuth, MockNutrition, MockStore};
use mealplan_server::errors::{ErrorCode, ErrorResponse};
use mealplan_server::routes::{MealPlanRoutes, RecipeRoutes};
use mealplan_server::server::ServerResources;

fn test_resources(store: Arc<MockStore>, user_id: Uuid) -> Arc<ServerResources> {
    Arc::new(ServerResources {
        store,
        auth: Arc::new(MockAuth::new(user_id)),
        nutrition: Arc::new(MockNutrition::with_results(Vec::new())),
        images: None,
        parser: None,
    })
}

fn recipe_app(store: Arc<MockStore>, user_id: Uuid) -> Router {
    RecipeRoutes::routes(test_resources(store, user_id))
}

fn meal_plan_app(store: Arc<MockStore>, user_id: Uuid) -> Router {
    MealPlanRoutes::routes(test_resources(store, user_id))
}

fn date(s: &str) -> NaiveDate {
    s.parse().unwrap()
}

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn test_missing_bearer_yields_401_envelope() {
    let app = recipe_app(Arc::new(MockStore::default()), Uuid::new_v4());

    let response = app
        .oneshot(Request::get("/recipes").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let envelope: ErrorResponse = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(envelope.error.code, ErrorCode::AuthRequired);
    assert_eq!(envelope.error.message, "Missing Authentication Token");
}

#[tokio::test]
async fn test_delete_of_another_users_recipe_writes_nothing() {
    let caller = Uuid::new_v4();
    let other = Uuid::new_v4();
    let foreign = owned_recipe(other, "Someone else's stew");
    let foreign_id = foreign.id;

    let store = Arc::new(MockStore::with_recipes(vec![foreign]));
    let app = recipe_app(store.clone(), caller);

    let response = app
        .oneshot(
            Request::delete(format!("/recipes/{foreign_id}"))
                .header("Authorization", "Bearer tok")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    // The ownership check fails before any delete reaches the store
    assert!(store.deleted_recipe_ids().is_empty());
    assert_eq!(store.recipes.lock().unwrap().len(), 1);
}

#[tokio::test]
async fn test_delete_of_owned_recipe_succeeds() {
    let caller = Uuid::new_v4();
    let mine = owned_recipe(caller, "My curry");
    let mine_id = mine.id;

    let store = Arc::new(MockStore::with_recipes(vec![mine]));
    let app = recipe_app(store.clone(), caller);

    let response = app
        .oneshot(
            Request::delete(format!("/recipes/{mine_id}"))
                .header("Authorization", "Bearer tok")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["message"], "Recipe deleted");
    assert_eq!(store.deleted_recipe_ids(), vec![mine_id]);
}

#[tokio::test]
async fn test_list_returns_only_owned_recipes() {
    let caller = Uuid::new_v4();
    let store = Arc::new(MockStore::with_recipes(vec![
        owned_recipe(caller, "Mine"),
        owned_recipe(Uuid::new_v4(), "Theirs"),
    ]));
    let app = recipe_app(store, caller);

    let response = app
        .oneshot(
            Request::get("/recipes")
                .header("Authorization", "Bearer tok")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    let rows = body.as_array().unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0]["name"], "Mine");
}

#[tokio::test]
async fn test_delete_of_another_users_meal_plan_writes_nothing() {
    let caller = Uuid::new_v4();
    let other = Uuid::new_v4();
    let foreign = owned_meal_plan(other, Uuid::new_v4(), date("2026-09-01"));
    let foreign_id = foreign.id;

    let store = Arc::new(MockStore::with_meal_plans(Vec::new(), vec![foreign]));
    let app = meal_plan_app(store.clone(), caller);

    let response = app
        .oneshot(
            Request::delete(format!("/meal-plans/{foreign_id}"))
                .header("Authorization", "Bearer tok")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    // The ownership check fails before any delete reaches the store
    assert!(store.deleted_meal_plan_ids().is_empty());
    assert_eq!(store.meal_plans.lock().unwrap().len(), 1);
}

#[tokio::test]
async fn test_delete_of_owned_meal_plan_succeeds() {
    let caller = Uuid::new_v4();
    let mine = owned_meal_plan(caller, Uuid::new_v4(), date("2026-09-01"));
    let mine_id = mine.id;

    let store = Arc::new(MockStore::with_meal_plans(Vec::new(), vec![mine]));
    let app = meal_plan_app(store.clone(), caller);

    let response = app
        .oneshot(
            Request::delete(format!("/meal-plans/{mine_id}"))
                .header("Authorization", "Bearer tok")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["message"], "Meal plan deleted");
    assert_eq!(store.deleted_meal_plan_ids(), vec![mine_id]);
}

#[tokio::test]
async fn test_create_meal_plan_bumps_usage_and_returns_view() {
    let caller = Uuid::new_v4();
    let recipe = owned_recipe(caller, "Chicken Stir Fry");
    let recipe_id = recipe.id;

    let store = Arc::new(MockStore::with_meal_plans(vec![recipe], Vec::new()));
    let app = meal_plan_app(store.clone(), caller);

    let payload = format!(
        r#"{{"date": "2026-09-02", "meal_type": "Dinner", "recipe_id": "{recipe_id}"}}"#
    );
    let response = app
        .oneshot(
            Request::post("/meal-plans")
                .header("Authorization", "Bearer tok")
                .header("content-type", "application/json")
                .body(Body::from(payload))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::CREATED);
    assert_eq!(store.bumped_recipe_ids(), vec![recipe_id]);

    let body = body_json(response).await;
    assert_eq!(body["meal_type"], "Dinner");
    // The expanded row carries the joined recipe, flattened
    assert_eq!(body["recipe"]["name"], "Chicken Stir Fry");
    assert_eq!(body["recipe"]["ingredients"], serde_json::json!([]));
}

#[tokio::test]
async fn test_meal_plan_listing_is_owner_and_range_scoped() {
    let caller = Uuid::new_v4();
    let recipe = owned_recipe(caller, "Soup");
    let in_range = owned_meal_plan(caller, recipe.id, date("2026-09-03"));
    let out_of_range = owned_meal_plan(caller, recipe.id, date("2026-10-01"));
    let foreign = owned_meal_plan(Uuid::new_v4(), recipe.id, date("2026-09-03"));

    let store = Arc::new(MockStore::with_meal_plans(
        vec![recipe],
        vec![in_range.clone(), out_of_range, foreign],
    ));
    let app = meal_plan_app(store, caller);

    let response = app
        .oneshot(
            Request::get("/meal-plans?start_date=2026-09-01&end_date=2026-09-07")
                .header("Authorization", "Bearer tok")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    let rows = body.as_array().unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0]["id"], in_range.id.to_string());
    assert_eq!(rows[0]["recipe"]["name"], "Soup");
}

#[tokio::test]
async fn test_meal_plan_listing_requires_both_bounds() {
    let app = meal_plan_app(Arc::new(MockStore::default()), Uuid::new_v4());

    let response = app
        .oneshot(
            Request::get("/meal-plans?start_date=2026-09-01")
                .header("Authorization", "Bearer tok")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_parse_without_provider_yields_502() {
    let app = recipe_app(Arc::new(MockStore::default()), Uuid::new_v4());

    let response = app
        .oneshot(
            Request::post("/recipes/parse")
                .header("content-type", "application/json")
                .body(Body::from(r#"{"text": "Grandma's lasagna recipe"}"#))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let envelope: ErrorResponse = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(envelope.error.code, ErrorCode::ExternalServiceError);
}
