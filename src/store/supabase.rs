// ABOUTME: Production MealStore implementation over the hosted store's REST API
// ABOUTME: Forwards the caller's bearer token on every request for row-level security
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2026 Mealplan Server Project

//! # Supabase Store
//!
//! Speaks PostgREST over reqwest. Requests are described by
//! [`TableRequest`](super::postgrest::TableRequest) and executed here; the
//! caller's bearer token is attached to every request so the store's
//! row-level security evaluates against the requesting user, with the
//! project's anonymous key as the `apikey` header.

use async_trait::async_trait;
use chrono::NaiveDate;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde_json::json;
use uuid::Uuid;

use super::postgrest::{Method, TableRequest};
use super::MealStore;
use crate::config::SupabaseConfig;
use crate::errors::{AppError, AppResult};
use crate::models::{
    Ingredient, MealPlan, MealPlanRecord, NewIngredient, NewMealPlan, NewRecipe, Recipe,
    RecipeCategory, RecipeFields,
};

/// Select list for meal plans with the recipe and composition embedded
const MEAL_PLAN_EXPANDED: &str =
    "*,recipe:recipes(*,recipe_ingredients(amount_g,ingredients(*)))";

/// Store client for the hosted REST API
#[derive(Debug, Clone)]
pub struct SupabaseStore {
    client: Client,
    base_url: String,
    anon_key: String,
}

impl SupabaseStore {
    #[must_use]
    pub fn new(client: Client, config: &SupabaseConfig) -> Self {
        Self {
            client,
            base_url: config.url.clone(),
            anon_key: config.anon_key.clone(),
        }
    }

    /// Execute a described request, returning the response body on success
    async fn execute(&self, token: &str, request: &TableRequest) -> AppResult<String> {
        let url = format!("{}/rest/v1/{}", self.base_url, request.path());

        let mut builder = match request.method() {
            Method::Get => self.client.get(&url),
            Method::Post => self.client.post(&url),
            Method::Patch => self.client.patch(&url),
            Method::Delete => self.client.delete(&url),
        };

        builder = builder
            .header("apikey", &self.anon_key)
            .bearer_auth(token)
            .query(request.query());

        if request.wants_representation() {
            builder = builder.header("Prefer", "return=representation");
        }
        if let Some(body) = request.body() {
            builder = builder.json(body);
        }

        let response = builder
            .send()
            .await
            .map_err(|e| AppError::store(format!("store request failed: {e}")))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| AppError::store(format!("store response unreadable: {e}")))?;

        if !status.is_success() {
            return Err(AppError::store(format!("store returned {status}: {body}")));
        }

        Ok(body)
    }

    /// Execute a request whose response is a JSON array of rows
    async fn fetch_rows<T: DeserializeOwned>(
        &self,
        token: &str,
        request: &TableRequest,
    ) -> AppResult<Vec<T>> {
        let body = self.execute(token, request).await?;
        if body.trim().is_empty() {
            return Ok(Vec::new());
        }
        serde_json::from_str(&body)
            .map_err(|e| AppError::store(format!("malformed store response: {e}")))
    }

    /// Execute a request and take the first returned row, if any
    async fn fetch_first<T: DeserializeOwned>(
        &self,
        token: &str,
        request: &TableRequest,
    ) -> AppResult<Option<T>> {
        let mut rows = self.fetch_rows(token, request).await?;
        if rows.is_empty() {
            Ok(None)
        } else {
            Ok(Some(rows.swap_remove(0)))
        }
    }

    /// Execute a request, discarding the response body
    async fn execute_ok(&self, token: &str, request: &TableRequest) -> AppResult<()> {
        self.execute(token, request).await.map(|_| ())
    }
}

#[async_trait]
impl MealStore for SupabaseStore {
    async fn list_recipes(
        &self,
        token: &str,
        user_id: Uuid,
        category: Option<RecipeCategory>,
    ) -> AppResult<Vec<Recipe>> {
        let mut request = TableRequest::select("recipes").eq("user_id", &user_id.to_string());
        if let Some(category) = category {
            request = request.eq("category", category.as_str());
        }
        let request = request.order("usage_count", true);
        self.fetch_rows(token, &request).await
    }

    async fn create_recipe(&self, token: &str, recipe: &NewRecipe) -> AppResult<Option<Recipe>> {
        let body = serde_json::to_value(recipe)
            .map_err(|e| AppError::internal(format!("serialize recipe: {e}")))?;
        let request = TableRequest::insert("recipes", body);
        self.fetch_first(token, &request).await
    }

    async fn update_recipe(
        &self,
        token: &str,
        recipe_id: Uuid,
        user_id: Uuid,
        fields: &RecipeFields,
    ) -> AppResult<Option<Recipe>> {
        let body = serde_json::to_value(fields)
            .map_err(|e| AppError::internal(format!("serialize recipe: {e}")))?;
        let request = TableRequest::update("recipes", body)
            .eq("id", &recipe_id.to_string())
            .eq("user_id", &user_id.to_string());
        self.fetch_first(token, &request).await
    }

    async fn get_recipe_owned(
        &self,
        token: &str,
        recipe_id: Uuid,
        user_id: Uuid,
    ) -> AppResult<Option<Recipe>> {
        let request = TableRequest::select("recipes")
            .eq("id", &recipe_id.to_string())
            .eq("user_id", &user_id.to_string());
        self.fetch_first(token, &request).await
    }

    async fn delete_recipe(&self, token: &str, recipe_id: Uuid) -> AppResult<()> {
        let request = TableRequest::delete("recipes").eq("id", &recipe_id.to_string());
        self.execute_ok(token, &request).await
    }

    async fn list_ingredients(&self, token: &str) -> AppResult<Vec<Ingredient>> {
        let request = TableRequest::select("ingredients").order("name", false);
        self.fetch_rows(token, &request).await
    }

    async fn search_ingredients(
        &self,
        token: &str,
        query: &str,
        limit: u32,
    ) -> AppResult<Vec<Ingredient>> {
        let request = TableRequest::select("ingredients")
            .ilike_contains("name", query)
            .limit(limit);
        self.fetch_rows(token, &request).await
    }

    async fn find_ingredient_by_api_id(
        &self,
        token: &str,
        api_id: &str,
    ) -> AppResult<Option<Ingredient>> {
        let request = TableRequest::select("ingredients")
            .eq("api_id", api_id)
            .limit(1);
        self.fetch_first(token, &request).await
    }

    async fn find_ingredient_by_name(
        &self,
        token: &str,
        name: &str,
    ) -> AppResult<Option<Ingredient>> {
        let request = TableRequest::select("ingredients").eq("name", name).limit(1);
        self.fetch_first(token, &request).await
    }

    async fn insert_ingredient(
        &self,
        token: &str,
        ingredient: &NewIngredient,
    ) -> AppResult<Ingredient> {
        let body = serde_json::to_value(ingredient)
            .map_err(|e| AppError::internal(format!("serialize ingredient: {e}")))?;
        let request = TableRequest::insert("ingredients", body);
        self.fetch_first(token, &request)
            .await?
            .ok_or_else(|| AppError::store("ingredient insert returned no row"))
    }

    async fn delete_recipe_ingredients(&self, token: &str, recipe_id: Uuid) -> AppResult<()> {
        let request =
            TableRequest::delete("recipe_ingredients").eq("recipe_id", &recipe_id.to_string());
        self.execute_ok(token, &request).await
    }

    async fn insert_recipe_ingredient(
        &self,
        token: &str,
        recipe_id: Uuid,
        ingredient_id: Uuid,
        amount_g: f64,
    ) -> AppResult<()> {
        let request = TableRequest::insert(
            "recipe_ingredients",
            json!({
                "recipe_id": recipe_id,
                "ingredient_id": ingredient_id,
                "amount_g": amount_g,
            }),
        );
        self.execute_ok(token, &request).await
    }

    async fn list_meal_plans(
        &self,
        token: &str,
        user_id: Uuid,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> AppResult<Vec<MealPlanRecord>> {
        let request = TableRequest::select_columns("meal_plans", MEAL_PLAN_EXPANDED)
            .eq("user_id", &user_id.to_string())
            .gte("date", &start_date.to_string())
            .lte("date", &end_date.to_string())
            .order("date", false);
        self.fetch_rows(token, &request).await
    }

    async fn insert_meal_plan(
        &self,
        token: &str,
        plan: &NewMealPlan,
    ) -> AppResult<Option<MealPlan>> {
        let body = serde_json::to_value(plan)
            .map_err(|e| AppError::internal(format!("serialize meal plan: {e}")))?;
        let request = TableRequest::insert("meal_plans", body);
        self.fetch_first(token, &request).await
    }

    async fn get_meal_plan_owned(
        &self,
        token: &str,
        meal_plan_id: Uuid,
        user_id: Uuid,
    ) -> AppResult<Option<MealPlan>> {
        let request = TableRequest::select("meal_plans")
            .eq("id", &meal_plan_id.to_string())
            .eq("user_id", &user_id.to_string());
        self.fetch_first(token, &request).await
    }

    async fn get_meal_plan_expanded(
        &self,
        token: &str,
        meal_plan_id: Uuid,
    ) -> AppResult<Option<MealPlanRecord>> {
        let request = TableRequest::select_columns("meal_plans", MEAL_PLAN_EXPANDED)
            .eq("id", &meal_plan_id.to_string());
        self.fetch_first(token, &request).await
    }

    async fn delete_meal_plan(&self, token: &str, meal_plan_id: Uuid) -> AppResult<()> {
        let request = TableRequest::delete("meal_plans").eq("id", &meal_plan_id.to_string());
        self.execute_ok(token, &request).await
    }

    async fn increment_recipe_usage(&self, token: &str, recipe_id: Uuid) -> AppResult<()> {
        let request = TableRequest::rpc(
            "increment_recipe_usage",
            json!({ "row_id": recipe_id.to_string() }),
        );
        self.execute_ok(token, &request).await
    }
}
