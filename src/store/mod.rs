// ABOUTME: Hosted store abstraction layer for recipes, ingredients, and meal plans
// ABOUTME: MealStore trait is the application/store seam; SupabaseStore is the production backend
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2026 Mealplan Server Project

//! # Store Abstraction
//!
//! All persistence is delegated to the hosted relational store; this crate
//! only describes requests against its REST dialect. The `MealStore` trait
//! is the seam the services and routes are written against, so tests can
//! substitute an in-memory implementation.
//!
//! Every operation takes the caller's bearer token: the store enforces
//! row-level security from the identity in that token, and the application
//! additionally filters by `user_id` where ownership matters.

use async_trait::async_trait;
use chrono::NaiveDate;
use uuid::Uuid;

use crate::errors::AppResult;
use crate::models::{
    Ingredient, MealPlan, MealPlanRecord, NewIngredient, NewMealPlan, NewRecipe, Recipe,
    RecipeCategory, RecipeFields,
};

pub mod postgrest;
pub mod supabase;

pub use supabase::SupabaseStore;

/// Core store abstraction trait
///
/// Mutating recipe/meal-plan operations that return `Option` yield `None`
/// when no row matched the filters — either the row does not exist or it is
/// not visible to the caller's identity; the two are indistinguishable by
/// design.
#[async_trait]
pub trait MealStore: Send + Sync {
    // ================================
    // Recipes
    // ================================

    /// List a user's recipes, most used first, optionally filtered by category
    async fn list_recipes(
        &self,
        token: &str,
        user_id: Uuid,
        category: Option<RecipeCategory>,
    ) -> AppResult<Vec<Recipe>>;

    /// Insert a recipe row; `None` when the store returned no representation
    async fn create_recipe(&self, token: &str, recipe: &NewRecipe) -> AppResult<Option<Recipe>>;

    /// Update a recipe filtered by id and owning user
    async fn update_recipe(
        &self,
        token: &str,
        recipe_id: Uuid,
        user_id: Uuid,
        fields: &RecipeFields,
    ) -> AppResult<Option<Recipe>>;

    /// Fetch a recipe only if owned by the given user
    async fn get_recipe_owned(
        &self,
        token: &str,
        recipe_id: Uuid,
        user_id: Uuid,
    ) -> AppResult<Option<Recipe>>;

    /// Delete a recipe row by id
    async fn delete_recipe(&self, token: &str, recipe_id: Uuid) -> AppResult<()>;

    // ================================
    // Ingredients
    // ================================

    /// List the full shared ingredient cache
    async fn list_ingredients(&self, token: &str) -> AppResult<Vec<Ingredient>>;

    /// Case-insensitive substring search on ingredient name, capped
    async fn search_ingredients(
        &self,
        token: &str,
        query: &str,
        limit: u32,
    ) -> AppResult<Vec<Ingredient>>;

    /// Lookup by external nutrition-API identifier
    async fn find_ingredient_by_api_id(
        &self,
        token: &str,
        api_id: &str,
    ) -> AppResult<Option<Ingredient>>;

    /// Lookup by exact name
    async fn find_ingredient_by_name(
        &self,
        token: &str,
        name: &str,
    ) -> AppResult<Option<Ingredient>>;

    /// Insert a new ingredient row into the shared cache
    async fn insert_ingredient(
        &self,
        token: &str,
        ingredient: &NewIngredient,
    ) -> AppResult<Ingredient>;

    // ================================
    // Recipe composition
    // ================================

    /// Delete all composition rows for a recipe
    async fn delete_recipe_ingredients(&self, token: &str, recipe_id: Uuid) -> AppResult<()>;

    /// Insert one composition row
    async fn insert_recipe_ingredient(
        &self,
        token: &str,
        recipe_id: Uuid,
        ingredient_id: Uuid,
        amount_g: f64,
    ) -> AppResult<()>;

    // ================================
    // Meal plans
    // ================================

    /// List a user's meal plans in an inclusive date range, with the
    /// recipe and its composition joined in
    async fn list_meal_plans(
        &self,
        token: &str,
        user_id: Uuid,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> AppResult<Vec<MealPlanRecord>>;

    /// Insert a meal-plan row; `None` when the store returned no representation
    async fn insert_meal_plan(
        &self,
        token: &str,
        plan: &NewMealPlan,
    ) -> AppResult<Option<MealPlan>>;

    /// Fetch a meal plan only if owned by the given user
    async fn get_meal_plan_owned(
        &self,
        token: &str,
        meal_plan_id: Uuid,
        user_id: Uuid,
    ) -> AppResult<Option<MealPlan>>;

    /// Fetch one meal plan with the recipe and composition joined in
    async fn get_meal_plan_expanded(
        &self,
        token: &str,
        meal_plan_id: Uuid,
    ) -> AppResult<Option<MealPlanRecord>>;

    /// Delete a meal-plan row by id
    async fn delete_meal_plan(&self, token: &str, meal_plan_id: Uuid) -> AppResult<()>;

    /// Bump a recipe's usage counter via the store-side procedure
    async fn increment_recipe_usage(&self, token: &str, recipe_id: Uuid) -> AppResult<()>;
}
