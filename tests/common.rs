// ABOUTME: Shared test fixtures: an in-memory MealStore and a mock nutrition provider
// ABOUTME: Used by the reconciler and composition integration tests
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2026 Mealplan Server Project

#![allow(missing_docs)]
#![allow(clippy::unwrap_used)]
#![allow(dead_code)] // each test binary uses a subset of these helpers

use std::sync::Mutex;

use async_trait::async_trait;
use chrono::NaiveDate;
use uuid::Uuid;

use http::HeaderMap;
use mealplan_server::auth::{bearer_token, AuthenticatedUser, Authenticator};
use mealplan_server::errors::{AppError, AppResult};
use mealplan_server::external::{ExternalIngredient, NutritionProvider};
use mealplan_server::models::{
    Ingredient, MealPlan, MealPlanRecord, MealSlot, NewIngredient, NewMealPlan, NewRecipe, Recipe,
    RecipeCategory, RecipeFields, RecipeIngredientRow, RecipeWithComposition,
};
use mealplan_server::store::MealStore;

/// Build a local ingredient row
pub fn local_ingredient(name: &str, api_id: Option<&str>) -> Ingredient {
    Ingredient {
        id: Uuid::new_v4(),
        api_id: api_id.map(str::to_owned),
        name: name.to_owned(),
        calories_per_g: 1.65,
        protein_per_g: 0.31,
        image_url: None,
    }
}

/// Build a recipe row owned by the given user
pub fn owned_recipe(user_id: Uuid, name: &str) -> Recipe {
    Recipe {
        id: Uuid::new_v4(),
        user_id,
        name: name.to_owned(),
        description: None,
        instructions: "Cook it.".to_owned(),
        image_url: None,
        category: RecipeCategory::Dinner,
        calories_per_serving: 400,
        protein_g: 30.0,
        carbs_g: 20.0,
        fat_g: 10.0,
        usage_count: 0,
    }
}

/// Build a meal-plan row owned by the given user
pub fn owned_meal_plan(user_id: Uuid, recipe_id: Uuid, date: NaiveDate) -> MealPlan {
    MealPlan {
        id: Uuid::new_v4(),
        user_id,
        date,
        meal_type: MealSlot::Dinner,
        recipe_id,
    }
}

/// Build an external search candidate
pub fn external_ingredient(name: &str, api_id: &str) -> ExternalIngredient {
    ExternalIngredient {
        api_id: api_id.to_owned(),
        name: name.to_owned(),
        calories_per_g: 0.52,
        protein_per_g: 0.003,
        image_url: Some("https://spoonacular.com/cdn/ingredients_100x100/apple.jpg".to_owned()),
    }
}

/// Authenticator returning a fixed user for any bearer token
pub struct MockAuth {
    pub user_id: Uuid,
}

impl MockAuth {
    pub fn new(user_id: Uuid) -> Self {
        Self { user_id }
    }
}

#[async_trait]
impl Authenticator for MockAuth {
    async fn authenticate(&self, headers: &HeaderMap) -> AppResult<AuthenticatedUser> {
        let token = bearer_token(headers).ok_or_else(AppError::auth_required)?;
        Ok(AuthenticatedUser {
            id: self.user_id,
            email: None,
            token: token.to_owned(),
        })
    }
}

/// In-memory MealStore with observable recipe, ingredient, composition,
/// and meal-plan state
#[derive(Default)]
pub struct MockStore {
    pub recipes: Mutex<Vec<Recipe>>,
    pub ingredients: Mutex<Vec<Ingredient>>,
    pub compositions: Mutex<Vec<RecipeIngredientRow>>,
    pub meal_plans: Mutex<Vec<MealPlan>>,
    pub deleted_recipes: Mutex<Vec<Uuid>>,
    pub deleted_meal_plans: Mutex<Vec<Uuid>>,
    /// Recipe ids whose usage counter was bumped, in call order
    pub usage_bumps: Mutex<Vec<Uuid>>,
    /// When set, `search_ingredients` fails with a store error
    pub fail_search: bool,
}

impl MockStore {
    pub fn with_ingredients(rows: Vec<Ingredient>) -> Self {
        Self {
            ingredients: Mutex::new(rows),
            ..Self::default()
        }
    }

    pub fn with_recipes(rows: Vec<Recipe>) -> Self {
        Self {
            recipes: Mutex::new(rows),
            ..Self::default()
        }
    }

    pub fn with_meal_plans(recipes: Vec<Recipe>, plans: Vec<MealPlan>) -> Self {
        Self {
            recipes: Mutex::new(recipes),
            meal_plans: Mutex::new(plans),
            ..Self::default()
        }
    }

    pub fn deleted_recipe_ids(&self) -> Vec<Uuid> {
        self.deleted_recipes.lock().unwrap().clone()
    }

    pub fn deleted_meal_plan_ids(&self) -> Vec<Uuid> {
        self.deleted_meal_plans.lock().unwrap().clone()
    }

    pub fn bumped_recipe_ids(&self) -> Vec<Uuid> {
        self.usage_bumps.lock().unwrap().clone()
    }

    /// Nested join shape for a plan, with the recipe looked up in-memory
    fn expand(&self, plan: &MealPlan) -> MealPlanRecord {
        let recipe = self
            .recipes
            .lock()
            .unwrap()
            .iter()
            .find(|row| row.id == plan.recipe_id)
            .cloned()
            .map(|recipe| RecipeWithComposition {
                recipe,
                recipe_ingredients: Vec::new(),
            });
        MealPlanRecord {
            id: plan.id,
            user_id: plan.user_id,
            date: plan.date,
            meal_type: plan.meal_type,
            recipe_id: plan.recipe_id,
            recipe,
        }
    }

    pub fn failing_search() -> Self {
        Self {
            fail_search: true,
            ..Self::default()
        }
    }

    pub fn ingredient_count(&self) -> usize {
        self.ingredients.lock().unwrap().len()
    }

    pub fn composition_rows(&self, recipe_id: Uuid) -> Vec<RecipeIngredientRow> {
        self.compositions
            .lock()
            .unwrap()
            .iter()
            .filter(|row| row.recipe_id == recipe_id)
            .cloned()
            .collect()
    }
}

#[async_trait]
impl MealStore for MockStore {
    async fn list_recipes(
        &self,
        _token: &str,
        user_id: Uuid,
        category: Option<RecipeCategory>,
    ) -> AppResult<Vec<Recipe>> {
        Ok(self
            .recipes
            .lock()
            .unwrap()
            .iter()
            .filter(|row| row.user_id == user_id)
            .filter(|row| category.map_or(true, |c| row.category == c))
            .cloned()
            .collect())
    }

    async fn create_recipe(&self, _token: &str, _recipe: &NewRecipe) -> AppResult<Option<Recipe>> {
        Ok(None)
    }

    async fn update_recipe(
        &self,
        _token: &str,
        _recipe_id: Uuid,
        _user_id: Uuid,
        _fields: &RecipeFields,
    ) -> AppResult<Option<Recipe>> {
        Ok(None)
    }

    async fn get_recipe_owned(
        &self,
        _token: &str,
        recipe_id: Uuid,
        user_id: Uuid,
    ) -> AppResult<Option<Recipe>> {
        Ok(self
            .recipes
            .lock()
            .unwrap()
            .iter()
            .find(|row| row.id == recipe_id && row.user_id == user_id)
            .cloned())
    }

    async fn delete_recipe(&self, _token: &str, recipe_id: Uuid) -> AppResult<()> {
        self.recipes.lock().unwrap().retain(|row| row.id != recipe_id);
        self.deleted_recipes.lock().unwrap().push(recipe_id);
        Ok(())
    }

    async fn list_ingredients(&self, _token: &str) -> AppResult<Vec<Ingredient>> {
        Ok(self.ingredients.lock().unwrap().clone())
    }

    async fn search_ingredients(
        &self,
        _token: &str,
        query: &str,
        limit: u32,
    ) -> AppResult<Vec<Ingredient>> {
        if self.fail_search {
            return Err(AppError::store("local search unavailable"));
        }
        let needle = query.to_lowercase();
        Ok(self
            .ingredients
            .lock()
            .unwrap()
            .iter()
            .filter(|row| row.name.to_lowercase().contains(&needle))
            .take(limit as usize)
            .cloned()
            .collect())
    }

    async fn find_ingredient_by_api_id(
        &self,
        _token: &str,
        api_id: &str,
    ) -> AppResult<Option<Ingredient>> {
        Ok(self
            .ingredients
            .lock()
            .unwrap()
            .iter()
            .find(|row| row.api_id.as_deref() == Some(api_id))
            .cloned())
    }

    async fn find_ingredient_by_name(
        &self,
        _token: &str,
        name: &str,
    ) -> AppResult<Option<Ingredient>> {
        Ok(self
            .ingredients
            .lock()
            .unwrap()
            .iter()
            .find(|row| row.name == name)
            .cloned())
    }

    async fn insert_ingredient(
        &self,
        _token: &str,
        ingredient: &NewIngredient,
    ) -> AppResult<Ingredient> {
        let row = Ingredient {
            id: Uuid::new_v4(),
            api_id: ingredient.api_id.clone(),
            name: ingredient.name.clone(),
            calories_per_g: ingredient.calories_per_g,
            protein_per_g: ingredient.protein_per_g,
            image_url: ingredient.image_url.clone(),
        };
        self.ingredients.lock().unwrap().push(row.clone());
        Ok(row)
    }

    async fn delete_recipe_ingredients(&self, _token: &str, recipe_id: Uuid) -> AppResult<()> {
        self.compositions
            .lock()
            .unwrap()
            .retain(|row| row.recipe_id != recipe_id);
        Ok(())
    }

    async fn insert_recipe_ingredient(
        &self,
        _token: &str,
        recipe_id: Uuid,
        ingredient_id: Uuid,
        amount_g: f64,
    ) -> AppResult<()> {
        self.compositions.lock().unwrap().push(RecipeIngredientRow {
            recipe_id,
            ingredient_id,
            amount_g,
        });
        Ok(())
    }

    async fn list_meal_plans(
        &self,
        _token: &str,
        user_id: Uuid,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> AppResult<Vec<MealPlanRecord>> {
        let plans: Vec<MealPlan> = self
            .meal_plans
            .lock()
            .unwrap()
            .iter()
            .filter(|plan| plan.user_id == user_id)
            .filter(|plan| plan.date >= start_date && plan.date <= end_date)
            .cloned()
            .collect();
        Ok(plans.iter().map(|plan| self.expand(plan)).collect())
    }

    async fn insert_meal_plan(
        &self,
        _token: &str,
        plan: &NewMealPlan,
    ) -> AppResult<Option<MealPlan>> {
        let row = MealPlan {
            id: Uuid::new_v4(),
            user_id: plan.user_id,
            date: plan.date,
            meal_type: plan.meal_type,
            recipe_id: plan.recipe_id,
        };
        self.meal_plans.lock().unwrap().push(row.clone());
        Ok(Some(row))
    }

    async fn get_meal_plan_owned(
        &self,
        _token: &str,
        meal_plan_id: Uuid,
        user_id: Uuid,
    ) -> AppResult<Option<MealPlan>> {
        Ok(self
            .meal_plans
            .lock()
            .unwrap()
            .iter()
            .find(|plan| plan.id == meal_plan_id && plan.user_id == user_id)
            .cloned())
    }

    async fn get_meal_plan_expanded(
        &self,
        _token: &str,
        meal_plan_id: Uuid,
    ) -> AppResult<Option<MealPlanRecord>> {
        let plan = self
            .meal_plans
            .lock()
            .unwrap()
            .iter()
            .find(|plan| plan.id == meal_plan_id)
            .cloned();
        Ok(plan.map(|plan| self.expand(&plan)))
    }

    async fn delete_meal_plan(&self, _token: &str, meal_plan_id: Uuid) -> AppResult<()> {
        self.meal_plans
            .lock()
            .unwrap()
            .retain(|plan| plan.id != meal_plan_id);
        self.deleted_meal_plans.lock().unwrap().push(meal_plan_id);
        Ok(())
    }

    async fn increment_recipe_usage(&self, _token: &str, recipe_id: Uuid) -> AppResult<()> {
        self.usage_bumps.lock().unwrap().push(recipe_id);
        Ok(())
    }
}

/// Mock nutrition provider with fixed results or a forced failure
pub struct MockNutrition {
    pub results: Vec<ExternalIngredient>,
    pub fail: bool,
}

impl MockNutrition {
    pub fn with_results(results: Vec<ExternalIngredient>) -> Self {
        Self {
            results,
            fail: false,
        }
    }

    pub fn failing() -> Self {
        Self {
            results: Vec::new(),
            fail: true,
        }
    }
}

#[async_trait]
impl NutritionProvider for MockNutrition {
    async fn search(&self, _query: &str) -> AppResult<Vec<ExternalIngredient>> {
        if self.fail {
            return Err(AppError::external_service("Spoonacular", "quota exceeded"));
        }
        Ok(self.results.clone())
    }
}
