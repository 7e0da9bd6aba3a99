// ABOUTME: Domain models for recipes, ingredients, and calendar meal plans
// ABOUTME: Covers stored-row shapes, insert payloads, nested join wire shapes, and display shapes
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2026 Mealplan Server Project

//! Domain models
//!
//! Three families of types live here:
//! - stored rows as the hosted store returns them (`Recipe`, `Ingredient`,
//!   `MealPlan`);
//! - insert payloads (`NewRecipe`, `NewIngredient`, `NewMealPlan`);
//! - the nested join wire shape for meal-plan queries and the flat display
//!   shape the presentation layer consumes, plus the flattening between
//!   them.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Recipe category enumeration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RecipeCategory {
    Breakfast,
    Lunch,
    Dinner,
    Snack,
    Other,
}

impl RecipeCategory {
    /// Stored string form, used in store filters
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            RecipeCategory::Breakfast => "Breakfast",
            RecipeCategory::Lunch => "Lunch",
            RecipeCategory::Dinner => "Dinner",
            RecipeCategory::Snack => "Snack",
            RecipeCategory::Other => "Other",
        }
    }
}

/// Meal slot on the calendar
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MealSlot {
    Breakfast,
    Lunch,
    Dinner,
    Snack,
}

impl MealSlot {
    /// Stored string form
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            MealSlot::Breakfast => "Breakfast",
            MealSlot::Lunch => "Lunch",
            MealSlot::Dinner => "Dinner",
            MealSlot::Snack => "Snack",
        }
    }
}

/// A stored recipe row
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Recipe {
    pub id: Uuid,
    /// Owning user identity; every query is filtered by it
    pub user_id: Uuid,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub instructions: String,
    #[serde(default)]
    pub image_url: Option<String>,
    pub category: RecipeCategory,
    #[serde(default)]
    pub calories_per_serving: i64,
    #[serde(default)]
    pub protein_g: f64,
    #[serde(default)]
    pub carbs_g: f64,
    #[serde(default)]
    pub fat_g: f64,
    /// Incremented by a store-side procedure on each meal-plan creation
    #[serde(default)]
    pub usage_count: i64,
}

/// Recipe fields as supplied by create/update requests
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecipeFields {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub instructions: String,
    #[serde(default)]
    pub image_url: Option<String>,
    pub category: RecipeCategory,
    #[serde(default)]
    pub calories_per_serving: i64,
    #[serde(default)]
    pub protein_g: f64,
    #[serde(default)]
    pub carbs_g: f64,
    #[serde(default)]
    pub fat_g: f64,
}

/// Insert payload for a recipe row
#[derive(Debug, Clone, Serialize)]
pub struct NewRecipe {
    #[serde(flatten)]
    pub fields: RecipeFields,
    pub user_id: Uuid,
}

/// A stored ingredient row — a shared, deduplicated cache of nutrition facts
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ingredient {
    pub id: Uuid,
    /// External nutrition-API identifier, when the row came from there
    #[serde(default)]
    pub api_id: Option<String>,
    pub name: String,
    pub calories_per_g: f64,
    pub protein_per_g: f64,
    #[serde(default)]
    pub image_url: Option<String>,
}

/// Insert payload for an ingredient row
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewIngredient {
    #[serde(default)]
    pub api_id: Option<String>,
    pub name: String,
    pub calories_per_g: f64,
    pub protein_per_g: f64,
    #[serde(default)]
    pub image_url: Option<String>,
}

/// One entry of a recipe's ingredient list as supplied by create/update requests
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecipeIngredientInput {
    #[serde(default)]
    pub api_id: Option<String>,
    pub name: String,
    #[serde(default)]
    pub calories_per_g: f64,
    #[serde(default)]
    pub protein_per_g: f64,
    #[serde(default)]
    pub image_url: Option<String>,
    /// Amount in grams for the composition row
    pub amount_g: f64,
}

/// A stored composition row linking a recipe to an ingredient with a quantity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecipeIngredientRow {
    pub recipe_id: Uuid,
    pub ingredient_id: Uuid,
    pub amount_g: f64,
}

/// A stored meal-plan row
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MealPlan {
    pub id: Uuid,
    pub user_id: Uuid,
    pub date: NaiveDate,
    pub meal_type: MealSlot,
    pub recipe_id: Uuid,
}

/// Insert payload for a meal-plan row
#[derive(Debug, Clone, Serialize)]
pub struct NewMealPlan {
    pub user_id: Uuid,
    pub date: NaiveDate,
    pub meal_type: MealSlot,
    pub recipe_id: Uuid,
}

// ── Nested join wire shapes ─────────────────────────────────────────────
//
// The hosted store returns meal plans selected with
// `*, recipe:recipes(*, recipe_ingredients(amount_g, ingredients(*)))`.

/// One composition entry in the nested join shape
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompositionEntry {
    pub amount_g: f64,
    /// Missing when the joined ingredient row was deleted underneath us
    #[serde(default)]
    pub ingredients: Option<Ingredient>,
}

/// A recipe with its composition rows as returned by the nested select
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecipeWithComposition {
    #[serde(flatten)]
    pub recipe: Recipe,
    #[serde(default)]
    pub recipe_ingredients: Vec<CompositionEntry>,
}

/// A meal-plan row joined to its recipe and composition
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MealPlanRecord {
    pub id: Uuid,
    pub user_id: Uuid,
    pub date: NaiveDate,
    pub meal_type: MealSlot,
    pub recipe_id: Uuid,
    #[serde(default)]
    pub recipe: Option<RecipeWithComposition>,
}

// ── Display shapes ──────────────────────────────────────────────────────

/// Flat per-ingredient view consumed by the presentation layer
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecipeIngredientView {
    pub id: Uuid,
    #[serde(default)]
    pub api_id: Option<String>,
    pub name: String,
    pub amount_g: f64,
    pub calories_per_g: f64,
    pub protein_per_g: f64,
    #[serde(default)]
    pub image_url: Option<String>,
}

/// Recipe with a flat ingredient list
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecipeView {
    #[serde(flatten)]
    pub recipe: Recipe,
    pub ingredients: Vec<RecipeIngredientView>,
}

/// Meal-plan display shape: flat row plus flattened recipe
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MealPlanView {
    pub id: Uuid,
    pub user_id: Uuid,
    pub date: NaiveDate,
    pub meal_type: MealSlot,
    pub recipe_id: Uuid,
    pub recipe: Option<RecipeView>,
}

impl From<MealPlanRecord> for MealPlanView {
    /// Flatten the nested join shape into the display shape.
    ///
    /// Composition entries whose joined ingredient is missing are dropped
    /// rather than surfaced as holes.
    fn from(record: MealPlanRecord) -> Self {
        let recipe = record.recipe.map(|joined| {
            let ingredients = joined
                .recipe_ingredients
                .into_iter()
                .filter_map(|entry| {
                    entry.ingredients.map(|ingredient| RecipeIngredientView {
                        id: ingredient.id,
                        api_id: ingredient.api_id,
                        name: ingredient.name,
                        amount_g: entry.amount_g,
                        calories_per_g: ingredient.calories_per_g,
                        protein_per_g: ingredient.protein_per_g,
                        image_url: ingredient.image_url,
                    })
                })
                .collect();

            RecipeView {
                recipe: joined.recipe,
                ingredients,
            }
        });

        Self {
            id: record.id,
            user_id: record.user_id,
            date: record.date,
            meal_type: record.meal_type,
            recipe_id: record.recipe_id,
            recipe,
        }
    }
}
