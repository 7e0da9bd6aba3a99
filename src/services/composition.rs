// ABOUTME: Recipe-ingredient composition: lookup-or-insert per ingredient, then link rows
// ABOUTME: Updates are destructive-replace with no transactional guarantee
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2026 Mealplan Server Project

//! # Recipe Composition
//!
//! Attaching an ingredient list to a recipe is a multi-step sequence
//! against the hosted store: per ingredient, find an existing cache row by
//! external identifier, then by exact name, else insert one; then insert
//! the composition row with the supplied amount.
//!
//! Updates replace the whole list: all prior composition rows are deleted
//! and the new list re-inserted. The store offers no transaction here, so
//! a mid-sequence failure leaves the recipe's ingredient list inconsistent.
//! That gap is inherited from the original system and deliberately kept;
//! callers log and swallow errors from these functions rather than failing
//! the enclosing recipe request.

use uuid::Uuid;

use crate::errors::AppResult;
use crate::models::{Ingredient, NewIngredient, RecipeIngredientInput};
use crate::store::MealStore;

/// Resolve an input to an ingredient cache row, inserting one if needed
///
/// Uniqueness is best effort only: lookup by external identifier, then by
/// exact name, before insert. Concurrent inserts of the same ingredient
/// can still race.
async fn resolve_ingredient(
    store: &dyn MealStore,
    token: &str,
    input: &RecipeIngredientInput,
) -> AppResult<Ingredient> {
    if let Some(api_id) = input.api_id.as_deref() {
        if let Some(existing) = store.find_ingredient_by_api_id(token, api_id).await? {
            return Ok(existing);
        }
    }

    if let Some(existing) = store.find_ingredient_by_name(token, &input.name).await? {
        return Ok(existing);
    }

    store
        .insert_ingredient(
            token,
            &NewIngredient {
                api_id: input.api_id.clone(),
                name: input.name.clone(),
                calories_per_g: input.calories_per_g,
                protein_per_g: input.protein_per_g,
                image_url: input.image_url.clone(),
            },
        )
        .await
}

/// Attach an ingredient list to a recipe
///
/// # Errors
/// Fails on the first store error; composition rows inserted before the
/// failure remain.
pub async fn attach_ingredients(
    store: &dyn MealStore,
    token: &str,
    recipe_id: Uuid,
    items: &[RecipeIngredientInput],
) -> AppResult<()> {
    for item in items {
        let ingredient = resolve_ingredient(store, token, item).await?;
        store
            .insert_recipe_ingredient(token, recipe_id, ingredient.id, item.amount_g)
            .await?;
    }
    Ok(())
}

/// Replace a recipe's ingredient list (destructive, not a diff)
///
/// # Errors
/// Fails on the first store error; a failure after the delete leaves the
/// recipe with a partial list.
pub async fn replace_ingredients(
    store: &dyn MealStore,
    token: &str,
    recipe_id: Uuid,
    items: &[RecipeIngredientInput],
) -> AppResult<()> {
    store.delete_recipe_ingredients(token, recipe_id).await?;
    attach_ingredients(store, token, recipe_id, items).await
}
