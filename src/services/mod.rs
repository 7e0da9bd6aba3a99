// ABOUTME: Business logic extracted from route handlers
// ABOUTME: Ingredient search reconciliation and recipe composition sequences
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2026 Mealplan Server Project

//! Service layer
//!
//! Route handlers stay thin; the two pieces of logic worth testing on
//! their own live here.

/// Recipe-ingredient composition (lookup-or-insert, destructive replace)
pub mod composition;
/// Ingredient search reconciler merging local and external results
pub mod search;

pub use composition::{attach_ingredients, replace_ingredients};
pub use search::{merge_ingredient_results, search_ingredients, IngredientSearchResult};
