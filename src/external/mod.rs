// ABOUTME: External API clients for nutrition search, image hosting, and recipe parsing
// ABOUTME: Thin reqwest pass-through adapters; no state beyond the configured client
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2026 Mealplan Server Project

//! External service adapters
//!
//! Each adapter is a thin HTTP client around one third-party API. None of
//! them retries or caches; failure semantics are decided by the calling
//! service (`/recipes/ingredients/search` degrades, parse/upload surface
//! the provider error).

/// Cloudinary signed image upload
pub mod cloudinary;
/// Gemini text-to-structured-recipe parsing
pub mod gemini;
/// Spoonacular nutrition search
pub mod spoonacular;

pub use cloudinary::CloudinaryClient;
pub use gemini::{GeminiRecipeParser, ParsedRecipe};
pub use spoonacular::{ExternalIngredient, NutritionProvider, SpoonacularClient};
