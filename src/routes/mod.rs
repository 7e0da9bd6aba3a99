// ABOUTME: Route module organization for the meal planning HTTP API
// ABOUTME: Route definitions and thin handlers organized by domain
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2026 Mealplan Server Project

//! Route modules
//!
//! Each domain module contains route definitions and thin handlers that
//! delegate to the store and service layers. All handlers return
//! `Result<Response, AppError>`.

/// Health check routes
pub mod health;
/// Meal-plan calendar routes
pub mod meal_plans;
/// Recipe and ingredient routes
pub mod recipes;

pub use health::HealthRoutes;
pub use meal_plans::MealPlanRoutes;
pub use recipes::RecipeRoutes;
