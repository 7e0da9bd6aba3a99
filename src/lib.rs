// ABOUTME: Main library entry point for the meal planning API server
// ABOUTME: CRUD for recipes, ingredients, and calendar meal plans over a hosted store
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2026 Mealplan Server Project

#![deny(unsafe_code)]

//! # Mealplan Server
//!
//! A meal-planning web backend: CRUD endpoints for recipes, ingredients,
//! and calendar meal plans, backed by a hosted relational store, with thin
//! adapters for nutrition search, image hosting, and AI recipe parsing.
//!
//! ## Architecture
//!
//! - **auth**: bearer-token validation delegated to the hosted auth provider
//! - **store**: the `MealStore` seam and its PostgREST-backed implementation
//! - **external**: Spoonacular, Cloudinary, and Gemini adapters
//! - **services**: ingredient search reconciliation and recipe composition
//! - **routes**: thin axum handlers per domain
//!
//! Each request is handled independently; there is no shared mutable state
//! beyond the HTTP connection pools.

/// Bearer-token authentication against the hosted auth provider
pub mod auth;

/// Environment-based configuration management
pub mod config;

/// Unified error handling with standard error codes and HTTP responses
pub mod errors;

/// External API clients (nutrition search, image hosting, recipe parsing)
pub mod external;

/// Structured logging setup
pub mod logging;

/// Domain models and display shapes
pub mod models;

/// HTTP route handlers organized by domain
pub mod routes;

/// Server resource wiring and the serve loop
pub mod server;

/// Business logic: search reconciliation and recipe composition
pub mod services;

/// Hosted store abstraction and its REST implementation
pub mod store;
