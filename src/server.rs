// ABOUTME: Server resource wiring, router assembly, and the serve loop
// ABOUTME: Bundles store, auth, and external adapters into shared Arc state
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2026 Mealplan Server Project

//! # Server Assembly
//!
//! [`ServerResources`] is the dependency bundle every route group receives
//! as axum state. All components are request-scoped in behavior; the only
//! shared pieces are the HTTP connection pools inside the reqwest clients.

use std::sync::Arc;

use anyhow::{Context, Result};
use axum::Router;
use http::HeaderValue;
use tower_http::cors::{Any, CorsLayer};
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::auth::{Authenticator, SupabaseAuth};
use crate::config::ServerConfig;
use crate::external::{
    CloudinaryClient, GeminiRecipeParser, NutritionProvider, SpoonacularClient,
};
use crate::routes::{HealthRoutes, MealPlanRoutes, RecipeRoutes};
use crate::store::{MealStore, SupabaseStore};

/// Upload body cap; Cloudinary's free-tier image limit is 10 MB
const MAX_BODY_BYTES: usize = 10 * 1024 * 1024;

/// Shared dependencies handed to route handlers as axum state
pub struct ServerResources {
    /// Hosted store adapter
    pub store: Arc<dyn MealStore>,
    /// Request authentication adapter
    pub auth: Arc<dyn Authenticator>,
    /// External nutrition search
    pub nutrition: Arc<dyn NutritionProvider>,
    /// Image hosting; `None` disables `/recipes/upload`
    pub images: Option<CloudinaryClient>,
    /// Recipe parser; `None` disables `/recipes/parse`
    pub parser: Option<GeminiRecipeParser>,
}

impl ServerResources {
    /// Build production resources from configuration
    ///
    /// # Errors
    /// Fails when the shared HTTP client cannot be constructed.
    pub fn from_config(config: &ServerConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("mealplan-server/", env!("CARGO_PKG_VERSION")))
            .build()
            .context("failed to build HTTP client")?;

        Ok(Self {
            store: Arc::new(SupabaseStore::new(client.clone(), &config.supabase)),
            auth: Arc::new(SupabaseAuth::new(client.clone(), &config.supabase)),
            nutrition: Arc::new(SpoonacularClient::new(client.clone(), &config.spoonacular)),
            images: config
                .cloudinary
                .clone()
                .map(|c| CloudinaryClient::new(client.clone(), c)),
            parser: config
                .gemini
                .as_ref()
                .map(|c| GeminiRecipeParser::new(client.clone(), c)),
        })
    }
}

/// Assemble the full application router
pub fn build_router(config: &ServerConfig, resources: Arc<ServerResources>) -> Router {
    let cors = cors_layer(&config.cors_allowed_origins);

    Router::new()
        .merge(HealthRoutes::routes())
        .merge(RecipeRoutes::routes(resources.clone()))
        .merge(MealPlanRoutes::routes(resources))
        .layer(TraceLayer::new_for_http())
        .layer(RequestBodyLimitLayer::new(MAX_BODY_BYTES))
        .layer(cors)
}

/// Build the CORS layer from the configured origin list
fn cors_layer(allowed_origins: &str) -> CorsLayer {
    if allowed_origins.trim() == "*" {
        return CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any);
    }

    let origins: Vec<HeaderValue> = allowed_origins
        .split(',')
        .filter_map(|origin| origin.trim().parse().ok())
        .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods(Any)
        .allow_headers(Any)
}

/// Bind and serve until interrupted
///
/// # Errors
/// Fails when the listen address cannot be bound.
pub async fn serve(config: &ServerConfig, resources: Arc<ServerResources>) -> Result<()> {
    let router = build_router(config, resources);

    let addr = format!("0.0.0.0:{}", config.http_port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;

    info!("listening on {addr}");

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to install shutdown handler");
        return;
    }
    info!("shutdown signal received");
}
