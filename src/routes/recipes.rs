// ABOUTME: Route handlers for recipes, the ingredient cache, and ingredient search
// ABOUTME: Also hosts the unauthenticated parse and upload adapter endpoints
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2026 Mealplan Server Project

//! Recipe routes
//!
//! CRUD on recipes (ownership-checked), the shared ingredient cache, the
//! reconciled ingredient search, and the two pass-through adapter
//! endpoints (`/recipes/parse`, `/recipes/upload`). Everything except
//! parse and upload requires a bearer token validated against the hosted
//! auth provider.

use std::sync::Arc;

use axum::{
    extract::{Multipart, Path, Query, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post, put},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::warn;
use uuid::Uuid;

use crate::auth::Authenticator as _;
use crate::errors::{AppError, ErrorCode};
use crate::models::{NewRecipe, RecipeCategory, RecipeFields, RecipeIngredientInput};
use crate::server::ServerResources;
use crate::services;

/// Query parameters for listing recipes
#[derive(Debug, Deserialize, Default)]
pub struct ListRecipesQuery {
    /// Filter by category
    pub category: Option<RecipeCategory>,
}

/// Query parameters for ingredient search
#[derive(Debug, Deserialize)]
pub struct IngredientSearchQuery {
    /// Free-text search query
    pub q: String,
}

/// Request body for creating or updating a recipe
#[derive(Debug, Deserialize)]
pub struct RecipeBody {
    #[serde(flatten)]
    pub fields: RecipeFields,
    /// Optional ingredient list; on update, replaces the prior list
    #[serde(default)]
    pub ingredients: Option<Vec<RecipeIngredientInput>>,
}

/// Request body for recipe text parsing
#[derive(Debug, Deserialize)]
pub struct ParseRecipeBody {
    pub text: String,
}

/// Response for an uploaded image
#[derive(Debug, Serialize, Deserialize)]
pub struct UploadResponse {
    pub url: String,
}

/// Recipe routes handler
pub struct RecipeRoutes;

impl RecipeRoutes {
    /// Create all recipe routes
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        Router::new()
            .route("/recipes", get(Self::handle_list).post(Self::handle_create))
            .route("/recipes/ingredients", get(Self::handle_list_ingredients))
            .route(
                "/recipes/ingredients/search",
                get(Self::handle_search_ingredients),
            )
            .route("/recipes/parse", post(Self::handle_parse))
            .route("/recipes/upload", post(Self::handle_upload))
            .route(
                "/recipes/:id",
                put(Self::handle_update).delete(Self::handle_delete),
            )
            .with_state(resources)
    }

    /// Handle GET /recipes - list owned recipes, most used first
    async fn handle_list(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Query(query): Query<ListRecipesQuery>,
    ) -> Result<Response, AppError> {
        let user = resources.auth.authenticate(&headers).await?;
        let recipes = resources
            .store
            .list_recipes(&user.token, user.id, query.category)
            .await?;
        Ok((StatusCode::OK, Json(recipes)).into_response())
    }

    /// Handle POST /recipes - create a recipe, optionally with ingredients
    async fn handle_create(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Json(body): Json<RecipeBody>,
    ) -> Result<Response, AppError> {
        let user = resources.auth.authenticate(&headers).await?;

        let recipe = resources
            .store
            .create_recipe(
                &user.token,
                &NewRecipe {
                    fields: body.fields,
                    user_id: user.id,
                },
            )
            .await?
            .ok_or_else(|| AppError::invalid_input("Could not create recipe"))?;

        if let Some(items) = body.ingredients.as_deref() {
            // The recipe row exists either way; a composition failure is
            // logged and leaves a partial list rather than failing the
            // create
            if let Err(e) =
                services::attach_ingredients(&*resources.store, &user.token, recipe.id, items)
                    .await
            {
                warn!(recipe_id = %recipe.id, error = %e, "failed to attach ingredients");
            }
        }

        Ok((StatusCode::CREATED, Json(recipe)).into_response())
    }

    /// Handle PUT /recipes/:id - update an owned recipe
    async fn handle_update(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Path(id): Path<Uuid>,
        Json(body): Json<RecipeBody>,
    ) -> Result<Response, AppError> {
        let user = resources.auth.authenticate(&headers).await?;

        let recipe = resources
            .store
            .update_recipe(&user.token, id, user.id, &body.fields)
            .await?
            .ok_or_else(|| {
                AppError::new(
                    ErrorCode::ResourceNotFound,
                    "Recipe not found or not owned by user",
                )
            })?;

        if let Some(items) = body.ingredients.as_deref() {
            // Destructive replace; failures leave partial state (documented
            // gap) and the update response still succeeds
            if let Err(e) =
                services::replace_ingredients(&*resources.store, &user.token, recipe.id, items)
                    .await
            {
                warn!(recipe_id = %recipe.id, error = %e, "failed to replace ingredients");
            }
        }

        Ok((StatusCode::OK, Json(recipe)).into_response())
    }

    /// Handle DELETE /recipes/:id - delete an owned recipe
    async fn handle_delete(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Path(id): Path<Uuid>,
    ) -> Result<Response, AppError> {
        let user = resources.auth.authenticate(&headers).await?;

        // Ownership check first; the store is never touched for rows the
        // caller does not own
        resources
            .store
            .get_recipe_owned(&user.token, id, user.id)
            .await?
            .ok_or_else(|| AppError::not_found("Recipe"))?;

        resources.store.delete_recipe(&user.token, id).await?;

        Ok((StatusCode::OK, Json(json!({"message": "Recipe deleted"}))).into_response())
    }

    /// Handle GET /recipes/ingredients - list the shared ingredient cache
    async fn handle_list_ingredients(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
    ) -> Result<Response, AppError> {
        let user = resources.auth.authenticate(&headers).await?;
        let ingredients = resources.store.list_ingredients(&user.token).await?;
        Ok((StatusCode::OK, Json(ingredients)).into_response())
    }

    /// Handle GET /recipes/ingredients/search?q= - reconciled search
    async fn handle_search_ingredients(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Query(query): Query<IngredientSearchQuery>,
    ) -> Result<Response, AppError> {
        let user = resources.auth.authenticate(&headers).await?;

        let results = services::search_ingredients(
            &*resources.store,
            &*resources.nutrition,
            &user.token,
            &query.q,
        )
        .await;

        Ok((StatusCode::OK, Json(results)).into_response())
    }

    /// Handle POST /recipes/parse - free text to structured recipe fields
    async fn handle_parse(
        State(resources): State<Arc<ServerResources>>,
        Json(body): Json<ParseRecipeBody>,
    ) -> Result<Response, AppError> {
        let parser = resources
            .parser
            .as_ref()
            .ok_or_else(|| AppError::external_service("Gemini", "recipe parsing not configured"))?;

        let parsed = parser.parse(&body.text).await?;
        Ok((StatusCode::OK, Json(parsed)).into_response())
    }

    /// Handle POST /recipes/upload - image upload returning the hosted URL
    async fn handle_upload(
        State(resources): State<Arc<ServerResources>>,
        mut multipart: Multipart,
    ) -> Result<Response, AppError> {
        let images = resources
            .images
            .as_ref()
            .ok_or_else(|| AppError::external_service("Cloudinary", "image upload not configured"))?;

        while let Some(field) = multipart
            .next_field()
            .await
            .map_err(|e| AppError::invalid_input(format!("invalid multipart body: {e}")))?
        {
            if field.name() != Some("file") {
                continue;
            }

            let filename = field.file_name().unwrap_or("upload").to_owned();
            let bytes = field
                .bytes()
                .await
                .map_err(|e| AppError::invalid_input(format!("unreadable upload: {e}")))?;

            let url = images.upload(bytes.to_vec(), &filename).await?;
            return Ok((StatusCode::OK, Json(UploadResponse { url })).into_response());
        }

        Err(AppError::invalid_input("missing 'file' field in upload"))
    }
}
