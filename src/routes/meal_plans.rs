// ABOUTME: Route handlers for calendar meal plans
// ABOUTME: Range listing with joined recipe composition, creation with usage bump, deletion
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2026 Mealplan Server Project

//! Meal-plan routes
//!
//! Listing returns the inclusive date range for the authenticated user
//! with each entry's recipe and composed ingredients joined in and
//! flattened into the display shape. Creation bumps the recipe's usage
//! counter through a store-side procedure on a best-effort basis.

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{delete, get},
    Json, Router,
};
use chrono::NaiveDate;
use serde::Deserialize;
use serde_json::json;
use tracing::warn;
use uuid::Uuid;

use crate::auth::Authenticator as _;
use crate::errors::AppError;
use crate::models::{MealPlanView, MealSlot, NewMealPlan};
use crate::server::ServerResources;

/// Query parameters for the range listing; both bounds are required
#[derive(Debug, Deserialize)]
pub struct MealPlanRangeQuery {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

/// Request body for creating a meal plan
#[derive(Debug, Deserialize)]
pub struct CreateMealPlanBody {
    pub date: NaiveDate,
    pub meal_type: MealSlot,
    pub recipe_id: Uuid,
}

/// Meal-plan routes handler
pub struct MealPlanRoutes;

impl MealPlanRoutes {
    /// Create all meal-plan routes
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        Router::new()
            .route(
                "/meal-plans",
                get(Self::handle_list).post(Self::handle_create),
            )
            .route("/meal-plans/:id", delete(Self::handle_delete))
            .with_state(resources)
    }

    /// Handle GET /meal-plans?start_date=&end_date= - range listing
    async fn handle_list(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Query(range): Query<MealPlanRangeQuery>,
    ) -> Result<Response, AppError> {
        let user = resources.auth.authenticate(&headers).await?;

        let records = resources
            .store
            .list_meal_plans(&user.token, user.id, range.start_date, range.end_date)
            .await?;

        let views: Vec<MealPlanView> = records.into_iter().map(Into::into).collect();
        Ok((StatusCode::OK, Json(views)).into_response())
    }

    /// Handle POST /meal-plans - create an entry and bump recipe usage
    async fn handle_create(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Json(body): Json<CreateMealPlanBody>,
    ) -> Result<Response, AppError> {
        let user = resources.auth.authenticate(&headers).await?;

        let plan = resources
            .store
            .insert_meal_plan(
                &user.token,
                &NewMealPlan {
                    user_id: user.id,
                    date: body.date,
                    meal_type: body.meal_type,
                    recipe_id: body.recipe_id,
                },
            )
            .await?
            .ok_or_else(|| AppError::invalid_input("Could not create meal plan"))?;

        // Best effort: the plan row exists; a failed usage bump is not
        // worth failing the request over
        if let Err(e) = resources
            .store
            .increment_recipe_usage(&user.token, body.recipe_id)
            .await
        {
            warn!(recipe_id = %body.recipe_id, error = %e, "usage-count increment failed");
        }

        let view = match resources
            .store
            .get_meal_plan_expanded(&user.token, plan.id)
            .await?
        {
            Some(record) => record.into(),
            None => MealPlanView {
                id: plan.id,
                user_id: plan.user_id,
                date: plan.date,
                meal_type: plan.meal_type,
                recipe_id: plan.recipe_id,
                recipe: None,
            },
        };

        Ok((StatusCode::CREATED, Json(view)).into_response())
    }

    /// Handle DELETE /meal-plans/:id - delete an owned entry
    async fn handle_delete(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Path(id): Path<Uuid>,
    ) -> Result<Response, AppError> {
        let user = resources.auth.authenticate(&headers).await?;

        // Ownership check first; rows owned by other users are
        // indistinguishable from missing rows
        resources
            .store
            .get_meal_plan_owned(&user.token, id, user.id)
            .await?
            .ok_or_else(|| AppError::not_found("Meal plan"))?;

        resources.store.delete_meal_plan(&user.token, id).await?;

        Ok((StatusCode::OK, Json(json!({"message": "Meal plan deleted"}))).into_response())
    }
}
