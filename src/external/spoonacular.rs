// ABOUTME: Spoonacular nutrition-search client implementing the NutritionProvider seam
// ABOUTME: Two-phase lookup: name search, then per-item macro detail, capped to protect quota
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2026 Mealplan Server Project

//! # Spoonacular Client
//!
//! External half of the ingredient search. The API has no bulk macro
//! endpoint, so each search hit costs one additional detail call; the
//! detail phase is capped below the search cap to bound latency and quota
//! use. Macro values are requested per 100 g and stored per gram.

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, warn};

use crate::config::SpoonacularConfig;
use crate::errors::{AppError, AppResult};

/// Base URL for the Spoonacular API
const API_BASE_URL: &str = "https://api.spoonacular.com";

/// How many search hits to request
const SEARCH_CAP: u32 = 5;

/// How many hits get the per-item detail call
const DETAIL_CAP: usize = 3;

/// An ingredient candidate from the external nutrition API
#[derive(Debug, Clone, PartialEq)]
pub struct ExternalIngredient {
    /// External identifier, stored as `api_id` on cached rows
    pub api_id: String,
    pub name: String,
    pub calories_per_g: f64,
    pub protein_per_g: f64,
    pub image_url: Option<String>,
}

/// Seam for the external nutrition search, mockable in tests
#[async_trait]
pub trait NutritionProvider: Send + Sync {
    /// Search ingredients by free text, returning macro-annotated candidates
    async fn search(&self, query: &str) -> AppResult<Vec<ExternalIngredient>>;
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    results: Vec<SearchHit>,
}

#[derive(Debug, Deserialize)]
struct SearchHit {
    id: u64,
    name: String,
}

#[derive(Debug, Deserialize)]
struct IngredientInformation {
    id: u64,
    name: String,
    #[serde(default)]
    image: Option<String>,
    #[serde(default)]
    nutrition: Option<NutritionBlock>,
}

#[derive(Debug, Deserialize)]
struct NutritionBlock {
    #[serde(default)]
    nutrients: Vec<Nutrient>,
}

#[derive(Debug, Deserialize)]
struct Nutrient {
    name: String,
    amount: f64,
}

/// Spoonacular API client
#[derive(Debug, Clone)]
pub struct SpoonacularClient {
    client: Client,
    api_key: Option<String>,
    base_url: String,
}

impl SpoonacularClient {
    #[must_use]
    pub fn new(client: Client, config: &SpoonacularConfig) -> Self {
        Self {
            client,
            api_key: config.api_key.clone(),
            base_url: API_BASE_URL.to_owned(),
        }
    }

    /// Override the base URL (tests)
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    async fn fetch_detail(&self, api_key: &str, hit: &SearchHit) -> AppResult<ExternalIngredient> {
        let url = format!("{}/food/ingredients/{}/information", self.base_url, hit.id);
        let response = self
            .client
            .get(&url)
            .query(&[
                ("apiKey", api_key),
                ("amount", "100"),
                ("unit", "grams"),
            ])
            .send()
            .await
            .map_err(|e| AppError::external_service("Spoonacular", e.to_string()))?;

        if !response.status().is_success() {
            return Err(AppError::external_service(
                "Spoonacular",
                format!("detail request for {} returned {}", hit.id, response.status()),
            ));
        }

        let info: IngredientInformation = response
            .json()
            .await
            .map_err(|e| AppError::external_service("Spoonacular", e.to_string()))?;

        let nutrients = info
            .nutrition
            .map(|n| n.nutrients)
            .unwrap_or_default();
        let per_100g = |name: &str| {
            nutrients
                .iter()
                .find(|n| n.name == name)
                .map_or(0.0, |n| n.amount)
        };

        Ok(ExternalIngredient {
            api_id: info.id.to_string(),
            name: info.name,
            calories_per_g: round4(per_100g("Calories") / 100.0),
            protein_per_g: round4(per_100g("Protein") / 100.0),
            image_url: info
                .image
                .map(|image| format!("https://spoonacular.com/cdn/ingredients_100x100/{image}")),
        })
    }
}

#[async_trait]
impl NutritionProvider for SpoonacularClient {
    async fn search(&self, query: &str) -> AppResult<Vec<ExternalIngredient>> {
        let Some(api_key) = self.api_key.as_deref() else {
            debug!("nutrition search skipped: no API key configured");
            return Ok(Vec::new());
        };

        let url = format!("{}/food/ingredients/search", self.base_url);
        let number = SEARCH_CAP.to_string();
        let response = self
            .client
            .get(&url)
            .query(&[
                ("apiKey", api_key),
                ("query", query),
                ("number", number.as_str()),
            ])
            .send()
            .await
            .map_err(|e| AppError::external_service("Spoonacular", e.to_string()))?;

        if !response.status().is_success() {
            return Err(AppError::external_service(
                "Spoonacular",
                format!("search returned {}", response.status()),
            ));
        }

        let search: SearchResponse = response
            .json()
            .await
            .map_err(|e| AppError::external_service("Spoonacular", e.to_string()))?;

        let mut results = Vec::new();
        for hit in search.results.iter().take(DETAIL_CAP) {
            match self.fetch_detail(api_key, hit).await {
                Ok(ingredient) => results.push(ingredient),
                // One bad item must not sink the whole search
                Err(e) => warn!(name = %hit.name, error = %e, "skipping ingredient detail"),
            }
        }

        Ok(results)
    }
}

/// Round to four decimal places, matching the stored per-gram precision
fn round4(value: f64) -> f64 {
    (value * 10_000.0).round() / 10_000.0
}
