// ABOUTME: Ingredient search reconciler merging local-cache and external-API matches
// ABOUTME: Local entries win on key or name collision; either side failing degrades to the other
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2026 Mealplan Server Project

//! # Ingredient Search Reconciler
//!
//! Given a free-text query, the local ingredient cache and the external
//! nutrition API are both searched and the results merged into one
//! deduplicated list:
//!
//! - local results are emitted first and always win collisions;
//! - each entry carries a display key — the external identifier when
//!   present, the local row id otherwise;
//! - an entry is dropped when its key or its lower-cased name was already
//!   emitted; first occurrence wins within a source list;
//! - no relevance ranking beyond source order.
//!
//! Both sub-queries degrade on failure: a failing side contributes zero
//! results and the search endpoint itself never errors because of either.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use tracing::warn;
use uuid::Uuid;

use crate::external::{ExternalIngredient, NutritionProvider};
use crate::models::Ingredient;
use crate::store::MealStore;

/// Cap on local-cache matches
const LOCAL_SEARCH_CAP: u32 = 10;

/// Where a merged entry came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchSource {
    Local,
    External,
}

/// One reconciled search result in display shape
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IngredientSearchResult {
    /// Local row id; `None` for entries only known externally
    pub id: Option<Uuid>,
    pub api_id: Option<String>,
    pub name: String,
    pub calories_per_g: f64,
    pub protein_per_g: f64,
    pub image_url: Option<String>,
    pub source: SearchSource,
}

impl IngredientSearchResult {
    /// Display key: external identifier when present, local row id otherwise
    #[must_use]
    pub fn display_key(&self) -> String {
        match (&self.api_id, self.id) {
            (Some(api_id), _) => api_id.clone(),
            (None, Some(id)) => id.to_string(),
            // Unreachable for entries built by this module; both sources
            // always provide one of the two
            (None, None) => self.name.to_lowercase(),
        }
    }
}

impl From<Ingredient> for IngredientSearchResult {
    fn from(ingredient: Ingredient) -> Self {
        Self {
            id: Some(ingredient.id),
            api_id: ingredient.api_id,
            name: ingredient.name,
            calories_per_g: ingredient.calories_per_g,
            protein_per_g: ingredient.protein_per_g,
            image_url: ingredient.image_url,
            source: SearchSource::Local,
        }
    }
}

impl From<ExternalIngredient> for IngredientSearchResult {
    fn from(ingredient: ExternalIngredient) -> Self {
        Self {
            id: None,
            api_id: Some(ingredient.api_id),
            name: ingredient.name,
            calories_per_g: ingredient.calories_per_g,
            protein_per_g: ingredient.protein_per_g,
            image_url: ingredient.image_url,
            source: SearchSource::External,
        }
    }
}

/// Merge local and external matches into one deduplicated list
#[must_use]
pub fn merge_ingredient_results(
    local: Vec<Ingredient>,
    external: Vec<ExternalIngredient>,
) -> Vec<IngredientSearchResult> {
    let mut seen_keys: HashSet<String> = HashSet::new();
    let mut seen_names: HashSet<String> = HashSet::new();
    let mut merged = Vec::with_capacity(local.len() + external.len());

    let candidates = local
        .into_iter()
        .map(IngredientSearchResult::from)
        .chain(external.into_iter().map(IngredientSearchResult::from));

    for candidate in candidates {
        let key = candidate.display_key();
        let name = candidate.name.to_lowercase();
        if seen_keys.contains(&key) || seen_names.contains(&name) {
            continue;
        }
        seen_keys.insert(key);
        seen_names.insert(name);
        merged.push(candidate);
    }

    merged
}

/// Run the reconciled search for a query
///
/// Never fails: each failing sub-query is warn-logged and treated as zero
/// results, down to an empty list when both sides fail.
pub async fn search_ingredients(
    store: &dyn MealStore,
    provider: &dyn NutritionProvider,
    token: &str,
    query: &str,
) -> Vec<IngredientSearchResult> {
    let local = match store.search_ingredients(token, query, LOCAL_SEARCH_CAP).await {
        Ok(rows) => rows,
        Err(e) => {
            warn!(error = %e, "local ingredient search failed; continuing without it");
            Vec::new()
        }
    };

    let external = match provider.search(query).await {
        Ok(results) => results,
        Err(e) => {
            warn!(error = %e, "external ingredient search failed; continuing without it");
            Vec::new()
        }
    };

    merge_ingredient_results(local, external)
}
