// ABOUTME: Gemini client turning free recipe text into structured recipe fields
// ABOUTME: Uses generateContent with a JSON response mime type and an embedded schema prompt
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2026 Mealplan Server Project

//! # Gemini Recipe Parser
//!
//! Forwards free text to the Generative AI text-completion endpoint and
//! deserializes the JSON it returns into [`ParsedRecipe`]. The model is
//! asked for `application/json` output against an inline schema; anything
//! it gets wrong surfaces as an external-service error with the raw
//! message.

use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, error};

use crate::config::GeminiConfig;
use crate::errors::{AppError, AppResult};
use crate::models::RecipeCategory;

/// Base URL for the Generative AI API
const API_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Schema the model is asked to fill in, embedded into the prompt
const RECIPE_SCHEMA: &str = r#"{
  "name": "string",
  "description": "string (brief summary)",
  "category": "string (one of: Breakfast, Lunch, Dinner, Snack, Other)",
  "calories_per_serving": "integer",
  "protein_g": "integer",
  "prep_time_minutes": "integer",
  "cook_time_minutes": "integer",
  "servings": "integer",
  "instructions": "string (markdown format supported)"
}"#;

/// Structured recipe fields extracted from free text
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParsedRecipe {
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub category: RecipeCategory,
    #[serde(default)]
    pub calories_per_serving: i64,
    #[serde(default)]
    pub protein_g: i64,
    #[serde(default)]
    pub prep_time_minutes: i64,
    #[serde(default)]
    pub cook_time_minutes: i64,
    #[serde(default)]
    pub servings: i64,
    #[serde(default)]
    pub instructions: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateRequest {
    contents: Vec<Content>,
    generation_config: GenerationConfig,
}

#[derive(Debug, Serialize, Deserialize)]
struct Content {
    #[serde(skip_serializing_if = "Option::is_none")]
    role: Option<String>,
    parts: Vec<ContentPart>,
}

#[derive(Debug, Serialize, Deserialize)]
struct ContentPart {
    text: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    response_mime_type: String,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    #[serde(default)]
    error: Option<ApiError>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<Content>,
}

#[derive(Debug, Deserialize)]
struct ApiError {
    message: String,
}

/// Recipe parsing client for the Generative AI API
#[derive(Debug, Clone)]
pub struct GeminiRecipeParser {
    client: Client,
    api_key: String,
    model: String,
    base_url: String,
}

impl GeminiRecipeParser {
    #[must_use]
    pub fn new(client: Client, config: &GeminiConfig) -> Self {
        Self {
            client,
            api_key: config.api_key.clone(),
            model: config.model.clone(),
            base_url: API_BASE_URL.to_owned(),
        }
    }

    /// Override the base URL (tests)
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Parse free recipe text into structured fields
    ///
    /// # Errors
    /// Returns an external-service error when the model call fails or the
    /// returned JSON does not match the schema.
    pub async fn parse(&self, text: &str) -> AppResult<ParsedRecipe> {
        let prompt = format!(
            "You are a culinary AI assistant.\n\
             Extract recipe details from the following text and return ONLY a valid JSON object \
             matching this schema:\n{RECIPE_SCHEMA}\n\n\
             If data is missing, make a reasonable estimate or use 0/empty string.\n\n\
             Input Text:\n{text}"
        );

        let request = GenerateRequest {
            contents: vec![Content {
                role: Some("user".to_owned()),
                parts: vec![ContentPart { text: prompt }],
            }],
            generation_config: GenerationConfig {
                response_mime_type: "application/json".to_owned(),
            },
        };

        let url = format!(
            "{}/models/{}:generateContent?key={}",
            self.base_url, self.model, self.api_key
        );

        debug!(model = %self.model, "sending recipe parse request");

        let response = self
            .client
            .post(&url)
            .json(&request)
            .send()
            .await
            .map_err(|e| AppError::external_service("Gemini", e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| AppError::external_service("Gemini", e.to_string()))?;

        if !status.is_success() {
            error!(%status, "recipe parse request rejected");
            return Err(AppError::external_service(
                "Gemini",
                format!("{status}: {body}"),
            ));
        }

        let parsed: GenerateResponse = serde_json::from_str(&body)
            .map_err(|e| AppError::external_service("Gemini", format!("malformed response: {e}")))?;

        if let Some(api_error) = parsed.error {
            return Err(AppError::external_service("Gemini", api_error.message));
        }

        let text = parsed
            .candidates
            .into_iter()
            .next()
            .and_then(|c| c.content)
            .and_then(|c| c.parts.into_iter().next())
            .map(|p| p.text)
            .ok_or_else(|| AppError::external_service("Gemini", "empty completion"))?;

        serde_json::from_str(&text).map_err(|e| {
            AppError::external_service("Gemini", format!("completion is not a recipe: {e}"))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parsed_recipe_deserializes_schema_output() {
        let json = r#"{
            "name": "Pancakes",
            "description": "Fluffy breakfast pancakes",
            "category": "Breakfast",
            "calories_per_serving": 350,
            "protein_g": 9,
            "prep_time_minutes": 10,
            "cook_time_minutes": 15,
            "servings": 4,
            "instructions": "Mix and fry."
        }"#;
        let recipe: ParsedRecipe = serde_json::from_str(json).unwrap();
        assert_eq!(recipe.name, "Pancakes");
        assert_eq!(recipe.category, RecipeCategory::Breakfast);
        assert_eq!(recipe.servings, 4);
    }

    #[test]
    fn test_parsed_recipe_tolerates_missing_numbers() {
        let json = r#"{"name": "Toast", "category": "Snack"}"#;
        let recipe: ParsedRecipe = serde_json::from_str(json).unwrap();
        assert_eq!(recipe.calories_per_serving, 0);
        assert!(recipe.instructions.is_empty());
    }

    #[test]
    fn test_request_serializes_camel_case() {
        let request = GenerateRequest {
            contents: vec![],
            generation_config: GenerationConfig {
                response_mime_type: "application/json".to_owned(),
            },
        };
        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(
            value["generationConfig"]["responseMimeType"],
            "application/json"
        );
    }
}
