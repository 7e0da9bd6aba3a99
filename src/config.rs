// ABOUTME: Environment configuration management for deployment-specific settings
// ABOUTME: Reads hosted store credentials and external-service keys from the environment
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2026 Mealplan Server Project

//! Environment-based configuration management
//!
//! The server is configured entirely from environment variables. The hosted
//! store (Supabase) settings are required; each external provider is
//! optional and the matching endpoint degrades when its keys are absent.

use anyhow::{Context, Result};
use std::env;

/// Default HTTP port, matching the original deployment
const DEFAULT_HTTP_PORT: u16 = 8000;

/// Default Cloudinary folder for recipe images
const DEFAULT_UPLOAD_FOLDER: &str = "meal_planner_recipes";

/// Default Gemini model for recipe parsing
const DEFAULT_GEMINI_MODEL: &str = "gemini-flash-latest";

/// Hosted store (Supabase) connection settings
#[derive(Debug, Clone)]
pub struct SupabaseConfig {
    /// Project base URL, e.g. `https://xyz.supabase.co`
    pub url: String,
    /// Anonymous API key sent as the `apikey` header on every request
    pub anon_key: String,
}

/// Nutrition search (Spoonacular) settings
#[derive(Debug, Clone)]
pub struct SpoonacularConfig {
    /// API key; `None` disables external ingredient search
    pub api_key: Option<String>,
}

/// Image hosting (Cloudinary) settings
#[derive(Debug, Clone)]
pub struct CloudinaryConfig {
    pub cloud_name: String,
    pub api_key: String,
    pub api_secret: String,
    /// Folder uploads are placed under
    pub folder: String,
}

/// Recipe parsing (Gemini) settings
#[derive(Debug, Clone)]
pub struct GeminiConfig {
    pub api_key: String,
    pub model: String,
}

/// Complete server configuration loaded from the environment
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// HTTP listen port
    pub http_port: u16,
    /// Allowed CORS origins (`*` for any)
    pub cors_allowed_origins: String,
    /// Hosted store settings (required)
    pub supabase: SupabaseConfig,
    /// Nutrition search settings
    pub spoonacular: SpoonacularConfig,
    /// Image hosting settings; `None` disables `/recipes/upload`
    pub cloudinary: Option<CloudinaryConfig>,
    /// Recipe parser settings; `None` disables `/recipes/parse`
    pub gemini: Option<GeminiConfig>,
}

impl ServerConfig {
    /// Load configuration from environment variables
    ///
    /// # Errors
    /// Returns an error when a required variable is missing or unparseable.
    pub fn from_env() -> Result<Self> {
        let http_port = parse_env_or("HTTP_PORT", DEFAULT_HTTP_PORT)?;

        let supabase = SupabaseConfig {
            url: env::var("SUPABASE_URL")
                .context("SUPABASE_URL environment variable is required")?
                .trim_end_matches('/')
                .to_owned(),
            anon_key: env::var("SUPABASE_ANON_KEY")
                .context("SUPABASE_ANON_KEY environment variable is required")?,
        };

        let spoonacular = SpoonacularConfig {
            api_key: env_var_opt("SPOONACULAR_API_KEY"),
        };

        // Cloudinary keys are all-or-nothing; a partial set is a config error
        let cloudinary = match (
            env_var_opt("CLOUDINARY_CLOUD_NAME"),
            env_var_opt("CLOUDINARY_API_KEY"),
            env_var_opt("CLOUDINARY_API_SECRET"),
        ) {
            (Some(cloud_name), Some(api_key), Some(api_secret)) => Some(CloudinaryConfig {
                cloud_name,
                api_key,
                api_secret,
                folder: env::var("CLOUDINARY_UPLOAD_FOLDER")
                    .unwrap_or_else(|_| DEFAULT_UPLOAD_FOLDER.to_owned()),
            }),
            (None, None, None) => None,
            _ => anyhow::bail!(
                "CLOUDINARY_CLOUD_NAME, CLOUDINARY_API_KEY and CLOUDINARY_API_SECRET must be set together"
            ),
        };

        let gemini = env_var_opt("GEMINI_API_KEY").map(|api_key| GeminiConfig {
            api_key,
            model: env::var("GEMINI_MODEL").unwrap_or_else(|_| DEFAULT_GEMINI_MODEL.to_owned()),
        });

        Ok(Self {
            http_port,
            cors_allowed_origins: env::var("CORS_ALLOWED_ORIGINS").unwrap_or_else(|_| "*".into()),
            supabase,
            spoonacular,
            cloudinary,
            gemini,
        })
    }

    /// One-line summary for startup logging; never includes secrets
    #[must_use]
    pub fn summary(&self) -> String {
        format!(
            "port={} store={} nutrition_search={} image_upload={} recipe_parse={}",
            self.http_port,
            self.supabase.url,
            enabled(self.spoonacular.api_key.is_some()),
            enabled(self.cloudinary.is_some()),
            enabled(self.gemini.is_some()),
        )
    }
}

fn enabled(on: bool) -> &'static str {
    if on {
        "enabled"
    } else {
        "disabled"
    }
}

/// Read an optional environment variable, treating empty values as unset
fn env_var_opt(key: &str) -> Option<String> {
    env::var(key).ok().filter(|v| !v.trim().is_empty())
}

/// Parse an environment variable with a fallback default
fn parse_env_or<T: std::str::FromStr>(key: &str, default: T) -> Result<T>
where
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match env::var(key) {
        Ok(value) => value
            .parse()
            .with_context(|| format!("failed to parse {key}={value}")),
        Err(_) => Ok(default),
    }
}
