// ABOUTME: Bearer-token authentication delegated to the hosted auth provider
// ABOUTME: Extracts the Authorization header and validates the token via GET /auth/v1/user
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2026 Mealplan Server Project

//! # Auth Adapter
//!
//! No tokens are minted or verified locally. The bearer token from the
//! incoming request is validated by asking the hosted auth provider for
//! the user it belongs to; the raw token is then forwarded to every store
//! call so the store's row-level security sees the same identity.

use async_trait::async_trait;
use http::HeaderMap;
use reqwest::Client;
use serde::Deserialize;
use tracing::debug;
use uuid::Uuid;

use crate::config::SupabaseConfig;
use crate::errors::{AppError, AppResult};

/// The identity resolved for an authenticated request
#[derive(Debug, Clone)]
pub struct AuthenticatedUser {
    /// User id as assigned by the auth provider
    pub id: Uuid,
    pub email: Option<String>,
    /// The raw bearer token, forwarded to the store for row-level security
    pub token: String,
}

/// Seam for request authentication, mockable in tests
#[async_trait]
pub trait Authenticator: Send + Sync {
    /// Authenticate an incoming request from its headers
    async fn authenticate(&self, headers: &HeaderMap) -> AppResult<AuthenticatedUser>;
}

/// Response shape of the provider's user endpoint
#[derive(Debug, Deserialize)]
struct ProviderUser {
    id: Uuid,
    #[serde(default)]
    email: Option<String>,
}

/// Auth adapter backed by the hosted provider's HTTP API
#[derive(Debug, Clone)]
pub struct SupabaseAuth {
    client: Client,
    base_url: String,
    anon_key: String,
}

impl SupabaseAuth {
    #[must_use]
    pub fn new(client: Client, config: &SupabaseConfig) -> Self {
        Self {
            client,
            base_url: config.url.clone(),
            anon_key: config.anon_key.clone(),
        }
    }

    /// Resolve the user a bearer token belongs to
    ///
    /// # Errors
    /// Returns `AuthInvalid` when the provider rejects the token or cannot
    /// be reached; the provider message is surfaced to the caller.
    pub async fn get_user(&self, token: &str) -> AppResult<AuthenticatedUser> {
        let url = format!("{}/auth/v1/user", self.base_url);
        let response = self
            .client
            .get(&url)
            .header("apikey", &self.anon_key)
            .bearer_auth(token)
            .send()
            .await
            .map_err(|e| AppError::auth_invalid(format!("auth provider unreachable: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            debug!(%status, "auth provider rejected token");
            return Err(AppError::auth_invalid(format!(
                "Invalid Authentication Token: {body}"
            )));
        }

        let user: ProviderUser = response
            .json()
            .await
            .map_err(|e| AppError::auth_invalid(format!("malformed auth response: {e}")))?;

        Ok(AuthenticatedUser {
            id: user.id,
            email: user.email,
            token: token.to_owned(),
        })
    }
}

#[async_trait]
impl Authenticator for SupabaseAuth {
    /// `AuthRequired` when the Authorization header is absent, `AuthInvalid`
    /// when the provider rejects the token.
    async fn authenticate(&self, headers: &HeaderMap) -> AppResult<AuthenticatedUser> {
        let token = bearer_token(headers).ok_or_else(AppError::auth_required)?;
        self.get_user(token).await
    }
}

/// Extract the bearer token from an Authorization header, if present
#[must_use]
pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    let value = headers.get(http::header::AUTHORIZATION)?.to_str().ok()?;
    let token = value.strip_prefix("Bearer ").unwrap_or(value).trim();
    if token.is_empty() {
        None
    } else {
        Some(token)
    }
}
