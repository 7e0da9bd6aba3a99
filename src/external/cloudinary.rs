// ABOUTME: Cloudinary signed image upload client returning the hosted secure URL
// ABOUTME: Signs the sorted parameter string with SHA-256 and the account API secret
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2026 Mealplan Server Project

//! # Cloudinary Client
//!
//! Signed uploads to the image CDN. The signature is the hex SHA-256 of
//! the alphabetically sorted `key=value` parameter string (everything
//! except `file`, `api_key`, and the signature itself) with the API secret
//! appended; the endpoint accepts SHA-256 digests alongside the default
//! SHA-1.

use chrono::Utc;
use reqwest::multipart::{Form, Part};
use reqwest::Client;
use serde::Deserialize;
use sha2::{Digest, Sha256};

use crate::config::CloudinaryConfig;
use crate::errors::{AppError, AppResult};

#[derive(Debug, Deserialize)]
struct UploadResponse {
    secure_url: String,
}

/// Image upload client
#[derive(Debug, Clone)]
pub struct CloudinaryClient {
    client: Client,
    config: CloudinaryConfig,
    base_url: String,
}

impl CloudinaryClient {
    #[must_use]
    pub fn new(client: Client, config: CloudinaryConfig) -> Self {
        Self {
            client,
            config,
            base_url: "https://api.cloudinary.com".to_owned(),
        }
    }

    /// Override the base URL (tests)
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Upload an image, returning the hosted secure URL
    ///
    /// # Errors
    /// Returns an external-service error with the raw provider message when
    /// the upload is rejected.
    pub async fn upload(&self, bytes: Vec<u8>, filename: &str) -> AppResult<String> {
        let public_id = filename
            .split('.')
            .next()
            .filter(|stem| !stem.is_empty())
            .unwrap_or("upload")
            .to_owned();
        let timestamp = Utc::now().timestamp().to_string();

        let signature = sign_params(
            &[
                ("folder", &self.config.folder),
                ("public_id", &public_id),
                ("timestamp", &timestamp),
            ],
            &self.config.api_secret,
        );

        let form = Form::new()
            .part(
                "file",
                Part::bytes(bytes).file_name(filename.to_owned()),
            )
            .text("api_key", self.config.api_key.clone())
            .text("timestamp", timestamp)
            .text("folder", self.config.folder.clone())
            .text("public_id", public_id)
            .text("signature_algorithm", "sha256")
            .text("signature", signature);

        let url = format!(
            "{}/v1_1/{}/image/upload",
            self.base_url, self.config.cloud_name
        );
        let response = self
            .client
            .post(&url)
            .multipart(form)
            .send()
            .await
            .map_err(|e| AppError::external_service("Cloudinary", e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::external_service(
                "Cloudinary",
                format!("upload returned {status}: {body}"),
            ));
        }

        let upload: UploadResponse = response
            .json()
            .await
            .map_err(|e| AppError::external_service("Cloudinary", e.to_string()))?;

        Ok(upload.secure_url)
    }
}

/// Build the request signature: sorted `key=value` pairs joined with `&`,
/// API secret appended, SHA-256, hex
fn sign_params(params: &[(&str, &str)], api_secret: &str) -> String {
    let mut sorted: Vec<_> = params.to_vec();
    sorted.sort_by_key(|(key, _)| *key);

    let to_sign = sorted
        .iter()
        .map(|(key, value)| format!("{key}={value}"))
        .collect::<Vec<_>>()
        .join("&");

    let mut hasher = Sha256::new();
    hasher.update(to_sign.as_bytes());
    hasher.update(api_secret.as_bytes());
    hex::encode(hasher.finalize())
}
