// SPDX-License-Identifier: MIT
// Copyright (c) 2026 The ecd Authors

//! The token-exchange service (TES) client (§1, §4.3 step 3): retrieves
//! short-lived AWS credentials for signing outbound S3/ECR requests,
//! implementing [`TesCredentialsProvider`].
//!
//! TES is itself a local Greengrass component exposing credentials over
//! plain HTTP, authenticated with a bearer token the nucleus supplies via
//! `AWS_CONTAINER_AUTHORIZATION_TOKEN`/`AWS_CONTAINER_CREDENTIALS_FULL_URI`
//! environment variables — the same scheme the AWS SDKs' container
//! credentials provider uses.

use async_trait::async_trait;
use ecd_core::{CoreError, CoreResult};
use ecd_fetch::{AwsCredentials, TesCredentialsProvider};
use serde::Deserialize;

const AUTH_TOKEN_ENV: &str = "AWS_CONTAINER_AUTHORIZATION_TOKEN";
const CREDENTIALS_URL_ENV: &str = "AWS_CONTAINER_CREDENTIALS_FULL_URI";

pub struct TesCredentialsClient {
    client: reqwest::Client,
}

impl TesCredentialsClient {
    pub fn new(client: reqwest::Client) -> Self {
        Self { client }
    }
}

#[derive(Deserialize)]
struct TesResponse {
    #[serde(rename = "AccessKeyId")]
    access_key_id: String,
    #[serde(rename = "SecretAccessKey")]
    secret_access_key: String,
    #[serde(rename = "Token")]
    token: Option<String>,
}

#[async_trait]
impl TesCredentialsProvider for TesCredentialsClient {
    async fn credentials(&self) -> CoreResult<AwsCredentials> {
        let url = std::env::var(CREDENTIALS_URL_ENV)
            .map_err(|_| CoreError::failure(format!("{CREDENTIALS_URL_ENV} not set, TES unavailable")))?;
        let mut request = self.client.get(&url);
        if let Ok(token) = std::env::var(AUTH_TOKEN_ENV) {
            request = request.header("Authorization", token);
        }

        let response = request.send().await.map_err(|e| CoreError::failure(format!("fetching TES credentials: {e}")))?;
        if !response.status().is_success() {
            return Err(CoreError::failure(format!("TES credentials request returned {}", response.status())));
        }
        let body: TesResponse =
            response.json().await.map_err(|e| CoreError::parse(format!("decoding TES credentials: {e}")))?;

        Ok(AwsCredentials {
            access_key_id: body.access_key_id,
            secret_access_key: body.secret_access_key,
            session_token: body.token,
        })
    }
}

#[cfg(test)]
#[path = "tes_credentials_tests.rs"]
mod tests;
