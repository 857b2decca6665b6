// SPDX-License-Identifier: MIT
// Copyright (c) 2026 The ecd Authors

//! The ECR authorization client (§4.5): calls ECR's `GetAuthorizationToken`
//! action, signed with TES credentials, to obtain short-lived basic-auth
//! credentials for `docker login`, implementing [`EcrCredentialsProvider`].

use async_trait::async_trait;
use base64::Engine;
use ecd_core::{CoreError, CoreResult};
use ecd_fetch::{AwsCredentials, EcrCredentials, EcrCredentialsProvider, Sigv4Signer};
use serde::Deserialize;

const SERVICE: &str = "ecr";

pub struct EcrCredentialsClient<S> {
    client: reqwest::Client,
    signer: S,
}

impl<S: Sigv4Signer> EcrCredentialsClient<S> {
    pub fn new(client: reqwest::Client, signer: S) -> Self {
        Self { client, signer }
    }
}

#[derive(Deserialize)]
struct GetAuthorizationTokenResponse {
    #[serde(rename = "authorizationData")]
    authorization_data: Vec<AuthorizationData>,
}

#[derive(Deserialize)]
struct AuthorizationData {
    #[serde(rename = "authorizationToken")]
    authorization_token: String,
}

#[async_trait]
impl<S: Sigv4Signer + Send + Sync> EcrCredentialsProvider for EcrCredentialsClient<S> {
    async fn ecr_credentials(&self, registry: &str, tes: &AwsCredentials) -> CoreResult<EcrCredentials> {
        let region = region_from_registry(registry)
            .ok_or_else(|| CoreError::invalid(format!("{registry} is not an ECR registry host")))?;
        let host = format!("api.ecr.{region}.amazonaws.com");
        let path = "/";

        let mut headers = self.signer.sign("POST", &host, path, region, SERVICE, tes)?;
        headers.push(("Content-Type".to_string(), "application/x-amz-json-1.1".to_string()));
        headers.push(("X-Amz-Target".to_string(), "AmazonEC2ContainerRegistry_V20150921.GetAuthorizationToken".to_string()));

        let mut request = self.client.post(format!("https://{host}{path}")).body("{}");
        for (name, value) in headers {
            request = request.header(name, value);
        }

        let response = request.send().await.map_err(|e| CoreError::failure(format!("calling ECR GetAuthorizationToken: {e}")))?;
        if !response.status().is_success() {
            return Err(CoreError::failure(format!("ECR GetAuthorizationToken returned {}", response.status())));
        }
        let body: GetAuthorizationTokenResponse =
            response.json().await.map_err(|e| CoreError::parse(format!("decoding ECR auth response: {e}")))?;
        let token = body
            .authorization_data
            .into_iter()
            .next()
            .ok_or_else(|| CoreError::parse("ECR auth response had no authorizationData"))?
            .authorization_token;

        decode_basic_auth(&token)
    }
}

fn region_from_registry(registry: &str) -> Option<&str> {
    let host = registry.split('/').next().unwrap_or(registry);
    let rest = host.strip_suffix(".amazonaws.com")?;
    rest.split('.').nth(3)
}

fn decode_basic_auth(token: &str) -> CoreResult<EcrCredentials> {
    let decoded = base64::engine::general_purpose::STANDARD
        .decode(token)
        .map_err(|e| CoreError::parse(format!("decoding ECR authorization token: {e}")))?;
    let decoded = String::from_utf8(decoded).map_err(|e| CoreError::parse(format!("ECR token was not utf-8: {e}")))?;
    let (username, password) =
        decoded.split_once(':').ok_or_else(|| CoreError::parse("ECR token missing username:password separator"))?;
    Ok(EcrCredentials { username: username.to_string(), password: password.to_string() })
}

#[cfg(test)]
#[path = "ecr_credentials_tests.rs"]
mod tests;
