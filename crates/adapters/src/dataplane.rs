// SPDX-License-Identifier: MIT
// Copyright (c) 2026 The ecd Authors

//! The cloud dataplane HTTP client (§6): mTLS GET/POST against
//! `greengrassDataPlanePort`, implementing the resolver's
//! [`CloudDataplane`] and the fetch pipeline's
//! [`GreengrassArtifactDataplane`] contracts.

use async_trait::async_trait;
use ecd_core::{CoreError, CoreResult};
use ecd_fetch::GreengrassArtifactDataplane;
use ecd_resolver::{CloudDataplane, PlatformAttributes, ResolvedCandidate};
use serde::Deserialize;
use serde_json::json;

pub struct HttpDataplane {
    client: reqwest::Client,
    base_url: String,
}

impl HttpDataplane {
    pub fn new(client: reqwest::Client, endpoint: &str, port: &str) -> Self {
        Self { client, base_url: format!("https://{endpoint}:{port}") }
    }

    async fn get(&self, path: &str) -> CoreResult<reqwest::Response> {
        self.client
            .get(format!("{}{path}", self.base_url))
            .send()
            .await
            .map_err(|e| CoreError::failure(format!("dataplane GET {path}: {e}")))
    }
}

#[derive(Deserialize)]
struct ThingGroupsResponse {
    #[serde(rename = "thingGroups", default)]
    thing_groups: Vec<ThingGroupEntry>,
}

#[derive(Deserialize)]
struct ThingGroupEntry {
    #[serde(rename = "groupName")]
    group_name: String,
}

#[derive(Deserialize)]
struct ResolveComponentCandidatesResponse {
    #[serde(rename = "componentVersion")]
    component_version: String,
    #[serde(rename = "arn")]
    arn: String,
    #[serde(rename = "recipe")]
    recipe_base64: String,
}

#[derive(Deserialize)]
struct ArtifactResponse {
    #[serde(rename = "preSignedUrl")]
    pre_signed_url: String,
}

#[async_trait]
impl CloudDataplane for HttpDataplane {
    async fn get_thing_groups(&self, thing_name: &str) -> CoreResult<Vec<String>> {
        let response = self.get(&format!("/greengrass/v2/coreDevices/{thing_name}/thingGroups")).await?;
        if !response.status().is_success() {
            return Err(CoreError::Remote(format!("get thing groups returned {}", response.status())));
        }
        let body: ThingGroupsResponse = response
            .json()
            .await
            .map_err(|e| CoreError::parse(format!("decoding thing-groups response: {e}")))?;
        Ok(body.thing_groups.into_iter().map(|g| g.group_name).collect())
    }

    async fn resolve_component_candidates(
        &self,
        name: &str,
        requirement: &str,
        platform: &PlatformAttributes,
    ) -> CoreResult<ResolvedCandidate> {
        let body = json!({
            "componentName": name,
            "versionRequirement": requirement,
            "platform": platform,
        });
        let response = self
            .client
            .post(format!("{}/greengrass/v2/resolveComponentCandidates", self.base_url))
            .json(&body)
            .send()
            .await
            .map_err(|e| CoreError::failure(format!("resolveComponentCandidates: {e}")))?;
        if !response.status().is_success() {
            return Err(CoreError::Remote(format!("resolveComponentCandidates returned {}", response.status())));
        }
        let parsed: ResolveComponentCandidatesResponse = response
            .json()
            .await
            .map_err(|e| CoreError::parse(format!("decoding resolveComponentCandidates response: {e}")))?;
        Ok(ResolvedCandidate { version: parsed.component_version, arn: parsed.arn, recipe_base64: parsed.recipe_base64 })
    }
}

#[async_trait]
impl GreengrassArtifactDataplane for HttpDataplane {
    async fn presigned_url(&self, component_arn: &str, path: &str) -> CoreResult<String> {
        let encoded_arn = urlencode(component_arn);
        let response = self.get(&format!("/greengrass/v2/components/{encoded_arn}/artifacts/{path}")).await?;
        if !response.status().is_success() {
            return Err(CoreError::Remote(format!("artifact presign returned {}", response.status())));
        }
        let parsed: ArtifactResponse = response
            .json()
            .await
            .map_err(|e| CoreError::parse(format!("decoding artifact presign response: {e}")))?;
        Ok(parsed.pre_signed_url)
    }
}

/// Minimal percent-encoding for the `:`/`/` characters an ARN contains when
/// used as a path segment; the dataplane's ARNs never contain other
/// reserved characters.
fn urlencode(value: &str) -> String {
    value.replace(':', "%3A").replace('/', "%2F")
}

#[cfg(test)]
#[path = "dataplane_tests.rs"]
mod tests;
