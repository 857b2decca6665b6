// SPDX-License-Identifier: MIT
// Copyright (c) 2026 The ecd Authors

//! The cloud dataplane's resolver-facing surface: thing-group lookup and
//! component-candidate resolution. The core only consumes this contract;
//! the HTTP implementation lives in the adapters crate.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use ecd_core::CoreResult;

/// Platform attributes sent with every `resolveComponentCandidates` request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlatformAttributes {
    pub os: String,
    pub runtime: String,
    pub architecture: String,
    #[serde(rename = "architecture.detail", skip_serializing_if = "Option::is_none")]
    pub architecture_detail: Option<String>,
}

impl PlatformAttributes {
    pub fn linux_nucleus_lite(architecture: impl Into<String>, architecture_detail: Option<String>) -> Self {
        Self {
            os: "linux".to_string(),
            runtime: "aws_nucleus_lite".to_string(),
            architecture: architecture.into(),
            architecture_detail,
        }
    }
}

/// A component version the cloud resolved for a requirement, with its
/// base64-encoded recipe body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedCandidate {
    pub version: String,
    pub arn: String,
    pub recipe_base64: String,
}

#[async_trait]
pub trait CloudDataplane: Send + Sync {
    /// `GET /greengrass/v2/coreDevices/<thing>/thingGroups`
    async fn get_thing_groups(&self, thing_name: &str) -> CoreResult<Vec<String>>;

    /// `POST /greengrass/v2/resolveComponentCandidates`
    async fn resolve_component_candidates(
        &self,
        name: &str,
        requirement: &str,
        platform: &PlatformAttributes,
    ) -> CoreResult<ResolvedCandidate>;
}
