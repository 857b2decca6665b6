// SPDX-License-Identifier: MIT
// Copyright (c) 2026 The ecd Authors

//! The deployment document: a request to converge the device on a set of
//! component versions.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::error::{CoreError, CoreResult};
use crate::id::DeploymentId;

/// The thing-group name recorded for deployments submitted through the
/// local CLI/IPC entry point rather than a cloud job.
pub const LOCAL_DEPLOYMENTS_GROUP: &str = "LOCAL_DEPLOYMENTS";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DeploymentType {
    Local,
    ThingGroup,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DeploymentState {
    Queued,
    InProgress,
}

impl Default for DeploymentState {
    fn default() -> Self {
        Self::Queued
    }
}

/// A per-component configuration update: `reset` runs before `merge`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ConfigurationUpdate {
    #[serde(default)]
    pub reset: Vec<String>,
    #[serde(default)]
    pub merge: Option<serde_json::Value>,
}

/// A single root component entry in a deployment document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComponentRequest {
    pub version: String,
    #[serde(rename = "configurationUpdate", default, skip_serializing_if = "Option::is_none")]
    pub configuration_update: Option<ConfigurationUpdate>,
}

impl ComponentRequest {
    pub fn new(version: impl Into<String>) -> Self {
        Self { version: version.into(), configuration_update: None }
    }
}

/// A request to converge the device on a set of component versions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Deployment {
    #[serde(rename = "deploymentId")]
    pub deployment_id: DeploymentId,

    #[serde(rename = "deploymentType")]
    pub deployment_type: DeploymentType,

    #[serde(rename = "recipeDirectoryPath", default, skip_serializing_if = "Option::is_none")]
    pub recipe_directory_path: Option<String>,

    #[serde(rename = "artifactsDirectoryPath", default, skip_serializing_if = "Option::is_none")]
    pub artifacts_directory_path: Option<String>,

    #[serde(default)]
    pub components: BTreeMap<String, ComponentRequest>,

    #[serde(rename = "configurationArn")]
    pub configuration_arn: String,

    #[serde(rename = "thingGroup")]
    pub thing_group: String,

    #[serde(skip)]
    pub state: DeploymentState,
}

impl Deployment {
    /// Parse a deployment document (as received from a Jobs job document or
    /// a local IPC request), generating a fresh id if the document omits
    /// `deploymentId` and filling in the `LOCAL_DEPLOYMENTS` thing-group and
    /// configuration-arn convention for local deployments.
    pub fn parse(doc: &serde_json::Value, deployment_type: DeploymentType) -> CoreResult<Self> {
        let mut obj = doc
            .as_object()
            .cloned()
            .ok_or_else(|| CoreError::parse("deployment document is not a JSON object"))?;

        let deployment_id = match obj.remove("deploymentId").and_then(|v| v.as_str().map(str::to_string)) {
            Some(id) if !id.is_empty() => DeploymentId::from_string(id),
            _ => DeploymentId::new(),
        };

        let components: BTreeMap<String, ComponentRequest> = match obj.remove("components") {
            Some(v) => serde_json::from_value(v)
                .map_err(|e| CoreError::parse(format!("invalid components map: {e}")))?,
            None => BTreeMap::new(),
        };

        let recipe_directory_path =
            obj.remove("recipeDirectoryPath").and_then(|v| v.as_str().map(str::to_string));
        let artifacts_directory_path =
            obj.remove("artifactsDirectoryPath").and_then(|v| v.as_str().map(str::to_string));

        let (configuration_arn, thing_group) = match deployment_type {
            DeploymentType::Local => (deployment_id.as_str().to_string(), LOCAL_DEPLOYMENTS_GROUP.to_string()),
            DeploymentType::ThingGroup => {
                let arn = obj
                    .remove("configurationArn")
                    .and_then(|v| v.as_str().map(str::to_string))
                    .ok_or_else(|| CoreError::invalid("missing configurationArn"))?;
                let group = thing_group_from_arn(&arn)?;
                (arn, group)
            }
        };

        Ok(Self {
            deployment_id,
            deployment_type,
            recipe_directory_path,
            artifacts_directory_path,
            components,
            configuration_arn,
            thing_group,
            state: DeploymentState::Queued,
        })
    }
}

/// Extract the thing-group name: the substring of the configuration ARN
/// between the final `/` and the final `:`.
pub fn thing_group_from_arn(arn: &str) -> CoreResult<String> {
    let slash = arn.rfind('/').ok_or_else(|| CoreError::invalid(format!("arn missing '/': {arn:?}")))?;
    let rest = &arn[slash + 1..];
    let colon = rest.rfind(':').ok_or_else(|| CoreError::invalid(format!("arn missing ':': {arn:?}")))?;
    Ok(rest[..colon].to_string())
}

/// The ARN substring preceding the final `:` (version suffix stripped),
/// used as the dedup key when appending to a component's `configArn` list.
pub fn arn_without_version(arn: &str) -> &str {
    match arn.rfind(':') {
        Some(idx) => &arn[..idx],
        None => arn,
    }
}

#[cfg(test)]
#[path = "deployment_tests.rs"]
mod tests;
