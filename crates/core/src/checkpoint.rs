// SPDX-License-Identifier: MIT
// Copyright (c) 2026 The ecd Authors

//! The deployment-state checkpoint persisted for crash/reboot recovery.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::deployment::Deployment;

/// Persisted record of an in-progress deployment, written under
/// `services/DeploymentService/deploymentState` and cleared atomically when
/// the deployment terminates (success or failure).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DeploymentStateCheckpoint {
    /// Components already transitioned to "completed" status in this
    /// deployment attempt, keyed by name with the completed version.
    #[serde(default)]
    pub components: BTreeMap<String, String>,

    /// Components whose bootstrap step has already run in this attempt
    /// (the bootstrap idempotency key), keyed by name with the version
    /// bootstrapped.
    #[serde(rename = "bootstrapComponents", default)]
    pub bootstrap_components: BTreeMap<String, String>,

    /// The in-progress deployment document itself.
    #[serde(rename = "deploymentDoc")]
    pub deployment_doc: Option<Deployment>,

    /// The driving Jobs id and version, for cloud-origin deployments.
    #[serde(rename = "jobsID", default)]
    pub jobs_id: Option<String>,

    #[serde(rename = "jobsVersion", default)]
    pub jobs_version: Option<i64>,
}

impl DeploymentStateCheckpoint {
    pub fn for_deployment(deployment: Deployment, jobs_id: Option<String>, jobs_version: Option<i64>) -> Self {
        Self {
            components: BTreeMap::new(),
            bootstrap_components: BTreeMap::new(),
            deployment_doc: Some(deployment),
            jobs_id,
            jobs_version,
        }
    }

    pub fn mark_bootstrapped(&mut self, name: impl Into<String>, version: impl Into<String>) {
        self.bootstrap_components.insert(name.into(), version.into());
    }

    pub fn is_bootstrapped(&self, name: &str, version: &str) -> bool {
        self.bootstrap_components.get(name).map(String::as_str) == Some(version)
    }

    pub fn mark_completed(&mut self, name: impl Into<String>, version: impl Into<String>) {
        self.components.insert(name.into(), version.into());
    }

    pub fn is_completed(&self, name: &str, version: &str) -> bool {
        self.components.get(name).map(String::as_str) == Some(version)
    }
}

#[cfg(test)]
#[path = "checkpoint_tests.rs"]
mod tests;
