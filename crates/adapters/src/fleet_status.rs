// SPDX-License-Identifier: MIT
// Copyright (c) 2026 The ecd Authors

//! The fleet-status HTTP reporter (§1): notifies the cloud dataplane of a
//! deployment's outcome after every attempt, over the same mTLS client
//! used for thing-group and component-candidate resolution.

use async_trait::async_trait;
use ecd_core::{CoreError, CoreResult};
use ecd_exec::{DeploymentStatus, FleetStatusReporter};
use serde::Serialize;

pub struct HttpFleetStatusReporter {
    client: reqwest::Client,
    base_url: String,
    thing_name: String,
}

impl HttpFleetStatusReporter {
    pub fn new(client: reqwest::Client, endpoint: impl Into<String>, thing_name: impl Into<String>) -> Self {
        Self { client, base_url: format!("https://{}", endpoint.into()), thing_name: thing_name.into() }
    }
}

#[derive(Serialize)]
struct FleetStatusRequest<'a> {
    #[serde(rename = "thingName")]
    thing_name: &'a str,
    #[serde(rename = "deploymentId")]
    deployment_id: &'a str,
    status: &'a str,
}

#[async_trait]
impl FleetStatusReporter for HttpFleetStatusReporter {
    async fn report(&self, deployment_id: &str, status: DeploymentStatus) -> CoreResult<()> {
        let status = match status {
            DeploymentStatus::Succeeded => "SUCCEEDED",
            DeploymentStatus::Failed => "FAILED",
        };
        let url = format!("{}/greengrass/v2/fleetStatus", self.base_url);
        let body = FleetStatusRequest { thing_name: &self.thing_name, deployment_id, status };

        let response = self
            .client
            .post(&url)
            .json(&body)
            .send()
            .await
            .map_err(|e| CoreError::failure(format!("reporting fleet status for {deployment_id}: {e}")))?;
        if !response.status().is_success() {
            return Err(CoreError::failure(format!("fleet status report for {deployment_id} returned {}", response.status())));
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "fleet_status_tests.rs"]
mod tests;
