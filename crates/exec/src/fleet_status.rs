// SPDX-License-Identifier: MIT
// Copyright (c) 2026 The ecd Authors

//! The fleet-status-reporting service (§1): an external collaborator the
//! executor notifies after every deployment attempt.

use async_trait::async_trait;
use ecd_core::CoreResult;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeploymentStatus {
    Succeeded,
    Failed,
}

#[async_trait]
pub trait FleetStatusReporter: Send + Sync {
    async fn report(&self, deployment_id: &str, status: DeploymentStatus) -> CoreResult<()>;
}
