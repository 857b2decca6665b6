// SPDX-License-Identifier: MIT
// Copyright (c) 2026 The ecd Authors

//! The cloud job-status-reporting collaborator (§4.2/§4.3): a narrow
//! contract the executor calls to publish `IN_PROGRESS`/`SUCCEEDED`/`FAILED`
//! for a thing-group deployment's driving Jobs execution, without the
//! executor depending on the Jobs listener's own MQTT/topic machinery
//! directly.

use async_trait::async_trait;
use ecd_core::CoreResult;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobOutcome {
    InProgress,
    Succeeded,
    Failed,
}

#[async_trait]
pub trait JobStatusReporter: Send + Sync {
    async fn update_job(&self, job_id: &str, expected_version: i32, outcome: JobOutcome) -> CoreResult<()>;
}
