// SPDX-License-Identifier: MIT
// Copyright (c) 2026 The ecd Authors

//! Wire shapes for the IoT Jobs describe/update RPCs.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::topics::CLIENT_TOKEN;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum JobStatus {
    Queued,
    InProgress,
    Succeeded,
    Failed,
    Rejected,
    TimedOut,
    Removed,
    Canceled,
}

/// The action the listener takes for a given [`JobStatus`] on the
/// describe-next-job response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobAction {
    EnqueueJob,
    Noop,
    CancelCurrentJob,
}

impl From<JobStatus> for JobAction {
    fn from(status: JobStatus) -> Self {
        match status {
            JobStatus::Queued | JobStatus::InProgress => JobAction::EnqueueJob,
            JobStatus::Succeeded | JobStatus::Failed | JobStatus::Rejected => JobAction::Noop,
            JobStatus::TimedOut | JobStatus::Removed | JobStatus::Canceled => JobAction::CancelCurrentJob,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct DescribeNextJobRequest {
    #[serde(rename = "jobId")]
    pub job_id: &'static str,
    #[serde(rename = "thingName")]
    pub thing_name: String,
    #[serde(rename = "includeJobDocument")]
    pub include_job_document: bool,
    #[serde(rename = "clientToken")]
    pub client_token: &'static str,
}

impl DescribeNextJobRequest {
    pub fn new(thing_name: impl Into<String>) -> Self {
        Self { job_id: "$next", thing_name: thing_name.into(), include_job_document: true, client_token: CLIENT_TOKEN }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct JobExecution {
    #[serde(rename = "jobId")]
    pub job_id: String,
    pub status: JobStatus,
    #[serde(rename = "versionNumber", default)]
    pub version_number: i32,
    #[serde(rename = "jobDocument", default)]
    pub job_document: Option<Value>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct DescribeNextJobResponse {
    pub execution: Option<JobExecution>,
}

#[derive(Debug, Clone, Serialize)]
pub struct UpdateJobRequest {
    pub status: JobStatus,
    #[serde(rename = "expectedVersion")]
    pub expected_version: i32,
    #[serde(rename = "clientToken")]
    pub client_token: &'static str,
}

impl UpdateJobRequest {
    pub fn new(status: JobStatus, expected_version: i32) -> Self {
        Self { status, expected_version, client_token: CLIENT_TOKEN }
    }
}

/// The `executionState` carried by a rejected update-job response.
#[derive(Debug, Clone, Deserialize)]
pub struct ExecutionState {
    pub status: JobStatus,
    #[serde(rename = "versionNumber")]
    pub version_number: i32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UpdateJobRejected {
    #[serde(rename = "executionState")]
    pub execution_state: ExecutionState,
}

#[cfg(test)]
#[path = "protocol_tests.rs"]
mod tests;
