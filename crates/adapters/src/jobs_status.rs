// SPDX-License-Identifier: MIT
// Copyright (c) 2026 The ecd Authors

//! Bridges the executor's [`JobStatusReporter`] contract onto the Jobs
//! listener's `update_job`, translating [`JobOutcome`] into the wire-level
//! [`JobStatus`] the IoT Jobs service expects.

use async_trait::async_trait;
use ecd_core::CoreResult;
use ecd_exec::{JobOutcome, JobStatusReporter};
use ecd_jobs::{JobStatus, JobsListener};

pub struct JobsListenerStatusReporter<'a> {
    listener: &'a JobsListener<'a>,
}

impl<'a> JobsListenerStatusReporter<'a> {
    pub fn new(listener: &'a JobsListener<'a>) -> Self {
        Self { listener }
    }
}

#[async_trait]
impl<'a> JobStatusReporter for JobsListenerStatusReporter<'a> {
    async fn update_job(&self, job_id: &str, expected_version: i32, outcome: JobOutcome) -> CoreResult<()> {
        let status = match outcome {
            JobOutcome::InProgress => JobStatus::InProgress,
            JobOutcome::Succeeded => JobStatus::Succeeded,
            JobOutcome::Failed => JobStatus::Failed,
        };
        self.listener.update_job(job_id, status, expected_version).await
    }
}
