// SPDX-License-Identifier: MIT
// Copyright (c) 2026 The ecd Authors

//! The IoT Jobs listener state machine: discovers, accepts, and reports on
//! cloud-issued deployments via the `NextJobChanged`/`DescribeNextJob`/
//! `UpdateJob`/`MqttReconnected` events.

use std::time::Duration;

use ecd_core::{CoreError, CoreResult, CurrentJobCell, DeploymentId, DeploymentQueue, DeploymentType};
use ecd_storage::{CheckpointStore, ConfigFacade};
use serde_json::Value;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::protocol::{
    DescribeNextJobRequest, DescribeNextJobResponse, JobAction, JobExecution, JobStatus, UpdateJobRejected,
    UpdateJobRequest,
};
use crate::topics::JobsTopics;
use crate::transport::{MqttEvent, MqttTransport};

/// Exponential backoff ceiling for enqueue-on-BUSY retry, per §4.2.
const ENQUEUE_BACKOFF_CAP: Duration = Duration::from_secs(128);
const ENQUEUE_BACKOFF_BASE: Duration = Duration::from_millis(250);

/// Per-attempt backoff ceiling for the startup thing-name read retry.
const THING_NAME_BACKOFF_CAP: Duration = Duration::from_millis(1000);
const THING_NAME_BACKOFF_BASE: Duration = Duration::from_millis(1);

pub struct JobsListener<'a> {
    transport: &'a dyn MqttTransport,
    checkpoint: &'a CheckpointStore,
    queue: &'a DeploymentQueue,
    current_job: &'a CurrentJobCell,
    topics: JobsTopics,
    thing_name: String,
}

impl<'a> JobsListener<'a> {
    pub fn new(
        transport: &'a dyn MqttTransport,
        checkpoint: &'a CheckpointStore,
        queue: &'a DeploymentQueue,
        current_job: &'a CurrentJobCell,
        thing_name: impl Into<String>,
    ) -> Self {
        let thing_name = thing_name.into();
        Self { transport, checkpoint, queue, current_job, topics: JobsTopics::new(thing_name.clone()), thing_name }
    }

    /// Retrieve the thing name from config with indefinite retry and bounded
    /// per-attempt backoff, as the listener does before its first
    /// subscription.
    pub async fn thing_name_with_retry(config: &dyn ConfigFacade) -> String {
        let mut backoff = THING_NAME_BACKOFF_BASE;
        loop {
            if let Ok(Some(name)) = config.read_string("system/thingName") {
                if !name.is_empty() {
                    return name;
                }
            }
            tokio::time::sleep(backoff).await;
            backoff = (backoff * 2).min(THING_NAME_BACKOFF_CAP);
        }
    }

    /// Subscribe to the next-job-changed notification topic and run one
    /// initial describe, then process events until the channel closes.
    pub async fn run(&self, mut events: mpsc::Receiver<MqttEvent>) -> CoreResult<()> {
        self.transport.subscribe(&self.topics.notify_next()).await?;
        if let Err(err) = self.describe_next_job().await {
            warn!(error = %err, "initial describe-next-job failed");
        }

        while let Some(event) = events.recv().await {
            match event {
                MqttEvent::NextJobChanged => debug!("next-job-changed notification received"),
                MqttEvent::Reconnected => debug!("mqtt reconnected, re-querying next job"),
            }
            if let Err(err) = self.describe_next_job().await {
                warn!(error = %err, "describe-next-job failed");
            }
        }
        Ok(())
    }

    pub async fn describe_next_job(&self) -> CoreResult<()> {
        let request = DescribeNextJobRequest::new(self.thing_name.clone());
        let payload = serde_json::to_vec(&request)
            .map_err(|e| CoreError::parse(format!("encoding describe-next-job request: {e}")))?;
        let response_bytes = self.transport.request(&self.topics.describe_next(), payload).await?;
        let response: DescribeNextJobResponse = serde_json::from_slice(&response_bytes)
            .map_err(|e| CoreError::parse(format!("decoding describe-next-job response: {e}")))?;

        let Some(execution) = response.execution else {
            return Ok(());
        };

        match JobAction::from(execution.status) {
            JobAction::EnqueueJob => self.enqueue_job(execution).await,
            JobAction::Noop => Ok(()),
            JobAction::CancelCurrentJob => {
                self.cancel_current_job();
                Ok(())
            }
        }
    }

    async fn enqueue_job(&self, execution: JobExecution) -> CoreResult<()> {
        if self.current_job.current_job_id().as_deref() == Some(execution.job_id.as_str()) {
            debug!(job_id = %execution.job_id, "duplicate job notification, skipping");
            return Ok(());
        }

        let doc = execution.job_document.unwrap_or(Value::Null);
        let mut backoff = ENQUEUE_BACKOFF_BASE;

        loop {
            match self.queue.enqueue(&doc, DeploymentType::ThingGroup) {
                Ok(deployment_id) => {
                    self.current_job.set_if_new(&execution.job_id, deployment_id.clone());
                    info!(job_id = %execution.job_id, deployment_id = %deployment_id, "enqueued cloud deployment");
                    return Ok(());
                }
                Err(CoreError::Busy) => {
                    warn!(job_id = %execution.job_id, backoff_ms = backoff.as_millis() as u64, "queue busy, retrying");
                    tokio::time::sleep(backoff).await;
                    backoff = (backoff * 2).min(ENQUEUE_BACKOFF_CAP);
                }
                Err(err) => {
                    warn!(job_id = %execution.job_id, error = %err, "failed to enqueue job, reporting failure");
                    let _ = self.update_job(&execution.job_id, JobStatus::Failed, 1).await;
                    return Err(err);
                }
            }
        }
    }

    fn cancel_current_job(&self) {
        if let Some(job_id) = self.current_job.current_job_id() {
            info!(job_id, "cancelling current job per remote status");
        }
        self.current_job.clear();
    }

    /// Publish a status transition for `job_id`, rebasing against the
    /// remote version on rejection and retrying until accepted or the
    /// rejection itself signals success.
    pub async fn update_job(&self, job_id: &str, status: JobStatus, expected_version: i32) -> CoreResult<()> {
        let mut expected_version = expected_version;
        loop {
            let request = UpdateJobRequest::new(status, expected_version);
            let payload = serde_json::to_vec(&request)
                .map_err(|e| CoreError::parse(format!("encoding update-job request: {e}")))?;

            match self.transport.request(&self.topics.update(job_id), payload).await {
                Ok(response_bytes) => {
                    self.current_job.advance_version(expected_version);
                    self.persist_current_job(job_id, expected_version + 1)?;
                    debug!(job_id, status = ?status, "job status updated");
                    let _ = response_bytes;
                    return Ok(());
                }
                Err(CoreError::Remote(body)) => {
                    let rejected: UpdateJobRejected = serde_json::from_str(&body)
                        .map_err(|e| CoreError::parse(format!("decoding update-job rejection: {e}")))?;

                    if rejected.execution_state.version_number != expected_version {
                        expected_version = rejected.execution_state.version_number;
                        self.current_job.rebase_version(expected_version);
                        continue;
                    }
                    if rejected.execution_state.status == status {
                        return Ok(());
                    }
                    if status == JobStatus::Canceled {
                        return Ok(());
                    }
                    return Err(CoreError::Remote(body));
                }
                Err(err) => return Err(err),
            }
        }
    }

    fn persist_current_job(&self, job_id: &str, version: i32) -> CoreResult<()> {
        self.checkpoint.update_jobs_tracking(job_id, version as i64)?;
        Ok(())
    }

    /// Reboot resumption: install a Jobs-tracked deployment recovered from
    /// persisted state so post-reboot status reporting uses the correct
    /// job identity and version. Fails if the recovered job has since been
    /// superseded by a different job id already tracked in the cell.
    pub fn set_jobs_deployment_for_bootstrap(
        &self,
        job_id: &str,
        deployment_id: DeploymentId,
        version: i32,
    ) -> CoreResult<()> {
        if let Some(current) = self.current_job.current_job_id() {
            if current != job_id {
                return Err(CoreError::invalid(format!(
                    "recovered job {job_id} was superseded by {current}"
                )));
            }
        }
        self.current_job.restore(job_id, deployment_id, version);
        Ok(())
    }
}

#[cfg(test)]
#[path = "listener_tests.rs"]
mod tests;
