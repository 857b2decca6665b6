// SPDX-License-Identifier: MIT
// Copyright (c) 2026 The ecd Authors

//! The process-wide "current job" cell the Jobs listener uses to route
//! status updates, and the executor uses to know which job to report
//! completion against.

use parking_lot::Mutex;
use std::sync::atomic::{AtomicI32, Ordering};

use crate::id::DeploymentId;

/// `(current_job_id, current_deployment_id)`, the parts of the current-job
/// cell that change together and are guarded by a single mutex. The version
/// is kept out of the mutex as an independent atomic so status-update
/// retries can read/bump it without taking the lock.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
struct CurrentJob {
    job_id: Option<String>,
    deployment_id: Option<DeploymentId>,
}

/// Single-slot mapping `(current_job_id, current_deployment_id,
/// current_job_version)` for the deployment currently being executed.
///
/// `current_job_version` is a 32-bit integer with acquire/release ordering,
/// matching the atomic semantics the optimistic-concurrency Jobs-update
/// protocol depends on.
pub struct CurrentJobCell {
    job: Mutex<CurrentJob>,
    version: AtomicI32,
}

impl CurrentJobCell {
    pub fn new() -> Self {
        Self { job: Mutex::new(CurrentJob::default()), version: AtomicI32::new(0) }
    }

    /// Install a new current job, resetting the version to 1 as the
    /// enqueue-job step does. Returns `true` unless `job_id` was already the
    /// tracked job (duplicate notification).
    pub fn set_if_new(&self, job_id: &str, deployment_id: DeploymentId) -> bool {
        let mut job = self.job.lock();
        if job.job_id.as_deref() == Some(job_id) {
            return false;
        }
        job.job_id = Some(job_id.to_string());
        job.deployment_id = Some(deployment_id);
        self.version.store(1, Ordering::Release);
        true
    }

    /// Recover a Jobs-tracked deployment whose id, deployment-id, and
    /// version were persisted before a bootstrap-triggered reboot.
    pub fn restore(&self, job_id: &str, deployment_id: DeploymentId, version: i32) {
        let mut job = self.job.lock();
        job.job_id = Some(job_id.to_string());
        job.deployment_id = Some(deployment_id);
        self.version.store(version, Ordering::Release);
    }

    pub fn current_job_id(&self) -> Option<String> {
        self.job.lock().job_id.clone()
    }

    pub fn current_deployment_id(&self) -> Option<DeploymentId> {
        self.job.lock().deployment_id.clone()
    }

    pub fn version(&self) -> i32 {
        self.version.load(Ordering::Acquire)
    }

    /// Advance the version after a successful status update, whose new
    /// value is the server-acknowledged `expectedVersion + 1`.
    pub fn advance_version(&self, accepted_expected_version: i32) {
        self.version.store(accepted_expected_version + 1, Ordering::Release);
    }

    /// Adopt a version the server reported back on rejection, so the next
    /// update attempt rebases against it.
    pub fn rebase_version(&self, remote_version: i32) {
        self.version.store(remote_version, Ordering::Release);
    }

    pub fn clear(&self) {
        let mut job = self.job.lock();
        job.job_id = None;
        job.deployment_id = None;
        self.version.store(0, Ordering::Release);
    }
}

impl Default for CurrentJobCell {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
#[path = "current_job_tests.rs"]
mod tests;
