// SPDX-License-Identifier: MIT
// Copyright (c) 2026 The ecd Authors

//! Persistence for the [`DeploymentStateCheckpoint`], under
//! `services/DeploymentService/deploymentState`.

use ecd_core::DeploymentStateCheckpoint;

use crate::config::{warn_on_corrupt, ConfigFacadeExt, ConfigResult, SharedConfig};

const DEPLOYMENT_STATE_KEY: &str = "services/DeploymentService/deploymentState";

pub struct CheckpointStore {
    config: SharedConfig,
}

impl CheckpointStore {
    pub fn new(config: SharedConfig) -> Self {
        Self { config }
    }

    pub fn save(&self, checkpoint: &DeploymentStateCheckpoint) -> ConfigResult<()> {
        self.config.write_typed(DEPLOYMENT_STATE_KEY, checkpoint)
    }

    /// Attempt to recover an in-progress deployment's checkpoint. Absence is
    /// not an error (no recovery needed); a malformed value is logged and
    /// treated the same as absence, per the bootstrap manager's recovery
    /// policy.
    pub fn recover(&self) -> Option<DeploymentStateCheckpoint> {
        match self.config.read_typed(DEPLOYMENT_STATE_KEY) {
            Ok(checkpoint) => checkpoint,
            Err(err) => {
                warn_on_corrupt(DEPLOYMENT_STATE_KEY, &err);
                None
            }
        }
    }

    pub fn clear(&self) -> ConfigResult<()> {
        self.config.delete(DEPLOYMENT_STATE_KEY)
    }

    /// Update just the jobs id/version tracked in the checkpoint, as the
    /// Jobs listener does after every successful status update, without
    /// disturbing whatever deployment progress is already recorded there.
    pub fn update_jobs_tracking(&self, jobs_id: &str, jobs_version: i64) -> ConfigResult<()> {
        let mut checkpoint = self.recover().unwrap_or_default();
        checkpoint.jobs_id = Some(jobs_id.to_string());
        checkpoint.jobs_version = Some(jobs_version);
        self.save(&checkpoint)
    }
}

#[cfg(test)]
#[path = "checkpoint_store_tests.rs"]
mod tests;
