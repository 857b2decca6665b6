// SPDX-License-Identifier: MIT
// Copyright (c) 2026 The ecd Authors

//! The Bootstrap Manager (§4.7): a deployment whose components carry a
//! bootstrap step that has not yet run is checkpointed to config, its
//! bootstrap units are linked and started, and the device reboots. The
//! reboot is a cancellation of the in-progress attempt from the service
//! manager's point of view; on the next startup the daemon finds the
//! checkpoint, resumes the same deployment, and skips bootstrap steps
//! already marked complete.

use std::collections::BTreeMap;
use std::path::Path;

use ecd_core::{CoreResult, Deployment, DeploymentStateCheckpoint};
use ecd_storage::CheckpointStore;
use tracing::info;

use crate::reboot::RebootInvoker;
use crate::service_manager::ServiceManager;
use crate::units::bootstrap_unit;

/// Whether processing a deployment's bootstrap phase triggered a reboot.
/// Callers must stop running further phases when this is returned — the
/// remainder of the deployment resumes after startup recovery.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BootstrapOutcome {
    Continue,
    RebootRequested,
}

pub struct BootstrapManager<'a> {
    checkpoints: &'a CheckpointStore,
    services: &'a dyn ServiceManager,
    reboot: &'a dyn RebootInvoker,
}

impl<'a> BootstrapManager<'a> {
    pub fn new(checkpoints: &'a CheckpointStore, services: &'a dyn ServiceManager, reboot: &'a dyn RebootInvoker) -> Self {
        Self { checkpoints, services, reboot }
    }

    /// Persist the in-progress deployment so it survives a bootstrap
    /// reboot, before any component processing begins.
    pub fn checkpoint_deployment(
        &self,
        deployment: Deployment,
        jobs_id: Option<String>,
        jobs_version: Option<i64>,
    ) -> CoreResult<DeploymentStateCheckpoint> {
        let checkpoint = DeploymentStateCheckpoint::for_deployment(deployment, jobs_id, jobs_version);
        self.checkpoints.save(&checkpoint)?;
        Ok(checkpoint)
    }

    /// Run the bootstrap phase for `components` (name to resolved version).
    /// Any component with an on-disk `<root>/ggl.<name>.bootstrap.service`
    /// file that has not already run in this checkpoint is linked and
    /// started; if at least one ran, the deployment state is persisted and
    /// the device is rebooted.
    pub async fn process(
        &self,
        checkpoint: &mut DeploymentStateCheckpoint,
        components: &BTreeMap<String, String>,
        root: &Path,
    ) -> CoreResult<BootstrapOutcome> {
        let mut bootstrapped_any = false;

        for (name, version) in components {
            if checkpoint.is_bootstrapped(name, version) {
                continue;
            }

            let unit_name = bootstrap_unit(name);
            let unit_path = root.join(&unit_name);
            if !unit_path.exists() {
                continue;
            }

            info!(component = %name, version = %version, "running bootstrap step");
            self.services.link(&unit_path.to_string_lossy()).await?;
            self.services.start(&unit_name).await?;

            checkpoint.mark_bootstrapped(name, version);
            self.checkpoints.save(checkpoint)?;
            bootstrapped_any = true;
        }

        if bootstrapped_any {
            info!("bootstrap steps ran; rebooting device to continue deployment");
            self.reboot.reboot().await?;
            return Ok(BootstrapOutcome::RebootRequested);
        }

        Ok(BootstrapOutcome::Continue)
    }

    /// Recover an in-progress deployment's checkpoint after startup, if one
    /// was left behind by a bootstrap-triggered reboot.
    pub fn recover(&self) -> Option<DeploymentStateCheckpoint> {
        self.checkpoints.recover()
    }

    pub fn clear(&self) -> CoreResult<()> {
        self.checkpoints.clear()?;
        Ok(())
    }
}

#[cfg(test)]
#[path = "bootstrap_tests.rs"]
mod tests;
