// SPDX-License-Identifier: MIT
// Copyright (c) 2026 The ecd Authors

//! The `systemctl` service manager (§6): shells out to `systemctl` for
//! every verb except `unlink`, which removes the linked unit file directly
//! from the systemd unit directory — matching `disable_and_unlink_service`
//! in the original daemon, which never found a `systemctl unlink` and
//! instead deletes the file by hand.

use async_trait::async_trait;
use ecd_core::{CoreError, CoreResult};
use ecd_exec::ServiceManager;
use tokio::process::Command;
use tracing::debug;

const DEFAULT_UNIT_DIR: &str = "/etc/systemd/system";

pub struct SystemdServiceManager {
    unit_dir: String,
}

impl SystemdServiceManager {
    pub fn new() -> Self {
        Self { unit_dir: DEFAULT_UNIT_DIR.to_string() }
    }

    pub fn with_unit_dir(unit_dir: impl Into<String>) -> Self {
        Self { unit_dir: unit_dir.into() }
    }

    async fn systemctl(&self, args: &[&str]) -> CoreResult<()> {
        debug!(?args, "systemctl");
        let status = Command::new("systemctl")
            .args(args)
            .status()
            .await
            .map_err(|e| CoreError::failure(format!("spawning systemctl {}: {e}", args.join(" "))))?;
        if !status.success() {
            return Err(CoreError::failure(format!("systemctl {} exited with {status}", args.join(" "))));
        }
        Ok(())
    }
}

impl Default for SystemdServiceManager {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ServiceManager for SystemdServiceManager {
    async fn link(&self, unit_path: &str) -> CoreResult<()> {
        self.systemctl(&["link", unit_path]).await
    }

    async fn unlink(&self, unit_name: &str) -> CoreResult<()> {
        let path = std::path::Path::new(&self.unit_dir).join(unit_name);
        match std::fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(CoreError::failure(format!("removing {}: {e}", path.display()))),
        }
    }

    async fn start(&self, unit_name: &str) -> CoreResult<()> {
        self.systemctl(&["start", unit_name]).await
    }

    async fn stop(&self, unit_name: &str) -> CoreResult<()> {
        self.systemctl(&["stop", unit_name]).await
    }

    async fn enable(&self, unit_name: &str) -> CoreResult<()> {
        self.systemctl(&["enable", unit_name]).await
    }

    async fn disable(&self, unit_name: &str) -> CoreResult<()> {
        self.systemctl(&["disable", unit_name]).await
    }

    async fn daemon_reload(&self) -> CoreResult<()> {
        self.systemctl(&["daemon-reload"]).await
    }

    async fn reset_failed(&self) -> CoreResult<()> {
        self.systemctl(&["reset-failed"]).await
    }
}

#[cfg(test)]
#[path = "service_manager_tests.rs"]
mod tests;
