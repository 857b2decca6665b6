// SPDX-License-Identifier: MIT
// Copyright (c) 2026 The ecd Authors

//! Reboot as cancellation (§5): invokes the kernel's reboot syscall
//! directly via `nix`, rather than shelling out to `reboot`/`systemctl
//! reboot`, so the process has no opportunity to be skipped by a missing
//! PATH entry.

use async_trait::async_trait;
use ecd_core::{CoreError, CoreResult};
use ecd_exec::RebootInvoker;
use nix::sys::reboot::{reboot, RebootMode};
use nix::unistd::sync;

pub struct SystemRebootInvoker;

impl Default for SystemRebootInvoker {
    fn default() -> Self {
        Self
    }
}

#[async_trait]
impl RebootInvoker for SystemRebootInvoker {
    async fn reboot(&self) -> CoreResult<()> {
        sync();
        reboot(RebootMode::RB_AUTOBOOT).map_err(|e| CoreError::failure(format!("reboot syscall failed: {e}")))?;
        Ok(())
    }
}
