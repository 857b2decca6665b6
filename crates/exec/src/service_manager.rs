// SPDX-License-Identifier: MIT
// Copyright (c) 2026 The ecd Authors

//! The process-supervision layer (§6): service files and
//! start/stop/enable/disable operations are delegated to an external
//! service manager. The core only calls it by the exact command shapes
//! named in §6; the concrete process-spawn implementation lives in the
//! adapters crate.

use async_trait::async_trait;
use ecd_core::CoreResult;

/// `link <unit-path>`, `start <unit-name>`, `enable <unit-name>`,
/// `stop <unit-name>`, `disable <unit-name>`, `daemon-reload`,
/// `reset-failed`, and a named-target `start`.
///
/// `unlink` is not in §6's bit-exact command table but is named explicitly
/// by §4.3's install/run phases ("stop/disable/unlink any prior instance");
/// it takes a unit name, symmetric with `stop`/`disable`.
#[async_trait]
pub trait ServiceManager: Send + Sync {
    async fn link(&self, unit_path: &str) -> CoreResult<()>;
    async fn unlink(&self, unit_name: &str) -> CoreResult<()>;
    async fn start(&self, unit_name: &str) -> CoreResult<()>;
    async fn stop(&self, unit_name: &str) -> CoreResult<()>;
    async fn enable(&self, unit_name: &str) -> CoreResult<()>;
    async fn disable(&self, unit_name: &str) -> CoreResult<()>;
    async fn daemon_reload(&self) -> CoreResult<()>;
    async fn reset_failed(&self) -> CoreResult<()>;

    /// Best-effort stop/disable/unlink of a prior instance of a unit before
    /// (re)installing it, as every phase (install/run/cleanup) does.
    /// Failures are swallowed — there may be no prior instance to tear
    /// down.
    async fn teardown_prior(&self, unit_name: &str) {
        let _ = self.stop(unit_name).await;
        let _ = self.disable(unit_name).await;
        let _ = self.unlink(unit_name).await;
    }
}
