// SPDX-License-Identifier: MIT
// Copyright (c) 2026 The ecd Authors

//! The health-status service (§1): an external collaborator the install
//! and run/startup phases consult to learn when a component's service
//! unit has reached a terminal lifecycle state.

use std::time::Duration;

use async_trait::async_trait;
use ecd_core::CoreResult;

/// Terminal lifecycle states a unit can settle into. `Running`/`Finished`
/// are success; `Broken` is failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleState {
    Running,
    Finished,
    Broken,
}

impl LifecycleState {
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Running | Self::Finished)
    }
}

/// Subscribes to (or polls) a unit's lifecycle state until it reaches a
/// terminal value or the per-component timeout (300s, §4.3 steps 6/8)
/// elapses.
#[async_trait]
pub trait HealthStatusService: Send + Sync {
    async fn wait_for_terminal(&self, unit_name: &str, timeout: Duration) -> CoreResult<LifecycleState>;
}

/// The per-component install/run wait timeout (§4.3 steps 6 and 8).
pub const PHASE_WAIT_TIMEOUT: Duration = Duration::from_secs(300);
