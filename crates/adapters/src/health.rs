// SPDX-License-Identifier: MIT
// Copyright (c) 2026 The ecd Authors

//! The systemd-backed health-status service (§4.3 steps 6/8): polls
//! `systemctl is-active` for a unit until it settles into a terminal
//! lifecycle state or the phase timeout elapses.

use std::time::Duration;

use async_trait::async_trait;
use ecd_core::{CoreError, CoreResult};
use ecd_exec::{HealthStatusService, LifecycleState};
use tokio::process::Command;
use tokio::time::Instant;

const POLL_INTERVAL: Duration = Duration::from_millis(500);

pub struct SystemdHealthStatusService {
    binary: String,
}

impl SystemdHealthStatusService {
    pub fn new() -> Self {
        Self { binary: "systemctl".to_string() }
    }

    pub fn with_binary(binary: impl Into<String>) -> Self {
        Self { binary: binary.into() }
    }

    async fn is_active_state(&self, unit_name: &str) -> CoreResult<String> {
        let output = Command::new(&self.binary)
            .args(["is-active", unit_name])
            .output()
            .await
            .map_err(|e| CoreError::failure(format!("spawning systemctl is-active {unit_name}: {e}")))?;
        Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
    }
}

impl Default for SystemdHealthStatusService {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl HealthStatusService for SystemdHealthStatusService {
    async fn wait_for_terminal(&self, unit_name: &str, timeout: Duration) -> CoreResult<LifecycleState> {
        let deadline = Instant::now() + timeout;
        loop {
            let state = self.is_active_state(unit_name).await?;
            match state.as_str() {
                "active" => return Ok(LifecycleState::Running),
                "failed" => return Ok(LifecycleState::Broken),
                "inactive" => return Ok(LifecycleState::Finished),
                _ => {}
            }
            if Instant::now() >= deadline {
                return Err(CoreError::failure(format!("{unit_name} did not reach a terminal state within {timeout:?}")));
            }
            tokio::time::sleep(POLL_INTERVAL).await;
        }
    }
}

#[cfg(test)]
#[path = "health_tests.rs"]
mod tests;
