// SPDX-License-Identifier: MIT
// Copyright (c) 2026 The ecd Authors

//! Reboot as a form of cancellation (§5): the bootstrap phase deliberately
//! terminates the process via reboot once any bootstrap unit was started,
//! relying on the persisted checkpoint for post-reboot resumption.

use async_trait::async_trait;
use ecd_core::CoreResult;

#[async_trait]
pub trait RebootInvoker: Send + Sync {
    async fn reboot(&self) -> CoreResult<()>;
}
