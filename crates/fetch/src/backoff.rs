// SPDX-License-Identifier: MIT
// Copyright (c) 2026 The ecd Authors

//! Exponential backoff for the S3 403 retry loop (§4.5): base 3000ms, cap
//! 64000ms, 3 attempts.

use std::time::Duration;

pub const S3_RETRY_ATTEMPTS: u32 = 3;
pub const S3_RETRY_BASE: Duration = Duration::from_millis(3000);
pub const S3_RETRY_CAP: Duration = Duration::from_millis(64000);

/// The backoff delay before retry attempt `attempt` (0-indexed), doubling
/// from `base` and clamped to `cap`.
pub fn delay_for_attempt(attempt: u32, base: Duration, cap: Duration) -> Duration {
    let factor = 1u32.checked_shl(attempt).unwrap_or(u32::MAX);
    base.saturating_mul(factor).min(cap)
}

#[cfg(test)]
#[path = "backoff_tests.rs"]
mod tests;
