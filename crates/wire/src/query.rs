// SPDX-License-Identifier: MIT
// Copyright (c) 2026 The ecd Authors

//! Query types for reading daemon state.

use serde::{Deserialize, Serialize};

/// Query types for reading daemon state.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type")]
pub enum Query {
    /// The deployment currently being executed, if any, and the number of
    /// deployments still queued behind it.
    GetDeploymentStatus,

    /// Components known to the on-disk component store, across all
    /// versions present.
    ListComponents,
}

#[cfg(test)]
#[path = "query_tests.rs"]
mod tests;
