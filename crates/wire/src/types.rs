// SPDX-License-Identifier: MIT
// Copyright (c) 2026 The ecd Authors

//! Summary types shared between [`crate::Response`] variants.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CurrentDeploymentSummary {
    pub deployment_id: String,
    pub thing_group: String,
    pub jobs_id: Option<String>,
    pub jobs_version: Option<i32>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ComponentSummary {
    pub name: String,
    pub versions: Vec<String>,
    pub running_version: Option<String>,
}

#[cfg(test)]
#[path = "types_tests.rs"]
mod tests;
