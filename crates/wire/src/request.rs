// SPDX-License-Identifier: MIT
// Copyright (c) 2026 The ecd Authors

//! Request types sent by CLI/IPC clients to the daemon.

use std::collections::BTreeMap;
use std::path::PathBuf;

use ecd_core::ComponentRequest;
use serde::{Deserialize, Serialize};

use crate::Query;

/// Requests accepted over the local IPC socket.
///
/// The only deployment-submission RPC the daemon exposes is
/// [`Request::CreateLocalDeployment`]; `Hello`/`Ping` exist for the same
/// handshake/liveness purposes a CLI needs against any long-running daemon,
/// and `Query` carries the read-only `status`/`list-components` lookups.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type")]
pub enum Request {
    /// Version handshake.
    Hello,

    /// Liveness check.
    Ping,

    /// Submit a local deployment. Mirrors the `create_local_deployment`
    /// IPC call: staging directories are optional, `components` carries the
    /// same shape the deployment queue parses.
    CreateLocalDeployment {
        #[serde(default)]
        recipe_directory_path: Option<PathBuf>,
        #[serde(default)]
        artifacts_directory_path: Option<PathBuf>,
        components: BTreeMap<String, ComponentRequest>,
    },

    /// A read-only lookup against daemon state.
    Query(Query),
}

#[cfg(test)]
#[path = "request_tests.rs"]
mod tests;
