// SPDX-License-Identifier: MIT
// Copyright (c) 2026 The ecd Authors

//! Command-line/environment configuration for the daemon binary (§10.3):
//! `--root-path`, `--config-socket`, `--log-level`/`--log-file`, and
//! `--queue-capacity`. Every flag falls back to an `ECD_`-prefixed
//! environment variable via `clap`'s `env` feature, then to the documented
//! default, matching the layered precedence the reference daemon's own
//! config loader uses.

use std::path::PathBuf;

use clap::Parser;
use ecd_core::DEFAULT_CAPACITY;

#[derive(Debug, Parser)]
#[command(name = "ggdeploymentd", about = "Edge component deployment daemon")]
pub struct Args {
    /// Filesystem root for packages/, service units, and the local config
    /// store.
    #[arg(long, env = "ECD_ROOT_PATH", default_value = "/var/lib/ggdeploymentd")]
    pub root_path: PathBuf,

    /// Path to the external config-store RPC endpoint (a Unix socket in
    /// production deployments); unused by the JSON-file-backed store this
    /// daemon ships with, but accepted so a future config-store adapter
    /// can be swapped in without changing the CLI surface.
    #[arg(long, env = "ECD_CONFIG_SOCKET")]
    pub config_socket: Option<PathBuf>,

    /// Local IPC socket path. Ignored when the process is started under
    /// systemd socket activation.
    #[arg(long, env = "ECD_IPC_SOCKET", default_value = "/run/ggdeploymentd.socket")]
    pub ipc_socket: PathBuf,

    #[arg(long, env = "ECD_LOG_LEVEL", default_value = "info")]
    pub log_level: String,

    #[arg(long, env = "ECD_LOG_FILE")]
    pub log_file: Option<PathBuf>,

    /// Deployment queue capacity (§4.1).
    #[arg(long, env = "ECD_QUEUE_CAPACITY", default_value_t = DEFAULT_CAPACITY)]
    pub queue_capacity: usize,
}

#[cfg(test)]
#[path = "args_tests.rs"]
mod tests;
