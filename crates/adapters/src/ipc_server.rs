// SPDX-License-Identifier: MIT
// Copyright (c) 2026 The ecd Authors

//! The local IPC server (§6): a Unix-domain `SOCK_STREAM` at a fixed
//! socket path, with socket-activation fallback via the `LISTEN_FDS`/
//! `LISTEN_FDNAMES` env protocol. One connection, one request, one
//! response — each direction bounded by a 5s timeout.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use ecd_core::{ComponentRequest, CoreResult};
use ecd_wire::{
    read_request, write_response, ComponentSummary, CurrentDeploymentSummary, Query, Request, Response,
};
use listenfd::ListenFd;
use tokio::net::{UnixListener, UnixStream};
use tracing::{debug, error, warn};

/// The per-direction timeout the local IPC protocol enforces on clients.
pub const IPC_TIMEOUT: Duration = Duration::from_secs(5);

/// Accepts `create_local_deployment` submissions onto the queue; the only
/// mutating RPC the daemon exposes over IPC.
pub trait DeploymentSubmitter: Send + Sync {
    fn submit_local_deployment(
        &self,
        recipe_directory_path: Option<PathBuf>,
        artifacts_directory_path: Option<PathBuf>,
        components: BTreeMap<String, ComponentRequest>,
    ) -> CoreResult<String>;
}

/// Answers the read-only `Query` RPCs against daemon state.
pub trait StatusProvider: Send + Sync {
    fn deployment_status(&self) -> (Option<CurrentDeploymentSummary>, usize);
    fn list_components(&self) -> Vec<ComponentSummary>;
}

pub struct IpcServer {
    listener: UnixListener,
    submitter: Arc<dyn DeploymentSubmitter>,
    status: Arc<dyn StatusProvider>,
}

impl IpcServer {
    /// Bind a fresh socket at `socket_path`, removing a stale leftover file
    /// first (the daemon is the only writer of this path and a leftover
    /// from an unclean shutdown would otherwise make bind fail with
    /// `AddrInUse`).
    pub fn bind(
        socket_path: &Path,
        submitter: Arc<dyn DeploymentSubmitter>,
        status: Arc<dyn StatusProvider>,
    ) -> CoreResult<Self> {
        let _ = std::fs::remove_file(socket_path);
        let listener = UnixListener::bind(socket_path)
            .map_err(|e| ecd_core::CoreError::failure(format!("binding {}: {e}", socket_path.display())))?;
        Ok(Self { listener, submitter, status })
    }

    /// Adopt a socket passed in by systemd socket activation (the
    /// `LISTEN_FDS`/`LISTEN_FDNAMES` env protocol, fds starting at 3),
    /// bypassing `bind`/`listen` entirely. Returns `None` when the process
    /// was not socket-activated, so the caller can fall back to `bind`.
    pub fn from_socket_activation(
        submitter: Arc<dyn DeploymentSubmitter>,
        status: Arc<dyn StatusProvider>,
    ) -> CoreResult<Option<Self>> {
        let mut listenfd = ListenFd::from_env();
        let Some(std_listener) = listenfd
            .take_unix_listener(0)
            .map_err(|e| ecd_core::CoreError::failure(format!("adopting activated socket: {e}")))?
        else {
            return Ok(None);
        };
        std_listener
            .set_nonblocking(true)
            .map_err(|e| ecd_core::CoreError::failure(format!("configuring activated socket: {e}")))?;
        let listener = UnixListener::from_std(std_listener)
            .map_err(|e| ecd_core::CoreError::failure(format!("adopting activated socket: {e}")))?;
        Ok(Some(Self { listener, submitter, status }))
    }

    pub async fn run(self) {
        loop {
            match self.listener.accept().await {
                Ok((stream, _)) => {
                    let submitter = Arc::clone(&self.submitter);
                    let status = Arc::clone(&self.status);
                    tokio::spawn(async move {
                        if let Err(e) = handle_connection(stream, submitter, status).await {
                            debug!(error = %e, "ipc connection ended with an error");
                        }
                    });
                }
                Err(e) => error!(error = %e, "ipc accept error"),
            }
        }
    }
}

async fn handle_connection(
    mut stream: UnixStream,
    submitter: Arc<dyn DeploymentSubmitter>,
    status: Arc<dyn StatusProvider>,
) -> std::io::Result<()> {
    let request = match tokio::time::timeout(IPC_TIMEOUT, read_request(&mut stream)).await {
        Ok(Ok(request)) => request,
        Ok(Err(e)) => {
            warn!(error = %e, "ipc request decode failed");
            return Ok(());
        }
        Err(_) => {
            warn!("ipc client did not send a request within the timeout");
            return Ok(());
        }
    };

    let response = dispatch(request, &submitter, &status);

    if tokio::time::timeout(IPC_TIMEOUT, write_response(&mut stream, &response)).await.is_err() {
        warn!("ipc client did not accept the response within the timeout");
    }
    Ok(())
}

fn dispatch(request: Request, submitter: &Arc<dyn DeploymentSubmitter>, status: &Arc<dyn StatusProvider>) -> Response {
    match request {
        Request::Hello => Response::Hello { version: env!("CARGO_PKG_VERSION").to_string() },
        Request::Ping => Response::Pong,
        Request::CreateLocalDeployment { recipe_directory_path, artifacts_directory_path, components } => {
            match submitter.submit_local_deployment(recipe_directory_path, artifacts_directory_path, components) {
                Ok(deployment_id) => Response::DeploymentCreated { deployment_id },
                Err(e) => Response::Error { message: e.to_string() },
            }
        }
        Request::Query(Query::GetDeploymentStatus) => {
            let (current, queue_depth) = status.deployment_status();
            Response::DeploymentStatus { current, queue_depth }
        }
        Request::Query(Query::ListComponents) => Response::Components { components: status.list_components() },
    }
}

#[cfg(test)]
#[path = "ipc_server_tests.rs"]
mod tests;
