// SPDX-License-Identifier: MIT
// Copyright (c) 2026 The ecd Authors

//! A thin client for the daemon's local IPC socket (§6): one connection,
//! one request, one response, matching the server's own connection model
//! in `ecd_adapters::ipc_server`.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use ecd_core::ComponentRequest;
use ecd_wire::{read_message, write_message, ComponentSummary, CurrentDeploymentSummary, ProtocolError, Query, Request, Response};
use thiserror::Error;
use tokio::net::UnixStream;

/// Mirrors the per-direction timeout the IPC server itself enforces on
/// clients, so a hung daemon fails a command instead of hanging the CLI.
const CLIENT_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("could not reach the daemon at {0}: {1}")]
    Connect(String, std::io::Error),

    #[error("timed out waiting for the daemon to respond")]
    Timeout,

    #[error("protocol error: {0}")]
    Protocol(#[from] ProtocolError),

    #[error("daemon reported an error: {0}")]
    Daemon(String),

    #[error("unexpected response from daemon: {0:?}")]
    UnexpectedResponse(Response),
}

pub struct DaemonClient {
    socket_path: PathBuf,
}

impl DaemonClient {
    /// Verify the daemon is actually listening before returning, so
    /// callers can show a graceful "daemon is not running" message instead
    /// of a raw connection-refused error surfacing mid-command.
    pub fn connect(socket_path: impl Into<PathBuf>) -> Result<Self, ClientError> {
        let socket_path = socket_path.into();
        std::os::unix::net::UnixStream::connect(&socket_path)
            .map_err(|e| ClientError::Connect(socket_path.display().to_string(), e))?;
        Ok(Self { socket_path })
    }

    async fn open(&self) -> Result<UnixStream, ClientError> {
        UnixStream::connect(&self.socket_path)
            .await
            .map_err(|e| ClientError::Connect(self.socket_path.display().to_string(), e))
    }

    pub async fn send(&self, request: &Request) -> Result<Response, ClientError> {
        let mut stream = self.open().await?;
        tokio::time::timeout(CLIENT_TIMEOUT, write_message(&mut stream, request))
            .await
            .map_err(|_| ClientError::Timeout)??;
        let response = tokio::time::timeout(CLIENT_TIMEOUT, read_message(&mut stream))
            .await
            .map_err(|_| ClientError::Timeout)??;
        Ok(response)
    }

    /// Every command handler's catch-all arm for a response variant it
    /// didn't expect: either the daemon reported a structured error, or
    /// the protocol drifted out from under us.
    fn reject<T>(response: Response) -> Result<T, ClientError> {
        match response {
            Response::Error { message } => Err(ClientError::Daemon(message)),
            other => Err(ClientError::UnexpectedResponse(other)),
        }
    }

    pub async fn create_local_deployment(
        &self,
        recipe_directory_path: Option<PathBuf>,
        artifacts_directory_path: Option<PathBuf>,
        components: BTreeMap<String, ComponentRequest>,
    ) -> Result<String, ClientError> {
        let request = Request::CreateLocalDeployment { recipe_directory_path, artifacts_directory_path, components };
        match self.send(&request).await? {
            Response::DeploymentCreated { deployment_id } => Ok(deployment_id),
            other => Self::reject(other),
        }
    }

    pub async fn deployment_status(&self) -> Result<(Option<CurrentDeploymentSummary>, usize), ClientError> {
        match self.send(&Request::Query(Query::GetDeploymentStatus)).await? {
            Response::DeploymentStatus { current, queue_depth } => Ok((current, queue_depth)),
            other => Self::reject(other),
        }
    }

    pub async fn list_components(&self) -> Result<Vec<ComponentSummary>, ClientError> {
        match self.send(&Request::Query(Query::ListComponents)).await? {
            Response::Components { components } => Ok(components),
            other => Self::reject(other),
        }
    }
}

/// True when `path` looks like a socket a daemon could plausibly be
/// listening on, used to produce a friendlier message than a raw
/// `ENOENT`/`ECONNREFUSED` when it plainly isn't running yet.
pub fn socket_missing(path: &Path) -> bool {
    !path.exists()
}

#[cfg(test)]
#[path = "client_tests.rs"]
mod tests;
