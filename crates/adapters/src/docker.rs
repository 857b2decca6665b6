// SPDX-License-Identifier: MIT
// Copyright (c) 2026 The ecd Authors

//! The container CLI (§1, §4.5): shells out to `docker` to check image
//! presence and pull `docker://` artifacts, implementing [`DockerPuller`].

use async_trait::async_trait;
use ecd_core::{CoreError, CoreResult};
use ecd_fetch::{DockerPuller, EcrCredentials};
use tokio::io::AsyncWriteExt;
use tokio::process::Command;
use std::process::Stdio;
use tracing::{debug, warn};

pub struct SubprocessDockerPuller {
    binary: String,
}

impl SubprocessDockerPuller {
    pub fn new() -> Self {
        Self { binary: "docker".to_string() }
    }

    pub fn with_binary(binary: impl Into<String>) -> Self {
        Self { binary: binary.into() }
    }
}

impl Default for SubprocessDockerPuller {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl DockerPuller for SubprocessDockerPuller {
    async fn image_present(&self, image: &str) -> CoreResult<bool> {
        let output = Command::new(&self.binary)
            .args(["image", "inspect", image])
            .output()
            .await
            .map_err(|e| CoreError::failure(format!("spawning {} image inspect: {e}", self.binary)))?;
        Ok(output.status.success())
    }

    async fn pull(&self, image: &str, registry_auth: Option<&EcrCredentials>) -> CoreResult<()> {
        if let Some(auth) = registry_auth {
            let mut child = Command::new(&self.binary)
                .args(["login", "--username", &auth.username, "--password-stdin"])
                .arg(registry_host(image))
                .stdin(Stdio::piped())
                .stdout(Stdio::null())
                .stderr(Stdio::piped())
                .spawn()
                .map_err(|e| CoreError::failure(format!("spawning {} login: {e}", self.binary)))?;

            if let Some(mut stdin) = child.stdin.take() {
                let _ = stdin.write_all(auth.password.as_bytes()).await;
            }
            let output = child
                .wait_with_output()
                .await
                .map_err(|e| CoreError::failure(format!("waiting for {} login: {e}", self.binary)))?;
            if !output.status.success() {
                return Err(CoreError::failure(format!(
                    "{} login failed: {}",
                    self.binary,
                    String::from_utf8_lossy(&output.stderr)
                )));
            }
        }

        debug!(%image, "pulling docker image");
        let status = Command::new(&self.binary)
            .args(["pull", image])
            .status()
            .await
            .map_err(|e| CoreError::failure(format!("spawning {} pull: {e}", self.binary)))?;
        if !status.success() {
            warn!(%image, "docker pull exited non-zero");
            return Err(CoreError::failure(format!("{} pull {image} failed", self.binary)));
        }
        Ok(())
    }
}

fn registry_host(image: &str) -> &str {
    image.split('/').next().unwrap_or(image)
}

#[cfg(test)]
#[path = "docker_tests.rs"]
mod tests;
