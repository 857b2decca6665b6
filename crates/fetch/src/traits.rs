// SPDX-License-Identifier: MIT
// Copyright (c) 2026 The ecd Authors

//! External collaborator contracts the fetch pipeline calls by contract
//! (§1): the HTTP client, the SigV4 signer, the ZIP extractor, and the
//! container CLI. Concrete implementations live in the adapters crate;
//! this crate only depends on these narrow traits so tests can substitute
//! fakes.

use std::path::Path;

use async_trait::async_trait;
use ecd_core::CoreResult;

use crate::aws_credentials::AwsCredentials;

/// The outcome of a single HTTP GET-to-file attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HttpDownload {
    pub status: u16,
}

impl HttpDownload {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    pub fn is_forbidden(&self) -> bool {
        self.status == 403
    }
}

/// Downloads a URL's body to a file on disk, opened with the given Unix
/// permission bits (0o755 normally, 0o644 when the file will be
/// unarchived and discarded, per §4.5).
#[async_trait]
pub trait HttpDownloader: Send + Sync {
    async fn download(&self, url: &str, headers: &[(String, String)], dest: &Path, mode: u32)
        -> CoreResult<HttpDownload>;
}

/// Signs a request with SigV4, returning the headers (including
/// `Authorization`, `x-amz-date`, and `x-amz-security-token` when the
/// credentials carry a session token) to attach to the outbound request.
pub trait Sigv4Signer: Send + Sync {
    #[allow(clippy::too_many_arguments)]
    fn sign(
        &self,
        method: &str,
        host: &str,
        path: &str,
        region: &str,
        service: &str,
        credentials: &AwsCredentials,
    ) -> CoreResult<Vec<(String, String)>>;
}

/// Extracts a ZIP archive into a destination directory.
pub trait ZipExtractor: Send + Sync {
    fn extract(&self, zip_path: &Path, dest_dir: &Path) -> CoreResult<()>;
}

/// ECR-flavored basic-auth credentials returned by the ECR credentials
/// helper.
#[derive(Clone)]
pub struct EcrCredentials {
    pub username: String,
    pub password: String,
}

impl std::fmt::Debug for EcrCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EcrCredentials").field("username", &self.username).field("password", &"<redacted>").finish()
    }
}

/// Pulls container images via the container CLI.
#[async_trait]
pub trait DockerPuller: Send + Sync {
    async fn image_present(&self, image: &str) -> CoreResult<bool>;

    async fn pull(&self, image: &str, registry_auth: Option<&EcrCredentials>) -> CoreResult<()>;
}

/// Retrieves short-lived TES credentials for signing outbound S3/ECR
/// requests.
#[async_trait]
pub trait TesCredentialsProvider: Send + Sync {
    async fn credentials(&self) -> CoreResult<AwsCredentials>;
}

/// Retrieves basic-auth credentials for a private ECR registry, signed
/// with TES credentials (service = `ecr`).
#[async_trait]
pub trait EcrCredentialsProvider: Send + Sync {
    async fn ecr_credentials(&self, registry: &str, tes: &AwsCredentials) -> CoreResult<EcrCredentials>;
}

/// The artifact-facing slice of the cloud dataplane: resolves a
/// `greengrass://` artifact URI to a presigned download URL via
/// `GET /greengrass/v2/components/<arn>/artifacts/<path>`.
#[async_trait]
pub trait GreengrassArtifactDataplane: Send + Sync {
    async fn presigned_url(&self, component_arn: &str, path: &str) -> CoreResult<String>;
}
