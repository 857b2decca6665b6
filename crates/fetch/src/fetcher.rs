// SPDX-License-Identifier: MIT
// Copyright (c) 2026 The ecd Authors

//! The artifact acquisition pipeline (§4.5): per-scheme authenticated
//! download, retry/backoff on S3 403, digest verification, and optional
//! ZIP unarchiving.

use std::path::PathBuf;

use ecd_core::{ArtifactSpec, ArtifactUri, ComponentIdentity, CoreError, CoreResult};
use tracing::{debug, info, warn};

use crate::aws_credentials::AwsCredentials;
use crate::backoff::{delay_for_attempt, S3_RETRY_ATTEMPTS, S3_RETRY_BASE, S3_RETRY_CAP};
use crate::digest;
use crate::paths::{artifact_dir, artifact_path, unarchived_dir};
use crate::traits::{DockerPuller, EcrCredentialsProvider, GreengrassArtifactDataplane, HttpDownloader, Sigv4Signer, ZipExtractor};

/// What a single artifact fetch produced: a file on disk, or (for
/// `docker://` artifacts, which have no staging path) a pulled image
/// reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchOutcome {
    Downloaded { path: PathBuf, unarchived_to: Option<PathBuf> },
    DockerImage { image: String },
}

pub struct ArtifactFetcher<'a> {
    root: PathBuf,
    region: String,
    http: &'a dyn HttpDownloader,
    signer: &'a dyn Sigv4Signer,
    zip: &'a dyn ZipExtractor,
    docker: &'a dyn DockerPuller,
    ecr: &'a dyn EcrCredentialsProvider,
    dataplane: &'a dyn GreengrassArtifactDataplane,
}

impl<'a> ArtifactFetcher<'a> {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        root: impl Into<PathBuf>,
        region: impl Into<String>,
        http: &'a dyn HttpDownloader,
        signer: &'a dyn Sigv4Signer,
        zip: &'a dyn ZipExtractor,
        docker: &'a dyn DockerPuller,
        ecr: &'a dyn EcrCredentialsProvider,
        dataplane: &'a dyn GreengrassArtifactDataplane,
    ) -> Self {
        Self { root: root.into(), region: region.into(), http, signer, zip, docker, ecr, dataplane }
    }

    /// Fetch one artifact, dispatching on its URI scheme.
    ///
    /// `component_arn` is required for `greengrass://` artifacts (the
    /// resolver records it under `services.<name>.arn` once a component is
    /// resolved). `credentials` is required for `s3://` and private-ECR
    /// `docker://` artifacts; its absence there is the caller's (executor's)
    /// signal to abort unless the deployment is local.
    pub async fn fetch(
        &self,
        identity: &ComponentIdentity,
        component_arn: Option<&str>,
        spec: &ArtifactSpec,
        credentials: Option<&AwsCredentials>,
    ) -> CoreResult<FetchOutcome> {
        match spec.parsed_uri()? {
            ArtifactUri::S3 { host, path, file } => {
                let creds = credentials
                    .ok_or_else(|| CoreError::failure("missing TES credentials for s3:// artifact"))?;
                let outcome = self.fetch_s3(identity, spec, &host, &path, &file, creds).await?;
                Ok(outcome)
            }
            ArtifactUri::Greengrass { path, file, .. } => {
                let arn = component_arn
                    .ok_or_else(|| CoreError::invalid("missing component arn for greengrass:// artifact"))?;
                self.fetch_greengrass(identity, spec, arn, &path, &file).await
            }
            ArtifactUri::Docker { registry, repo, tag, digest: _ } => {
                self.fetch_docker(&registry, &repo, &tag, credentials).await
            }
        }
    }

    async fn fetch_s3(
        &self,
        identity: &ComponentIdentity,
        spec: &ArtifactSpec,
        host: &str,
        path: &str,
        file: &str,
        credentials: &AwsCredentials,
    ) -> CoreResult<FetchOutcome> {
        let bucket_host = format!("{host}.s3.{}.amazonaws.com", self.region);
        let url = format!("https://{bucket_host}/{path}");
        let sign_path = format!("/{path}");
        let dest = artifact_path(&self.root, identity, file);
        std::fs::create_dir_all(artifact_dir(&self.root, identity))
            .map_err(|e| CoreError::failure(format!("creating artifact dir: {e}")))?;
        let mode = if spec.requires_unarchive() { 0o644 } else { 0o755 };

        let mut last_status = 0u16;
        for attempt in 0..S3_RETRY_ATTEMPTS {
            let headers = self.signer.sign("GET", &bucket_host, &sign_path, &self.region, "s3", credentials)?;
            let result = self.http.download(&url, &headers, &dest, mode).await?;
            if result.is_success() {
                return self.finish_download(identity, spec, dest, file).await;
            }
            last_status = result.status;
            if result.is_forbidden() && attempt + 1 < S3_RETRY_ATTEMPTS {
                let delay = delay_for_attempt(attempt, S3_RETRY_BASE, S3_RETRY_CAP);
                warn!(%url, attempt, status = result.status, ?delay, "s3 download forbidden, retrying");
                tokio::time::sleep(delay).await;
                continue;
            }
            break;
        }
        Err(CoreError::failure(format!("s3 download of {url} failed with status {last_status}")))
    }

    async fn fetch_greengrass(
        &self,
        identity: &ComponentIdentity,
        spec: &ArtifactSpec,
        component_arn: &str,
        path: &str,
        file: &str,
    ) -> CoreResult<FetchOutcome> {
        let presigned = self.dataplane.presigned_url(component_arn, path).await?;
        let dest = artifact_path(&self.root, identity, file);
        std::fs::create_dir_all(artifact_dir(&self.root, identity))
            .map_err(|e| CoreError::failure(format!("creating artifact dir: {e}")))?;
        let mode = if spec.requires_unarchive() { 0o644 } else { 0o755 };

        let result = self.http.download(&presigned, &[], &dest, mode).await?;
        if !result.is_success() {
            return Err(CoreError::failure(format!("greengrass artifact download failed: status {}", result.status)));
        }
        self.finish_download(identity, spec, dest, file).await
    }

    /// Verify the digest (if present) and unarchive (if requested), common
    /// to the s3 and greengrass fetch paths.
    async fn finish_download(
        &self,
        identity: &ComponentIdentity,
        spec: &ArtifactSpec,
        dest: PathBuf,
        file: &str,
    ) -> CoreResult<FetchOutcome> {
        match &spec.digest {
            Some(expected) => digest::verify(&dest, expected, spec.algorithm.as_deref())?,
            None => warn!(component = %identity, file, "artifact has no digest, skipping verification"),
        }

        let unarchived_to = if spec.requires_unarchive() {
            let dest_dir = unarchived_dir(&self.root, identity, file);
            std::fs::create_dir_all(&dest_dir)
                .map_err(|e| CoreError::failure(format!("creating unarchive dir: {e}")))?;
            self.zip.extract(&dest, &dest_dir)?;
            info!(component = %identity, dest = %dest_dir.display(), "unarchived artifact");
            Some(dest_dir)
        } else {
            None
        };

        Ok(FetchOutcome::Downloaded { path: dest, unarchived_to })
    }

    async fn fetch_docker(
        &self,
        registry: &str,
        repo: &str,
        tag: &str,
        credentials: Option<&AwsCredentials>,
    ) -> CoreResult<FetchOutcome> {
        let effective_tag = if tag.is_empty() { "latest" } else { tag };
        let image = format!("{registry}/{repo}:{effective_tag}");

        let needs_pull = effective_tag == "latest" || !self.docker.image_present(&image).await?;
        if needs_pull {
            let auth = if is_ecr_registry(registry) {
                let creds = credentials
                    .ok_or_else(|| CoreError::failure("missing TES credentials for private ECR pull"))?;
                Some(self.ecr.ecr_credentials(registry, creds).await?)
            } else {
                None
            };
            debug!(%image, "pulling docker image");
            self.docker.pull(&image, auth.as_ref()).await?;
        } else {
            debug!(%image, "docker image already present, skipping pull");
        }

        // Docker performs its own digest verification; nothing further here.
        Ok(FetchOutcome::DockerImage { image })
    }
}

/// Whether `registry` looks like a private ECR registry host
/// (`<account>.dkr.ecr.<region>.amazonaws.com`).
fn is_ecr_registry(registry: &str) -> bool {
    registry.contains(".dkr.ecr.")
}

#[cfg(test)]
#[path = "fetcher_tests.rs"]
mod tests;
