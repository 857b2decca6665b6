// SPDX-License-Identifier: MIT
// Copyright (c) 2026 The ecd Authors

//! In-memory fakes for every external-collaborator trait the core
//! subsystems consume, so `ecd-daemon` and the workspace integration
//! tests can wire a fully-functional fake daemon without a real broker,
//! cloud endpoint, or `systemctl`.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use ecd_core::{ComponentRequest, CoreError, CoreResult};
use ecd_exec::{
    DeploymentStatus, FleetStatusReporter, HealthStatusService, JobOutcome, JobStatusReporter, LifecycleState,
    RebootInvoker, RecipeTranslator, ServiceManager, TranslatedUnits,
};
use ecd_fetch::{
    AwsCredentials, DockerPuller, EcrCredentials, EcrCredentialsProvider, GreengrassArtifactDataplane, HttpDownload,
    HttpDownloader, Sigv4Signer, TesCredentialsProvider, ZipExtractor,
};
use ecd_jobs::MqttTransport;
use ecd_resolver::{CloudDataplane, PlatformAttributes, ResolvedCandidate};
use ecd_wire::{ComponentSummary, CurrentDeploymentSummary};
use parking_lot::Mutex;

use crate::ipc_server::{DeploymentSubmitter, StatusProvider};

// ── Cloud dataplane ──────────────────────────────────────────────────────

/// Records every call it receives and answers from a small, test-seeded
/// in-memory catalog rather than hitting the network.
#[derive(Default)]
pub struct FakeCloudDataplane {
    inner: Mutex<FakeCloudDataplaneState>,
}

#[derive(Default)]
struct FakeCloudDataplaneState {
    thing_groups: BTreeMap<String, Vec<String>>,
    candidates: BTreeMap<String, ResolvedCandidate>,
    presigned_urls: BTreeMap<(String, String), String>,
}

impl FakeCloudDataplane {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_thing_groups(&self, thing_name: &str, groups: Vec<String>) {
        self.inner.lock().thing_groups.insert(thing_name.to_string(), groups);
    }

    pub fn set_candidate(&self, component_name: &str, candidate: ResolvedCandidate) {
        self.inner.lock().candidates.insert(component_name.to_string(), candidate);
    }

    pub fn set_presigned_url(&self, component_arn: &str, path: &str, url: &str) {
        self.inner.lock().presigned_urls.insert((component_arn.to_string(), path.to_string()), url.to_string());
    }
}

#[async_trait]
impl CloudDataplane for FakeCloudDataplane {
    async fn get_thing_groups(&self, thing_name: &str) -> CoreResult<Vec<String>> {
        Ok(self.inner.lock().thing_groups.get(thing_name).cloned().unwrap_or_default())
    }

    async fn resolve_component_candidates(
        &self,
        name: &str,
        _requirement: &str,
        _platform: &PlatformAttributes,
    ) -> CoreResult<ResolvedCandidate> {
        self.inner
            .lock()
            .candidates
            .get(name)
            .cloned()
            .ok_or_else(|| CoreError::not_found(format!("no fake candidate seeded for {name}")))
    }
}

#[async_trait]
impl GreengrassArtifactDataplane for FakeCloudDataplane {
    async fn presigned_url(&self, component_arn: &str, path: &str) -> CoreResult<String> {
        self.inner
            .lock()
            .presigned_urls
            .get(&(component_arn.to_string(), path.to_string()))
            .cloned()
            .ok_or_else(|| CoreError::not_found(format!("no fake presigned url seeded for {component_arn}/{path}")))
    }
}

// ── Fetch-side collaborators ─────────────────────────────────────────────

/// Writes `contents` (fixed per instance) to the requested destination
/// instead of making a real request.
pub struct FakeHttpDownloader {
    status: u16,
    contents: Vec<u8>,
}

impl FakeHttpDownloader {
    pub fn new(contents: impl Into<Vec<u8>>) -> Self {
        Self { status: 200, contents: contents.into() }
    }

    pub fn with_status(status: u16) -> Self {
        Self { status, contents: Vec::new() }
    }
}

#[async_trait]
impl HttpDownloader for FakeHttpDownloader {
    async fn download(&self, _url: &str, _headers: &[(String, String)], dest: &Path, mode: u32) -> CoreResult<HttpDownload> {
        if (200..300).contains(&self.status) {
            std::fs::write(dest, &self.contents).map_err(|e| CoreError::failure(format!("writing {}: {e}", dest.display())))?;
            #[cfg(unix)]
            {
                use std::os::unix::fs::PermissionsExt;
                let _ = std::fs::set_permissions(dest, std::fs::Permissions::from_mode(mode));
            }
        }
        Ok(HttpDownload { status: self.status })
    }
}

/// Returns a fixed, deterministic header set rather than computing SigV4.
pub struct FakeSigv4Signer;

impl Sigv4Signer for FakeSigv4Signer {
    fn sign(
        &self,
        _method: &str,
        _host: &str,
        _path: &str,
        _region: &str,
        _service: &str,
        _credentials: &AwsCredentials,
    ) -> CoreResult<Vec<(String, String)>> {
        Ok(vec![("Authorization".to_string(), "fake-signature".to_string())])
    }
}

/// No-op extraction: just records the call. Tests that need real files on
/// disk after "extraction" should seed them directly instead.
#[derive(Default)]
pub struct FakeZipExtractor {
    calls: Mutex<Vec<(PathBuf, PathBuf)>>,
}

impl FakeZipExtractor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn calls(&self) -> Vec<(PathBuf, PathBuf)> {
        self.calls.lock().clone()
    }
}

impl ZipExtractor for FakeZipExtractor {
    fn extract(&self, zip_path: &Path, dest_dir: &Path) -> CoreResult<()> {
        self.calls.lock().push((zip_path.to_path_buf(), dest_dir.to_path_buf()));
        std::fs::create_dir_all(dest_dir).map_err(|e| CoreError::failure(format!("creating {}: {e}", dest_dir.display())))
    }
}

/// Every image is "present"; `pull` always succeeds and records the call.
#[derive(Default)]
pub struct FakeDockerPuller {
    pulls: Mutex<Vec<String>>,
}

impl FakeDockerPuller {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn pulls(&self) -> Vec<String> {
        self.pulls.lock().clone()
    }
}

#[async_trait]
impl DockerPuller for FakeDockerPuller {
    async fn image_present(&self, _image: &str) -> CoreResult<bool> {
        Ok(false)
    }

    async fn pull(&self, image: &str, _registry_auth: Option<&EcrCredentials>) -> CoreResult<()> {
        self.pulls.lock().push(image.to_string());
        Ok(())
    }
}

/// Returns a fixed set of credentials every call.
pub struct FakeTesCredentialsProvider {
    credentials: AwsCredentials,
}

impl FakeTesCredentialsProvider {
    pub fn new() -> Self {
        Self {
            credentials: AwsCredentials {
                access_key_id: "AKIAFAKE".to_string(),
                secret_access_key: "fake-secret".to_string(),
                session_token: Some("fake-session-token".to_string()),
            },
        }
    }
}

impl Default for FakeTesCredentialsProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl TesCredentialsProvider for FakeTesCredentialsProvider {
    async fn credentials(&self) -> CoreResult<AwsCredentials> {
        Ok(self.credentials.clone())
    }
}

/// Returns a fixed username/password every call.
pub struct FakeEcrCredentialsProvider;

#[async_trait]
impl EcrCredentialsProvider for FakeEcrCredentialsProvider {
    async fn ecr_credentials(&self, _registry: &str, _tes: &AwsCredentials) -> CoreResult<EcrCredentials> {
        Ok(EcrCredentials { username: "AWS".to_string(), password: "fake-ecr-token".to_string() })
    }
}

// ── Process-supervision collaborators ────────────────────────────────────

/// Every verb records the unit name (or path) it was called with and
/// always succeeds, so tests can assert on call order without a real
/// systemd.
#[derive(Default)]
pub struct FakeServiceManager {
    calls: Mutex<Vec<String>>,
}

impl FakeServiceManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().clone()
    }
}

#[async_trait]
impl ServiceManager for FakeServiceManager {
    async fn link(&self, unit_path: &str) -> CoreResult<()> {
        self.calls.lock().push(format!("link {unit_path}"));
        Ok(())
    }

    async fn unlink(&self, unit_name: &str) -> CoreResult<()> {
        self.calls.lock().push(format!("unlink {unit_name}"));
        Ok(())
    }

    async fn start(&self, unit_name: &str) -> CoreResult<()> {
        self.calls.lock().push(format!("start {unit_name}"));
        Ok(())
    }

    async fn stop(&self, unit_name: &str) -> CoreResult<()> {
        self.calls.lock().push(format!("stop {unit_name}"));
        Ok(())
    }

    async fn enable(&self, unit_name: &str) -> CoreResult<()> {
        self.calls.lock().push(format!("enable {unit_name}"));
        Ok(())
    }

    async fn disable(&self, unit_name: &str) -> CoreResult<()> {
        self.calls.lock().push(format!("disable {unit_name}"));
        Ok(())
    }

    async fn daemon_reload(&self) -> CoreResult<()> {
        self.calls.lock().push("daemon-reload".to_string());
        Ok(())
    }

    async fn reset_failed(&self) -> CoreResult<()> {
        self.calls.lock().push("reset-failed".to_string());
        Ok(())
    }
}

/// Returns a single run-unit file (seeded to exist on disk by the test)
/// for whatever component name it is asked to translate.
pub struct FakeRecipeTranslator {
    units: Mutex<BTreeMap<String, TranslatedUnits>>,
}

impl FakeRecipeTranslator {
    pub fn new() -> Self {
        Self { units: Mutex::new(BTreeMap::new()) }
    }

    pub fn set_units(&self, component_name: &str, units: TranslatedUnits) {
        self.units.lock().insert(component_name.to_string(), units);
    }
}

impl Default for FakeRecipeTranslator {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl RecipeTranslator for FakeRecipeTranslator {
    async fn translate(&self, component_name: &str, _recipe_path: &Path, _staging_dir: &Path) -> CoreResult<TranslatedUnits> {
        self.units
            .lock()
            .get(component_name)
            .cloned()
            .ok_or_else(|| CoreError::not_found(format!("no fake translation seeded for {component_name}")))
    }
}

/// Always reports the seeded terminal state immediately, with no polling
/// delay.
pub struct FakeHealthStatusService {
    state: LifecycleState,
}

impl FakeHealthStatusService {
    pub fn new(state: LifecycleState) -> Self {
        Self { state }
    }
}

#[async_trait]
impl HealthStatusService for FakeHealthStatusService {
    async fn wait_for_terminal(&self, _unit_name: &str, _timeout: Duration) -> CoreResult<LifecycleState> {
        Ok(self.state)
    }
}

/// Records that a reboot was requested instead of actually rebooting.
#[derive(Default)]
pub struct FakeRebootInvoker {
    invoked: Mutex<bool>,
}

impl FakeRebootInvoker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn was_invoked(&self) -> bool {
        *self.invoked.lock()
    }
}

#[async_trait]
impl RebootInvoker for FakeRebootInvoker {
    async fn reboot(&self) -> CoreResult<()> {
        *self.invoked.lock() = true;
        Ok(())
    }
}

/// Records every reported outcome, keyed by deployment id.
#[derive(Default)]
pub struct FakeFleetStatusReporter {
    reports: Mutex<Vec<(String, DeploymentStatus)>>,
}

impl FakeFleetStatusReporter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reports(&self) -> Vec<(String, DeploymentStatus)> {
        self.reports.lock().clone()
    }
}

#[async_trait]
impl FleetStatusReporter for FakeFleetStatusReporter {
    async fn report(&self, deployment_id: &str, status: DeploymentStatus) -> CoreResult<()> {
        self.reports.lock().push((deployment_id.to_string(), status));
        Ok(())
    }
}

/// Records every reported outcome, keyed by job id.
#[derive(Default)]
pub struct FakeJobStatusReporter {
    updates: Mutex<Vec<(String, i32, JobOutcome)>>,
}

impl FakeJobStatusReporter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn updates(&self) -> Vec<(String, i32, JobOutcome)> {
        self.updates.lock().clone()
    }
}

#[async_trait]
impl JobStatusReporter for FakeJobStatusReporter {
    async fn update_job(&self, job_id: &str, expected_version: i32, outcome: JobOutcome) -> CoreResult<()> {
        self.updates.lock().push((job_id.to_string(), expected_version, outcome));
        Ok(())
    }
}

// ── Jobs MQTT transport ───────────────────────────────────────────────────

/// An in-memory `MqttTransport`: `request` looks up a response seeded for
/// the topic, recording every publish, with no broker involved.
#[derive(Default)]
pub struct FakeMqttTransport {
    responses: Mutex<BTreeMap<String, CoreResult<Vec<u8>>>>,
    requests: Mutex<Vec<(String, Vec<u8>)>>,
    subscriptions: Mutex<Vec<String>>,
}

impl FakeMqttTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_response(&self, topic: &str, response: Vec<u8>) {
        self.responses.lock().insert(topic.to_string(), Ok(response));
    }

    pub fn set_rejection(&self, topic: &str, body: impl Into<String>) {
        self.responses.lock().insert(topic.to_string(), Err(CoreError::Remote(body.into())));
    }

    pub fn requests(&self) -> Vec<(String, Vec<u8>)> {
        self.requests.lock().clone()
    }

    pub fn subscriptions(&self) -> Vec<String> {
        self.subscriptions.lock().clone()
    }
}

#[async_trait]
impl MqttTransport for FakeMqttTransport {
    async fn subscribe(&self, topic: &str) -> CoreResult<()> {
        self.subscriptions.lock().push(topic.to_string());
        Ok(())
    }

    async fn request(&self, topic: &str, payload: Vec<u8>) -> CoreResult<Vec<u8>> {
        self.requests.lock().push((topic.to_string(), payload));
        match self.responses.lock().get(topic) {
            Some(Ok(body)) => Ok(body.clone()),
            Some(Err(CoreError::Remote(body))) => Err(CoreError::Remote(body.clone())),
            Some(Err(_)) | None => Err(CoreError::not_found(format!("no fake response seeded for {topic}"))),
        }
    }
}

// ── Local IPC collaborators ───────────────────────────────────────────────

/// Always accepts, returning a caller-assigned deployment id.
pub struct FakeDeploymentSubmitter {
    deployment_id: String,
}

impl FakeDeploymentSubmitter {
    pub fn new(deployment_id: impl Into<String>) -> Self {
        Self { deployment_id: deployment_id.into() }
    }
}

impl DeploymentSubmitter for FakeDeploymentSubmitter {
    fn submit_local_deployment(
        &self,
        _recipe_directory_path: Option<PathBuf>,
        _artifacts_directory_path: Option<PathBuf>,
        _components: BTreeMap<String, ComponentRequest>,
    ) -> CoreResult<String> {
        Ok(self.deployment_id.clone())
    }
}

/// Returns a fixed, caller-configured status snapshot.
pub struct FakeStatusProvider {
    current: Option<CurrentDeploymentSummary>,
    queue_depth: usize,
    components: Vec<ComponentSummary>,
}

impl FakeStatusProvider {
    pub fn new(current: Option<CurrentDeploymentSummary>, queue_depth: usize, components: Vec<ComponentSummary>) -> Self {
        Self { current, queue_depth, components }
    }
}

impl StatusProvider for FakeStatusProvider {
    fn deployment_status(&self) -> (Option<CurrentDeploymentSummary>, usize) {
        (self.current.clone(), self.queue_depth)
    }

    fn list_components(&self) -> Vec<ComponentSummary> {
        self.components.clone()
    }
}

/// Convenience constructor bundling every fake collaborator an
/// `ExecutorDeps`/`JobsListener` wiring needs, with `Arc` already applied.
pub fn arc<T>(value: T) -> Arc<T> {
    Arc::new(value)
}

#[cfg(test)]
#[path = "fakes_tests.rs"]
mod tests;
