// SPDX-License-Identifier: MIT
// Copyright (c) 2026 The ecd Authors

//! Shared fixture assembly for the workspace-level end-to-end specs (§8):
//! a fully-wired daemon built from real `ecd-core`/`ecd-storage`/
//! `ecd-resolver`/`ecd-fetch`/`ecd-exec` state and `ecd_adapters::fakes`
//! standing in for every external collaborator (cloud, MQTT, HTTP, the
//! service manager, health, reboot, fleet/job status).

use std::path::PathBuf;
use std::sync::Arc;

use ecd_adapters::fakes::{
    FakeCloudDataplane, FakeDockerPuller, FakeEcrCredentialsProvider, FakeFleetStatusReporter, FakeHealthStatusService,
    FakeHttpDownloader, FakeJobStatusReporter, FakeRebootInvoker, FakeRecipeTranslator, FakeServiceManager,
    FakeSigv4Signer, FakeTesCredentialsProvider, FakeZipExtractor,
};
use ecd_core::{CurrentJobCell, DeploymentQueue};
use ecd_exec::{BootstrapManager, DeploymentExecutor, ExecutorDeps, LifecycleState, StaleCleanup, CORE_TARGET_UNIT};
use ecd_exec::{RecipeTranslator, TranslatedUnits};
use ecd_fetch::ArtifactFetcher;
use ecd_resolver::{ComponentStore, PlatformAttributes, RecipeStore};
use ecd_storage::config::JsonConfigStore;
use ecd_storage::{CheckpointStore, GroupRootsStore, SharedConfig};

/// Every collaborator a deployment attempt touches, real where the spec
/// treats it as a core subsystem and faked where it is an external
/// collaborator (§1/§6).
pub struct Fixture {
    pub _root_dir: tempfile::TempDir,
    pub root: PathBuf,
    pub config: SharedConfig,
    pub recipes: RecipeStore,
    pub group_roots: GroupRootsStore,
    pub checkpoints: CheckpointStore,
    pub queue: DeploymentQueue,
    pub current_job: CurrentJobCell,
    pub dataplane: FakeCloudDataplane,
    pub tes: FakeTesCredentialsProvider,
    pub http: FakeHttpDownloader,
    pub signer: FakeSigv4Signer,
    pub zip: FakeZipExtractor,
    pub docker: FakeDockerPuller,
    pub ecr: FakeEcrCredentialsProvider,
    pub services: FakeServiceManager,
    pub health: FakeHealthStatusService,
    pub reboot: FakeRebootInvoker,
    pub fleet_status: FakeFleetStatusReporter,
    pub job_status: FakeJobStatusReporter,
    pub translator: FakeRecipeTranslator,
}

impl Fixture {
    pub fn new() -> Self {
        Self::with_health(LifecycleState::Running)
    }

    pub fn with_health(terminal_state: LifecycleState) -> Self {
        let root_dir = tempfile::tempdir().expect("tempdir");
        let root = root_dir.path().to_path_buf();
        let config: SharedConfig = Arc::new(JsonConfigStore::open(root.join("config.json")).expect("open config store"));
        Self {
            recipes: RecipeStore::new(&root),
            group_roots: GroupRootsStore::new(Arc::clone(&config)),
            checkpoints: CheckpointStore::new(Arc::clone(&config)),
            queue: DeploymentQueue::new(),
            current_job: CurrentJobCell::new(),
            dataplane: FakeCloudDataplane::new(),
            tes: FakeTesCredentialsProvider::new(),
            http: FakeHttpDownloader::new(Vec::new()),
            signer: FakeSigv4Signer,
            zip: FakeZipExtractor::new(),
            docker: FakeDockerPuller::new(),
            ecr: FakeEcrCredentialsProvider,
            services: FakeServiceManager::new(),
            health: FakeHealthStatusService::new(terminal_state),
            reboot: FakeRebootInvoker::new(),
            fleet_status: FakeFleetStatusReporter::new(),
            job_status: FakeJobStatusReporter::new(),
            translator: FakeRecipeTranslator::new(),
            config,
            _root_dir: root_dir,
            root,
        }
    }

    /// Write a minimal on-disk recipe for (name, version) with no
    /// dependencies and no artifacts, then seed a matching translator
    /// response so the executor's translation step succeeds.
    pub fn write_recipe(&self, name: &str, version: &str) {
        self.write_recipe_with_dependencies(name, version, &[]);
    }

    pub fn write_recipe_with_dependencies(&self, name: &str, version: &str, dependencies: &[(&str, &str)]) {
        let path = self.recipes.recipes_dir().join(format!("{name}-{version}.json"));
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        let deps: serde_json::Map<String, serde_json::Value> = dependencies
            .iter()
            .map(|(dep_name, requirement)| {
                ((*dep_name).to_string(), serde_json::json!({ "VersionRequirement": requirement }))
            })
            .collect();
        std::fs::write(
            &path,
            serde_json::to_vec(&serde_json::json!({
                "ComponentName": name,
                "ComponentConfiguration": {"DefaultConfiguration": {}},
                "ComponentDependencies": deps,
                "Manifests": [{"platform": "linux", "Artifacts": []}],
            }))
            .unwrap(),
        )
        .unwrap();
        self.translator.set_units(name, TranslatedUnits { declared_component_name: name.to_string(), ..Default::default() });
    }

    pub fn fetcher(&self) -> ArtifactFetcher<'_> {
        ArtifactFetcher::new(&self.root, "us-east-1", &self.http, &self.signer, &self.zip, &self.docker, &self.ecr, &self.dataplane)
    }

    pub fn bootstrap(&self) -> BootstrapManager<'_> {
        BootstrapManager::new(&self.checkpoints, &self.services, &self.reboot)
    }

    pub fn stale_cleanup(&self) -> StaleCleanup<'_> {
        StaleCleanup::new(&self.services, self.config.as_ref())
    }

    pub fn component_store(&self) -> ComponentStore<'_> {
        ComponentStore::new(&self.recipes, self.config.as_ref())
    }

    pub fn platform(&self) -> PlatformAttributes {
        PlatformAttributes::linux_nucleus_lite("x86_64", None)
    }

    /// Build an [`ExecutorDeps`] wired entirely against this fixture's
    /// collaborators, borrowing the externally-supplied fetcher/bootstrap/
    /// stale-cleanup so callers can reuse them across a recovery + resume
    /// pair of [`DeploymentExecutor`] instances within the same fixture.
    pub fn deps<'a>(
        &'a self,
        fetcher: &'a ArtifactFetcher<'a>,
        bootstrap: &'a BootstrapManager<'a>,
        stale: &'a StaleCleanup<'a>,
    ) -> ExecutorDeps<'a> {
        ExecutorDeps {
            root: self.root.clone(),
            recipes: &self.recipes,
            config: self.config.as_ref(),
            group_roots: &self.group_roots,
            dataplane: &self.dataplane,
            nucleus_version: "2.0.0".to_string(),
            platform: self.platform(),
            thing_name: "test-thing".to_string(),
            target_unit: CORE_TARGET_UNIT.to_string(),
            tes: &self.tes,
            fetcher,
            translator: &self.translator,
            services: &self.services,
            health: &self.health,
            bootstrap,
            stale_cleanup: stale,
            fleet_status: &self.fleet_status,
            job_status: &self.job_status,
            checkpoints: &self.checkpoints,
            queue: &self.queue,
            current_job: &self.current_job,
        }
    }

    pub fn executor<'a>(
        &'a self,
        fetcher: &'a ArtifactFetcher<'a>,
        bootstrap: &'a BootstrapManager<'a>,
        stale: &'a StaleCleanup<'a>,
    ) -> DeploymentExecutor<'a> {
        DeploymentExecutor::new(self.deps(fetcher, bootstrap, stale))
    }

    pub fn write_unit(&self, file_name: &str) {
        std::fs::write(self.root.join(file_name), b"[Unit]\n").unwrap();
    }
}
