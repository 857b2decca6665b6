// SPDX-License-Identifier: MIT
// Copyright (c) 2026 The ecd Authors

//! End-to-end CLI coverage (§10.3): a real [`ecd_adapters::ipc_server::IpcServer`]
//! bound to a Unix socket, backed by a real [`DeploymentQueue`]/`RecipeStore`/
//! config store, driven by the actual `ggdeploy` binary through `assert_cmd`.
//! The bridge types mirror `ggdeploymentd`'s own `QueueDeploymentSubmitter`/
//! `QueueStatusProvider`, since that binary crate exposes no library target
//! for this workspace-level test to depend on.

use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::Arc;

use assert_cmd::Command;
use ecd_adapters::ipc_server::{DeploymentSubmitter, IpcServer, StatusProvider};
use ecd_core::{ComponentRequest, CoreResult, CurrentJobCell, DeploymentQueue, DeploymentType};
use ecd_resolver::{ComponentStore, RecipeStore};
use ecd_storage::config::JsonConfigStore;
use ecd_storage::SharedConfig;
use ecd_wire::{ComponentSummary, CurrentDeploymentSummary};
use serde_json::json;

struct QueueDeploymentSubmitter {
    queue: Arc<DeploymentQueue>,
}

impl DeploymentSubmitter for QueueDeploymentSubmitter {
    fn submit_local_deployment(
        &self,
        recipe_directory_path: Option<PathBuf>,
        artifacts_directory_path: Option<PathBuf>,
        components: BTreeMap<String, ComponentRequest>,
    ) -> CoreResult<String> {
        let doc = json!({
            "recipeDirectoryPath": recipe_directory_path.map(|p| p.to_string_lossy().into_owned()),
            "artifactsDirectoryPath": artifacts_directory_path.map(|p| p.to_string_lossy().into_owned()),
            "components": components,
        });
        let id = self.queue.enqueue(&doc, DeploymentType::Local)?;
        Ok(id.as_str().to_string())
    }
}

struct QueueStatusProvider {
    queue: Arc<DeploymentQueue>,
    #[allow(dead_code)]
    current_job: Arc<CurrentJobCell>,
    recipes: Arc<RecipeStore>,
    config: SharedConfig,
}

impl StatusProvider for QueueStatusProvider {
    fn deployment_status(&self) -> (Option<CurrentDeploymentSummary>, usize) {
        let current = self.queue.current_in_progress();
        let queue_depth = self.queue.len().saturating_sub(current.is_some() as usize);
        let summary = current.map(|deployment| CurrentDeploymentSummary {
            deployment_id: deployment.deployment_id.as_str().to_string(),
            thing_group: deployment.thing_group,
            jobs_id: None,
            jobs_version: None,
        });
        (summary, queue_depth)
    }

    fn list_components(&self) -> Vec<ComponentSummary> {
        let Ok(identities) = self.recipes.scan() else { return Vec::new() };
        let mut by_name: BTreeMap<String, Vec<String>> = BTreeMap::new();
        for identity in identities {
            by_name.entry(identity.name).or_default().push(identity.version);
        }
        let store = ComponentStore::new(&self.recipes, self.config.as_ref());
        by_name
            .into_iter()
            .map(|(name, mut versions)| {
                versions.sort();
                let running_version = store.running_version(&name);
                ComponentSummary { name, versions, running_version }
            })
            .collect()
    }
}

struct Daemon {
    socket_path: PathBuf,
    queue: Arc<DeploymentQueue>,
    _root_dir: tempfile::TempDir,
}

impl Daemon {
    async fn spawn() -> Self {
        let root_dir = tempfile::tempdir().expect("tempdir");
        let root = root_dir.path().to_path_buf();
        let socket_path = root.join("ggdeploymentd.socket");

        let config: SharedConfig = Arc::new(JsonConfigStore::open(root.join("config.json")).expect("open config store"));
        let recipes = Arc::new(RecipeStore::new(&root));
        let queue = Arc::new(DeploymentQueue::new());
        let current_job = Arc::new(CurrentJobCell::new());

        let submitter = Arc::new(QueueDeploymentSubmitter { queue: Arc::clone(&queue) });
        let status = Arc::new(QueueStatusProvider {
            queue: Arc::clone(&queue),
            current_job,
            recipes,
            config,
        });

        let server = IpcServer::bind(&socket_path, submitter, status).expect("bind ipc socket");
        tokio::spawn(server.run());
        // Give the listener a moment to start accepting before the CLI
        // process dials in.
        tokio::time::sleep(std::time::Duration::from_millis(50)).await;

        Self { socket_path, queue, _root_dir: root_dir }
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn deploy_then_status_reflects_the_queued_deployment() {
    let daemon = Daemon::spawn().await;

    let components_file = daemon.socket_path.with_file_name("components.json");
    std::fs::write(&components_file, json!({"foo": {"version": "1.0.0"}}).to_string()).unwrap();

    let assert = Command::cargo_bin("ggdeploy")
        .expect("ggdeploy binary")
        .arg("--socket")
        .arg(&daemon.socket_path)
        .arg("deploy")
        .arg(&components_file)
        .assert()
        .success();
    let stdout = String::from_utf8_lossy(&assert.get_output().stdout).into_owned();
    assert!(stdout.starts_with("Deployment queued:"), "unexpected deploy output: {stdout}");

    assert_eq!(daemon.queue.len(), 1);

    // Dequeue so the status query sees it as the in-progress deployment,
    // matching what the executor would do immediately after pickup.
    let in_progress = daemon.queue.dequeue();

    let assert = Command::cargo_bin("ggdeploy")
        .expect("ggdeploy binary")
        .arg("--socket")
        .arg(&daemon.socket_path)
        .arg("status")
        .assert()
        .success();
    let stdout = String::from_utf8_lossy(&assert.get_output().stdout).into_owned();
    assert!(stdout.contains(in_progress.deployment_id.as_str()), "status output missing deployment id: {stdout}");

    daemon.queue.release(&in_progress);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn components_lists_recipes_on_disk() {
    let daemon = Daemon::spawn().await;

    let assert = Command::cargo_bin("ggdeploy")
        .expect("ggdeploy binary")
        .arg("--socket")
        .arg(&daemon.socket_path)
        .arg("components")
        .assert()
        .success();
    let stdout = String::from_utf8_lossy(&assert.get_output().stdout).into_owned();
    assert_eq!(stdout.trim(), "No components installed");
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn status_with_no_active_deployment_reports_idle() {
    let daemon = Daemon::spawn().await;

    let assert = Command::cargo_bin("ggdeploy")
        .expect("ggdeploy binary")
        .arg("--socket")
        .arg(&daemon.socket_path)
        .arg("status")
        .assert()
        .success();
    let stdout = String::from_utf8_lossy(&assert.get_output().stdout).into_owned();
    assert!(stdout.contains("No deployment in progress"));
}
