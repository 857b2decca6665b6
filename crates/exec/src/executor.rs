// SPDX-License-Identifier: MIT
// Copyright (c) 2026 The ecd Authors

//! The Deployment Executor (§4.3): the top-level orchestrator. Dequeues one
//! deployment at a time, runs the ordered resolve → fetch → bootstrap →
//! install → run/startup → cleanup pipeline, and reports the outcome.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use ecd_core::{
    ComponentIdentity, CoreError, CoreResult, CurrentJobCell, Deployment, DeploymentQueue,
    DeploymentStateCheckpoint, DeploymentType, RECIPE_EXTENSIONS,
};
use ecd_fetch::ArtifactFetcher;
use ecd_resolver::{CloudDataplane, ComponentStore, DependencyResolver, PlatformAttributes, RecipeStore};
use ecd_storage::{CheckpointStore, ConfigFacade, ConfigFacadeExt, GroupRootsStore};
use tracing::{info, warn};

use crate::bootstrap::{BootstrapManager, BootstrapOutcome};
use crate::config_apply;
use crate::fleet_status::{DeploymentStatus, FleetStatusReporter};
use crate::health::{HealthStatusService, PHASE_WAIT_TIMEOUT};
use crate::jobs_status::{JobOutcome, JobStatusReporter};
use crate::recipe_translator::RecipeTranslator;
use crate::service_manager::ServiceManager;
use crate::stale_cleanup::StaleCleanup;
use crate::staging;
use crate::units::{install_unit, run_unit};

/// The unit started once every component's install/run phase has completed,
/// per §4.3 step 8 ("start a named target unit").
pub const CORE_TARGET_UNIT: &str = "ggl.target";

/// Every external collaborator and piece of shared state the executor needs
/// across a deployment attempt, bundled so [`DeploymentExecutor::new`]
/// doesn't take a dozen positional arguments.
pub struct ExecutorDeps<'a> {
    pub root: PathBuf,
    pub recipes: &'a RecipeStore,
    pub config: &'a dyn ConfigFacade,
    pub group_roots: &'a GroupRootsStore,
    pub dataplane: &'a dyn CloudDataplane,
    pub nucleus_version: String,
    pub platform: PlatformAttributes,
    pub thing_name: String,
    pub target_unit: String,
    pub tes: &'a dyn ecd_fetch::TesCredentialsProvider,
    pub fetcher: &'a ArtifactFetcher<'a>,
    pub translator: &'a dyn RecipeTranslator,
    pub services: &'a dyn ServiceManager,
    pub health: &'a dyn HealthStatusService,
    pub bootstrap: &'a BootstrapManager<'a>,
    pub stale_cleanup: &'a StaleCleanup<'a>,
    pub fleet_status: &'a dyn FleetStatusReporter,
    pub job_status: &'a dyn JobStatusReporter,
    pub checkpoints: &'a CheckpointStore,
    pub queue: &'a DeploymentQueue,
    pub current_job: &'a CurrentJobCell,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum HandleOutcome {
    Completed,
    RebootRequested,
}

pub struct DeploymentExecutor<'a> {
    deps: ExecutorDeps<'a>,
}

impl<'a> DeploymentExecutor<'a> {
    pub fn new(deps: ExecutorDeps<'a>) -> Self {
        Self { deps }
    }

    /// Startup recovery (§4.3 step 1, §4.7): if a deployment was in progress
    /// when the process last stopped (bootstrap reboot or crash), finish it
    /// before the main loop starts pulling from the queue.
    pub async fn run_recovered(&self) {
        let Some(mut checkpoint) = self.deps.bootstrap.recover() else { return };
        let Some(deployment) = checkpoint.deployment_doc.clone() else {
            warn!("recovered deployment state carried no deployment document, discarding");
            let _ = self.deps.checkpoints.clear();
            return;
        };
        info!(deployment_id = %deployment.deployment_id, "resuming deployment recovered from persisted state");
        self.run_deployment(deployment, &mut checkpoint).await;
    }

    /// The main loop (§4.3 step 2): dequeue, run, report, release — forever.
    pub async fn run_forever(&self) -> ! {
        loop {
            let deployment = tokio::task::block_in_place(|| self.deps.queue.dequeue());
            let mut checkpoint = self.new_checkpoint(deployment.clone());
            self.run_deployment(deployment.clone(), &mut checkpoint).await;
            self.deps.queue.release(&deployment);
        }
    }

    /// Build the fresh checkpoint a new (not recovered) deployment attempt
    /// starts from, capturing the driving Jobs id/version if this is a
    /// cloud-origin deployment. Exposed so callers that dequeue a
    /// deployment themselves (rather than going through
    /// [`Self::run_forever`]) can drive a single attempt with
    /// [`Self::run_deployment`].
    pub fn new_checkpoint(&self, deployment: Deployment) -> DeploymentStateCheckpoint {
        let (jobs_id, jobs_version) = if deployment.deployment_type == DeploymentType::ThingGroup {
            (self.deps.current_job.current_job_id(), Some(self.deps.current_job.version() as i64))
        } else {
            (None, None)
        };
        DeploymentStateCheckpoint::for_deployment(deployment, jobs_id, jobs_version)
    }

    /// Publish `IN_PROGRESS`, run the pipeline, publish the terminal status,
    /// and clear the checkpoint unconditionally — the heart of §4.3. Public
    /// so a caller driving the queue itself (tests, or an embedder that
    /// wants to observe each attempt rather than loop via
    /// [`Self::run_forever`]) can run exactly one deployment attempt.
    pub async fn run_deployment(&self, deployment: Deployment, checkpoint: &mut DeploymentStateCheckpoint) {
        if let Err(err) = self.deps.checkpoints.save(checkpoint) {
            warn!(deployment_id = %deployment.deployment_id, error = %err, "failed to persist initial checkpoint");
        }
        self.report_job_status(&deployment, JobOutcome::InProgress).await;

        match self.handle_deployment(&deployment, checkpoint).await {
            Ok(HandleOutcome::RebootRequested) => {
                info!(deployment_id = %deployment.deployment_id, "bootstrap phase requested a reboot, suspending this deployment attempt");
                return;
            }
            Ok(HandleOutcome::Completed) => {
                info!(deployment_id = %deployment.deployment_id, "deployment succeeded");
                self.report_job_status(&deployment, JobOutcome::Succeeded).await;
                self.report_fleet_status(&deployment, DeploymentStatus::Succeeded).await;
            }
            Err(err) => {
                warn!(deployment_id = %deployment.deployment_id, error = %err, "deployment failed");
                self.report_job_status(&deployment, JobOutcome::Failed).await;
                self.report_fleet_status(&deployment, DeploymentStatus::Failed).await;
            }
        }

        if let Err(err) = self.deps.checkpoints.clear() {
            warn!(deployment_id = %deployment.deployment_id, error = %err, "failed to clear deployment checkpoint");
        }
    }

    async fn report_job_status(&self, deployment: &Deployment, outcome: JobOutcome) {
        if deployment.deployment_type != DeploymentType::ThingGroup {
            return;
        }
        let Some(job_id) = self.deps.current_job.current_job_id() else { return };
        let version = self.deps.current_job.version();
        if let Err(err) = self.deps.job_status.update_job(&job_id, version, outcome).await {
            warn!(job_id, error = %err, "failed to publish job status");
        }
    }

    async fn report_fleet_status(&self, deployment: &Deployment, status: DeploymentStatus) {
        if let Err(err) = self.deps.fleet_status.report(deployment.deployment_id.as_str(), status).await {
            warn!(deployment_id = %deployment.deployment_id, error = %err, "failed to report fleet status");
        }
    }

    /// The ordered phase sequence of §4.3's `handle_deployment`.
    async fn handle_deployment(
        &self,
        deployment: &Deployment,
        checkpoint: &mut DeploymentStateCheckpoint,
    ) -> CoreResult<HandleOutcome> {
        // Step 1: stage local inputs.
        staging::stage_local_inputs(
            &self.deps.root,
            deployment.recipe_directory_path.as_deref(),
            deployment.artifacts_directory_path.as_deref(),
        )?;

        // Step 2: resolve dependencies.
        let resolver = DependencyResolver::new(
            self.deps.recipes,
            self.deps.config,
            self.deps.group_roots,
            self.deps.dataplane,
            &self.deps.nucleus_version,
        );
        let resolved = resolver.resolve(deployment, &self.deps.thing_name, &self.deps.platform).await?;

        // Step 3: acquire TES credentials.
        let credentials = match self.deps.tes.credentials().await {
            Ok(creds) => Some(creds),
            Err(err) if deployment.deployment_type == DeploymentType::Local => {
                warn!(error = %err, "TES credentials unavailable for a local deployment, continuing without artifact fetch");
                None
            }
            Err(err) => return Err(err),
        };

        // Step 4: per-component fetch/configure/translate.
        let component_store = ComponentStore::new(self.deps.recipes, self.deps.config);
        let mut to_deploy: BTreeMap<String, String> = BTreeMap::new();

        for (name, version) in resolved.iter() {
            if checkpoint.is_completed(name, version) {
                continue;
            }

            let bootstrapped = checkpoint.is_bootstrapped(name, version);
            let running_version = component_store.running_version(name);
            let live = running_version.as_deref() == Some(version);

            if !bootstrapped && !live {
                self.fetch_component(name, version, credentials.as_ref()).await?;
                self.deps.config.write(&format!("services/{name}/version"), serde_json::json!(version))?;
                append_config_arn(self.deps.config, name, &deployment.configuration_arn)?;
            }

            if let Some(request) = deployment.components.get(name) {
                if let Some(update) = &request.configuration_update {
                    config_apply::apply(self.deps.config, name, update)?;
                }
            }

            let identity = ComponentIdentity::new(name, version);
            let recipe_path = recipe_path_for(self.deps.recipes, &identity)?;
            let translated = self.deps.translator.translate(name, &recipe_path, &self.deps.root).await?;
            if translated.declared_component_name != *name {
                return Err(CoreError::invalid(format!(
                    "translator declared component name {:?} does not match requested {name:?}",
                    translated.declared_component_name
                )));
            }

            if live {
                checkpoint.mark_completed(name.to_string(), version.to_string());
            } else {
                to_deploy.insert(name.to_string(), version.to_string());
            }
        }

        // Step 5: bootstrap phase. A reboot request suspends the rest of
        // the pipeline; the caller persists the checkpoint as-is.
        let bootstrap_outcome = self.deps.bootstrap.process(checkpoint, &to_deploy, &self.deps.root).await?;
        if bootstrap_outcome == BootstrapOutcome::RebootRequested {
            return Ok(HandleOutcome::RebootRequested);
        }

        // Step 6: install phase.
        for name in to_deploy.keys() {
            let unit = install_unit(name);
            let unit_path = self.deps.root.join(&unit);
            if !unit_path.exists() {
                continue;
            }
            self.deps.services.teardown_prior(&unit).await;
            self.deps.services.link(&unit_path.to_string_lossy()).await?;
            self.deps.services.start(&unit).await?;
            let state = self.deps.health.wait_for_terminal(&unit, PHASE_WAIT_TIMEOUT).await?;
            if !state.is_success() {
                return Err(CoreError::failure(format!("component {name} install unit entered a broken state")));
            }
        }

        // Step 7: run/startup phase.
        for (name, version) in &to_deploy {
            let unit = run_unit(name);
            let unit_path = self.deps.root.join(&unit);
            if unit_path.exists() {
                self.deps.services.teardown_prior(&unit).await;
                self.deps.services.link(&unit_path.to_string_lossy()).await?;
                self.deps.services.enable(&unit).await?;
            }
            checkpoint.mark_completed(name.clone(), version.clone());
            self.deps.checkpoints.save(checkpoint)?;
        }

        // Step 8: reload and target.
        self.deps.services.daemon_reload().await?;
        self.deps.services.reset_failed().await?;
        self.deps.services.start(&self.deps.target_unit).await?;

        for (name, _version) in resolved.iter() {
            let unit = run_unit(name);
            if !self.deps.root.join(&unit).exists() {
                continue;
            }
            let state = self.deps.health.wait_for_terminal(&unit, PHASE_WAIT_TIMEOUT).await?;
            if !state.is_success() {
                return Err(CoreError::failure(format!("component {name} failed to reach a healthy state")));
            }
        }

        // Step 9: stale cleanup.
        let latest: BTreeMap<String, String> =
            resolved.iter().map(|(name, version)| (name.to_string(), version.to_string())).collect();
        self.deps.stale_cleanup.run(&self.deps.root, &latest).await;

        Ok(HandleOutcome::Completed)
    }

    async fn fetch_component(
        &self,
        name: &str,
        version: &str,
        credentials: Option<&ecd_fetch::AwsCredentials>,
    ) -> CoreResult<()> {
        let identity = ComponentIdentity::new(name, version);
        let recipe = self.deps.recipes.load(&identity)?;
        let Some(manifest) = recipe.select_manifest() else { return Ok(()) };
        let component_arn = self.deps.config.read_string(&format!("services/{name}/arn")).ok().flatten();

        for artifact in &manifest.artifacts {
            self.deps.fetcher.fetch(&identity, component_arn.as_deref(), artifact, credentials).await?;
        }
        Ok(())
    }
}

/// Append-or-replace `arn` into `services.<name>.configArn` (§4.3 step 4),
/// deduplicating by the ARN substring preceding the final `:` and capping
/// the list at 100 entries by dropping the oldest.
fn append_config_arn(config: &dyn ConfigFacade, name: &str, arn: &str) -> CoreResult<()> {
    let key = format!("services/{name}/configArn");
    let mut list: Vec<String> = config.read_typed(&key)?.unwrap_or_default();
    let prefix = ecd_core::arn_without_version(arn);

    match list.iter().position(|existing| ecd_core::arn_without_version(existing) == prefix) {
        Some(pos) => list[pos] = arn.to_string(),
        None => {
            list.push(arn.to_string());
            if list.len() > 100 {
                list.remove(0);
            }
        }
    }
    config.write_typed(&key, &list)?;
    Ok(())
}

/// Locate the on-disk recipe file for `identity`, trying every accepted
/// extension in preference order.
fn recipe_path_for(recipes: &RecipeStore, identity: &ComponentIdentity) -> CoreResult<PathBuf> {
    for ext in RECIPE_EXTENSIONS {
        let path: &Path = &recipes.recipes_dir().join(format!("{}.{ext}", identity.recipe_file_stem()));
        if path.exists() {
            return Ok(path.to_path_buf());
        }
    }
    Err(CoreError::not_found(format!("no recipe file on disk for {identity}")))
}

#[cfg(test)]
#[path = "executor_tests.rs"]
mod tests;
