// SPDX-License-Identifier: MIT
// Copyright (c) 2026 The ecd Authors

//! Bridges the local IPC server's [`DeploymentSubmitter`]/[`StatusProvider`]
//! traits (§6) onto the real [`DeploymentQueue`], [`CurrentJobCell`], and
//! on-disk component store, so `create_local_deployment`/status queries
//! observe the same state the executor and Jobs listener act on.

use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::Arc;

use ecd_adapters::ipc_server::{DeploymentSubmitter, StatusProvider};
use ecd_core::{ComponentRequest, CoreResult, CurrentJobCell, DeploymentQueue, DeploymentType};
use ecd_resolver::{ComponentStore, RecipeStore};
use ecd_storage::SharedConfig;
use ecd_wire::{ComponentSummary, CurrentDeploymentSummary};
use serde_json::json;

pub struct QueueDeploymentSubmitter {
    pub queue: Arc<DeploymentQueue>,
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

pub struct QueueStatusProvider {
    pub queue: Arc<DeploymentQueue>,
    pub current_job: Arc<CurrentJobCell>,
    pub recipes: Arc<RecipeStore>,
    pub config: SharedConfig,
}

impl StatusProvider for QueueStatusProvider {
    fn deployment_status(&self) -> (Option<CurrentDeploymentSummary>, usize) {
        let current = self.queue.current_in_progress();
        let queue_depth = self.queue.len().saturating_sub(current.is_some() as usize);

        let summary = current.map(|deployment| {
            let (jobs_id, jobs_version) = if deployment.deployment_type == DeploymentType::ThingGroup {
                (self.current_job.current_job_id(), Some(self.current_job.version()))
            } else {
                (None, None)
            };
            CurrentDeploymentSummary {
                deployment_id: deployment.deployment_id.as_str().to_string(),
                thing_group: deployment.thing_group,
                jobs_id,
                jobs_version,
            }
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

#[cfg(test)]
#[path = "status_tests.rs"]
mod tests;
