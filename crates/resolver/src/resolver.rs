// SPDX-License-Identifier: MIT
// Copyright (c) 2026 The ecd Authors

//! The dependency resolver: computes, across the union of groups the
//! device belongs to plus local deployments, the single version of each
//! component that satisfies every requirement.

use std::collections::{BTreeMap, VecDeque};

use base64::Engine;
use ecd_core::{
    CoreError, CoreResult, Deployment, DeploymentType, GroupRoots, ResolvedComponentSet,
    ThingGroupsToRootComponents, VersionRequirement, LOCAL_DEPLOYMENTS_GROUP,
};
use ecd_storage::{ConfigFacade, GroupRootsStore};
use tracing::{info, warn};

use crate::component_store::ComponentStore;
use crate::dataplane::{CloudDataplane, PlatformAttributes};
use crate::recipe_store::RecipeStore;

/// `services/aws.greengrass.NucleusLite` — the nucleus's own component
/// name; the resolver refuses to deploy any version but the one it is
/// currently running.
pub const NUCLEUS_COMPONENT_NAME: &str = "aws.greengrass.NucleusLite";

/// Never expanded as a transitive dependency.
pub const TOKEN_EXCHANGE_SERVICE_NAME: &str = "aws.greengrass.TokenExchangeService";

pub struct DependencyResolver<'a> {
    recipes: &'a RecipeStore,
    config: &'a dyn ConfigFacade,
    group_roots: &'a GroupRootsStore,
    dataplane: &'a dyn CloudDataplane,
    nucleus_version: &'a str,
}

impl<'a> DependencyResolver<'a> {
    pub fn new(
        recipes: &'a RecipeStore,
        config: &'a dyn ConfigFacade,
        group_roots: &'a GroupRootsStore,
        dataplane: &'a dyn CloudDataplane,
        nucleus_version: &'a str,
    ) -> Self {
        Self { recipes, config, group_roots, dataplane, nucleus_version }
    }

    pub async fn resolve(
        &self,
        deployment: &Deployment,
        thing_name: &str,
        platform: &PlatformAttributes,
    ) -> CoreResult<ResolvedComponentSet> {
        let mut to_resolve: BTreeMap<String, VersionRequirement> = BTreeMap::new();

        // Step 1: extract roots, enforcing the nucleus version pin.
        for (name, request) in &deployment.components {
            if name == NUCLEUS_COMPONENT_NAME && request.version != self.nucleus_version {
                return Err(CoreError::invalid(format!(
                    "deployment targets nucleus version {}, running {}",
                    request.version, self.nucleus_version
                )));
            }
            to_resolve.insert(name.clone(), VersionRequirement::new(request.version.as_str()));
        }

        // Step 2: rewrite this group's persisted roots.
        let roots = GroupRoots::from_requirements(
            to_resolve.iter().map(|(name, req)| (name.clone(), req.as_str().to_string())),
        );
        self.group_roots.set_roots(&deployment.thing_group, &roots)?;

        // Step 3: refresh the thing-groups list, falling back to the last
        // persisted snapshot only for local deployments.
        let thing_groups = match self.dataplane.get_thing_groups(thing_name).await {
            Ok(groups) => {
                self.group_roots.set_last_thing_groups(&groups)?;
                groups
            }
            Err(err) if deployment.deployment_type == DeploymentType::Local => {
                warn!(error = %err, "thing-groups refresh failed for a local deployment, using last snapshot");
                self.group_roots.last_thing_groups()
            }
            Err(err) => return Err(err),
        };

        // Step 4: merge in every other group's persisted roots.
        for group in &thing_groups {
            if group == &deployment.thing_group {
                continue;
            }
            if let Some(other_roots) = self.group_roots.roots_for(group) {
                ThingGroupsToRootComponents::merge_into(&mut to_resolve, &other_roots)?;
            }
        }

        // Step 5: also merge local-deployment roots unless this deployment
        // itself is one.
        if deployment.deployment_type != DeploymentType::Local {
            if let Some(local_roots) = self.group_roots.roots_for(LOCAL_DEPLOYMENTS_GROUP) {
                ThingGroupsToRootComponents::merge_into(&mut to_resolve, &local_roots)?;
            }
        }

        // Steps 6-8: resolve and expand until the queue is empty.
        let mut queue: VecDeque<String> = to_resolve.keys().cloned().collect();
        let mut resolved = ResolvedComponentSet::new();

        while let Some(name) = queue.pop_front() {
            if resolved.contains(&name) {
                continue;
            }
            let requirement = to_resolve
                .get(&name)
                .cloned()
                .unwrap_or_else(|| VersionRequirement::new(""));

            let version = self.resolve_one(&name, &requirement, platform).await?;
            resolved.insert(name.clone(), version.clone());

            let recipe = self
                .recipes
                .load(&ecd_core::ComponentIdentity::new(&name, &version))
                .ok();

            if let Some(recipe) = recipe {
                for (dep_name, dep_props) in &recipe.component_dependencies {
                    if dep_name == NUCLEUS_COMPONENT_NAME || dep_name == TOKEN_EXCHANGE_SERVICE_NAME {
                        continue;
                    }
                    let dep_req = VersionRequirement::new(dep_props.version_requirement.as_str());

                    if let Some(existing_version) = resolved.get(dep_name) {
                        let parsed = ecd_core::parse_version(existing_version)?;
                        if !dep_req.matches(&parsed)? {
                            return Err(CoreError::invalid(format!(
                                "{dep_name}@{existing_version} no longer satisfies {}",
                                dep_req.as_str()
                            )));
                        }
                        continue;
                    }

                    match to_resolve.get(dep_name) {
                        Some(existing_req) => {
                            let widened = existing_req.and(dep_req.as_str());
                            to_resolve.insert(dep_name.clone(), widened);
                        }
                        None => {
                            to_resolve.insert(dep_name.clone(), dep_req);
                            queue.push_back(dep_name.clone());
                        }
                    }
                }
            }
        }

        info!(count = resolved.len(), deployment_id = %deployment.deployment_id, "resolved component set");
        Ok(resolved)
    }

    async fn resolve_one(
        &self,
        name: &str,
        requirement: &VersionRequirement,
        platform: &PlatformAttributes,
    ) -> CoreResult<String> {
        let component_store = ComponentStore::new(self.recipes, self.config);
        if let Some(version) = component_store.resolve_local(name, requirement)? {
            return Ok(version);
        }

        let candidate =
            self.dataplane.resolve_component_candidates(name, requirement.as_str(), platform).await?;
        let identity = ecd_core::ComponentIdentity::new(name, &candidate.version);
        let recipe_bytes = base64::engine::general_purpose::STANDARD
            .decode(&candidate.recipe_base64)
            .map_err(|e| CoreError::parse(format!("invalid base64 recipe for {name}: {e}")))?;
        self.recipes.save_json(&identity, &recipe_bytes)?;
        self.config.write(&format!("services/{name}/arn"), serde_json::Value::String(candidate.arn))?;
        Ok(candidate.version)
    }
}

#[cfg(test)]
#[path = "resolver_tests.rs"]
mod tests;
