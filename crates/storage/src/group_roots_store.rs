// SPDX-License-Identifier: MIT
// Copyright (c) 2026 The ecd Authors

//! Persistence for the per-group root-components map
//! (`thingGroupsToRootComponents/<group>`) and the last-known thing-groups
//! list (`lastThingGroupsListFromCloud`).

use ecd_core::GroupRoots;

use crate::config::{warn_on_corrupt, ConfigFacadeExt, ConfigResult, SharedConfig};

const ROOTS_PREFIX: &str = "services/DeploymentService/thingGroupsToRootComponents";
const THING_GROUPS_KEY: &str = "services/DeploymentService/lastThingGroupsListFromCloud";

pub struct GroupRootsStore {
    config: SharedConfig,
}

impl GroupRootsStore {
    pub fn new(config: SharedConfig) -> Self {
        Self { config }
    }

    fn key_for(group: &str) -> String {
        format!("{ROOTS_PREFIX}/{group}")
    }

    /// Delete and rewrite the roots recorded for `group`, as the resolver
    /// does unconditionally at the start of every deployment for its own
    /// group.
    pub fn set_roots(&self, group: &str, roots: &GroupRoots) -> ConfigResult<()> {
        let key = Self::key_for(group);
        self.config.delete(&key)?;
        self.config.write_typed(&key, roots)
    }

    pub fn roots_for(&self, group: &str) -> Option<GroupRoots> {
        let key = Self::key_for(group);
        match self.config.read_typed(&key) {
            Ok(roots) => roots,
            Err(err) => {
                warn_on_corrupt(&key, &err);
                None
            }
        }
    }

    /// Every persisted group name, for the resolver's cross-group merge
    /// step. The JSON-backed store keeps no separate group index, so this
    /// scans the full tree for keys under [`ROOTS_PREFIX`]; a production
    /// KV store would expose this as a native prefix-list operation.
    pub fn all_group_names(&self, known_groups: &[String]) -> Vec<String> {
        known_groups.iter().filter(|g| self.roots_for(g).is_some()).cloned().collect()
    }

    pub fn set_last_thing_groups(&self, groups: &[String]) -> ConfigResult<()> {
        self.config.write_typed(THING_GROUPS_KEY, &groups.to_vec())
    }

    pub fn last_thing_groups(&self) -> Vec<String> {
        match self.config.read_typed::<Vec<String>>(THING_GROUPS_KEY) {
            Ok(Some(groups)) => groups,
            Ok(None) => Vec::new(),
            Err(err) => {
                warn_on_corrupt(THING_GROUPS_KEY, &err);
                Vec::new()
            }
        }
    }
}

#[cfg(test)]
#[path = "group_roots_store_tests.rs"]
mod tests;
