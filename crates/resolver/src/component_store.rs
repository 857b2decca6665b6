// SPDX-License-Identifier: MIT
// Copyright (c) 2026 The ecd Authors

//! Enumerates on-disk components and versions, and matches a
//! version-requirement against the currently-running version or any
//! satisfying on-disk recipe.

use ecd_core::{parse_version, CoreResult, VersionRequirement};
use ecd_storage::ConfigFacade;

use crate::recipe_store::RecipeStore;

pub struct ComponentStore<'a> {
    recipes: &'a RecipeStore,
    config: &'a dyn ConfigFacade,
}

impl<'a> ComponentStore<'a> {
    pub fn new(recipes: &'a RecipeStore, config: &'a dyn ConfigFacade) -> Self {
        Self { recipes, config }
    }

    pub fn running_version(&self, name: &str) -> Option<String> {
        self.config.read_string(&format!("services/{name}/version")).ok().flatten()
    }

    /// Try the local candidate: the currently-running version if it
    /// satisfies `requirement`, else the last on-disk version (in scan
    /// order) that satisfies it.
    pub fn resolve_local(&self, name: &str, requirement: &VersionRequirement) -> CoreResult<Option<String>> {
        if let Some(running) = self.running_version(name) {
            if requirement.matches(&parse_version(&running)?)? {
                return Ok(Some(running));
            }
        }

        let mut best = None;
        for version in self.recipes.versions_of(name)? {
            if requirement.matches(&parse_version(&version)?)? {
                best = Some(version);
            }
        }
        Ok(best)
    }
}

#[cfg(test)]
#[path = "component_store_tests.rs"]
mod tests;
