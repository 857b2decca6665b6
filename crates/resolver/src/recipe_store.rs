// SPDX-License-Identifier: MIT
// Copyright (c) 2026 The ecd Authors

//! Locates and parses per-component recipe files under
//! `<root>/packages/recipes/` by (name, version).

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use ecd_core::{ComponentIdentity, ComponentRecipe, CoreError, CoreResult, RECIPE_EXTENSIONS};
use tracing::warn;

pub struct RecipeStore {
    recipes_dir: PathBuf,
}

impl RecipeStore {
    pub fn new(root: impl AsRef<Path>) -> Self {
        Self { recipes_dir: root.as_ref().join("packages").join("recipes") }
    }

    pub fn recipes_dir(&self) -> &Path {
        &self.recipes_dir
    }

    /// Every (name, version) pair with a recipe file on disk, in directory
    /// enumeration order — callers that need "last enumerated wins"
    /// tie-breaking rely on this order being stable within a single scan.
    pub fn scan(&self) -> CoreResult<Vec<ComponentIdentity>> {
        let entries = match fs::read_dir(&self.recipes_dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(CoreError::failure(format!("reading {}: {e}", self.recipes_dir.display()))),
        };

        let mut identities = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| CoreError::failure(e.to_string()))?;
            let Some(filename) = entry.file_name().to_str().map(str::to_string) else { continue };
            match ComponentIdentity::from_recipe_filename(&filename) {
                Some(id) => identities.push(id),
                None => warn!(filename, "skipping unrecognized file in recipes directory"),
            }
        }
        Ok(identities)
    }

    /// Every version on disk for `name`, in scan order.
    pub fn versions_of(&self, name: &str) -> CoreResult<Vec<String>> {
        Ok(self.scan()?.into_iter().filter(|id| id.name == name).map(|id| id.version).collect())
    }

    /// Load and parse the recipe for an exact (name, version), trying each
    /// accepted extension in turn.
    pub fn load(&self, identity: &ComponentIdentity) -> CoreResult<ComponentRecipe> {
        let stem = identity.recipe_file_stem();
        for ext in RECIPE_EXTENSIONS {
            let path = self.recipes_dir.join(format!("{stem}.{ext}"));
            match fs::read_to_string(&path) {
                Ok(contents) => return ComponentRecipe::parse(&contents, ext),
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => continue,
                Err(e) => return Err(CoreError::failure(format!("reading {}: {e}", path.display()))),
            }
        }
        Err(CoreError::not_found(format!("no recipe for {identity}")))
    }

    /// Write a recipe fetched from the cloud dataplane to
    /// `<name>-<version>.json` (the resolver always writes cloud-resolved
    /// recipes as JSON regardless of the recipe's own notation).
    pub fn save_json(&self, identity: &ComponentIdentity, contents: &[u8]) -> CoreResult<()> {
        fs::create_dir_all(&self.recipes_dir)
            .map_err(|e| CoreError::failure(format!("creating {}: {e}", self.recipes_dir.display())))?;
        let path = self.recipes_dir.join(format!("{}.json", identity.recipe_file_stem()));
        fs::write(&path, contents).map_err(|e| CoreError::failure(format!("writing {}: {e}", path.display())))
    }

    pub fn delete(&self, identity: &ComponentIdentity) -> CoreResult<()> {
        for ext in RECIPE_EXTENSIONS {
            let path = self.recipes_dir.join(format!("{}.{ext}", identity.recipe_file_stem()));
            match fs::remove_file(&path) {
                Ok(()) => {}
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
                Err(e) => warn!(path = %path.display(), error = %e, "failed to delete stale recipe"),
            }
        }
        Ok(())
    }

    /// Group every on-disk identity by component name, preserving scan
    /// order within each group.
    pub fn group_by_name(&self) -> CoreResult<BTreeMap<String, Vec<String>>> {
        let mut grouped: BTreeMap<String, Vec<String>> = BTreeMap::new();
        for id in self.scan()? {
            grouped.entry(id.name).or_default().push(id.version);
        }
        Ok(grouped)
    }
}

#[cfg(test)]
#[path = "recipe_store_tests.rs"]
mod tests;
