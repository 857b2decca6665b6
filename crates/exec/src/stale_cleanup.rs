// SPDX-License-Identifier: MIT
// Copyright (c) 2026 The ecd Authors

//! Stale cleanup (§4.8): after a deployment succeeds, any on-disk recipe
//! whose component/version does not appear in the current target set is
//! removed. A recipe whose component name is still targeted, just at a
//! different version, loses only its artifact directory and recipe file
//! ("version-stale"); a recipe whose component name is gone entirely also
//! loses its service unit and the translator's side files
//! ("component-stale").

use std::collections::BTreeMap;
use std::path::Path;

use ecd_storage::ConfigFacade;
use tracing::{info, warn};

use crate::service_manager::ServiceManager;
use crate::units::{all_unit_files, bootstrap_unit, install_unit, run_unit};

pub struct StaleCleanup<'a> {
    services: &'a dyn ServiceManager,
    config: &'a dyn ConfigFacade,
}

impl<'a> StaleCleanup<'a> {
    pub fn new(services: &'a dyn ServiceManager, config: &'a dyn ConfigFacade) -> Self {
        Self { services, config }
    }

    /// Reconcile `<root>/packages/recipes` against `latest`, the name to
    /// version map of every component in the current target set. Deletion
    /// failures are logged but never fail the deployment.
    pub async fn run(&self, root: &Path, latest: &BTreeMap<String, String>) {
        let recipes_dir = root.join("packages").join("recipes");
        let entries = match std::fs::read_dir(&recipes_dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return,
            Err(e) => {
                warn!(dir = %recipes_dir.display(), error = %e, "failed to scan recipes directory for stale cleanup");
                return;
            }
        };

        for entry in entries {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    warn!(error = %e, "failed to read recipes directory entry");
                    continue;
                }
            };
            let file_name = entry.file_name().to_string_lossy().into_owned();

            let Some((name, version)) = parse_recipe_filename(&file_name) else {
                warn!(file = %file_name, "recipe file name formatted incorrectly, skipping");
                continue;
            };

            match latest.get(&name) {
                Some(kept_version) if *kept_version == version => continue,
                Some(_) => {
                    info!(component = %name, version = %version, "removing version-stale component");
                    log_err(delete_artifact(root, &name, &version));
                    log_err(delete_recipe(root, &file_name));
                }
                None => {
                    info!(component = %name, version = %version, "removing component-stale component");
                    self.services.teardown_prior(&run_unit(&name)).await;
                    self.services.teardown_prior(&install_unit(&name)).await;
                    self.services.teardown_prior(&bootstrap_unit(&name)).await;
                    if let Err(e) = self.config.delete_prefix(&format!("services/{name}")) {
                        warn!(component = %name, error = %e, "failed to remove component config subtree");
                    }
                    log_err(delete_artifact(root, &name, &version));
                    log_err(delete_recipe(root, &file_name));
                    log_err(delete_unit_files(root, &name));
                }
            }
        }
    }
}

fn log_err(result: std::io::Result<()>) {
    if let Err(e) = result {
        warn!(error = %e, "stale cleanup deletion failed");
    }
}

/// Recipe file names follow `<component-name>-<version>.<ext>`; the
/// component name is everything before the first `-`, the version is
/// everything between that and the final `.`.
fn parse_recipe_filename(file_name: &str) -> Option<(String, String)> {
    let dash = file_name.find('-')?;
    let name = &file_name[..dash];
    let rest = &file_name[dash + 1..];
    let dot = rest.rfind('.')?;
    if name.is_empty() || dot == 0 {
        return None;
    }
    Some((name.to_string(), rest[..dot].to_string()))
}

fn delete_artifact(root: &Path, name: &str, version: &str) -> std::io::Result<()> {
    let dir = root.join("packages").join("artifacts").join(name).join(version);
    ignore_not_found(std::fs::remove_dir_all(&dir))
}

fn delete_recipe(root: &Path, file_name: &str) -> std::io::Result<()> {
    let path = root.join("packages").join("recipes").join(file_name);
    ignore_not_found(std::fs::remove_file(&path))
}

fn delete_unit_files(root: &Path, name: &str) -> std::io::Result<()> {
    for file in all_unit_files(name) {
        let path = root.join(&file);
        ignore_not_found(std::fs::remove_file(&path))?;
    }
    Ok(())
}

fn ignore_not_found(result: std::io::Result<()>) -> std::io::Result<()> {
    match result {
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
        other => other,
    }
}

#[cfg(test)]
#[path = "stale_cleanup_tests.rs"]
mod tests;
