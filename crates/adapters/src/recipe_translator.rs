// SPDX-License-Identifier: MIT
// Copyright (c) 2026 The ecd Authors

//! The external recipe-to-unit translator (§5 redesign note): invoked as a
//! plain subprocess rather than `fork()`/`execvp()`. The only coupling is
//! its output contract — a set of unit files written into the staging
//! directory, named per the `<prefix>.<name>{,.install,.bootstrap}.service`
//! convention.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use ecd_core::{CoreError, CoreResult};
use ecd_exec::{units, RecipeTranslator, TranslatedUnits};
use tokio::process::Command;
use tracing::debug;

const DEFAULT_BINARY: &str = "ggl-recipe-to-unit";

pub struct SubprocessRecipeTranslator {
    binary: String,
}

impl SubprocessRecipeTranslator {
    pub fn new() -> Self {
        Self { binary: DEFAULT_BINARY.to_string() }
    }

    pub fn with_binary(binary: impl Into<String>) -> Self {
        Self { binary: binary.into() }
    }
}

impl Default for SubprocessRecipeTranslator {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl RecipeTranslator for SubprocessRecipeTranslator {
    async fn translate(
        &self,
        component_name: &str,
        recipe_path: &Path,
        staging_dir: &Path,
    ) -> CoreResult<TranslatedUnits> {
        debug!(%component_name, recipe = %recipe_path.display(), "translating recipe to unit files");
        let status = Command::new(&self.binary)
            .arg("--component-name")
            .arg(component_name)
            .arg("--recipe")
            .arg(recipe_path)
            .arg("--out-dir")
            .arg(staging_dir)
            .status()
            .await
            .map_err(|e| CoreError::failure(format!("spawning {}: {e}", self.binary)))?;
        if !status.success() {
            return Err(CoreError::failure(format!("{} exited with {status} for {component_name}", self.binary)));
        }

        let declared_component_name =
            read_declared_name(staging_dir, component_name).unwrap_or_else(|| component_name.to_string());
        if declared_component_name != component_name {
            return Err(CoreError::failure(format!(
                "translator produced units for {declared_component_name} but {component_name} was requested"
            )));
        }

        let run_service = present(staging_dir, &units::run_unit(component_name));
        let install_service = present(staging_dir, &units::install_unit(component_name));
        let bootstrap_service = present(staging_dir, &units::bootstrap_unit(component_name));
        if run_service.is_none() && install_service.is_none() && bootstrap_service.is_none() {
            return Err(CoreError::failure(format!("translator produced no unit files for {component_name}")));
        }

        Ok(TranslatedUnits { declared_component_name, bootstrap_service, install_service, run_service })
    }
}

fn present(staging_dir: &Path, file_name: &str) -> Option<PathBuf> {
    let path = staging_dir.join(file_name);
    path.exists().then_some(path)
}

/// The translator writes each unit with a `# component: <name>` marker
/// line the executor cross-checks against the name it requested
/// translation for, guarding against a mismatched or stale output tree.
fn read_declared_name(staging_dir: &Path, component_name: &str) -> Option<String> {
    let run_unit_path = staging_dir.join(units::run_unit(component_name));
    let contents = std::fs::read_to_string(run_unit_path).ok()?;
    contents.lines().find_map(|line| line.strip_prefix("# component: ")).map(|name| name.trim().to_string())
}

#[cfg(test)]
#[path = "recipe_translator_tests.rs"]
mod tests;
