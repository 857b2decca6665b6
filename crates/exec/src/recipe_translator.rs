// SPDX-License-Identifier: MIT
// Copyright (c) 2026 The ecd Authors

//! The external recipe-to-unit translator (§1): the core does not
//! interpret recipe lifecycle scripts itself; it delegates translation of
//! a parsed recipe into service-manager unit files to this subprocess
//! contract.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use ecd_core::CoreResult;

/// The unit files a translation run produced, named per §6's
/// `<prefix>.<name>{,.install,.bootstrap}.service` convention.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TranslatedUnits {
    /// The component name declared inside the generated unit(s); the
    /// executor verifies this matches the name it requested translation
    /// for before trusting the result.
    pub declared_component_name: String,
    pub bootstrap_service: Option<PathBuf>,
    pub install_service: Option<PathBuf>,
    pub run_service: Option<PathBuf>,
}

impl TranslatedUnits {
    pub fn has_bootstrap(&self) -> bool {
        self.bootstrap_service.is_some()
    }

    pub fn has_install(&self) -> bool {
        self.install_service.is_some()
    }
}

/// Translates a component's recipe (plus its staged configuration) into
/// service-unit files written under the staging directory.
#[async_trait]
pub trait RecipeTranslator: Send + Sync {
    async fn translate(
        &self,
        component_name: &str,
        recipe_path: &Path,
        staging_dir: &Path,
    ) -> CoreResult<TranslatedUnits>;
}
