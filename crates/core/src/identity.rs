// SPDX-License-Identifier: MIT
// Copyright (c) 2026 The ecd Authors

//! Component identity: the (name, version) pair recipes and artifacts are
//! keyed by.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Recipe file extensions accepted on disk, in the order a directory scan
/// should prefer them when more than one is present for the same identity.
pub const RECIPE_EXTENSIONS: &[&str] = &["yaml", "yml", "json"];

/// A component name paired with a concrete version.
///
/// Recipe files on disk are named `<name>-<version>.<ext>`; [`Self::recipe_file_stem`]
/// produces the `<name>-<version>` portion shared by all three extensions.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ComponentIdentity {
    pub name: String,
    pub version: String,
}

impl ComponentIdentity {
    pub fn new(name: impl Into<String>, version: impl Into<String>) -> Self {
        Self { name: name.into(), version: version.into() }
    }

    pub fn recipe_file_stem(&self) -> String {
        format!("{}-{}", self.name, self.version)
    }

    /// Parse a recipe filename's stem (without extension) into its component
    /// identity, splitting at the first `-` as the stale-cleanup scan does.
    pub fn from_recipe_stem(stem: &str) -> Option<Self> {
        let (name, version) = stem.split_once('-')?;
        if name.is_empty() || version.is_empty() {
            return None;
        }
        Some(Self::new(name, version))
    }

    /// Parse a full recipe filename (`foo-1.0.0.yaml`) into its identity,
    /// validating the extension is one of [`RECIPE_EXTENSIONS`].
    pub fn from_recipe_filename(filename: &str) -> Option<Self> {
        let (stem, ext) = filename.rsplit_once('.')?;
        if !RECIPE_EXTENSIONS.contains(&ext) {
            return None;
        }
        Self::from_recipe_stem(stem)
    }
}

impl fmt::Display for ComponentIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}", self.name, self.version)
    }
}

#[cfg(test)]
#[path = "identity_tests.rs"]
mod tests;
