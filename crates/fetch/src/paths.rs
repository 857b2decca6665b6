// SPDX-License-Identifier: MIT
// Copyright (c) 2026 The ecd Authors

//! On-disk staging layout for downloaded and unarchived artifacts (§6).

use std::path::{Path, PathBuf};

use ecd_core::ComponentIdentity;

/// `<root>/packages/artifacts/<name>/<version>/`
pub fn artifact_dir(root: &Path, identity: &ComponentIdentity) -> PathBuf {
    root.join("packages").join("artifacts").join(&identity.name).join(&identity.version)
}

/// `<root>/packages/artifacts/<name>/<version>/<file>`
pub fn artifact_path(root: &Path, identity: &ComponentIdentity, file: &str) -> PathBuf {
    artifact_dir(root, identity).join(file)
}

/// `<root>/packages/artifacts-unarchived/<name>/<version>/<file-sans-ext>/`
pub fn unarchived_dir(root: &Path, identity: &ComponentIdentity, file: &str) -> PathBuf {
    let stem = Path::new(file).file_stem().and_then(|s| s.to_str()).unwrap_or(file);
    root.join("packages")
        .join("artifacts-unarchived")
        .join(&identity.name)
        .join(&identity.version)
        .join(stem)
}

#[cfg(test)]
#[path = "paths_tests.rs"]
mod tests;
