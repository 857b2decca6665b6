// SPDX-License-Identifier: MIT
// Copyright (c) 2026 The ecd Authors

//! Stage-local-inputs (§4.3 step 1): for local deployments that carry
//! staging directories, copy their contents into the on-disk recipe/
//! artifact trees, merging source into destination and preserving
//! relative paths.

use std::path::Path;

use ecd_core::{CoreError, CoreResult};
use tracing::debug;

/// Recursively copy the contents of `source` into `dest`, creating `dest`
/// if absent and merging (never clearing) whatever `dest` already
/// contains.
pub fn copy_merge(source: &Path, dest: &Path) -> CoreResult<()> {
    std::fs::create_dir_all(dest).map_err(|e| CoreError::failure(format!("creating {}: {e}", dest.display())))?;

    let entries = std::fs::read_dir(source)
        .map_err(|e| CoreError::failure(format!("reading {}: {e}", source.display())))?;

    for entry in entries {
        let entry = entry.map_err(|e| CoreError::failure(e.to_string()))?;
        let src_path = entry.path();
        let dest_path = dest.join(entry.file_name());
        let file_type = entry.file_type().map_err(|e| CoreError::failure(e.to_string()))?;

        if file_type.is_dir() {
            copy_merge(&src_path, &dest_path)?;
        } else {
            debug!(from = %src_path.display(), to = %dest_path.display(), "staging local input");
            std::fs::copy(&src_path, &dest_path)
                .map_err(|e| CoreError::failure(format!("copying {} to {}: {e}", src_path.display(), dest_path.display())))?;
        }
    }
    Ok(())
}

/// Stage a local deployment's optional recipe/artifact directories into
/// `<root>/packages/{recipes,artifacts}/`.
pub fn stage_local_inputs(
    root: &Path,
    recipe_directory_path: Option<&str>,
    artifacts_directory_path: Option<&str>,
) -> CoreResult<()> {
    if let Some(path) = recipe_directory_path {
        copy_merge(Path::new(path), &root.join("packages").join("recipes"))?;
    }
    if let Some(path) = artifacts_directory_path {
        copy_merge(Path::new(path), &root.join("packages").join("artifacts"))?;
    }
    Ok(())
}

#[cfg(test)]
#[path = "staging_tests.rs"]
mod tests;
