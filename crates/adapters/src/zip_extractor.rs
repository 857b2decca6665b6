// SPDX-License-Identifier: MIT
// Copyright (c) 2026 The ecd Authors

//! The ZIP extractor (§1, §4.5): unpacks a downloaded archive into the
//! parallel `packages/artifacts-unarchived/...` tree, implementing
//! [`ZipExtractor`].

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use ecd_core::{CoreError, CoreResult};
use ecd_fetch::ZipExtractor;

pub struct ZipFileExtractor;

impl Default for ZipFileExtractor {
    fn default() -> Self {
        Self
    }
}

impl ZipExtractor for ZipFileExtractor {
    fn extract(&self, zip_path: &Path, dest_dir: &Path) -> CoreResult<()> {
        let file = File::open(zip_path).map_err(|e| CoreError::failure(format!("opening {}: {e}", zip_path.display())))?;
        let mut archive =
            zip::ZipArchive::new(BufReader::new(file)).map_err(|e| CoreError::failure(format!("reading zip {}: {e}", zip_path.display())))?;

        for i in 0..archive.len() {
            let mut entry = archive
                .by_index(i)
                .map_err(|e| CoreError::failure(format!("reading zip entry {i} of {}: {e}", zip_path.display())))?;
            let Some(relative_path) = entry.enclosed_name() else {
                return Err(CoreError::failure(format!("zip entry {i} has an unsafe path, refusing to extract")));
            };
            let out_path = dest_dir.join(relative_path);

            if entry.is_dir() {
                std::fs::create_dir_all(&out_path)
                    .map_err(|e| CoreError::failure(format!("creating {}: {e}", out_path.display())))?;
                continue;
            }
            if let Some(parent) = out_path.parent() {
                std::fs::create_dir_all(parent).map_err(|e| CoreError::failure(format!("creating {}: {e}", parent.display())))?;
            }
            let mut out_file = std::fs::OpenOptions::new()
                .create(true)
                .write(true)
                .truncate(true)
                .open(&out_path)
                .map_err(|e| CoreError::failure(format!("creating {}: {e}", out_path.display())))?;

            let mut buf = Vec::new();
            entry
                .read_to_end(&mut buf)
                .map_err(|e| CoreError::failure(format!("reading zip entry {}: {e}", out_path.display())))?;
            std::io::Write::write_all(&mut out_file, &buf)
                .map_err(|e| CoreError::failure(format!("writing {}: {e}", out_path.display())))?;

            #[cfg(unix)]
            {
                use std::os::unix::fs::PermissionsExt;
                let mode = entry.unix_mode().unwrap_or(0o755);
                let _ = std::fs::set_permissions(&out_path, std::fs::Permissions::from_mode(mode));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "zip_extractor_tests.rs"]
mod tests;
