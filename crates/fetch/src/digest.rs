// SPDX-License-Identifier: MIT
// Copyright (c) 2026 The ecd Authors

//! SHA-256 digest verification for downloaded artifacts. Per §4.5, SHA-256
//! is the only supported algorithm; any other `Algorithm` value is
//! `UNSUPPORTED`, and an absent digest is a warning rather than a failure.

use ecd_core::{CoreError, CoreResult};
use sha2::{Digest as _, Sha256};
use std::path::Path;

/// Verify `path`'s contents against a base64-encoded SHA-256 digest.
///
/// `algorithm`, if present, must equal `"SHA256"` (case-insensitively);
/// anything else is unsupported.
pub fn verify(path: &Path, digest_base64: &str, algorithm: Option<&str>) -> CoreResult<()> {
    if let Some(algo) = algorithm {
        if !algo.eq_ignore_ascii_case("SHA256") {
            return Err(CoreError::unsupported(format!("digest algorithm {algo:?}")));
        }
    }

    let expected = base64::Engine::decode(&base64::engine::general_purpose::STANDARD, digest_base64)
        .map_err(|e| CoreError::parse(format!("invalid base64 digest: {e}")))?;

    let bytes = std::fs::read(path).map_err(|e| CoreError::failure(format!("reading {}: {e}", path.display())))?;
    let actual = Sha256::digest(&bytes);

    if actual.as_slice() != expected.as_slice() {
        return Err(CoreError::invalid(format!(
            "digest mismatch for {}: expected {}, got {}",
            path.display(),
            digest_base64,
            base64::Engine::encode(&base64::engine::general_purpose::STANDARD, actual)
        )));
    }
    Ok(())
}

#[cfg(test)]
#[path = "digest_tests.rs"]
mod tests;
