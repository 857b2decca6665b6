// SPDX-License-Identifier: MIT
// Copyright (c) 2026 The ecd Authors

//! Core error kinds shared across the deployment pipeline.

use thiserror::Error;

/// Abstract error kinds surfaced by the core subsystems.
///
/// Each variant corresponds to one of the error kinds in the daemon's
/// error-handling design: malformed input aborts the current operation,
/// `Busy` is retried by the caller with backoff, `Remote` carries enough
/// detail for version-conflict rebase-and-retry, and so on.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("invalid input: {0}")]
    Invalid(String),

    #[error("not found: {0}")]
    NotFound(String),

    #[error("queue is busy")]
    Busy,

    #[error("scratch storage exhausted: {0}")]
    NoMem(String),

    #[error("remote error: {0}")]
    Remote(String),

    #[error("operation failed: {0}")]
    Failure(String),

    #[error("unsupported: {0}")]
    Unsupported(String),

    #[error("parse error: {0}")]
    Parse(String),

    #[error("value out of range: {0}")]
    Range(String),
}

impl CoreError {
    pub fn invalid(msg: impl Into<String>) -> Self {
        Self::Invalid(msg.into())
    }

    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    pub fn failure(msg: impl Into<String>) -> Self {
        Self::Failure(msg.into())
    }

    pub fn unsupported(msg: impl Into<String>) -> Self {
        Self::Unsupported(msg.into())
    }

    pub fn parse(msg: impl Into<String>) -> Self {
        Self::Parse(msg.into())
    }

    /// Whether this error represents a version conflict that callers in the
    /// Jobs-update rejection loop should rebase against and retry, rather
    /// than treat as fatal.
    pub fn is_version_conflict(&self) -> bool {
        matches!(self, Self::Remote(_))
    }
}

pub type CoreResult<T> = Result<T, CoreError>;

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
