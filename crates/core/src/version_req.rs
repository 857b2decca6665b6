// SPDX-License-Identifier: MIT
// Copyright (c) 2026 The ecd Authors

//! Parsing and matching of component version-requirement expressions.
//!
//! Requirement strings arrive over the wire as opaque text (`"==1.0.0"`,
//! `">=2.0.0 <3.0.0"`). The protocol never interprets them beyond string
//! equality, but the local-candidate matcher needs real range semantics, so
//! this module translates the expression syntax into [`semver::VersionReq`].
//!
//! Transitive dependency resolution widens a requirement by concatenating a
//! newly discovered clause onto the existing expression with a space. That
//! concatenation is interpreted as a logical AND of both clauses.

use semver::{Version, VersionReq};
use std::fmt;

use crate::error::{CoreError, CoreResult};

/// A version-requirement expression, kept in its original string form
/// alongside a parsed [`VersionReq`] usable for range matching.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionRequirement(String);

impl VersionRequirement {
    pub fn new(expr: impl Into<String>) -> Self {
        Self(expr.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Widen this requirement with an additional clause, as the resolver
    /// does when a second group contributes a dependency on the same
    /// component: the clauses are ANDed by space-concatenation.
    pub fn and(&self, other: &str) -> Self {
        if self.0.is_empty() {
            return Self(other.to_string());
        }
        Self(format!("{} {}", self.0, other))
    }

    /// Parse into a [`semver::VersionReq`], translating the `==x.y.z` clause
    /// syntax (exact match) into semver's `=x.y.z` syntax and normalizing
    /// whitespace-separated AND clauses into semver's comma-separated form.
    pub fn to_semver_req(&self) -> CoreResult<VersionReq> {
        parse_requirement(&self.0)
    }

    /// Whether `version` satisfies every clause in this requirement.
    pub fn matches(&self, version: &Version) -> CoreResult<bool> {
        Ok(self.to_semver_req()?.matches(version))
    }
}

impl fmt::Display for VersionRequirement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for VersionRequirement {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for VersionRequirement {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// Translate a requirement expression into a [`semver::VersionReq`].
///
/// Clauses are split on whitespace (the wire AND-concatenation convention),
/// each `==` is rewritten to semver's `=`, and the clauses are rejoined with
/// commas, which `semver::VersionReq` parses as a conjunction.
fn parse_requirement(expr: &str) -> CoreResult<VersionReq> {
    let trimmed = expr.trim();
    if trimmed.is_empty() {
        return Err(CoreError::invalid("empty version requirement"));
    }

    let normalized = normalize_clauses(trimmed);
    VersionReq::parse(&normalized)
        .map_err(|e| CoreError::parse(format!("invalid version requirement {expr:?}: {e}")))
}

fn normalize_clauses(expr: &str) -> String {
    expr.split_whitespace()
        .map(normalize_clause)
        .collect::<Vec<_>>()
        .join(",")
}

fn normalize_clause(clause: &str) -> String {
    if let Some(rest) = clause.strip_prefix("==") {
        format!("={rest}")
    } else {
        clause.to_string()
    }
}

/// Parse a bare version string (a recipe or config's exact version) into a
/// [`semver::Version`].
pub fn parse_version(s: &str) -> CoreResult<Version> {
    Version::parse(s).map_err(|e| CoreError::parse(format!("invalid version {s:?}: {e}")))
}

#[cfg(test)]
#[path = "version_req_tests.rs"]
mod tests;
