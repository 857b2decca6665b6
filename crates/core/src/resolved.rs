// SPDX-License-Identifier: MIT
// Copyright (c) 2026 The ecd Authors

//! The output of dependency resolution: one chosen version per component.

use std::collections::BTreeMap;

use crate::version_req::{parse_version, VersionRequirement};
use crate::error::CoreResult;

/// Mapping from component name to the single version chosen for it.
///
/// The resolver's core invariant is that every entry's version satisfies
/// every requirement contributed by any group listing that component;
/// [`Self::satisfies_all`] checks that invariant given the requirements
/// that were in play.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResolvedComponentSet(BTreeMap<String, String>);

impl ResolvedComponentSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: impl Into<String>, version: impl Into<String>) {
        self.0.insert(name.into(), version.into());
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.0.get(name).map(String::as_str)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.0.contains_key(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Verify that, for every (component, requirement) pair supplied, the
    /// resolved version satisfies the requirement.
    pub fn satisfies_all(&self, requirements: &[(&str, &VersionRequirement)]) -> CoreResult<bool> {
        for (name, req) in requirements {
            let Some(version) = self.get(name) else { continue };
            let parsed = parse_version(version)?;
            if !req.matches(&parsed)? {
                return Ok(false);
            }
        }
        Ok(true)
    }
}

#[cfg(test)]
#[path = "resolved_tests.rs"]
mod tests;
