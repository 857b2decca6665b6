// SPDX-License-Identifier: MIT
// Copyright (c) 2026 The ecd Authors

//! The persisted `thing_group → {component → version-requirement}` map that
//! the resolver rewrites for the deploying group and merges in read-only
//! for every other group the device belongs to.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::deployment::LOCAL_DEPLOYMENTS_GROUP;
use crate::error::{CoreError, CoreResult};
use crate::version_req::VersionRequirement;

/// Root components and their version requirements contributed by the most
/// recent deployment targeting a single thing group.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupRoots(BTreeMap<String, String>);

impl GroupRoots {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_requirements(entries: impl IntoIterator<Item = (String, String)>) -> Self {
        Self(entries.into_iter().collect())
    }

    pub fn get(&self, name: &str) -> Option<VersionRequirement> {
        self.0.get(name).map(|s| VersionRequirement::new(s.as_str()))
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, VersionRequirement)> {
        self.0.iter().map(|(k, v)| (k.as_str(), VersionRequirement::new(v.as_str())))
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// The full persisted `thingGroupsToRootComponents` mapping, keyed by group
/// name. `LOCAL_DEPLOYMENTS` is a group name like any other here.
#[derive(Debug, Clone, Default)]
pub struct ThingGroupsToRootComponents(BTreeMap<String, GroupRoots>);

impl ThingGroupsToRootComponents {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the roots recorded for `group` (the resolver does this
    /// unconditionally at the start of every deployment, for its own
    /// group).
    pub fn set_roots(&mut self, group: impl Into<String>, roots: GroupRoots) {
        self.0.insert(group.into(), roots);
    }

    pub fn roots_for(&self, group: &str) -> Option<&GroupRoots> {
        self.0.get(group)
    }

    pub fn local_deployments_roots(&self) -> Option<&GroupRoots> {
        self.roots_for(LOCAL_DEPLOYMENTS_GROUP)
    }

    /// Every group other than `exclude`, for the resolver's cross-group
    /// merge step.
    pub fn other_groups<'a>(&'a self, exclude: &'a str) -> impl Iterator<Item = (&'a str, &'a GroupRoots)> {
        self.0.iter().filter(move |(g, _)| g.as_str() != exclude).map(|(g, r)| (g.as_str(), r))
    }

    /// Merge `roots` into `into`, applying the resolver's conflict rule:
    /// identical requirement strings are a no-op, differing ones are a
    /// version-conflict error.
    pub fn merge_into(
        into: &mut BTreeMap<String, VersionRequirement>,
        roots: &GroupRoots,
    ) -> CoreResult<()> {
        for (name, req) in roots.iter() {
            match into.get(name) {
                Some(existing) if existing.as_str() == req.as_str() => {}
                Some(existing) => {
                    return Err(CoreError::invalid(format!(
                        "version conflict for {name}: {} vs {}",
                        existing.as_str(),
                        req.as_str()
                    )));
                }
                None => {
                    into.insert(name.to_string(), req);
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "group_roots_tests.rs"]
mod tests;
