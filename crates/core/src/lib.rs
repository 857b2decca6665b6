// SPDX-License-Identifier: MIT
// Copyright (c) 2026 The ecd Authors

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! ecd-core: shared domain types for the edge component deployment daemon.

pub mod macros;

pub mod checkpoint;
pub mod clock;
pub mod current_job;
pub mod deployment;
pub mod error;
pub mod group_roots;
pub mod id;
pub mod identity;
pub mod queue;
pub mod recipe;
pub mod resolved;
pub mod version_req;

#[cfg(any(test, feature = "test-support"))]
pub mod test_support;

pub use checkpoint::DeploymentStateCheckpoint;
pub use clock::{Clock, FakeClock, SystemClock};
pub use current_job::CurrentJobCell;
pub use deployment::{
    arn_without_version, thing_group_from_arn, ComponentRequest, ConfigurationUpdate, Deployment,
    DeploymentState, DeploymentType, LOCAL_DEPLOYMENTS_GROUP,
};
pub use error::{CoreError, CoreResult};
pub use group_roots::{GroupRoots, ThingGroupsToRootComponents};
pub use id::DeploymentId;
pub use identity::{ComponentIdentity, RECIPE_EXTENSIONS};
pub use queue::{DeploymentQueue, DEFAULT_CAPACITY};
pub use recipe::{ArtifactSpec, ArtifactUri, ComponentConfiguration, ComponentRecipe, DependencyProperties, Manifest};
pub use resolved::ResolvedComponentSet;
pub use version_req::{parse_version, VersionRequirement};
