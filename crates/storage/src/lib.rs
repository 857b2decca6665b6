// SPDX-License-Identifier: MIT
// Copyright (c) 2026 The ecd Authors

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! ecd-storage: the Config Facade and the persisted records built on top of
//! it (deployment-state checkpoint, group-roots map, thing-groups list).

pub mod checkpoint_store;
pub mod config;
pub mod group_roots_store;

pub use checkpoint_store::CheckpointStore;
pub use config::{ConfigError, ConfigFacade, ConfigFacadeExt, ConfigResult, JsonConfigStore, SharedConfig, Subscriber};
pub use group_roots_store::GroupRootsStore;
