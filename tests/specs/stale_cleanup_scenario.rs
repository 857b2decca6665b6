// SPDX-License-Identifier: MIT
// Copyright (c) 2026 The ecd Authors

//! §8 scenario 5: stale cleanup after component removal.
//!
//! A previous deployment installed `{foo: 1.0.0, bar: 1.0.0}`. A new
//! deployment names only `foo`. `bar`'s recipe, its config subtree, and its
//! service units must be removed; `foo` must be left untouched.

use ecd_core::{test_support, DeploymentStateCheckpoint, DeploymentType};
use serde_json::json;

use crate::fixtures::Fixture;

#[tokio::test]
async fn component_dropped_from_a_deployment_is_swept_as_stale() {
    let fx = Fixture::new();
    fx.write_recipe("foo", "1.0.0");
    fx.write_recipe("bar", "1.0.0");
    fx.write_unit("ggl.foo.service");
    fx.write_unit("ggl.bar.service");
    fx.config.write("services/foo/version", json!("1.0.0")).unwrap();
    fx.config.write("services/bar/version", json!("1.0.0")).unwrap();
    fx.config.write("services/bar/configuration", json!({"some": "value"})).unwrap();

    let fetcher = fx.fetcher();
    let bootstrap = fx.bootstrap();
    let stale = fx.stale_cleanup();
    let executor = fx.executor(&fetcher, &bootstrap, &stale);

    // The new deployment only lists `foo`; `bar` is gone from it entirely.
    let doc = test_support::local_deployment_doc("D5", &[("foo", "1.0.0")]);
    let deployment = ecd_core::Deployment::parse(&doc, DeploymentType::Local).unwrap();
    let mut checkpoint = DeploymentStateCheckpoint::for_deployment(deployment.clone(), None, None);

    executor.run_deployment(deployment.clone(), &mut checkpoint).await;

    // foo survives untouched.
    assert!(fx.recipes.recipes_dir().join("foo-1.0.0.json").exists());
    assert_eq!(fx.config.read_string("services/foo/version").unwrap().as_deref(), Some("1.0.0"));

    // bar's recipe, config subtree, and unit files are gone.
    assert!(!fx.recipes.recipes_dir().join("bar-1.0.0.json").exists());
    assert!(fx.config.read_string("services/bar/version").unwrap().is_none());
    assert!(!fx.root.join("ggl.bar.service").exists());

    let reports = fx.fleet_status.reports();
    assert_eq!(reports, vec![("D5".to_string(), ecd_exec::DeploymentStatus::Succeeded)]);
}

/// A version bump of the same component (`foo` 1.0.0 -> 2.0.0) is
/// version-stale, not component-stale: the old recipe/artifact is removed
/// but the component's config subtree and units stay, since the new version
/// is still running under the same name.
#[tokio::test]
async fn a_version_bump_of_the_same_component_keeps_its_config_subtree() {
    let fx = Fixture::new();
    fx.write_recipe("foo", "1.0.0");
    fx.write_recipe("foo", "2.0.0");
    fx.write_unit("ggl.foo.service");
    fx.config.write("services/foo/version", json!("1.0.0")).unwrap();
    fx.config.write("services/foo/configuration", json!({"some": "value"})).unwrap();

    let fetcher = fx.fetcher();
    let bootstrap = fx.bootstrap();
    let stale = fx.stale_cleanup();
    let executor = fx.executor(&fetcher, &bootstrap, &stale);

    let doc = test_support::local_deployment_doc("D6", &[("foo", "2.0.0")]);
    let deployment = ecd_core::Deployment::parse(&doc, DeploymentType::Local).unwrap();
    let mut checkpoint = DeploymentStateCheckpoint::for_deployment(deployment.clone(), None, None);

    executor.run_deployment(deployment.clone(), &mut checkpoint).await;

    assert!(!fx.recipes.recipes_dir().join("foo-1.0.0.json").exists(), "the old version's recipe must be swept");
    assert!(fx.recipes.recipes_dir().join("foo-2.0.0.json").exists());
    assert_eq!(fx.config.read_string("services/foo/version").unwrap().as_deref(), Some("2.0.0"));
    // The component's config subtree is not a component-stale removal target.
    assert_eq!(fx.config.read_string("services/foo/configuration").unwrap().is_some(), true);
}
