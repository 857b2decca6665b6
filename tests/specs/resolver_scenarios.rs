// SPDX-License-Identifier: MIT
// Copyright (c) 2026 The ecd Authors

//! §8 scenarios 2 and 3: cross-crate dependency resolution exercised
//! against the real `ecd-resolver`/`ecd-storage` stack, faking only the
//! cloud dataplane (§1's external collaborator).

use base64::Engine;
use ecd_core::{test_support, DeploymentType};
use ecd_resolver::{DependencyResolver, ResolvedCandidate};

use crate::fixtures::Fixture;

/// Scenario 2: a cloud deployment lists `foo ==1.0.0`; `foo`'s recipe
/// declares a dependency on `bar >=2.0.0`, and `bar-2.1.0` is present
/// locally and satisfies the range. Resolved set is `{foo: 1.0.0, bar:
/// 2.1.0}`.
#[tokio::test]
async fn cloud_deployment_resolves_a_locally_satisfied_dependency() {
    let fx = Fixture::new();
    fx.write_recipe_with_dependencies("foo", "1.0.0", &[("bar", ">=2.0.0")]);
    fx.write_recipe("bar", "2.1.0");

    fx.dataplane.set_candidate(
        "foo",
        ResolvedCandidate {
            version: "1.0.0".to_string(),
            arn: "arn:aws:greengrass:us-east-1:123:components:foo:versions:1.0.0".to_string(),
            recipe_base64: base64::engine::general_purpose::STANDARD.encode(
                serde_json::to_vec(&serde_json::json!({
                    "ComponentName": "foo",
                    "ComponentDependencies": {"bar": {"VersionRequirement": ">=2.0.0"}},
                    "Manifests": [{"platform": "linux", "Artifacts": []}],
                }))
                .unwrap(),
            ),
        },
    );
    fx.dataplane.set_thing_groups("test-thing", vec!["MyGroup".to_string()]);

    let resolver = DependencyResolver::new(&fx.recipes, fx.config.as_ref(), &fx.group_roots, &fx.dataplane, "2.0.0");

    let doc = test_support::thing_group_deployment_doc(
        "arn:aws:greengrass:us-east-1:123:configuration:thing/MyGroup:1",
        &[("foo", "==1.0.0")],
    );
    let deployment = ecd_core::Deployment::parse(&doc, DeploymentType::ThingGroup).unwrap();

    let resolved = resolver.resolve(&deployment, "test-thing", &fx.platform()).await.unwrap();
    assert_eq!(resolved.get("foo"), Some("1.0.0"));
    assert_eq!(resolved.get("bar"), Some("2.1.0"));
    assert_eq!(resolved.len(), 2);

    // The resolver must have written foo's cloud-resolved recipe to disk
    // and recorded its ARN for the executor's later artifact fetch.
    assert!(fx.recipes.recipes_dir().join("foo-1.0.0.json").exists());
    assert_eq!(
        fx.config.read_string("services/foo/arn").unwrap().as_deref(),
        Some("arn:aws:greengrass:us-east-1:123:components:foo:versions:1.0.0")
    );
}

/// Scenario 3: group A has already deployed `foo = 1.0.0` (its persisted
/// roots say so); group B's new deployment requests `foo = 2.0.0`.
/// Expected: resolution fails with a version-conflict `INVALID` error.
#[tokio::test]
async fn conflicting_versions_across_groups_fail_resolution() {
    let fx = Fixture::new();
    fx.write_recipe("foo", "1.0.0");
    fx.write_recipe("foo", "2.0.0");

    // Group A's most recent deployment already pinned foo to 1.0.0.
    fx.group_roots
        .set_roots("GroupA", &ecd_core::GroupRoots::from_requirements([("foo".to_string(), "==1.0.0".to_string())]))
        .unwrap();
    fx.dataplane.set_thing_groups("test-thing", vec!["GroupA".to_string(), "GroupB".to_string()]);

    let resolver = DependencyResolver::new(&fx.recipes, fx.config.as_ref(), &fx.group_roots, &fx.dataplane, "2.0.0");

    let doc = test_support::thing_group_deployment_doc(
        "arn:aws:greengrass:us-east-1:123:configuration:thing/GroupB:1",
        &[("foo", "==2.0.0")],
    );
    let deployment = ecd_core::Deployment::parse(&doc, DeploymentType::ThingGroup).unwrap();

    let err = resolver.resolve(&deployment, "test-thing", &fx.platform()).await.unwrap_err();
    assert!(matches!(err, ecd_core::CoreError::Invalid(_)), "expected an INVALID version-conflict error, got {err:?}");
    assert!(err.to_string().contains("foo"));
}

/// The same conflict check, but with identical requirement strings across
/// groups — the resolver's conflict rule is string-equality, not semantic
/// equivalence, so this must succeed even though the string differs from
/// how a human might write the same range.
#[tokio::test]
async fn identical_requirement_strings_across_groups_do_not_conflict() {
    let fx = Fixture::new();
    fx.write_recipe("foo", "1.0.0");

    fx.group_roots
        .set_roots("GroupA", &ecd_core::GroupRoots::from_requirements([("foo".to_string(), "==1.0.0".to_string())]))
        .unwrap();
    fx.dataplane.set_thing_groups("test-thing", vec!["GroupA".to_string(), "GroupB".to_string()]);

    let resolver = DependencyResolver::new(&fx.recipes, fx.config.as_ref(), &fx.group_roots, &fx.dataplane, "2.0.0");

    let doc = test_support::thing_group_deployment_doc(
        "arn:aws:greengrass:us-east-1:123:configuration:thing/GroupB:1",
        &[("foo", "==1.0.0")],
    );
    let deployment = ecd_core::Deployment::parse(&doc, DeploymentType::ThingGroup).unwrap();

    let resolved = resolver.resolve(&deployment, "test-thing", &fx.platform()).await.unwrap();
    assert_eq!(resolved.get("foo"), Some("1.0.0"));
}
