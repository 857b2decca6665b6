// SPDX-License-Identifier: MIT
// Copyright (c) 2026 The ecd Authors

//! Shared test helpers for use across crates.
//!
//! Gated behind `#[cfg(any(test, feature = "test-support"))]`.

use serde_json::{json, Value};

// ── Proptest strategies ─────────────────────────────────────────────────

/// Proptest strategies for version and deployment-document generation.
pub mod strategies {
    use proptest::prelude::*;

    /// A well-formed `x.y.z` semantic version string.
    pub fn arb_semver() -> impl Strategy<Value = String> {
        (0u64..20, 0u64..20, 0u64..20).prop_map(|(major, minor, patch)| format!("{major}.{minor}.{patch}"))
    }

    /// A single version-requirement clause (`==x.y.z`, `>=x.y.z`, `<x.y.z`).
    pub fn arb_requirement_clause() -> impl Strategy<Value = String> {
        (prop_oneof!["==", ">=", "<=", ">", "<"], arb_semver())
            .prop_map(|(op, version)| format!("{op}{version}"))
    }

    /// A requirement expression of one or two space-separated clauses, as
    /// the resolver's string-concatenation AND-widening produces.
    pub fn arb_requirement_expr() -> impl Strategy<Value = String> {
        prop_oneof![
            arb_requirement_clause(),
            (arb_requirement_clause(), arb_requirement_clause())
                .prop_map(|(a, b)| format!("{a} {b}")),
        ]
    }

    /// A component name drawn from a small alphabet, so generated deployment
    /// documents exercise dedup and conflict paths.
    pub fn arb_component_name() -> impl Strategy<Value = String> {
        prop_oneof![Just("foo"), Just("bar"), Just("baz"), Just("qux")].prop_map(str::to_string)
    }
}

// ── Deployment document factories ───────────────────────────────────────

/// Build a local deployment document with the given id and `(name, version)`
/// component list.
pub fn local_deployment_doc(id: &str, components: &[(&str, &str)]) -> Value {
    let mut map = serde_json::Map::new();
    for (name, version) in components {
        map.insert((*name).to_string(), json!({ "version": version }));
    }
    json!({ "deploymentId": id, "components": Value::Object(map) })
}

/// Build a thing-group deployment document (as a cloud job document would
/// carry) with the given configuration ARN and `(name, version)` component
/// list.
pub fn thing_group_deployment_doc(configuration_arn: &str, components: &[(&str, &str)]) -> Value {
    let mut map = serde_json::Map::new();
    for (name, version) in components {
        map.insert((*name).to_string(), json!({ "version": version }));
    }
    json!({
        "configurationArn": configuration_arn,
        "components": Value::Object(map),
    })
}

/// A deployment document whose single component carries a `configurationUpdate`.
pub fn deployment_doc_with_configuration_update(
    id: &str,
    component: &str,
    version: &str,
    reset: &[&str],
    merge: Value,
) -> Value {
    json!({
        "deploymentId": id,
        "components": {
            component: {
                "version": version,
                "configurationUpdate": {
                    "reset": reset,
                    "merge": merge,
                }
            }
        }
    })
}
