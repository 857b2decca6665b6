// SPDX-License-Identifier: MIT
// Copyright (c) 2026 The ecd Authors

use super::*;
use serde_json::json;

#[test]
fn parse_local_deployment_fills_in_group_and_arn() {
    let doc = json!({
        "deploymentId": "L1",
        "components": { "foo": { "version": "1.0.0" } },
    });
    let d = Deployment::parse(&doc, DeploymentType::Local).unwrap();
    assert_eq!(d.deployment_id.as_str(), "L1");
    assert_eq!(d.thing_group, LOCAL_DEPLOYMENTS_GROUP);
    assert_eq!(d.configuration_arn, "L1");
    assert_eq!(d.components["foo"].version, "1.0.0");
    assert_eq!(d.state, DeploymentState::Queued);
}

#[test]
fn parse_local_deployment_without_id_generates_one() {
    let doc = json!({ "components": {} });
    let d = Deployment::parse(&doc, DeploymentType::Local).unwrap();
    assert!(!d.deployment_id.as_str().is_empty());
}

#[test]
fn parse_thing_group_deployment_extracts_group_from_arn() {
    let doc = json!({
        "configurationArn": "arn:aws:greengrass:us-east-1:123456789012:configuration:thinggroup/MyGroup:1",
        "components": {},
    });
    let d = Deployment::parse(&doc, DeploymentType::ThingGroup).unwrap();
    assert_eq!(d.thing_group, "MyGroup");
    assert_eq!(
        d.configuration_arn,
        "arn:aws:greengrass:us-east-1:123456789012:configuration:thinggroup/MyGroup:1"
    );
}

#[test]
fn parse_thing_group_deployment_requires_configuration_arn() {
    let doc = json!({ "components": {} });
    assert!(Deployment::parse(&doc, DeploymentType::ThingGroup).is_err());
}

#[test]
fn parse_rejects_non_object_document() {
    let doc = json!("not an object");
    assert!(Deployment::parse(&doc, DeploymentType::Local).is_err());
}

#[test]
fn thing_group_from_arn_extracts_between_slash_and_colon() {
    let group =
        thing_group_from_arn("arn:aws:greengrass:us-east-1:123456789012:configuration:thinggroup/MyGroup:1")
            .unwrap();
    assert_eq!(group, "MyGroup");
}

#[test]
fn thing_group_from_arn_requires_slash_and_colon() {
    assert!(thing_group_from_arn("no-slash-here").is_err());
}

#[test]
fn arn_without_version_strips_trailing_colon_suffix() {
    assert_eq!(
        arn_without_version("arn:aws:greengrass:us-east-1:123456789012:configuration:thinggroup/MyGroup:1"),
        "arn:aws:greengrass:us-east-1:123456789012:configuration:thinggroup/MyGroup"
    );
    assert_eq!(arn_without_version("no-colon"), "no-colon");
}

#[test]
fn deployment_round_trips_through_serde() {
    let doc = json!({
        "deploymentId": "L1",
        "components": { "foo": { "version": "1.0.0" } },
    });
    let d = Deployment::parse(&doc, DeploymentType::Local).unwrap();
    let json = serde_json::to_string(&d).unwrap();
    let back: Deployment = serde_json::from_str(&json).unwrap();
    assert_eq!(back.deployment_id, d.deployment_id);
    assert_eq!(back.components, d.components);
    assert_eq!(back.configuration_arn, d.configuration_arn);
    assert_eq!(back.thing_group, d.thing_group);
}
