// SPDX-License-Identifier: MIT
// Copyright (c) 2026 The ecd Authors

use super::*;
use ecd_core::ComponentRequest;

#[test]
fn create_local_deployment_round_trips_through_json() {
    let mut components = BTreeMap::new();
    components.insert("foo".to_string(), ComponentRequest::new("1.0.0"));
    let req = Request::CreateLocalDeployment {
        recipe_directory_path: None,
        artifacts_directory_path: None,
        components,
    };
    let json = serde_json::to_string(&req).unwrap();
    let back: Request = serde_json::from_str(&json).unwrap();
    assert_eq!(back, req);
}

#[test]
fn hello_and_ping_are_tagged_distinctly() {
    let hello = serde_json::to_string(&Request::Hello).unwrap();
    let ping = serde_json::to_string(&Request::Ping).unwrap();
    assert_ne!(hello, ping);
    assert!(hello.contains("\"Hello\""));
}

#[test]
fn query_request_round_trips() {
    let req = Request::Query(crate::Query::GetDeploymentStatus);
    let json = serde_json::to_string(&req).unwrap();
    let back: Request = serde_json::from_str(&json).unwrap();
    assert_eq!(back, req);
}
