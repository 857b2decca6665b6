// SPDX-License-Identifier: MIT
// Copyright (c) 2026 The ecd Authors

use super::*;
use crate::config::ConfigFacadeExt;
use serde_json::json;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

fn temp_store() -> (JsonConfigStore, tempfile::TempDir) {
    let dir = tempfile::tempdir().unwrap();
    let store = JsonConfigStore::open(dir.path().join("config.json")).unwrap();
    (store, dir)
}

#[test]
fn write_then_read_round_trips() {
    let (store, _dir) = temp_store();
    store.write("system/thingName", json!("my-thing")).unwrap();
    assert_eq!(store.read("system/thingName").unwrap(), Some(json!("my-thing")));
}

#[test]
fn read_missing_key_is_none() {
    let (store, _dir) = temp_store();
    assert_eq!(store.read("does/not/exist").unwrap(), None);
}

#[test]
fn delete_removes_the_key() {
    let (store, _dir) = temp_store();
    store.write("services/foo/version", json!("1.0.0")).unwrap();
    store.delete("services/foo/version").unwrap();
    assert_eq!(store.read("services/foo/version").unwrap(), None);
}

#[test]
fn delete_prefix_removes_the_key_and_nested_keys_but_not_siblings() {
    let (store, _dir) = temp_store();
    store.write("services/foo/version", json!("1.0.0")).unwrap();
    store.write("services/foo/configuration", json!({ "a": 1 })).unwrap();
    store.write("services/foobar/version", json!("2.0.0")).unwrap();

    store.delete_prefix("services/foo").unwrap();

    assert_eq!(store.read("services/foo/version").unwrap(), None);
    assert_eq!(store.read("services/foo/configuration").unwrap(), None);
    assert_eq!(store.read("services/foobar/version").unwrap(), Some(json!("2.0.0")));
}

#[test]
fn persists_across_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.json");
    {
        let store = JsonConfigStore::open(&path).unwrap();
        store.write("system/thingName", json!("my-thing")).unwrap();
    }
    let reopened = JsonConfigStore::open(&path).unwrap();
    assert_eq!(reopened.read("system/thingName").unwrap(), Some(json!("my-thing")));
}

#[test]
fn open_on_missing_file_starts_empty() {
    let dir = tempfile::tempdir().unwrap();
    let store = JsonConfigStore::open(dir.path().join("missing.json")).unwrap();
    assert_eq!(store.read("anything").unwrap(), None);
}

#[test]
fn read_typed_and_write_typed_round_trip() {
    let (store, _dir) = temp_store();
    #[derive(Debug, PartialEq, serde::Serialize, serde::Deserialize)]
    struct Sample {
        a: u32,
    }
    store.write_typed("sample", &Sample { a: 7 }).unwrap();
    let back: Option<Sample> = store.read_typed("sample").unwrap();
    assert_eq!(back, Some(Sample { a: 7 }));
}

#[test]
fn subscribe_fires_on_write_to_matching_prefix() {
    let (store, _dir) = temp_store();
    let calls = Arc::new(AtomicUsize::new(0));
    let calls_clone = Arc::clone(&calls);
    store.subscribe(
        "services/DeploymentService/",
        Box::new(move |_key, _value| {
            calls_clone.fetch_add(1, Ordering::SeqCst);
        }),
    );
    store.write("services/DeploymentService/deploymentState/jobsID", json!("job-1")).unwrap();
    store.write("system/thingName", json!("unrelated")).unwrap();
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[test]
fn subscribe_fires_with_none_on_delete() {
    let (store, _dir) = temp_store();
    let deleted = Arc::new(AtomicUsize::new(0));
    let deleted_clone = Arc::clone(&deleted);
    store.write("services/foo/version", json!("1.0.0")).unwrap();
    store.subscribe(
        "services/foo/",
        Box::new(move |_key, value| {
            if value.is_none() {
                deleted_clone.fetch_add(1, Ordering::SeqCst);
            }
        }),
    );
    store.delete("services/foo/version").unwrap();
    assert_eq!(deleted.load(Ordering::SeqCst), 1);
}
