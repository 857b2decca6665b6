// SPDX-License-Identifier: MIT
// Copyright (c) 2026 The ecd Authors

use super::*;
use async_trait::async_trait;
use ecd_core::test_support;
use ecd_storage::JsonConfigStore;
use parking_lot::Mutex as StdMutex;
use std::collections::VecDeque;
use std::sync::Arc;

struct FakeTransport {
    describe_responses: StdMutex<VecDeque<CoreResult<Vec<u8>>>>,
    update_responses: StdMutex<VecDeque<CoreResult<Vec<u8>>>>,
}

impl FakeTransport {
    fn new() -> Self {
        Self { describe_responses: StdMutex::new(VecDeque::new()), update_responses: StdMutex::new(VecDeque::new()) }
    }

    fn push_describe(&self, response: CoreResult<Vec<u8>>) {
        self.describe_responses.lock().push_back(response);
    }

    fn push_update(&self, response: CoreResult<Vec<u8>>) {
        self.update_responses.lock().push_back(response);
    }
}

#[async_trait]
impl MqttTransport for FakeTransport {
    async fn subscribe(&self, _topic: &str) -> CoreResult<()> {
        Ok(())
    }

    async fn request(&self, topic: &str, _payload: Vec<u8>) -> CoreResult<Vec<u8>> {
        if topic.ends_with("/get") {
            self.describe_responses.lock().pop_front().unwrap_or_else(|| Ok(b"{}".to_vec()))
        } else {
            self.update_responses.lock().pop_front().unwrap_or_else(|| Ok(b"{}".to_vec()))
        }
    }
}

fn describe_response(job_id: &str, status: &str, doc: serde_json::Value) -> Vec<u8> {
    serde_json::to_vec(&serde_json::json!({
        "execution": {
            "jobId": job_id,
            "status": status,
            "versionNumber": 1,
            "jobDocument": doc,
        }
    }))
    .unwrap()
}

fn setup() -> (FakeTransport, CheckpointStore, DeploymentQueue, CurrentJobCell) {
    let dir = tempfile::tempdir().unwrap();
    let config: Arc<dyn ConfigFacade> = Arc::new(JsonConfigStore::open(dir.path().join("config.json")).unwrap());
    (FakeTransport::new(), CheckpointStore::new(config), DeploymentQueue::new(), CurrentJobCell::new())
}

#[tokio::test]
async fn queued_status_enqueues_and_sets_current_job() {
    let (transport, config, queue, current_job) = setup();
    let doc = test_support::thing_group_deployment_doc(
        "arn:aws:greengrass:us-east-1:123:configuration:thing/MyGroup:1",
        &[("com.example.App", "1.0.0")],
    );
    transport.push_describe(Ok(describe_response("job-1", "QUEUED", doc)));

    let listener = JobsListener::new(&transport, config.as_ref(), &queue, &current_job, "MyThing");
    listener.describe_next_job().await.unwrap();

    assert_eq!(queue.len(), 1);
    assert_eq!(current_job.current_job_id(), Some("job-1".to_string()));
    assert_eq!(current_job.version(), 1);
}

#[tokio::test]
async fn duplicate_job_notification_is_skipped() {
    let (transport, config, queue, current_job) = setup();
    let doc = test_support::thing_group_deployment_doc(
        "arn:aws:greengrass:us-east-1:123:configuration:thing/MyGroup:1",
        &[("com.example.App", "1.0.0")],
    );
    transport.push_describe(Ok(describe_response("job-1", "QUEUED", doc.clone())));
    transport.push_describe(Ok(describe_response("job-1", "QUEUED", doc)));

    let listener = JobsListener::new(&transport, config.as_ref(), &queue, &current_job, "MyThing");
    listener.describe_next_job().await.unwrap();
    listener.describe_next_job().await.unwrap();

    assert_eq!(queue.len(), 1);
}

#[tokio::test]
async fn terminal_cancel_status_clears_current_job() {
    let (transport, config, queue, current_job) = setup();
    current_job.set_if_new("job-1", ecd_core::DeploymentId::from_string("dep-1"));
    transport.push_describe(Ok(describe_response("job-1", "TIMED_OUT", serde_json::json!({}))));

    let listener = JobsListener::new(&transport, config.as_ref(), &queue, &current_job, "MyThing");
    listener.describe_next_job().await.unwrap();

    assert_eq!(current_job.current_job_id(), None);
}

#[tokio::test]
async fn update_job_rebases_on_version_mismatch_then_succeeds() {
    let (transport, config, queue, current_job) = setup();
    let rejected = serde_json::to_vec(&serde_json::json!({
        "executionState": {"status": "IN_PROGRESS", "versionNumber": 5}
    }))
    .unwrap();
    transport.push_update(Err(CoreError::Remote(String::from_utf8(rejected).unwrap())));
    transport.push_update(Ok(b"{}".to_vec()));

    let listener = JobsListener::new(&transport, config.as_ref(), &queue, &current_job, "MyThing");
    listener.update_job("job-1", JobStatus::Succeeded, 1).await.unwrap();

    assert_eq!(current_job.version(), 6);
}

#[tokio::test]
async fn update_job_rejection_with_matching_status_is_treated_as_success() {
    let (transport, config, queue, current_job) = setup();
    let rejected = serde_json::to_vec(&serde_json::json!({
        "executionState": {"status": "SUCCEEDED", "versionNumber": 1}
    }))
    .unwrap();
    transport.push_update(Err(CoreError::Remote(String::from_utf8(rejected).unwrap())));

    let listener = JobsListener::new(&transport, config.as_ref(), &queue, &current_job, "MyThing");
    listener.update_job("job-1", JobStatus::Succeeded, 1).await.unwrap();
}

#[test]
fn set_jobs_deployment_for_bootstrap_rejects_superseded_job() {
    let (transport, config, queue, current_job) = setup();
    current_job.set_if_new("job-2", ecd_core::DeploymentId::from_string("dep-2"));

    let listener = JobsListener::new(&transport, config.as_ref(), &queue, &current_job, "MyThing");
    let err = listener
        .set_jobs_deployment_for_bootstrap("job-1", ecd_core::DeploymentId::from_string("dep-1"), 3)
        .unwrap_err();
    assert!(matches!(err, CoreError::Invalid(_)));
}

#[test]
fn set_jobs_deployment_for_bootstrap_restores_when_uncontested() {
    let (transport, config, queue, current_job) = setup();
    let listener = JobsListener::new(&transport, config.as_ref(), &queue, &current_job, "MyThing");
    listener
        .set_jobs_deployment_for_bootstrap("job-1", ecd_core::DeploymentId::from_string("dep-1"), 3)
        .unwrap();
    assert_eq!(current_job.current_job_id(), Some("job-1".to_string()));
    assert_eq!(current_job.version(), 3);
}
