// SPDX-License-Identifier: MIT
// Copyright (c) 2026 The ecd Authors

//! §8 scenario 6: queue dedup of an in-flight deployment.
//!
//! Enqueue `d1` (id X), dequeue it (now `InProgress`), enqueue `d1'` with
//! the same id X. The second enqueue must return `OK` with the queue count
//! unchanged, discarding `d1'`; the executor completes the original `d1`
//! normally and releases it.

use ecd_core::{test_support, DeploymentQueue, DeploymentType};

#[test]
fn enqueue_of_an_in_progress_id_is_dropped_not_replaced() {
    let queue = DeploymentQueue::new();

    let doc = test_support::local_deployment_doc("X", &[("foo", "1.0.0")]);
    let id = queue.enqueue(&doc, DeploymentType::Local).unwrap();
    assert_eq!(queue.len(), 1);

    let dequeued = queue.dequeue();
    assert_eq!(dequeued.deployment_id, id);
    assert_eq!(dequeued.state, ecd_core::DeploymentState::InProgress);

    // A second arrival with the same id, different contents, while the
    // first is still in progress.
    let replacement = test_support::local_deployment_doc("X", &[("foo", "2.0.0")]);
    let replacement_id = queue.enqueue(&replacement, DeploymentType::Local).unwrap();
    assert_eq!(replacement_id, id, "dedup must return the same id, not fail or replace");
    assert_eq!(queue.len(), 1, "an in-progress duplicate must not grow the queue");

    // The executor finishes the original (unreplaced) deployment.
    queue.release(&dequeued);
    assert_eq!(queue.len(), 0);
}

#[test]
fn enqueue_of_a_still_queued_id_replaces_in_place_preserving_order() {
    let queue = DeploymentQueue::new();

    let first = test_support::local_deployment_doc("A", &[("foo", "1.0.0")]);
    queue.enqueue(&first, DeploymentType::Local).unwrap();
    let second = test_support::local_deployment_doc("B", &[("bar", "1.0.0")]);
    queue.enqueue(&second, DeploymentType::Local).unwrap();
    assert_eq!(queue.len(), 2);

    // Replace "A" in place while it is still queued; queue order (A, B)
    // must be preserved — the head dequeue must still yield "A", now with
    // the new component version.
    let replacement = test_support::local_deployment_doc("A", &[("foo", "9.9.9")]);
    queue.enqueue(&replacement, DeploymentType::Local).unwrap();
    assert_eq!(queue.len(), 2, "replace-in-place must not grow the queue");

    let head = queue.dequeue();
    assert_eq!(head.deployment_id.as_str(), "A");
    assert_eq!(head.components.get("foo").unwrap().version, "9.9.9");
    queue.release(&head);

    let next = queue.dequeue();
    assert_eq!(next.deployment_id.as_str(), "B");
    queue.release(&next);
}

#[test]
fn a_full_queue_with_no_matching_id_returns_busy() {
    let queue = DeploymentQueue::with_capacity(2);
    queue.enqueue(&test_support::local_deployment_doc("A", &[("foo", "1.0.0")]), DeploymentType::Local).unwrap();
    queue.enqueue(&test_support::local_deployment_doc("B", &[("foo", "1.0.0")]), DeploymentType::Local).unwrap();
    assert!(queue.is_full());

    let err = queue.enqueue(&test_support::local_deployment_doc("C", &[("foo", "1.0.0")]), DeploymentType::Local).unwrap_err();
    assert!(matches!(err, ecd_core::CoreError::Busy));
}
