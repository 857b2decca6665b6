// SPDX-License-Identifier: MIT
// Copyright (c) 2026 The ecd Authors

//! The bounded, deduplicating, single-consumer deployment queue.
//!
//! A fixed-capacity ring buffer paired with a mutex and a condition
//! variable. Enqueue either replaces a still-queued slot holding the same
//! deployment id in place (preserving queue order), drops the new arrival
//! as a no-op duplicate if that id is already in progress, or appends to
//! the tail; a full queue with no matching id returns `Busy` for the caller
//! to retry with backoff.

use parking_lot::{Condvar, Mutex};

use crate::deployment::{Deployment, DeploymentState, DeploymentType};
use crate::error::{CoreError, CoreResult};
use crate::id::DeploymentId;

/// Default ring-buffer capacity.
pub const DEFAULT_CAPACITY: usize = 10;

struct Inner {
    slots: Vec<Option<Deployment>>,
    head: usize,
    count: usize,
}

impl Inner {
    fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Index of the slot (if any) holding `id`, scanning the active range
    /// `head..head+count` circularly.
    fn find_index(&self, id: &DeploymentId) -> Option<usize> {
        for offset in 0..self.count {
            let idx = (self.head + offset) % self.capacity();
            if self.slots[idx].as_ref().map(|d| &d.deployment_id) == Some(id) {
                return Some(idx);
            }
        }
        None
    }
}

pub struct DeploymentQueue {
    inner: Mutex<Inner>,
    notify: Condvar,
}

impl DeploymentQueue {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            inner: Mutex::new(Inner { slots: vec![None; capacity], head: 0, count: 0 }),
            notify: Condvar::new(),
        }
    }

    /// Parse `doc` into a deployment and enqueue it, returning the assigned
    /// or supplied deployment id.
    ///
    /// Deduplication: a slot already holding a deployment with the same id
    /// is overwritten in place if still `Queued` (dedup replace), or left
    /// untouched if `InProgress` (dedup drop — see scenario 6 of the
    /// end-to-end test set). Otherwise the deployment is appended to the
    /// tail, or `Busy` is returned if the queue is full.
    pub fn enqueue(
        &self,
        doc: &serde_json::Value,
        deployment_type: DeploymentType,
    ) -> CoreResult<DeploymentId> {
        let deployment = Deployment::parse(doc, deployment_type)?;
        self.enqueue_deployment(deployment)
    }

    /// Enqueue an already-parsed deployment. Exposed separately so the Jobs
    /// listener (which parses the job document itself to read the target
    /// group before enqueuing) can skip the redundant parse.
    pub fn enqueue_deployment(&self, deployment: Deployment) -> CoreResult<DeploymentId> {
        let id = deployment.deployment_id.clone();
        let mut inner = self.inner.lock();

        if let Some(idx) = inner.find_index(&id) {
            #[allow(clippy::expect_used)]
            let existing_state = inner.slots[idx].as_ref().expect("index came from find_index").state;
            match existing_state {
                DeploymentState::InProgress => return Ok(id),
                DeploymentState::Queued => {
                    inner.slots[idx] = Some(deployment);
                    return Ok(id);
                }
            }
        }

        if inner.count == inner.capacity() {
            return Err(CoreError::Busy);
        }

        let tail = (inner.head + inner.count) % inner.capacity();
        inner.slots[tail] = Some(deployment);
        inner.count += 1;
        drop(inner);
        self.notify.notify_one();
        Ok(id)
    }

    /// Block until a deployment is available, transition the head slot to
    /// `InProgress`, and return a clone of it. The original remains in the
    /// head slot until [`Self::release`] is called with a matching id.
    pub fn dequeue(&self) -> Deployment {
        let mut inner = self.inner.lock();
        while inner.count == 0 {
            self.notify.wait(&mut inner);
        }
        let head = inner.head;
        #[allow(clippy::expect_used)]
        let slot = inner.slots[head].as_mut().expect("occupied slot at head");
        slot.state = DeploymentState::InProgress;
        slot.clone()
    }

    /// Release the head slot. Panics if the queue is empty or if
    /// `deployment` does not match the current head — a single consumer is
    /// assumed and this assertion enforces it.
    pub fn release(&self, deployment: &Deployment) {
        let mut inner = self.inner.lock();
        assert!(inner.count > 0, "release called on an empty queue");
        let head = inner.head;
        #[allow(clippy::expect_used)]
        let current = inner.slots[head].as_ref().expect("occupied slot at head");
        assert_eq!(
            current.deployment_id, deployment.deployment_id,
            "release must match the current head of the queue"
        );
        inner.slots[head] = None;
        inner.head = (head + 1) % inner.capacity();
        inner.count -= 1;
    }

    pub fn len(&self) -> usize {
        self.inner.lock().count
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn is_full(&self) -> bool {
        let inner = self.inner.lock();
        inner.count == inner.capacity()
    }

    /// The deployment at the head of the queue, if it has been dequeued and
    /// is currently `InProgress` — for status reporting over IPC. Returns
    /// `None` if the queue is empty or the head slot is still `Queued`
    /// (nothing has started running it yet).
    pub fn current_in_progress(&self) -> Option<Deployment> {
        let inner = self.inner.lock();
        let head = inner.slots[inner.head].as_ref()?;
        (head.state == DeploymentState::InProgress).then(|| head.clone())
    }
}

impl Default for DeploymentQueue {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
#[path = "queue_tests.rs"]
mod tests;
