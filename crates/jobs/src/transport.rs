// SPDX-License-Identifier: MIT
// Copyright (c) 2026 The ecd Authors

//! The MQTT transport contract the listener consumes. The concrete rumqttc
//! adapter lives in `ecd-adapters`; the per-RPC 300s timeout is the
//! transport implementation's responsibility, not the listener's.

use async_trait::async_trait;
use ecd_core::CoreResult;

/// An event the transport's subscription callback pushes onto the
/// listener's channel. The callback itself only flips a flag/enqueues —
/// all protocol logic runs on the listener's own task.
#[derive(Debug, Clone)]
pub enum MqttEvent {
    NextJobChanged,
    Reconnected,
}

#[async_trait]
pub trait MqttTransport: Send + Sync {
    async fn subscribe(&self, topic: &str) -> CoreResult<()>;

    /// Publish `payload` to `topic` and wait for the correlated response,
    /// honoring the transport's own RPC timeout.
    async fn request(&self, topic: &str, payload: Vec<u8>) -> CoreResult<Vec<u8>>;
}
