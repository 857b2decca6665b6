// SPDX-License-Identifier: MIT
// Copyright (c) 2026 The ecd Authors

//! The MQTT transport (§1, §4.2): a `rumqttc` client presenting the
//! device's mTLS identity, implementing the Jobs listener's narrow
//! [`MqttTransport`] contract — subscribe, and request/response correlated
//! via the IoT Jobs `<topic>/accepted` / `<topic>/rejected` convention.
//!
//! The background task driving `EventLoop::poll` is the only place MQTT
//! packets are touched; it never runs listener logic itself, matching §5's
//! "MQTT callbacks ... do not do work synchronously" requirement — it only
//! resolves a pending request's oneshot or forwards a notification/
//! reconnect event onto the channel the listener reads from.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use ecd_core::{CoreError, CoreResult};
use ecd_jobs::{MqttEvent, MqttTransport};
use parking_lot::Mutex;
use rumqttc::{AsyncClient, Event, MqttOptions, Packet, QoS, TlsConfiguration, Transport};
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, warn};

use crate::device_identity::DeviceIdentity;

const MQTT_RPC_TIMEOUT: Duration = Duration::from_secs(300);

type PendingMap = Arc<Mutex<HashMap<String, oneshot::Sender<Result<Vec<u8>, String>>>>>;

pub struct RumqttcTransport {
    client: AsyncClient,
    pending: PendingMap,
}

impl RumqttcTransport {
    /// Connect to `endpoint:8883` as `client_id`, presenting `identity`'s
    /// device certificate, and start the background poll loop. Events
    /// other than accepted/rejected responses are forwarded to `events`.
    pub fn connect(endpoint: &str, client_id: &str, identity: &DeviceIdentity, events: mpsc::Sender<MqttEvent>) -> CoreResult<Self> {
        let mut options = MqttOptions::new(client_id, endpoint, 8883);
        options.set_keep_alive(Duration::from_secs(30));

        let ca = std::fs::read(&identity.root_ca_path)
            .map_err(|e| CoreError::failure(format!("reading root CA: {e}")))?;
        let client_cert = std::fs::read(&identity.certificate_path)
            .map_err(|e| CoreError::failure(format!("reading certificate: {e}")))?;
        let client_key = std::fs::read(&identity.private_key_path)
            .map_err(|e| CoreError::failure(format!("reading private key: {e}")))?;

        options.set_transport(Transport::Tls(TlsConfiguration::Simple {
            ca,
            alpn: None,
            client_auth: Some((client_cert, client_key)),
        }));

        let (client, mut eventloop) = AsyncClient::new(options, 64);
        let pending: PendingMap = Arc::new(Mutex::new(HashMap::new()));
        let loop_pending = pending.clone();

        tokio::spawn(async move {
            loop {
                match eventloop.poll().await {
                    Ok(Event::Incoming(Packet::Publish(publish))) => {
                        dispatch_publish(&loop_pending, &events, &publish.topic, publish.payload.to_vec()).await;
                    }
                    Ok(Event::Incoming(Packet::ConnAck(ack))) if ack.session_present => {
                        debug!("mqtt session resumed");
                    }
                    Ok(Event::Incoming(Packet::ConnAck(_))) => {
                        let _ = events.send(MqttEvent::Reconnected).await;
                    }
                    Ok(_) => {}
                    Err(err) => {
                        warn!(error = %err, "mqtt eventloop error, retrying");
                        tokio::time::sleep(Duration::from_secs(1)).await;
                    }
                }
            }
        });

        Ok(Self { client, pending })
    }
}

async fn dispatch_publish(pending: &PendingMap, events: &mpsc::Sender<MqttEvent>, topic: &str, payload: Vec<u8>) {
    if let Some(base) = topic.strip_suffix("/accepted") {
        if let Some(tx) = pending.lock().remove(base) {
            let _ = tx.send(Ok(payload));
        }
        return;
    }
    if let Some(base) = topic.strip_suffix("/rejected") {
        if let Some(tx) = pending.lock().remove(base) {
            let body = String::from_utf8_lossy(&payload).into_owned();
            let _ = tx.send(Err(body));
        }
        return;
    }
    if topic.contains("notify-next") {
        let _ = events.send(MqttEvent::NextJobChanged).await;
    }
}

#[async_trait::async_trait]
impl MqttTransport for RumqttcTransport {
    async fn subscribe(&self, topic: &str) -> CoreResult<()> {
        self.client
            .subscribe(topic, QoS::AtLeastOnce)
            .await
            .map_err(|e| CoreError::failure(format!("mqtt subscribe to {topic}: {e}")))
    }

    async fn request(&self, topic: &str, payload: Vec<u8>) -> CoreResult<Vec<u8>> {
        let accepted = format!("{topic}/accepted");
        let rejected = format!("{topic}/rejected");
        self.client
            .subscribe(&accepted, QoS::AtLeastOnce)
            .await
            .map_err(|e| CoreError::failure(format!("mqtt subscribe to {accepted}: {e}")))?;
        self.client
            .subscribe(&rejected, QoS::AtLeastOnce)
            .await
            .map_err(|e| CoreError::failure(format!("mqtt subscribe to {rejected}: {e}")))?;

        let (tx, rx) = oneshot::channel();
        self.pending.lock().insert(topic.to_string(), tx);

        if let Err(e) = self.client.publish(topic, QoS::AtLeastOnce, false, payload).await {
            self.pending.lock().remove(topic);
            return Err(CoreError::failure(format!("mqtt publish to {topic}: {e}")));
        }

        match tokio::time::timeout(MQTT_RPC_TIMEOUT, rx).await {
            Ok(Ok(Ok(bytes))) => Ok(bytes),
            Ok(Ok(Err(rejected_body))) => Err(CoreError::Remote(rejected_body)),
            Ok(Err(_)) => Err(CoreError::failure(format!("mqtt response channel for {topic} dropped"))),
            Err(_) => {
                self.pending.lock().remove(topic);
                Err(CoreError::failure(format!("mqtt request to {topic} timed out after {MQTT_RPC_TIMEOUT:?}")))
            }
        }
    }
}
