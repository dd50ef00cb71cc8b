// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! MQTT connection carrying device status, control messages and intents.
//!
//! # Examples
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use voxlight::intent::{IntentConfig, IntentHandler};
//! use voxlight::protocol::MqttBridge;
//! use voxlight::rooms::RoomDirectory;
//! use voxlight::DispatcherBuilder;
//!
//! # async fn example() -> voxlight::Result<()> {
//! let bridge = MqttBridge::builder()
//!     .host("192.168.1.50")
//!     .credentials("user", "password")
//!     .build()
//!     .await?;
//!
//! let dispatcher = DispatcherBuilder::new(
//!     Arc::new(RoomDirectory::new()),
//!     Arc::new(bridge.publisher()),
//! )
//! .cache(Arc::clone(bridge.cache()))
//! .build();
//!
//! bridge.serve_intents(Arc::new(IntentHandler::new(dispatcher, IntentConfig::default())));
//! # Ok(())
//! # }
//! ```

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::time::Duration;

use parking_lot::RwLock;
use rumqttc::{AsyncClient, EventLoop, MqttOptions, QoS};
use tokio::sync::{mpsc, oneshot};

use crate::command::ControlMessage;
use crate::error::ProtocolError;
use crate::intent::{INTENT_PREFIX, INTENT_TOPICS, IntentHandler, SessionReply};
use crate::state::StateCache;

use super::{DEFAULT_BASE_TOPIC, Publisher, StatusRouter};

/// Global counter for generating unique client IDs.
static BRIDGE_CLIENT_ID_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Capacity of the MQTT client's request channel.
const REQUEST_CAPACITY: usize = 10;

/// A message waiting to be handed to the MQTT client.
#[derive(Debug)]
struct Outgoing {
    topic: String,
    qos: QoS,
    body: String,
}

/// An intent received on the event loop, waiting for the intent worker.
#[derive(Debug)]
struct IncomingIntent {
    topic: String,
    payload: Vec<u8>,
}

/// Configuration for the MQTT connection.
#[derive(Debug, Clone)]
pub struct MqttBridgeConfig {
    host: String,
    port: u16,
    credentials: Option<(String, String)>,
    keep_alive: Duration,
    connection_timeout: Duration,
    base_topic: String,
}

impl Default for MqttBridgeConfig {
    fn default() -> Self {
        Self {
            host: String::new(),
            port: 1883,
            credentials: None,
            keep_alive: Duration::from_secs(30),
            connection_timeout: Duration::from_secs(10),
            base_topic: DEFAULT_BASE_TOPIC.to_string(),
        }
    }
}

/// A connected MQTT bridge.
///
/// Status reports on `{base_topic}/+` are recorded into the bridge's
/// [`StateCache`]. Once [`serve_intents`](Self::serve_intents) is called,
/// intents on `hermes/intent/+` are answered with session replies.
///
/// Intents are handled on a worker task, never on the event loop. Control
/// messages and session replies go through an unbounded outbox that a
/// forwarding task drains into the client, so a fan-out over many devices
/// never overruns the client's request channel.
///
/// `MqttBridge` is cheaply cloneable (via `Arc`).
#[derive(Clone)]
pub struct MqttBridge {
    inner: Arc<MqttBridgeInner>,
}

struct MqttBridgeInner {
    client: AsyncClient,
    outbox: mpsc::UnboundedSender<Outgoing>,
    config: MqttBridgeConfig,
    router: StatusRouter,
    intents: RwLock<Option<Arc<IntentHandler>>>,
    connected: AtomicBool,
}

impl MqttBridge {
    /// Creates a new builder for configuring the bridge.
    #[must_use]
    pub fn builder() -> MqttBridgeBuilder {
        MqttBridgeBuilder::default()
    }

    /// Returns whether the broker is currently connected.
    #[must_use]
    pub fn is_connected(&self) -> bool {
        self.inner.connected.load(Ordering::Acquire)
    }

    /// Returns the host address of the broker.
    #[must_use]
    pub fn host(&self) -> &str {
        &self.inner.config.host
    }

    /// Returns the port of the broker.
    #[must_use]
    pub fn port(&self) -> u16 {
        self.inner.config.port
    }

    /// Returns the zigbee2mqtt base topic.
    #[must_use]
    pub fn base_topic(&self) -> &str {
        &self.inner.config.base_topic
    }

    /// Returns the cache status reports are recorded into.
    #[must_use]
    pub fn cache(&self) -> &Arc<StateCache> {
        self.inner.router.cache()
    }

    /// Returns a publisher for control messages over this connection.
    #[must_use]
    pub fn publisher(&self) -> MqttPublisher {
        MqttPublisher {
            outbox: self.inner.outbox.clone(),
            base_topic: self.inner.config.base_topic.clone(),
        }
    }

    /// Starts answering intents with `handler`, replacing any previous one.
    pub fn serve_intents(&self, handler: Arc<IntentHandler>) {
        tracing::debug!("Serving voice intents");
        *self.inner.intents.write() = Some(handler);
    }

    /// Stops answering intents.
    pub fn stop_intents(&self) {
        *self.inner.intents.write() = None;
    }

    async fn subscribe(&self) -> Result<(), ProtocolError> {
        let status_topic = self.inner.router.subscription();
        self.inner
            .client
            .subscribe(&status_topic, QoS::AtLeastOnce)
            .await
            .map_err(ProtocolError::Mqtt)?;
        self.inner
            .client
            .subscribe(INTENT_TOPICS, QoS::AtLeastOnce)
            .await
            .map_err(ProtocolError::Mqtt)?;

        tracing::debug!(
            status = %status_topic,
            intents = %INTENT_TOPICS,
            "Subscribed to status and intent topics"
        );
        Ok(())
    }

    /// Records status reports in place and queues intents for the worker.
    fn route_message(
        &self,
        topic: &str,
        payload: &[u8],
        intents: &mpsc::UnboundedSender<IncomingIntent>,
    ) {
        if !topic.starts_with(INTENT_PREFIX) {
            self.inner.router.route(topic, payload);
            return;
        }

        let intent = IncomingIntent {
            topic: topic.to_string(),
            payload: payload.to_vec(),
        };
        if intents.send(intent).is_err() {
            tracing::warn!(topic = %topic, "Intent worker stopped, dropping intent");
        }
    }

    fn route_intent(&self, topic: &str, payload: &[u8]) {
        let Some(handler) = self.inner.intents.read().clone() else {
            tracing::trace!(topic = %topic, "No intent handler, ignoring intent");
            return;
        };

        match handler.handle_payload(payload) {
            Ok(Some(reply)) => self.send_reply(&reply),
            Ok(None) => {}
            Err(e) => {
                tracing::warn!(topic = %topic, error = %e, "Dropping malformed intent");
            }
        }
    }

    fn send_reply(&self, reply: &SessionReply) {
        let body = match reply.body() {
            Ok(body) => body,
            Err(e) => {
                tracing::warn!(error = %e, "Failed to encode session reply");
                return;
            }
        };
        let outgoing = Outgoing {
            topic: reply.topic().to_string(),
            qos: QoS::AtLeastOnce,
            body,
        };
        if self.inner.outbox.send(outgoing).is_err() {
            tracing::warn!(topic = %reply.topic(), "Outbox closed, dropping session reply");
        }
    }

    /// Disconnects from the broker.
    ///
    /// # Errors
    ///
    /// Returns error if the disconnect operation fails.
    pub async fn disconnect(&self) -> Result<(), ProtocolError> {
        tracing::info!(
            host = %self.inner.config.host,
            port = %self.inner.config.port,
            "Disconnecting from MQTT broker"
        );

        self.stop_intents();
        self.inner
            .client
            .disconnect()
            .await
            .map_err(ProtocolError::Mqtt)?;

        self.inner.connected.store(false, Ordering::Release);
        Ok(())
    }
}

impl std::fmt::Debug for MqttBridge {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MqttBridge")
            .field("host", &self.inner.config.host)
            .field("port", &self.inner.config.port)
            .field("base_topic", &self.inner.config.base_topic)
            .field("connected", &self.is_connected())
            .finish()
    }
}

/// [`Publisher`] sending control messages to `{base_topic}/{device}/set`.
///
/// Publishing only queues the message; it never waits for the broker.
#[derive(Debug, Clone)]
pub struct MqttPublisher {
    outbox: mpsc::UnboundedSender<Outgoing>,
    base_topic: String,
}

impl Publisher for MqttPublisher {
    fn publish(&self, message: &ControlMessage) -> Result<(), ProtocolError> {
        let topic = message.topic(&self.base_topic);
        let body = message.body()?;
        tracing::debug!(topic = %topic, payload = %body, "Publishing control message");
        self.outbox
            .send(Outgoing {
                topic,
                qos: QoS::AtMostOnce,
                body,
            })
            .map_err(|_| ProtocolError::ChannelClosed("MQTT outbox".to_string()))
    }
}

/// Builder for an [`MqttBridge`].
///
/// # Examples
///
/// ```no_run
/// use std::time::Duration;
///
/// use voxlight::protocol::MqttBridge;
///
/// # async fn example() -> voxlight::Result<()> {
/// let bridge = MqttBridge::builder()
///     .host("192.168.1.50")
///     .port(1883)
///     .base_topic("zigbee")
///     .keep_alive(Duration::from_secs(60))
///     .connection_timeout(Duration::from_secs(5))
///     .build()
///     .await?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Default)]
pub struct MqttBridgeBuilder {
    config: MqttBridgeConfig,
    cache: Option<Arc<StateCache>>,
}

impl MqttBridgeBuilder {
    /// Sets the broker host address.
    #[must_use]
    pub fn host(mut self, host: impl Into<String>) -> Self {
        self.config.host = host.into();
        self
    }

    /// Sets the broker port (default: 1883).
    #[must_use]
    pub fn port(mut self, port: u16) -> Self {
        self.config.port = port;
        self
    }

    /// Sets authentication credentials.
    #[must_use]
    pub fn credentials(mut self, username: impl Into<String>, password: impl Into<String>) -> Self {
        self.config.credentials = Some((username.into(), password.into()));
        self
    }

    /// Sets the keep-alive interval (default: 30 seconds).
    #[must_use]
    pub fn keep_alive(mut self, duration: Duration) -> Self {
        self.config.keep_alive = duration;
        self
    }

    /// Sets the connection timeout (default: 10 seconds).
    #[must_use]
    pub fn connection_timeout(mut self, duration: Duration) -> Self {
        self.config.connection_timeout = duration;
        self
    }

    /// Sets the zigbee2mqtt base topic (default: `zigbee2mqtt`).
    #[must_use]
    pub fn base_topic(mut self, base_topic: impl Into<String>) -> Self {
        self.config.base_topic = base_topic.into();
        self
    }

    /// Records status reports into an existing cache instead of a new one.
    #[must_use]
    pub fn cache(mut self, cache: Arc<StateCache>) -> Self {
        self.cache = Some(cache);
        self
    }

    /// Connects to the broker and subscribes to status and intent topics.
    ///
    /// # Errors
    ///
    /// Returns error if:
    /// - Host is not set
    /// - Connection fails
    /// - Connection times out
    pub async fn build(self) -> Result<MqttBridge, ProtocolError> {
        if self.config.host.is_empty() {
            return Err(ProtocolError::InvalidAddress(
                "MQTT broker host is required".to_string(),
            ));
        }

        let counter = BRIDGE_CLIENT_ID_COUNTER.fetch_add(1, Ordering::Relaxed);
        let client_id = format!("voxlight_{}_{}", std::process::id(), counter);

        let mut mqtt_options = MqttOptions::new(&client_id, &self.config.host, self.config.port);
        mqtt_options.set_keep_alive(self.config.keep_alive);
        mqtt_options.set_clean_session(true);

        if let Some((ref username, ref password)) = self.config.credentials {
            mqtt_options.set_credentials(username, password);
        }

        let (client, event_loop) = AsyncClient::new(mqtt_options, REQUEST_CAPACITY);
        let (outbox, outbox_rx) = mpsc::unbounded_channel();
        tokio::spawn(forward_outgoing(client.clone(), outbox_rx));

        let router = StatusRouter::new(
            self.config.base_topic.clone(),
            self.cache.unwrap_or_default(),
        );
        let bridge = MqttBridge {
            inner: Arc::new(MqttBridgeInner {
                client,
                outbox,
                config: self.config.clone(),
                router,
                intents: RwLock::new(None),
                connected: AtomicBool::new(false),
            }),
        };

        let (intent_tx, intent_rx) = mpsc::unbounded_channel();
        tokio::spawn(handle_intent_queue(bridge.clone(), intent_rx));

        let (connack_tx, connack_rx) = oneshot::channel();
        let bridge_clone = bridge.clone();
        tokio::spawn(async move {
            handle_bridge_events(event_loop, bridge_clone, intent_tx, Some(connack_tx)).await;
        });

        let timeout = self.config.connection_timeout;
        match tokio::time::timeout(timeout, connack_rx).await {
            Ok(Ok(())) => {
                bridge.inner.connected.store(true, Ordering::Release);
                tracing::info!(
                    host = %self.config.host,
                    port = %self.config.port,
                    "Connected to MQTT broker"
                );
            }
            Ok(Err(_)) => {
                return Err(ProtocolError::ConnectionFailed(
                    "MQTT event loop terminated unexpectedly".to_string(),
                ));
            }
            Err(_) => {
                return Err(ProtocolError::ConnectionFailed(format!(
                    "MQTT connection timeout after {}s",
                    timeout.as_secs()
                )));
            }
        }

        bridge.subscribe().await?;
        Ok(bridge)
    }
}

/// Handles MQTT events for the bridge connection.
async fn handle_bridge_events(
    mut event_loop: EventLoop,
    bridge: MqttBridge,
    intents: mpsc::UnboundedSender<IncomingIntent>,
    mut connack_tx: Option<oneshot::Sender<()>>,
) {
    use rumqttc::{Event, Packet};

    loop {
        match event_loop.poll().await {
            Ok(Event::Incoming(Packet::ConnAck(connack))) => {
                tracing::debug!(?connack, "MQTT broker connected");
                bridge.inner.connected.store(true, Ordering::Release);
                if let Some(tx) = connack_tx.take() {
                    let _ = tx.send(());
                }
            }
            Ok(Event::Incoming(Packet::SubAck(suback))) => {
                tracing::debug!(?suback, "MQTT subscription acknowledged");
            }
            Ok(Event::Incoming(Packet::Publish(publish))) => {
                tracing::trace!(
                    topic = %publish.topic,
                    bytes = publish.payload.len(),
                    "MQTT message received"
                );
                bridge.route_message(&publish.topic, &publish.payload, &intents);
            }
            Ok(Event::Incoming(Packet::Disconnect)) => {
                tracing::info!("MQTT broker disconnected");
                bridge.inner.connected.store(false, Ordering::Release);
                break;
            }
            Ok(_) => {}
            Err(e) => {
                tracing::error!(error = %e, "MQTT bridge event loop error");
                bridge.inner.connected.store(false, Ordering::Release);
                break;
            }
        }
    }
}

/// Answers queued intents until the event loop stops.
async fn handle_intent_queue(
    bridge: MqttBridge,
    mut intents: mpsc::UnboundedReceiver<IncomingIntent>,
) {
    while let Some(intent) = intents.recv().await {
        bridge.route_intent(&intent.topic, &intent.payload);
    }
    tracing::debug!("Intent worker stopped");
}

/// Hands queued messages to the client, waiting whenever its request
/// channel is full.
async fn forward_outgoing(client: AsyncClient, mut outbox: mpsc::UnboundedReceiver<Outgoing>) {
    while let Some(message) = outbox.recv().await {
        if let Err(e) = client
            .publish(message.topic.as_str(), message.qos, false, message.body)
            .await
        {
            tracing::warn!(topic = %message.topic, error = %e, "Failed to publish message");
        }
    }
}
