// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Integration tests for the MQTT bridge using mockforge-mqtt.

#![cfg(feature = "mqtt")]

use std::sync::Arc;
use std::time::Duration;

use mockforge_mqtt::broker::MqttConfig;
use mockforge_mqtt::start_mqtt_server;
use rumqttc::{AsyncClient, Event, MqttOptions, Packet, QoS};
use tokio::sync::{mpsc, oneshot};
use tokio::time::{sleep, timeout};
use voxlight::command::{ControlMessage, ControlPayload};
use voxlight::intent::{END_SESSION_TOPIC, IntentConfig, IntentHandler};
use voxlight::protocol::{MqttBridge, Publisher};
use voxlight::rooms::{RoomConfig, RoomDirectory};
use voxlight::{DeviceId, DispatcherBuilder, ProtocolError, SkillConfig, StateCache};

/// Helper to find an available port for testing.
fn get_test_port() -> u16 {
    use std::sync::atomic::{AtomicU16, Ordering};
    static PORT_COUNTER: AtomicU16 = AtomicU16::new(18950);
    PORT_COUNTER.fetch_add(1, Ordering::SeqCst)
}

/// Starts a mock MQTT broker on the given port.
async fn start_mock_broker(port: u16) {
    let config = MqttConfig {
        port,
        host: "127.0.0.1".to_string(),
        ..Default::default()
    };

    tokio::spawn(async move {
        let _ = start_mqtt_server(config).await;
    });

    // Give the broker time to start, bind to port, and be ready to accept connections
    sleep(Duration::from_millis(500)).await;
}

/// Connects a second client subscribed to `filters` and returns the client
/// with a stream of `(topic, payload)` pairs it receives.
async fn start_observer(
    port: u16,
    filters: &[&str],
) -> (AsyncClient, mpsc::UnboundedReceiver<(String, String)>) {
    let options = MqttOptions::new(format!("observer_{port}"), "127.0.0.1", port);
    let (client, mut event_loop) = AsyncClient::new(options, 10);
    for filter in filters {
        client.subscribe(*filter, QoS::AtMostOnce).await.unwrap();
    }

    let expected_acks = filters.len();
    let (messages_tx, messages_rx) = mpsc::unbounded_channel();
    let (ready_tx, ready_rx) = oneshot::channel();
    tokio::spawn(async move {
        let mut ready = Some(ready_tx);
        let mut acks = 0;
        while let Ok(event) = event_loop.poll().await {
            match event {
                Event::Incoming(Packet::SubAck(_)) => {
                    acks += 1;
                    if acks == expected_acks
                        && let Some(ready) = ready.take()
                    {
                        let _ = ready.send(());
                    }
                }
                Event::Incoming(Packet::Publish(publish)) => {
                    let payload = String::from_utf8_lossy(&publish.payload).into_owned();
                    let _ = messages_tx.send((publish.topic.clone(), payload));
                }
                _ => {}
            }
        }
    });

    timeout(Duration::from_secs(5), ready_rx)
        .await
        .expect("observer subscriptions not acknowledged")
        .unwrap();
    (client, messages_rx)
}

// ============================================================================
// Bridge Connection Tests
// ============================================================================

mod bridge_connection {
    use super::*;

    #[tokio::test]
    async fn connect_to_broker() {
        let port = get_test_port();
        start_mock_broker(port).await;

        let result = MqttBridge::builder()
            .host("127.0.0.1")
            .port(port)
            .build()
            .await;

        assert!(result.is_ok(), "Failed to connect: {:?}", result.err());

        let bridge = result.unwrap();
        assert!(bridge.is_connected());
        assert_eq!(bridge.port(), port);
        assert_eq!(bridge.base_topic(), "zigbee2mqtt");
        assert!(bridge.cache().is_empty());
    }

    #[tokio::test]
    async fn connect_from_config() {
        let port = get_test_port();
        start_mock_broker(port).await;

        let config = SkillConfig::from_json(&format!(
            r#"{{"base_topic":"zigbee","broker":{{"host":"127.0.0.1","port":{port}}}}}"#
        ))
        .unwrap();
        let bridge = config.bridge().build().await.unwrap();

        assert_eq!(bridge.host(), "127.0.0.1");
        assert_eq!(bridge.base_topic(), "zigbee");
    }

    #[tokio::test]
    async fn shares_existing_cache() {
        let port = get_test_port();
        start_mock_broker(port).await;

        let cache = Arc::new(StateCache::new());
        let bridge = MqttBridge::builder()
            .host("127.0.0.1")
            .port(port)
            .cache(Arc::clone(&cache))
            .build()
            .await
            .unwrap();

        assert!(Arc::ptr_eq(bridge.cache(), &cache));
    }

    #[tokio::test]
    async fn connection_refused_times_out() {
        // Nothing listens on this port.
        let port = get_test_port();

        let result = MqttBridge::builder()
            .host("127.0.0.1")
            .port(port)
            .connection_timeout(Duration::from_millis(300))
            .build()
            .await;

        assert!(matches!(result, Err(ProtocolError::ConnectionFailed(_))));
    }

    #[tokio::test]
    async fn disconnect() {
        let port = get_test_port();
        start_mock_broker(port).await;

        let bridge = MqttBridge::builder()
            .host("127.0.0.1")
            .port(port)
            .build()
            .await
            .unwrap();

        assert!(bridge.disconnect().await.is_ok());
        assert!(!bridge.is_connected());
    }
}

// ============================================================================
// Publishing Tests
// ============================================================================

mod publishing {
    use super::*;

    #[tokio::test]
    async fn publish_control_message() {
        let port = get_test_port();
        start_mock_broker(port).await;

        let bridge = MqttBridge::builder()
            .host("127.0.0.1")
            .port(port)
            .build()
            .await
            .unwrap();

        let message = ControlMessage::new(DeviceId::new("desk").unwrap(), ControlPayload::on());
        assert!(bridge.publisher().publish(&message).is_ok());
    }

    #[tokio::test]
    async fn serve_intents() {
        let port = get_test_port();
        start_mock_broker(port).await;

        let bridge = MqttBridge::builder()
            .host("127.0.0.1")
            .port(port)
            .build()
            .await
            .unwrap();

        let dispatcher =
            DispatcherBuilder::new(Arc::new(RoomDirectory::new()), Arc::new(bridge.publisher()))
                .cache(Arc::clone(bridge.cache()))
                .build();
        bridge.serve_intents(Arc::new(IntentHandler::new(
            dispatcher,
            IntentConfig::default(),
        )));
        bridge.stop_intents();

        assert!(bridge.is_connected());
    }
}

// ============================================================================
// Intent Round Trips
// ============================================================================

mod intent_round_trip {
    use super::*;

    const ROOM_COUNT: usize = 15;

    #[tokio::test]
    async fn fan_out_reaches_every_device() {
        let port = get_test_port();
        start_mock_broker(port).await;

        let bridge = MqttBridge::builder()
            .host("127.0.0.1")
            .port(port)
            .build()
            .await
            .unwrap();

        let rooms = (0..ROOM_COUNT).fold(RoomDirectory::new(), |rooms, n| {
            rooms.with_room(
                format!("room_{n}"),
                RoomConfig::new().with_device(DeviceId::new(format!("lamp_{n}")).unwrap()),
            )
        });
        let dispatcher = DispatcherBuilder::new(Arc::new(rooms), Arc::new(bridge.publisher()))
            .cache(Arc::clone(bridge.cache()))
            .build();
        bridge.serve_intents(Arc::new(IntentHandler::new(
            dispatcher,
            IntentConfig::default(),
        )));

        let (observer, mut received) =
            start_observer(port, &["zigbee2mqtt/+/set", END_SESSION_TOPIC]).await;
        // Let the bridge's own subscriptions settle.
        sleep(Duration::from_millis(200)).await;

        let intent = r#"{"sessionId":"fan-out","siteId":"default",
            "intent":{"intentName":"domi:LampenAusSchalten","confidenceScore":0.95},
            "slots":[{"slotName":"location","value":{"kind":"Custom","value":"everywhere"}}]}"#;
        observer
            .publish(
                "hermes/intent/domi:LampenAusSchalten",
                QoS::AtMostOnce,
                false,
                intent,
            )
            .await
            .unwrap();

        let mut switched_off = Vec::new();
        let mut end_session = None;
        let collect = async {
            while switched_off.len() < ROOM_COUNT || end_session.is_none() {
                let Some((topic, payload)) = received.recv().await else {
                    break;
                };
                if topic == END_SESSION_TOPIC {
                    end_session = Some(payload);
                } else {
                    assert_eq!(payload, r#"{"state":"OFF"}"#);
                    switched_off.push(topic);
                }
            }
        };
        let _ = timeout(Duration::from_secs(5), collect).await;

        switched_off.sort();
        let mut expected: Vec<String> = (0..ROOM_COUNT)
            .map(|n| format!("zigbee2mqtt/lamp_{n}/set"))
            .collect();
        expected.sort();
        assert_eq!(switched_off, expected);

        let reply: serde_json::Value =
            serde_json::from_str(&end_session.expect("no endSession reply")).unwrap();
        assert_eq!(reply["sessionId"], "fan-out");
        assert!(reply["text"].is_string());
    }
}

// Status reports are covered by the StatusRouter unit tests in
// src/protocol/status_router.rs.
