// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Message bus plumbing.
//!
//! - [`Publisher`]: the outgoing seam the dispatcher writes control messages to
//! - [`StatusRouter`]: feeds `{base_topic}/{device}` status reports into the
//!   state cache
//! - [`MqttBridge`]: the MQTT connection that carries both, plus Hermes
//!   intents and session replies (feature `mqtt`)

#[cfg(feature = "mqtt")]
mod mqtt_bridge;
mod status_router;

#[cfg(feature = "mqtt")]
pub use mqtt_bridge::{MqttBridge, MqttBridgeBuilder, MqttBridgeConfig, MqttPublisher};
pub use status_router::StatusRouter;

use crate::command::ControlMessage;
use crate::error::ProtocolError;

/// Default base topic of the zigbee2mqtt namespace.
pub const DEFAULT_BASE_TOPIC: &str = "zigbee2mqtt";

/// Sends control messages to devices.
///
/// Publishing is fire-and-forget: implementations must not block waiting
/// for an acknowledgment.
pub trait Publisher: Send + Sync {
    /// Publishes one control message.
    ///
    /// # Errors
    ///
    /// Returns `ProtocolError` if the message could not be handed to the
    /// transport.
    fn publish(&self, message: &ControlMessage) -> Result<(), ProtocolError>;
}
