// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Outgoing control messages.

use serde::{Deserialize, Serialize};

use crate::types::{Brightness, DeviceId, PowerState, RgbColor};

/// Key/value body of a control message.
///
/// Only the fields that are set are serialized.
///
/// # Examples
///
/// ```
/// use voxlight::command::ControlPayload;
/// use voxlight::types::Brightness;
///
/// let payload = ControlPayload::on().with_brightness(Brightness::new(127).unwrap());
/// assert_eq!(
///     serde_json::to_string(&payload).unwrap(),
///     r#"{"state":"ON","brightness":127}"#
/// );
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ControlPayload {
    /// Requested power state.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<PowerState>,
    /// Requested brightness.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub brightness: Option<Brightness>,
    /// Requested color.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<RgbColor>,
}

impl ControlPayload {
    /// `{state: ON}`
    #[must_use]
    pub fn on() -> Self {
        Self {
            state: Some(PowerState::On),
            ..Self::default()
        }
    }

    /// `{state: OFF}`
    #[must_use]
    pub fn off() -> Self {
        Self {
            state: Some(PowerState::Off),
            ..Self::default()
        }
    }

    /// `{brightness: N}`
    #[must_use]
    pub fn brightness(brightness: Brightness) -> Self {
        Self {
            brightness: Some(brightness),
            ..Self::default()
        }
    }

    /// Adds a brightness field.
    #[must_use]
    pub fn with_brightness(mut self, brightness: Brightness) -> Self {
        self.brightness = Some(brightness);
        self
    }

    /// Adds a color field.
    #[must_use]
    pub fn with_color(mut self, color: RgbColor) -> Self {
        self.color = Some(color);
        self
    }
}

/// A control payload addressed to one device.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ControlMessage {
    /// The target device.
    pub device: DeviceId,
    /// The payload.
    pub payload: ControlPayload,
}

impl ControlMessage {
    /// Creates a control message.
    #[must_use]
    pub fn new(device: DeviceId, payload: ControlPayload) -> Self {
        Self { device, payload }
    }

    /// Returns the publish topic: `{base_topic}/{device}/set`.
    #[must_use]
    pub fn topic(&self, base_topic: &str) -> String {
        format!("{base_topic}/{}/set", self.device)
    }

    /// Serializes the payload as JSON.
    ///
    /// # Errors
    ///
    /// Returns error if serialization fails.
    pub fn body(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(&self.payload)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn off_payload_json() {
        assert_eq!(
            serde_json::to_string(&ControlPayload::off()).unwrap(),
            r#"{"state":"OFF"}"#
        );
    }

    #[test]
    fn color_payload_json() {
        let payload = ControlPayload::on().with_color(RgbColor::new(0, 128, 255));
        assert_eq!(
            serde_json::to_string(&payload).unwrap(),
            r#"{"state":"ON","color":{"r":0,"g":128,"b":255}}"#
        );
    }

    #[test]
    fn brightness_only_payload_json() {
        let payload = ControlPayload::brightness(Brightness::new(80).unwrap());
        assert_eq!(serde_json::to_string(&payload).unwrap(), r#"{"brightness":80}"#);
    }

    #[test]
    fn message_topic() {
        let message = ControlMessage::new(DeviceId::new("desk").unwrap(), ControlPayload::on());
        assert_eq!(message.topic("zigbee2mqtt"), "zigbee2mqtt/desk/set");
        assert_eq!(message.body().unwrap(), r#"{"state":"ON"}"#);
    }
}
