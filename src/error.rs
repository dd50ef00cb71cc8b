// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Error types for the `voxlight` library.
//!
//! The hierarchy separates user-facing dispatch failures, which are turned
//! into spoken replies at the dispatcher boundary, from transport, parsing
//! and configuration failures, which are logged or returned to the host.

use thiserror::Error;

/// The main error type for this library.
#[derive(Debug, Error)]
pub enum Error {
    /// A voice request could not be carried out.
    #[error("dispatch error: {0}")]
    Dispatch(#[from] DispatchError),

    /// Error occurred during value validation.
    #[error("value error: {0}")]
    Value(#[from] ValueError),

    /// Error occurred during protocol communication.
    #[error("protocol error: {0}")]
    Protocol(#[from] ProtocolError),

    /// Error occurred while parsing a message.
    #[error("parse error: {0}")]
    Parse(#[from] ParseError),

    /// The configuration could not be loaded or is invalid.
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),
}

/// User-facing failures raised while handling a voice request.
///
/// None of these are fatal. The dispatcher converts each of them into a
/// spoken reply and never publishes a control message when one occurs.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DispatchError {
    /// No device is configured for the addressed room.
    #[error("{0}")]
    UnknownDevice(String),

    /// The addressed device does not declare a required capability.
    #[error("{0}")]
    Capability(String),

    /// A slot value is missing or not understood; the user should be asked
    /// for `slot` again.
    #[error("{prompt}")]
    Clarification {
        /// The question to ask the user.
        prompt: String,
        /// The slot to re-request.
        slot: String,
    },
}

impl DispatchError {
    /// Creates a clarification error for the given slot.
    #[must_use]
    pub fn clarify(prompt: impl Into<String>, slot: impl Into<String>) -> Self {
        Self::Clarification {
            prompt: prompt.into(),
            slot: slot.into(),
        }
    }
}

/// Errors related to value validation and constraints.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ValueError {
    /// A numeric value is outside the allowed range.
    #[error("value {actual} is out of range [{min}, {max}]")]
    OutOfRange {
        /// Minimum allowed value.
        min: i64,
        /// Maximum allowed value.
        max: i64,
        /// The actual value that was provided.
        actual: i64,
    },

    /// A percentage is not a finite number within [0, 100].
    #[error("percentage {0} is out of range [0, 100]")]
    InvalidPercent(f64),

    /// An invalid power state string was provided.
    #[error("invalid power state: {0}")]
    InvalidPowerState(String),

    /// An invalid hex color string was provided.
    #[error("invalid hex color: {0}")]
    InvalidHexColor(String),

    /// A dim direction other than higher/lower was provided.
    #[error("invalid dim direction: {0}")]
    InvalidDirection(String),

    /// An empty device identifier was provided.
    #[error("device identifier must not be empty")]
    EmptyDeviceId,
}

/// Errors related to MQTT communication.
#[derive(Debug, Error)]
pub enum ProtocolError {
    /// MQTT client request failed.
    #[cfg(feature = "mqtt")]
    #[error("MQTT error: {0}")]
    Mqtt(#[from] rumqttc::ClientError),

    /// Connection to the broker failed.
    #[error("connection failed: {0}")]
    ConnectionFailed(String),

    /// Invalid broker address.
    #[error("invalid address: {0}")]
    InvalidAddress(String),

    /// The outgoing message queue has shut down.
    #[error("channel closed: {0}")]
    ChannelClosed(String),

    /// Serializing an outgoing payload failed.
    #[error("failed to encode payload: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Errors related to parsing incoming messages.
#[derive(Debug, Error)]
pub enum ParseError {
    /// JSON parsing failed.
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    /// The payload is not valid UTF-8.
    #[error("payload is not valid UTF-8")]
    NotUtf8,

    /// Unexpected payload format.
    #[error("unexpected payload format: {0}")]
    UnexpectedFormat(String),
}

/// Errors related to loading and validating the configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The configuration file could not be read.
    #[error("failed to read configuration: {0}")]
    Io(#[from] std::io::Error),

    /// The configuration document is not valid JSON for the schema.
    #[error("invalid configuration document: {0}")]
    Json(#[from] serde_json::Error),

    /// A room's dim step is outside [1, 254].
    #[error("room {room}: dim_step {value} is out of range [1, 254]")]
    InvalidDimStep {
        /// The room name.
        room: String,
        /// The configured value.
        value: u16,
    },

    /// A confidence threshold is outside [0, 1].
    #[error("intent {intent}: min_confidence {value} is out of range [0, 1]")]
    InvalidConfidence {
        /// The intent name.
        intent: String,
        /// The configured value.
        value: f32,
    },

    /// The broker host is empty.
    #[error("MQTT broker host is required")]
    MissingHost,
}

/// A specialized Result type for this library.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn value_error_display() {
        let err = ValueError::OutOfRange {
            min: 0,
            max: 254,
            actual: 300,
        };
        assert_eq!(err.to_string(), "value 300 is out of range [0, 254]");
    }

    #[test]
    fn dispatch_error_displays_user_message() {
        let err = DispatchError::Capability("This device can be only switched on or off.".into());
        assert_eq!(err.to_string(), "This device can be only switched on or off.");

        let err = DispatchError::clarify("which color?", "color");
        assert_eq!(err.to_string(), "which color?");
    }

    #[test]
    fn error_from_dispatch_error() {
        let err: Error = DispatchError::UnknownDevice("unknown device".into()).into();
        assert!(matches!(err, Error::Dispatch(DispatchError::UnknownDevice(_))));
    }

    #[test]
    fn config_error_display() {
        let err = ConfigError::InvalidDimStep {
            room: "kitchen".to_string(),
            value: 0,
        };
        assert_eq!(
            err.to_string(),
            "room kitchen: dim_step 0 is out of range [1, 254]"
        );
    }
}
