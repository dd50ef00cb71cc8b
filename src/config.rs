// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Skill configuration.
//!
//! A single JSON document configures the broker, the rooms, the intent
//! names and the reply texts:
//!
//! ```json
//! {
//!   "base_topic": "zigbee2mqtt",
//!   "broker": { "host": "192.168.1.50", "username": "skill", "password": "secret" },
//!   "rooms": {
//!     "kitchen": { "device": "kitchen_lamp", "capabilities": "brightness, color" },
//!     "hall":    { "device": "hall_switch" }
//!   },
//!   "sites": { "satellite-1": "kitchen" },
//!   "all_rooms": ["everywhere", "all rooms"],
//!   "messages": { "confirmations": ["okay", "done"] }
//! }
//! ```
//!
//! Every section is optional except the broker host.

use std::path::Path;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::dispatcher::DispatcherBuilder;
use crate::error::ConfigError;
use crate::intent::IntentConfig;
use crate::protocol::{DEFAULT_BASE_TOPIC, Publisher};
use crate::reply::Messages;
use crate::rooms::{RoomDirectory, RoomProvider};

fn default_base_topic() -> String {
    DEFAULT_BASE_TOPIC.to_string()
}

const fn default_port() -> u16 {
    1883
}

const fn default_keep_alive_secs() -> u64 {
    30
}

const fn default_connection_timeout_secs() -> u64 {
    10
}

/// MQTT broker settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BrokerConfig {
    /// Broker host name or address.
    #[serde(default)]
    pub host: String,
    /// Broker port.
    #[serde(default = "default_port")]
    pub port: u16,
    /// User name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    /// Password.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    /// Keep-alive interval in seconds.
    #[serde(default = "default_keep_alive_secs")]
    pub keep_alive_secs: u64,
    /// Connection timeout in seconds.
    #[serde(default = "default_connection_timeout_secs")]
    pub connection_timeout_secs: u64,
}

impl Default for BrokerConfig {
    fn default() -> Self {
        Self {
            host: String::new(),
            port: default_port(),
            username: None,
            password: None,
            keep_alive_secs: default_keep_alive_secs(),
            connection_timeout_secs: default_connection_timeout_secs(),
        }
    }
}

/// The complete skill configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkillConfig {
    /// zigbee2mqtt base topic.
    #[serde(default = "default_base_topic")]
    pub base_topic: String,
    /// Broker connection.
    #[serde(default)]
    pub broker: BrokerConfig,
    /// Rooms, satellite sites and fan-out words.
    #[serde(flatten)]
    pub rooms: RoomDirectory,
    /// Intent names and thresholds.
    #[serde(default)]
    pub intents: IntentConfig,
    /// Reply texts.
    #[serde(default)]
    pub messages: Messages,
}

impl Default for SkillConfig {
    fn default() -> Self {
        Self {
            base_topic: default_base_topic(),
            broker: BrokerConfig::default(),
            rooms: RoomDirectory::default(),
            intents: IntentConfig::default(),
            messages: Messages::default(),
        }
    }
}

impl SkillConfig {
    /// Parses and validates a JSON configuration document.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the document is malformed or invalid.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads, parses and validates a JSON configuration file.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the file cannot be read or is invalid.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        tracing::debug!(path = %path.display(), "Loading configuration");
        Self::from_json(&std::fs::read_to_string(path)?)
    }

    /// Checks values serde cannot check.
    ///
    /// # Errors
    ///
    /// Returns the first problem found.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.broker.host.trim().is_empty() {
            return Err(ConfigError::MissingHost);
        }
        for (name, room) in self.rooms.rooms() {
            if let Some(step) = room.dim_step
                && !(1..=254).contains(&step)
            {
                return Err(ConfigError::InvalidDimStep {
                    room: name.to_string(),
                    value: step,
                });
            }
        }
        self.intents.validate()
    }

    /// Returns a dispatcher builder preloaded with the rooms and messages.
    pub fn dispatcher(&self, publisher: Arc<dyn Publisher>) -> DispatcherBuilder {
        DispatcherBuilder::new(Arc::new(self.rooms.clone()), publisher)
            .messages(self.messages.clone())
    }

    /// Returns a bridge builder preloaded with the broker settings.
    #[cfg(feature = "mqtt")]
    #[must_use]
    pub fn bridge(&self) -> crate::protocol::MqttBridgeBuilder {
        let broker = &self.broker;
        let builder = crate::protocol::MqttBridge::builder()
            .host(broker.host.clone())
            .port(broker.port)
            .keep_alive(std::time::Duration::from_secs(broker.keep_alive_secs))
            .connection_timeout(std::time::Duration::from_secs(
                broker.connection_timeout_secs,
            ))
            .base_topic(self.base_topic.clone());
        match (&broker.username, &broker.password) {
            (Some(username), Some(password)) => builder.credentials(username, password),
            _ => builder,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Capability;
    use crate::rooms::RoomContext;

    const DOCUMENT: &str = r#"{
        "base_topic": "zigbee",
        "broker": {"host": "10.0.0.2", "username": "skill", "password": "pw"},
        "rooms": {
            "kitchen": {"device": "kitchen_lamp", "capabilities": "brightness, color", "dim_step": 30},
            "hall": {"device": "hall_switch"}
        },
        "sites": {"sat-1": "kitchen"},
        "intents": {"dim": {"name": "lights:Dim", "min_confidence": 0.8}},
        "messages": {"confirmations": ["okay"]}
    }"#;

    #[test]
    fn parse_full_document() {
        let config = SkillConfig::from_json(DOCUMENT).unwrap();
        assert_eq!(config.base_topic, "zigbee");
        assert_eq!(config.broker.port, 1883);
        assert_eq!(config.broker.username.as_deref(), Some("skill"));

        let (name, kitchen) = config.rooms.room(&RoomContext::here("sat-1")).unwrap();
        assert_eq!(name, "kitchen");
        assert!(kitchen.capabilities.supports(&Capability::Color));
        assert_eq!(kitchen.dim_step(), 30);
        assert!(config.rooms.is_all_rooms(&RoomContext::named("sat-1", "everywhere")));

        assert_eq!(config.intents.dim.name, "lights:Dim");
        assert_eq!(config.intents.switch_on.name, "domi:LampenAnSchalten");
        assert_eq!(config.messages.confirmations, vec!["okay".to_string()]);
        assert_eq!(config.messages.already_on, "It is already on");
    }

    #[test]
    fn defaults_apply() {
        let config = SkillConfig::from_json(r#"{"broker":{"host":"mqtt"}}"#).unwrap();
        assert_eq!(config.base_topic, "zigbee2mqtt");
        assert_eq!(config.broker.keep_alive_secs, 30);
        assert!(config.rooms.rooms().is_empty());
    }

    #[test]
    fn missing_host_is_rejected() {
        assert!(matches!(
            SkillConfig::from_json("{}"),
            Err(ConfigError::MissingHost)
        ));
    }

    #[test]
    fn invalid_dim_step_is_rejected() {
        let err = SkillConfig::from_json(
            r#"{"broker":{"host":"mqtt"},"rooms":{"attic":{"device":"a","dim_step":0}}}"#,
        )
        .unwrap_err();
        assert!(matches!(
            err,
            ConfigError::InvalidDimStep { ref room, value: 0 } if room == "attic"
        ));
    }

    #[test]
    fn malformed_document_is_rejected() {
        assert!(matches!(
            SkillConfig::from_json("{"),
            Err(ConfigError::Json(_))
        ));
    }

    #[test]
    fn missing_file_is_io_error() {
        assert!(matches!(
            SkillConfig::from_path("/nonexistent/voxlight.json"),
            Err(ConfigError::Io(_))
        ));
    }
}
