// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! `voxlight` - voice control for zigbee2mqtt lights and switches.
//!
//! Recognized voice intents are turned into control messages for devices on
//! an MQTT bus. Device status reports are kept in a live cache so requests
//! can depend on the current state: a lamp that is already on is not
//! switched on again, and dimming is relative to the reported brightness.
//!
//! # Supported Actions
//!
//! - **Switch on/off**, optionally at a brightness percentage
//! - **Change color** by name (CSS color names by default)
//! - **Dim** brighter or lower by a per-room step
//! - **All rooms** fan-out ("switch off the lights everywhere")
//!
//! Each room names at most one device and declares its capabilities
//! (`brightness`, `color`). Requests a device cannot carry out are refused
//! with a spoken reply instead of a bus message.
//!
//! # Quick Start
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use voxlight::SkillConfig;
//! use voxlight::intent::IntentHandler;
//!
//! #[tokio::main]
//! async fn main() -> voxlight::Result<()> {
//!     let config = SkillConfig::from_path("voxlight.json")?;
//!
//!     let bridge = config.bridge().build().await?;
//!     let dispatcher = config
//!         .dispatcher(Arc::new(bridge.publisher()))
//!         .cache(Arc::clone(bridge.cache()))
//!         .build();
//!     bridge.serve_intents(Arc::new(IntentHandler::new(dispatcher, config.intents.clone())));
//!
//!     tokio::time::sleep(std::time::Duration::from_secs(3600)).await;
//!     bridge.disconnect().await?;
//!     Ok(())
//! }
//! ```
//!
//! ## Without MQTT
//!
//! The dispatcher only needs a [`Publisher`](protocol::Publisher); the state
//! cache can be fed directly:
//!
//! ```
//! use std::sync::Arc;
//!
//! use voxlight::command::{Action, ActionRequest, ControlMessage};
//! use voxlight::error::ProtocolError;
//! use voxlight::protocol::Publisher;
//! use voxlight::reply::Reply;
//! use voxlight::rooms::{RoomConfig, RoomContext, RoomDirectory};
//! use voxlight::state::DeviceStatus;
//! use voxlight::types::DeviceId;
//! use voxlight::DispatcherBuilder;
//!
//! struct Print;
//!
//! impl Publisher for Print {
//!     fn publish(&self, message: &ControlMessage) -> Result<(), ProtocolError> {
//!         println!("{} {}", message.topic("zigbee2mqtt"), message.body()?);
//!         Ok(())
//!     }
//! }
//!
//! let lamp = DeviceId::new("hall_lamp").unwrap();
//! let rooms = RoomDirectory::new().with_room("hall", RoomConfig::new().with_device(lamp.clone()));
//! let dispatcher = DispatcherBuilder::new(Arc::new(rooms), Arc::new(Print)).build();
//!
//! dispatcher
//!     .cache()
//!     .record(lamp, DeviceStatus::from_payload(r#"{"state":"ON"}"#).unwrap());
//!
//! let request = ActionRequest::new(
//!     RoomContext::here("hall"),
//!     Action::SwitchOn { brightness: None },
//! );
//! assert_eq!(dispatcher.handle(&request), Reply::Say("It is already on".into()));
//! ```

mod capabilities;
pub mod color;
pub mod command;
mod config;
mod dispatcher;
pub mod error;
pub mod intent;
pub mod protocol;
pub mod reply;
pub mod rooms;
pub mod state;
pub mod types;

pub use capabilities::{Capabilities, Capability};
pub use config::{BrokerConfig, SkillConfig};
pub use dispatcher::{Dispatcher, DispatcherBuilder};
pub use error::{
    ConfigError, DispatchError, Error, ParseError, ProtocolError, Result, ValueError,
};
#[cfg(feature = "mqtt")]
pub use protocol::{MqttBridge, MqttBridgeBuilder};
pub use protocol::{Publisher, StatusRouter};
pub use reply::Reply;
pub use state::{DeviceStatus, StateCache};
pub use types::{Brightness, DeviceId, Percent, PowerState, RgbColor};
