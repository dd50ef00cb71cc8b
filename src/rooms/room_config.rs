// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Per-room configuration entries and request context.

use serde::{Deserialize, Serialize};

use crate::Capabilities;
use crate::types::DeviceId;

/// Configuration of one room: at most one controlled device, the
/// capabilities it declares and tunables for relative actions.
///
/// # Examples
///
/// ```
/// use voxlight::{Capabilities, Capability};
/// use voxlight::rooms::RoomConfig;
/// use voxlight::types::DeviceId;
///
/// let room = RoomConfig::new()
///     .with_device(DeviceId::new("kitchen_lamp").unwrap())
///     .with_capabilities(Capabilities::parse("brightness"))
///     .with_dim_step(40);
///
/// assert_eq!(room.dim_step(), 40);
/// assert!(room.capabilities.supports(&Capability::Brightness));
/// assert_eq!(voxlight::rooms::RoomConfig::new().dim_step(), 50);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoomConfig {
    /// The controlled device, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub device: Option<DeviceId>,
    /// Declared capabilities as a comma-separated list.
    #[serde(default)]
    pub capabilities: Capabilities,
    /// Brightness step for relative dimming (1-254, default 50).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dim_step: Option<u16>,
}

impl RoomConfig {
    /// Dim step used when none is configured.
    pub const DEFAULT_DIM_STEP: u8 = 50;

    /// Creates an empty room entry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the controlled device.
    #[must_use]
    pub fn with_device(mut self, device: DeviceId) -> Self {
        self.device = Some(device);
        self
    }

    /// Sets the declared capabilities.
    #[must_use]
    pub fn with_capabilities(mut self, capabilities: Capabilities) -> Self {
        self.capabilities = capabilities;
        self
    }

    /// Sets the dim step.
    #[must_use]
    pub fn with_dim_step(mut self, step: u8) -> Self {
        self.dim_step = Some(u16::from(step));
        self
    }

    /// Returns the dim step, falling back to the default when the configured
    /// value is missing or outside 1..=254.
    #[must_use]
    pub fn dim_step(&self) -> u8 {
        self.dim_step
            .and_then(|step| u8::try_from(step).ok())
            .filter(|step| (1..=254).contains(step))
            .unwrap_or(Self::DEFAULT_DIM_STEP)
    }
}

/// Location context of a spoken request.
///
/// `site_id` names the satellite that heard the request; `location` is the
/// room the user named, if any. Without a named location the request
/// targets the room the satellite is in.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RoomContext {
    /// The satellite that captured the request.
    pub site_id: String,
    /// The room named in the request.
    pub location: Option<String>,
}

impl RoomContext {
    /// Creates a context for a request without a named room.
    #[must_use]
    pub fn here(site_id: impl Into<String>) -> Self {
        Self {
            site_id: site_id.into(),
            location: None,
        }
    }

    /// Creates a context for a request naming `location`.
    #[must_use]
    pub fn named(site_id: impl Into<String>, location: impl Into<String>) -> Self {
        Self {
            site_id: site_id.into(),
            location: Some(location.into()),
        }
    }
}
