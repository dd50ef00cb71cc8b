// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Routing of device status reports into the state cache.
//!
//! ```text
//! MQTT Message: zigbee2mqtt/kitchen_lamp → {"state":"ON","brightness":120}
//!                     ↓
//!             StatusRouter.route()
//!                     ↓
//!       device "kitchen_lamp", JSON object payload
//!                     ↓
//!        StateCache.record() replaces the snapshot
//! ```
//!
//! Reports that cannot be parsed are logged and dropped; they never touch
//! the cache.

use std::sync::Arc;

use crate::state::{DeviceStatus, StateCache};
use crate::types::DeviceId;

/// Topic segment zigbee2mqtt uses for its own bridge messages.
const BRIDGE_SEGMENT: &str = "bridge";

/// Routes `{base_topic}/{device}` status reports into a [`StateCache`].
#[derive(Debug, Clone)]
pub struct StatusRouter {
    base_topic: String,
    cache: Arc<StateCache>,
}

impl StatusRouter {
    /// Creates a router for `base_topic` feeding `cache`.
    #[must_use]
    pub fn new(base_topic: impl Into<String>, cache: Arc<StateCache>) -> Self {
        Self {
            base_topic: base_topic.into(),
            cache,
        }
    }

    /// Returns the wildcard filter matching every device status topic.
    #[must_use]
    pub fn subscription(&self) -> String {
        format!("{}/+", self.base_topic)
    }

    /// Returns the cache this router feeds.
    #[must_use]
    pub fn cache(&self) -> &Arc<StateCache> {
        &self.cache
    }

    /// Routes one status report.
    ///
    /// An empty payload removes the device from the cache. Returns `true` if
    /// the report was accepted.
    pub fn route(&self, topic: &str, payload: &[u8]) -> bool {
        let Some(device) = self.device_of(topic) else {
            tracing::trace!(topic = %topic, "Ignoring non-status topic");
            return false;
        };

        if payload.is_empty() {
            tracing::debug!(device = %device, "Device removed");
            return self.cache.forget(device.as_str());
        }

        let Ok(text) = std::str::from_utf8(payload) else {
            tracing::warn!(device = %device, "Dropping status report: payload is not UTF-8");
            return false;
        };

        match DeviceStatus::from_payload(text) {
            Ok(status) => {
                tracing::debug!(
                    device = %device,
                    fields = status.len(),
                    "Recording device status"
                );
                self.cache.record(device, status);
                true
            }
            Err(e) => {
                tracing::warn!(
                    device = %device,
                    error = %e,
                    "Dropping malformed status report"
                );
                false
            }
        }
    }

    /// Extracts the device identifier from a `{base_topic}/{device}` topic.
    fn device_of(&self, topic: &str) -> Option<DeviceId> {
        let device = topic
            .strip_prefix(self.base_topic.as_str())?
            .strip_prefix('/')?;
        if device.contains('/') || device == BRIDGE_SEGMENT {
            return None;
        }
        DeviceId::new(device).ok()
    }
}
