// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Device state cache.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;
use serde_json::Value;

use crate::types::DeviceId;

use super::DeviceStatus;

/// Last-known status of every device that has reported.
///
/// Each device maps to an immutable, reference-counted [`DeviceStatus`].
/// [`record`](Self::record) swaps the whole snapshot under the write lock,
/// so readers see either the old or the new report and never a mix of both.
/// A request should take one [`snapshot`](Self::snapshot) and read only from
/// it.
///
/// A device missing from the cache is *unknown*, which is distinct from a
/// device that reported `OFF`.
///
/// # Examples
///
/// ```
/// use voxlight::state::{DeviceStatus, StateCache};
/// use voxlight::types::DeviceId;
///
/// let cache = StateCache::new();
/// let lamp = DeviceId::new("lamp").unwrap();
/// assert_eq!(cache.get(lamp.as_str(), "state"), None);
///
/// cache.record(lamp.clone(), DeviceStatus::from_payload(r#"{"state":"ON"}"#).unwrap());
/// assert_eq!(cache.get(lamp.as_str(), "state"), Some(serde_json::json!("ON")));
/// ```
#[derive(Debug, Default)]
pub struct StateCache {
    devices: RwLock<HashMap<DeviceId, Arc<DeviceStatus>>>,
}

impl StateCache {
    /// Creates an empty cache.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the stored snapshot for `device`.
    ///
    /// Returns `true` if the new snapshot differs from the previous one.
    pub fn record(&self, device: DeviceId, status: DeviceStatus) -> bool {
        let mut devices = self.devices.write();
        let changed = devices
            .get(&device)
            .is_none_or(|previous| **previous != status);
        if changed {
            tracing::trace!(device = %device, fields = status.len(), "Recording device status");
            devices.insert(device, Arc::new(status));
        }
        changed
    }

    /// Removes a device from the cache.
    ///
    /// Returns `true` if the device was known.
    pub fn forget(&self, device: &str) -> bool {
        self.devices.write().remove(device).is_some()
    }

    /// Returns the current snapshot for `device`.
    #[must_use]
    pub fn snapshot(&self, device: &str) -> Option<Arc<DeviceStatus>> {
        self.devices.read().get(device).cloned()
    }

    /// Returns a single reported value for `device`.
    #[must_use]
    pub fn get(&self, device: &str, key: &str) -> Option<Value> {
        self.devices.read().get(device)?.get(key).cloned()
    }

    /// Returns the identifiers of all known devices.
    #[must_use]
    pub fn devices(&self) -> Vec<DeviceId> {
        self.devices.read().keys().cloned().collect()
    }

    /// Returns the number of known devices.
    #[must_use]
    pub fn len(&self) -> usize {
        self.devices.read().len()
    }

    /// Returns `true` if no device has reported yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.devices.read().is_empty()
    }
}
