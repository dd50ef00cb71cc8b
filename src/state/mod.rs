// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Device state tracking.
//!
//! Status reports arrive asynchronously from the bus and are stored as
//! [`DeviceStatus`] snapshots in the [`StateCache`]. The cache is memory
//! resident and rebuilt from live status traffic after a restart.
//!
//! # Examples
//!
//! ```
//! use voxlight::state::{DeviceStatus, StateCache};
//! use voxlight::types::{DeviceId, PowerState};
//!
//! let cache = StateCache::new();
//! let lamp = DeviceId::new("desk_lamp").unwrap();
//! cache.record(lamp.clone(), DeviceStatus::from_payload(r#"{"state":"OFF"}"#).unwrap());
//!
//! let snapshot = cache.snapshot(lamp.as_str()).unwrap();
//! assert_eq!(snapshot.state(), Some(PowerState::Off));
//! ```

mod cache;
mod device_status;

pub use cache::StateCache;
pub use device_status::DeviceStatus;
