// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Resolution of a request context to concrete devices.

use crate::error::DispatchError;
use crate::types::DeviceId;

use super::{RoomConfig, RoomContext, RoomProvider};

/// A room with a configured device.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RoomTarget<'a> {
    /// The room name.
    pub room: &'a str,
    /// The room's configuration.
    pub config: &'a RoomConfig,
    /// The room's device.
    pub device: &'a DeviceId,
}

/// What a request addresses.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Target<'a> {
    /// A single room's device.
    Single(RoomTarget<'a>),
    /// Every room that has a device, in configuration order.
    AllRooms(Vec<RoomTarget<'a>>),
}

/// Resolves a request context.
///
/// All-rooms requests yield every room that declares a device; rooms
/// without one are skipped. Any other request must address a known room
/// with a device.
///
/// # Errors
///
/// Returns `DispatchError::UnknownDevice(unknown_device)` if the addressed
/// room is unknown or has no device.
///
/// # Examples
///
/// ```
/// use voxlight::rooms::{RoomConfig, RoomContext, RoomDirectory, Target, resolve};
/// use voxlight::types::DeviceId;
///
/// let rooms = RoomDirectory::new()
///     .with_room("hall", RoomConfig::new().with_device(DeviceId::new("hall_light").unwrap()))
///     .with_room("attic", RoomConfig::new());
///
/// let target = resolve(&rooms, &RoomContext::named("sat", "hall"), "unknown device").unwrap();
/// assert!(matches!(target, Target::Single(t) if t.device.as_str() == "hall_light"));
///
/// let err = resolve(&rooms, &RoomContext::named("sat", "attic"), "unknown device");
/// assert!(err.is_err());
/// ```
pub fn resolve<'a>(
    provider: &'a dyn RoomProvider,
    context: &RoomContext,
    unknown_device: &str,
) -> Result<Target<'a>, DispatchError> {
    if provider.is_all_rooms(context) {
        let targets = provider
            .rooms()
            .into_iter()
            .filter_map(|(room, config)| {
                config.device.as_ref().map(|device| RoomTarget {
                    room,
                    config,
                    device,
                })
            })
            .collect();
        return Ok(Target::AllRooms(targets));
    }

    let Some((room, config)) = provider.room(context) else {
        tracing::debug!(
            site = %context.site_id,
            location = ?context.location,
            "No room configured for request"
        );
        return Err(DispatchError::UnknownDevice(unknown_device.to_string()));
    };

    let Some(device) = config.device.as_ref() else {
        tracing::debug!(room = %room, "Room has no device");
        return Err(DispatchError::UnknownDevice(unknown_device.to_string()));
    };

    Ok(Target::Single(RoomTarget {
        room,
        config,
        device,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rooms::RoomDirectory;

    fn rooms() -> RoomDirectory {
        RoomDirectory::new()
            .with_room(
                "bath",
                RoomConfig::new().with_device(DeviceId::new("bath_light").unwrap()),
            )
            .with_room("garage", RoomConfig::new())
            .with_room(
                "office",
                RoomConfig::new().with_device(DeviceId::new("office_lamp").unwrap()),
            )
    }

    #[test]
    fn single_room() {
        let rooms = rooms();
        let target = resolve(&rooms, &RoomContext::here("office"), "?").unwrap();
        let Target::Single(target) = target else {
            panic!("expected a single target");
        };
        assert_eq!(target.room, "office");
        assert_eq!(target.device.as_str(), "office_lamp");
    }

    #[test]
    fn room_without_device_is_unknown() {
        let rooms = rooms();
        let err = resolve(&rooms, &RoomContext::here("garage"), "unknown device").unwrap_err();
        assert_eq!(err, DispatchError::UnknownDevice("unknown device".into()));
    }

    #[test]
    fn unconfigured_room_is_unknown() {
        let rooms = rooms();
        let err = resolve(&rooms, &RoomContext::named("office", "pantry"), "nope").unwrap_err();
        assert!(matches!(err, DispatchError::UnknownDevice(msg) if msg == "nope"));
    }

    #[test]
    fn all_rooms_skips_rooms_without_device() {
        let rooms = rooms();
        let target = resolve(&rooms, &RoomContext::named("office", "everywhere"), "?").unwrap();
        let Target::AllRooms(targets) = target else {
            panic!("expected fan-out");
        };
        let devices: Vec<&str> = targets.iter().map(|t| t.device.as_str()).collect();
        assert_eq!(devices, vec!["bath_light", "office_lamp"]);
    }

    #[test]
    fn all_rooms_with_no_devices_is_empty() {
        let rooms = RoomDirectory::new().with_room("garage", RoomConfig::new());
        let target = resolve(&rooms, &RoomContext::named("x", "all"), "?").unwrap();
        assert_eq!(target, Target::AllRooms(Vec::new()));
    }
}
