// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Room configuration and target resolution.
//!
//! A spoken request carries a [`RoomContext`]. A [`RoomProvider`] turns it
//! into a [`RoomConfig`], and [`resolve`] turns that into a [`Target`]:
//! either one device, or every configured device when the user addressed
//! all rooms at once.

mod directory;
mod resolver;
mod room_config;

pub use directory::RoomDirectory;
pub use resolver::{RoomTarget, Target, resolve};
pub use room_config::{RoomConfig, RoomContext};

/// Source of room configuration.
///
/// [`RoomDirectory`] is the configuration-backed implementation; hosts may
/// supply their own.
pub trait RoomProvider: Send + Sync {
    /// Returns the name and configuration of the room a request addresses.
    ///
    /// Returns `None` for unknown rooms and for all-rooms requests.
    fn room(&self, context: &RoomContext) -> Option<(&str, &RoomConfig)>;

    /// Returns every configured room.
    fn rooms(&self) -> Vec<(&str, &RoomConfig)>;

    /// Returns `true` if the request addresses all rooms at once.
    fn is_all_rooms(&self, context: &RoomContext) -> bool;

    /// Returns `true` if the addressed room is the one the user is in.
    fn is_current_room(&self, context: &RoomContext) -> bool;
}
