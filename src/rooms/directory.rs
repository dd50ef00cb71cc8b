// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Static room directory loaded from the configuration.

use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};

use super::{RoomConfig, RoomContext, RoomProvider};

fn default_all_rooms() -> Vec<String> {
    vec!["everywhere".into(), "all rooms".into(), "all".into()]
}

/// Rooms, satellite sites and fan-out words from the configuration.
///
/// Room names and fan-out words match case-insensitively. A site without a
/// `sites` entry is assumed to be named after its room.
///
/// # Examples
///
/// ```
/// use voxlight::rooms::{RoomConfig, RoomContext, RoomDirectory, RoomProvider};
/// use voxlight::types::DeviceId;
///
/// let rooms = RoomDirectory::new()
///     .with_room("kitchen", RoomConfig::new().with_device(DeviceId::new("k").unwrap()))
///     .with_site("satellite-1", "kitchen");
///
/// let here = RoomContext::here("satellite-1");
/// assert!(rooms.room(&here).is_some());
/// assert!(rooms.is_current_room(&here));
/// assert!(rooms.is_all_rooms(&RoomContext::named("satellite-1", "Everywhere")));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoomDirectory {
    #[serde(default)]
    rooms: BTreeMap<String, RoomConfig>,
    #[serde(default)]
    sites: HashMap<String, String>,
    #[serde(default = "default_all_rooms")]
    all_rooms: Vec<String>,
}

impl Default for RoomDirectory {
    fn default() -> Self {
        Self {
            rooms: BTreeMap::new(),
            sites: HashMap::new(),
            all_rooms: default_all_rooms(),
        }
    }
}

impl RoomDirectory {
    /// Creates an empty directory with the default fan-out words.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds or replaces a room.
    #[must_use]
    pub fn with_room(mut self, name: impl Into<String>, room: RoomConfig) -> Self {
        self.rooms.insert(name.into(), room);
        self
    }

    /// Maps a satellite site to the room it is in.
    #[must_use]
    pub fn with_site(mut self, site_id: impl Into<String>, room: impl Into<String>) -> Self {
        self.sites.insert(site_id.into(), room.into());
        self
    }

    /// Replaces the words that address every room at once.
    #[must_use]
    pub fn with_all_rooms_words<I, S>(mut self, words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.all_rooms = words.into_iter().map(Into::into).collect();
        self
    }

    /// Returns the room the given satellite is in.
    #[must_use]
    pub fn site_room<'a>(&'a self, site_id: &'a str) -> &'a str {
        self.sites.get(site_id).map_or(site_id, String::as_str)
    }

    fn find(&self, name: &str) -> Option<(&str, &RoomConfig)> {
        if let Some((key, room)) = self.rooms.get_key_value(name) {
            return Some((key.as_str(), room));
        }
        self.rooms
            .iter()
            .find(|(key, _)| same_name(key, name))
            .map(|(key, room)| (key.as_str(), room))
    }
}

impl RoomProvider for RoomDirectory {
    fn room(&self, context: &RoomContext) -> Option<(&str, &RoomConfig)> {
        if self.is_all_rooms(context) {
            return None;
        }
        let name = context
            .location
            .as_deref()
            .unwrap_or_else(|| self.site_room(&context.site_id));
        self.find(name)
    }

    fn rooms(&self) -> Vec<(&str, &RoomConfig)> {
        self.rooms
            .iter()
            .map(|(name, room)| (name.as_str(), room))
            .collect()
    }

    fn is_all_rooms(&self, context: &RoomContext) -> bool {
        context
            .location
            .as_deref()
            .is_some_and(|location| self.all_rooms.iter().any(|word| same_name(word, location)))
    }

    fn is_current_room(&self, context: &RoomContext) -> bool {
        match context.location.as_deref() {
            None => true,
            Some(location) => {
                !self.is_all_rooms(context)
                    && same_name(location, self.site_room(&context.site_id))
            }
        }
    }
}

fn same_name(a: &str, b: &str) -> bool {
    a.trim().to_lowercase() == b.trim().to_lowercase()
}
