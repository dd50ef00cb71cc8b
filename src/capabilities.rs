// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Device capabilities declared in the room configuration.
//!
//! A room declares the capabilities of its device as a comma-separated list,
//! e.g. `"brightness, color"`. Every device can be switched on and off;
//! anything beyond that must be declared before the dispatcher will attempt
//! it.

use std::collections::BTreeSet;
use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// A named feature a device declares support for.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Capability {
    /// Brightness control (`brightness`).
    Brightness,
    /// RGB color control (`color`).
    Color,
    /// Any other declared name, kept verbatim.
    Other(String),
}

impl Capability {
    /// Returns the configuration name of this capability.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Brightness => "brightness",
            Self::Color => "color",
            Self::Other(name) => name,
        }
    }
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Capability {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s.trim() {
            "brightness" => Self::Brightness,
            "color" => Self::Color,
            other => Self::Other(other.to_string()),
        })
    }
}

/// The set of capabilities a room's device declares.
///
/// # Examples
///
/// ```
/// use voxlight::{Capabilities, Capability};
///
/// let caps = Capabilities::parse(" brightness ,color,, ");
/// assert!(caps.supports(&Capability::Brightness));
/// assert!(caps.supports(&Capability::Color));
/// assert!(!caps.supports(&Capability::Other("color_temp".into())));
/// assert_eq!(caps.to_string(), "brightness,color");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Capabilities {
    inner: BTreeSet<Capability>,
}

impl Capabilities {
    /// Creates an empty capability set (on/off only).
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses a comma-separated list. Entries are whitespace-trimmed and
    /// empty entries are ignored.
    #[must_use]
    pub fn parse(list: &str) -> Self {
        list.split(',')
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .map(|name| match name.parse::<Capability>() {
                Ok(capability) => capability,
                Err(never) => match never {},
            })
            .collect()
    }

    /// Returns `true` if `capability` is declared.
    #[must_use]
    pub fn supports(&self, capability: &Capability) -> bool {
        self.inner.contains(capability)
    }

    /// Adds a capability.
    #[must_use]
    pub fn with(mut self, capability: Capability) -> Self {
        self.inner.insert(capability);
        self
    }

    /// Returns `true` if only on/off is supported.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    /// Iterates over the declared capabilities.
    pub fn iter(&self) -> impl Iterator<Item = &Capability> {
        self.inner.iter()
    }
}

impl FromIterator<Capability> for Capabilities {
    fn from_iter<I: IntoIterator<Item = Capability>>(iter: I) -> Self {
        Self {
            inner: iter.into_iter().collect(),
        }
    }
}

impl fmt::Display for Capabilities {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<&str> = self.inner.iter().map(Capability::as_str).collect();
        f.write_str(&names.join(","))
    }
}

impl Serialize for Capabilities {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Capabilities {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let list = String::deserialize(deserializer)?;
        Ok(Self::parse(&list))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_list_is_on_off_only() {
        assert!(Capabilities::parse("").is_empty());
        assert!(Capabilities::default().is_empty());
    }

    #[test]
    fn parse_trims_whitespace() {
        let caps = Capabilities::parse("color ,  brightness");
        assert!(caps.supports(&Capability::Color));
        assert!(caps.supports(&Capability::Brightness));
    }

    #[test]
    fn names_are_matched_exactly() {
        let caps = Capabilities::parse("Brightness, colour");
        assert!(!caps.supports(&Capability::Brightness));
        assert!(caps.supports(&Capability::Other("colour".into())));
    }

    #[test]
    fn builder_style_with() {
        let caps = Capabilities::new()
            .with(Capability::Color)
            .with(Capability::Color);
        assert_eq!(caps.iter().count(), 1);
    }

    #[test]
    fn serde_uses_comma_list() {
        let caps: Capabilities = serde_json::from_str("\"brightness, color_temp\"").unwrap();
        assert!(caps.supports(&Capability::Other("color_temp".into())));
        assert_eq!(
            serde_json::to_string(&caps).unwrap(),
            "\"brightness,color_temp\""
        );
    }
}
