// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Last reported status of a single device.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::ParseError;
use crate::types::{Brightness, PowerState, RgbColor};

/// Snapshot of a device's last status report.
///
/// The report is kept verbatim: typed accessors read the well-known fields
/// (`state`, `brightness`, `color`) and [`get`](Self::get) exposes anything
/// else the device reported. A snapshot is never merged with an older one.
///
/// # Examples
///
/// ```
/// use voxlight::state::DeviceStatus;
/// use voxlight::types::PowerState;
///
/// let status = DeviceStatus::from_payload(r#"{"state":"ON","brightness":120,"linkquality":87}"#).unwrap();
/// assert_eq!(status.state(), Some(PowerState::On));
/// assert_eq!(status.brightness().map(|b| b.value()), Some(120));
/// assert_eq!(status.get("linkquality"), Some(&serde_json::json!(87)));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DeviceStatus(Map<String, Value>);

impl DeviceStatus {
    /// Creates an empty status.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses a status report payload.
    ///
    /// # Errors
    ///
    /// Returns `ParseError::Json` if the payload is not JSON, and
    /// `ParseError::UnexpectedFormat` if it is not a JSON object.
    pub fn from_payload(payload: &str) -> Result<Self, ParseError> {
        match serde_json::from_str::<Value>(payload)? {
            Value::Object(map) => Ok(Self(map)),
            other => Err(ParseError::UnexpectedFormat(format!(
                "expected a JSON object, got {}",
                json_kind(&other)
            ))),
        }
    }

    /// Returns the raw value reported for `key`.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// Returns the reported power state.
    #[must_use]
    pub fn state(&self) -> Option<PowerState> {
        match self.get("state")? {
            Value::String(s) => s.parse().ok(),
            Value::Bool(b) => Some(PowerState::from(*b)),
            _ => None,
        }
    }

    /// Returns the reported brightness, clamped to the bus range.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn brightness(&self) -> Option<Brightness> {
        let raw = self.get("brightness")?.as_f64()?;
        if !raw.is_finite() {
            return None;
        }
        // Saturating float-to-int cast, then clamped into 0..=254
        Some(Brightness::clamped(raw.round() as i32))
    }

    /// Returns the reported RGB color, if the device reports one.
    #[must_use]
    pub fn color(&self) -> Option<RgbColor> {
        serde_json::from_value(self.get("color")?.clone()).ok()
    }

    /// Returns the number of reported fields.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` if nothing was reported.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns the underlying key/value map.
    #[must_use]
    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }
}

impl From<Map<String, Value>> for DeviceStatus {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
