// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Requested actions derived from voice intents.

use std::fmt;
use std::str::FromStr;

use crate::error::ValueError;
use crate::rooms::RoomContext;
use crate::types::{Brightness, Percent};

/// Percentages below this switch the device off.
pub const OFF_BELOW_PERCENT: f64 = 5.0;

/// Percentages above this are full brightness and need no brightness
/// capability.
pub const FULL_ABOVE_PERCENT: f64 = 95.0;

/// Direction of a relative dim request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DimDirection {
    /// Increase brightness.
    Higher,
    /// Decrease brightness.
    Lower,
}

impl DimDirection {
    /// Applies the direction's sign to `step`.
    #[must_use]
    pub fn signed(self, step: u8) -> i32 {
        match self {
            Self::Higher => i32::from(step),
            Self::Lower => -i32::from(step),
        }
    }
}

impl fmt::Display for DimDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Higher => "higher",
            Self::Lower => "lower",
        })
    }
}

impl FromStr for DimDirection {
    type Err = ValueError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "higher" | "up" | "brighter" => Ok(Self::Higher),
            "lower" | "down" | "darker" | "dimmer" => Ok(Self::Lower),
            _ => Err(ValueError::InvalidDirection(s.to_string())),
        }
    }
}

/// How a switch-on request with a brightness percentage is carried out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SwitchOnLevel {
    /// Below [`OFF_BELOW_PERCENT`]: treated as a switch-off request.
    Off,
    /// Within the dimmable range; needs the brightness capability.
    Dimmed(Brightness),
    /// Above [`FULL_ABOVE_PERCENT`]: full on.
    Full(Brightness),
}

impl SwitchOnLevel {
    /// Classifies a requested percentage.
    #[must_use]
    pub fn classify(percent: Percent) -> Self {
        let value = percent.value();
        if value < OFF_BELOW_PERCENT {
            Self::Off
        } else if value <= FULL_ABOVE_PERCENT {
            Self::Dimmed(Brightness::from_percent(percent))
        } else {
            Self::Full(Brightness::from_percent(percent))
        }
    }
}

/// The action a voice request asks for, with its slot values.
///
/// Slots are optional because the user may have left them out; the guard
/// pipeline asks for required ones before anything is published.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    /// Switch on, optionally at a brightness percentage.
    SwitchOn {
        /// Requested brightness percentage.
        brightness: Option<Percent>,
    },
    /// Switch off.
    SwitchOff,
    /// Change the color by name.
    ChangeColor {
        /// Spoken color name.
        color: Option<String>,
    },
    /// Dim relative to the current brightness.
    Dim {
        /// Requested direction.
        direction: Option<DimDirection>,
    },
    /// Activate a scene. Recognized but not supported.
    ActivateScene,
}

impl Action {
    /// Returns a short name for logging.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::SwitchOn { .. } => "switch_on",
            Self::SwitchOff => "switch_off",
            Self::ChangeColor { .. } => "change_color",
            Self::Dim { .. } => "dim",
            Self::ActivateScene => "activate_scene",
        }
    }

    /// Returns `true` if the named slot carries a value.
    #[must_use]
    pub fn has_slot(&self, slot: &str) -> bool {
        match (self, slot) {
            (Self::SwitchOn { brightness }, "brightness") => brightness.is_some(),
            (Self::ChangeColor { color }, "color") => {
                color.as_deref().is_some_and(|c| !c.trim().is_empty())
            }
            (Self::Dim { direction }, "action") => direction.is_some(),
            _ => false,
        }
    }
}

/// A voice request: where, and what.
#[derive(Debug, Clone, PartialEq)]
pub struct ActionRequest {
    /// Location context of the request.
    pub context: RoomContext,
    /// The requested action.
    pub action: Action,
}

impl ActionRequest {
    /// Creates a request.
    #[must_use]
    pub fn new(context: RoomContext, action: Action) -> Self {
        Self { context, action }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pct(value: f64) -> Percent {
        Percent::new(value).unwrap()
    }

    #[test]
    fn classify_thresholds() {
        assert_eq!(SwitchOnLevel::classify(pct(0.0)), SwitchOnLevel::Off);
        assert_eq!(SwitchOnLevel::classify(pct(4.9)), SwitchOnLevel::Off);
        assert_eq!(
            SwitchOnLevel::classify(pct(5.0)),
            SwitchOnLevel::Dimmed(Brightness::new(13).unwrap())
        );
        assert_eq!(
            SwitchOnLevel::classify(pct(95.0)),
            SwitchOnLevel::Dimmed(Brightness::new(241).unwrap())
        );
        assert_eq!(
            SwitchOnLevel::classify(pct(100.0)),
            SwitchOnLevel::Full(Brightness::MAX)
        );
    }

    #[test]
    fn direction_parsing() {
        assert_eq!("higher".parse::<DimDirection>().unwrap(), DimDirection::Higher);
        assert_eq!(" Lower ".parse::<DimDirection>().unwrap(), DimDirection::Lower);
        assert!("sideways".parse::<DimDirection>().is_err());
    }

    #[test]
    fn direction_sign() {
        assert_eq!(DimDirection::Higher.signed(50), 50);
        assert_eq!(DimDirection::Lower.signed(50), -50);
    }

    #[test]
    fn slot_presence() {
        let color = Action::ChangeColor {
            color: Some("  ".into()),
        };
        assert!(!color.has_slot("color"));
        let dim = Action::Dim {
            direction: Some(DimDirection::Lower),
        };
        assert!(dim.has_slot("action"));
        assert!(!dim.has_slot("color"));
    }
}
