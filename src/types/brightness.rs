// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Brightness and percentage types.
//!
//! The bus speaks brightness as an integer in `0..=254`, while voice input
//! supplies percentages. [`Brightness::from_percent`] is the only place the
//! two scales meet.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::ValueError;

/// Brightness level on the bus scale (0-254).
///
/// # Examples
///
/// ```
/// use voxlight::types::{Brightness, Percent};
///
/// let half = Brightness::from_percent(Percent::new(50.0).unwrap());
/// assert_eq!(half.value(), 127);
///
/// assert_eq!(Brightness::clamped(300).value(), 254);
/// assert!(Brightness::new(255).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u16", into = "u16")]
pub struct Brightness(u8);

impl Brightness {
    /// Minimum brightness.
    pub const MIN: Self = Self(0);

    /// Maximum brightness.
    pub const MAX: Self = Self(254);

    /// Creates a brightness value.
    ///
    /// # Errors
    ///
    /// Returns `ValueError::OutOfRange` if value exceeds 254.
    pub fn new(value: u16) -> Result<Self, ValueError> {
        match u8::try_from(value) {
            Ok(v) if v <= Self::MAX.0 => Ok(Self(v)),
            _ => Err(ValueError::OutOfRange {
                min: 0,
                max: i64::from(Self::MAX.0),
                actual: i64::from(value),
            }),
        }
    }

    /// Creates a brightness value, clamping to `0..=254`.
    #[must_use]
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn clamped(value: i32) -> Self {
        // Safe: clamped into 0..=254
        Self(value.clamp(0, i32::from(Self::MAX.0)) as u8)
    }

    /// Converts a percentage to the bus scale: `round(254 * percent / 100)`.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn from_percent(percent: Percent) -> Self {
        // Safe: percent is within [0, 100], so the product is within [0, 254]
        Self::clamped((f64::from(Self::MAX.0) * percent.value() / 100.0).round() as i32)
    }

    /// Returns the raw value.
    #[must_use]
    pub const fn value(&self) -> u8 {
        self.0
    }
}

impl fmt::Display for Brightness {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<u16> for Brightness {
    type Error = ValueError;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Brightness> for u16 {
    fn from(value: Brightness) -> Self {
        u16::from(value.0)
    }
}

/// Percentage supplied by voice input (0-100).
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct Percent(f64);

impl Percent {
    /// Creates a percentage.
    ///
    /// # Errors
    ///
    /// Returns `ValueError::InvalidPercent` if the value is not a finite
    /// number within [0, 100].
    pub fn new(value: f64) -> Result<Self, ValueError> {
        if value.is_finite() && (0.0..=100.0).contains(&value) {
            Ok(Self(value))
        } else {
            Err(ValueError::InvalidPercent(value))
        }
    }

    /// Creates a percentage, clamping to [0, 100]. `NaN` becomes 0.
    #[must_use]
    pub fn clamped(value: f64) -> Self {
        if value.is_nan() {
            Self(0.0)
        } else {
            Self(value.clamp(0.0, 100.0))
        }
    }

    /// Returns the raw value.
    #[must_use]
    pub const fn value(&self) -> f64 {
        self.0
    }
}

impl fmt::Display for Percent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}%", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pct(value: f64) -> Percent {
        Percent::new(value).unwrap()
    }

    #[test]
    fn brightness_bounds() {
        assert_eq!(Brightness::new(0).unwrap(), Brightness::MIN);
        assert_eq!(Brightness::new(254).unwrap(), Brightness::MAX);
        assert!(matches!(
            Brightness::new(255),
            Err(ValueError::OutOfRange { actual: 255, .. })
        ));
    }

    #[test]
    fn brightness_clamped() {
        assert_eq!(Brightness::clamped(-20).value(), 0);
        assert_eq!(Brightness::clamped(100).value(), 100);
        assert_eq!(Brightness::clamped(304).value(), 254);
    }

    #[test]
    fn percent_to_brightness() {
        assert_eq!(Brightness::from_percent(pct(100.0)).value(), 254);
        assert_eq!(Brightness::from_percent(pct(50.0)).value(), 127);
        assert_eq!(Brightness::from_percent(pct(0.0)).value(), 0);
        assert_eq!(Brightness::from_percent(pct(33.0)).value(), 84);
    }

    #[test]
    fn percent_rejects_out_of_range() {
        assert!(Percent::new(-1.0).is_err());
        assert!(Percent::new(100.5).is_err());
        assert!(Percent::new(f64::NAN).is_err());
    }

    #[test]
    fn percent_clamped() {
        assert!((Percent::clamped(150.0).value() - 100.0).abs() < f64::EPSILON);
        assert!(Percent::clamped(f64::NAN).value().abs() < f64::EPSILON);
    }

    #[test]
    fn brightness_serializes_as_number() {
        assert_eq!(serde_json::to_string(&Brightness::MAX).unwrap(), "254");
        assert!(serde_json::from_str::<Brightness>("300").is_err());
    }
}
