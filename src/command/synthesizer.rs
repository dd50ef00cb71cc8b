// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Computation of control payloads from actions and cached state.

use crate::color::ColorTable;
use crate::error::DispatchError;
use crate::reply::Messages;
use crate::state::DeviceStatus;
use crate::types::{Brightness, PowerState};

use super::{Action, ControlPayload, SwitchOnLevel};

/// Informational result that publishes nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Notice {
    /// Switch-on requested, device already reports `ON`.
    AlreadyOn,
    /// Switch-off requested, device already reports `OFF`.
    AlreadyOff,
    /// The current brightness is unknown, so a relative change is impossible.
    NotPossible,
    /// The action is recognized but not supported.
    NotImplemented,
}

/// Result of synthesizing an action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Publish this payload.
    Publish(ControlPayload),
    /// Publish nothing and tell the user.
    Notice(Notice),
}

/// Builds control payloads.
///
/// Capability checks are not repeated here; run the guard pipeline first.
///
/// # Examples
///
/// ```
/// use voxlight::color::CssColors;
/// use voxlight::command::{Action, ControlPayload, Notice, Outcome, Synthesizer};
/// use voxlight::reply::Messages;
/// use voxlight::state::DeviceStatus;
///
/// let messages = Messages::default();
/// let synthesizer = Synthesizer::new(&CssColors, &messages);
///
/// let off = DeviceStatus::from_payload(r#"{"state":"OFF"}"#).unwrap();
/// assert_eq!(
///     synthesizer.synthesize(&Action::SwitchOff, Some(&off), 50).unwrap(),
///     Outcome::Notice(Notice::AlreadyOff)
/// );
/// assert_eq!(
///     synthesizer.synthesize(&Action::SwitchOff, None, 50).unwrap(),
///     Outcome::Publish(ControlPayload::off())
/// );
/// ```
#[derive(Clone, Copy)]
pub struct Synthesizer<'a> {
    colors: &'a dyn ColorTable,
    messages: &'a Messages,
}

impl<'a> Synthesizer<'a> {
    /// Creates a synthesizer.
    #[must_use]
    pub fn new(colors: &'a dyn ColorTable, messages: &'a Messages) -> Self {
        Self { colors, messages }
    }

    /// Computes the outcome of `action` given the device's last status and
    /// the room's dim step.
    ///
    /// # Errors
    ///
    /// Returns `DispatchError::Clarification` for a missing or unknown color
    /// and for a missing dim direction.
    pub fn synthesize(
        &self,
        action: &Action,
        status: Option<&DeviceStatus>,
        dim_step: u8,
    ) -> Result<Outcome, DispatchError> {
        let state = status.and_then(DeviceStatus::state);

        match action {
            Action::SwitchOff => Ok(switch_off(state)),

            Action::SwitchOn {
                brightness: Some(percent),
            } => Ok(match SwitchOnLevel::classify(*percent) {
                SwitchOnLevel::Off => switch_off(state),
                SwitchOnLevel::Dimmed(level) | SwitchOnLevel::Full(level) => {
                    Outcome::Publish(ControlPayload::on().with_brightness(level))
                }
            }),

            Action::SwitchOn { brightness: None } => Ok(if state == Some(PowerState::On) {
                Outcome::Notice(Notice::AlreadyOn)
            } else {
                Outcome::Publish(ControlPayload::on())
            }),

            Action::ChangeColor { color } => {
                let clarify = || DispatchError::clarify(self.messages.which_color.clone(), "color");
                let name = color.as_deref().ok_or_else(clarify)?;
                let rgb = self.colors.lookup(name).ok_or_else(|| {
                    tracing::debug!(color = %name, "Unknown color name");
                    clarify()
                })?;
                Ok(Outcome::Publish(ControlPayload::on().with_color(rgb)))
            }

            Action::Dim { direction } => {
                let direction = direction.ok_or_else(|| {
                    DispatchError::clarify(self.messages.brighter_or_lower.clone(), "action")
                })?;
                let Some(current) = status.and_then(DeviceStatus::brightness) else {
                    return Ok(Outcome::Notice(Notice::NotPossible));
                };

                let offset = direction.signed(dim_step);
                let target = Brightness::clamped(i32::from(current.value()) + offset);

                // A device that is off has no baseline to add to: it comes on
                // at the step value itself.
                if state != Some(PowerState::On) && offset > 0 {
                    return Ok(Outcome::Publish(
                        ControlPayload::on().with_brightness(Brightness::clamped(offset)),
                    ));
                }
                if target == Brightness::MIN {
                    return Ok(Outcome::Publish(ControlPayload::off()));
                }
                Ok(Outcome::Publish(ControlPayload::brightness(target)))
            }

            Action::ActivateScene => Ok(Outcome::Notice(Notice::NotImplemented)),
        }
    }
}

fn switch_off(state: Option<PowerState>) -> Outcome {
    if state == Some(PowerState::Off) {
        Outcome::Notice(Notice::AlreadyOff)
    } else {
        Outcome::Publish(ControlPayload::off())
    }
}
