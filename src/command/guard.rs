// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Preconditions checked before a control payload is computed.
//!
//! Each action has an ordered list of [`Guard`]s. The first guard that fails
//! ends the request with a user-facing error; nothing is published.

use crate::capabilities::Capability;
use crate::error::DispatchError;
use crate::reply::Messages;
use crate::rooms::RoomConfig;

use super::{Action, SwitchOnLevel};

/// A single precondition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Guard {
    /// The room's device must declare `capability`.
    Capability {
        /// The required capability.
        capability: Capability,
        /// Reply when it is missing.
        message: String,
    },
    /// The request must carry a value for `slot`.
    Slot {
        /// The required slot.
        slot: &'static str,
        /// Question asking for it.
        prompt: String,
    },
}

impl Guard {
    /// Checks this guard against a room and an action.
    ///
    /// # Errors
    ///
    /// Returns `DispatchError::Capability` or `DispatchError::Clarification`
    /// when the precondition does not hold.
    pub fn check(&self, room: &RoomConfig, action: &Action) -> Result<(), DispatchError> {
        match self {
            Self::Capability {
                capability,
                message,
            } => require_capability(room, capability, message),
            Self::Slot { slot, prompt } => {
                if action.has_slot(slot) {
                    Ok(())
                } else {
                    Err(DispatchError::clarify(prompt.clone(), *slot))
                }
            }
        }
    }
}

/// Fails with `DispatchError::Capability(message)` unless the room declares
/// `capability`.
///
/// # Errors
///
/// Returns `DispatchError::Capability` when the capability is missing.
pub fn require_capability(
    room: &RoomConfig,
    capability: &Capability,
    message: &str,
) -> Result<(), DispatchError> {
    if room.capabilities.supports(capability) {
        Ok(())
    } else {
        tracing::debug!(
            capability = %capability,
            declared = %room.capabilities,
            "Missing capability"
        );
        Err(DispatchError::Capability(message.to_string()))
    }
}

/// Returns the guards for an action, in the order they run.
#[must_use]
pub fn guards_for(action: &Action, messages: &Messages) -> Vec<Guard> {
    match action {
        Action::SwitchOn {
            brightness: Some(percent),
        } if matches!(SwitchOnLevel::classify(*percent), SwitchOnLevel::Dimmed(_)) => {
            vec![Guard::Capability {
                capability: Capability::Brightness,
                message: messages.on_off_only.clone(),
            }]
        }
        Action::ChangeColor { .. } => vec![
            Guard::Capability {
                capability: Capability::Color,
                message: messages.impossible.clone(),
            },
            Guard::Slot {
                slot: "color",
                prompt: messages.which_color.clone(),
            },
        ],
        Action::Dim { .. } => vec![
            Guard::Capability {
                capability: Capability::Brightness,
                message: messages.on_off_only.clone(),
            },
            Guard::Slot {
                slot: "action",
                prompt: messages.brighter_or_lower.clone(),
            },
        ],
        Action::SwitchOn { .. } | Action::SwitchOff | Action::ActivateScene => Vec::new(),
    }
}

/// Runs guards in order, stopping at the first failure.
///
/// # Errors
///
/// Returns the first failing guard's error.
pub fn run_guards(guards: &[Guard], room: &RoomConfig, action: &Action) -> Result<(), DispatchError> {
    guards.iter().try_for_each(|guard| guard.check(room, action))
}
