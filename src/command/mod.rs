// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Actions, preconditions and control payloads.
//!
//! A voice request becomes an [`ActionRequest`]. Before anything is sent,
//! the [`Guard`]s for its [`Action`] run against the addressed room; then
//! the [`Synthesizer`] combines the action with the device's cached status
//! into an [`Outcome`]: a [`ControlPayload`] to publish, or a [`Notice`] to
//! speak instead.
//!
//! | Action | Guards | Payload |
//! |--------|--------|---------|
//! | Switch off | none | `{state: OFF}` |
//! | Switch on | `brightness` for 5-95% | `{state: ON}`, plus `brightness` if a percent was given |
//! | Change color | `color` capability, `color` slot | `{state: ON, color: {r, g, b}}` |
//! | Dim | `brightness` capability, `action` slot | `{brightness: N}`, `{state: ON, brightness: step}` or `{state: OFF}` |

mod action;
mod guard;
mod payload;
mod synthesizer;

pub use action::{
    Action, ActionRequest, DimDirection, FULL_ABOVE_PERCENT, OFF_BELOW_PERCENT, SwitchOnLevel,
};
pub use guard::{Guard, guards_for, require_capability, run_guards};
pub use payload::{ControlMessage, ControlPayload};
pub use synthesizer::{Notice, Outcome, Synthesizer};
