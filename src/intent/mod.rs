// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Voice intent input over the Hermes dialogue protocol.
//!
//! Recognized intents arrive on `hermes/intent/<name>`. The
//! [`IntentHandler`] maps the intent name to an [`IntentKind`], drops
//! low-confidence classifications, converts slots into an
//! [`ActionRequest`](crate::command::ActionRequest) and answers with a
//! [`SessionReply`]: `endSession` for statements, `continueSession` when a
//! slot has to be asked for again.

mod handler;
mod hermes;
mod names;

pub use handler::{
    ACTION_SLOT, BRIGHTNESS_SLOT, COLOR_SLOT, IntentHandler, LOCATION_SLOT, request_for,
};
pub use hermes::{
    CONTINUE_SESSION_TOPIC, END_SESSION_TOPIC, INTENT_PREFIX, INTENT_TOPICS, Intent,
    IntentMessage, SessionReply, Slot, SlotValue,
};
pub use names::{IntentBinding, IntentConfig, IntentKind};
