// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Localized reply texts.

use serde::{Deserialize, Serialize};

use crate::command::Notice;

use super::PhrasePool;

/// Every text the dispatcher may speak.
///
/// The defaults are English; a localized set is loaded from the
/// configuration. Missing fields fall back to the defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Messages {
    /// Generic confirmation when the pool is empty.
    pub done: String,
    /// Extra confirmation variant for switching on.
    pub switched_on: String,
    /// Extra confirmation variant for switching off.
    pub switched_off: String,
    /// The device already reports `ON`.
    pub already_on: String,
    /// The device already reports `OFF`.
    pub already_off: String,
    /// A required capability is missing.
    pub impossible: String,
    /// Brightness was requested from an on/off-only device.
    pub on_off_only: String,
    /// The current brightness is unknown.
    pub not_possible: String,
    /// No device is configured for the room.
    pub unknown_device: String,
    /// Prompt for the color slot.
    pub which_color: String,
    /// Prompt for the dim direction slot.
    pub brighter_or_lower: String,
    /// Prompt for a brightness slot that is not a number.
    pub how_bright: String,
    /// Reply to intents that are recognized but not supported.
    pub not_implemented: String,
    /// Confirmation phrase pool.
    pub confirmations: Vec<String>,
}

impl Default for Messages {
    fn default() -> Self {
        Self {
            done: "done".into(),
            switched_on: "switched on".into(),
            switched_off: "switched off".into(),
            already_on: "It is already on".into(),
            already_off: "It is already off".into(),
            impossible: "That's impossible".into(),
            on_off_only: "This device can be only switched on or off.".into(),
            not_possible: "That's currently not possible".into(),
            unknown_device: "unknown device".into(),
            which_color: "which color?".into(),
            brighter_or_lower: "brighter or lower?".into(),
            how_bright: "how bright?".into(),
            not_implemented: "Not yet implemented".into(),
            confirmations: vec!["done".into(), "okay".into(), "alright".into()],
        }
    }
}

impl Messages {
    /// Returns the text for an informational outcome.
    #[must_use]
    pub fn notice(&self, notice: Notice) -> &str {
        match notice {
            Notice::AlreadyOn => &self.already_on,
            Notice::AlreadyOff => &self.already_off,
            Notice::NotPossible => &self.not_possible,
            Notice::NotImplemented => &self.not_implemented,
        }
    }
}

impl PhrasePool for Messages {
    fn confirmations(&self) -> &[String] {
        &self.confirmations
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_document_keeps_defaults() {
        let messages: Messages =
            serde_json::from_str(r#"{"already_on":"Sie ist schon an","confirmations":[]}"#)
                .unwrap();
        assert_eq!(messages.already_on, "Sie ist schon an");
        assert_eq!(messages.already_off, "It is already off");
        assert!(messages.confirmations.is_empty());
    }

    #[test]
    fn notice_texts() {
        let messages = Messages::default();
        assert_eq!(messages.notice(Notice::AlreadyOff), "It is already off");
        assert_eq!(messages.notice(Notice::NotImplemented), "Not yet implemented");
    }
}
