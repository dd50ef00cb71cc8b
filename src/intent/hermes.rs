// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Hermes dialogue protocol messages.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::ParseError;

/// Topic filter for recognized intents.
pub const INTENT_TOPICS: &str = "hermes/intent/+";

/// Prefix of every intent topic.
pub const INTENT_PREFIX: &str = "hermes/intent/";

/// Topic ending a dialogue session.
pub const END_SESSION_TOPIC: &str = "hermes/dialogueManager/endSession";

/// Topic continuing a dialogue session with a question.
pub const CONTINUE_SESSION_TOPIC: &str = "hermes/dialogueManager/continueSession";

/// A recognized intent published by the NLU.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IntentMessage {
    /// The dialogue session.
    pub session_id: String,
    /// The satellite that captured the utterance.
    #[serde(default)]
    pub site_id: String,
    /// The recognized intent.
    pub intent: Intent,
    /// Extracted slots.
    #[serde(default)]
    pub slots: Vec<Slot>,
}

/// Intent classification.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Intent {
    /// Fully qualified intent name.
    pub intent_name: String,
    /// Classifier confidence in [0, 1].
    #[serde(default)]
    pub confidence_score: f32,
}

/// A named slot value.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Slot {
    /// Slot name.
    pub slot_name: String,
    /// Text as spoken.
    #[serde(default)]
    pub raw_value: String,
    /// Resolved value.
    pub value: SlotValue,
}

/// A typed slot value such as `{"kind": "Percentage", "value": 50.0}`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SlotValue {
    /// Value kind (`Custom`, `Number`, `Percentage`, ...).
    pub kind: String,
    /// The value itself.
    pub value: Value,
}

impl SlotValue {
    /// Returns the value as a number.
    #[must_use]
    pub fn as_f64(&self) -> Option<f64> {
        self.value.as_f64()
    }

    /// Returns the value as text.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        self.value.as_str()
    }
}

impl IntentMessage {
    /// Parses an intent payload.
    ///
    /// # Errors
    ///
    /// Returns `ParseError` if the payload is not UTF-8 or not an intent
    /// document.
    pub fn from_payload(payload: &[u8]) -> Result<Self, ParseError> {
        let text = std::str::from_utf8(payload).map_err(|_| ParseError::NotUtf8)?;
        Ok(serde_json::from_str(text)?)
    }

    /// Returns the first value of the named slot.
    #[must_use]
    pub fn slot(&self, name: &str) -> Option<&SlotValue> {
        self.slots
            .iter()
            .find(|slot| slot.slot_name == name)
            .map(|slot| &slot.value)
    }
}

/// Reply to a dialogue session.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum SessionReply {
    /// End the session, optionally speaking a sentence.
    #[serde(rename_all = "camelCase")]
    End {
        /// The session to end.
        session_id: String,
        /// Text to speak.
        #[serde(skip_serializing_if = "Option::is_none")]
        text: Option<String>,
    },
    /// Ask a question and keep the session open for the given slot.
    #[serde(rename_all = "camelCase")]
    Continue {
        /// The session to continue.
        session_id: String,
        /// The question.
        text: String,
        /// Intents accepted as an answer.
        intent_filter: Vec<String>,
        /// The slot to fill.
        slot: String,
    },
}

impl SessionReply {
    /// Returns the dialogue manager topic for this reply.
    #[must_use]
    pub fn topic(&self) -> &'static str {
        match self {
            Self::End { .. } => END_SESSION_TOPIC,
            Self::Continue { .. } => CONTINUE_SESSION_TOPIC,
        }
    }

    /// Serializes the reply as JSON.
    ///
    /// # Errors
    ///
    /// Returns error if serialization fails.
    pub fn body(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}
