// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! User-facing replies.
//!
//! Every voice request ends in a [`Reply`]: nothing audible, a sentence, or
//! a question asking the user to fill in a slot again.

mod messages;
mod phrases;

pub use messages::Messages;
pub use phrases::{FixedSequence, PhrasePool, RandomSource, ThreadRandom, confirm};

use crate::error::DispatchError;

/// The outcome of a voice request as presented to the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    /// No audible reply.
    Silent,
    /// Speak a sentence and end the interaction.
    Say(String),
    /// Ask a question and expect `slot` in the answer.
    Clarify {
        /// The question.
        prompt: String,
        /// The slot to re-request.
        slot: String,
    },
}

impl Reply {
    /// Returns the spoken text, if any.
    #[must_use]
    pub fn text(&self) -> Option<&str> {
        match self {
            Self::Silent => None,
            Self::Say(text) | Self::Clarify { prompt: text, .. } => Some(text.as_str()),
        }
    }
}

impl From<DispatchError> for Reply {
    fn from(err: DispatchError) -> Self {
        match err {
            DispatchError::UnknownDevice(text) | DispatchError::Capability(text) => {
                Self::Say(text)
            }
            DispatchError::Clarification { prompt, slot } => Self::Clarify { prompt, slot },
        }
    }
}
