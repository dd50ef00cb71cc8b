// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Request orchestration.
//!
//! The [`Dispatcher`] turns one [`ActionRequest`] into zero or more
//! published control messages and a [`Reply`]:
//!
//! 1. Resolve the addressed room, or every room for a fan-out request.
//! 2. Run the action's guards against the room.
//! 3. Synthesize the payload from the device's cached status.
//! 4. Publish and pick a reply.
//!
//! User-facing failures never escape: they become the reply, and nothing is
//! published.

use std::sync::Arc;

use crate::color::{ColorTable, CssColors};
use crate::command::{
    Action, ActionRequest, ControlMessage, ControlPayload, Outcome, Synthesizer, guards_for,
    run_guards,
};
use crate::error::DispatchError;
use crate::protocol::Publisher;
use crate::reply::{Messages, PhrasePool, RandomSource, Reply, ThreadRandom, confirm};
use crate::rooms::{RoomConfig, RoomProvider, RoomTarget, Target, resolve};
use crate::state::StateCache;
use crate::types::PowerState;

/// Handles voice requests against a room directory and a device state cache.
///
/// `Dispatcher` is cheap to clone; clones share the cache and the publisher.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
///
/// use voxlight::command::{Action, ActionRequest, ControlMessage};
/// use voxlight::error::ProtocolError;
/// use voxlight::protocol::Publisher;
/// use voxlight::reply::Reply;
/// use voxlight::rooms::{RoomConfig, RoomContext, RoomDirectory};
/// use voxlight::types::DeviceId;
/// use voxlight::DispatcherBuilder;
///
/// struct Discard;
///
/// impl Publisher for Discard {
///     fn publish(&self, _message: &ControlMessage) -> Result<(), ProtocolError> {
///         Ok(())
///     }
/// }
///
/// let rooms = RoomDirectory::new().with_room(
///     "kitchen",
///     RoomConfig::new().with_device(DeviceId::new("kitchen_lamp").unwrap()),
/// );
/// let dispatcher = DispatcherBuilder::new(Arc::new(rooms), Arc::new(Discard)).build();
///
/// // Asked from the kitchen satellite: switched without a spoken reply.
/// let request = ActionRequest::new(RoomContext::here("kitchen"), Action::SwitchOff);
/// assert_eq!(dispatcher.handle(&request), Reply::Silent);
/// ```
#[derive(Clone)]
pub struct Dispatcher {
    rooms: Arc<dyn RoomProvider>,
    publisher: Arc<dyn Publisher>,
    cache: Arc<StateCache>,
    colors: Arc<dyn ColorTable>,
    messages: Arc<Messages>,
    phrases: Option<Arc<dyn PhrasePool>>,
    random: Arc<dyn RandomSource>,
}

impl Dispatcher {
    /// Returns the device state cache this dispatcher reads.
    #[must_use]
    pub fn cache(&self) -> &Arc<StateCache> {
        &self.cache
    }

    /// Returns the configured reply texts.
    #[must_use]
    pub fn messages(&self) -> &Messages {
        &self.messages
    }

    /// Handles a request and returns the reply for the user.
    #[must_use]
    pub fn handle(&self, request: &ActionRequest) -> Reply {
        tracing::debug!(
            action = request.action.name(),
            site = %request.context.site_id,
            location = ?request.context.location,
            "Handling request"
        );
        self.try_handle(request).unwrap_or_else(|e| {
            tracing::debug!(error = %e, "Request refused");
            Reply::from(e)
        })
    }

    fn try_handle(&self, request: &ActionRequest) -> Result<Reply, DispatchError> {
        if matches!(request.action, Action::ActivateScene) {
            return Ok(Reply::Say(self.messages.not_implemented.clone()));
        }

        match resolve(
            self.rooms.as_ref(),
            &request.context,
            &self.messages.unknown_device,
        )? {
            Target::Single(target) => self.apply(request, target),
            Target::AllRooms(targets) => self.fan_out(&request.action, &targets),
        }
    }

    fn apply(&self, request: &ActionRequest, target: RoomTarget<'_>) -> Result<Reply, DispatchError> {
        let action = &request.action;
        run_guards(&guards_for(action, &self.messages), target.config, action)?;

        let status = self.cache.snapshot(target.device.as_str());
        let outcome =
            self.synthesizer()
                .synthesize(action, status.as_deref(), target.config.dim_step())?;

        match outcome {
            Outcome::Notice(notice) => Ok(Reply::Say(self.messages.notice(notice).to_string())),
            Outcome::Publish(payload) => {
                let extras = self.extras(action, &payload);
                self.publish(&ControlMessage::new(target.device.clone(), payload));
                if self.rooms.is_current_room(&request.context) {
                    Ok(Reply::Silent)
                } else {
                    Ok(Reply::Say(self.confirmation(&extras)))
                }
            }
        }
    }

    /// Applies one payload to every room with a device. Rooms whose guards
    /// fail are skipped without telling the user.
    fn fan_out(&self, action: &Action, targets: &[RoomTarget<'_>]) -> Result<Reply, DispatchError> {
        let outcome = self
            .synthesizer()
            .synthesize(action, None, RoomConfig::DEFAULT_DIM_STEP)?;
        let payload = match outcome {
            Outcome::Publish(payload) => payload,
            Outcome::Notice(notice) => {
                return Ok(Reply::Say(self.messages.notice(notice).to_string()));
            }
        };

        let guards = guards_for(action, &self.messages);
        for target in targets {
            if let Err(e) = run_guards(&guards, target.config, action) {
                tracing::warn!(
                    room = %target.room,
                    device = %target.device,
                    error = %e,
                    "Skipping room in fan-out"
                );
                continue;
            }
            self.publish(&ControlMessage::new(target.device.clone(), payload.clone()));
        }

        let extras = self.extras(action, &payload);
        Ok(Reply::Say(self.confirmation(&extras)))
    }

    fn synthesizer(&self) -> Synthesizer<'_> {
        Synthesizer::new(self.colors.as_ref(), &self.messages)
    }

    fn publish(&self, message: &ControlMessage) {
        match self.publisher.publish(message) {
            Ok(()) => tracing::debug!(
                device = %message.device,
                payload = ?message.payload,
                "Published control message"
            ),
            Err(e) => tracing::warn!(
                device = %message.device,
                error = %e,
                "Failed to publish control message"
            ),
        }
    }

    /// Extra confirmation variants for switch requests.
    fn extras<'m>(&'m self, action: &Action, payload: &ControlPayload) -> Vec<&'m str> {
        match action {
            Action::SwitchOn { .. } | Action::SwitchOff
                if payload.state == Some(PowerState::Off) =>
            {
                vec![self.messages.switched_off.as_str()]
            }
            Action::SwitchOn { .. } => vec![self.messages.switched_on.as_str()],
            _ => Vec::new(),
        }
    }

    fn confirmation(&self, extras: &[&str]) -> String {
        let pool: &dyn PhrasePool = match &self.phrases {
            Some(phrases) => phrases.as_ref(),
            None => self.messages.as_ref(),
        };
        confirm(pool, self.random.as_ref(), extras).unwrap_or_else(|| self.messages.done.clone())
    }
}

impl std::fmt::Debug for Dispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Dispatcher")
            .field("cached_devices", &self.cache.len())
            .field("rooms", &self.rooms.rooms().len())
            .finish_non_exhaustive()
    }
}

/// Builder for a [`Dispatcher`].
///
/// Rooms and publisher are required; everything else has a default: a fresh
/// cache, the CSS color table, English messages, the messages' confirmation
/// pool and thread-local randomness.
#[must_use]
pub struct DispatcherBuilder {
    rooms: Arc<dyn RoomProvider>,
    publisher: Arc<dyn Publisher>,
    cache: Option<Arc<StateCache>>,
    colors: Option<Arc<dyn ColorTable>>,
    messages: Messages,
    phrases: Option<Arc<dyn PhrasePool>>,
    random: Option<Arc<dyn RandomSource>>,
}

impl DispatcherBuilder {
    /// Creates a builder.
    pub fn new(rooms: Arc<dyn RoomProvider>, publisher: Arc<dyn Publisher>) -> Self {
        Self {
            rooms,
            publisher,
            cache: None,
            colors: None,
            messages: Messages::default(),
            phrases: None,
            random: None,
        }
    }

    /// Shares an existing state cache, typically the one a status router feeds.
    pub fn cache(mut self, cache: Arc<StateCache>) -> Self {
        self.cache = Some(cache);
        self
    }

    /// Sets the color table.
    pub fn colors(mut self, colors: Arc<dyn ColorTable>) -> Self {
        self.colors = Some(colors);
        self
    }

    /// Sets the reply texts.
    pub fn messages(mut self, messages: Messages) -> Self {
        self.messages = messages;
        self
    }

    /// Replaces the confirmation pool taken from the messages.
    pub fn phrases(mut self, phrases: Arc<dyn PhrasePool>) -> Self {
        self.phrases = Some(phrases);
        self
    }

    /// Sets the randomness source for confirmations.
    pub fn random(mut self, random: Arc<dyn RandomSource>) -> Self {
        self.random = Some(random);
        self
    }

    /// Builds the dispatcher.
    #[must_use]
    pub fn build(self) -> Dispatcher {
        Dispatcher {
            rooms: self.rooms,
            publisher: self.publisher,
            cache: self.cache.unwrap_or_default(),
            colors: self.colors.unwrap_or_else(|| Arc::new(CssColors)),
            messages: Arc::new(self.messages),
            phrases: self.phrases,
            random: self.random.unwrap_or_else(|| Arc::new(ThreadRandom)),
        }
    }
}
