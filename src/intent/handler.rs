// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Translation of recognized intents into dispatcher requests.

use crate::command::{Action, ActionRequest};
use crate::dispatcher::Dispatcher;
use crate::error::ParseError;
use crate::reply::Reply;
use crate::rooms::RoomContext;
use crate::types::Percent;

use super::{IntentConfig, IntentKind, IntentMessage, SessionReply};

/// Slot carrying the addressed room.
pub const LOCATION_SLOT: &str = "location";
/// Slot carrying a brightness percentage.
pub const BRIGHTNESS_SLOT: &str = "brightness";
/// Slot carrying a color name.
pub const COLOR_SLOT: &str = "color";
/// Slot carrying the dim direction.
pub const ACTION_SLOT: &str = "action";

/// Handles Hermes intents with a [`Dispatcher`].
#[derive(Debug, Clone)]
pub struct IntentHandler {
    dispatcher: Dispatcher,
    intents: IntentConfig,
}

impl IntentHandler {
    /// Creates a handler.
    #[must_use]
    pub fn new(dispatcher: Dispatcher, intents: IntentConfig) -> Self {
        Self {
            dispatcher,
            intents,
        }
    }

    /// Returns the dispatcher.
    #[must_use]
    pub fn dispatcher(&self) -> &Dispatcher {
        &self.dispatcher
    }

    /// Parses and handles an intent payload.
    ///
    /// # Errors
    ///
    /// Returns `ParseError` if the payload is not an intent message.
    pub fn handle_payload(&self, payload: &[u8]) -> Result<Option<SessionReply>, ParseError> {
        let message = IntentMessage::from_payload(payload)?;
        Ok(self.handle(&message))
    }

    /// Handles an intent.
    ///
    /// Returns `None` for intents that belong to someone else. Intents below
    /// their confidence threshold end the session without a reply.
    #[must_use]
    pub fn handle(&self, message: &IntentMessage) -> Option<SessionReply> {
        let intent_name = &message.intent.intent_name;
        let Some((kind, binding)) = self.intents.lookup(intent_name) else {
            tracing::trace!(intent = %intent_name, "Ignoring foreign intent");
            return None;
        };

        if message.intent.confidence_score < binding.min_confidence {
            tracing::debug!(
                intent = %intent_name,
                confidence = message.intent.confidence_score,
                threshold = binding.min_confidence,
                "Intent below confidence threshold"
            );
            return Some(SessionReply::End {
                session_id: message.session_id.clone(),
                text: None,
            });
        }

        if kind == IntentKind::SwitchOn
            && message
                .slot(BRIGHTNESS_SLOT)
                .is_some_and(|value| value.as_f64().is_none())
        {
            tracing::debug!(intent = %intent_name, "Brightness slot is not a number");
            let reply = Reply::Clarify {
                prompt: self.dispatcher.messages().how_bright.clone(),
                slot: BRIGHTNESS_SLOT.to_string(),
            };
            return Some(session_reply(message, reply));
        }

        let request = request_for(kind, message);
        let reply = self.dispatcher.handle(&request);
        Some(session_reply(message, reply))
    }
}

/// Builds the dispatcher request for an intent.
#[must_use]
pub fn request_for(kind: IntentKind, message: &IntentMessage) -> ActionRequest {
    let context = match message
        .slot(LOCATION_SLOT)
        .and_then(|value| value.as_str())
    {
        Some(location) => RoomContext::named(message.site_id.clone(), location),
        None => RoomContext::here(message.site_id.clone()),
    };

    let action = match kind {
        IntentKind::SwitchOn => Action::SwitchOn {
            brightness: message
                .slot(BRIGHTNESS_SLOT)
                .and_then(|value| value.as_f64())
                .map(Percent::clamped),
        },
        IntentKind::SwitchOff => Action::SwitchOff,
        IntentKind::ChangeColor => Action::ChangeColor {
            color: message
                .slot(COLOR_SLOT)
                .and_then(|value| value.as_str())
                .map(str::to_string),
        },
        IntentKind::Dim => Action::Dim {
            direction: message
                .slot(ACTION_SLOT)
                .and_then(|value| value.as_str())
                .and_then(|direction| direction.parse().ok()),
        },
        IntentKind::ActivateScene => Action::ActivateScene,
    };

    ActionRequest::new(context, action)
}

fn session_reply(message: &IntentMessage, reply: Reply) -> SessionReply {
    let session_id = message.session_id.clone();
    match reply {
        Reply::Silent => SessionReply::End {
            session_id,
            text: None,
        },
        Reply::Say(text) => SessionReply::End {
            session_id,
            text: Some(text),
        },
        Reply::Clarify { prompt, slot } => SessionReply::Continue {
            session_id,
            text: prompt,
            intent_filter: vec![message.intent.intent_name.clone()],
            slot,
        },
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use parking_lot::Mutex;

    use super::*;
    use crate::Capabilities;
    use crate::DispatcherBuilder;
    use crate::command::{ControlMessage, ControlPayload, DimDirection};
    use crate::error::ProtocolError;
    use crate::protocol::Publisher;
    use crate::reply::FixedSequence;
    use crate::rooms::{RoomConfig, RoomDirectory};
    use crate::types::{Brightness, DeviceId};

    #[derive(Default)]
    struct Recorder(Mutex<Vec<ControlMessage>>);

    impl Publisher for Recorder {
        fn publish(&self, message: &ControlMessage) -> Result<(), ProtocolError> {
            self.0.lock().push(message.clone());
            Ok(())
        }
    }

    fn handler(recorder: Arc<Recorder>) -> IntentHandler {
        let rooms = RoomDirectory::new()
            .with_room(
                "bathroom",
                RoomConfig::new()
                    .with_device(DeviceId::new("bath_light").unwrap())
                    .with_capabilities(Capabilities::parse("brightness")),
            )
            .with_site("kitchen", "kitchen");
        let dispatcher = DispatcherBuilder::new(Arc::new(rooms), recorder)
            .random(Arc::new(FixedSequence::new([0])))
            .build();
        IntentHandler::new(dispatcher, IntentConfig::default())
    }

    fn message(intent: &str, confidence: f32, slots: &str) -> IntentMessage {
        let json = format!(
            r#"{{"sessionId":"s","siteId":"kitchen",
                "intent":{{"intentName":"{intent}","confidenceScore":{confidence}}},
                "slots":[{slots}]}}"#
        );
        IntentMessage::from_payload(json.as_bytes()).unwrap()
    }

    fn slot(name: &str, kind: &str, value: &str) -> String {
        format!(r#"{{"slotName":"{name}","value":{{"kind":"{kind}","value":{value}}}}}"#)
    }

    #[test]
    fn switch_on_with_brightness() {
        let recorder = Arc::new(Recorder::default());
        let handler = handler(recorder.clone());
        let slots = format!(
            "{},{}",
            slot("location", "Custom", r#""bathroom""#),
            slot("brightness", "Percentage", "50")
        );

        let reply = handler
            .handle(&message("domi:LampenAnSchalten", 0.9, &slots))
            .unwrap();

        assert_eq!(
            reply,
            SessionReply::End {
                session_id: "s".into(),
                text: Some("switched on".into())
            }
        );
        assert_eq!(
            recorder.0.lock()[0].payload,
            ControlPayload::on().with_brightness(Brightness::new(127).unwrap())
        );
    }

    #[test]
    fn unreadable_brightness_asks_again() {
        let recorder = Arc::new(Recorder::default());
        let handler = handler(recorder.clone());
        handler.dispatcher().cache().record(
            DeviceId::new("bath_light").unwrap(),
            crate::state::DeviceStatus::from_payload(r#"{"state":"ON"}"#).unwrap(),
        );
        let slots = format!(
            "{},{}",
            slot("location", "Custom", r#""bathroom""#),
            slot("brightness", "Custom", r#""very""#)
        );

        let reply = handler
            .handle(&message("domi:LampenAnSchalten", 0.9, &slots))
            .unwrap();

        assert_eq!(
            reply,
            SessionReply::Continue {
                session_id: "s".into(),
                text: "how bright?".into(),
                intent_filter: vec!["domi:LampenAnSchalten".into()],
                slot: "brightness".into(),
            }
        );
        assert!(recorder.0.lock().is_empty());
    }

    #[test]
    fn low_confidence_ends_silently() {
        let recorder = Arc::new(Recorder::default());
        let handler = handler(recorder.clone());
        let slots = slot("location", "Custom", r#""bathroom""#);

        let reply = handler
            .handle(&message("domi:LichtDimmen", 0.65, &slots))
            .unwrap();

        assert_eq!(
            reply,
            SessionReply::End {
                session_id: "s".into(),
                text: None
            }
        );
        assert!(recorder.0.lock().is_empty());
    }

    #[test]
    fn foreign_intent_is_ignored() {
        let handler = handler(Arc::new(Recorder::default()));
        assert!(handler.handle(&message("weather:Forecast", 1.0, "")).is_none());
    }

    #[test]
    fn missing_direction_continues_session() {
        let handler = handler(Arc::new(Recorder::default()));
        let slots = slot("location", "Custom", r#""bathroom""#);

        let reply = handler
            .handle(&message("domi:LichtDimmen", 0.9, &slots))
            .unwrap();

        assert_eq!(
            reply,
            SessionReply::Continue {
                session_id: "s".into(),
                text: "brighter or lower?".into(),
                intent_filter: vec!["domi:LichtDimmen".into()],
                slot: "action".into(),
            }
        );
    }

    #[test]
    fn unknown_room_is_reported() {
        let handler = handler(Arc::new(Recorder::default()));
        let reply = handler
            .handle(&message("domi:LampenAusSchalten", 0.9, ""))
            .unwrap();
        assert_eq!(
            reply,
            SessionReply::End {
                session_id: "s".into(),
                text: Some("unknown device".into())
            }
        );
    }

    #[test]
    fn scenes_are_not_implemented() {
        let handler = handler(Arc::new(Recorder::default()));
        let reply = handler
            .handle(&message("domi:SzenenSchalten", 0.1, ""))
            .unwrap();
        assert_eq!(
            reply,
            SessionReply::End {
                session_id: "s".into(),
                text: Some("Not yet implemented".into())
            }
        );
    }

    #[test]
    fn request_mapping() {
        let slots = format!(
            "{},{}",
            slot("location", "Custom", r#""everywhere""#),
            slot("action", "Custom", r#""lower""#)
        );
        let request = request_for(IntentKind::Dim, &message("x", 1.0, &slots));
        assert_eq!(request.context, RoomContext::named("kitchen", "everywhere"));
        assert_eq!(
            request.action,
            Action::Dim {
                direction: Some(DimDirection::Lower)
            }
        );

        let odd = slot("action", "Custom", r#""sideways""#);
        let request = request_for(IntentKind::Dim, &message("x", 1.0, &odd));
        assert_eq!(request.context, RoomContext::here("kitchen"));
        assert_eq!(request.action, Action::Dim { direction: None });
    }

    #[test]
    fn handle_payload_rejects_garbage() {
        let handler = handler(Arc::new(Recorder::default()));
        assert!(handler.handle_payload(b"nope").is_err());
    }
}
