// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Intent names and confidence thresholds.

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// The kinds of intent this crate handles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IntentKind {
    /// Switch a light on.
    SwitchOn,
    /// Switch a light off.
    SwitchOff,
    /// Change a light's color.
    ChangeColor,
    /// Dim a light up or down.
    Dim,
    /// Activate a scene.
    ActivateScene,
}

/// An intent name with its minimum confidence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IntentBinding {
    /// Fully qualified intent name.
    pub name: String,
    /// Intents classified below this confidence are ignored.
    #[serde(default)]
    pub min_confidence: f32,
}

impl IntentBinding {
    fn new(name: &str, min_confidence: f32) -> Self {
        Self {
            name: name.to_string(),
            min_confidence,
        }
    }
}

/// The intent names this crate listens to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IntentConfig {
    /// Switch on.
    pub switch_on: IntentBinding,
    /// Switch off.
    pub switch_off: IntentBinding,
    /// Change color.
    pub change_color: IntentBinding,
    /// Relative dimming.
    pub dim: IntentBinding,
    /// Scenes.
    pub scenes: IntentBinding,
}

impl Default for IntentConfig {
    fn default() -> Self {
        Self {
            switch_on: IntentBinding::new("domi:LampenAnSchalten", 0.6),
            switch_off: IntentBinding::new("domi:LampenAusSchalten", 0.6),
            change_color: IntentBinding::new("domi:FarbeWechseln", 0.6),
            dim: IntentBinding::new("domi:LichtDimmen", 0.7),
            scenes: IntentBinding::new("domi:SzenenSchalten", 0.0),
        }
    }
}

impl IntentConfig {
    fn bindings(&self) -> [(IntentKind, &IntentBinding); 5] {
        [
            (IntentKind::SwitchOn, &self.switch_on),
            (IntentKind::SwitchOff, &self.switch_off),
            (IntentKind::ChangeColor, &self.change_color),
            (IntentKind::Dim, &self.dim),
            (IntentKind::ActivateScene, &self.scenes),
        ]
    }

    /// Looks up the kind and binding for an intent name.
    #[must_use]
    pub fn lookup(&self, intent_name: &str) -> Option<(IntentKind, &IntentBinding)> {
        self.bindings()
            .into_iter()
            .find(|(_, binding)| binding.name == intent_name)
    }

    /// Checks that every threshold lies in [0, 1].
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidConfidence` for the first bad threshold.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (_, binding) in self.bindings() {
            if !(0.0..=1.0).contains(&binding.min_confidence) {
                return Err(ConfigError::InvalidConfidence {
                    intent: binding.name.clone(),
                    value: binding.min_confidence,
                });
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_names() {
        let config = IntentConfig::default();
        let (kind, binding) = config.lookup("domi:LichtDimmen").unwrap();
        assert_eq!(kind, IntentKind::Dim);
        assert!((binding.min_confidence - 0.7).abs() < f32::EPSILON);
        assert_eq!(
            config.lookup("domi:SzenenSchalten").unwrap().0,
            IntentKind::ActivateScene
        );
        assert!(config.lookup("other:Weather").is_none());
    }

    #[test]
    fn partial_override() {
        let config: IntentConfig =
            serde_json::from_str(r#"{"switch_on":{"name":"lights:On","min_confidence":0.5}}"#)
                .unwrap();
        assert_eq!(config.lookup("lights:On").unwrap().0, IntentKind::SwitchOn);
        assert!(config.lookup("domi:LampenAnSchalten").is_none());
        assert_eq!(config.switch_off.name, "domi:LampenAusSchalten");
    }

    #[test]
    fn validate_thresholds() {
        assert!(IntentConfig::default().validate().is_ok());
        let mut config = IntentConfig::default();
        config.dim.min_confidence = 1.5;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidConfidence { intent, .. }) if intent == "domi:LichtDimmen"
        ));
    }
}
