// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Color name lookup.
//!
//! The dispatcher resolves spoken color names through a [`ColorTable`].
//! [`CssColors`] covers the CSS named colors; any
//! `HashMap<String, RgbColor>` works as a table too.

mod css;

use std::collections::HashMap;

pub use css::CssColors;

use crate::types::RgbColor;

/// Maps color names to RGB values.
pub trait ColorTable: Send + Sync {
    /// Looks up a color by name.
    fn lookup(&self, name: &str) -> Option<RgbColor>;
}

impl ColorTable for HashMap<String, RgbColor> {
    fn lookup(&self, name: &str) -> Option<RgbColor> {
        self.get(name)
            .or_else(|| self.get(&normalize(name)))
            .copied()
    }
}

/// Lower-cases a color name and strips whitespace, so that "Light Blue"
/// matches `lightblue`.
#[must_use]
pub fn normalize(name: &str) -> String {
    name.chars()
        .filter(|c| !c.is_whitespace())
        .flat_map(char::to_lowercase)
        .collect()
}
