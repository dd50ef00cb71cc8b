// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Value types exchanged with the bus and with voice input.
//!
//! Each type ensures values are within their valid ranges at construction
//! time.
//!
//! # Types
//!
//! - [`DeviceId`] - Device identifier in the topic namespace
//! - [`PowerState`] - On/Off
//! - [`Brightness`] - Bus brightness (0-254)
//! - [`Percent`] - Voice percentage (0-100)
//! - [`RgbColor`] - RGB color (`{r, g, b}` on the wire)

mod brightness;
mod device_id;
mod power;
mod rgb_color;

pub use brightness::{Brightness, Percent};
pub use device_id::DeviceId;
pub use power::PowerState;
pub use rgb_color::RgbColor;
