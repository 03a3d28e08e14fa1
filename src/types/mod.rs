// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Value types for Sengled bulb control.
//!
//! These types carry the values exchanged with the Sengled cloud together
//! with their vendor encodings.
//!
//! # Types
//!
//! - [`PowerState`] - On/Off, encoded as `"1"`/`"0"` by the cloud
//! - [`RgbColor`] - RGB triple, `"R,G,B"` on the UI side and `"R:G:B"` on the wire
//! - [`Effect`] - Wi-Fi bulb light effects
//! - [`rescale`] - Linear remap between two ranges
//! - [`kelvin_to_mired`] / [`mired_to_kelvin`] - Color temperature units

mod color;
mod effect;
mod power;
mod rgb_color;
mod scale;

pub use color::{DEFAULT_KELVIN, kelvin_to_mired, mired_to_kelvin};
pub use effect::Effect;
pub use power::PowerState;
pub use rgb_color::{RgbColor, convert_triple_to_vendor};
pub use scale::{rescale, round_half_even};
