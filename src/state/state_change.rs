// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! State change representation.
//!
//! Each variant replaces one field of a [`BulbState`](super::BulbState).
//! Values are carried exactly as they will be stored: rescaling from vendor
//! units happens before a change is built, never while applying it.

use crate::types::{Effect, PowerState, RgbColor};

/// A change to one field of a bulb's state.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum StateChange {
    /// Display name changed.
    Name(String),

    /// Power state changed.
    Power(PowerState),

    /// Cloud reachability changed.
    Available(bool),

    /// Signal strength in dBm changed.
    Rssi(i32),

    /// Brightness changed.
    Brightness(u8),

    /// Wi-Fi color changed, in the vendor `"R:G:B"` format.
    Color(String),

    /// Zigbee RGB components changed.
    Rgb(RgbColor),

    /// Color temperature changed.
    ColorTemperature(u16),

    /// Color mode reported by a Wi-Fi bulb.
    ColorMode(String),

    /// Alarm status reported by an alarm-capable bulb.
    AlarmStatus(String),

    /// Light effect changed.
    Effect(Effect),

    /// Neon status changed.
    NeonStatus(u8),
}

impl StateChange {
    /// Returns the name of the field this change touches.
    #[must_use]
    pub const fn field(&self) -> &'static str {
        match self {
            Self::Name(_) => "name",
            Self::Power(_) => "power",
            Self::Available(_) => "available",
            Self::Rssi(_) => "rssi",
            Self::Brightness(_) => "brightness",
            Self::Color(_) => "color",
            Self::Rgb(_) => "rgb",
            Self::ColorTemperature(_) => "color_temperature",
            Self::ColorMode(_) => "color_mode",
            Self::AlarmStatus(_) => "alarm_status",
            Self::Effect(_) => "effect",
            Self::NeonStatus(_) => "neon_status",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn field_names() {
        assert_eq!(StateChange::Brightness(10).field(), "brightness");
        assert_eq!(
            StateChange::Color("1:2:3".to_string()).field(),
            "color"
        );
        assert_eq!(StateChange::Power(PowerState::On).field(), "power");
    }
}
