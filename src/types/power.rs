// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Power state of a bulb or switch.

use std::fmt;
use std::str::FromStr;

use crate::error::ValueError;

/// Represents the power state of a device.
///
/// The Sengled cloud encodes power as the strings `"1"` (on) and `"0"` (off),
/// both in MQTT updates and in the Zigbee `onoff` attribute.
///
/// # Examples
///
/// ```
/// use sengled_lib::types::PowerState;
///
/// assert_eq!(PowerState::On.vendor_code(), "1");
/// assert_eq!(PowerState::Off.vendor_code(), "0");
/// assert!(PowerState::On.is_on());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, serde::Serialize, serde::Deserialize)]
pub enum PowerState {
    /// Power is off.
    #[default]
    Off,
    /// Power is on.
    On,
}

impl PowerState {
    /// Returns the display representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Off => "OFF",
            Self::On => "ON",
        }
    }

    /// Returns the code the Sengled cloud uses for this state.
    #[must_use]
    pub const fn vendor_code(&self) -> &'static str {
        match self {
            Self::Off => "0",
            Self::On => "1",
        }
    }

    /// Returns `true` if the state is [`PowerState::On`].
    #[must_use]
    pub const fn is_on(&self) -> bool {
        matches!(self, Self::On)
    }
}

impl fmt::Display for PowerState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for PowerState {
    type Err = ValueError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "OFF" | "0" | "FALSE" => Ok(Self::Off),
            "ON" | "1" | "TRUE" => Ok(Self::On),
            _ => Err(ValueError::InvalidPowerState(s.to_string())),
        }
    }
}

impl From<bool> for PowerState {
    fn from(value: bool) -> Self {
        if value { Self::On } else { Self::Off }
    }
}

impl From<PowerState> for bool {
    fn from(value: PowerState) -> Self {
        value.is_on()
    }
}
