// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Light effects supported by Sengled Wi-Fi color bulbs.

use std::fmt;
use std::str::FromStr;

use crate::error::ValueError;

/// A built-in light effect of a Wi-Fi color bulb.
///
/// Effects travel over MQTT as `effectStatus` updates carrying a numeric
/// code (`"0"` to `"6"`). Front ends show them by label.
///
/// # Examples
///
/// ```
/// use sengled_lib::types::Effect;
///
/// let effect: Effect = "Christmas".parse().unwrap();
/// assert_eq!(effect, Effect::Christmas);
/// assert_eq!(effect.vendor_code(), "4");
///
/// assert_eq!(Effect::from_vendor_code("1"), Some(Effect::ColorCycle));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum Effect {
    /// No effect.
    Off,
    /// Cycle smoothly through colors.
    ColorCycle,
    /// Jump between random colors.
    RandomColor,
    /// Pulse with ambient sound.
    Rhythm,
    /// Christmas color pattern.
    Christmas,
    /// Halloween color pattern.
    Halloween,
    /// Festival color pattern.
    Festival,
}

impl Effect {
    /// All effects, in the order front ends list them.
    pub const ALL: [Self; 7] = [
        Self::Off,
        Self::Christmas,
        Self::ColorCycle,
        Self::Festival,
        Self::Halloween,
        Self::Rhythm,
        Self::RandomColor,
    ];

    /// Returns the code used in `effectStatus` updates.
    #[must_use]
    pub const fn vendor_code(&self) -> &'static str {
        match self {
            Self::Off => "0",
            Self::ColorCycle => "1",
            Self::RandomColor => "2",
            Self::Rhythm => "3",
            Self::Christmas => "4",
            Self::Halloween => "5",
            Self::Festival => "6",
        }
    }

    /// Parses an `effectStatus` code.
    #[must_use]
    pub fn from_vendor_code(code: &str) -> Option<Self> {
        match code.trim() {
            "0" => Some(Self::Off),
            "1" => Some(Self::ColorCycle),
            "2" => Some(Self::RandomColor),
            "3" => Some(Self::Rhythm),
            "4" => Some(Self::Christmas),
            "5" => Some(Self::Halloween),
            "6" => Some(Self::Festival),
            _ => None,
        }
    }

    /// Returns the display label.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Off => "Off",
            Self::ColorCycle => "Color Cycle",
            Self::RandomColor => "Random Color",
            Self::Rhythm => "Rhythm",
            Self::Christmas => "Christmas",
            Self::Halloween => "Halloween",
            Self::Festival => "Festival",
        }
    }
}

impl fmt::Display for Effect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Effect {
    type Err = ValueError;

    /// Parses a label. The misspelled labels older front ends still send
    /// ("Ramdom Color", "Rythum") are accepted too.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "Off" | "OFF" => Ok(Self::Off),
            "Color Cycle" => Ok(Self::ColorCycle),
            "Random Color" | "Ramdom Color" | "Randmon Color" => Ok(Self::RandomColor),
            "Rhythm" | "Rythum" => Ok(Self::Rhythm),
            "Christmas" => Ok(Self::Christmas),
            "Halloween" => Ok(Self::Halloween),
            "Festival" => Ok(Self::Festival),
            other => Err(ValueError::InvalidEffect(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_match_labels() {
        for effect in Effect::ALL {
            assert_eq!(Effect::from_vendor_code(effect.vendor_code()), Some(effect));
            assert_eq!(effect.label().parse::<Effect>().unwrap(), effect);
        }
    }

    #[test]
    fn legacy_labels_are_accepted() {
        assert_eq!("Ramdom Color".parse::<Effect>().unwrap(), Effect::RandomColor);
        assert_eq!("Rythum".parse::<Effect>().unwrap(), Effect::Rhythm);
    }

    #[test]
    fn unknown_label_is_rejected() {
        let err = "Disco".parse::<Effect>().unwrap_err();
        assert_eq!(err, ValueError::InvalidEffect("Disco".to_string()));
        assert_eq!(Effect::from_vendor_code("9"), None);
    }
}
