// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Light intents expressed in home-automation units.

use crate::command::BulbCommand;
use crate::error::ValueError;
use crate::types::{Effect, PowerState, RgbColor, mired_to_kelvin};

/// A bundle of light settings applied by a single "turn on".
///
/// Units follow what home-automation front ends use: brightness 0-255,
/// hue/saturation, and color temperature in mireds. An empty request just
/// switches the bulb on.
///
/// # Examples
///
/// ```
/// use sengled_lib::command::{BulbCommand, LightRequest};
/// use sengled_lib::types::PowerState;
///
/// let empty = LightRequest::new();
/// assert_eq!(empty.commands().unwrap(), vec![BulbCommand::Switch(PowerState::On)]);
///
/// let dim_warm = LightRequest::new().with_brightness(64).with_color_temp_mireds(370);
/// assert_eq!(
///     dim_warm.commands().unwrap(),
///     vec![BulbCommand::Brightness(64), BulbCommand::ColorTemperature(2702)]
/// );
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LightRequest {
    brightness: Option<u8>,
    hs_color: Option<(u16, u8)>,
    color_temp_mireds: Option<u16>,
    effect: Option<Effect>,
}

impl LightRequest {
    /// Creates an empty request.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets brightness (0-255).
    #[must_use]
    pub fn with_brightness(mut self, brightness: u8) -> Self {
        self.brightness = Some(brightness);
        self
    }

    /// Sets hue (0-360) and saturation (0-100).
    #[must_use]
    pub fn with_hs_color(mut self, hue: u16, saturation: u8) -> Self {
        self.hs_color = Some((hue, saturation));
        self
    }

    /// Sets color temperature in mireds.
    #[must_use]
    pub fn with_color_temp_mireds(mut self, mireds: u16) -> Self {
        self.color_temp_mireds = Some(mireds);
        self
    }

    /// Sets the effect.
    #[must_use]
    pub fn with_effect(mut self, effect: Effect) -> Self {
        self.effect = Some(effect);
        self
    }

    /// Returns the requested brightness.
    #[must_use]
    pub fn brightness(&self) -> Option<u8> {
        self.brightness
    }

    /// Returns the requested hue and saturation.
    #[must_use]
    pub fn hs_color(&self) -> Option<(u16, u8)> {
        self.hs_color
    }

    /// Returns the requested color temperature in mireds.
    #[must_use]
    pub fn color_temp_mireds(&self) -> Option<u16> {
        self.color_temp_mireds
    }

    /// Returns the requested effect.
    #[must_use]
    pub fn effect(&self) -> Option<Effect> {
        self.effect
    }

    /// Returns `true` if nothing but "on" is requested.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.brightness.is_none()
            && self.hs_color.is_none()
            && self.color_temp_mireds.is_none()
            && self.effect.is_none()
    }

    /// Expands the request into bulb commands.
    ///
    /// Order: brightness, color, color temperature, effect.
    ///
    /// # Errors
    ///
    /// Returns [`ValueError::OutOfRange`] for a color temperature of 0 mireds.
    pub fn commands(&self) -> Result<Vec<BulbCommand>, ValueError> {
        if self.is_empty() {
            return Ok(vec![BulbCommand::Switch(PowerState::On)]);
        }

        let mut commands = Vec::new();
        if let Some(brightness) = self.brightness {
            commands.push(BulbCommand::Brightness(brightness));
        }
        if let Some((hue, saturation)) = self.hs_color {
            commands.push(BulbCommand::Color(RgbColor::from_hs(hue, saturation)));
        }
        if let Some(mireds) = self.color_temp_mireds {
            let kelvin = mired_to_kelvin(mireds).ok_or(ValueError::OutOfRange {
                min: 1,
                max: i64::from(u16::MAX),
                actual: i64::from(mireds),
            })?;
            commands.push(BulbCommand::ColorTemperature(kelvin));
        }
        if let Some(effect) = self.effect {
            commands.push(BulbCommand::Effect(effect));
        }
        Ok(commands)
    }
}
