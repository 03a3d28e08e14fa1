// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Reported state of a single bulb.

use crate::types::{Effect, PowerState, RgbColor};

use super::StateChange;

/// Last known state of a bulb.
///
/// Numeric fields are not clamped to vendor ranges: push updates store the
/// reported value as is, so a Wi-Fi bulb's brightness briefly holds the
/// vendor percentage until the next pull refresh rescales it.
///
/// # Examples
///
/// ```
/// use sengled_lib::state::{BulbState, StateChange};
///
/// let mut state = BulbState::new("Porch");
/// assert_eq!(state.brightness(), 255);
/// assert_eq!(state.color(), "255:255:255");
///
/// state.apply(&StateChange::Brightness(40));
/// assert_eq!(state.brightness(), 40);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct BulbState {
    name: String,
    power: PowerState,
    available: bool,
    rssi: i32,
    brightness: u8,
    color: String,
    rgb: RgbColor,
    color_temperature: Option<u16>,
    color_mode: Option<String>,
    alarm_status: String,
    effect: Option<Effect>,
    neon_status: u8,
}

impl Default for BulbState {
    fn default() -> Self {
        Self::new(String::new())
    }
}

impl BulbState {
    /// Signal strength assumed before the first refresh.
    pub const DEFAULT_RSSI: i32 = -30;

    /// Creates the state of a freshly discovered bulb.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            power: PowerState::Off,
            available: false,
            rssi: Self::DEFAULT_RSSI,
            brightness: 255,
            color: RgbColor::white().to_vendor_string(),
            rgb: RgbColor::white(),
            color_temperature: None,
            color_mode: None,
            alarm_status: "0".to_string(),
            effect: None,
            neon_status: 0,
        }
    }

    /// Applies a change. Returns `true` if the state actually changed.
    pub fn apply(&mut self, change: &StateChange) -> bool {
        match change {
            StateChange::Name(name) => replace(&mut self.name, name.clone()),
            StateChange::Power(power) => replace(&mut self.power, *power),
            StateChange::Available(available) => replace(&mut self.available, *available),
            StateChange::Rssi(rssi) => replace(&mut self.rssi, *rssi),
            StateChange::Brightness(brightness) => replace(&mut self.brightness, *brightness),
            StateChange::Color(color) => replace(&mut self.color, color.clone()),
            StateChange::Rgb(rgb) => replace(&mut self.rgb, *rgb),
            StateChange::ColorTemperature(ct) => replace(&mut self.color_temperature, Some(*ct)),
            StateChange::ColorMode(mode) => replace(&mut self.color_mode, Some(mode.clone())),
            StateChange::AlarmStatus(status) => replace(&mut self.alarm_status, status.clone()),
            StateChange::Effect(effect) => replace(&mut self.effect, Some(*effect)),
            StateChange::NeonStatus(status) => replace(&mut self.neon_status, *status),
        }
    }

    /// Display name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Power state.
    #[must_use]
    pub fn power(&self) -> PowerState {
        self.power
    }

    /// Returns `true` if the bulb is on.
    #[must_use]
    pub fn is_on(&self) -> bool {
        self.power.is_on()
    }

    /// Whether the cloud reports the bulb online.
    #[must_use]
    pub fn is_available(&self) -> bool {
        self.available
    }

    /// Signal strength in dBm.
    #[must_use]
    pub fn rssi(&self) -> i32 {
        self.rssi
    }

    /// Brightness (0-255 after a refresh).
    #[must_use]
    pub fn brightness(&self) -> u8 {
        self.brightness
    }

    /// Wi-Fi color in the vendor `"R:G:B"` format.
    #[must_use]
    pub fn color(&self) -> &str {
        &self.color
    }

    /// Zigbee RGB components.
    #[must_use]
    pub fn rgb(&self) -> RgbColor {
        self.rgb
    }

    /// Color temperature, if reported.
    #[must_use]
    pub fn color_temperature(&self) -> Option<u16> {
        self.color_temperature
    }

    /// Color mode, if a Wi-Fi bulb reported one.
    #[must_use]
    pub fn color_mode(&self) -> Option<&str> {
        self.color_mode.as_deref()
    }

    /// Alarm status.
    #[must_use]
    pub fn alarm_status(&self) -> &str {
        &self.alarm_status
    }

    /// Active effect, if one was set.
    #[must_use]
    pub fn effect(&self) -> Option<Effect> {
        self.effect
    }

    /// Neon status.
    #[must_use]
    pub fn neon_status(&self) -> u8 {
        self.neon_status
    }
}

fn replace<T: PartialEq>(slot: &mut T, value: T) -> bool {
    if *slot == value {
        false
    } else {
        *slot = value;
        true
    }
}
