// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Bulb command definitions.
//!
//! A [`BulbCommand`] is one intent sent to one bulb. It knows both wire
//! forms: the MQTT update message used by Wi-Fi bulbs and the HTTP request
//! used by Zigbee bulbs.
//!
//! | Command | MQTT `type` | MQTT `value` | Zigbee endpoint |
//! |---------|-------------|--------------|-----------------|
//! | [`Switch`](BulbCommand::Switch) | `switch` | `"1"`/`"0"` | `deviceSetOnOff` |
//! | [`Brightness`](BulbCommand::Brightness) | `brightness` | percent | `deviceSetBrightness` (raw 0-255) |
//! | [`ColorTemperature`](BulbCommand::ColorTemperature) | `colorTemperature` | percent | `deviceSetColorTemperature` |
//! | [`Color`](BulbCommand::Color) | `color` | `"R:G:B"` | `deviceSetGroup` |
//! | [`Effect`](BulbCommand::Effect) | `effectStatus` | code | none |
//! | [`Neon`](BulbCommand::Neon) | `neonStatus` | number | none |
//!
//! # Examples
//!
//! ```
//! use sengled_lib::command::BulbCommand;
//! use serde_json::json;
//!
//! let cmd = BulbCommand::Brightness(255);
//! assert_eq!(cmd.type_tag(), "brightness");
//! assert_eq!(cmd.mqtt_value(), "100");
//!
//! let message = cmd.mqtt_payload("B0:CE:18:00:00:01", 1_700_000_000_000);
//! assert_eq!(
//!     message,
//!     json!({
//!         "dn": "B0:CE:18:00:00:01",
//!         "type": "brightness",
//!         "value": "100",
//!         "time": 1_700_000_000_000_i64
//!     })
//! );
//! ```

mod light;

pub use light::LightRequest;

use serde_json::{Value, json};

use crate::protocol::Endpoints;
use crate::state::StateChange;
use crate::types::{Effect, PowerState, RgbColor, rescale, round_half_even};

/// Group command id the cloud uses for RGB color.
const SET_COLOR_CMD_ID: u8 = 129;

/// Returns the topic Wi-Fi bulbs receive commands on.
#[must_use]
pub fn update_topic(mac: &str) -> String {
    format!("wifielement/{mac}/update")
}

/// Returns the topic Wi-Fi bulbs report status on.
#[must_use]
pub fn status_topic(mac: &str) -> String {
    format!("wifielement/{mac}/status")
}

/// One command for one bulb.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BulbCommand {
    /// Turn the bulb on or off.
    Switch(PowerState),
    /// Set brightness on the 0-255 scale.
    Brightness(u8),
    /// Set color temperature in kelvin.
    ColorTemperature(u16),
    /// Set RGB color.
    Color(RgbColor),
    /// Start a light effect. Wi-Fi only.
    Effect(Effect),
    /// Set the neon status. Wi-Fi only.
    Neon(u8),
}

impl BulbCommand {
    /// MQTT `type` tag.
    #[must_use]
    pub const fn type_tag(&self) -> &'static str {
        match self {
            Self::Switch(_) => "switch",
            Self::Brightness(_) => "brightness",
            Self::ColorTemperature(_) => "colorTemperature",
            Self::Color(_) => "color",
            Self::Effect(_) => "effectStatus",
            Self::Neon(_) => "neonStatus",
        }
    }

    /// Returns `true` for commands that have no Zigbee form.
    #[must_use]
    pub const fn is_wifi_only(&self) -> bool {
        matches!(self, Self::Effect(_) | Self::Neon(_))
    }

    /// MQTT `value` field.
    #[must_use]
    pub fn mqtt_value(&self) -> String {
        match self {
            Self::Switch(state) => state.vendor_code().to_string(),
            Self::Brightness(b) => brightness_percent(*b).to_string(),
            Self::ColorTemperature(k) => color_temperature_percent(*k).to_string(),
            Self::Color(color) => color.to_vendor_string(),
            Self::Effect(effect) => effect.vendor_code().to_string(),
            Self::Neon(n) => n.to_string(),
        }
    }

    /// Full MQTT update message for `mac`, stamped with `time_ms`.
    #[must_use]
    pub fn mqtt_payload(&self, mac: &str, time_ms: i64) -> Value {
        json!({
            "dn": mac,
            "type": self.type_tag(),
            "value": self.mqtt_value(),
            "time": time_ms,
        })
    }

    /// Zigbee HTTP request as `(url, payload)`.
    ///
    /// Returns `None` for Wi-Fi only commands.
    #[must_use]
    pub fn http_request(&self, mac: &str, endpoints: &Endpoints) -> Option<(String, Value)> {
        let request = match self {
            Self::Switch(state) => (
                endpoints.set_on_off(),
                json!({"deviceUuid": mac, "onoff": state.vendor_code()}),
            ),
            Self::Brightness(b) => (
                endpoints.set_brightness(),
                json!({"deviceUuid": mac, "brightness": b}),
            ),
            Self::ColorTemperature(k) => (
                endpoints.set_color_temperature(),
                json!({"deviceUuid": mac, "colorTemperature": color_temperature_percent(*k)}),
            ),
            Self::Color(color) => (
                endpoints.set_group(),
                json!({
                    "cmdId": SET_COLOR_CMD_ID,
                    "deviceUuidList": [{"deviceUuid": mac}],
                    "rgbColorR": color.red(),
                    "rgbColorG": color.green(),
                    "rgbColorB": color.blue(),
                }),
            ),
            Self::Effect(_) | Self::Neon(_) => return None,
        };
        Some(request)
    }

    /// State changes assumed once the command is sent.
    ///
    /// Color and effect also switch the bulb on.
    #[must_use]
    pub fn optimistic_changes(&self) -> Vec<StateChange> {
        match self {
            Self::Switch(state) => vec![StateChange::Power(*state)],
            Self::Brightness(b) => vec![StateChange::Brightness(*b)],
            Self::ColorTemperature(k) => vec![StateChange::ColorTemperature(*k)],
            Self::Color(color) => vec![
                StateChange::Power(PowerState::On),
                StateChange::Rgb(*color),
                StateChange::Color(color.to_vendor_string()),
            ],
            Self::Effect(effect) => vec![
                StateChange::Power(PowerState::On),
                StateChange::Effect(*effect),
            ],
            Self::Neon(n) => vec![StateChange::NeonStatus(*n)],
        }
    }
}

impl std::fmt::Display for BulbCommand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.type_tag(), self.mqtt_value())
    }
}

/// 0-255 brightness as the 0-100 percentage Wi-Fi bulbs expect.
fn brightness_percent(brightness: u8) -> i64 {
    round_half_even(f64::from(brightness) / 255.0 * 100.0)
}

/// Kelvin as the 1-100 percentage the cloud expects.
fn color_temperature_percent(kelvin: u16) -> i64 {
    round_half_even(rescale(f64::from(kelvin), 200.0, 6500.0, 1.0, 100.0))
}
