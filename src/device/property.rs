// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Normalized view over the cloud device listings.
//!
//! The Wi-Fi listing carries attributes as a list of `{name, value}` pairs,
//! the Zigbee listing as a flat object. [`DeviceProperty`] folds both into
//! one attribute map and reads values that may be JSON strings or numbers.

use serde_json::{Map, Value};

use crate::device::Transport;
use crate::error::ParseError;
use crate::types::{Effect, PowerState, RgbColor};

/// One device entry from a cloud listing.
///
/// # Examples
///
/// ```
/// use sengled_lib::device::DeviceProperty;
/// use serde_json::json;
///
/// let property = DeviceProperty::from_zigbee(&json!({
///     "deviceUuid": "000D6F0011223344",
///     "deviceClass": 1,
///     "attributes": {"name": "Desk", "onoff": "1", "brightness": "200"}
/// }))
/// .unwrap();
///
/// assert_eq!(property.name(), "Desk");
/// assert_eq!(property.brightness(), Some(200));
/// assert!(property.supports_brightness());
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct DeviceProperty {
    uuid: String,
    transport: Transport,
    category: Option<String>,
    type_code: Option<String>,
    attributes: Map<String, Value>,
}

impl DeviceProperty {
    /// Reads an entry of the Wi-Fi `deviceList`.
    ///
    /// # Errors
    ///
    /// Returns [`ParseError::MissingField`] when `deviceUuid` or
    /// `attributeList` is absent, and [`ParseError::UnexpectedFormat`] when
    /// an attribute has no name.
    pub fn from_wifi(info: &Value) -> Result<Self, ParseError> {
        let uuid = required_uuid(info)?;
        let list = info
            .get("attributeList")
            .and_then(Value::as_array)
            .ok_or_else(|| ParseError::MissingField("attributeList".to_string()))?;

        let mut attributes = Map::new();
        for attr in list {
            let name = attr.get("name").and_then(Value::as_str).ok_or_else(|| {
                ParseError::UnexpectedFormat(format!("attribute without name: {attr}"))
            })?;
            let value = attr.get("value").cloned().unwrap_or(Value::Null);
            // First occurrence wins
            attributes.entry(name.to_string()).or_insert(value);
        }

        Ok(Self {
            uuid,
            transport: Transport::Wifi,
            category: info
                .get("category")
                .and_then(Value::as_str)
                .map(str::to_string),
            type_code: info.get("typeCode").and_then(value_to_string),
            attributes,
        })
    }

    /// Reads an entry of a Zigbee `lampInfos` list.
    ///
    /// # Errors
    ///
    /// Returns [`ParseError::MissingField`] when `deviceUuid` or
    /// `attributes` is absent.
    pub fn from_zigbee(info: &Value) -> Result<Self, ParseError> {
        let uuid = required_uuid(info)?;
        let attributes = info
            .get("attributes")
            .and_then(Value::as_object)
            .cloned()
            .ok_or_else(|| ParseError::MissingField("attributes".to_string()))?;

        Ok(Self {
            uuid,
            transport: Transport::Zigbee,
            category: None,
            type_code: None,
            attributes,
        })
    }

    /// Returns which listing this entry came from.
    #[must_use]
    pub fn transport(&self) -> Transport {
        self.transport
    }

    /// Returns the raw attribute value.
    #[must_use]
    pub fn attribute(&self, name: &str) -> Option<&Value> {
        self.attributes.get(name)
    }

    /// Device identifier (MAC-like string).
    #[must_use]
    pub fn uuid(&self) -> &str {
        &self.uuid
    }

    /// Friendly name, empty when not reported.
    #[must_use]
    pub fn name(&self) -> String {
        self.string("name").unwrap_or_default()
    }

    /// Power state. Anything but `"1"` is off.
    #[must_use]
    pub fn switch(&self) -> PowerState {
        let key = match self.transport {
            Transport::Wifi => "switch",
            Transport::Zigbee => "onoff",
        };
        PowerState::from(self.string(key).as_deref() == Some("1"))
    }

    /// Whether the cloud reports the device online.
    #[must_use]
    pub fn is_online(&self) -> bool {
        let key = match self.transport {
            Transport::Wifi => "online",
            Transport::Zigbee => "isOnline",
        };
        self.string(key).as_deref() == Some("1")
    }

    /// Raw brightness: 0-100 on Wi-Fi, 0-255 on Zigbee.
    #[must_use]
    pub fn brightness(&self) -> Option<i64> {
        self.integer("brightness")
    }

    /// Raw color temperature: a 0-100 percentage.
    #[must_use]
    pub fn color_temperature(&self) -> Option<i64> {
        self.integer("colorTemperature")
    }

    /// Vendor color string of a Wi-Fi bulb.
    #[must_use]
    pub fn color(&self) -> String {
        self.string("color").unwrap_or_else(|| "0:0:0".to_string())
    }

    /// Color mode as reported.
    #[must_use]
    pub fn color_mode(&self) -> Option<String> {
        self.string("colorMode")
    }

    /// Raw signal value: dBm on Wi-Fi, a 0-5 level on Zigbee.
    #[must_use]
    pub fn rssi(&self) -> Option<i64> {
        self.integer("deviceRssi")
    }

    /// Model code, e.g. `W21-N13` or `E13-N11`.
    #[must_use]
    pub fn type_code(&self) -> Option<String> {
        self.string("typeCode").or_else(|| self.type_code.clone())
    }

    /// Product code, e.g. `E1E-G7F` for the wall switch.
    #[must_use]
    pub fn product_code(&self) -> Option<String> {
        let key = match self.transport {
            Transport::Wifi => "product_code",
            Transport::Zigbee => "productCode",
        };
        self.string(key)
    }

    /// Firmware version.
    #[must_use]
    pub fn version(&self) -> Option<String> {
        self.string("version")
    }

    /// RGB components of a Zigbee bulb. All three must fit a `u8`.
    #[must_use]
    pub fn rgb(&self) -> Option<RgbColor> {
        let component = |name| self.integer(name).and_then(|v| u8::try_from(v).ok());
        Some(RgbColor::new(
            component("rgbColorR")?,
            component("rgbColorG")?,
            component("rgbColorB")?,
        ))
    }

    /// Hub alarm status.
    #[must_use]
    pub fn alarm_status(&self) -> Option<String> {
        self.string("alarmStatus")
    }

    /// Active effect of a Wi-Fi bulb.
    #[must_use]
    pub fn effect(&self) -> Option<Effect> {
        self.string("effectStatus")
            .and_then(|code| Effect::from_vendor_code(&code))
    }

    /// Neon status of a Wi-Fi bulb.
    #[must_use]
    pub fn neon_status(&self) -> Option<u8> {
        self.integer("neonStatus")
            .and_then(|v| u8::try_from(v).ok())
    }

    /// Wi-Fi category, e.g. `wifielement`.
    #[must_use]
    pub fn category(&self) -> Option<&str> {
        self.category.as_deref()
    }

    /// Whether the device reports brightness.
    #[must_use]
    pub fn supports_brightness(&self) -> bool {
        self.supports("brightness")
    }

    /// Whether the device reports color temperature.
    #[must_use]
    pub fn supports_color_temp(&self) -> bool {
        self.supports("colorTemperature")
    }

    /// Whether the device reports RGB color.
    #[must_use]
    pub fn supports_color(&self) -> bool {
        match self.transport {
            Transport::Wifi => self.supports("color"),
            Transport::Zigbee => self.supports("rgbColorR"),
        }
    }

    /// Wi-Fi: the attribute is listed. Zigbee: the attribute is truthy.
    fn supports(&self, name: &str) -> bool {
        match self.transport {
            Transport::Wifi => self.attributes.contains_key(name),
            Transport::Zigbee => self.attributes.get(name).is_some_and(is_truthy),
        }
    }

    fn string(&self, name: &str) -> Option<String> {
        self.attributes.get(name).and_then(value_to_string)
    }

    fn integer(&self, name: &str) -> Option<i64> {
        self.attributes.get(name).and_then(value_to_i64)
    }
}

/// Returns the entries of a Wi-Fi `device/list.json` response.
pub(crate) fn wifi_entries(data: &Value) -> Result<&[Value], ParseError> {
    data.get("deviceList")
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .ok_or_else(|| ParseError::MissingField("deviceList".to_string()))
}

/// Flattens `deviceInfos[].lampInfos[]` of a Zigbee listing.
pub(crate) fn zigbee_entries(data: &Value) -> Result<Vec<&Value>, ParseError> {
    let infos = data
        .get("deviceInfos")
        .and_then(Value::as_array)
        .ok_or_else(|| ParseError::MissingField("deviceInfos".to_string()))?;

    Ok(infos
        .iter()
        .filter_map(|info| info.get("lampInfos").and_then(Value::as_array))
        .flatten()
        .collect())
}

/// Finds the entry whose `deviceUuid` is `uuid`.
pub(crate) fn find_entry<'a, I>(entries: I, uuid: &str) -> Option<&'a Value>
where
    I: IntoIterator<Item = &'a Value>,
{
    entries.into_iter().find(|entry| {
        entry
            .get("deviceUuid")
            .and_then(value_to_string)
            .is_some_and(|id| id == uuid)
    })
}

fn required_uuid(info: &Value) -> Result<String, ParseError> {
    info.get("deviceUuid")
        .and_then(value_to_string)
        .ok_or_else(|| ParseError::MissingField("deviceUuid".to_string()))
}

/// Reads a JSON string or number as text.
pub(crate) fn value_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Reads a JSON integer or a string holding one.
pub(crate) fn value_to_i64(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|v| v != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(a) => !a.is_empty(),
        Value::Object(o) => !o.is_empty(),
    }
}
