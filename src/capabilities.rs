// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Bulb capabilities detection and configuration.
//!
//! Capabilities are read once from the cloud device listing when a bulb is
//! discovered and never change afterwards. They can also be configured by
//! hand with [`CapabilitiesBuilder`].

use crate::device::DeviceProperty;

/// Capabilities of a Sengled bulb.
///
/// # Examples
///
/// ```
/// use sengled_lib::Capabilities;
///
/// // White bulb, on/off only
/// let basic = Capabilities::default();
/// assert!(!basic.brightness);
///
/// // Wi-Fi color bulb
/// let color = Capabilities::color_bulb();
/// assert!(color.supports_effects());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Capabilities {
    /// Supports brightness control.
    pub brightness: bool,

    /// Supports color temperature control.
    pub color_temp: bool,

    /// Supports RGB color control.
    pub color: bool,
}

impl Capabilities {
    /// On/off only.
    #[must_use]
    pub const fn basic() -> Self {
        Self {
            brightness: false,
            color_temp: false,
            color: false,
        }
    }

    /// Dimmable white bulb.
    #[must_use]
    pub const fn dimmable() -> Self {
        Self {
            brightness: true,
            color_temp: false,
            color: false,
        }
    }

    /// Tunable white bulb (brightness and color temperature).
    #[must_use]
    pub const fn tunable_white() -> Self {
        Self {
            brightness: true,
            color_temp: true,
            color: false,
        }
    }

    /// Full color bulb.
    #[must_use]
    pub const fn color_bulb() -> Self {
        Self {
            brightness: true,
            color_temp: true,
            color: true,
        }
    }

    /// Detects capabilities from a cloud device listing entry.
    ///
    /// Wi-Fi listings advertise a feature by carrying the attribute at all.
    /// Zigbee listings carry every attribute and mark unsupported ones with
    /// an empty or zero value.
    #[must_use]
    pub fn from_property(property: &DeviceProperty) -> Self {
        Self {
            brightness: property.supports_brightness(),
            color_temp: property.supports_color_temp(),
            color: property.supports_color(),
        }
    }

    /// Returns whether brightness can be controlled.
    #[must_use]
    pub const fn supports_brightness_control(&self) -> bool {
        self.brightness
    }

    /// Returns whether color temperature can be controlled.
    #[must_use]
    pub const fn supports_color_temperature_control(&self) -> bool {
        self.color_temp
    }

    /// Returns whether RGB color can be controlled.
    #[must_use]
    pub const fn supports_color_control(&self) -> bool {
        self.color
    }

    /// Effects are offered only on bulbs that support every light feature.
    #[must_use]
    pub const fn supports_effects(&self) -> bool {
        self.brightness && self.color_temp && self.color
    }
}

/// Builder for creating custom capabilities.
#[derive(Debug, Default)]
pub struct CapabilitiesBuilder {
    inner: Capabilities,
}

impl CapabilitiesBuilder {
    /// Creates a new builder with no optional capability.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Enables brightness support.
    #[must_use]
    pub fn with_brightness(mut self) -> Self {
        self.inner.brightness = true;
        self
    }

    /// Enables color temperature support.
    #[must_use]
    pub fn with_color_temp(mut self) -> Self {
        self.inner.color_temp = true;
        self
    }

    /// Enables RGB color support.
    #[must_use]
    pub fn with_color(mut self) -> Self {
        self.inner.color = true;
        self
    }

    /// Builds the capabilities.
    #[must_use]
    pub fn build(self) -> Capabilities {
        self.inner
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn default_capabilities() {
        let caps = Capabilities::default();
        assert_eq!(caps, Capabilities::basic());
        assert!(!caps.supports_effects());
    }

    #[test]
    fn builder_pattern() {
        let caps = CapabilitiesBuilder::new()
            .with_brightness()
            .with_color_temp()
            .build();

        assert_eq!(caps, Capabilities::tunable_white());
        assert!(!caps.supports_color_control());
        assert!(!caps.supports_effects());
    }

    #[test]
    fn effects_need_every_feature() {
        assert!(Capabilities::color_bulb().supports_effects());
        assert!(!Capabilities::dimmable().supports_effects());
    }

    #[test]
    fn from_wifi_property() {
        let property = DeviceProperty::from_wifi(&json!({
            "deviceUuid": "B0:CE:18:00:00:01",
            "category": "wifielement",
            "typeCode": "W21-N13",
            "attributeList": [
                {"name": "brightness", "value": "100"},
                {"name": "colorTemperature", "value": "50"},
                {"name": "switch", "value": "1"}
            ]
        }))
        .unwrap();

        let caps = Capabilities::from_property(&property);
        assert!(caps.brightness);
        assert!(caps.color_temp);
        assert!(!caps.color);
    }

    #[test]
    fn from_zigbee_property_ignores_empty_attributes() {
        let property = DeviceProperty::from_zigbee(&json!({
            "deviceUuid": "0000000000000001",
            "deviceClass": 1,
            "attributes": {
                "brightness": "128",
                "colorTemperature": "",
                "rgbColorR": 0,
                "onoff": "1"
            }
        }))
        .unwrap();

        let caps = Capabilities::from_property(&property);
        assert!(caps.brightness);
        assert!(!caps.color_temp);
        assert!(!caps.color);
    }
}
