// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Sengled cloud endpoints.
//!
//! The cloud is split across four hosts. [`Endpoints`] stores the base URL
//! of each one and builds the full URLs used by the client and by bulbs.

use serde::Deserialize;

const AUTHEN_CROSS: &str = "/user/app/customer/v2/AuthenCross.json";
const IS_SESSION_TIMEOUT: &str = "/user/app/customer/isSessionTimeout.json";
const SERVER_INFO: &str = "/life2/server/getServerInfo.json";
const WIFI_DEVICE_LIST: &str = "/life2/device/list.json";
const ZIGBEE_DEVICE_DETAILS: &str = "/zigbee/device/getDeviceDetails.json";
const SET_ON_OFF: &str = "/zigbee/device/deviceSetOnOff.json";
const SET_BRIGHTNESS: &str = "/zigbee/device/deviceSetBrightness.json";
const SET_COLOR_TEMPERATURE: &str = "/zigbee/device/deviceSetColorTemperature.json";
const SET_GROUP: &str = "/zigbee/device/deviceSetGroup.json";

/// Base URLs of the Sengled cloud hosts.
///
/// # Examples
///
/// ```
/// use sengled_lib::protocol::Endpoints;
///
/// let endpoints = Endpoints::default();
/// assert_eq!(
///     endpoints.login(),
///     "https://ucenter.cloud.sengled.com/user/app/customer/v2/AuthenCross.json"
/// );
///
/// let local = Endpoints::with_base("http://127.0.0.1:8080/");
/// assert_eq!(local.wifi_devices(), "http://127.0.0.1:8080/life2/device/list.json");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Endpoints {
    ucenter: String,
    life2: String,
    element: String,
    elements: String,
}

impl Endpoints {
    /// Default account host.
    pub const UCENTER: &'static str = "https://ucenter.cloud.sengled.com";
    /// Default Wi-Fi device host.
    pub const LIFE2: &'static str = "https://life2.cloud.sengled.com";
    /// Default Zigbee query host.
    pub const ELEMENT: &'static str = "https://element.cloud.sengled.com";
    /// Default Zigbee on/off host.
    pub const ELEMENTS: &'static str = "https://elements.cloud.sengled.com";

    /// Points every host at the same base URL.
    #[must_use]
    pub fn with_base(base: impl Into<String>) -> Self {
        let base = base.into().trim_end_matches('/').to_string();
        Self {
            ucenter: base.clone(),
            life2: base.clone(),
            element: base.clone(),
            elements: base,
        }
    }

    /// Overrides the account host.
    #[must_use]
    pub fn with_ucenter(mut self, url: impl Into<String>) -> Self {
        self.ucenter = url.into();
        self
    }

    /// Overrides the Wi-Fi device host.
    #[must_use]
    pub fn with_life2(mut self, url: impl Into<String>) -> Self {
        self.life2 = url.into();
        self
    }

    /// Overrides the Zigbee query host.
    #[must_use]
    pub fn with_element(mut self, url: impl Into<String>) -> Self {
        self.element = url.into();
        self
    }

    /// Overrides the Zigbee on/off host.
    #[must_use]
    pub fn with_elements(mut self, url: impl Into<String>) -> Self {
        self.elements = url.into();
        self
    }

    /// Login URL.
    #[must_use]
    pub fn login(&self) -> String {
        format!("{}{AUTHEN_CROSS}", self.ucenter)
    }

    /// Session check URL.
    #[must_use]
    pub fn session_timeout(&self) -> String {
        format!("{}{IS_SESSION_TIMEOUT}", self.ucenter)
    }

    /// MQTT server info URL.
    #[must_use]
    pub fn server_info(&self) -> String {
        format!("{}{SERVER_INFO}", self.life2)
    }

    /// Wi-Fi device listing URL.
    #[must_use]
    pub fn wifi_devices(&self) -> String {
        format!("{}{WIFI_DEVICE_LIST}", self.life2)
    }

    /// Zigbee device listing URL.
    #[must_use]
    pub fn zigbee_devices(&self) -> String {
        format!("{}{ZIGBEE_DEVICE_DETAILS}", self.element)
    }

    /// Zigbee on/off URL.
    #[must_use]
    pub fn set_on_off(&self) -> String {
        format!("{}{SET_ON_OFF}", self.elements)
    }

    /// Zigbee brightness URL.
    #[must_use]
    pub fn set_brightness(&self) -> String {
        format!("{}{SET_BRIGHTNESS}", self.element)
    }

    /// Zigbee color temperature URL.
    #[must_use]
    pub fn set_color_temperature(&self) -> String {
        format!("{}{SET_COLOR_TEMPERATURE}", self.element)
    }

    /// Zigbee group command URL, used for RGB color.
    #[must_use]
    pub fn set_group(&self) -> String {
        format!("{}{SET_GROUP}", self.element)
    }
}

impl Default for Endpoints {
    fn default() -> Self {
        Self {
            ucenter: Self::UCENTER.to_string(),
            life2: Self::LIFE2.to_string(),
            element: Self::ELEMENT.to_string(),
            elements: Self::ELEMENTS.to_string(),
        }
    }
}
