// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Client configuration.

use std::time::Duration;

use serde::Deserialize;

use crate::protocol::{Endpoints, HttpClient, MqttClient};

/// Configuration for a [`SengledClient`](crate::SengledClient).
///
/// Can be built in code or deserialized from JSON. Durations are given in
/// whole seconds when deserialized.
///
/// # Examples
///
/// ```
/// use std::time::Duration;
/// use sengled_lib::ClientConfig;
///
/// let config = ClientConfig::new("me@example.com", "secret")
///     .with_country("us")
///     .with_wifi(true)
///     .with_http_timeout(Duration::from_secs(5));
/// assert!(config.wifi());
///
/// let from_json: ClientConfig = serde_json::from_str(
///     r#"{"username": "me@example.com", "password": "secret", "wifi": true}"#,
/// )
/// .unwrap();
/// assert_eq!(from_json.http_timeout(), Duration::from_secs(10));
/// ```
#[derive(Clone, Deserialize)]
pub struct ClientConfig {
    username: String,
    password: String,
    #[serde(default)]
    country: String,
    #[serde(default)]
    wifi: bool,
    #[serde(default)]
    endpoints: Endpoints,
    #[serde(default = "default_http_timeout_secs")]
    http_timeout_secs: u64,
    #[serde(default = "default_keep_alive_secs")]
    mqtt_keep_alive_secs: u64,
}

fn default_http_timeout_secs() -> u64 {
    HttpClient::DEFAULT_TIMEOUT.as_secs()
}

fn default_keep_alive_secs() -> u64 {
    MqttClient::DEFAULT_KEEP_ALIVE.as_secs()
}

impl ClientConfig {
    /// Creates a configuration for the given account.
    ///
    /// The Wi-Fi MQTT path is disabled by default.
    #[must_use]
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
            country: String::new(),
            wifi: false,
            endpoints: Endpoints::default(),
            http_timeout_secs: default_http_timeout_secs(),
            mqtt_keep_alive_secs: default_keep_alive_secs(),
        }
    }

    /// Sets the account country code.
    #[must_use]
    pub fn with_country(mut self, country: impl Into<String>) -> Self {
        self.country = country.into();
        self
    }

    /// Enables or disables Wi-Fi bulbs and the MQTT connection.
    #[must_use]
    pub fn with_wifi(mut self, wifi: bool) -> Self {
        self.wifi = wifi;
        self
    }

    /// Overrides the cloud endpoints.
    #[must_use]
    pub fn with_endpoints(mut self, endpoints: Endpoints) -> Self {
        self.endpoints = endpoints;
        self
    }

    /// Sets the HTTP request timeout. Sub-second parts are dropped.
    #[must_use]
    pub fn with_http_timeout(mut self, timeout: Duration) -> Self {
        self.http_timeout_secs = timeout.as_secs();
        self
    }

    /// Sets the MQTT keep-alive interval. Sub-second parts are dropped.
    #[must_use]
    pub fn with_mqtt_keep_alive(mut self, keep_alive: Duration) -> Self {
        self.mqtt_keep_alive_secs = keep_alive.as_secs();
        self
    }

    /// Returns the account user name.
    #[must_use]
    pub fn username(&self) -> &str {
        &self.username
    }

    /// Returns the account password.
    #[must_use]
    pub fn password(&self) -> &str {
        &self.password
    }

    /// Returns the account country code.
    #[must_use]
    pub fn country(&self) -> &str {
        &self.country
    }

    /// Returns whether Wi-Fi bulbs are enabled.
    #[must_use]
    pub fn wifi(&self) -> bool {
        self.wifi
    }

    /// Returns the cloud endpoints.
    #[must_use]
    pub fn endpoints(&self) -> &Endpoints {
        &self.endpoints
    }

    /// Returns the HTTP request timeout.
    #[must_use]
    pub fn http_timeout(&self) -> Duration {
        Duration::from_secs(self.http_timeout_secs)
    }

    /// Returns the MQTT keep-alive interval.
    #[must_use]
    pub fn mqtt_keep_alive(&self) -> Duration {
        Duration::from_secs(self.mqtt_keep_alive_secs)
    }
}

impl std::fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientConfig")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .field("country", &self.country)
            .field("wifi", &self.wifi)
            .field("endpoints", &self.endpoints)
            .field("http_timeout_secs", &self.http_timeout_secs)
            .field("mqtt_keep_alive_secs", &self.mqtt_keep_alive_secs)
            .finish()
    }
}
