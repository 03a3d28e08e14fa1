// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Sengled cloud session.
//!
//! [`SengledClient`] owns the account session, the optional MQTT
//! connection used by Wi-Fi bulbs, and the cached device listings. It is
//! cheap to clone; clones share the same session and connection.
//!
//! # Examples
//!
//! ```no_run
//! use sengled_lib::{ClientConfig, SengledClient};
//!
//! # async fn example() -> sengled_lib::Result<()> {
//! let config = ClientConfig::new("me@example.com", "secret").with_wifi(true);
//! let client = SengledClient::connect(config).await?;
//!
//! for bulb in client.discover_bulbs().await? {
//!     println!("{} ({})", bulb.name(), bulb.mac());
//! }
//! # Ok(())
//! # }
//! ```

use std::sync::Arc;

use parking_lot::{Mutex, RwLock};
use serde_json::{Value, json};

use crate::config::ClientConfig;
use crate::device::property::{wifi_entries, zigbee_entries};
use crate::device::{Bulb, BulbInfo, DeviceProperty, Switch};
use crate::error::{Error, ProtocolError};
use crate::protocol::{
    CloudApi, Endpoints, HttpClient, MessageHandler, MqttClient, MqttServer, TopicRouter,
};

const OS_TYPE: &str = "android";
const APP_CODE: &str = "life";

/// Handle to a logged-in Sengled account.
#[derive(Clone)]
pub struct SengledClient {
    inner: Arc<Inner>,
}

struct Inner {
    config: ClientConfig,
    http: HttpClient,
    device_id: String,
    session: RwLock<Option<String>>,
    mqtt_server: RwLock<MqttServer>,
    mqtt: tokio::sync::RwLock<Option<MqttClient>>,
    router: Arc<TopicRouter>,
    zigbee_devices: Mutex<Vec<DeviceProperty>>,
    wifi_devices: Mutex<Vec<DeviceProperty>>,
}

impl SengledClient {
    /// Creates a client without logging in.
    ///
    /// # Errors
    ///
    /// Returns error if the HTTP client cannot be created.
    pub fn new(config: ClientConfig) -> Result<Self, Error> {
        let http = HttpClient::with_timeout(config.http_timeout())?;
        Ok(Self {
            inner: Arc::new(Inner {
                config,
                http,
                device_id: new_device_id(),
                session: RwLock::new(None),
                mqtt_server: RwLock::new(MqttServer::default()),
                mqtt: tokio::sync::RwLock::new(None),
                router: Arc::new(TopicRouter::new()),
                zigbee_devices: Mutex::new(Vec::new()),
                wifi_devices: Mutex::new(Vec::new()),
            }),
        })
    }

    /// Creates a client and logs in.
    ///
    /// With Wi-Fi enabled this also opens the MQTT connection.
    ///
    /// # Errors
    ///
    /// Returns error if the login fails.
    pub async fn connect(config: ClientConfig) -> Result<Self, Error> {
        let client = Self::new(config)?;
        client.login().await?;
        Ok(client)
    }

    /// Returns the configuration.
    #[must_use]
    pub fn config(&self) -> &ClientConfig {
        &self.inner.config
    }

    /// Returns the identifier this client presents to the cloud.
    #[must_use]
    pub fn device_id(&self) -> &str {
        &self.inner.device_id
    }

    /// Returns the current session, if logged in.
    #[must_use]
    pub fn session(&self) -> Option<String> {
        self.inner.session.read().clone()
    }

    /// Returns the MQTT broker in use.
    #[must_use]
    pub fn mqtt_server(&self) -> MqttServer {
        self.inner.mqtt_server.read().clone()
    }

    /// Returns `true` if an MQTT client is active.
    ///
    /// The client keeps reconnecting after network errors until
    /// [`disconnect`](Self::disconnect) or the next login replaces it.
    pub async fn is_mqtt_connected(&self) -> bool {
        self.inner.mqtt.read().await.is_some()
    }

    fn session_or_empty(&self) -> String {
        self.session().unwrap_or_default()
    }

    /// Logs in unless the current session is still valid.
    ///
    /// With Wi-Fi enabled, refreshes the MQTT server info and (re)opens the
    /// MQTT connection, resubscribing every routed topic.
    ///
    /// # Errors
    ///
    /// Returns [`ProtocolError::AuthenticationFailed`] if the cloud does not
    /// return a session, or any transport error.
    pub async fn login(&self) -> Result<(), Error> {
        if self.session().is_some() && !self.is_session_timeout().await? {
            tracing::debug!("Session still valid, skipping login");
            return Ok(());
        }

        tracing::info!(user = %self.inner.config.username(), "Logging in to Sengled cloud");

        let payload = json!({
            "uuid": self.inner.device_id,
            "user": self.inner.config.username(),
            "pwd": self.inner.config.password(),
            "osType": OS_TYPE,
            "productCode": APP_CODE,
            "appCode": APP_CODE,
        });
        let data = self
            .inner
            .http
            .post(&self.endpoints().login(), &payload, None)
            .await?;

        let session = data
            .get("jsessionId")
            .and_then(Value::as_str)
            .filter(|s| !s.is_empty())
            .ok_or(ProtocolError::AuthenticationFailed)?
            .to_string();
        *self.inner.session.write() = Some(session.clone());

        tracing::info!("Logged in to Sengled cloud");

        if self.inner.config.wifi() {
            self.server_info().await?;
            self.open_mqtt(&session).await?;
        }

        Ok(())
    }

    /// Checks whether the session has expired.
    ///
    /// No session at all counts as expired.
    ///
    /// # Errors
    ///
    /// Returns error if the request fails.
    pub async fn is_session_timeout(&self) -> Result<bool, Error> {
        let Some(session) = self.session() else {
            return Ok(true);
        };

        let payload = json!({
            "uuid": self.inner.device_id,
            "os_type": OS_TYPE,
            "appCode": APP_CODE,
        });
        let data = self
            .inner
            .http
            .post(&self.endpoints().session_timeout(), &payload, Some(&session))
            .await?;

        let valid = data.get("info").and_then(Value::as_str) == Some("OK");
        if !valid {
            tracing::info!("Session timed out");
        }
        Ok(!valid)
    }

    /// Fetches the MQTT broker address.
    ///
    /// A response without `inceptionAddr` keeps the current broker.
    ///
    /// # Errors
    ///
    /// Returns error if the request fails or the address is invalid.
    pub async fn server_info(&self) -> Result<MqttServer, Error> {
        let data = self
            .inner
            .http
            .post(&self.endpoints().server_info(), &json!({}), Some(&self.session_or_empty()))
            .await?;

        match data
            .get("inceptionAddr")
            .and_then(Value::as_str)
            .filter(|s| !s.is_empty())
        {
            Some(address) => {
                let server = MqttServer::parse(address)?;
                tracing::debug!(server = %server, "Using MQTT broker");
                *self.inner.mqtt_server.write() = server.clone();
                Ok(server)
            }
            None => {
                tracing::debug!("No MQTT broker in server info, keeping current");
                Ok(self.mqtt_server())
            }
        }
    }

    async fn open_mqtt(&self, session: &str) -> Result<(), Error> {
        let server = self.mqtt_server();
        let mut slot = self.inner.mqtt.write().await;

        if let Some(old) = slot.take() {
            tracing::info!("Reopening MQTT connection");
            old.disconnect().await;
        }

        let client = MqttClient::connect(
            &server,
            session,
            self.inner.config.mqtt_keep_alive(),
            Arc::clone(&self.inner.router),
        );
        for topic in self.inner.router.topics() {
            client.subscribe(&topic).await?;
        }
        *slot = Some(client);
        Ok(())
    }

    /// Closes the MQTT connection, if any.
    pub async fn disconnect(&self) {
        if let Some(client) = self.inner.mqtt.write().await.take() {
            client.disconnect().await;
        }
    }

    /// Lists Zigbee devices.
    ///
    /// The first non-empty listing is cached.
    ///
    /// # Errors
    ///
    /// Returns error if the request fails or the listing is malformed.
    pub async fn zigbee_devices(&self) -> Result<Vec<DeviceProperty>, Error> {
        {
            let cached = self.inner.zigbee_devices.lock();
            if !cached.is_empty() {
                return Ok(cached.clone());
            }
        }

        let data = self
            .inner
            .http
            .post(&self.endpoints().zigbee_devices(), &json!({}), Some(&self.session_or_empty()))
            .await?;

        let mut devices = Vec::new();
        for entry in zigbee_entries(&data)? {
            match DeviceProperty::from_zigbee(entry) {
                Ok(property) => devices.push(property),
                Err(e) => tracing::warn!(error = %e, "Skipping malformed Zigbee device"),
            }
        }

        tracing::debug!(count = devices.len(), "Listed Zigbee devices");
        self.inner.zigbee_devices.lock().clone_from(&devices);
        Ok(devices)
    }

    /// Lists Wi-Fi devices, without duplicates.
    ///
    /// The first non-empty listing is cached.
    ///
    /// # Errors
    ///
    /// Returns error if the request fails or the listing is malformed.
    pub async fn wifi_devices(&self) -> Result<Vec<DeviceProperty>, Error> {
        {
            let cached = self.inner.wifi_devices.lock();
            if !cached.is_empty() {
                return Ok(cached.clone());
            }
        }

        let data = self
            .inner
            .http
            .post(&self.endpoints().wifi_devices(), &json!({}), Some(&self.session_or_empty()))
            .await?;

        let mut devices: Vec<DeviceProperty> = Vec::new();
        for entry in wifi_entries(&data)? {
            match DeviceProperty::from_wifi(entry) {
                Ok(property) if devices.iter().any(|d| d.uuid() == property.uuid()) => {
                    tracing::debug!(device = %property.uuid(), "Skipping duplicate Wi-Fi device");
                }
                Ok(property) => devices.push(property),
                Err(e) => tracing::warn!(error = %e, "Skipping malformed Wi-Fi device"),
            }
        }

        tracing::debug!(count = devices.len(), "Listed Wi-Fi devices");
        self.inner.wifi_devices.lock().clone_from(&devices);
        Ok(devices)
    }

    /// Creates a bulb for every Zigbee device, plus every Wi-Fi device when
    /// Wi-Fi is enabled.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotConnected`] before login, or any listing error.
    pub async fn discover_bulbs(&self) -> Result<Vec<Bulb>, Error> {
        let session = self.session().ok_or(Error::NotConnected)?;
        let country = self.inner.config.country().to_string();
        let api = Arc::new(self.clone());

        let mut properties = self.zigbee_devices().await?;
        if self.inner.config.wifi() {
            properties.extend(self.wifi_devices().await?);
        }

        tracing::info!(count = properties.len(), "Discovered bulbs");

        let mut bulbs = Vec::with_capacity(properties.len());
        for property in &properties {
            let info = BulbInfo::from_property(property, session.clone(), country.clone());
            bulbs.push(Bulb::connect(Arc::clone(&api), info).await);
        }
        Ok(bulbs)
    }

    /// Creates a proxy for every Zigbee wall switch.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotConnected`] before login, or any listing error.
    pub async fn list_switches(&self) -> Result<Vec<Switch>, Error> {
        let session = self.session().ok_or(Error::NotConnected)?;
        let country = self.inner.config.country();
        let api = Arc::new(self.clone());

        Ok(self
            .zigbee_devices()
            .await?
            .iter()
            .filter(|p| p.product_code().as_deref() == Some(Switch::<Self>::PRODUCT_CODE))
            .map(|p| Switch::new(Arc::clone(&api), p, session.clone(), country))
            .collect())
    }
}

impl CloudApi for SengledClient {
    async fn request(
        &self,
        url: String,
        payload: Value,
        session: String,
    ) -> Result<Value, ProtocolError> {
        self.inner.http.post(&url, &payload, Some(&session)).await
    }

    async fn publish(&self, topic: String, payload: String) -> Result<(), ProtocolError> {
        match self.inner.mqtt.read().await.as_ref() {
            Some(client) => client.publish(&topic, payload).await,
            None => Err(ProtocolError::ConnectionFailed(
                "no MQTT connection".to_string(),
            )),
        }
    }

    async fn subscribe(&self, topic: String, handler: MessageHandler) -> Result<bool, ProtocolError> {
        let guard = self.inner.mqtt.read().await;
        let Some(client) = guard.as_ref() else {
            tracing::debug!(topic = %topic, "No MQTT connection, not subscribing");
            return Ok(false);
        };

        client.subscribe(&topic).await?;
        self.inner.router.register(topic, handler);
        Ok(true)
    }

    fn endpoints(&self) -> &Endpoints {
        self.inner.config.endpoints()
    }
}

impl std::fmt::Debug for SengledClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SengledClient")
            .field("config", &self.inner.config)
            .field("device_id", &self.inner.device_id)
            .field("logged_in", &self.inner.session.read().is_some())
            .field("mqtt_server", &*self.inner.mqtt_server.read())
            .field("topics", &self.inner.router.len())
            .finish_non_exhaustive()
    }
}

/// First 16 hex digits of a random UUID.
fn new_device_id() -> String {
    let mut id = uuid::Uuid::new_v4().simple().to_string();
    id.truncate(16);
    id
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_partial_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client_for(server: &MockServer, wifi: bool) -> SengledClient {
        let config = ClientConfig::new("me@example.com", "secret")
            .with_country("us")
            .with_wifi(wifi)
            .with_endpoints(Endpoints::with_base(server.uri()));
        SengledClient::new(config).unwrap()
    }

    async fn mount_login(server: &MockServer, session: &str) {
        Mock::given(method("POST"))
            .and(path("/user/app/customer/v2/AuthenCross.json"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"jsessionId": session})))
            .mount(server)
            .await;
    }

    #[test]
    fn device_id_is_sixteen_hex_chars() {
        let id = new_device_id();
        assert_eq!(id.len(), 16);
        assert!(id.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[tokio::test]
    async fn login_stores_session() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/user/app/customer/v2/AuthenCross.json"))
            .and(body_partial_json(json!({
                "user": "me@example.com",
                "pwd": "secret",
                "osType": "android",
                "productCode": "life",
                "appCode": "life",
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"jsessionId": "S1"})))
            .expect(1)
            .mount(&server)
            .await;

        let client = client_for(&server, false);
        client.login().await.unwrap();

        assert_eq!(client.session().as_deref(), Some("S1"));
        assert!(!client.is_mqtt_connected().await);
    }

    #[tokio::test]
    async fn login_without_session_id_fails() {
        let server = MockServer::start().await;
        mount_login(&server, "").await;

        let client = client_for(&server, false);
        let err = client.login().await.unwrap_err();

        assert!(matches!(
            err,
            Error::Protocol(ProtocolError::AuthenticationFailed)
        ));
        assert!(client.session().is_none());
    }

    #[tokio::test]
    async fn login_skipped_while_session_valid() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/user/app/customer/v2/AuthenCross.json"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"jsessionId": "S1"})))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/user/app/customer/isSessionTimeout.json"))
            .and(header("sid", "S1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"info": "OK"})))
            .expect(1)
            .mount(&server)
            .await;

        let client = client_for(&server, false);
        client.login().await.unwrap();
        client.login().await.unwrap();
    }

    #[tokio::test]
    async fn session_timeout_without_session() {
        let server = MockServer::start().await;
        let client = client_for(&server, false);
        assert!(client.is_session_timeout().await.unwrap());
    }

    #[tokio::test]
    async fn server_info_parses_and_keeps_on_missing() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/life2/server/getServerInfo.json"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({"inceptionAddr": "wss://eu-mqtt.example.com:8443/mqtt"})),
            )
            .up_to_n_times(1)
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/life2/server/getServerInfo.json"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
            .mount(&server)
            .await;

        let client = client_for(&server, false);
        let first = client.server_info().await.unwrap();
        assert_eq!(first.host(), "eu-mqtt.example.com");
        assert_eq!(first.port(), 8443);

        let second = client.server_info().await.unwrap();
        assert_eq!(second, first);
    }

    #[tokio::test]
    async fn zigbee_listing_is_flattened_and_cached() {
        let server = MockServer::start().await;
        mount_login(&server, "S1").await;
        Mock::given(method("POST"))
            .and(path("/zigbee/device/getDeviceDetails.json"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"deviceInfos": [
                {"lampInfos": [{"deviceUuid": "Z1", "attributes": {"name": "A"}}]},
                {"lampInfos": [
                    {"deviceUuid": "Z2", "attributes": {"name": "B", "productCode": "E1E-G7F"}}
                ]}
            ]})))
            .expect(1)
            .mount(&server)
            .await;

        let client = client_for(&server, false);
        client.login().await.unwrap();

        let devices = client.zigbee_devices().await.unwrap();
        assert_eq!(devices.len(), 2);
        assert_eq!(client.zigbee_devices().await.unwrap(), devices);

        let switches = client.list_switches().await.unwrap();
        assert_eq!(switches.len(), 1);
        assert_eq!(switches[0].uuid(), "Z2");
    }

    #[tokio::test]
    async fn wifi_listing_drops_duplicates() {
        let server = MockServer::start().await;
        let entry = json!({
            "deviceUuid": "W1",
            "attributeList": [{"name": "name", "value": "Desk"}]
        });
        Mock::given(method("POST"))
            .and(path("/life2/device/list.json"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({"deviceList": [entry.clone(), entry]})),
            )
            .mount(&server)
            .await;

        let client = client_for(&server, false);
        let devices = client.wifi_devices().await.unwrap();

        assert_eq!(devices.len(), 1);
        assert_eq!(devices[0].name(), "Desk");
    }

    #[tokio::test]
    async fn discover_requires_login() {
        let server = MockServer::start().await;
        let client = client_for(&server, false);
        assert!(matches!(
            client.discover_bulbs().await,
            Err(Error::NotConnected)
        ));
    }

    #[tokio::test]
    async fn mqtt_calls_without_connection() {
        let server = MockServer::start().await;
        let client = client_for(&server, false);

        let err = client
            .publish("wifielement/X/update".to_string(), "{}".to_string())
            .await
            .unwrap_err();
        assert!(matches!(err, ProtocolError::ConnectionFailed(_)));

        let handler: MessageHandler = Arc::new(|_| {});
        let subscribed = client
            .subscribe("wifielement/X/status".to_string(), handler)
            .await
            .unwrap();
        assert!(!subscribed);
        assert!(client.inner.router.is_empty());
    }

    #[tokio::test]
    async fn failed_subscribe_leaves_no_handler() {
        let server = MockServer::start().await;
        let client = client_for(&server, false);

        let mqtt_server = MqttServer::parse("tcp://127.0.0.1:1").unwrap();
        let mqtt = MqttClient::connect(
            &mqtt_server,
            "S1",
            MqttClient::DEFAULT_KEEP_ALIVE,
            Arc::clone(&client.inner.router),
        );
        // Stopping the event loop closes the request channel
        mqtt.disconnect().await;
        tokio::time::sleep(std::time::Duration::from_millis(50)).await;
        *client.inner.mqtt.write().await = Some(mqtt);

        let handler: MessageHandler = Arc::new(|_| {});
        let result = client
            .subscribe("wifielement/X/status".to_string(), handler)
            .await;

        assert!(result.is_err());
        assert!(client.inner.router.is_empty());
    }
}
