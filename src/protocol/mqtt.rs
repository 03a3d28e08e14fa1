// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! MQTT transport for Wi-Fi bulbs.
//!
//! The Sengled cloud exposes its broker over secure websockets. The session
//! cookie authenticates the websocket upgrade, and the client id is derived
//! from the session.

use std::sync::Arc;
use std::time::Duration;

use rumqttc::{AsyncClient, EventLoop, MqttOptions, QoS, Transport};
use tokio::task::JoinHandle;

use crate::error::ProtocolError;
use crate::protocol::TopicRouter;
use crate::protocol::http::REQUESTED_WITH;

/// Location of the Sengled MQTT broker.
///
/// # Examples
///
/// ```
/// use sengled_lib::protocol::MqttServer;
///
/// let server = MqttServer::parse("wss://eu-mqtt.cloud.sengled.com:8443/mqtt").unwrap();
/// assert_eq!(server.host(), "eu-mqtt.cloud.sengled.com");
/// assert_eq!(server.port(), 8443);
/// assert_eq!(server.path(), "/mqtt");
///
/// let default = MqttServer::default();
/// assert_eq!(default.url(), "wss://us-mqtt.cloud.sengled.com:443/mqtt");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MqttServer {
    scheme: String,
    host: String,
    port: u16,
    path: String,
}

impl MqttServer {
    /// Port used when the address does not name one.
    pub const DEFAULT_PORT: u16 = 443;

    const SCHEMES: [&'static str; 5] = ["wss", "ws", "tcp", "mqtt", "ssl"];

    /// Parses an `inceptionAddr` such as `wss://host:443/mqtt`.
    ///
    /// # Errors
    ///
    /// Returns [`ProtocolError::InvalidAddress`] when the scheme is missing
    /// or unsupported, the host is empty, or the port is not a number.
    pub fn parse(address: &str) -> Result<Self, ProtocolError> {
        let (scheme, rest) = address
            .split_once("://")
            .ok_or_else(|| ProtocolError::InvalidAddress(format!("missing scheme: {address}")))?;

        let scheme = scheme.to_ascii_lowercase();
        if !Self::SCHEMES.contains(&scheme.as_str()) {
            return Err(ProtocolError::InvalidAddress(format!(
                "unsupported scheme: {scheme}"
            )));
        }

        let (authority, path) = match rest.find('/') {
            Some(idx) => rest.split_at(idx),
            None => (rest, ""),
        };

        let (host, port) = match authority.split_once(':') {
            Some((host, port)) => {
                let port = port
                    .parse()
                    .map_err(|_| ProtocolError::InvalidAddress(format!("invalid port: {port}")))?;
                (host, port)
            }
            None => (authority, Self::DEFAULT_PORT),
        };

        if host.is_empty() {
            return Err(ProtocolError::InvalidAddress(format!(
                "missing host: {address}"
            )));
        }

        Ok(Self {
            scheme,
            host: host.to_string(),
            port,
            path: path.to_string(),
        })
    }

    /// Returns the URL scheme.
    #[must_use]
    pub fn scheme(&self) -> &str {
        &self.scheme
    }

    /// Returns the broker host.
    #[must_use]
    pub fn host(&self) -> &str {
        &self.host
    }

    /// Returns the broker port.
    #[must_use]
    pub fn port(&self) -> u16 {
        self.port
    }

    /// Returns the websocket path.
    #[must_use]
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Returns `true` for websocket transports.
    #[must_use]
    pub fn is_websocket(&self) -> bool {
        matches!(self.scheme.as_str(), "ws" | "wss")
    }

    /// Rebuilds the full URL.
    #[must_use]
    pub fn url(&self) -> String {
        format!("{}://{}:{}{}", self.scheme, self.host, self.port, self.path)
    }

    fn options(&self, client_id: &str) -> MqttOptions {
        if self.is_websocket() {
            let mut options = MqttOptions::new(client_id, self.url(), self.port);
            let transport = if self.scheme == "wss" {
                Transport::wss_with_default_config()
            } else {
                Transport::Ws
            };
            options.set_transport(transport);
            options
        } else {
            let mut options = MqttOptions::new(client_id, self.host.clone(), self.port);
            if self.scheme == "ssl" {
                options.set_transport(Transport::tls_with_default_config());
            }
            options
        }
    }
}

impl Default for MqttServer {
    fn default() -> Self {
        Self {
            scheme: "wss".to_string(),
            host: "us-mqtt.cloud.sengled.com".to_string(),
            port: Self::DEFAULT_PORT,
            path: "/mqtt".to_string(),
        }
    }
}

impl std::fmt::Display for MqttServer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.url())
    }
}

/// MQTT connection to the Sengled broker.
///
/// A background task polls the event loop and hands every incoming publish
/// to the shared [`TopicRouter`]. Dropping the client stops that task.
#[derive(Debug)]
pub struct MqttClient {
    client: AsyncClient,
    server: MqttServer,
    event_task: JoinHandle<()>,
}

impl MqttClient {
    /// Default keep-alive interval.
    pub const DEFAULT_KEEP_ALIVE: Duration = Duration::from_secs(30);

    /// Opens a connection authenticated by `session`.
    ///
    /// Incoming publishes are routed through `router`. The connection
    /// itself is established by the event loop task, so this returns as
    /// soon as the client is created.
    #[must_use]
    pub fn connect(
        server: &MqttServer,
        session: &str,
        keep_alive: Duration,
        router: Arc<TopicRouter>,
    ) -> Self {
        let client_id = format!("{session}@lifeApp");
        let mut options = server.options(&client_id);
        options.set_keep_alive(keep_alive);
        options.set_clean_session(true);

        if server.is_websocket() {
            let cookie = format!("JSESSIONID={session}");
            options.set_request_modifier(move |mut request| {
                let cookie = cookie.clone();
                async move {
                    if let Ok(value) = cookie.parse() {
                        request.headers_mut().insert("Cookie", value);
                    }
                    if let Ok(value) = REQUESTED_WITH.parse() {
                        request.headers_mut().insert("X-Requested-With", value);
                    }
                    request
                }
            });
        }

        tracing::info!(server = %server, client_id = %client_id, "Connecting to MQTT broker");

        let (client, event_loop) = AsyncClient::new(options, 10);
        let event_task = tokio::spawn(handle_mqtt_events(event_loop, router));

        Self {
            client,
            server: server.clone(),
            event_task,
        }
    }

    /// Returns the broker this client talks to.
    #[must_use]
    pub fn server(&self) -> &MqttServer {
        &self.server
    }

    /// Queues a publish at QoS 0.
    ///
    /// # Errors
    ///
    /// Returns error if the request cannot be queued.
    pub async fn publish(&self, topic: &str, payload: String) -> Result<(), ProtocolError> {
        tracing::debug!(topic = %topic, payload = %payload, "Publishing MQTT message");

        self.client
            .publish(topic, QoS::AtMostOnce, false, payload)
            .await
            .map_err(ProtocolError::Mqtt)
    }

    /// Queues a subscription at QoS 0.
    ///
    /// # Errors
    ///
    /// Returns error if the request cannot be queued.
    pub async fn subscribe(&self, topic: &str) -> Result<(), ProtocolError> {
        tracing::debug!(topic = %topic, "Subscribing to MQTT topic");

        self.client
            .subscribe(topic, QoS::AtMostOnce)
            .await
            .map_err(ProtocolError::Mqtt)
    }

    /// Sends a disconnect and stops the event loop task.
    pub async fn disconnect(&self) {
        if let Err(e) = self.client.disconnect().await {
            tracing::debug!(error = %e, "MQTT disconnect request failed");
        }
        self.event_task.abort();
    }
}

impl Drop for MqttClient {
    fn drop(&mut self) {
        self.event_task.abort();
    }
}

/// Pause after an event loop error before polling again.
const RECONNECT_DELAY: Duration = Duration::from_secs(1);

/// Polls the event loop until the task is aborted, routing incoming
/// publishes. rumqttc reconnects on the poll that follows an error.
async fn handle_mqtt_events(mut event_loop: EventLoop, router: Arc<TopicRouter>) {
    use rumqttc::{Event, Packet};

    loop {
        match event_loop.poll().await {
            Ok(Event::Incoming(Packet::ConnAck(connack))) => {
                tracing::debug!(?connack, "MQTT connected");
            }
            Ok(Event::Incoming(Packet::SubAck(suback))) => {
                tracing::debug!(?suback, "MQTT subscription acknowledged");
            }
            Ok(Event::Incoming(Packet::Publish(publish))) => {
                tracing::debug!(
                    topic = %publish.topic,
                    payload = %String::from_utf8_lossy(&publish.payload),
                    "Received MQTT message"
                );
                router.route(&publish.topic, &publish.payload);
            }
            Ok(_) => {}
            Err(e) => {
                tracing::warn!(error = %e, "MQTT connection error, reconnecting");
                tokio::time::sleep(RECONNECT_DELAY).await;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_full_address() {
        let server = MqttServer::parse("wss://us-mqtt.cloud.sengled.com:443/mqtt").unwrap();
        assert_eq!(server, MqttServer::default());
    }

    #[test]
    fn parse_missing_port_defaults_to_443() {
        let server = MqttServer::parse("wss://eu-mqtt.cloud.sengled.com/mqtt").unwrap();
        assert_eq!(server.host(), "eu-mqtt.cloud.sengled.com");
        assert_eq!(server.port(), 443);
        assert_eq!(server.path(), "/mqtt");
    }

    #[test]
    fn parse_without_path() {
        let server = MqttServer::parse("tcp://127.0.0.1:1883").unwrap();
        assert_eq!(server.scheme(), "tcp");
        assert_eq!(server.port(), 1883);
        assert_eq!(server.path(), "");
        assert!(!server.is_websocket());
    }

    #[test]
    fn parse_rejects_bad_addresses() {
        assert!(MqttServer::parse("us-mqtt.cloud.sengled.com:443").is_err());
        assert!(MqttServer::parse("http://host:80/mqtt").is_err());
        assert!(MqttServer::parse("wss://host:port/mqtt").is_err());
        assert!(MqttServer::parse("wss://:443/mqtt").is_err());
    }

    #[test]
    fn scheme_is_case_insensitive() {
        let server = MqttServer::parse("WSS://host/mqtt").unwrap();
        assert_eq!(server.scheme(), "wss");
        assert!(server.is_websocket());
    }

    #[test]
    fn display_matches_url() {
        let server = MqttServer::parse("ws://host:8080/ws").unwrap();
        assert_eq!(server.to_string(), "ws://host:8080/ws");
    }

    #[tokio::test]
    async fn connect_returns_immediately() {
        let router = Arc::new(TopicRouter::new());
        let server = MqttServer::parse("tcp://127.0.0.1:1").unwrap();
        let client = MqttClient::connect(&server, "abc", MqttClient::DEFAULT_KEEP_ALIVE, router);
        assert_eq!(client.server(), &server);
        client.disconnect().await;
    }

    #[tokio::test]
    async fn event_task_survives_refused_connect() {
        let router = Arc::new(TopicRouter::new());
        let server = MqttServer::parse("tcp://127.0.0.1:1").unwrap();
        let client = MqttClient::connect(&server, "abc", MqttClient::DEFAULT_KEEP_ALIVE, router);

        tokio::time::sleep(Duration::from_millis(300)).await;

        assert!(!client.event_task.is_finished());
        assert!(
            client
                .publish("wifielement/X/update", "{}".to_string())
                .await
                .is_ok()
        );
        client.disconnect().await;
    }
}
