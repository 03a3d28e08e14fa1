// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Integration tests for the Wi-Fi MQTT path using mockforge-mqtt.
//!
//! The cloud HTTP API is served by wiremock; its `inceptionAddr` points at a
//! local mock broker.

use std::time::Duration;

use mockforge_mqtt::broker::MqttConfig;
use mockforge_mqtt::start_mqtt_server;
use sengled_lib::protocol::{MqttClient, MqttServer, TopicRouter};
use sengled_lib::{
    ClientConfig, CloudApi, Endpoints, LightRequest, PowerState, SengledClient, Transport,
};
use serde_json::json;
use tokio::time::sleep;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Helper to find an available port for testing.
fn get_test_port() -> u16 {
    use std::sync::atomic::{AtomicU16, Ordering};
    static PORT_COUNTER: AtomicU16 = AtomicU16::new(18950);
    PORT_COUNTER.fetch_add(1, Ordering::SeqCst)
}

/// Starts a mock MQTT broker on the given port.
async fn start_mock_broker(port: u16) {
    let config = MqttConfig {
        port,
        host: "127.0.0.1".to_string(),
        ..Default::default()
    };

    tokio::spawn(async move {
        let _ = start_mqtt_server(config).await;
    });

    // Give the broker time to bind
    sleep(Duration::from_millis(500)).await;
}

/// Starts a cloud mock whose server info points at the broker on `port`.
async fn start_cloud(port: u16) -> MockServer {
    let cloud = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/user/app/customer/v2/AuthenCross.json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"jsessionId": "S1"})))
        .mount(&cloud)
        .await;
    Mock::given(method("POST"))
        .and(path("/life2/server/getServerInfo.json"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"inceptionAddr": format!("tcp://127.0.0.1:{port}")})),
        )
        .mount(&cloud)
        .await;
    Mock::given(method("POST"))
        .and(path("/life2/device/list.json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"deviceList": [{
            "deviceUuid": "B0:CE:18:00:00:01",
            "category": "wifielement",
            "typeCode": "W21-N13",
            "attributeList": [
                {"name": "name", "value": "Desk"},
                {"name": "switch", "value": "0"},
                {"name": "online", "value": "1"},
                {"name": "brightness", "value": "50"},
                {"name": "colorTemperature", "value": "0"},
                {"name": "color", "value": "255:0:0"}
            ]
        }]})))
        .mount(&cloud)
        .await;
    Mock::given(method("POST"))
        .and(path("/zigbee/device/getDeviceDetails.json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"deviceInfos": []})))
        .mount(&cloud)
        .await;
    cloud
}

fn wifi_config(cloud: &MockServer) -> ClientConfig {
    ClientConfig::new("me@example.com", "secret")
        .with_country("us")
        .with_wifi(true)
        .with_endpoints(Endpoints::with_base(cloud.uri()))
}

// ============================================================================
// MqttClient Tests
// ============================================================================

mod mqtt_client {
    use super::*;
    use std::sync::Arc;

    #[tokio::test]
    async fn connect_and_subscribe() {
        let port = get_test_port();
        start_mock_broker(port).await;

        let server = MqttServer::parse(&format!("tcp://127.0.0.1:{port}")).unwrap();
        let client = MqttClient::connect(
            &server,
            "S1",
            MqttClient::DEFAULT_KEEP_ALIVE,
            Arc::new(TopicRouter::new()),
        );

        assert_eq!(client.server().port(), port);
        assert!(client.subscribe("wifielement/X/status").await.is_ok());
        assert!(client.publish("wifielement/X/update", "{}".to_string()).await.is_ok());
        client.disconnect().await;
    }
}

// ============================================================================
// Session Tests
// ============================================================================

mod session {
    use super::*;

    #[tokio::test]
    async fn login_with_wifi_opens_mqtt() {
        let port = get_test_port();
        start_mock_broker(port).await;
        let cloud = start_cloud(port).await;

        let client = SengledClient::connect(wifi_config(&cloud)).await.unwrap();

        assert!(client.is_mqtt_connected().await);
        assert_eq!(client.mqtt_server().host(), "127.0.0.1");
        assert_eq!(client.mqtt_server().port(), port);
        client.disconnect().await;
        assert!(!client.is_mqtt_connected().await);
    }

    #[tokio::test]
    async fn relogin_after_timeout_reopens_mqtt() {
        let port = get_test_port();
        start_mock_broker(port).await;
        let cloud = start_cloud(port).await;
        Mock::given(method("POST"))
            .and(path("/user/app/customer/isSessionTimeout.json"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"info": "timeout"})))
            .mount(&cloud)
            .await;

        let client = SengledClient::connect(wifi_config(&cloud)).await.unwrap();
        let _bulbs = client.discover_bulbs().await.unwrap();

        client.login().await.unwrap();
        assert!(client.is_mqtt_connected().await);
    }

    #[tokio::test]
    async fn subscribe_registers_with_connection() {
        let port = get_test_port();
        start_mock_broker(port).await;
        let cloud = start_cloud(port).await;

        let client = SengledClient::connect(wifi_config(&cloud)).await.unwrap();
        let subscribed = client
            .subscribe(
                "wifielement/B0:CE:18:00:00:01/status".to_string(),
                std::sync::Arc::new(|_: &[u8]| {}),
            )
            .await
            .unwrap();

        assert!(subscribed);
    }
}

// ============================================================================
// Wi-Fi Bulb Tests
// ============================================================================

mod wifi_bulb {
    use super::*;

    #[tokio::test]
    async fn discovered_bulb_uses_listing() {
        let port = get_test_port();
        start_mock_broker(port).await;
        let cloud = start_cloud(port).await;

        let client = SengledClient::connect(wifi_config(&cloud)).await.unwrap();
        let bulbs = client.discover_bulbs().await.unwrap();

        assert_eq!(bulbs.len(), 1);
        let bulb = &bulbs[0];
        assert_eq!(bulb.transport(), Transport::Wifi);
        assert_eq!(bulb.name(), "Desk");
        assert!(bulb.is_available());
        assert!(!bulb.is_on());
        assert!(bulb.capabilities().supports_color_control());
    }

    #[tokio::test]
    async fn command_publishes_and_updates_state() {
        let port = get_test_port();
        start_mock_broker(port).await;
        let cloud = start_cloud(port).await;

        let client = SengledClient::connect(wifi_config(&cloud)).await.unwrap();
        let bulbs = client.discover_bulbs().await.unwrap();
        let bulb = &bulbs[0];

        bulb.turn_on(LightRequest::new().with_brightness(128))
            .await
            .unwrap();
        assert_eq!(bulb.state().brightness(), 128);
        assert!(bulb.has_pending_change());

        bulb.set_power(PowerState::On).await.unwrap();
        assert!(bulb.is_on());

        // The refresh after a local command is skipped
        bulb.update().await.unwrap();
        assert!(!bulb.has_pending_change());
        assert_eq!(bulb.state().brightness(), 128);
    }

    #[tokio::test]
    async fn effect_and_neon_are_published() {
        let port = get_test_port();
        start_mock_broker(port).await;
        let cloud = start_cloud(port).await;

        let client = SengledClient::connect(wifi_config(&cloud)).await.unwrap();
        let bulbs = client.discover_bulbs().await.unwrap();
        let bulb = &bulbs[0];

        bulb.set_effect_label("Christmas").await.unwrap();
        bulb.set_neon(1).await.unwrap();
        assert!(bulb.is_on());
    }

    #[tokio::test]
    async fn publish_without_wifi_fails() {
        let port = get_test_port();
        let cloud = start_cloud(port).await;
        let config = wifi_config(&cloud).with_wifi(false);

        let client = SengledClient::connect(config).await.unwrap();
        assert!(!client.is_mqtt_connected().await);

        let result = client
            .publish("wifielement/X/update".to_string(), "{}".to_string())
            .await;
        assert!(result.is_err());
    }
}
