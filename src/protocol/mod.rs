// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Protocol layer for talking to the Sengled cloud.
//!
//! Zigbee bulbs are driven through the cloud's JSON-over-HTTP API. Wi-Fi
//! bulbs receive commands and report status over MQTT.
//!
//! # Components
//!
//! - [`HttpClient`]: JSON `POST` requests with the vendor headers
//! - [`MqttClient`]: websocket MQTT connection authenticated by the session
//! - [`TopicRouter`]: dispatches incoming publishes to per-topic handlers
//! - [`Endpoints`]: URLs of the four cloud hosts
//! - [`CloudApi`]: the seam bulbs use, implemented by
//!   [`SengledClient`](crate::SengledClient)

mod endpoints;
mod http;
mod mqtt;
mod topic_router;

pub use endpoints::Endpoints;
pub use http::{HttpClient, REQUESTED_WITH};
pub use mqtt::{MqttClient, MqttServer};
pub use topic_router::TopicRouter;

use std::future::Future;
use std::sync::Arc;

use serde_json::Value;

use crate::error::ProtocolError;

/// Handler invoked with the raw payload of an MQTT message.
pub type MessageHandler = Arc<dyn Fn(&[u8]) + Send + Sync>;

/// Cloud operations a bulb needs.
///
/// The futures are `Send` so bulbs can spawn fire-and-forget requests.
/// Implementations may use `async fn`.
pub trait CloudApi: Send + Sync + 'static {
    /// Posts a JSON `payload` to `url` with the session credential.
    ///
    /// # Errors
    ///
    /// Returns error if the request fails or the body is not JSON.
    fn request(
        &self,
        url: String,
        payload: Value,
        session: String,
    ) -> impl Future<Output = Result<Value, ProtocolError>> + Send;

    /// Publishes `payload` on `topic`.
    ///
    /// # Errors
    ///
    /// Returns error if no MQTT connection exists or the publish cannot be
    /// queued.
    fn publish(
        &self,
        topic: String,
        payload: String,
    ) -> impl Future<Output = Result<(), ProtocolError>> + Send;

    /// Subscribes to `topic` and routes its messages to `handler`.
    ///
    /// Returns `Ok(false)` when there is no MQTT connection. The handler is
    /// not registered in that case.
    ///
    /// # Errors
    ///
    /// Returns error if the subscription cannot be queued.
    fn subscribe(
        &self,
        topic: String,
        handler: MessageHandler,
    ) -> impl Future<Output = Result<bool, ProtocolError>> + Send;

    /// Returns the cloud endpoints.
    fn endpoints(&self) -> &Endpoints;
}
