// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! In-memory [`CloudApi`] for unit tests.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::Mutex;
use serde_json::Value;
use tokio::sync::mpsc;

use crate::error::ProtocolError;
use crate::protocol::{CloudApi, Endpoints, MessageHandler};

/// A request seen by [`RecordingApi`].
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct RecordedRequest {
    pub url: String,
    pub payload: Value,
    pub session: String,
}

/// Records requests and publishes, answers requests from canned responses.
pub(crate) struct RecordingApi {
    endpoints: Endpoints,
    mqtt: bool,
    responses: Mutex<HashMap<String, Value>>,
    requests: mpsc::UnboundedSender<RecordedRequest>,
    published: Mutex<Vec<(String, Value)>>,
    handlers: Mutex<HashMap<String, MessageHandler>>,
}

impl RecordingApi {
    /// Creates the mock. `mqtt` selects whether subscriptions succeed.
    pub(crate) fn new(mqtt: bool) -> (Arc<Self>, mpsc::UnboundedReceiver<RecordedRequest>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let api = Self {
            endpoints: Endpoints::with_base("http://cloud.test"),
            mqtt,
            responses: Mutex::new(HashMap::new()),
            requests: tx,
            published: Mutex::new(Vec::new()),
            handlers: Mutex::new(HashMap::new()),
        };
        (Arc::new(api), rx)
    }

    /// Answers requests to `url` with `body`.
    pub(crate) fn respond(&self, url: impl Into<String>, body: Value) {
        self.responses.lock().insert(url.into(), body);
    }

    /// Returns every publish as `(topic, decoded payload)`.
    pub(crate) fn published(&self) -> Vec<(String, Value)> {
        self.published.lock().clone()
    }

    /// Delivers `payload` to the handler subscribed on `topic`.
    pub(crate) fn push(&self, topic: &str, payload: &[u8]) -> bool {
        let handler = self.handlers.lock().get(topic).cloned();
        match handler {
            Some(handler) => {
                handler(payload);
                true
            }
            None => false,
        }
    }

    /// Returns the subscribed topics.
    pub(crate) fn topics(&self) -> Vec<String> {
        self.handlers.lock().keys().cloned().collect()
    }
}

impl CloudApi for RecordingApi {
    async fn request(
        &self,
        url: String,
        payload: Value,
        session: String,
    ) -> Result<Value, ProtocolError> {
        let _ = self.requests.send(RecordedRequest {
            url: url.clone(),
            payload,
            session,
        });
        self.responses
            .lock()
            .get(&url)
            .cloned()
            .ok_or_else(|| ProtocolError::ConnectionFailed(format!("no response for {url}")))
    }

    async fn publish(&self, topic: String, payload: String) -> Result<(), ProtocolError> {
        if !self.mqtt {
            return Err(ProtocolError::ConnectionFailed("no MQTT".to_string()));
        }
        let payload = serde_json::from_str(&payload)?;
        self.published.lock().push((topic, payload));
        Ok(())
    }

    async fn subscribe(&self, topic: String, handler: MessageHandler) -> Result<bool, ProtocolError> {
        if !self.mqtt {
            return Ok(false);
        }
        self.handlers.lock().insert(topic, handler);
        Ok(true)
    }

    fn endpoints(&self) -> &Endpoints {
        &self.endpoints
    }
}
