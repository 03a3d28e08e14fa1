// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Zigbee wall switch.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use parking_lot::RwLock;
use serde_json::json;

use crate::client::SengledClient;
use crate::command::BulbCommand;
use crate::device::DeviceProperty;
use crate::device::property::{find_entry, zigbee_entries};
use crate::error::Error;
use crate::protocol::CloudApi;
use crate::types::PowerState;

/// Last known state of a [`Switch`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SwitchState {
    name: String,
    power: PowerState,
    available: bool,
}

impl SwitchState {
    /// Returns the display name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the power state.
    #[must_use]
    pub fn power(&self) -> PowerState {
        self.power
    }

    /// Returns `true` if the cloud reports the switch online.
    #[must_use]
    pub fn is_available(&self) -> bool {
        self.available
    }
}

/// Proxy for a Sengled Zigbee wall switch (`E1E-G7F`).
///
/// Commands are fire-and-forget HTTP calls, like Zigbee bulbs.
pub struct Switch<A: CloudApi = SengledClient> {
    api: Arc<A>,
    uuid: String,
    model: Option<String>,
    session: String,
    country: String,
    state: RwLock<SwitchState>,
    just_changed: AtomicBool,
}

impl<A: CloudApi> Switch<A> {
    /// Product code of the wall switch.
    pub const PRODUCT_CODE: &'static str = "E1E-G7F";

    /// Creates the proxy from a Zigbee listing entry.
    #[must_use]
    pub fn new(
        api: Arc<A>,
        property: &DeviceProperty,
        session: impl Into<String>,
        country: impl Into<String>,
    ) -> Self {
        Self {
            api,
            uuid: property.uuid().to_string(),
            model: property.product_code(),
            session: session.into(),
            country: country.into(),
            state: RwLock::new(SwitchState {
                name: property.name(),
                power: property.switch(),
                available: true,
            }),
            just_changed: AtomicBool::new(false),
        }
    }

    /// Returns the device identifier.
    #[must_use]
    pub fn uuid(&self) -> &str {
        &self.uuid
    }

    /// Returns the product code.
    #[must_use]
    pub fn model(&self) -> Option<&str> {
        self.model.as_deref()
    }

    /// Returns the account country code.
    #[must_use]
    pub fn country(&self) -> &str {
        &self.country
    }

    /// Returns a snapshot of the state.
    #[must_use]
    pub fn state(&self) -> SwitchState {
        self.state.read().clone()
    }

    /// Returns `true` if the switch is on.
    #[must_use]
    pub fn is_on(&self) -> bool {
        self.state.read().power.is_on()
    }

    /// Turns the switch on.
    pub async fn turn_on(&self) {
        self.set_power(PowerState::On).await;
    }

    /// Turns the switch off.
    pub async fn turn_off(&self) {
        self.set_power(PowerState::Off).await;
    }

    /// Sends the on/off request in the background and assumes it succeeds.
    ///
    /// The request runs on a spawned task; its failure is logged.
    #[allow(clippy::unused_async)]
    pub async fn set_power(&self, power: PowerState) {
        let command = BulbCommand::Switch(power);
        if let Some((url, payload)) = command.http_request(&self.uuid, self.api.endpoints()) {
            tracing::info!(device = %self.uuid, command = %command, "Sending switch command");

            let api = Arc::clone(&self.api);
            let session = self.session.clone();
            let uuid = self.uuid.clone();
            tokio::spawn(async move {
                if let Err(e) = api.request(url, payload, session).await {
                    tracing::warn!(device = %uuid, error = %e, "Switch command failed");
                }
            });
        }

        self.state.write().power = power;
        self.just_changed.store(true, Ordering::SeqCst);
    }

    /// Refreshes name, power and availability from the Zigbee listing.
    ///
    /// Skipped once after a local command.
    ///
    /// # Errors
    ///
    /// Returns error if the request fails or the listing is malformed.
    pub async fn update(&self) -> Result<(), Error> {
        if self.just_changed.swap(false, Ordering::SeqCst) {
            tracing::debug!(device = %self.uuid, "Skipping refresh after local change");
            return Ok(());
        }

        let data = self
            .api
            .request(self.api.endpoints().zigbee_devices(), json!({}), self.session.clone())
            .await?;

        let Some(entry) = find_entry(zigbee_entries(&data)?, &self.uuid) else {
            tracing::debug!(device = %self.uuid, "Switch not in listing");
            return Ok(());
        };
        let property = DeviceProperty::from_zigbee(entry)?;

        let mut state = self.state.write();
        state.name = property.name();
        state.power = property.switch();
        state.available = property.is_online();
        Ok(())
    }
}

impl<A: CloudApi> std::fmt::Debug for Switch<A> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Switch")
            .field("uuid", &self.uuid)
            .field("model", &self.model)
            .field("state", &*self.state.read())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::device::testing::RecordingApi;

    const UUID: &str = "000D6F00AABBCCDD";

    fn property() -> DeviceProperty {
        DeviceProperty::from_zigbee(&json!({
            "deviceUuid": UUID,
            "attributes": {"name": "Hall", "onoff": "0", "productCode": "E1E-G7F"}
        }))
        .unwrap()
    }

    #[tokio::test]
    async fn turn_on_spawns_request_and_sets_state() {
        let (api, mut rx) = RecordingApi::new(false);
        let switch = Switch::new(Arc::clone(&api), &property(), "sess", "us");
        assert_eq!(switch.model(), Some("E1E-G7F"));
        assert!(!switch.is_on());
        assert!(switch.state().is_available());

        switch.turn_on().await;
        assert!(switch.is_on());

        let request = rx.recv().await.unwrap();
        assert_eq!(request.url, api.endpoints().set_on_off());
        assert_eq!(request.payload, json!({"deviceUuid": UUID, "onoff": "1"}));
        assert_eq!(request.session, "sess");
    }

    #[tokio::test]
    async fn update_reads_matching_entry() {
        let (api, mut rx) = RecordingApi::new(false);
        api.respond(
            api.endpoints().zigbee_devices(),
            json!({"deviceInfos": [{"lampInfos": [
                {"deviceUuid": UUID, "attributes": {"name": "Hallway", "onoff": 1, "isOnline": "0"}}
            ]}]}),
        );
        let switch = Switch::new(Arc::clone(&api), &property(), "sess", "us");

        switch.update().await.unwrap();

        let state = switch.state();
        assert_eq!(state.name(), "Hallway");
        assert_eq!(state.power(), PowerState::On);
        assert!(!state.is_available());
        assert_eq!(rx.recv().await.unwrap().url, api.endpoints().zigbee_devices());
    }

    #[tokio::test]
    async fn update_skips_after_command() {
        let (api, mut rx) = RecordingApi::new(false);
        let switch = Switch::new(Arc::clone(&api), &property(), "sess", "us");

        switch.turn_off().await;
        switch.update().await.unwrap();

        // Only the on/off request went out
        let request = rx.recv().await.unwrap();
        assert_eq!(request.url, api.endpoints().set_on_off());
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn on_then_off_sends_both_requests() {
        let (api, mut rx) = RecordingApi::new(false);
        let switch = Switch::new(Arc::clone(&api), &property(), "sess", "us");

        switch.turn_on().await;
        let first = rx.recv().await.unwrap();
        switch.turn_off().await;
        let second = rx.recv().await.unwrap();

        assert_eq!(first.payload["onoff"], "1");
        assert_eq!(second.payload["onoff"], "0");
        assert!(!switch.is_on());
        assert!(switch.state().is_available());
    }
}
