// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Bulb and switch proxies.
//!
//! A [`Bulb`] stands for one Sengled bulb in the cloud. It turns intents into
//! either an MQTT publish (Wi-Fi bulbs) or an HTTP request (Zigbee bulbs),
//! keeps the last known state, and updates it from pull refreshes and from
//! MQTT status pushes.
//!
//! # Transports
//!
//! Wi-Fi commands await only the MQTT enqueue. Zigbee commands are spawned
//! on the runtime and return at once; a failure in the spawned request is
//! logged and otherwise dropped.
//!
//! ```no_run
//! use sengled_lib::{ClientConfig, SengledClient};
//! use sengled_lib::command::LightRequest;
//!
//! # async fn example() -> sengled_lib::Result<()> {
//! let client = SengledClient::connect(ClientConfig::new("me@example.com", "secret")).await?;
//! for bulb in client.discover_bulbs().await? {
//!     bulb.turn_on(LightRequest::new().with_brightness(128)).await?;
//!     println!("{} is on: {}", bulb.name(), bulb.is_on());
//! }
//! # Ok(())
//! # }
//! ```
//!
//! # Refresh and the one-shot flag
//!
//! Every local command sets a one-shot flag. The next [`Bulb::update`]
//! clears it and skips the fetch, so an optimistic state is not overwritten
//! by a listing the cloud has not caught up with yet.

pub(crate) mod property;
mod switch;

#[cfg(test)]
pub(crate) mod testing;

pub use property::DeviceProperty;
pub use switch::{Switch, SwitchState};

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Weak};

use parking_lot::RwLock;
use serde_json::json;

use crate::capabilities::Capabilities;
use crate::client::SengledClient;
use crate::command::{BulbCommand, LightRequest, status_topic, update_topic};
use crate::error::{DeviceError, Error, ValueError};
use crate::protocol::{CloudApi, MessageHandler};
use crate::state::{BulbState, StateChange};
use crate::subscription::{CallbackRegistry, Subscribable, SubscriptionId};
use crate::telemetry::parse_status;
use crate::types::{
    DEFAULT_KELVIN, Effect, PowerState, RgbColor, convert_triple_to_vendor, kelvin_to_mired,
    rescale, round_half_even,
};

/// Type code of the bulb that reports an alarm status.
const ALARM_TYPE_CODE: &str = "E13-N11";

/// How a bulb is reached.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum Transport {
    /// Wi-Fi bulb, commanded over MQTT.
    Wifi,
    /// Hub-bridged Zigbee bulb, commanded over HTTP.
    Zigbee,
}

impl Transport {
    /// Returns `true` for Wi-Fi bulbs.
    #[must_use]
    pub const fn is_wifi(&self) -> bool {
        matches!(self, Self::Wifi)
    }
}

impl std::fmt::Display for Transport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Wifi => f.write_str("wifi"),
            Self::Zigbee => f.write_str("zigbee"),
        }
    }
}

/// Initial snapshot a [`Bulb`] is built from.
///
/// # Examples
///
/// ```
/// use sengled_lib::Capabilities;
/// use sengled_lib::device::{BulbInfo, Transport};
/// use sengled_lib::types::PowerState;
///
/// let info = BulbInfo::new("B0:CE:18:00:00:01", Transport::Wifi)
///     .with_name("Kitchen")
///     .with_power(PowerState::On)
///     .with_capabilities(Capabilities::dimmable())
///     .with_session("JSESSIONID");
/// assert_eq!(info.name(), "Kitchen");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BulbInfo {
    mac: String,
    transport: Transport,
    name: String,
    model: Option<String>,
    power: PowerState,
    online: bool,
    capabilities: Capabilities,
    session: String,
    country: String,
}

impl BulbInfo {
    /// Creates a snapshot with default values for everything but identity.
    #[must_use]
    pub fn new(mac: impl Into<String>, transport: Transport) -> Self {
        Self {
            mac: mac.into(),
            transport,
            name: String::new(),
            model: None,
            power: PowerState::Off,
            online: false,
            capabilities: Capabilities::default(),
            session: String::new(),
            country: String::new(),
        }
    }

    /// Builds a snapshot from a listing entry.
    #[must_use]
    pub fn from_property(
        property: &DeviceProperty,
        session: impl Into<String>,
        country: impl Into<String>,
    ) -> Self {
        Self {
            mac: property.uuid().to_string(),
            transport: property.transport(),
            name: property.name(),
            model: property.type_code(),
            power: property.switch(),
            online: property.is_online(),
            capabilities: Capabilities::from_property(property),
            session: session.into(),
            country: country.into(),
        }
    }

    /// Sets the display name.
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Sets the model (type code).
    #[must_use]
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    /// Sets the initial power state.
    #[must_use]
    pub fn with_power(mut self, power: PowerState) -> Self {
        self.power = power;
        self
    }

    /// Sets the initial availability.
    #[must_use]
    pub fn with_online(mut self, online: bool) -> Self {
        self.online = online;
        self
    }

    /// Sets the capabilities.
    #[must_use]
    pub fn with_capabilities(mut self, capabilities: Capabilities) -> Self {
        self.capabilities = capabilities;
        self
    }

    /// Sets the session credential used for HTTP calls.
    #[must_use]
    pub fn with_session(mut self, session: impl Into<String>) -> Self {
        self.session = session.into();
        self
    }

    /// Sets the account country code.
    #[must_use]
    pub fn with_country(mut self, country: impl Into<String>) -> Self {
        self.country = country.into();
        self
    }

    /// Returns the device identifier.
    #[must_use]
    pub fn mac(&self) -> &str {
        &self.mac
    }

    /// Returns the transport.
    #[must_use]
    pub fn transport(&self) -> Transport {
        self.transport
    }

    /// Returns the display name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }
}

/// State and subscribers shared with the push handler.
#[derive(Debug)]
struct Shared {
    state: RwLock<BulbState>,
    callbacks: CallbackRegistry,
}

impl Shared {
    /// Applies `changes` and notifies subscribers of the effective ones.
    ///
    /// Callbacks run after the state lock is released.
    fn apply(&self, changes: &[StateChange]) {
        let applied: Vec<&StateChange> = {
            let mut state = self.state.write();
            changes.iter().filter(|change| state.apply(change)).collect()
        };

        for change in applied {
            self.callbacks.dispatch(change);
        }
    }
}

/// Proxy for one Sengled bulb.
///
/// Capabilities and transport are fixed at construction.
pub struct Bulb<A: CloudApi = SengledClient> {
    api: Arc<A>,
    mac: String,
    model: Option<String>,
    transport: Transport,
    capabilities: Capabilities,
    session: String,
    country: String,
    shared: Arc<Shared>,
    just_changed: AtomicBool,
}

impl<A: CloudApi> Bulb<A> {
    /// Creates the proxy and subscribes to the bulb's status topic.
    ///
    /// A missing MQTT connection or a failed subscription is logged; the
    /// bulb then works without pushes.
    pub async fn connect(api: Arc<A>, info: BulbInfo) -> Self {
        let bulb = Self::new(api, info);

        let topic = status_topic(&bulb.mac);
        match bulb.api.subscribe(topic.clone(), bulb.status_handler()).await {
            Ok(true) => {
                tracing::debug!(device = %bulb.mac, topic = %topic, "Subscribed to status pushes");
            }
            Ok(false) => {
                tracing::info!(device = %bulb.mac, "No MQTT connection, status pushes disabled");
            }
            Err(e) => {
                tracing::warn!(device = %bulb.mac, error = %e, "Status subscription failed");
            }
        }

        bulb
    }

    fn new(api: Arc<A>, info: BulbInfo) -> Self {
        let mut state = BulbState::new(info.name);
        state.apply(&StateChange::Power(info.power));
        state.apply(&StateChange::Available(info.online));

        Self {
            api,
            mac: info.mac,
            model: info.model,
            transport: info.transport,
            capabilities: info.capabilities,
            session: info.session,
            country: info.country,
            shared: Arc::new(Shared {
                state: RwLock::new(state),
                callbacks: CallbackRegistry::new(),
            }),
            just_changed: AtomicBool::new(false),
        }
    }

    /// Handler for `wifielement/<mac>/status`. Holds only a weak reference.
    fn status_handler(&self) -> MessageHandler {
        let shared: Weak<Shared> = Arc::downgrade(&self.shared);
        let mac = self.mac.clone();
        Arc::new(move |payload: &[u8]| {
            if let Some(shared) = shared.upgrade() {
                shared.apply(&parse_status(payload, &mac));
            }
        })
    }

    // ========== Identity ==========

    /// Returns the device identifier.
    #[must_use]
    pub fn mac(&self) -> &str {
        &self.mac
    }

    /// Returns the model (type code), if known.
    #[must_use]
    pub fn model(&self) -> Option<&str> {
        self.model.as_deref()
    }

    /// Returns how the bulb is reached.
    #[must_use]
    pub fn transport(&self) -> Transport {
        self.transport
    }

    /// Returns `true` for Wi-Fi bulbs.
    #[must_use]
    pub fn is_wifi(&self) -> bool {
        self.transport.is_wifi()
    }

    /// Returns the capabilities.
    #[must_use]
    pub fn capabilities(&self) -> &Capabilities {
        &self.capabilities
    }

    /// Returns the account country code.
    #[must_use]
    pub fn country(&self) -> &str {
        &self.country
    }

    // ========== State ==========

    /// Returns a snapshot of the current state.
    #[must_use]
    pub fn state(&self) -> BulbState {
        self.shared.state.read().clone()
    }

    /// Returns the display name.
    #[must_use]
    pub fn name(&self) -> String {
        self.shared.state.read().name().to_string()
    }

    /// Returns `true` if the bulb is on.
    #[must_use]
    pub fn is_on(&self) -> bool {
        self.shared.state.read().is_on()
    }

    /// Returns `true` if the cloud reports the bulb online.
    #[must_use]
    pub fn is_available(&self) -> bool {
        self.shared.state.read().is_available()
    }

    /// Returns `true` if the next refresh will be skipped.
    #[must_use]
    pub fn has_pending_change(&self) -> bool {
        self.just_changed.load(Ordering::SeqCst)
    }

    // ========== Commands ==========

    /// Sends a command after checking capabilities and transport.
    ///
    /// # Errors
    ///
    /// Returns [`DeviceError::UnsupportedCapability`] if the bulb cannot do
    /// it, or a protocol error if the Wi-Fi publish cannot be queued.
    pub async fn execute(&self, command: BulbCommand) -> Result<(), Error> {
        self.check_command(&command)?;
        self.send(command).await
    }

    /// Sets the power state.
    ///
    /// # Errors
    ///
    /// Returns error if the command cannot be sent.
    pub async fn set_power(&self, state: PowerState) -> Result<(), Error> {
        self.execute(BulbCommand::Switch(state)).await
    }

    /// Turns the bulb on.
    ///
    /// # Errors
    ///
    /// Returns error if the command cannot be sent.
    pub async fn power_on(&self) -> Result<(), Error> {
        self.set_power(PowerState::On).await
    }

    /// Turns the bulb off.
    ///
    /// # Errors
    ///
    /// Returns error if the command cannot be sent.
    pub async fn power_off(&self) -> Result<(), Error> {
        self.set_power(PowerState::Off).await
    }

    /// Sets brightness (0-255).
    ///
    /// # Errors
    ///
    /// Returns error if the bulb is not dimmable or the command fails.
    pub async fn set_brightness(&self, brightness: u8) -> Result<(), Error> {
        self.execute(BulbCommand::Brightness(brightness)).await
    }

    /// Sets color temperature in kelvin.
    ///
    /// # Errors
    ///
    /// Returns error if the bulb has no tunable white or the command fails.
    pub async fn set_color_temperature(&self, kelvin: u16) -> Result<(), Error> {
        self.execute(BulbCommand::ColorTemperature(kelvin)).await
    }

    /// Sets RGB color. Also switches the bulb on.
    ///
    /// # Errors
    ///
    /// Returns error if the bulb has no color or the command fails.
    pub async fn set_color(&self, color: RgbColor) -> Result<(), Error> {
        self.execute(BulbCommand::Color(color)).await
    }

    /// Sets RGB color from an `"R,G,B"` or `"(R, G, B)"` string.
    ///
    /// # Errors
    ///
    /// Returns error if the string is not a color triple, or as
    /// [`set_color`](Self::set_color).
    pub async fn set_color_triple(&self, triple: &str) -> Result<(), Error> {
        let color = RgbColor::from_vendor(&convert_triple_to_vendor(triple))
            .map_err(|_| ValueError::InvalidColor(triple.to_string()))?;
        self.set_color(color).await
    }

    /// Starts a light effect. Also switches the bulb on. Wi-Fi only.
    ///
    /// # Errors
    ///
    /// Returns error on Zigbee bulbs, on bulbs without full color support,
    /// or if the command fails.
    pub async fn set_effect(&self, effect: Effect) -> Result<(), Error> {
        self.execute(BulbCommand::Effect(effect)).await
    }

    /// Starts an effect by label, e.g. `"Color Cycle"`.
    ///
    /// # Errors
    ///
    /// Returns error if the label is unknown, or as
    /// [`set_effect`](Self::set_effect).
    pub async fn set_effect_label(&self, label: &str) -> Result<(), Error> {
        self.set_effect(label.parse()?).await
    }

    /// Sets the neon status. Wi-Fi only.
    ///
    /// # Errors
    ///
    /// Returns error on Zigbee bulbs or if the command fails.
    pub async fn set_neon(&self, status: u8) -> Result<(), Error> {
        self.execute(BulbCommand::Neon(status)).await
    }

    // ========== Light intents ==========

    /// Applies a light request. An empty request switches the bulb on.
    ///
    /// Every command is checked before the first one is sent.
    ///
    /// # Errors
    ///
    /// Returns error if a setting is invalid or unsupported, or a command
    /// cannot be sent.
    pub async fn turn_on(&self, request: LightRequest) -> Result<(), Error> {
        let commands = request.commands()?;
        for command in &commands {
            self.check_command(command)?;
        }
        for command in commands {
            self.send(command).await?;
        }
        Ok(())
    }

    /// Switches the bulb off.
    ///
    /// # Errors
    ///
    /// Returns error if the command cannot be sent.
    pub async fn turn_off(&self) -> Result<(), Error> {
        self.power_off().await
    }

    /// Current color as hue (0-360) and saturation (0-100).
    ///
    /// Wi-Fi bulbs read the vendor color string, Zigbee bulbs the RGB
    /// components. Returns `None` if the color string does not parse.
    #[must_use]
    pub fn hs_color(&self) -> Option<(u16, u8)> {
        let state = self.shared.state.read();
        match self.transport {
            Transport::Wifi => RgbColor::from_vendor(state.color()).ok().map(|c| c.to_hs()),
            Transport::Zigbee => Some(state.rgb().to_hs()),
        }
    }

    /// Current color temperature in mireds, 2000 K when unknown.
    #[must_use]
    pub fn color_temp_mireds(&self) -> Option<u16> {
        let kelvin = self
            .shared
            .state
            .read()
            .color_temperature()
            .unwrap_or(DEFAULT_KELVIN);
        kelvin_to_mired(kelvin)
    }

    /// Effects offered to users.
    #[must_use]
    pub fn effect_list(&self) -> &'static [Effect] {
        &Effect::ALL
    }

    // ========== Inbound ==========

    /// Applies a status push payload.
    ///
    /// Malformed payloads are ignored.
    pub fn handle_status(&self, payload: &[u8]) {
        self.shared.apply(&parse_status(payload, &self.mac));
    }

    /// Refreshes state from the cloud listing.
    ///
    /// If a local command was sent since the last refresh, the flag is
    /// cleared and nothing is fetched. A bulb missing from the listing keeps
    /// its state.
    ///
    /// # Errors
    ///
    /// Returns error if the request fails or the listing lacks its device
    /// list.
    pub async fn update(&self) -> Result<(), Error> {
        if self.just_changed.swap(false, Ordering::SeqCst) {
            tracing::debug!(device = %self.mac, "Skipping refresh after local change");
            return Ok(());
        }

        tracing::debug!(device = %self.mac, transport = %self.transport, "Refreshing bulb");

        let changes = match self.transport {
            Transport::Wifi => self.fetch_wifi().await?,
            Transport::Zigbee => self.fetch_zigbee().await?,
        };

        match changes {
            Some(changes) => self.shared.apply(&changes),
            None => tracing::debug!(device = %self.mac, "Bulb not in listing"),
        }
        Ok(())
    }

    // ========== Internals ==========

    fn check_command(&self, command: &BulbCommand) -> Result<(), Error> {
        if command.is_wifi_only() && !self.transport.is_wifi() {
            return Err(unsupported(format!("{} on zigbee bulbs", command.type_tag())));
        }
        let supported = match command {
            BulbCommand::Switch(_) | BulbCommand::Neon(_) => true,
            BulbCommand::Brightness(_) => self.capabilities.supports_brightness_control(),
            BulbCommand::ColorTemperature(_) => {
                self.capabilities.supports_color_temperature_control()
            }
            BulbCommand::Color(_) => self.capabilities.supports_color_control(),
            BulbCommand::Effect(_) => self.capabilities.supports_effects(),
        };
        if supported {
            Ok(())
        } else {
            Err(unsupported(command.type_tag().to_string()))
        }
    }

    async fn send(&self, command: BulbCommand) -> Result<(), Error> {
        match self.transport {
            Transport::Wifi => {
                let time = chrono::Utc::now().timestamp_millis();
                let payload = command.mqtt_payload(&self.mac, time);
                tracing::info!(device = %self.mac, command = %command, "Publishing bulb command");
                self.api
                    .publish(update_topic(&self.mac), payload.to_string())
                    .await?;
            }
            Transport::Zigbee => {
                let (url, payload) = command
                    .http_request(&self.mac, self.api.endpoints())
                    .ok_or_else(|| unsupported(command.type_tag().to_string()))?;
                tracing::info!(device = %self.mac, command = %command, "Sending bulb command");
                self.spawn_request(url, payload);
            }
        }

        self.just_changed.store(true, Ordering::SeqCst);
        self.shared.apply(&command.optimistic_changes());
        Ok(())
    }

    fn spawn_request(&self, url: String, payload: serde_json::Value) {
        let api = Arc::clone(&self.api);
        let session = self.session.clone();
        let mac = self.mac.clone();
        tokio::spawn(async move {
            if let Err(e) = api.request(url, payload, session).await {
                tracing::warn!(device = %mac, error = %e, "Bulb command failed");
            }
        });
    }

    async fn fetch_wifi(&self) -> Result<Option<Vec<StateChange>>, Error> {
        let data = self
            .api
            .request(self.api.endpoints().wifi_devices(), json!({}), self.session.clone())
            .await?;

        let Some(entry) = property::find_entry(property::wifi_entries(&data)?, &self.mac) else {
            return Ok(None);
        };
        let property = DeviceProperty::from_wifi(entry)?;

        let mut changes = vec![
            StateChange::Name(property.name()),
            StateChange::Power(property.switch()),
            StateChange::Available(property.is_online()),
        ];
        if let Some(rssi) = property.rssi().and_then(|r| i32::try_from(r).ok()) {
            changes.push(StateChange::Rssi(rssi));
        }
        if self.capabilities.brightness
            && let Some(brightness) = property.brightness()
        {
            #[allow(clippy::cast_precision_loss)]
            let value = round_half_even(brightness as f64 / 100.0 * 255.0);
            if let Ok(value) = u8::try_from(value) {
                changes.push(StateChange::Brightness(value));
            }
        }
        if self.capabilities.color_temp
            && let Some(percent) = property.color_temperature()
        {
            #[allow(clippy::cast_precision_loss)]
            let kelvin = round_half_even(rescale(percent as f64, 0.0, 100.0, 2000.0, 6500.0));
            if let Ok(kelvin) = u16::try_from(kelvin) {
                changes.push(StateChange::ColorTemperature(kelvin));
            }
        }
        if self.capabilities.color {
            changes.push(StateChange::Color(property.color()));
        }
        Ok(Some(changes))
    }

    async fn fetch_zigbee(&self) -> Result<Option<Vec<StateChange>>, Error> {
        let data = self
            .api
            .request(self.api.endpoints().zigbee_devices(), json!({}), self.session.clone())
            .await?;

        let Some(entry) = property::find_entry(property::zigbee_entries(&data)?, &self.mac) else {
            return Ok(None);
        };
        let property = DeviceProperty::from_zigbee(entry)?;

        let mut changes = vec![
            StateChange::Name(property.name()),
            StateChange::Power(property.switch()),
            StateChange::Available(property.is_online()),
        ];
        if let Some(level) = property.rssi() {
            #[allow(clippy::cast_precision_loss)]
            let dbm = round_half_even(rescale(level as f64, 0.0, 5.0, -100.0, -30.0));
            if let Ok(dbm) = i32::try_from(dbm) {
                changes.push(StateChange::Rssi(dbm));
            }
        }
        if self.capabilities.brightness
            && let Some(brightness) = property.brightness().and_then(|b| u8::try_from(b).ok())
        {
            changes.push(StateChange::Brightness(brightness));
        }
        if self.capabilities.color
            && let Some(rgb) = property.rgb()
        {
            changes.push(StateChange::Rgb(rgb));
        }
        if self.capabilities.color_temp
            && let Some(ct) = property
                .color_temperature()
                .and_then(|ct| u16::try_from(ct).ok())
        {
            changes.push(StateChange::ColorTemperature(ct));
        }
        if property.type_code().as_deref() == Some(ALARM_TYPE_CODE)
            && let Some(alarm) = property.alarm_status()
        {
            changes.push(StateChange::AlarmStatus(alarm));
        }
        Ok(Some(changes))
    }
}

fn unsupported(capability: String) -> Error {
    Error::Device(DeviceError::UnsupportedCapability { capability })
}

impl<A: CloudApi> std::fmt::Debug for Bulb<A> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Bulb")
            .field("mac", &self.mac)
            .field("model", &self.model)
            .field("transport", &self.transport)
            .field("capabilities", &self.capabilities)
            .field("state", &*self.shared.state.read())
            .finish_non_exhaustive()
    }
}

impl<A: CloudApi> Subscribable for Bulb<A> {
    fn on_power_changed<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn(PowerState) + Send + Sync + 'static,
    {
        self.shared.callbacks.on_power_changed(callback)
    }

    fn on_brightness_changed<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn(u8) + Send + Sync + 'static,
    {
        self.shared.callbacks.on_brightness_changed(callback)
    }

    fn on_color_changed<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn(&str) + Send + Sync + 'static,
    {
        self.shared.callbacks.on_color_changed(callback)
    }

    fn on_color_temp_changed<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn(u16) + Send + Sync + 'static,
    {
        self.shared.callbacks.on_color_temp_changed(callback)
    }

    fn on_state_changed<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn(&StateChange) + Send + Sync + 'static,
    {
        self.shared.callbacks.on_state_changed(callback)
    }

    fn unsubscribe(&self, id: SubscriptionId) -> bool {
        self.shared.callbacks.unsubscribe(id)
    }
}
