// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Sengled Lib - A Rust library to control Sengled smart bulbs.
//!
//! This library talks to the Sengled cloud on behalf of an account. Zigbee
//! bulbs (behind a Sengled hub) are driven over the cloud's JSON HTTP API;
//! Wi-Fi bulbs receive commands and push status over MQTT.
//!
//! # Supported Features
//!
//! - **Session**: login, session timeout checks, MQTT broker lookup
//! - **Discovery**: Zigbee and Wi-Fi bulbs, Zigbee wall switches
//! - **Light control**: power, brightness, color temperature, RGB color
//! - **Wi-Fi extras**: light effects, neon status
//! - **State tracking**: MQTT status pushes and HTTP refresh
//!
//! # Quick Start
//!
//! ```no_run
//! use sengled_lib::{ClientConfig, LightRequest, SengledClient};
//!
//! #[tokio::main]
//! async fn main() -> sengled_lib::Result<()> {
//!     let config = ClientConfig::new("me@example.com", "secret")
//!         .with_country("us")
//!         .with_wifi(true);
//!     let client = SengledClient::connect(config).await?;
//!
//!     for bulb in client.discover_bulbs().await? {
//!         bulb.turn_on(LightRequest::new().with_brightness(128)).await?;
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Callbacks
//!
//! Bulbs report state changes from MQTT pushes, refreshes and local
//! commands through callbacks:
//!
//! ```no_run
//! use sengled_lib::{SengledClient, Subscribable};
//!
//! # async fn example(client: SengledClient) -> sengled_lib::Result<()> {
//! for bulb in client.discover_bulbs().await? {
//!     bulb.on_brightness_changed(|value| println!("brightness: {value}"));
//! }
//! # Ok(())
//! # }
//! ```

mod capabilities;
mod client;
pub mod command;
mod config;
pub mod device;
pub mod error;
pub mod protocol;
pub mod state;
pub mod subscription;
pub mod telemetry;
pub mod types;

pub use capabilities::{Capabilities, CapabilitiesBuilder};
pub use client::SengledClient;
pub use command::{BulbCommand, LightRequest};
pub use config::ClientConfig;
pub use device::{Bulb, BulbInfo, DeviceProperty, Switch, SwitchState, Transport};
pub use error::{DeviceError, Error, ParseError, ProtocolError, Result, ValueError};
pub use protocol::{CloudApi, Endpoints};
pub use state::{BulbState, StateChange};
pub use subscription::{CallbackRegistry, Subscribable, SubscriptionId};
pub use types::{Effect, PowerState, RgbColor};
