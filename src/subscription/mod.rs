// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Subscription system for bulb state changes.
//!
//! Callbacks fire whenever a bulb's tracked state actually changes, whether
//! the change came from a local command, a pull refresh or an MQTT push.
//!
//! - [`SubscriptionId`] - Identifier returned on subscribe, used to unsubscribe
//! - [`CallbackRegistry`] - Stores callbacks and dispatches changes
//! - [`Subscribable`] - Trait implemented by bulbs
//!
//! ```no_run
//! use sengled_lib::{ClientConfig, SengledClient};
//! use sengled_lib::subscription::Subscribable;
//!
//! # async fn example() -> sengled_lib::Result<()> {
//! let client = SengledClient::connect(ClientConfig::new("me@example.com", "secret")).await?;
//! for bulb in client.discover_bulbs().await? {
//!     bulb.on_power_changed(|state| println!("power is now {state}"));
//! }
//! # Ok(())
//! # }
//! ```

mod callback;
mod subscribable;

pub use callback::{CallbackRegistry, SubscriptionId};
pub use subscribable::Subscribable;
