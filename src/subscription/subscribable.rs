// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Subscribable trait for devices that report state changes.

use crate::state::StateChange;
use crate::subscription::SubscriptionId;
use crate::types::PowerState;

/// Trait for types that support state change subscriptions.
pub trait Subscribable {
    /// Subscribes to power state changes.
    fn on_power_changed<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn(PowerState) + Send + Sync + 'static;

    /// Subscribes to brightness changes.
    fn on_brightness_changed<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn(u8) + Send + Sync + 'static;

    /// Subscribes to Wi-Fi color changes. The callback receives the vendor
    /// `"R:G:B"` string.
    fn on_color_changed<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn(&str) + Send + Sync + 'static;

    /// Subscribes to color temperature changes.
    fn on_color_temp_changed<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn(u16) + Send + Sync + 'static;

    /// Subscribes to every state change.
    fn on_state_changed<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn(&StateChange) + Send + Sync + 'static;

    /// Unsubscribes a callback by its subscription ID.
    ///
    /// Returns `true` if the subscription was found and removed.
    fn unsubscribe(&self, id: SubscriptionId) -> bool;
}
