// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Callback management for bulb state subscriptions.

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use parking_lot::RwLock;

use crate::state::StateChange;
use crate::types::PowerState;

/// Unique identifier for a subscription.
///
/// IDs are unique within a bulb's lifetime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

impl SubscriptionId {
    #[must_use]
    pub(crate) fn new(id: u64) -> Self {
        Self(id)
    }

    /// Returns the raw ID value.
    #[must_use]
    pub fn value(&self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for SubscriptionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Sub({})", self.0)
    }
}

type PowerCallback = Arc<dyn Fn(PowerState) + Send + Sync>;
type BrightnessCallback = Arc<dyn Fn(u8) + Send + Sync>;
type ColorCallback = Arc<dyn Fn(&str) + Send + Sync>;
type ColorTempCallback = Arc<dyn Fn(u16) + Send + Sync>;
type StateChangedCallback = Arc<dyn Fn(&StateChange) + Send + Sync>;

/// Registry for managing bulb subscription callbacks.
///
/// Thread-safe through `parking_lot::RwLock`. Callbacks are `Arc`ed so a
/// dispatch can snapshot them and call them without holding any lock.
pub struct CallbackRegistry {
    next_id: AtomicU64,
    power_callbacks: RwLock<HashMap<SubscriptionId, PowerCallback>>,
    brightness_callbacks: RwLock<HashMap<SubscriptionId, BrightnessCallback>>,
    color_callbacks: RwLock<HashMap<SubscriptionId, ColorCallback>>,
    color_temp_callbacks: RwLock<HashMap<SubscriptionId, ColorTempCallback>>,
    state_changed_callbacks: RwLock<HashMap<SubscriptionId, StateChangedCallback>>,
}

impl CallbackRegistry {
    /// Creates a new empty callback registry.
    #[must_use]
    pub fn new() -> Self {
        Self {
            next_id: AtomicU64::new(1),
            power_callbacks: RwLock::new(HashMap::new()),
            brightness_callbacks: RwLock::new(HashMap::new()),
            color_callbacks: RwLock::new(HashMap::new()),
            color_temp_callbacks: RwLock::new(HashMap::new()),
            state_changed_callbacks: RwLock::new(HashMap::new()),
        }
    }

    fn next_id(&self) -> SubscriptionId {
        SubscriptionId::new(self.next_id.fetch_add(1, Ordering::Relaxed))
    }

    /// Registers a callback for power state changes.
    pub fn on_power_changed<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn(PowerState) + Send + Sync + 'static,
    {
        let id = self.next_id();
        self.power_callbacks.write().insert(id, Arc::new(callback));
        id
    }

    /// Registers a callback for brightness changes.
    pub fn on_brightness_changed<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn(u8) + Send + Sync + 'static,
    {
        let id = self.next_id();
        self.brightness_callbacks.write().insert(id, Arc::new(callback));
        id
    }

    /// Registers a callback for Wi-Fi color changes (vendor `"R:G:B"`).
    pub fn on_color_changed<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn(&str) + Send + Sync + 'static,
    {
        let id = self.next_id();
        self.color_callbacks.write().insert(id, Arc::new(callback));
        id
    }

    /// Registers a callback for color temperature changes.
    pub fn on_color_temp_changed<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn(u16) + Send + Sync + 'static,
    {
        let id = self.next_id();
        self.color_temp_callbacks
            .write()
            .insert(id, Arc::new(callback));
        id
    }

    /// Registers a callback for every state change.
    pub fn on_state_changed<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn(&StateChange) + Send + Sync + 'static,
    {
        let id = self.next_id();
        self.state_changed_callbacks
            .write()
            .insert(id, Arc::new(callback));
        id
    }

    /// Unregisters a callback by its subscription ID.
    ///
    /// Returns `true` if a callback was found and removed.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        self.power_callbacks.write().remove(&id).is_some()
            || self.brightness_callbacks.write().remove(&id).is_some()
            || self.color_callbacks.write().remove(&id).is_some()
            || self.color_temp_callbacks.write().remove(&id).is_some()
            || self.state_changed_callbacks.write().remove(&id).is_some()
    }

    /// Clears all callbacks.
    pub fn clear(&self) {
        self.power_callbacks.write().clear();
        self.brightness_callbacks.write().clear();
        self.color_callbacks.write().clear();
        self.color_temp_callbacks.write().clear();
        self.state_changed_callbacks.write().clear();
    }

    /// Dispatches a state change to the matching callbacks.
    ///
    /// Generic callbacks run first, then the field-specific ones.
    pub fn dispatch(&self, change: &StateChange) {
        for callback in snapshot(&self.state_changed_callbacks) {
            callback(change);
        }

        match change {
            StateChange::Power(state) => {
                for callback in snapshot(&self.power_callbacks) {
                    callback(*state);
                }
            }
            StateChange::Brightness(brightness) => {
                for callback in snapshot(&self.brightness_callbacks) {
                    callback(*brightness);
                }
            }
            StateChange::Color(color) => {
                for callback in snapshot(&self.color_callbacks) {
                    callback(color);
                }
            }
            StateChange::ColorTemperature(ct) => {
                for callback in snapshot(&self.color_temp_callbacks) {
                    callback(*ct);
                }
            }
            // Only reach generic subscribers
            _ => {}
        }
    }

    /// Returns the total number of registered callbacks.
    #[must_use]
    pub fn len(&self) -> usize {
        self.power_callbacks.read().len()
            + self.brightness_callbacks.read().len()
            + self.color_callbacks.read().len()
            + self.color_temp_callbacks.read().len()
            + self.state_changed_callbacks.read().len()
    }

    /// Returns `true` if no callback is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for CallbackRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for CallbackRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CallbackRegistry")
            .field("callbacks", &self.len())
            .finish_non_exhaustive()
    }
}

fn snapshot<T: Clone>(map: &RwLock<HashMap<SubscriptionId, T>>) -> Vec<T> {
    map.read().values().cloned().collect()
}
