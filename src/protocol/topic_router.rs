// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! MQTT topic routing for status push handlers.
//!
//! ```text
//! MQTT Message: wifielement/B0CE18.../status → [{"dn":..,"type":..}]
//!                     ↓
//!             TopicRouter.route()
//!                     ↓
//!        Lookup exact topic in handlers
//!                     ↓
//!            handler(payload bytes)
//!                     ↓
//!        Bulb state updated, callbacks fired
//! ```

use std::collections::HashMap;

use parking_lot::RwLock;

use crate::protocol::MessageHandler;

/// Routes incoming MQTT messages to the handler registered for their topic.
///
/// One handler per topic. Registering a topic again replaces its handler.
#[derive(Default)]
pub struct TopicRouter {
    handlers: RwLock<HashMap<String, MessageHandler>>,
}

impl TopicRouter {
    /// Creates a new empty topic router.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `handler` for `topic`.
    pub fn register(&self, topic: impl Into<String>, handler: MessageHandler) {
        let topic = topic.into();
        tracing::debug!(topic = %topic, "Registering topic handler");
        self.handlers.write().insert(topic, handler);
    }

    /// Removes the handler for `topic`.
    ///
    /// Returns `true` if a handler was registered.
    pub fn unregister(&self, topic: &str) -> bool {
        tracing::debug!(topic = %topic, "Unregistering topic handler");
        self.handlers.write().remove(topic).is_some()
    }

    /// Passes `payload` to the handler for `topic`.
    ///
    /// The handler runs after the router lock is released, so it may
    /// register or remove topics itself. Returns `true` if a handler ran.
    pub fn route(&self, topic: &str, payload: &[u8]) -> bool {
        let handler = self.handlers.read().get(topic).cloned();

        let Some(handler) = handler else {
            tracing::trace!(topic = %topic, "No handler for topic");
            return false;
        };

        handler(payload);
        true
    }

    /// Returns every registered topic, for resubscription after a reconnect.
    #[must_use]
    pub fn topics(&self) -> Vec<String> {
        self.handlers.read().keys().cloned().collect()
    }

    /// Returns the number of registered topics.
    #[must_use]
    pub fn len(&self) -> usize {
        self.handlers.read().len()
    }

    /// Returns `true` if no topic is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.handlers.read().is_empty()
    }
}

impl std::fmt::Debug for TopicRouter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TopicRouter")
            .field("topics", &self.topics())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn counting_handler(counter: &Arc<AtomicUsize>) -> MessageHandler {
        let counter = Arc::clone(counter);
        Arc::new(move |_payload: &[u8]| {
            counter.fetch_add(1, Ordering::SeqCst);
        })
    }

    #[test]
    fn routes_exact_topic_only() {
        let router = TopicRouter::new();
        let counter = Arc::new(AtomicUsize::new(0));
        router.register("wifielement/AA/status", counting_handler(&counter));

        assert!(router.route("wifielement/AA/status", b"[]"));
        assert!(!router.route("wifielement/BB/status", b"[]"));
        assert!(!router.route("wifielement/AA/update", b"[]"));
        assert_eq!(counter.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn handler_receives_payload() {
        let router = TopicRouter::new();
        let seen = Arc::new(RwLock::new(Vec::new()));
        let sink = Arc::clone(&seen);
        router.register(
            "t",
            Arc::new(move |payload: &[u8]| sink.write().extend_from_slice(payload)),
        );

        router.route("t", b"hello");
        assert_eq!(seen.read().as_slice(), b"hello");
    }

    #[test]
    fn register_replaces_previous_handler() {
        let router = TopicRouter::new();
        let first = Arc::new(AtomicUsize::new(0));
        let second = Arc::new(AtomicUsize::new(0));
        router.register("t", counting_handler(&first));
        router.register("t", counting_handler(&second));

        router.route("t", b"");
        assert_eq!(first.load(Ordering::SeqCst), 0);
        assert_eq!(second.load(Ordering::SeqCst), 1);
        assert_eq!(router.len(), 1);
    }

    #[test]
    fn unregister_and_topics() {
        let router = TopicRouter::new();
        let counter = Arc::new(AtomicUsize::new(0));
        router.register("a", counting_handler(&counter));
        router.register("b", counting_handler(&counter));

        let mut topics = router.topics();
        topics.sort();
        assert_eq!(topics, vec!["a".to_string(), "b".to_string()]);

        assert!(router.unregister("a"));
        assert!(!router.unregister("a"));
        assert_eq!(router.topics(), vec!["b".to_string()]);
    }

    #[test]
    fn handler_may_register_during_route() {
        let router = Arc::new(TopicRouter::new());
        let inner = Arc::clone(&router);
        router.register(
            "a",
            Arc::new(move |_: &[u8]| inner.register("b", Arc::new(|_: &[u8]| {}))),
        );

        assert!(router.route("a", b""));
        assert_eq!(router.len(), 2);
    }
}
