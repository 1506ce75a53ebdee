//! In-process publish/subscribe channel.
//!
//! Delivery is synchronous and in registration order to all subscribers
//! current at publish time. The subscriber table is not held locked while
//! handlers run, so handlers may re-enter the bus (subscribe, unsubscribe,
//! or publish) without deadlocking.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, RwLock};

use tracing::trace;

use crate::events::Event;

/// Handle returned by [`EventBus::subscribe`], used to unsubscribe.
pub type SubscriberId = u64;

type Handler = Arc<dyn Fn(&Event) + Send + Sync>;

struct Entry {
    id: SubscriberId,
    once: bool,
    handler: Handler,
}

/// Topic-keyed subscriber registry with synchronous fan-out.
#[derive(Default)]
pub struct EventBus {
    subscribers: RwLock<HashMap<&'static str, Vec<Entry>>>,
    next_id: AtomicU64,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a handler for a topic. Handlers run synchronously on the
    /// publishing thread, in registration order.
    pub fn subscribe<F>(&self, topic: &'static str, handler: F) -> SubscriberId
    where
        F: Fn(&Event) + Send + Sync + 'static,
    {
        self.register(topic, false, Arc::new(handler))
    }

    /// Register a handler that is removed after its first delivery.
    pub fn subscribe_once<F>(&self, topic: &'static str, handler: F) -> SubscriberId
    where
        F: Fn(&Event) + Send + Sync + 'static,
    {
        self.register(topic, true, Arc::new(handler))
    }

    fn register(&self, topic: &'static str, once: bool, handler: Handler) -> SubscriberId {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let mut subscribers = self.subscribers.write().unwrap();
        subscribers.entry(topic).or_default().push(Entry { id, once, handler });
        trace!(topic, id, once, "subscriber registered");
        id
    }

    /// Remove one subscriber from a topic. Returns whether it was present.
    pub fn unsubscribe(&self, topic: &str, id: SubscriberId) -> bool {
        let mut subscribers = self.subscribers.write().unwrap();
        if let Some(entries) = subscribers.get_mut(topic) {
            let before = entries.len();
            entries.retain(|e| e.id != id);
            return entries.len() < before;
        }
        false
    }

    /// Publish an event to all current subscribers of its topic.
    ///
    /// One-shot subscribers are removed from the table before their handler
    /// runs, so a handler that re-publishes cannot fire them twice.
    pub fn publish(&self, event: Event) {
        let topic = event.topic();
        let batch: Vec<Handler> = {
            let mut subscribers = self.subscribers.write().unwrap();
            match subscribers.get_mut(topic) {
                Some(entries) => {
                    let batch = entries.iter().map(|e| e.handler.clone()).collect();
                    entries.retain(|e| !e.once);
                    batch
                }
                None => Vec::new(),
            }
        };

        trace!(topic, subscribers = batch.len(), "publishing event");
        for handler in batch {
            handler(&event);
        }
    }

    /// Number of live subscribers for a topic.
    pub fn subscriber_count(&self, topic: &str) -> usize {
        self.subscribers
            .read()
            .unwrap()
            .get(topic)
            .map(|e| e.len())
            .unwrap_or(0)
    }
}
