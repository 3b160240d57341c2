//! In-process publish/subscribe bus with dot-separated topics.
//!
//! ```text
//!  publish("LED.MyLED", Rate(1.5))
//!        │
//!        ├──▶ subscribers of "LED.MyLED"
//!        └──▶ subscribers of "LED"        (parent topics see sub-topics)
//! ```
//!
//! Delivery is synchronous, in the publisher's thread. Matching handlers are
//! snapshotted before any of them runs, so a handler may publish (or
//! subscribe) again without deadlocking the bus.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, PoisonError, RwLock};

use log::trace;

use crate::drivers::button::ButtonEvent;

/// Topic root for LED rate messages (`LED.<name>`, `LED.ALL`).
pub const TOPIC_LED_ROOT: &str = "LED";
/// Topic root for button state messages (`BUTTON.<name>`).
pub const TOPIC_BUTTON_ROOT: &str = "BUTTON";
/// Topic root for dial value messages (`Potentiometer.<name>`).
pub const TOPIC_POT_ROOT: &str = "Potentiometer";

/// Join a root and an instance name into a topic.
pub fn topic(root: &str, name: &str) -> String {
    format!("{root}.{name}")
}

/// `true` when a subscription to `subscribed` receives `published`.
pub fn topic_matches(subscribed: &str, published: &str) -> bool {
    published
        .strip_prefix(subscribed)
        .is_some_and(|rest| rest.is_empty() || rest.starts_with('.'))
}

#[derive(Debug, Clone, PartialEq)]
pub enum Message {
    Button { name: String, state: ButtonEvent },
    Pot { name: String, value: f32 },
    Rate(f32),
}

pub type Handler = Arc<dyn Fn(&str, &Message) + Send + Sync>;

/// Returned by [`Bus::subscribe`]; pass to [`Bus::unsubscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

struct Subscription {
    id: SubscriptionId,
    topic: String,
    handler: Handler,
}

#[derive(Default)]
pub struct Bus {
    subs: RwLock<Vec<Subscription>>,
    next_id: AtomicU64,
}

impl Bus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe<F>(&self, topic: impl Into<String>, handler: F) -> SubscriptionId
    where
        F: Fn(&str, &Message) + Send + Sync + 'static,
    {
        let id = SubscriptionId(self.next_id.fetch_add(1, Ordering::Relaxed));
        let topic = topic.into();
        trace!("bus: subscribe {:?} to {}", id, topic);
        self.subs
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .push(Subscription {
                id,
                topic,
                handler: Arc::new(handler),
            });
        id
    }

    /// Remove a subscription. Returns `false` if it was already gone.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let mut subs = self.subs.write().unwrap_or_else(PoisonError::into_inner);
        let before = subs.len();
        subs.retain(|s| s.id != id);
        subs.len() != before
    }

    /// Deliver `msg` to every handler subscribed to `topic` or one of its
    /// parents. Returns how many handlers ran.
    pub fn publish(&self, topic: &str, msg: &Message) -> usize {
        let handlers: Vec<Handler> = self
            .subs
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .filter(|s| topic_matches(&s.topic, topic))
            .map(|s| Arc::clone(&s.handler))
            .collect();

        trace!("bus: {} -> {} handler(s): {:?}", topic, handlers.len(), msg);
        for handler in &handlers {
            handler(topic, msg);
        }
        handlers.len()
    }

    /// Handlers that would receive a message published on `topic`.
    pub fn subscriber_count(&self, topic: &str) -> usize {
        self.subs
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .filter(|s| topic_matches(&s.topic, topic))
            .count()
    }
}
