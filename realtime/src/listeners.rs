//! Handler registry with scoped subscription handles.
//!
//! DESIGN
//! ======
//! A UI component subscribes on mount and must unsubscribe on unmount, or a
//! remount delivers every event twice. Here the pairing is structural: `on`
//! returns a [`Subscription`] and dropping it removes the handler. Each topic
//! holds at most one handler, so a leaked handle shows up as
//! [`ChannelError::AlreadySubscribed`] instead of silent duplicate delivery.
//!
//! The registry lock is released before a handler runs, so handlers may drop
//! their own subscription or subscribe to other topics.

#[cfg(test)]
#[path = "listeners_test.rs"]
mod listeners_test;

use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};

use events::{EventKind, ServerEvent};

use crate::error::ChannelError;

/// Something a handler can subscribe to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Topic {
    /// Connected/disconnected transitions.
    Connection,
    /// One server-pushed event kind.
    Event(EventKind),
}

impl fmt::Display for Topic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Connection => f.write_str("connection"),
            Self::Event(kind) => write!(f, "{kind}"),
        }
    }
}

/// What handlers receive.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ChannelEvent {
    Connected,
    Disconnected,
    Server(ServerEvent),
}

impl ChannelEvent {
    #[must_use]
    pub fn topic(&self) -> Topic {
        match self {
            Self::Connected | Self::Disconnected => Topic::Connection,
            Self::Server(event) => Topic::Event(event.kind()),
        }
    }
}

type Handler = Arc<dyn Fn(&ChannelEvent) + Send + Sync>;

struct Slot {
    token: u64,
    handler: Handler,
}

#[derive(Default)]
struct Registry {
    next_token: u64,
    slots: HashMap<Topic, Slot>,
}

/// Shared handle to the handler registry. Clones refer to the same registry.
#[derive(Clone, Default)]
pub struct Listeners {
    inner: Arc<Mutex<Registry>>,
}

impl Listeners {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `handler` for `topic`.
    ///
    /// # Errors
    ///
    /// Returns [`ChannelError::AlreadySubscribed`] while another handle for the
    /// same topic is alive.
    pub fn on<F>(&self, topic: Topic, handler: F) -> Result<Subscription, ChannelError>
    where
        F: Fn(&ChannelEvent) + Send + Sync + 'static,
    {
        let mut registry = self.lock();
        if registry.slots.contains_key(&topic) {
            return Err(ChannelError::AlreadySubscribed(topic));
        }
        registry.next_token += 1;
        let token = registry.next_token;
        registry.slots.insert(topic, Slot { token, handler: Arc::new(handler) });
        tracing::debug!(%topic, "handler subscribed");
        Ok(Subscription { topic, token, registry: Arc::downgrade(&self.inner) })
    }

    #[must_use]
    pub fn is_subscribed(&self, topic: Topic) -> bool {
        self.lock().slots.contains_key(&topic)
    }

    /// Number of active handlers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.lock().slots.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drop every handler. Outstanding [`Subscription`]s become inert.
    pub fn clear(&self) {
        let removed = {
            let mut registry = self.lock();
            std::mem::take(&mut registry.slots)
        };
        if !removed.is_empty() {
            tracing::debug!(count = removed.len(), "handlers torn down");
        }
    }

    /// Deliver `event` to the handler for its topic. Returns whether one ran.
    pub fn dispatch(&self, event: &ChannelEvent) -> bool {
        let handler = self.lock().slots.get(&event.topic()).map(|slot| Arc::clone(&slot.handler));
        match handler {
            Some(handler) => {
                handler(event);
                true
            }
            None => false,
        }
    }

    fn lock(&self) -> MutexGuard<'_, Registry> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl fmt::Debug for Listeners {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let topics: Vec<Topic> = self.lock().slots.keys().copied().collect();
        f.debug_struct("Listeners").field("topics", &topics).finish()
    }
}

/// Keeps one handler registered. Dropping it unregisters the handler.
#[must_use = "dropping a Subscription immediately unregisters its handler"]
pub struct Subscription {
    topic: Topic,
    token: u64,
    registry: Weak<Mutex<Registry>>,
}

impl Subscription {
    #[must_use]
    pub fn topic(&self) -> Topic {
        self.topic
    }

    /// False once the handler was removed by [`Listeners::clear`] or the
    /// registry itself is gone.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.registry.upgrade().is_some_and(|inner| {
            inner
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .slots
                .get(&self.topic)
                .is_some_and(|slot| slot.token == self.token)
        })
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription").field("topic", &self.topic).field("token", &self.token).finish()
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        let Some(inner) = self.registry.upgrade() else {
            return;
        };
        let removed = {
            let mut registry = inner.lock().unwrap_or_else(PoisonError::into_inner);
            // A newer subscription may own the slot after a clear + resubscribe.
            if registry.slots.get(&self.topic).is_some_and(|slot| slot.token == self.token) {
                registry.slots.remove(&self.topic)
            } else {
                None
            }
        };
        if removed.is_some() {
            tracing::debug!(topic = %self.topic, "handler unsubscribed");
        }
    }
}
