//! In-memory notification feed.
//!
//! The feed is an append-only log between clears. It neither de-duplicates nor
//! caps its size; the badge counter is simply its length.

#[cfg(test)]
#[path = "feed_test.rs"]
mod feed_test;

use events::{EventKind, ServerEvent};
use serde::{Deserialize, Serialize};

/// Which kind of event produced a notification.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum NotificationKind {
    Menu,
    Order,
    KitchenStatus,
}

impl From<EventKind> for NotificationKind {
    fn from(kind: EventKind) -> Self {
        match kind {
            EventKind::Menu => Self::Menu,
            EventKind::Order => Self::Order,
            EventKind::KitchenStatus => Self::KitchenStatus,
        }
    }
}

/// One feed entry.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    #[serde(rename = "type")]
    pub kind: NotificationKind,
    /// Display text.
    #[serde(rename = "data")]
    pub text: String,
    /// Milliseconds since the Unix epoch when the event arrived.
    #[serde(rename = "date")]
    pub ts: i64,
}

impl Notification {
    #[must_use]
    pub fn new(kind: NotificationKind, text: impl Into<String>, ts: i64) -> Self {
        Self { kind, text: text.into(), ts }
    }

    /// Feed entry for a validated server event received at `ts`.
    #[must_use]
    pub fn from_event(event: &ServerEvent, ts: i64) -> Self {
        let text = match event {
            ServerEvent::Menu(notice) => notice.message.clone(),
            ServerEvent::Order(notice) => notice.message.clone(),
            ServerEvent::KitchenStatus(online) => kitchen_status_text(*online),
        };
        Self::new(event.kind().into(), text, ts)
    }
}

#[must_use]
pub fn kitchen_status_text(online: bool) -> String {
    format!("Kitchen: {}", if online { "online" } else { "offline" })
}

/// Ordered log of notifications since the last clear.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct NotificationFeed {
    items: Vec<Notification>,
}

impl NotificationFeed {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append(&mut self, notification: Notification) {
        self.items.push(notification);
    }

    /// Empty the feed, returning how many entries were dropped.
    pub fn clear(&mut self) -> usize {
        let cleared = self.items.len();
        self.items.clear();
        cleared
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Notification> {
        self.items.iter()
    }

    #[must_use]
    pub fn has_kind(&self, kind: NotificationKind) -> bool {
        self.items.iter().any(|n| n.kind == kind)
    }

    #[must_use]
    pub fn count_of(&self, kind: NotificationKind) -> usize {
        self.items.iter().filter(|n| n.kind == kind).count()
    }
}
