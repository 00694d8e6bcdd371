//! Notification feed container shared by the header menu and the badges.

#[cfg(test)]
#[path = "notifications_test.rs"]
mod notifications_test;

use realtime::{Notification, NotificationFeed, NotificationKind};

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct NotificationsState {
    pub feed: NotificationFeed,
}

impl NotificationsState {
    pub fn push(&mut self, notification: Notification) {
        self.feed.append(notification);
    }

    /// Empty the feed; returns how many entries were dropped.
    pub fn clear(&mut self) -> usize {
        self.feed.clear()
    }

    /// Value of the bell badge.
    #[must_use]
    pub fn badge_count(&self) -> usize {
        self.feed.len()
    }

    /// Session boundary: when a known identity is lost or replaced, the
    /// previous user's feed is dropped. Returns how many entries went.
    pub fn on_identity_change(&mut self, prev: Option<&str>, next: Option<&str>) -> usize {
        match prev {
            Some(prev) if next != Some(prev) => self.clear(),
            _ => 0,
        }
    }

    #[must_use]
    pub fn has_order_updates(&self) -> bool {
        self.feed.has_kind(NotificationKind::Order)
    }
}
