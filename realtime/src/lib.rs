//! Realtime notification channel for the canteen client.
//!
//! This crate is runtime agnostic: [`Channel`] never owns a socket or a timer.
//! A driver opens the websocket, feeds inbound text frames to
//! [`Channel::handle_text`], writes whatever frames come back, and sleeps the
//! delays returned by [`Channel::handle_transport_closed`]. The browser client
//! and the terminal watcher each ship their own driver around the same core.
//!
//! [`NotificationFeed`] is the ordered log consumers build from channel events;
//! it has no dependency on the channel itself.

pub mod channel;
pub mod config;
pub mod error;
pub mod feed;
pub mod listeners;
pub mod policy;

pub use channel::{Channel, ChannelStats, ConnectionState, DegradedReason, Next};
pub use config::ChannelConfig;
pub use error::ChannelError;
pub use feed::{Notification, NotificationFeed, NotificationKind};
pub use listeners::{ChannelEvent, Listeners, Subscription, Topic};
pub use policy::ReconnectPolicy;
