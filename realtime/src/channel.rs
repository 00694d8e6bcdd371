//! Sans-IO channel manager: connection state machine, reconnect accounting,
//! identity registration, and event dispatch.
//!
//! LIFECYCLE
//! =========
//! ```text
//! Idle/Closed --connect()--> Connecting --namespace ack--> Connected
//!     Connected/Connecting/Reconnecting --transport closed--> Reconnecting{n}  (n <= max)
//!                                                         --> Degraded        (budget spent)
//!     any --disconnect()--> Closed
//! ```
//! A successful namespace connect resets the attempt counter. `Degraded` is
//! sticky for the lifetime of the `Channel`.
//!
//! Delivery is at-most-once: nothing is replayed after a reconnect.

#[cfg(test)]
#[path = "channel_test.rs"]
mod channel_test;

use std::time::Duration;

use events::{ClientEvent, EnginePacket, ServerEvent, SocketPacket, decode_packet, encode_packet};

use crate::config::ChannelConfig;
use crate::error::ChannelError;
use crate::listeners::{ChannelEvent, Listeners, Subscription, Topic};

/// Connection lifecycle state.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ConnectionState {
    /// `connect` has not been called.
    #[default]
    Idle,
    /// Transport opening or namespace handshake in flight.
    Connecting,
    /// Namespace joined; events flow.
    Connected,
    /// Waiting to retry; `attempt` is 1-based.
    Reconnecting { attempt: u32 },
    /// Reconnect budget exhausted or the server refused the namespace.
    Degraded,
    /// Closed on request.
    Closed,
}

impl ConnectionState {
    #[must_use]
    pub fn is_connected(self) -> bool {
        self == Self::Connected
    }
}

/// Why a channel ended up [`ConnectionState::Degraded`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DegradedReason {
    /// Every reconnect attempt failed; `attempts` retries were made.
    RetriesExhausted { attempts: u32 },
    /// The server answered the namespace connect with an error.
    NamespaceRefused,
}

/// What the driver should do after a transport closes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Next {
    /// Sleep, then call [`Channel::retry`].
    Retry(Duration),
    /// Stop driving this channel.
    Stop,
}

/// Counters for diagnostics.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ChannelStats {
    /// Events handed to a handler.
    pub delivered: u64,
    /// Malformed frames or payloads that were dropped.
    pub rejected: u64,
    /// Well-formed frames with nothing to do (unknown events, other namespaces).
    pub ignored: u64,
    /// Reconnect attempts scheduled.
    pub reconnects: u64,
}

#[derive(Debug)]
pub struct Channel {
    config: ChannelConfig,
    url: String,
    state: ConnectionState,
    attempts: u32,
    identity: Option<String>,
    heartbeat: Option<Duration>,
    degraded: Option<DegradedReason>,
    listeners: Listeners,
    stats: ChannelStats,
}

impl Channel {
    /// # Errors
    ///
    /// Returns [`ChannelError::Codec`] when the configured origin is unusable.
    pub fn new(config: ChannelConfig) -> Result<Self, ChannelError> {
        let url = config.url()?;
        Ok(Self {
            config,
            url,
            state: ConnectionState::Idle,
            attempts: 0,
            identity: None,
            heartbeat: None,
            degraded: None,
            listeners: Listeners::new(),
            stats: ChannelStats::default(),
        })
    }

    #[must_use]
    pub fn config(&self) -> &ChannelConfig {
        &self.config
    }

    #[must_use]
    pub fn url(&self) -> &str {
        &self.url
    }

    #[must_use]
    pub fn state(&self) -> ConnectionState {
        self.state
    }

    #[must_use]
    pub fn stats(&self) -> ChannelStats {
        self.stats
    }

    /// Set once the channel is degraded.
    #[must_use]
    pub fn degraded_reason(&self) -> Option<DegradedReason> {
        self.degraded
    }

    #[must_use]
    pub fn identity(&self) -> Option<&str> {
        self.identity.as_deref()
    }

    /// Shared registry handle, for subscribing without borrowing the channel.
    #[must_use]
    pub fn listeners(&self) -> Listeners {
        self.listeners.clone()
    }

    /// Subscribe a handler to `topic`.
    ///
    /// # Errors
    ///
    /// Returns [`ChannelError::AlreadySubscribed`] when the topic is taken.
    pub fn on<F>(&self, topic: Topic, handler: F) -> Result<Subscription, ChannelError>
    where
        F: Fn(&ChannelEvent) + Send + Sync + 'static,
    {
        self.listeners.on(topic, handler)
    }

    /// Longest silence tolerated before the transport is considered dead.
    ///
    /// Known once the server handshake arrived.
    #[must_use]
    pub fn heartbeat_timeout(&self) -> Option<Duration> {
        self.heartbeat
    }

    /// Start connecting. Returns the URL to open, or `None` when a transport
    /// already exists or the channel is degraded.
    pub fn connect(&mut self) -> Option<String> {
        match self.state {
            ConnectionState::Idle | ConnectionState::Closed => {
                self.state = ConnectionState::Connecting;
                self.attempts = 0;
                tracing::info!(url = %self.url, namespace = %self.config.namespace, "channel connecting");
                Some(self.url.clone())
            }
            ConnectionState::Degraded => {
                tracing::warn!("channel degraded; a reload is required to reconnect");
                None
            }
            ConnectionState::Connecting | ConnectionState::Connected | ConnectionState::Reconnecting { .. } => None,
        }
    }

    /// Called by the driver after sleeping a [`Next::Retry`] delay. Returns the
    /// URL to reopen, or `None` when the channel was closed in the meantime.
    pub fn retry(&mut self) -> Option<String> {
        match self.state {
            ConnectionState::Reconnecting { attempt } => {
                tracing::info!(attempt, "channel reconnecting");
                Some(self.url.clone())
            }
            _ => None,
        }
    }

    /// Set or clear the user identity registered with the server.
    ///
    /// Returns the register frame when already connected; otherwise the
    /// identity is registered on the next successful connect.
    pub fn identify(&mut self, user: Option<String>) -> Vec<String> {
        let user = user.map(|u| u.trim().to_owned()).filter(|u| !u.is_empty());
        let changed = user != self.identity;
        self.identity = user;
        if changed && self.state.is_connected() {
            self.register_frames()
        } else {
            Vec::new()
        }
    }

    /// Decode one inbound text frame and return the frames to send back.
    ///
    /// Malformed input is counted and dropped; it never reaches a handler and
    /// never closes the channel.
    pub fn handle_text(&mut self, text: &str) -> Vec<String> {
        let packet = match decode_packet(text) {
            Ok(packet) => packet,
            Err(err) => {
                self.stats.rejected += 1;
                tracing::warn!(error = %err, "dropping malformed frame");
                return Vec::new();
            }
        };

        match packet {
            EnginePacket::Open(handshake) => {
                self.heartbeat =
                    Some(Duration::from_millis(handshake.ping_interval.saturating_add(handshake.ping_timeout)));
                tracing::debug!(sid = %handshake.sid, "transport handshake");
                vec![message_frame(SocketPacket::Connect { nsp: self.config.namespace.clone(), data: None })]
            }
            EnginePacket::Ping(payload) => vec![encode_packet(&EnginePacket::Pong(payload))],
            EnginePacket::Pong(_) | EnginePacket::Upgrade | EnginePacket::Noop => Vec::new(),
            EnginePacket::Close => {
                tracing::debug!("server is closing the transport");
                Vec::new()
            }
            EnginePacket::Message(inner) => self.handle_socket_packet(inner),
        }
    }

    /// Account for a closed (or never opened) transport.
    pub fn handle_transport_closed(&mut self) -> Next {
        let was_connected = self.state.is_connected();
        self.heartbeat = None;
        if was_connected {
            self.listeners.dispatch(&ChannelEvent::Disconnected);
        }

        match self.state {
            ConnectionState::Idle | ConnectionState::Closed | ConnectionState::Degraded => Next::Stop,
            ConnectionState::Connecting | ConnectionState::Connected | ConnectionState::Reconnecting { .. } => {
                self.attempts += 1;
                if let Some(delay) = self.config.reconnect.delay_for(self.attempts) {
                    self.state = ConnectionState::Reconnecting { attempt: self.attempts };
                    self.stats.reconnects += 1;
                    tracing::info!(
                        attempt = self.attempts,
                        max_attempts = self.config.reconnect.max_attempts,
                        delay_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX),
                        "transport closed; scheduling reconnect"
                    );
                    Next::Retry(delay)
                } else {
                    let attempts = self.attempts - 1;
                    self.state = ConnectionState::Degraded;
                    self.degraded = Some(DegradedReason::RetriesExhausted { attempts });
                    tracing::warn!(attempts, "reconnect budget exhausted; channel degraded");
                    Next::Stop
                }
            }
        }
    }

    /// Leave the namespace, close the transport, and tear down every handler.
    /// Safe to call repeatedly.
    pub fn disconnect(&mut self) -> Vec<String> {
        let mut out = Vec::new();
        if self.state.is_connected() {
            self.listeners.dispatch(&ChannelEvent::Disconnected);
            out.push(message_frame(SocketPacket::Disconnect { nsp: self.config.namespace.clone() }));
        }
        if matches!(self.state, ConnectionState::Connecting | ConnectionState::Connected) {
            out.push(encode_packet(&EnginePacket::Close));
        }
        self.listeners.clear();
        self.heartbeat = None;
        self.attempts = 0;
        if self.state != ConnectionState::Degraded {
            if self.state != ConnectionState::Closed {
                tracing::info!("channel closed");
            }
            self.state = ConnectionState::Closed;
        }
        out
    }

    fn handle_socket_packet(&mut self, packet: SocketPacket) -> Vec<String> {
        if packet.nsp() != self.config.namespace {
            self.stats.ignored += 1;
            tracing::debug!(nsp = packet.nsp(), "ignoring packet for another namespace");
            return Vec::new();
        }

        match packet {
            SocketPacket::Connect { .. } => self.on_namespace_connected(),
            SocketPacket::ConnectError { data, .. } => {
                tracing::warn!(%data, "server refused namespace; channel degraded");
                self.state = ConnectionState::Degraded;
                self.degraded = Some(DegradedReason::NamespaceRefused);
                vec![encode_packet(&EnginePacket::Close)]
            }
            SocketPacket::Disconnect { .. } => {
                let was_connected = self.state.is_connected();
                self.state = ConnectionState::Closed;
                tracing::info!("server closed the namespace");
                if was_connected {
                    self.listeners.dispatch(&ChannelEvent::Disconnected);
                }
                vec![encode_packet(&EnginePacket::Close)]
            }
            SocketPacket::Event { name, args, .. } => {
                self.handle_event(&name, &args);
                Vec::new()
            }
            SocketPacket::Ack { id, .. } => {
                self.stats.ignored += 1;
                tracing::debug!(id, "ignoring unsolicited ack");
                Vec::new()
            }
        }
    }

    fn on_namespace_connected(&mut self) -> Vec<String> {
        if self.state.is_connected() {
            return Vec::new();
        }
        let recovered = self.attempts > 0;
        self.state = ConnectionState::Connected;
        self.attempts = 0;
        tracing::info!(namespace = %self.config.namespace, recovered, "channel connected");
        self.listeners.dispatch(&ChannelEvent::Connected);
        self.register_frames()
    }

    fn handle_event(&mut self, name: &str, args: &[serde_json::Value]) {
        match ServerEvent::decode(&self.config.events, name, args) {
            Ok(Some(event)) => {
                let kind = event.kind();
                if self.listeners.dispatch(&ChannelEvent::Server(event)) {
                    self.stats.delivered += 1;
                } else {
                    tracing::debug!(%kind, "no handler subscribed; event dropped");
                }
            }
            Ok(None) => {
                self.stats.ignored += 1;
                tracing::debug!(event = name, "ignoring unknown event");
            }
            Err(err) => {
                self.stats.rejected += 1;
                tracing::warn!(event = name, error = %err, "dropping malformed payload");
            }
        }
    }

    fn register_frames(&self) -> Vec<String> {
        let Some(user) = self.identity.clone() else {
            return Vec::new();
        };
        tracing::debug!(event = %self.config.events.register, "registering user");
        let packet = ClientEvent::Register(user).to_packet(&self.config.events, &self.config.namespace);
        vec![message_frame(packet)]
    }
}

fn message_frame(packet: SocketPacket) -> String {
    encode_packet(&EnginePacket::Message(packet))
}
