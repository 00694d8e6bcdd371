//! Browser driver for the realtime channel.
//!
//! The channel core in `realtime` is sans-IO; this module owns the websocket
//! (via `gloo-net`), the reconnect sleep and the heartbeat deadline (via
//! `gloo-timers`), and pumps frames between them. The UI talks to the running
//! driver through a [`ChannelHandle`] provided in context.
//!
//! All websocket logic is gated behind `#[cfg(feature = "csr")]` since it
//! requires a browser environment.
//!
//! ERROR HANDLING
//! ==============
//! Transport failures are logged and handed to the channel's reconnect
//! accounting; once it gives up the driver stops and the connection signal
//! shows `Degraded` until reload.

#[cfg(test)]
#[path = "channel_client_test.rs"]
mod channel_client_test;

use events::{EventKind, ServerEvent};
use leptos::prelude::*;
use realtime::{ChannelError, ChannelEvent, Listeners, Notification, Subscription, Topic};

use crate::state::kitchen::KitchenState;
use crate::state::notifications::NotificationsState;
use crate::util::{audio, clock};

/// Silence tolerated before the server handshake tells us its heartbeat.
#[cfg(feature = "csr")]
const HANDSHAKE_TIMEOUT: std::time::Duration = std::time::Duration::from_secs(20);

/// Requests from the UI to the running driver.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ChannelCommand {
    /// Register (or clear) the signed-in user.
    Identify(Option<String>),
    /// Leave the namespace and stop the driver.
    Disconnect,
}

/// Context handle for the running channel.
#[derive(Clone, Debug)]
pub struct ChannelHandle {
    listeners: Listeners,
    #[cfg(feature = "csr")]
    commands: futures::channel::mpsc::UnboundedSender<ChannelCommand>,
}

impl ChannelHandle {
    /// A handle with no driver behind it; commands are dropped.
    #[must_use]
    pub fn detached(listeners: Listeners) -> Self {
        Self {
            listeners,
            #[cfg(feature = "csr")]
            commands: futures::channel::mpsc::unbounded().0,
        }
    }

    /// # Errors
    ///
    /// Returns [`ChannelError::AlreadySubscribed`] when the topic is taken.
    pub fn on<F>(&self, topic: Topic, handler: F) -> Result<Subscription, ChannelError>
    where
        F: Fn(&ChannelEvent) + Send + Sync + 'static,
    {
        self.listeners.on(topic, handler)
    }

    #[must_use]
    pub fn listeners(&self) -> &Listeners {
        &self.listeners
    }

    /// Queue a command for the driver. Returns `false` once the driver is gone.
    pub fn send(&self, command: ChannelCommand) -> bool {
        #[cfg(feature = "csr")]
        {
            self.commands.unbounded_send(command).is_ok()
        }
        #[cfg(not(feature = "csr"))]
        {
            let _ = command;
            false
        }
    }

    pub fn identify(&self, user: Option<String>) -> bool {
        self.send(ChannelCommand::Identify(user))
    }

    pub fn disconnect(&self) -> bool {
        self.send(ChannelCommand::Disconnect)
    }
}

/// Feed entry produced by a channel event, if any.
#[must_use]
pub fn notification_for(event: &ChannelEvent, ts: i64) -> Option<Notification> {
    match event {
        ChannelEvent::Server(server) => Some(Notification::from_event(server, ts)),
        ChannelEvent::Connected | ChannelEvent::Disconnected => None,
    }
}

/// Online flag carried by a kitchen status push.
#[must_use]
pub fn kitchen_status_of(event: &ChannelEvent) -> Option<bool> {
    match event {
        ChannelEvent::Server(ServerEvent::KitchenStatus(online)) => Some(*online),
        _ => None,
    }
}

/// Subscribe the feed, the kitchen flag, and the audio cue to every server
/// event topic. Dropping the returned handles unsubscribes.
///
/// # Errors
///
/// Returns [`ChannelError::AlreadySubscribed`] when another component already
/// owns one of the topics; subscriptions taken so far are released.
pub fn subscribe_feed(
    handle: &ChannelHandle,
    notifications: RwSignal<NotificationsState>,
    kitchen: RwSignal<KitchenState>,
) -> Result<Vec<Subscription>, ChannelError> {
    let on_event = move |event: &ChannelEvent| {
        if let Some(online) = kitchen_status_of(event) {
            kitchen.update(|k| k.apply_status(online));
        }
        if let Some(notification) = notification_for(event, clock::now_ms()) {
            notifications.update(|n| n.push(notification));
            audio::play_notification_sound();
        }
    };
    EventKind::ALL
        .iter()
        .map(|kind| handle.on(Topic::Event(*kind), on_event))
        .collect()
}

/// Start the driver as a local async task and return its handle.
///
/// # Errors
///
/// Returns [`ChannelError::Codec`] when the configured origin is unusable.
#[cfg(feature = "csr")]
pub fn spawn_channel_client(
    config: realtime::ChannelConfig,
    user: Option<String>,
    state: RwSignal<realtime::ConnectionState>,
) -> Result<ChannelHandle, ChannelError> {
    let mut channel = realtime::Channel::new(config)?;
    channel.identify(user);
    let (tx, rx) = futures::channel::mpsc::unbounded();
    let handle = ChannelHandle { listeners: channel.listeners(), commands: tx };
    leptos::task::spawn_local(channel_loop(channel, rx, state));
    Ok(handle)
}

#[cfg(feature = "csr")]
fn publish(channel: &realtime::Channel, state: RwSignal<realtime::ConnectionState>) {
    let current = channel.state();
    if state.get_untracked() != current {
        state.set(current);
    }
}

/// Main connection loop: open, run, account for the close, sleep, repeat.
#[cfg(feature = "csr")]
async fn channel_loop(
    mut channel: realtime::Channel,
    mut commands: futures::channel::mpsc::UnboundedReceiver<ChannelCommand>,
    state: RwSignal<realtime::ConnectionState>,
) {
    use gloo_net::websocket::futures::WebSocket;
    use realtime::Next;

    let Some(mut url) = channel.connect() else {
        publish(&channel, state);
        return;
    };
    publish(&channel, state);

    loop {
        match WebSocket::open(&url) {
            Ok(ws) => run_session(&mut channel, ws, &mut commands, state).await,
            Err(e) => leptos::logging::warn!("channel open failed: {e}"),
        }

        match channel.handle_transport_closed() {
            Next::Retry(delay) => {
                publish(&channel, state);
                wait_for_retry(&mut channel, delay, &mut commands).await;
            }
            Next::Stop => break,
        }

        match channel.retry() {
            Some(next) => url = next,
            None => break,
        }
        publish(&channel, state);
    }

    publish(&channel, state);
    let stats = channel.stats();
    leptos::logging::log!(
        "channel driver stopped: {:?} (delivered {}, rejected {}, reconnects {})",
        channel.state(),
        stats.delivered,
        stats.rejected,
        stats.reconnects
    );
}

#[cfg(feature = "csr")]
enum Step {
    Send(Vec<String>),
    Close(Vec<String>),
    Lost,
}

/// Pump one websocket session until it closes, goes silent, or the UI asks
/// to disconnect.
#[cfg(feature = "csr")]
async fn run_session(
    channel: &mut realtime::Channel,
    ws: gloo_net::websocket::futures::WebSocket,
    commands: &mut futures::channel::mpsc::UnboundedReceiver<ChannelCommand>,
    state: RwSignal<realtime::ConnectionState>,
) {
    use futures::{FutureExt, SinkExt, StreamExt};
    use gloo_net::websocket::Message;

    let (mut ws_write, mut ws_read) = ws.split();
    let mut commands_open = true;

    loop {
        let deadline = channel.heartbeat_timeout().unwrap_or(HANDSHAKE_TIMEOUT);
        let silence = gloo_timers::future::sleep(deadline).fuse();
        futures::pin_mut!(silence);
        let mut inbound = ws_read.next().fuse();
        let mut command = if commands_open {
            commands.next().left_future()
        } else {
            futures::future::pending().right_future()
        }
        .fuse();

        let step = futures::select! {
            msg = inbound => match msg {
                Some(Ok(Message::Text(text))) => Step::Send(channel.handle_text(&text)),
                Some(Ok(Message::Bytes(_))) => Step::Send(Vec::new()),
                Some(Err(e)) => {
                    leptos::logging::warn!("channel transport error: {e}");
                    Step::Lost
                }
                None => Step::Lost,
            },
            cmd = command => match cmd {
                Some(ChannelCommand::Identify(user)) => Step::Send(channel.identify(user)),
                Some(ChannelCommand::Disconnect) => Step::Close(channel.disconnect()),
                None => {
                    commands_open = false;
                    Step::Send(Vec::new())
                }
            },
            () = silence => {
                leptos::logging::warn!("channel heartbeat missed after {deadline:?}; dropping transport");
                Step::Lost
            },
        };
        publish(channel, state);

        match step {
            Step::Send(frames) => {
                for frame in frames {
                    if ws_write.send(Message::Text(frame)).await.is_err() {
                        return;
                    }
                }
            }
            Step::Close(frames) => {
                for frame in frames {
                    if ws_write.send(Message::Text(frame)).await.is_err() {
                        break;
                    }
                }
                let _ = ws_write.close().await;
                return;
            }
            Step::Lost => return,
        }
    }
}

/// Sleep out a reconnect delay while still honoring UI commands.
#[cfg(feature = "csr")]
async fn wait_for_retry(
    channel: &mut realtime::Channel,
    delay: std::time::Duration,
    commands: &mut futures::channel::mpsc::UnboundedReceiver<ChannelCommand>,
) {
    use futures::{FutureExt, StreamExt};

    let sleep = gloo_timers::future::sleep(delay).fuse();
    futures::pin_mut!(sleep);
    loop {
        futures::select! {
            () = sleep => return,
            cmd = commands.next().fuse() => match cmd {
                Some(ChannelCommand::Identify(user)) => {
                    channel.identify(user);
                }
                Some(ChannelCommand::Disconnect) => {
                    channel.disconnect();
                    return;
                }
                None => {
                    sleep.await;
                    return;
                }
            },
        }
    }
}
