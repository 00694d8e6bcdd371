//! Tokio driver for the realtime channel.
//!
//! Opens websockets with `tokio-tungstenite`, feeds inbound text frames to the
//! sans-IO [`Channel`], writes back what it returns, and sleeps the reconnect
//! delays it asks for. A session ends when the server closes, the transport
//! errors, the heartbeat deadline passes, or a [`Control::Disconnect`] arrives.

#[cfg(test)]
#[path = "driver_test.rs"]
mod driver_test;

use std::time::Duration;

use futures_util::{SinkExt, StreamExt};
use realtime::{Channel, ConnectionState, Next};
use tokio::net::TcpStream;
use tokio::sync::mpsc::UnboundedReceiver;
use tokio_tungstenite::tungstenite::{self, Message};
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, connect_async};

/// Silence tolerated before the server handshake tells us its heartbeat.
const HANDSHAKE_TIMEOUT: Duration = Duration::from_secs(20);

/// Requests from the rest of the process to the running driver.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Control {
    /// Register (or clear) the user identity.
    Identify(Option<String>),
    /// Leave the namespace and stop.
    Disconnect,
}

enum Step {
    Send(Vec<String>),
    Close(Vec<String>),
}

/// Drive `channel` until it is closed or degraded; returns the final state.
pub async fn run(channel: &mut Channel, control: &mut UnboundedReceiver<Control>) -> ConnectionState {
    let Some(mut url) = channel.connect() else {
        return channel.state();
    };

    loop {
        match connect_async(url.as_str()).await {
            Ok((stream, _)) => {
                tracing::debug!(%url, "transport open");
                if let Err(err) = run_session(channel, stream, control).await {
                    tracing::warn!(error = %err, "transport error");
                }
            }
            Err(err) => tracing::warn!(%url, error = %err, "transport open failed"),
        }

        match channel.handle_transport_closed() {
            Next::Retry(delay) => wait_for_retry(channel, delay, control).await,
            Next::Stop => break,
        }

        match channel.retry() {
            Some(next) => url = next,
            None => break,
        }
    }

    channel.state()
}

async fn run_session(
    channel: &mut Channel,
    stream: WebSocketStream<MaybeTlsStream<TcpStream>>,
    control: &mut UnboundedReceiver<Control>,
) -> Result<(), tungstenite::Error> {
    let (mut write, mut read) = stream.split();
    let mut control_open = true;

    loop {
        let silence = channel.heartbeat_timeout().unwrap_or(HANDSHAKE_TIMEOUT);
        let step = tokio::select! {
            msg = tokio::time::timeout(silence, read.next()) => match msg {
                Err(_) => {
                    let silence_ms = u64::try_from(silence.as_millis()).unwrap_or(u64::MAX);
                    tracing::warn!(silence_ms, "heartbeat missed; dropping transport");
                    return Ok(());
                }
                Ok(None | Some(Ok(Message::Close(_)))) => return Ok(()),
                Ok(Some(Err(err))) => return Err(err),
                Ok(Some(Ok(Message::Text(text)))) => Step::Send(channel.handle_text(text.as_str())),
                Ok(Some(Ok(_))) => Step::Send(Vec::new()),
            },
            cmd = control.recv(), if control_open => match cmd {
                Some(Control::Identify(user)) => Step::Send(channel.identify(user)),
                Some(Control::Disconnect) => Step::Close(channel.disconnect()),
                None => {
                    control_open = false;
                    Step::Send(Vec::new())
                }
            },
        };

        match step {
            Step::Send(frames) => {
                for frame in frames {
                    write.send(Message::text(frame)).await?;
                }
            }
            Step::Close(frames) => {
                for frame in frames {
                    write.send(Message::text(frame)).await?;
                }
                write.close().await?;
                return Ok(());
            }
        }
    }
}

/// Sleep out a reconnect delay while still honoring control messages.
async fn wait_for_retry(channel: &mut Channel, delay: Duration, control: &mut UnboundedReceiver<Control>) {
    let sleep = tokio::time::sleep(delay);
    tokio::pin!(sleep);
    loop {
        tokio::select! {
            () = &mut sleep => return,
            cmd = control.recv() => match cmd {
                Some(Control::Identify(user)) => {
                    channel.identify(user);
                }
                Some(Control::Disconnect) => {
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
