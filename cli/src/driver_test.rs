use super::*;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use events::EventKind;
use futures_util::{SinkExt, StreamExt};
use realtime::{Channel, ChannelConfig, ChannelEvent, ConnectionState, ReconnectPolicy, Topic};
use tokio::net::TcpListener;
use tokio::sync::mpsc;
use tokio_tungstenite::accept_async;
use tokio_tungstenite::tungstenite::{self, Message};

const OPEN: &str = r#"0{"sid":"s1","upgrades":[],"pingInterval":25000,"pingTimeout":20000,"maxPayload":1000000}"#;
const NAMESPACE_ACK: &str = r#"40/users,{"sid":"n1"}"#;
const TEST_TIMEOUT: Duration = Duration::from_secs(10);

type ServerLog = Arc<Mutex<Vec<String>>>;

async fn listener() -> (TcpListener, String) {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("local addr");
    (listener, format!("http://{addr}"))
}

fn channel_for(origin: &str, attempts: u32) -> Channel {
    let config = ChannelConfig::new(origin).with_reconnect(ReconnectPolicy::new(attempts, Duration::from_millis(20)));
    Channel::new(config).expect("channel")
}

async fn next_text<S>(ws: &mut S) -> Option<String>
where
    S: futures_util::Stream<Item = Result<Message, tungstenite::Error>> + Unpin,
{
    while let Some(msg) = ws.next().await {
        match msg {
            Ok(Message::Text(text)) => return Some(text.as_str().to_owned()),
            Ok(Message::Close(_)) | Err(_) => return None,
            Ok(_) => {}
        }
    }
    None
}

/// Accept one session: handshake, namespace ack, read the register frame,
/// push `events`, then close.
async fn scripted_session(listener: &TcpListener, events: &[&str], log: &ServerLog) {
    let (tcp, _) = listener.accept().await.expect("accept");
    let mut ws = accept_async(tcp).await.expect("ws accept");
    ws.send(Message::text(OPEN)).await.expect("send open");
    let connect = next_text(&mut ws).await.expect("namespace connect");
    log.lock().expect("log").push(connect);
    ws.send(Message::text(NAMESPACE_ACK)).await.expect("send ack");
    let register = next_text(&mut ws).await.expect("register");
    log.lock().expect("log").push(register);
    for event in events {
        ws.send(Message::text(*event)).await.expect("send event");
    }
    ws.close(None).await.expect("close");
}

// =============================================================
// Reconnect
// =============================================================

#[tokio::test]
async fn reconnects_without_duplicate_handlers_then_degrades() {
    let (listener, origin) = listener().await;
    let log: ServerLog = Arc::new(Mutex::new(Vec::new()));
    let server_log = Arc::clone(&log);
    let server = tokio::spawn(async move {
        scripted_session(&listener, &[r#"42/users,["menuNotification","Masala dosa is back"]"#], &server_log).await;
        scripted_session(&listener, &[r#"42/users,["menuNotification","Filter coffee ready"]"#], &server_log).await;
        drop(listener);
    });

    let mut channel = channel_for(&origin, 2);
    channel.identify(Some("9876543210".to_owned()));
    let count = Arc::new(AtomicUsize::new(0));
    let seen = Arc::clone(&count);
    let _sub = channel
        .on(Topic::Event(EventKind::Menu), move |_| {
            seen.fetch_add(1, Ordering::SeqCst);
        })
        .expect("subscribe");
    let (_tx, mut rx) = mpsc::unbounded_channel();

    let state = tokio::time::timeout(TEST_TIMEOUT, run(&mut channel, &mut rx)).await.expect("driver finished");
    server.await.expect("server task");

    assert_eq!(state, ConnectionState::Degraded);
    assert_eq!(count.load(Ordering::SeqCst), 2);
    assert_eq!(channel.listeners().len(), 1);
    let log = log.lock().expect("log");
    assert_eq!(
        *log,
        vec![
            "40/users,".to_owned(),
            r#"42/users,["registerUser","9876543210"]"#.to_owned(),
            "40/users,".to_owned(),
            r#"42/users,["registerUser","9876543210"]"#.to_owned(),
        ]
    );
    assert_eq!(channel.stats().delivered, 2);
}

#[tokio::test]
async fn unreachable_server_degrades_after_budget() {
    let (listener, origin) = listener().await;
    drop(listener);

    let mut channel = channel_for(&origin, 3);
    let (_tx, mut rx) = mpsc::unbounded_channel();
    let state = tokio::time::timeout(TEST_TIMEOUT, run(&mut channel, &mut rx)).await.expect("driver finished");

    assert_eq!(state, ConnectionState::Degraded);
    assert_eq!(channel.degraded_reason(), Some(realtime::DegradedReason::RetriesExhausted { attempts: 3 }));
    assert_eq!(channel.stats().reconnects, 3);
    assert_eq!(channel.connect(), None);
}

// =============================================================
// Disconnect
// =============================================================

#[tokio::test]
async fn disconnect_control_leaves_namespace_and_closes() {
    let (listener, origin) = listener().await;
    let log: ServerLog = Arc::new(Mutex::new(Vec::new()));
    let server_log = Arc::clone(&log);
    let server = tokio::spawn(async move {
        let (tcp, _) = listener.accept().await.expect("accept");
        let mut ws = accept_async(tcp).await.expect("ws accept");
        ws.send(Message::text(OPEN)).await.expect("send open");
        while let Some(text) = next_text(&mut ws).await {
            if text == "40/users," {
                ws.send(Message::text(NAMESPACE_ACK)).await.expect("send ack");
            }
            server_log.lock().expect("log").push(text);
        }
    });

    let mut channel = channel_for(&origin, 5);
    let (tx, mut rx) = mpsc::unbounded_channel();
    let on_connect = tx.clone();
    let _sub = channel
        .on(Topic::Connection, move |event| {
            if matches!(event, ChannelEvent::Connected) {
                let _ = on_connect.send(Control::Disconnect);
            }
        })
        .expect("subscribe");

    let state = tokio::time::timeout(TEST_TIMEOUT, run(&mut channel, &mut rx)).await.expect("driver finished");
    tokio::time::timeout(TEST_TIMEOUT, server).await.expect("server finished").expect("server task");

    assert_eq!(state, ConnectionState::Closed);
    assert!(channel.listeners().is_empty());
    let log = log.lock().expect("log");
    assert_eq!(*log, vec!["40/users,".to_owned(), "41/users,".to_owned(), "1".to_owned()]);
}

#[tokio::test]
async fn identify_control_registers_mid_session() {
    let (listener, origin) = listener().await;
    let log: ServerLog = Arc::new(Mutex::new(Vec::new()));
    let server_log = Arc::clone(&log);
    let server = tokio::spawn(async move {
        let (tcp, _) = listener.accept().await.expect("accept");
        let mut ws = accept_async(tcp).await.expect("ws accept");
        ws.send(Message::text(OPEN)).await.expect("send open");
        while let Some(text) = next_text(&mut ws).await {
            if text == "40/users," {
                ws.send(Message::text(NAMESPACE_ACK)).await.expect("send ack");
            }
            server_log.lock().expect("log").push(text);
        }
    });

    let mut channel = channel_for(&origin, 5);
    let (tx, mut rx) = mpsc::unbounded_channel();
    let on_connect = tx.clone();
    let _sub = channel
        .on(Topic::Connection, move |event| {
            if matches!(event, ChannelEvent::Connected) {
                let _ = on_connect.send(Control::Identify(Some("5551234".to_owned())));
                let _ = on_connect.send(Control::Disconnect);
            }
        })
        .expect("subscribe");

    let state = tokio::time::timeout(TEST_TIMEOUT, run(&mut channel, &mut rx)).await.expect("driver finished");
    tokio::time::timeout(TEST_TIMEOUT, server).await.expect("server finished").expect("server task");

    assert_eq!(state, ConnectionState::Closed);
    let log = log.lock().expect("log");
    assert_eq!(log[1], r#"42/users,["registerUser","5551234"]"#);
}
