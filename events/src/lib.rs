//! Wire model and text codec for the canteen notification channel.
//!
//! The notification server speaks Socket.IO v5 over Engine.IO v4, websocket
//! transport only. Every websocket text message is one Engine.IO packet; the
//! `message` packet carries one Socket.IO packet. Binary attachments are not
//! used by this channel and are rejected.
//!
//! Typed server/client events and their payload schemas live in [`event`];
//! the REST bodies read alongside the channel live in [`rest`].

pub mod event;
pub mod rest;

pub use event::{ClientEvent, EventKind, EventNames, MenuNotice, OrderNotice, ServerEvent};

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Namespace used when a packet carries no explicit namespace.
pub const ROOT_NAMESPACE: &str = "/";

/// Engine.IO protocol revision spoken by this codec.
pub const ENGINE_IO_VERSION: u8 = 4;

/// Error returned by the packet decoders.
#[derive(Debug, thiserror::Error)]
pub enum CodecError {
    /// The frame was empty.
    #[error("empty packet")]
    Empty,
    /// The leading Engine.IO type digit is not a known packet type.
    #[error("unknown engine packet type: {0:?}")]
    UnknownEnginePacket(char),
    /// The leading Socket.IO type digit is not a known packet type.
    #[error("unknown socket packet type: {0:?}")]
    UnknownSocketPacket(char),
    /// Binary events/acks need attachment frames, which this channel never sends.
    #[error("binary socket packets are not supported")]
    BinaryUnsupported,
    /// The JSON body could not be parsed.
    #[error("invalid JSON body: {0}")]
    InvalidJson(#[from] serde_json::Error),
    /// An event packet whose body is not an array led by a string name.
    #[error("event packet is missing its name")]
    MissingEventName,
    /// An ack packet without an id.
    #[error("ack packet is missing its id")]
    MissingAckId,
    /// A known event whose payload does not match its schema.
    #[error("invalid {kind} payload: {reason}")]
    InvalidPayload { kind: EventKind, reason: &'static str },
    /// The configured origin is not an http(s) or ws(s) URL.
    #[error("invalid origin: {0}")]
    InvalidOrigin(String),
}

/// Session parameters the server sends in the Engine.IO `open` packet.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Handshake {
    pub sid: String,
    #[serde(default)]
    pub upgrades: Vec<String>,
    /// Milliseconds between server pings.
    pub ping_interval: u64,
    /// Milliseconds the server waits for a pong.
    pub ping_timeout: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_payload: Option<u64>,
}

/// One Engine.IO packet.
#[derive(Clone, Debug, PartialEq)]
pub enum EnginePacket {
    Open(Handshake),
    Close,
    /// Heartbeat probe; the payload is echoed back in the pong.
    Ping(String),
    Pong(String),
    Message(SocketPacket),
    Upgrade,
    Noop,
}

/// One Socket.IO packet.
#[derive(Clone, Debug, PartialEq)]
pub enum SocketPacket {
    Connect { nsp: String, data: Option<Value> },
    Disconnect { nsp: String },
    Event { nsp: String, id: Option<u64>, name: String, args: Vec<Value> },
    Ack { nsp: String, id: u64, args: Vec<Value> },
    ConnectError { nsp: String, data: Value },
}

impl SocketPacket {
    /// Namespace the packet is addressed to.
    #[must_use]
    pub fn nsp(&self) -> &str {
        match self {
            Self::Connect { nsp, .. }
            | Self::Disconnect { nsp }
            | Self::Event { nsp, .. }
            | Self::Ack { nsp, .. }
            | Self::ConnectError { nsp, .. } => nsp,
        }
    }

    fn type_digit(&self) -> char {
        match self {
            Self::Connect { .. } => '0',
            Self::Disconnect { .. } => '1',
            Self::Event { .. } => '2',
            Self::Ack { .. } => '3',
            Self::ConnectError { .. } => '4',
        }
    }
}

/// Encode an Engine.IO packet into the text frame sent over the websocket.
#[must_use]
pub fn encode_packet(packet: &EnginePacket) -> String {
    match packet {
        EnginePacket::Open(handshake) => {
            // Serializing a struct of strings and integers cannot fail.
            let body = serde_json::to_string(handshake).unwrap_or_default();
            format!("0{body}")
        }
        EnginePacket::Close => "1".to_owned(),
        EnginePacket::Ping(payload) => format!("2{payload}"),
        EnginePacket::Pong(payload) => format!("3{payload}"),
        EnginePacket::Message(inner) => format!("4{}", encode_socket_packet(inner)),
        EnginePacket::Upgrade => "5".to_owned(),
        EnginePacket::Noop => "6".to_owned(),
    }
}

/// Decode one websocket text frame into an Engine.IO packet.
///
/// # Errors
///
/// Returns [`CodecError`] for empty frames, unknown packet types, malformed
/// JSON bodies, and binary Socket.IO packets.
pub fn decode_packet(text: &str) -> Result<EnginePacket, CodecError> {
    let mut chars = text.chars();
    let kind = chars.next().ok_or(CodecError::Empty)?;
    let rest = chars.as_str();
    match kind {
        '0' => Ok(EnginePacket::Open(serde_json::from_str(rest)?)),
        '1' => Ok(EnginePacket::Close),
        '2' => Ok(EnginePacket::Ping(rest.to_owned())),
        '3' => Ok(EnginePacket::Pong(rest.to_owned())),
        '4' => Ok(EnginePacket::Message(decode_socket_packet(rest)?)),
        '5' => Ok(EnginePacket::Upgrade),
        '6' => Ok(EnginePacket::Noop),
        other => Err(CodecError::UnknownEnginePacket(other)),
    }
}

fn encode_socket_packet(packet: &SocketPacket) -> String {
    let mut out = String::new();
    out.push(packet.type_digit());
    let nsp = packet.nsp();
    if !nsp.is_empty() && nsp != ROOT_NAMESPACE {
        out.push_str(nsp);
        out.push(',');
    }
    match packet {
        SocketPacket::Connect { data, .. } => {
            if let Some(data) = data {
                out.push_str(&data.to_string());
            }
        }
        SocketPacket::Disconnect { .. } => {}
        SocketPacket::Event { id, name, args, .. } => {
            if let Some(id) = id {
                out.push_str(&id.to_string());
            }
            let mut body = Vec::with_capacity(args.len() + 1);
            body.push(Value::String(name.clone()));
            body.extend(args.iter().cloned());
            out.push_str(&Value::Array(body).to_string());
        }
        SocketPacket::Ack { id, args, .. } => {
            out.push_str(&id.to_string());
            out.push_str(&Value::Array(args.clone()).to_string());
        }
        SocketPacket::ConnectError { data, .. } => out.push_str(&data.to_string()),
    }
    out
}

fn decode_socket_packet(text: &str) -> Result<SocketPacket, CodecError> {
    let mut chars = text.chars();
    let kind = chars.next().ok_or(CodecError::Empty)?;
    let mut rest = chars.as_str();

    if matches!(kind, '5' | '6') {
        return Err(CodecError::BinaryUnsupported);
    }

    let nsp = if rest.starts_with('/') {
        match rest.find(',') {
            Some(idx) => {
                let nsp = &rest[..idx];
                rest = &rest[idx + 1..];
                nsp.to_owned()
            }
            None => {
                let nsp = rest.to_owned();
                rest = "";
                nsp
            }
        }
    } else {
        ROOT_NAMESPACE.to_owned()
    };

    let digits = rest.bytes().take_while(u8::is_ascii_digit).count();
    let id = if digits > 0 {
        rest[..digits].parse::<u64>().ok()
    } else {
        None
    };
    rest = &rest[digits..];

    let body = if rest.is_empty() {
        None
    } else {
        Some(serde_json::from_str::<Value>(rest)?)
    };

    match kind {
        '0' => Ok(SocketPacket::Connect { nsp, data: body }),
        '1' => Ok(SocketPacket::Disconnect { nsp }),
        '2' => {
            let Some(Value::Array(mut items)) = body else {
                return Err(CodecError::MissingEventName);
            };
            if !matches!(items.first(), Some(Value::String(_))) {
                return Err(CodecError::MissingEventName);
            }
            let Value::String(name) = items.remove(0) else {
                return Err(CodecError::MissingEventName);
            };
            Ok(SocketPacket::Event { nsp, id, name, args: items })
        }
        '3' => {
            let id = id.ok_or(CodecError::MissingAckId)?;
            let args = match body {
                Some(Value::Array(items)) => items,
                Some(other) => vec![other],
                None => Vec::new(),
            };
            Ok(SocketPacket::Ack { nsp, id, args })
        }
        '4' => Ok(SocketPacket::ConnectError { nsp, data: body.unwrap_or(Value::Null) }),
        other => Err(CodecError::UnknownSocketPacket(other)),
    }
}

/// Build the websocket endpoint for a server origin.
///
/// `http`/`https` origins are mapped to `ws`/`wss`; `ws`/`wss` origins are
/// used as-is. Trailing slashes are dropped.
///
/// # Errors
///
/// Returns [`CodecError::InvalidOrigin`] for any other scheme.
pub fn socket_url(origin: &str) -> Result<String, CodecError> {
    let origin = origin.trim().trim_end_matches('/');
    let base = if let Some(rest) = origin.strip_prefix("https://") {
        format!("wss://{rest}")
    } else if let Some(rest) = origin.strip_prefix("http://") {
        format!("ws://{rest}")
    } else if origin.starts_with("wss://") || origin.starts_with("ws://") {
        origin.to_owned()
    } else {
        return Err(CodecError::InvalidOrigin(origin.to_owned()));
    };
    if base.ends_with("://") {
        return Err(CodecError::InvalidOrigin(origin.to_owned()));
    }
    Ok(format!("{base}/socket.io/?EIO={ENGINE_IO_VERSION}&transport=websocket"))
}
