//! Typed events carried by the notification channel.
//!
//! SCHEMAS
//! =======
//! The server historically sent loosely shaped payloads. Each kind is decoded
//! against an explicit schema here; anything that does not fit is rejected
//! with [`CodecError::InvalidPayload`] and never reaches a handler.
//!
//! - menu: a string, or an object with a string `message` or `name`
//! - order: an object with a string `message` (optional `orderId`, `status`),
//!   or a bare string
//! - kitchen status: a bool, or an object `{ "status": bool }`

#[cfg(test)]
#[path = "event_test.rs"]
mod event_test;

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{CodecError, SocketPacket};

/// Server-pushed event kinds a client may subscribe to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum EventKind {
    /// A menu item was added or changed.
    Menu,
    /// An order moved through its lifecycle.
    Order,
    /// The kitchen went online or offline.
    KitchenStatus,
}

impl EventKind {
    pub const ALL: [Self; 3] = [Self::Menu, Self::Order, Self::KitchenStatus];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Menu => "menu",
            Self::Order => "order",
            Self::KitchenStatus => "kitchenStatus",
        }
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Mapping between logical event kinds and the names used on the wire.
///
/// Two server generations exist; [`EventNames::current`] and
/// [`EventNames::legacy`] cover both so one client build can talk to either.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventNames {
    /// Client-to-server identity registration.
    pub register: String,
    pub menu: String,
    pub order: String,
    pub kitchen_status: String,
}

impl EventNames {
    #[must_use]
    pub fn current() -> Self {
        Self {
            register: "registerUser".to_owned(),
            menu: "menuNotification".to_owned(),
            order: "orderNotification".to_owned(),
            kitchen_status: "kitchenStatus".to_owned(),
        }
    }

    #[must_use]
    pub fn legacy() -> Self {
        Self {
            register: "register".to_owned(),
            menu: "notification".to_owned(),
            order: "order-update-server".to_owned(),
            kitchen_status: "kitchenStatus".to_owned(),
        }
    }

    /// Resolve a profile by name (`current` or `legacy`).
    #[must_use]
    pub fn by_profile(profile: &str) -> Option<Self> {
        match profile.trim().to_ascii_lowercase().as_str() {
            "current" => Some(Self::current()),
            "legacy" => Some(Self::legacy()),
            _ => None,
        }
    }

    /// Event kind for an inbound wire name, if it is one we know.
    #[must_use]
    pub fn kind_of(&self, name: &str) -> Option<EventKind> {
        if name == self.menu {
            Some(EventKind::Menu)
        } else if name == self.order {
            Some(EventKind::Order)
        } else if name == self.kitchen_status {
            Some(EventKind::KitchenStatus)
        } else {
            None
        }
    }

    #[must_use]
    pub fn name_of(&self, kind: EventKind) -> &str {
        match kind {
            EventKind::Menu => &self.menu,
            EventKind::Order => &self.order,
            EventKind::KitchenStatus => &self.kitchen_status,
        }
    }
}

impl Default for EventNames {
    fn default() -> Self {
        Self::current()
    }
}

/// Menu update payload.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MenuNotice {
    pub message: String,
}

/// Order lifecycle payload.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderNotice {
    pub message: String,
    #[serde(default)]
    pub order_id: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
}

/// A validated server-to-client event.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ServerEvent {
    Menu(MenuNotice),
    Order(OrderNotice),
    KitchenStatus(bool),
}

impl ServerEvent {
    #[must_use]
    pub fn kind(&self) -> EventKind {
        match self {
            Self::Menu(_) => EventKind::Menu,
            Self::Order(_) => EventKind::Order,
            Self::KitchenStatus(_) => EventKind::KitchenStatus,
        }
    }

    /// Decode an event by wire name.
    ///
    /// Returns `Ok(None)` for names outside the profile.
    ///
    /// # Errors
    ///
    /// Returns [`CodecError::InvalidPayload`] when a known event's first
    /// argument does not match its schema.
    pub fn decode(names: &EventNames, name: &str, args: &[Value]) -> Result<Option<Self>, CodecError> {
        let Some(kind) = names.kind_of(name) else {
            return Ok(None);
        };
        let payload = args
            .first()
            .ok_or(CodecError::InvalidPayload { kind, reason: "missing payload" })?;
        let event = match kind {
            EventKind::Menu => Self::Menu(parse_menu(payload)?),
            EventKind::Order => Self::Order(parse_order(payload)?),
            EventKind::KitchenStatus => Self::KitchenStatus(parse_kitchen_status(payload)?),
        };
        Ok(Some(event))
    }
}

fn parse_menu(payload: &Value) -> Result<MenuNotice, CodecError> {
    let invalid = |reason| CodecError::InvalidPayload { kind: EventKind::Menu, reason };
    match payload {
        Value::String(text) => non_empty(text)
            .map(|message| MenuNotice { message })
            .ok_or_else(|| invalid("empty message")),
        Value::Object(map) => {
            if let Some(message) = map.get("message").and_then(Value::as_str).and_then(non_empty) {
                Ok(MenuNotice { message })
            } else if let Some(name) = map.get("name").and_then(Value::as_str).and_then(non_empty) {
                Ok(MenuNotice { message: format!("New on the menu: {name}") })
            } else {
                Err(invalid("expected `message` or `name`"))
            }
        }
        _ => Err(invalid("expected string or object")),
    }
}

fn parse_order(payload: &Value) -> Result<OrderNotice, CodecError> {
    let invalid = |reason| CodecError::InvalidPayload { kind: EventKind::Order, reason };
    match payload {
        Value::String(text) => non_empty(text)
            .map(|message| OrderNotice { message, order_id: None, status: None })
            .ok_or_else(|| invalid("empty message")),
        Value::Object(_) => {
            let notice: OrderNotice =
                serde_json::from_value(payload.clone()).map_err(|_| invalid("expected string `message`"))?;
            if notice.message.trim().is_empty() {
                return Err(invalid("empty message"));
            }
            Ok(notice)
        }
        _ => Err(invalid("expected string or object")),
    }
}

fn parse_kitchen_status(payload: &Value) -> Result<bool, CodecError> {
    match payload {
        Value::Bool(online) => Ok(*online),
        Value::Object(map) => map.get("status").and_then(Value::as_bool).ok_or(CodecError::InvalidPayload {
            kind: EventKind::KitchenStatus,
            reason: "expected bool `status`",
        }),
        _ => Err(CodecError::InvalidPayload { kind: EventKind::KitchenStatus, reason: "expected bool" }),
    }
}

fn non_empty(text: &str) -> Option<String> {
    let trimmed = text.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_owned())
}

/// A client-to-server event.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ClientEvent {
    /// Associate this connection with a user id.
    Register(String),
}

impl ClientEvent {
    /// Socket.IO packet for this event in namespace `nsp`.
    #[must_use]
    pub fn to_packet(&self, names: &EventNames, nsp: &str) -> SocketPacket {
        match self {
            Self::Register(user_id) => SocketPacket::Event {
                nsp: nsp.to_owned(),
                id: None,
                name: names.register.clone(),
                args: vec![Value::String(user_id.clone())],
            },
        }
    }
}
