//! Channel configuration.
//!
//! Keys (all optional):
//! - `CANTEEN_SOCKET_URL`: server origin, default `http://127.0.0.1:5000`
//! - `CANTEEN_SOCKET_NAMESPACE`: role namespace, default `/users`
//! - `CANTEEN_EVENT_PROFILE`: `current` (default) or `legacy`
//! - `CANTEEN_RECONNECT_ATTEMPTS`: default 5
//! - `CANTEEN_RECONNECT_DELAY_MS`: default 2000

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;

use std::time::Duration;

use events::EventNames;

use crate::error::ChannelError;
use crate::policy::ReconnectPolicy;

pub const DEFAULT_ORIGIN: &str = "http://127.0.0.1:5000";
pub const DEFAULT_NAMESPACE: &str = "/users";

pub const ENV_SOCKET_URL: &str = "CANTEEN_SOCKET_URL";
pub const ENV_SOCKET_NAMESPACE: &str = "CANTEEN_SOCKET_NAMESPACE";
pub const ENV_EVENT_PROFILE: &str = "CANTEEN_EVENT_PROFILE";
pub const ENV_RECONNECT_ATTEMPTS: &str = "CANTEEN_RECONNECT_ATTEMPTS";
pub const ENV_RECONNECT_DELAY_MS: &str = "CANTEEN_RECONNECT_DELAY_MS";

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ChannelConfig {
    /// Server origin, `http(s)://` or `ws(s)://`.
    pub origin: String,
    /// Socket.IO namespace, always with a leading `/`.
    pub namespace: String,
    pub events: EventNames,
    pub reconnect: ReconnectPolicy,
}

impl ChannelConfig {
    #[must_use]
    pub fn new(origin: impl Into<String>) -> Self {
        Self {
            origin: origin.into(),
            namespace: DEFAULT_NAMESPACE.to_owned(),
            events: EventNames::current(),
            reconnect: ReconnectPolicy::default(),
        }
    }

    #[must_use]
    pub fn with_namespace(mut self, namespace: &str) -> Self {
        self.namespace = normalize_namespace(namespace);
        self
    }

    #[must_use]
    pub fn with_events(mut self, events: EventNames) -> Self {
        self.events = events;
        self
    }

    #[must_use]
    pub fn with_reconnect(mut self, reconnect: ReconnectPolicy) -> Self {
        self.reconnect = reconnect;
        self
    }

    /// Websocket endpoint for this origin.
    ///
    /// # Errors
    ///
    /// Returns [`ChannelError::Codec`] when the origin is not a usable URL.
    pub fn url(&self) -> Result<String, ChannelError> {
        Ok(events::socket_url(&self.origin)?)
    }

    /// Build config from process environment variables.
    ///
    /// # Errors
    ///
    /// Returns [`ChannelError::Config`] for unparsable values.
    pub fn from_env() -> Result<Self, ChannelError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build config from any key lookup (process env, compile-time env, a map).
    ///
    /// # Errors
    ///
    /// Returns [`ChannelError::Config`] for an unknown event profile, a
    /// non-numeric reconnect setting, or an unusable origin.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ChannelError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_owned()).filter(|v| !v.is_empty());

        let origin = get(ENV_SOCKET_URL).unwrap_or_else(|| DEFAULT_ORIGIN.to_owned());
        let namespace = get(ENV_SOCKET_NAMESPACE).map_or_else(|| DEFAULT_NAMESPACE.to_owned(), |n| normalize_namespace(&n));
        let events = match get(ENV_EVENT_PROFILE) {
            None => EventNames::current(),
            Some(profile) => EventNames::by_profile(&profile)
                .ok_or_else(|| ChannelError::Config(format!("unknown {ENV_EVENT_PROFILE}: {profile}")))?,
        };
        let defaults = ReconnectPolicy::default();
        let max_attempts = parse_or(get(ENV_RECONNECT_ATTEMPTS), ENV_RECONNECT_ATTEMPTS, defaults.max_attempts)?;
        let delay_ms = parse_or(
            get(ENV_RECONNECT_DELAY_MS),
            ENV_RECONNECT_DELAY_MS,
            u64::try_from(defaults.delay.as_millis()).unwrap_or(u64::MAX),
        )?;

        let config = Self {
            origin,
            namespace,
            events,
            reconnect: ReconnectPolicy::new(max_attempts, Duration::from_millis(delay_ms)),
        };
        config.url().map_err(|e| ChannelError::Config(e.to_string()))?;
        Ok(config)
    }
}

impl Default for ChannelConfig {
    fn default() -> Self {
        Self::new(DEFAULT_ORIGIN)
    }
}

fn parse_or<T: std::str::FromStr>(raw: Option<String>, key: &str, default: T) -> Result<T, ChannelError> {
    match raw {
        None => Ok(default),
        Some(raw) => raw
            .parse::<T>()
            .map_err(|_| ChannelError::Config(format!("{key} must be a non-negative integer, got {raw:?}"))),
    }
}

fn normalize_namespace(raw: &str) -> String {
    let trimmed = raw.trim().trim_end_matches([',', '/']);
    if trimmed.is_empty() {
        events::ROOT_NAMESPACE.to_owned()
    } else if trimmed.starts_with('/') {
        trimmed.to_owned()
    } else {
        format!("/{trimmed}")
    }
}
