//! Build-time client configuration.
//!
//! A static WASM bundle has no process environment, so the same keys the CLI
//! reads at runtime are baked in at compile time with `option_env!`:
//! `CANTEEN_SOCKET_URL`, `CANTEEN_SOCKET_NAMESPACE`, `CANTEEN_EVENT_PROFILE`,
//! `CANTEEN_RECONNECT_ATTEMPTS`, `CANTEEN_RECONNECT_DELAY_MS`, plus
//! `CANTEEN_API_URL` and `CANTEEN_KITCHEN_ID`.

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;

use realtime::ChannelConfig;
use realtime::config::{
    ENV_EVENT_PROFILE, ENV_RECONNECT_ATTEMPTS, ENV_RECONNECT_DELAY_MS, ENV_SOCKET_NAMESPACE, ENV_SOCKET_URL,
};

pub const ENV_API_URL: &str = "CANTEEN_API_URL";
pub const ENV_KITCHEN_ID: &str = "CANTEEN_KITCHEN_ID";

pub const DEFAULT_API_URL: &str = "http://127.0.0.1:5000/api";
pub const DEFAULT_KITCHEN_ID: &str = "1";

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ClientConfig {
    /// REST base URL, without trailing slash.
    pub api_url: String,
    /// Kitchen this storefront belongs to.
    pub kitchen_id: String,
    pub channel: ChannelConfig,
}

impl ClientConfig {
    /// Configuration baked in at compile time, falling back to defaults when
    /// a baked value is unusable.
    #[must_use]
    pub fn load() -> Self {
        match Self::from_lookup(compile_time_env) {
            Ok(config) => config,
            Err(err) => {
                leptos::logging::warn!("invalid build configuration, using defaults: {err}");
                Self::default()
            }
        }
    }

    /// # Errors
    ///
    /// Returns [`realtime::ChannelError::Config`] when a channel key is invalid.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, realtime::ChannelError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_owned()).filter(|v| !v.is_empty());
        let api_url = get(ENV_API_URL)
            .unwrap_or_else(|| DEFAULT_API_URL.to_owned())
            .trim_end_matches('/')
            .to_owned();
        let kitchen_id = get(ENV_KITCHEN_ID).unwrap_or_else(|| DEFAULT_KITCHEN_ID.to_owned());
        let channel = ChannelConfig::from_lookup(&lookup)?;
        Ok(Self { api_url, kitchen_id, channel })
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_owned(),
            kitchen_id: DEFAULT_KITCHEN_ID.to_owned(),
            channel: ChannelConfig::default(),
        }
    }
}

fn compile_time_env(key: &str) -> Option<String> {
    let value = match key {
        ENV_SOCKET_URL => option_env!("CANTEEN_SOCKET_URL"),
        ENV_SOCKET_NAMESPACE => option_env!("CANTEEN_SOCKET_NAMESPACE"),
        ENV_EVENT_PROFILE => option_env!("CANTEEN_EVENT_PROFILE"),
        ENV_RECONNECT_ATTEMPTS => option_env!("CANTEEN_RECONNECT_ATTEMPTS"),
        ENV_RECONNECT_DELAY_MS => option_env!("CANTEEN_RECONNECT_DELAY_MS"),
        ENV_API_URL => option_env!("CANTEEN_API_URL"),
        ENV_KITCHEN_ID => option_env!("CANTEEN_KITCHEN_ID"),
        _ => None,
    };
    value.map(str::to_owned)
}
