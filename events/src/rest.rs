//! REST endpoints the realtime layer reads before the first push arrives.
//!
//! Both calls are plain `GET`s against the configured API base URL.

#[cfg(test)]
#[path = "rest_test.rs"]
mod rest_test;

use serde::{Deserialize, Serialize};

/// Body of `GET {api}/kitchen/{kitchen_id}/status`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct KitchenStatusResponse {
    /// Whether the kitchen is accepting calls and orders.
    pub status: bool,
    /// Kitchen phone number, without country code.
    #[serde(default)]
    pub phone: Option<String>,
}

/// Body of `GET {api}/auth/status`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthStatusResponse {
    pub is_logged_in: bool,
    #[serde(default)]
    pub phone: Option<String>,
}

#[must_use]
pub fn kitchen_status_endpoint(api_url: &str, kitchen_id: &str) -> String {
    format!("{}/kitchen/{}/status", api_url.trim_end_matches('/'), kitchen_id.trim_matches('/'))
}

#[must_use]
pub fn auth_status_endpoint(api_url: &str) -> String {
    format!("{}/auth/status", api_url.trim_end_matches('/'))
}
