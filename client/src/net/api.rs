//! REST helpers for kitchen and auth status.
//!
//! Browser (csr): real HTTP calls via `gloo-net`.
//! Native builds (tests, tooling): stubs returning an error since these calls
//! only make sense in the browser.
//!
//! ERROR HANDLING
//! ==============
//! Callers get `Result<_, String>` so a failed refresh leaves the previous
//! state in place and is logged, never panics.

#![allow(clippy::unused_async)]

#[cfg(test)]
#[path = "api_test.rs"]
mod api_test;

use events::rest::{AuthStatusResponse, KitchenStatusResponse};
#[cfg(feature = "csr")]
use events::rest::{auth_status_endpoint, kitchen_status_endpoint};

#[cfg(any(test, feature = "csr"))]
fn request_failed_message(what: &str, status: u16) -> String {
    format!("{what} request failed: {status}")
}

#[cfg(not(feature = "csr"))]
const BROWSER_ONLY: &str = "REST calls are only available in the browser";

/// Fetch `GET {api}/kitchen/{kitchen_id}/status`.
///
/// # Errors
///
/// Returns a message for transport failures, non-2xx responses, and
/// undecodable bodies.
pub async fn fetch_kitchen_status(api_url: &str, kitchen_id: &str) -> Result<KitchenStatusResponse, String> {
    #[cfg(feature = "csr")]
    {
        let url = kitchen_status_endpoint(api_url, kitchen_id);
        let resp = gloo_net::http::Request::get(&url).send().await.map_err(|e| e.to_string())?;
        if !resp.ok() {
            return Err(request_failed_message("kitchen status", resp.status()));
        }
        resp.json::<KitchenStatusResponse>().await.map_err(|e| e.to_string())
    }
    #[cfg(not(feature = "csr"))]
    {
        let _ = (api_url, kitchen_id);
        Err(BROWSER_ONLY.to_owned())
    }
}

/// Fetch `GET {api}/auth/status`, sending the session cookie.
///
/// # Errors
///
/// Returns a message for transport failures, non-2xx responses, and
/// undecodable bodies.
pub async fn fetch_auth_status(api_url: &str) -> Result<AuthStatusResponse, String> {
    #[cfg(feature = "csr")]
    {
        let url = auth_status_endpoint(api_url);
        let resp = gloo_net::http::Request::get(&url)
            .credentials(web_sys::RequestCredentials::Include)
            .send()
            .await
            .map_err(|e| e.to_string())?;
        if !resp.ok() {
            return Err(request_failed_message("auth status", resp.status()));
        }
        resp.json::<AuthStatusResponse>().await.map_err(|e| e.to_string())
    }
    #[cfg(not(feature = "csr"))]
    {
        let _ = api_url;
        Err(BROWSER_ONLY.to_owned())
    }
}
