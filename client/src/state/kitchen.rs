//! Kitchen status as last reported by REST or a `kitchenStatus` push.
//!
//! Last write wins: a push that lands before a slow REST refresh is
//! overwritten by it, and vice versa.

#[cfg(test)]
#[path = "kitchen_test.rs"]
mod kitchen_test;

use events::rest::KitchenStatusResponse;

/// Country prefix for the kitchen's dial link.
const DIAL_PREFIX: &str = "+91";

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct KitchenState {
    pub kitchen_id: String,
    pub online: bool,
    pub phone_number: Option<String>,
    /// True while a status refresh is in flight.
    pub loading: bool,
}

impl KitchenState {
    #[must_use]
    pub fn new(kitchen_id: impl Into<String>) -> Self {
        Self { kitchen_id: kitchen_id.into(), ..Self::default() }
    }

    /// Record a pushed online/offline flag.
    pub fn apply_status(&mut self, online: bool) {
        self.online = online;
    }

    /// Record a `GET /kitchen/{id}/status` result.
    pub fn apply_fetch(&mut self, status: &KitchenStatusResponse) {
        self.online = status.status;
        if let Some(phone) = status.phone.as_deref().map(str::trim).filter(|p| !p.is_empty()) {
            self.phone_number = Some(phone.to_owned());
        }
        self.loading = false;
    }

    /// `tel:` link for the call control, once the number is known.
    #[must_use]
    pub fn call_href(&self) -> Option<String> {
        self.phone_number.as_deref().map(|number| {
            let digits = number.trim_start_matches(DIAL_PREFIX);
            format!("tel:{DIAL_PREFIX}{digits}")
        })
    }
}
