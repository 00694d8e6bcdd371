//! Auth-session state for the current browser user.
//!
//! SYSTEM CONTEXT
//! ==============
//! The logged-in user's phone number is the identity registered with the
//! notification server, so order updates reach only their owner.

#[cfg(test)]
#[path = "auth_test.rs"]
mod auth_test;

use events::rest::AuthStatusResponse;

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AuthState {
    pub logged_in: bool,
    pub phone: Option<String>,
    /// True while an auth-status refresh is in flight.
    pub loading: bool,
}

impl AuthState {
    /// Replace session state with a fresh `GET /auth/status` result.
    pub fn apply_status(&mut self, status: &AuthStatusResponse) {
        self.logged_in = status.is_logged_in;
        self.phone = if status.is_logged_in { status.phone.clone() } else { None };
        self.loading = false;
    }

    /// Identity to register with the notification server, if any.
    #[must_use]
    pub fn identity(&self) -> Option<String> {
        if !self.logged_in {
            return None;
        }
        self.phone.as_deref().map(str::trim).filter(|p| !p.is_empty()).map(str::to_owned)
    }
}
