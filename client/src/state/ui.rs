//! Route-derived navigation state and header chrome.
//!
//! DESIGN
//! ======
//! Tab selection and badge visibility are pure functions of the current path
//! and the cart/notification containers, recomputed whenever either changes.
//! `UiState` only holds what cannot be derived: whether the notification menu
//! is open and what the snackbar shows.

#[cfg(test)]
#[path = "ui_test.rs"]
mod ui_test;

use std::time::Duration;

use realtime::ConnectionState;

use super::auth::AuthState;
use super::cart::CartState;
use super::kitchen::KitchenState;
use super::notifications::NotificationsState;

/// How long the snackbar stays up after selecting a notification.
pub const SNACKBAR_AUTO_HIDE: Duration = Duration::from_secs(3);

/// Bottom navigation tab.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum NavTab {
    #[default]
    Menu,
    Cart,
    Orders,
    Profile,
}

impl NavTab {
    pub const ALL: [Self; 4] = [Self::Menu, Self::Cart, Self::Orders, Self::Profile];

    /// Tab highlighted for `path`. Unknown paths fall back to the menu.
    #[must_use]
    pub fn for_path(path: &str, kitchen_id: &str) -> Self {
        let path = path.trim_end_matches('/');
        let base = format!("/{}", kitchen_id.trim_matches('/'));
        let Some(rest) = path.strip_prefix(base.as_str()) else {
            return Self::Menu;
        };
        match rest {
            "/cart" => Self::Cart,
            "/orders" => Self::Orders,
            "/profile" => Self::Profile,
            _ => Self::Menu,
        }
    }

    #[must_use]
    pub fn path(self, kitchen_id: &str) -> String {
        let base = format!("/{}", kitchen_id.trim_matches('/'));
        match self {
            Self::Menu => base,
            Self::Cart => format!("{base}/cart"),
            Self::Orders => format!("{base}/orders"),
            Self::Profile => format!("{base}/profile"),
        }
    }

    #[must_use]
    pub fn index(self) -> usize {
        match self {
            Self::Menu => 0,
            Self::Cart => 1,
            Self::Orders => 2,
            Self::Profile => 3,
        }
    }

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Menu => "Menu",
            Self::Cart => "Cart",
            Self::Orders => "Orders",
            Self::Profile => "Profile",
        }
    }
}

/// Badge state for the bottom navigation and the header bell.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct NavBadges {
    pub cart_count: usize,
    pub cart_hidden: bool,
    pub orders_hidden: bool,
    pub notification_count: usize,
}

impl NavBadges {
    #[must_use]
    pub fn derive(cart: &CartState, notifications: &NotificationsState) -> Self {
        let cart_count = cart.line_count();
        Self {
            cart_count,
            cart_hidden: cart_count == 0,
            orders_hidden: !notifications.has_order_updates(),
            notification_count: notifications.badge_count(),
        }
    }
}

/// Whether the header call control is enabled.
#[must_use]
pub fn call_kitchen_enabled(kitchen: &KitchenState) -> bool {
    kitchen.online
}

/// The call control and the notification bell are shown to signed-in users only.
#[must_use]
pub fn session_controls_visible(auth: &AuthState) -> bool {
    auth.logged_in
}

/// CSS modifier for the header connection dot.
#[must_use]
pub fn connection_status_class(state: ConnectionState) -> &'static str {
    match state {
        ConnectionState::Connected => "conn-dot conn-dot--live",
        ConnectionState::Idle | ConnectionState::Connecting | ConnectionState::Reconnecting { .. } => {
            "conn-dot conn-dot--pending"
        }
        ConnectionState::Degraded => "conn-dot conn-dot--down",
        ConnectionState::Closed => "conn-dot",
    }
}

#[must_use]
pub fn connection_status_title(state: ConnectionState) -> String {
    match state {
        ConnectionState::Idle => "Not connected".to_owned(),
        ConnectionState::Connecting => "Connecting…".to_owned(),
        ConnectionState::Connected => "Live updates on".to_owned(),
        ConnectionState::Reconnecting { attempt } => format!("Reconnecting (attempt {attempt})…"),
        ConnectionState::Degraded => "Live updates unavailable; reload to retry".to_owned(),
        ConnectionState::Closed => "Live updates off".to_owned(),
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct UiState {
    pub menu_open: bool,
    pub snackbar: Option<String>,
    /// Bumped on every selection; an auto-hide only closes its own generation.
    pub snackbar_generation: u64,
}

impl UiState {
    pub fn open_menu(&mut self) {
        self.menu_open = true;
    }

    /// Close the notification menu and clear the feed in one step.
    pub fn dismiss_menu(&mut self, notifications: &mut NotificationsState) -> usize {
        self.menu_open = false;
        notifications.clear()
    }

    /// Show a notification's text in the snackbar. Returns the generation
    /// to hand to [`UiState::expire_snackbar`].
    pub fn select(&mut self, text: impl Into<String>) -> u64 {
        self.snackbar = Some(text.into());
        self.snackbar_generation = self.snackbar_generation.wrapping_add(1);
        self.snackbar_generation
    }

    pub fn close_snackbar(&mut self) {
        self.snackbar = None;
    }

    /// Auto-hide for the snackbar opened as `generation`; a newer selection
    /// stays up, even when it shows the same text.
    pub fn expire_snackbar(&mut self, generation: u64) {
        if self.snackbar_generation == generation {
            self.snackbar = None;
        }
    }
}
