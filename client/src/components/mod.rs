//! Layout chrome components.
//!
//! SYSTEM CONTEXT
//! ==============
//! The layout wraps every page: a header with the connection dot, the
//! kitchen call control, and the notification bell; a bottom navigation bar
//! with cart and orders badges. It also owns the channel subscriptions for as
//! long as it is mounted.

pub mod bottom_nav;
pub mod layout;
pub mod notification_menu;
