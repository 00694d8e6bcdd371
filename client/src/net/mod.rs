//! Networking modules.
//!
//! SYSTEM CONTEXT
//! ==============
//! `api` reads kitchen and auth status over REST; `channel_client` drives the
//! realtime channel over a browser websocket and feeds events into state.

pub mod api;
pub mod channel_client;
