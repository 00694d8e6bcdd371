//! # client
//!
//! Leptos + WASM shell for the canteen ordering app: bottom navigation,
//! header actions, and the realtime notification layer that keeps them
//! current.
//!
//! Pages themselves (menu, cart, orders, profile) mount inside [`app::App`]'s
//! layout. This crate owns the state they read through context, the channel
//! client that feeds that state, and the audio cue on new notifications.

pub mod app;
pub mod components;
pub mod config;
pub mod net;
pub mod state;
pub mod util;

/// Browser entry point.
#[cfg(feature = "csr")]
#[wasm_bindgen::prelude::wasm_bindgen(start)]
pub fn start() {
    console_error_panic_hook::set_once();
    let _ = console_log::init_with_level(log::Level::Info);
    leptos::mount::mount_to_body(app::App);
}
