//! Injected state containers.
//!
//! SYSTEM CONTEXT
//! ==============
//! Each container is a plain struct provided through Leptos context as
//! `RwSignal<T>`. Components read and update them; the channel client writes
//! `notifications` and `kitchen`; REST refreshes write `auth` and `kitchen`.
//! Derived navigation state lives in `ui` as pure functions of the others.

pub mod auth;
pub mod cart;
pub mod kitchen;
pub mod notifications;
pub mod ui;
