//! Root application component with context providers.

use leptos::prelude::*;
use leptos_meta::{Title, provide_meta_context};
use leptos_router::components::Router;
use realtime::{ConnectionState, Listeners};

use crate::components::layout::Layout;
use crate::config::ClientConfig;
use crate::net::channel_client::ChannelHandle;
use crate::state::{
    auth::AuthState, cart::CartState, kitchen::KitchenState, notifications::NotificationsState, ui::UiState,
};
use crate::util::audio;

/// Root application component.
///
/// Provides every shared state container, starts the realtime channel, and
/// mounts the layout that pages render into.
#[component]
pub fn App() -> impl IntoView {
    provide_meta_context();

    let config = ClientConfig::load();

    // Provide reactive state contexts for all child components.
    let auth = RwSignal::new(AuthState { loading: true, ..AuthState::default() });
    let kitchen = RwSignal::new(KitchenState::new(config.kitchen_id.clone()));
    let cart = RwSignal::new(CartState::default());
    let notifications = RwSignal::new(NotificationsState::default());
    let ui = RwSignal::new(UiState::default());
    let connection = RwSignal::new(ConnectionState::default());

    provide_context(auth);
    provide_context(kitchen);
    provide_context(cart);
    provide_context(notifications);
    provide_context(ui);
    provide_context(connection);

    let channel = start_channel(&config, connection);
    provide_context(channel.clone());
    provide_context(config);

    audio::cache_notification_sound();

    on_cleanup(move || {
        channel.disconnect();
    });

    view! {
        <Title text="Canteen"/>

        <Router>
            <Layout>
                <div id="page-root" class="page-root"></div>
            </Layout>
        </Router>
    }
}

fn start_channel(config: &ClientConfig, connection: RwSignal<ConnectionState>) -> ChannelHandle {
    #[cfg(feature = "csr")]
    {
        match crate::net::channel_client::spawn_channel_client(config.channel.clone(), None, connection) {
            Ok(handle) => return handle,
            Err(e) => {
                leptos::logging::warn!("realtime channel unavailable: {e}");
                connection.set(ConnectionState::Degraded);
            }
        }
    }
    #[cfg(not(feature = "csr"))]
    let _ = (config, connection);
    ChannelHandle::detached(Listeners::new())
}
