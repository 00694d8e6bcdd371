//! Page layout: header, notification menu, bottom navigation.
//!
//! SYSTEM CONTEXT
//! ==============
//! Mounting the layout subscribes the feed to the channel; unmounting drops
//! the handles. Every navigation refreshes kitchen and auth status over REST,
//! and every (re)connect refreshes the kitchen status since pushes sent during
//! an outage are lost. Losing or switching the signed-in identity clears the
//! previous user's feed.

use leptos::prelude::*;
use leptos_router::hooks::use_location;
use realtime::{ChannelEvent, ConnectionState, Topic};

use crate::components::bottom_nav::BottomNav;
use crate::components::notification_menu::NotificationMenu;
use crate::config::ClientConfig;
use crate::net::channel_client::{ChannelHandle, subscribe_feed};
use crate::state::auth::AuthState;
use crate::state::kitchen::KitchenState;
use crate::state::notifications::NotificationsState;
use crate::state::ui::{
    call_kitchen_enabled, connection_status_class, connection_status_title, session_controls_visible,
};

#[component]
pub fn Layout(children: Children) -> impl IntoView {
    let config = expect_context::<ClientConfig>();
    let auth = expect_context::<RwSignal<AuthState>>();
    let kitchen = expect_context::<RwSignal<KitchenState>>();
    let notifications = expect_context::<RwSignal<NotificationsState>>();
    let connection = expect_context::<RwSignal<ConnectionState>>();
    let channel = expect_context::<ChannelHandle>();
    let location = use_location();

    let feed_subs = match subscribe_feed(&channel, notifications, kitchen) {
        Ok(subs) => subs,
        Err(e) => {
            leptos::logging::warn!("feed subscription failed: {e}");
            Vec::new()
        }
    };
    let connection_sub = {
        let api_url = config.api_url.clone();
        let kitchen_id = config.kitchen_id.clone();
        channel
            .on(Topic::Connection, move |event| {
                if matches!(event, ChannelEvent::Connected) {
                    refresh_kitchen(api_url.clone(), kitchen_id.clone(), kitchen);
                }
            })
            .map_err(|e| leptos::logging::warn!("connection subscription failed: {e}"))
            .ok()
    };
    on_cleanup(move || {
        drop(feed_subs);
        drop(connection_sub);
    });

    {
        let api_url = config.api_url.clone();
        let kitchen_id = config.kitchen_id.clone();
        Effect::new(move |_| {
            let _path = location.pathname.get();
            refresh_kitchen(api_url.clone(), kitchen_id.clone(), kitchen);
            refresh_auth(api_url.clone(), auth);
        });
    }

    {
        let channel = channel.clone();
        Effect::new(move |prev: Option<Option<String>>| {
            let identity = auth.with(AuthState::identity);
            if let Some(prev) = prev {
                let mut cleared = 0;
                notifications.update(|n| cleared = n.on_identity_change(prev.as_deref(), identity.as_deref()));
                if cleared > 0 {
                    leptos::logging::log!("session changed; cleared {cleared} notifications");
                }
            }
            channel.identify(identity.clone());
            identity
        });
    }

    let call_disabled = move || !kitchen.with(call_kitchen_enabled);
    let on_call = move |_| {
        let Some(href) = kitchen.with_untracked(KitchenState::call_href) else {
            return;
        };
        #[cfg(feature = "csr")]
        {
            if let Some(w) = web_sys::window() {
                let _ = w.location().set_href(&href);
            }
        }
        #[cfg(not(feature = "csr"))]
        let _ = href;
    };

    view! {
        <div class="layout">
            <header class="layout__header">
                <span
                    class=move || connection_status_class(connection.get())
                    title=move || connection_status_title(connection.get())
                ></span>
                <span class="layout__title">"Canteen"</span>
                <span class="layout__spacer"></span>
                <Show when=move || auth.with(session_controls_visible)>
                    <button
                        class="layout__call"
                        disabled=call_disabled
                        on:click=on_call
                        title=move || if call_disabled() { "Kitchen is offline" } else { "Call the kitchen" }
                    >
                        "☎"
                    </button>
                    <NotificationMenu/>
                </Show>
            </header>
            <main class="layout__content">{children()}</main>
            <BottomNav/>
        </div>
    }
}

fn refresh_kitchen(api_url: String, kitchen_id: String, kitchen: RwSignal<KitchenState>) {
    kitchen.update(|k| k.loading = true);
    #[cfg(feature = "csr")]
    leptos::task::spawn_local(async move {
        match crate::net::api::fetch_kitchen_status(&api_url, &kitchen_id).await {
            Ok(status) => kitchen.update(|k| k.apply_fetch(&status)),
            Err(e) => {
                leptos::logging::warn!("kitchen status refresh failed: {e}");
                kitchen.update(|k| k.loading = false);
            }
        }
    });
    #[cfg(not(feature = "csr"))]
    {
        let _ = (api_url, kitchen_id);
        kitchen.update(|k| k.loading = false);
    }
}

fn refresh_auth(api_url: String, auth: RwSignal<AuthState>) {
    auth.update(|a| a.loading = true);
    #[cfg(feature = "csr")]
    leptos::task::spawn_local(async move {
        match crate::net::api::fetch_auth_status(&api_url).await {
            Ok(status) => auth.update(|a| a.apply_status(&status)),
            Err(e) => {
                leptos::logging::warn!("auth status refresh failed: {e}");
                auth.update(|a| a.loading = false);
            }
        }
    });
    #[cfg(not(feature = "csr"))]
    {
        let _ = api_url;
        auth.update(|a| a.loading = false);
    }
}
