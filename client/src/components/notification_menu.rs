//! Header bell, notification menu, and snackbar.
//!
//! Dismissing the menu clears the feed. Selecting an entry shows its text in
//! a snackbar that hides itself after a few seconds.

use leptos::prelude::*;

use crate::state::notifications::NotificationsState;
use crate::state::ui::UiState;
use crate::util::clock::format_timestamp;

#[component]
pub fn NotificationMenu() -> impl IntoView {
    let notifications = expect_context::<RwSignal<NotificationsState>>();
    let ui = expect_context::<RwSignal<UiState>>();

    let count = move || notifications.with(NotificationsState::badge_count);
    let menu_open = move || ui.with(|u| u.menu_open);

    let on_bell = move |_| ui.update(UiState::open_menu);
    let on_dismiss = move |_| {
        let mut cleared = 0;
        notifications.update(|n| ui.update(|u| cleared = u.dismiss_menu(n)));
        leptos::logging::log!("cleared {cleared} notifications");
    };

    let select = move |text: String| {
        let mut generation = 0;
        ui.update(|u| generation = u.select(text));
        #[cfg(feature = "csr")]
        set_timeout(
            move || ui.update(|u| u.expire_snackbar(generation)),
            crate::state::ui::SNACKBAR_AUTO_HIDE,
        );
        #[cfg(not(feature = "csr"))]
        let _ = generation;
    };

    let items = move || {
        notifications
            .with(|n| n.feed.iter().cloned().collect::<Vec<_>>())
            .into_iter()
            .rev()
            .map(|item| {
                let text = item.text.clone();
                let when = format_timestamp(item.ts);
                view! {
                    <li class="notif-menu__item">
                        <button on:click=move |_| select(text.clone())>
                            <span class="notif-menu__text">{item.text}</span>
                            <time class="notif-menu__time">{when}</time>
                        </button>
                    </li>
                }
            })
            .collect_view()
    };

    view! {
        <div class="notif">
            <button class="notif__bell" on:click=on_bell title="Notifications">
                "🔔"
                <Show when=move || { count() > 0 }>
                    <span class="notif__badge">{count}</span>
                </Show>
            </button>
            <Show when=menu_open>
                <div class="notif-menu">
                    <Show
                        when=move || { count() > 0 }
                        fallback=|| view! { <p class="notif-menu__empty">"No notifications"</p> }
                    >
                        <ul class="notif-menu__list">{items}</ul>
                    </Show>
                    <button class="notif-menu__dismiss" on:click=on_dismiss>"Clear"</button>
                </div>
            </Show>
            {move || {
                ui.with(|u| u.snackbar.clone())
                    .map(|text| {
                        view! {
                            <div class="snackbar" role="status">
                                <span>{text}</span>
                                <button on:click=move |_| ui.update(UiState::close_snackbar)>"✕"</button>
                            </div>
                        }
                    })
            }}
        </div>
    }
}
