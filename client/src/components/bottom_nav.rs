//! Bottom navigation with cart and orders badges.

use leptos::prelude::*;
use leptos_router::hooks::use_location;

use crate::config::ClientConfig;
use crate::state::cart::CartState;
use crate::state::notifications::NotificationsState;
use crate::state::ui::{NavBadges, NavTab};

#[component]
pub fn BottomNav() -> impl IntoView {
    let config = expect_context::<ClientConfig>();
    let cart = expect_context::<RwSignal<CartState>>();
    let notifications = expect_context::<RwSignal<NotificationsState>>();
    let location = use_location();

    let kitchen_id = config.kitchen_id.clone();
    let active = Memo::new(move |_| NavTab::for_path(&location.pathname.get(), &kitchen_id));
    let badges = Memo::new(move |_| cart.with(|c| notifications.with(|n| NavBadges::derive(c, n))));

    let tabs = NavTab::ALL
        .into_iter()
        .map(|tab| {
            let href = tab.path(&config.kitchen_id);
            let badge = move || {
                let b = badges.get();
                match tab {
                    NavTab::Cart if !b.cart_hidden => Some(b.cart_count.to_string()),
                    NavTab::Orders if !b.orders_hidden => Some("•".to_owned()),
                    _ => None,
                }
            };
            view! {
                <a
                    href=href
                    class="bottom-nav__tab"
                    class:bottom-nav__tab--active=move || active.get() == tab
                >
                    <span class="bottom-nav__label">{tab.label()}</span>
                    {move || badge().map(|text| view! { <span class="bottom-nav__badge">{text}</span> })}
                </a>
            }
        })
        .collect_view();

    view! { <nav class="bottom-nav">{tabs}</nav> }
}
