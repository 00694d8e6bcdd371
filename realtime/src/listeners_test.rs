use super::*;
use std::sync::atomic::{AtomicUsize, Ordering};

use events::MenuNotice;

fn menu_event(text: &str) -> ChannelEvent {
    ChannelEvent::Server(ServerEvent::Menu(MenuNotice { message: text.to_owned() }))
}

fn counter() -> (Arc<AtomicUsize>, impl Fn(&ChannelEvent) + Send + Sync + 'static) {
    let count = Arc::new(AtomicUsize::new(0));
    let handle = Arc::clone(&count);
    (count, move |_: &ChannelEvent| {
        handle.fetch_add(1, Ordering::SeqCst);
    })
}

// =============================================================
// Topic
// =============================================================

#[test]
fn channel_event_topics() {
    assert_eq!(ChannelEvent::Connected.topic(), Topic::Connection);
    assert_eq!(ChannelEvent::Disconnected.topic(), Topic::Connection);
    assert_eq!(menu_event("x").topic(), Topic::Event(EventKind::Menu));
    assert_eq!(
        ChannelEvent::Server(ServerEvent::KitchenStatus(true)).topic(),
        Topic::Event(EventKind::KitchenStatus)
    );
}

#[test]
fn topic_display_names() {
    assert_eq!(Topic::Connection.to_string(), "connection");
    assert_eq!(Topic::Event(EventKind::KitchenStatus).to_string(), "kitchenStatus");
}

// =============================================================
// Subscribe / dispatch
// =============================================================

#[test]
fn dispatch_reaches_subscribed_handler_only() {
    let listeners = Listeners::new();
    let (menu_count, menu_handler) = counter();
    let (order_count, order_handler) = counter();
    let _menu = listeners.on(Topic::Event(EventKind::Menu), menu_handler).expect("subscribe menu");
    let _order = listeners.on(Topic::Event(EventKind::Order), order_handler).expect("subscribe order");

    assert!(listeners.dispatch(&menu_event("a")));
    assert!(listeners.dispatch(&menu_event("b")));

    assert_eq!(menu_count.load(Ordering::SeqCst), 2);
    assert_eq!(order_count.load(Ordering::SeqCst), 0);
}

#[test]
fn dispatch_without_handler_reports_false() {
    let listeners = Listeners::new();
    assert!(!listeners.dispatch(&ChannelEvent::Connected));
}

#[test]
fn second_subscription_on_topic_is_rejected() {
    let listeners = Listeners::new();
    let (_, first) = counter();
    let (_, second) = counter();
    let _sub = listeners.on(Topic::Connection, first).expect("first subscribe");
    let err = listeners.on(Topic::Connection, second).expect_err("duplicate subscribe");
    assert!(matches!(err, ChannelError::AlreadySubscribed(Topic::Connection)));
    assert_eq!(listeners.len(), 1);
}

#[test]
fn dropping_subscription_frees_topic() {
    let listeners = Listeners::new();
    let (count, handler) = counter();
    let sub = listeners.on(Topic::Event(EventKind::Menu), handler).expect("subscribe");
    assert!(sub.is_active());
    drop(sub);

    assert!(!listeners.is_subscribed(Topic::Event(EventKind::Menu)));
    assert!(!listeners.dispatch(&menu_event("late")));
    assert_eq!(count.load(Ordering::SeqCst), 0);

    let (_, again) = counter();
    assert!(listeners.on(Topic::Event(EventKind::Menu), again).is_ok());
}

#[test]
fn remount_cycle_delivers_exactly_once() {
    let listeners = Listeners::new();
    let (count, _) = counter();
    for _ in 0..3 {
        let handle = Arc::clone(&count);
        let sub = listeners
            .on(Topic::Event(EventKind::Order), move |_| {
                handle.fetch_add(1, Ordering::SeqCst);
            })
            .expect("mount subscribe");
        drop(sub);
    }
    let handle = Arc::clone(&count);
    let _mounted = listeners
        .on(Topic::Event(EventKind::Order), move |_| {
            handle.fetch_add(1, Ordering::SeqCst);
        })
        .expect("final mount");

    listeners.dispatch(&ChannelEvent::Server(ServerEvent::Order(events::OrderNotice {
        message: "ready".to_owned(),
        order_id: None,
        status: None,
    })));
    assert_eq!(count.load(Ordering::SeqCst), 1);
}

// =============================================================
// clear
// =============================================================

#[test]
fn clear_removes_all_and_deactivates_handles() {
    let listeners = Listeners::new();
    let (_, a) = counter();
    let (_, b) = counter();
    let sub_a = listeners.on(Topic::Connection, a).expect("a");
    let sub_b = listeners.on(Topic::Event(EventKind::Menu), b).expect("b");

    listeners.clear();

    assert!(listeners.is_empty());
    assert!(!sub_a.is_active());
    assert!(!sub_b.is_active());
}

#[test]
fn stale_handle_does_not_remove_newer_subscription() {
    let listeners = Listeners::new();
    let (_, old) = counter();
    let stale = listeners.on(Topic::Connection, old).expect("old");
    listeners.clear();

    let (count, fresh) = counter();
    let _fresh = listeners.on(Topic::Connection, fresh).expect("fresh");
    drop(stale);

    assert!(listeners.dispatch(&ChannelEvent::Connected));
    assert_eq!(count.load(Ordering::SeqCst), 1);
}

#[test]
fn handler_may_drop_its_own_subscription() {
    let listeners = Listeners::new();
    let slot: Arc<Mutex<Option<Subscription>>> = Arc::new(Mutex::new(None));
    let slot_in_handler = Arc::clone(&slot);
    let sub = listeners
        .on(Topic::Connection, move |_| {
            slot_in_handler.lock().expect("slot lock").take();
        })
        .expect("subscribe");
    *slot.lock().expect("slot lock") = Some(sub);

    assert!(listeners.dispatch(&ChannelEvent::Connected));
    assert!(!listeners.is_subscribed(Topic::Connection));
}

#[test]
fn handles_outliving_registry_drop_quietly() {
    let listeners = Listeners::new();
    let (_, handler) = counter();
    let sub = listeners.on(Topic::Connection, handler).expect("subscribe");
    drop(listeners);
    assert!(!sub.is_active());
    drop(sub);
}
