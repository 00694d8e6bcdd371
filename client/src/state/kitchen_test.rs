use super::*;

#[test]
fn new_kitchen_starts_offline() {
    let kitchen = KitchenState::new("7");
    assert_eq!(kitchen.kitchen_id, "7");
    assert!(!kitchen.online);
    assert_eq!(kitchen.call_href(), None);
}

#[test]
fn push_and_fetch_are_last_write_wins() {
    let mut kitchen = KitchenState::new("7");
    kitchen.apply_status(true);
    kitchen.apply_fetch(&KitchenStatusResponse { status: false, phone: None });
    assert!(!kitchen.online);
    kitchen.apply_status(true);
    assert!(kitchen.online);
}

#[test]
fn fetch_keeps_known_phone_when_omitted() {
    let mut kitchen = KitchenState { loading: true, ..KitchenState::new("7") };
    kitchen.apply_fetch(&KitchenStatusResponse { status: true, phone: Some("9000000001".to_owned()) });
    kitchen.apply_fetch(&KitchenStatusResponse { status: true, phone: None });
    assert_eq!(kitchen.phone_number.as_deref(), Some("9000000001"));
    assert!(!kitchen.loading);
}

#[test]
fn call_href_uses_indian_prefix_once() {
    let mut kitchen = KitchenState::new("7");
    kitchen.phone_number = Some("9000000001".to_owned());
    assert_eq!(kitchen.call_href().as_deref(), Some("tel:+919000000001"));
    kitchen.phone_number = Some("+919000000001".to_owned());
    assert_eq!(kitchen.call_href().as_deref(), Some("tel:+919000000001"));
}
