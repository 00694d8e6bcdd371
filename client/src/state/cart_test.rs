use super::*;

fn line(id: &str, price: f64, quantity: u32) -> CartLine {
    CartLine { id: id.to_owned(), name: format!("item {id}"), price, quantity }
}

#[test]
fn empty_cart_counts_zero() {
    let cart = CartState::default();
    assert!(cart.is_empty());
    assert_eq!(cart.line_count(), 0);
}

#[test]
fn line_count_ignores_quantities() {
    let cart = CartState { lines: vec![line("a", 40.0, 3), line("b", 25.5, 1)] };
    assert_eq!(cart.line_count(), 2);
    assert!(!cart.is_empty());
}
