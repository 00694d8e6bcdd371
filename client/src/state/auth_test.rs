use super::*;

fn status(is_logged_in: bool, phone: Option<&str>) -> AuthStatusResponse {
    AuthStatusResponse { is_logged_in, phone: phone.map(str::to_owned) }
}

#[test]
fn default_is_signed_out() {
    let auth = AuthState::default();
    assert!(!auth.logged_in);
    assert_eq!(auth.identity(), None);
}

#[test]
fn apply_status_logged_in_exposes_identity() {
    let mut auth = AuthState { loading: true, ..AuthState::default() };
    auth.apply_status(&status(true, Some("9876543210")));
    assert!(auth.logged_in);
    assert!(!auth.loading);
    assert_eq!(auth.identity().as_deref(), Some("9876543210"));
}

#[test]
fn apply_status_logged_out_drops_phone() {
    let mut auth = AuthState::default();
    auth.apply_status(&status(true, Some("1")));
    auth.apply_status(&status(false, Some("1")));
    assert_eq!(auth.phone, None);
    assert_eq!(auth.identity(), None);
}

#[test]
fn blank_phone_is_not_an_identity() {
    let mut auth = AuthState::default();
    auth.apply_status(&status(true, Some("  ")));
    assert_eq!(auth.identity(), None);
}
