use super::*;
use std::collections::HashMap;

fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let map: HashMap<String, String> = pairs.iter().map(|(k, v)| ((*k).to_owned(), (*v).to_owned())).collect();
    move |key| map.get(key).cloned()
}

#[test]
fn defaults_when_nothing_is_set() {
    let config = ChannelConfig::from_lookup(|_| None).expect("config");
    assert_eq!(config, ChannelConfig::default());
    assert_eq!(config.namespace, "/users");
    assert_eq!(config.events, EventNames::current());
    assert_eq!(config.reconnect, ReconnectPolicy::default());
}

#[test]
fn reads_all_overrides() {
    let config = ChannelConfig::from_lookup(lookup(&[
        (ENV_SOCKET_URL, "https://canteen.example"),
        (ENV_SOCKET_NAMESPACE, "kitchen"),
        (ENV_EVENT_PROFILE, "legacy"),
        (ENV_RECONNECT_ATTEMPTS, "3"),
        (ENV_RECONNECT_DELAY_MS, "250"),
    ]))
    .expect("config");

    assert_eq!(config.origin, "https://canteen.example");
    assert_eq!(config.namespace, "/kitchen");
    assert_eq!(config.events, EventNames::legacy());
    assert_eq!(config.reconnect, ReconnectPolicy::new(3, Duration::from_millis(250)));
}

#[test]
fn blank_values_fall_back_to_defaults() {
    let config = ChannelConfig::from_lookup(lookup(&[(ENV_SOCKET_URL, "  "), (ENV_RECONNECT_ATTEMPTS, "")]))
        .expect("config");
    assert_eq!(config.origin, DEFAULT_ORIGIN);
    assert_eq!(config.reconnect.max_attempts, 5);
}

#[test]
fn rejects_unknown_profile() {
    let err = ChannelConfig::from_lookup(lookup(&[(ENV_EVENT_PROFILE, "v9")])).expect_err("bad profile");
    assert!(matches!(err, ChannelError::Config(msg) if msg.contains("v9")));
}

#[test]
fn rejects_non_numeric_reconnect_settings() {
    assert!(matches!(
        ChannelConfig::from_lookup(lookup(&[(ENV_RECONNECT_ATTEMPTS, "five")])),
        Err(ChannelError::Config(_))
    ));
    assert!(matches!(
        ChannelConfig::from_lookup(lookup(&[(ENV_RECONNECT_DELAY_MS, "-1")])),
        Err(ChannelError::Config(_))
    ));
}

#[test]
fn rejects_unusable_origin() {
    assert!(matches!(
        ChannelConfig::from_lookup(lookup(&[(ENV_SOCKET_URL, "canteen.example")])),
        Err(ChannelError::Config(_))
    ));
}

#[test]
fn namespace_is_normalized() {
    assert_eq!(ChannelConfig::default().with_namespace("users").namespace, "/users");
    assert_eq!(ChannelConfig::default().with_namespace("/admin,").namespace, "/admin");
    assert_eq!(ChannelConfig::default().with_namespace("").namespace, "/");
    assert_eq!(ChannelConfig::default().with_namespace("/users/").namespace, "/users");
    assert_eq!(ChannelConfig::default().with_namespace("users//").namespace, "/users");
    assert_eq!(ChannelConfig::default().with_namespace("/").namespace, "/");
}

#[test]
fn url_targets_socket_io_endpoint() {
    let url = ChannelConfig::new("http://localhost:5000").url().expect("url");
    assert_eq!(url, "ws://localhost:5000/socket.io/?EIO=4&transport=websocket");
}

// =============================================================================
// from_env: env manipulation requires unsafe in edition 2024; tests touching
// the process environment hold ENV_LOCK.
// =============================================================================

static ENV_LOCK: std::sync::Mutex<()> = std::sync::Mutex::new(());

#[test]
fn from_env_reads_process_environment() {
    let _guard = ENV_LOCK.lock().unwrap_or_else(std::sync::PoisonError::into_inner);
    unsafe {
        std::env::set_var(ENV_SOCKET_NAMESPACE, "/admin");
        std::env::set_var(ENV_RECONNECT_ATTEMPTS, "2");
    }
    let config = ChannelConfig::from_env();
    unsafe {
        std::env::remove_var(ENV_SOCKET_NAMESPACE);
        std::env::remove_var(ENV_RECONNECT_ATTEMPTS);
    }
    let config = config.expect("config");
    assert_eq!(config.namespace, "/admin");
    assert_eq!(config.reconnect.max_attempts, 2);
}

#[test]
fn from_env_rejects_unknown_profile() {
    let _guard = ENV_LOCK.lock().unwrap_or_else(std::sync::PoisonError::into_inner);
    unsafe { std::env::set_var(ENV_EVENT_PROFILE, "vintage") };
    let result = ChannelConfig::from_env();
    unsafe { std::env::remove_var(ENV_EVENT_PROFILE) };
    assert!(matches!(result, Err(ChannelError::Config(_))));
}
