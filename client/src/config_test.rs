use super::*;
use std::collections::HashMap;

fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let map: HashMap<String, String> = pairs.iter().map(|(k, v)| ((*k).to_owned(), (*v).to_owned())).collect();
    move |key| map.get(key).cloned()
}

#[test]
fn empty_lookup_yields_defaults() {
    let config = ClientConfig::from_lookup(lookup(&[])).expect("config");
    assert_eq!(config, ClientConfig::default());
}

#[test]
fn api_url_drops_trailing_slash() {
    let config = ClientConfig::from_lookup(lookup(&[(ENV_API_URL, "https://canteen.example/api/")])).expect("config");
    assert_eq!(config.api_url, "https://canteen.example/api");
}

#[test]
fn kitchen_id_and_channel_keys_are_read() {
    let config = ClientConfig::from_lookup(lookup(&[
        (ENV_KITCHEN_ID, "42"),
        ("CANTEEN_SOCKET_URL", "https://push.example"),
        ("CANTEEN_EVENT_PROFILE", "legacy"),
    ]))
    .expect("config");
    assert_eq!(config.kitchen_id, "42");
    assert_eq!(config.channel.origin, "https://push.example");
    assert_eq!(config.channel.events, events::EventNames::legacy());
}

#[test]
fn invalid_channel_key_is_an_error() {
    let result = ClientConfig::from_lookup(lookup(&[("CANTEEN_RECONNECT_ATTEMPTS", "lots")]));
    assert!(result.is_err());
}

#[test]
fn unknown_compile_time_key_is_none() {
    assert_eq!(compile_time_env("CANTEEN_NOT_A_KEY"), None);
}
