use super::*;

#[test]
fn cached_blob_wins_over_network() {
    let source = AudioSource::choose(Some("blob:abc".to_owned()), NOTIFICATION_SOUND_URL);
    assert_eq!(source, AudioSource::Cached("blob:abc".to_owned()));
    assert_eq!(source.src(), "blob:abc");
}

#[test]
fn missing_cache_entry_falls_back_to_network() {
    let source = AudioSource::choose(None, NOTIFICATION_SOUND_URL);
    assert_eq!(source.src(), "/simple-notification-152054.mp3");
    assert_eq!(source.object_url(), None);
}

#[test]
fn cached_source_owns_an_object_url_to_revoke() {
    let source = AudioSource::choose(Some("blob:abc".to_owned()), NOTIFICATION_SOUND_URL);
    assert_eq!(source.object_url(), Some("blob:abc"));
}

#[test]
fn native_playback_is_a_no_op() {
    cache_notification_sound();
    play_notification_sound();
}
