use super::*;

#[test]
fn now_ms_is_after_2020() {
    assert!(now_ms() > 1_577_836_800_000);
}

#[test]
fn format_timestamp_shows_utc_hours_and_minutes() {
    // 2023-11-14T22:13:20Z
    assert_eq!(format_timestamp(1_700_000_000_000), "22:13");
    assert_eq!(format_timestamp(0), "00:00");
}

#[test]
fn format_timestamp_handles_pre_epoch_stamps() {
    assert_eq!(format_timestamp(-60_000), "23:59");
}
