//! Wall-clock milliseconds since the Unix epoch.

#[cfg(test)]
#[path = "clock_test.rs"]
mod clock_test;

/// Current time in epoch milliseconds.
#[cfg(feature = "csr")]
#[must_use]
#[allow(clippy::cast_possible_truncation)]
pub fn now_ms() -> i64 {
    js_sys::Date::now() as i64
}

/// Current time in epoch milliseconds.
#[cfg(not(feature = "csr"))]
#[must_use]
pub fn now_ms() -> i64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map_or(0, |d| i64::try_from(d.as_millis()).unwrap_or(i64::MAX))
}

/// Local date and time of an epoch-millisecond stamp, as the browser shows it.
#[cfg(feature = "csr")]
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn format_timestamp(ts: i64) -> String {
    let date = js_sys::Date::new(&wasm_bindgen::JsValue::from_f64(ts as f64));
    String::from(date.to_locale_string("default", &wasm_bindgen::JsValue::UNDEFINED))
}

/// `HH:MM` (UTC) of an epoch-millisecond stamp.
#[cfg(not(feature = "csr"))]
#[must_use]
pub fn format_timestamp(ts: i64) -> String {
    let minutes_of_day = ts.div_euclid(60_000).rem_euclid(24 * 60);
    format!("{:02}:{:02}", minutes_of_day / 60, minutes_of_day % 60)
}
