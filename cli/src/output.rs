//! Terminal rendering of feed entries.

#[cfg(test)]
#[path = "output_test.rs"]
mod output_test;

use std::io::{self, Write};

use realtime::{Notification, NotificationKind};
use time::OffsetDateTime;
use time::macros::format_description;

/// How notifications are written to stdout.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Printer {
    /// Ring the terminal bell on every notification.
    pub bell: bool,
    /// One JSON object per line instead of text.
    pub json: bool,
}

impl Printer {
    pub fn print(self, notification: &Notification) {
        let line = if self.json {
            match serde_json::to_string(notification) {
                Ok(json) => json,
                Err(err) => {
                    tracing::warn!(error = %err, "notification not serializable");
                    return;
                }
            }
        } else {
            format_line(notification)
        };

        let mut out = io::stdout().lock();
        let bell = if self.bell { "\x07" } else { "" };
        if let Err(err) = writeln!(out, "{bell}{line}").and_then(|()| out.flush()) {
            tracing::debug!(error = %err, "stdout write failed");
        }
    }
}

#[must_use]
pub fn kind_label(kind: NotificationKind) -> &'static str {
    match kind {
        NotificationKind::Menu => "menu",
        NotificationKind::Order => "order",
        NotificationKind::KitchenStatus => "kitchen",
    }
}

/// `HH:MM:SS  kind     text`, in UTC.
#[must_use]
pub fn format_line(notification: &Notification) -> String {
    format!("{}  {:<8} {}", format_clock(notification.ts), kind_label(notification.kind), notification.text)
}

fn format_clock(ts_ms: i64) -> String {
    let format = format_description!("[hour]:[minute]:[second]");
    OffsetDateTime::from_unix_timestamp_nanos(i128::from(ts_ms) * 1_000_000)
        .ok()
        .and_then(|at| at.format(&format).ok())
        .unwrap_or_else(|| "--:--:--".to_owned())
}

/// Current time in epoch milliseconds.
#[must_use]
pub fn now_ms() -> i64 {
    i64::try_from(OffsetDateTime::now_utc().unix_timestamp_nanos() / 1_000_000).unwrap_or(i64::MAX)
}
