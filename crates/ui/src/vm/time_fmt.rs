use chrono::{DateTime, Utc};

/// Remaining time below which the countdown is highlighted.
pub const LOW_TIME_SECS: u32 = 300;

#[must_use]
pub fn format_datetime(value: DateTime<Utc>) -> String {
    value.format("%Y-%m-%d %H:%M").to_string()
}

/// `HH:MM:SS`, hours not wrapped.
#[must_use]
pub fn format_countdown(seconds: u32) -> String {
    let hours = seconds / 3600;
    let minutes = (seconds % 3600) / 60;
    let secs = seconds % 60;
    format!("{hours:02}:{minutes:02}:{secs:02}")
}

#[must_use]
pub fn is_low_time(seconds: u32) -> bool {
    seconds < LOW_TIME_SECS
}
