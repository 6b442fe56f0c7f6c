use chrono::{DateTime, Utc};

use crate::domain::market_data::{Granularity, Timestamp};

fn to_utc(timestamp: Timestamp) -> Option<DateTime<Utc>> {
    i64::try_from(timestamp.value()).ok().and_then(DateTime::<Utc>::from_timestamp_millis)
}

/// `YYYY-MM-DD` in UTC
pub fn format_date(timestamp: Timestamp) -> String {
    to_utc(timestamp)
        .map(|dt| dt.format("%Y-%m-%d").to_string())
        .unwrap_or_else(|| "-".to_string())
}

/// Date label for a candle, with a time of day for intraday intervals.
///
/// - `Month | Week | Day` -> `YYYY-MM-DD`
/// - `Hour | FifteenMinutes` -> `YYYY-MM-DD HH:MM`
pub fn format_time_label(timestamp: Timestamp, granularity: Granularity) -> String {
    if !granularity.is_intraday() {
        return format_date(timestamp);
    }
    to_utc(timestamp)
        .map(|dt| dt.format("%Y-%m-%d %H:%M").to_string())
        .unwrap_or_else(|| "-".to_string())
}
