//! Display derivations for the report's stats row.

use chrono::{DateTime, Datelike, FixedOffset, Local, TimeZone, Timelike, Utc};

use crate::locale::ReportLocale;

/// Colour-coded sentiment class.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SentimentTone {
    Positive,
    Negative,
    Neutral,
}

impl SentimentTone {
    /// Substring classification, so "very positive indeed" is positive.
    pub fn classify(sentiment: Option<&str>) -> Self {
        let lowered = sentiment.unwrap_or_default().to_lowercase();
        if lowered.contains("positive") {
            SentimentTone::Positive
        } else if lowered.contains("negative") {
            SentimentTone::Negative
        } else {
            SentimentTone::Neutral
        }
    }

    pub fn color(self) -> &'static str {
        match self {
            SentimentTone::Positive => "#059669",
            SentimentTone::Negative => "#DC2626",
            SentimentTone::Neutral => "#4B5563",
        }
    }
}

/// Whole seconds, rounded half up, e.g. 4500 ms is "5s".
pub fn format_duration(duration_ms: Option<u64>) -> String {
    let seconds = duration_ms
        .map(|ms| ms / 1000 + u64::from(ms % 1000 >= 500))
        .unwrap_or(0);
    format!("{}s", seconds)
}

/// Month, day, hour and minute of the call start in the given offset.
///
/// Without an offset the server's local time zone is used. A missing, zero
/// or out-of-range timestamp renders the locale's "just now" placeholder.
pub fn format_call_date(
    start_timestamp_ms: Option<i64>,
    offset: Option<FixedOffset>,
    locale: ReportLocale,
) -> String {
    let placeholder = || locale.labels().just_now.to_string();

    let Some(utc) = start_timestamp_ms
        .filter(|ms| *ms != 0)
        .and_then(DateTime::<Utc>::from_timestamp_millis)
    else {
        return placeholder();
    };

    match offset {
        Some(offset) => format_in(&utc.with_timezone(&offset), locale),
        None => format_in(&utc.with_timezone(&Local), locale),
    }
}

fn format_in<Tz: TimeZone>(when: &DateTime<Tz>, locale: ReportLocale) -> String {
    locale.format_date(when.month0(), when.day(), when.hour(), when.minute())
}

/// Build a fixed offset from minutes east of UTC, ignoring impossible values.
pub fn offset_from_minutes(minutes: i32) -> Option<FixedOffset> {
    minutes
        .checked_mul(60)
        .and_then(FixedOffset::east_opt)
}
