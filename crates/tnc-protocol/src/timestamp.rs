//! Wall-clock timestamp normalization
//!
//! Monitor lines carry a bare `HH:MM:SS` time of day in UTC with no date.
//! Normalization pins it to the current UTC date, with one disambiguation
//! rule: a result more than one hour in the future is assumed to be from
//! the previous day (a message logged at 23:59:59 and received at 00:00:01
//! the next day). Nothing else is corrected; a stamp far in the past is
//! taken at face value, an ambiguity inherent to the dateless format.

use chrono::{DateTime, Duration, Utc};

/// Normalize an `HH:MM:SS` string against the current instant
pub fn normalize_timestamp(text: &str) -> Option<DateTime<Utc>> {
    normalize_timestamp_at(text, Utc::now())
}

/// Normalize an `HH:MM:SS` string against an explicit `now`
///
/// Returns `None` when the text does not match the two-digit pattern or
/// the components do not form a valid time of day.
pub fn normalize_timestamp_at(text: &str, now: DateTime<Utc>) -> Option<DateTime<Utc>> {
    let (hours, minutes, seconds) = split_hms(text)?;
    let candidate = now
        .date_naive()
        .and_hms_opt(hours, minutes, seconds)?
        .and_utc();

    // Allow up to one hour of clock skew before concluding the message
    // wrapped past midnight.
    if candidate > now + Duration::hours(1) {
        Some(candidate - Duration::days(1))
    } else {
        Some(candidate)
    }
}

/// Check that `text` matches `\d{2}:\d{2}:\d{2}` exactly
pub(crate) fn is_hms(text: &str) -> bool {
    split_hms(text).is_some()
}

fn split_hms(text: &str) -> Option<(u32, u32, u32)> {
    let bytes = text.as_bytes();
    if bytes.len() != 8 || bytes[2] != b':' || bytes[5] != b':' {
        return None;
    }
    let pair = |i: usize| -> Option<u32> {
        let hi = (bytes[i] as char).to_digit(10)?;
        let lo = (bytes[i + 1] as char).to_digit(10)?;
        Some(hi * 10 + lo)
    };
    Some((pair(0)?, pair(3)?, pair(6)?))
}
