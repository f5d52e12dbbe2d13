// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Shared helpers for calendar arithmetic and date/time formatting.

use chrono::{DateTime, Datelike, Days, FixedOffset, NaiveDate, SecondsFormat, Utc};

/// Format a UTC timestamp as RFC3339 using a `Z` suffix.
pub fn format_utc_rfc3339(date: DateTime<Utc>) -> String {
    date.to_rfc3339_opts(SecondsFormat::Secs, true)
}

/// Calendar day at `now` for a client `offset_minutes` east of UTC.
///
/// Record dates derived from timestamps use the timestamp's own offset, so the
/// default "today" has to be taken in the same zone. Out-of-range offsets
/// fall back to the UTC day.
pub fn today_in_offset(now: DateTime<Utc>, offset_minutes: i32) -> NaiveDate {
    offset_minutes
        .checked_mul(60)
        .and_then(FixedOffset::east_opt)
        .map(|offset| now.with_timezone(&offset).date_naive())
        .unwrap_or_else(|| now.date_naive())
}

/// Most recent Sunday on or before `date`.
pub fn week_start(date: NaiveDate) -> NaiveDate {
    let offset = u64::from(date.weekday().num_days_from_sunday());
    date.checked_sub_days(Days::new(offset)).unwrap_or(date)
}

/// Whole calendar days from `date` to `today` (negative if `date` is later).
pub fn days_between(today: NaiveDate, date: NaiveDate) -> i64 {
    today.signed_duration_since(date).num_days()
}

/// First day of a window of `days` calendar days ending at `today`.
pub fn window_start(today: NaiveDate, days: u32) -> NaiveDate {
    today
        .checked_sub_days(Days::new(u64::from(days.saturating_sub(1))))
        .unwrap_or(NaiveDate::MIN)
}
