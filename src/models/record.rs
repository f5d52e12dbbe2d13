// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Activity record model and the raw-row boundary.
//!
//! Rows coming from the backend (or posted by the client) are loosely typed.
//! They are converted into [`ActivityRecord`] here, and anything malformed is
//! rejected with a [`RecordError`] before it reaches the aggregator.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

/// Fixed set of tracked categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "app/src/lib/generated/")
)]
pub enum Category {
    /// Minutes of exercise
    Exercise,
    /// Milliliters of water
    Water,
    /// Hours of sleep
    Sleep,
    /// Completed workout sessions
    Workout,
    /// Minutes of meditation
    Meditation,
    /// Journal entries written
    Journal,
    /// Mood check-ins logged
    Mood,
}

impl Category {
    pub const ALL: [Category; 7] = [
        Category::Exercise,
        Category::Water,
        Category::Sleep,
        Category::Workout,
        Category::Meditation,
        Category::Journal,
        Category::Mood,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Category::Exercise => "exercise",
            Category::Water => "water",
            Category::Sleep => "sleep",
            Category::Workout => "workout",
            Category::Meditation => "meditation",
            Category::Journal => "journal",
            Category::Mood => "mood",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = RecordError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Category::ALL
            .into_iter()
            .find(|c| c.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| RecordError::UnknownCategory(s.to_string()))
    }
}

/// A single validated observation. Immutable once built.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActivityRecord {
    /// Calendar day used as the bucketing key
    pub date: NaiveDate,
    /// Exact instant the entry was logged
    pub timestamp: DateTime<Utc>,
    pub category: Category,
    /// Magnitude in the category's unit (always finite and >= 0)
    pub value: f64,
}

impl ActivityRecord {
    /// Build a record, enforcing the non-negative value invariant.
    pub fn new(
        category: Category,
        date: NaiveDate,
        timestamp: DateTime<Utc>,
        value: f64,
    ) -> Result<Self, RecordError> {
        Ok(Self {
            date,
            timestamp,
            category,
            value: check_value(value)?,
        })
    }

    /// Build a record logged at midnight UTC of `date`.
    pub fn on_date(category: Category, date: NaiveDate, value: f64) -> Result<Self, RecordError> {
        Self::new(category, date, midnight_utc(date), value)
    }
}

/// Loosely typed row as received from the backend or the client.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawActivityRow {
    #[serde(default)]
    pub category: Option<String>,
    /// Calendar date, `YYYY-MM-DD`
    #[serde(default)]
    pub date: Option<String>,
    /// RFC 3339 timestamp
    #[serde(default)]
    pub timestamp: Option<String>,
    /// Number or numeric string
    #[serde(default)]
    pub value: Option<serde_json::Value>,
}

impl RawActivityRow {
    /// Convert into a record. `fallback` is used when the row has no category
    /// of its own (rows read from a per-category table).
    pub fn into_record(self, fallback: Option<Category>) -> Result<ActivityRecord, RecordError> {
        let category = match self.category.as_deref() {
            Some(raw) => raw.parse()?,
            None => fallback.ok_or(RecordError::MissingCategory)?,
        };

        let timestamp = self
            .timestamp
            .as_deref()
            .map(|raw| {
                DateTime::parse_from_rfc3339(raw)
                    .map_err(|_| RecordError::InvalidTimestamp(raw.to_string()))
            })
            .transpose()?;

        let date = match self.date.as_deref() {
            Some(raw) => parse_date(raw)?,
            // The day as the user saw it, i.e. in the timestamp's own offset
            None => timestamp
                .map(|ts| ts.date_naive())
                .ok_or(RecordError::MissingDate)?,
        };

        let timestamp = timestamp
            .map(|ts| ts.with_timezone(&Utc))
            .unwrap_or_else(|| midnight_utc(date));

        let value = match self.value {
            Some(v) => parse_value(&v)?,
            None => return Err(RecordError::MissingValue),
        };

        ActivityRecord::new(category, date, timestamp, value)
    }
}

/// Parse a `YYYY-MM-DD` date, tolerating a trailing time component.
fn parse_date(raw: &str) -> Result<NaiveDate, RecordError> {
    let day = raw.get(..10).unwrap_or(raw);
    NaiveDate::parse_from_str(day, "%Y-%m-%d")
        .map_err(|_| RecordError::InvalidDate(raw.to_string()))
}

fn parse_value(value: &serde_json::Value) -> Result<f64, RecordError> {
    let parsed = match value {
        serde_json::Value::Number(n) => n.as_f64(),
        serde_json::Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    parsed.ok_or_else(|| RecordError::InvalidValue(value.to_string()))
}

fn check_value(value: f64) -> Result<f64, RecordError> {
    if !value.is_finite() {
        return Err(RecordError::InvalidValue(value.to_string()));
    }
    if value < 0.0 {
        return Err(RecordError::NegativeValue(value));
    }
    Ok(value)
}

fn midnight_utc(date: NaiveDate) -> DateTime<Utc> {
    date.and_time(chrono::NaiveTime::MIN).and_utc()
}

/// Reasons a raw row is rejected at the boundary.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum RecordError {
    #[error("Unknown category: {0}")]
    UnknownCategory(String),

    #[error("Row has no category")]
    MissingCategory,

    #[error("Row has neither a date nor a timestamp")]
    MissingDate,

    #[error("Invalid date: {0}")]
    InvalidDate(String),

    #[error("Invalid timestamp: {0}")]
    InvalidTimestamp(String),

    #[error("Row has no value")]
    MissingValue,

    #[error("Value is not a finite number: {0}")]
    InvalidValue(String),

    #[error("Value must not be negative: {0}")]
    NegativeValue(f64),
}
