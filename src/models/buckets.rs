// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Time-bucketed aggregates derived from activity records.
//!
//! Buckets are never stored. They are recomputed from a fresh record
//! snapshot every time a screen asks for them.

use crate::models::Category;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

/// One value slot per category.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "app/src/lib/generated/")
)]
pub struct CategoryTotals {
    pub exercise: f64,
    pub water: f64,
    pub sleep: f64,
    pub workout: f64,
    pub meditation: f64,
    pub journal: f64,
    pub mood: f64,
}

impl CategoryTotals {
    /// Value currently held for a category.
    pub fn get(&self, category: Category) -> f64 {
        match category {
            Category::Exercise => self.exercise,
            Category::Water => self.water,
            Category::Sleep => self.sleep,
            Category::Workout => self.workout,
            Category::Meditation => self.meditation,
            Category::Journal => self.journal,
            Category::Mood => self.mood,
        }
    }

    pub fn slot_mut(&mut self, category: Category) -> &mut f64 {
        match category {
            Category::Exercise => &mut self.exercise,
            Category::Water => &mut self.water,
            Category::Sleep => &mut self.sleep,
            Category::Workout => &mut self.workout,
            Category::Meditation => &mut self.meditation,
            Category::Journal => &mut self.journal,
            Category::Mood => &mut self.mood,
        }
    }

    pub fn add(&mut self, category: Category, value: f64) {
        *self.slot_mut(category) += value;
    }

    pub fn set(&mut self, category: Category, value: f64) {
        *self.slot_mut(category) = value;
    }
}

/// Aggregate of every record sharing a calendar date.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "app/src/lib/generated/")
)]
pub struct DailyBucket {
    pub date: NaiveDate,
    /// Sums per category; sleep follows the configured daily rule
    pub totals: CategoryTotals,
    /// Number of records folded into this bucket
    pub record_count: u32,
}

impl DailyBucket {
    pub fn new(date: NaiveDate) -> Self {
        Self {
            date,
            totals: CategoryTotals::default(),
            record_count: 0,
        }
    }
}

/// Aggregate of every record in a Sunday-anchored week.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "app/src/lib/generated/")
)]
pub struct WeeklyBucket {
    /// Sunday on or before every date in the bucket
    pub week_start: NaiveDate,
    /// Plain sums per category (sleep included)
    pub totals: CategoryTotals,
    /// Mean of the week's sleep entries, 0 when there are none
    pub avg_sleep: f64,
    pub sleep_entries: u32,
    /// Distinct dates with at least one record, any category
    pub days_active: u32,
}

/// Current streak plus how it relates to the lookback window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "app/src/lib/generated/")
)]
pub struct StreakReport {
    pub current: u32,
    pub lookback: u32,
    /// True when the streak filled the whole window, so the real
    /// streak may be longer (render as "30+")
    pub capped: bool,
}
