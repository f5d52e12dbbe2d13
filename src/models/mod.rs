// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Data models for the application.

pub mod buckets;
pub mod goal;
pub mod record;

pub use buckets::{CategoryTotals, DailyBucket, StreakReport, WeeklyBucket};
pub use goal::{CategoryGoal, GoalCompletion, GoalStatus, GoalTarget};
pub use record::{ActivityRecord, Category, RawActivityRow, RecordError};
