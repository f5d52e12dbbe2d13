// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Per-category daily goals.

use crate::models::Category;
use serde::{Deserialize, Serialize};
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

/// Goal configuration as stored for a user (no progress yet).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "app/src/lib/generated/")
)]
pub struct GoalTarget {
    pub category: Category,
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    pub target: f64,
}

fn default_enabled() -> bool {
    true
}

/// A goal paired with the value completed so far.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "app/src/lib/generated/")
)]
pub struct CategoryGoal {
    pub category: Category,
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    pub target: f64,
    #[serde(default)]
    pub completed: f64,
}

impl CategoryGoal {
    /// Whether this goal counts toward the completion denominator.
    pub fn is_active(&self) -> bool {
        self.enabled && self.target > 0.0
    }

    pub fn is_met(&self) -> bool {
        self.completed >= self.target
    }
}

/// Outcome of one counted goal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "app/src/lib/generated/")
)]
pub struct GoalStatus {
    pub category: Category,
    pub target: f64,
    pub completed: f64,
    pub met: bool,
}

/// Overall completion across enabled goals.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "app/src/lib/generated/")
)]
pub struct GoalCompletion {
    /// 0-100, rounded half up
    pub percent: u32,
    pub met_count: u32,
    pub total_count: u32,
    pub goals: Vec<GoalStatus>,
}
