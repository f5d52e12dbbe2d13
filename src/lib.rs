// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Wellness-Tracker: aggregate wellness activity for the mobile app
//!
//! This crate turns raw activity rows (exercise, water, sleep, workouts,
//! meditation, journaling, mood) into daily and weekly buckets, streaks and
//! goal completion, and serves them over a small JSON API.

pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod time_utils;

use config::Config;
use db::RestDb;
use services::ActivityAggregator;

/// Shared application state.
pub struct AppState {
    pub config: Config,
    pub db: RestDb,
    pub aggregator: ActivityAggregator,
}

impl AppState {
    /// Build state from config, deriving aggregator options from it.
    pub fn new(config: Config, db: RestDb) -> Self {
        let aggregator = ActivityAggregator::new(config.daily_sleep_rule, config.streak_lookback);
        Self {
            config,
            db,
            aggregator,
        }
    }
}
