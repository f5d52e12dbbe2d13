// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

use chrono::NaiveDate;
use std::sync::Arc;
use wellness_tracker::config::Config;
use wellness_tracker::db::RestDb;
use wellness_tracker::models::{ActivityRecord, Category, GoalTarget};
use wellness_tracker::routes::create_router;
use wellness_tracker::AppState;

/// Create a test app whose backend is offline (every fetch fails).
/// Returns the router and the shared state.
#[allow(dead_code)]
pub fn create_test_app() -> (axum::Router, Arc<AppState>) {
    let state = Arc::new(AppState::new(Config::test_default(), RestDb::new_mock()));
    (create_router(state.clone()), state)
}

/// Create a test app whose backend serves the given rows from memory.
#[allow(dead_code)]
pub fn create_fixture_app(records: Vec<ActivityRecord>, goals: Vec<GoalTarget>) -> axum::Router {
    let db = RestDb::with_fixtures(records, goals);
    create_router(Arc::new(AppState::new(Config::test_default(), db)))
}

#[allow(dead_code)]
pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
}

#[allow(dead_code)]
pub fn record(category: Category, date: NaiveDate, value: f64) -> ActivityRecord {
    ActivityRecord::on_date(category, date, value).expect("valid record")
}

/// Read a JSON response body.
#[allow(dead_code)]
pub async fn body_json(response: axum::response::Response) -> serde_json::Value {
    let body = axum::body::to_bytes(response.into_body(), 1024 * 1024)
        .await
        .unwrap();
    serde_json::from_slice(&body).unwrap()
}
