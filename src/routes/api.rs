// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! API routes serving activity aggregates.

use crate::config::MAX_HISTORY_DAYS;
use crate::error::{AppError, Result};
use crate::models::{
    ActivityRecord, Category, CategoryGoal, DailyBucket, GoalCompletion, RawActivityRow,
    StreakReport, WeeklyBucket,
};
use crate::services::aggregator::{
    filter_category, goals_for_day, longest_streak, window, ActivityAggregator,
};
use crate::time_utils::{format_utc_rfc3339, today_in_offset, window_start};
use crate::AppState;
use axum::{
    extract::{Path, Query, State},
    routing::{get, post},
    Json, Router,
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;
use validator::Validate;

/// Rows requested per category table in one summary.
const MAX_ROWS_PER_CATEGORY: u32 = 1000;
const MAX_USER_ID_LEN: usize = 64;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/aggregate", post(aggregate))
        .route("/api/users/{user_id}/summary", get(get_summary))
}

// ─── Shared Response ─────────────────────────────────────────

/// Everything a history/trends/hub screen renders.
#[derive(Serialize, Debug)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "app/src/lib/generated/")
)]
pub struct AggregateResponse {
    pub today: NaiveDate,
    /// Most recent day first
    pub daily: Vec<DailyBucket>,
    /// Most recent week first
    pub weekly: Vec<WeeklyBucket>,
    pub streak_category: Category,
    pub streak: StreakReport,
    pub longest_streak: u32,
    pub goals: GoalCompletion,
}

fn build_aggregates(
    aggregator: &ActivityAggregator,
    records: &[ActivityRecord],
    goals: &[CategoryGoal],
    today: NaiveDate,
    streak_category: Category,
) -> AggregateResponse {
    let streak_records = filter_category(records, streak_category);

    AggregateResponse {
        today,
        daily: aggregator.bucket_by_day(records),
        weekly: aggregator.bucket_by_week(records),
        streak_category,
        streak: aggregator.streak_report(&streak_records, today),
        longest_streak: longest_streak(&streak_records),
        goals: aggregator.compute_goal_completion(goals),
    }
}

fn default_streak_category() -> Category {
    Category::Mood
}

/// An explicit `today` wins; otherwise take the current day in the client's
/// zone so it agrees with dates derived from client timestamps.
fn resolve_today(today: Option<NaiveDate>, tz_offset_minutes: Option<i32>) -> NaiveDate {
    today.unwrap_or_else(|| {
        today_in_offset(chrono::Utc::now(), tz_offset_minutes.unwrap_or(0))
    })
}

// ─── Stateless Aggregation ───────────────────────────────────

#[derive(Deserialize, Validate)]
pub struct AggregateRequest {
    #[validate(length(max = 5000))]
    pub records: Vec<RawActivityRow>,
    #[serde(default)]
    #[validate(length(max = 16))]
    pub goals: Vec<CategoryGoal>,
    /// Defaults to the current date at `tz_offset_minutes`
    pub today: Option<NaiveDate>,
    /// Client offset east of UTC in minutes, within UTC-14:00..=UTC+14:00
    #[validate(range(min = -840, max = 840))]
    pub tz_offset_minutes: Option<i32>,
    #[serde(default = "default_streak_category")]
    pub streak_category: Category,
}

/// Aggregate a client-supplied snapshot. Any malformed row rejects the request.
async fn aggregate(
    State(state): State<Arc<AppState>>,
    Json(request): Json<AggregateRequest>,
) -> Result<Json<AggregateResponse>> {
    request.validate()?;

    let records: Vec<ActivityRecord> = request
        .records
        .into_iter()
        .enumerate()
        .map(|(index, row)| {
            row.into_record(None)
                .map_err(|source| AppError::InvalidRecord { index, source })
        })
        .collect::<Result<_>>()?;

    let today = resolve_today(request.today, request.tz_offset_minutes);

    tracing::debug!(
        records = records.len(),
        goals = request.goals.len(),
        %today,
        "Aggregating posted snapshot"
    );

    Ok(Json(build_aggregates(
        &state.aggregator,
        &records,
        &request.goals,
        today,
        request.streak_category,
    )))
}

// ─── User Summary ────────────────────────────────────────────

#[derive(Deserialize, Validate)]
struct SummaryQuery {
    /// History window in days (defaults to config)
    #[validate(range(min = 1, max = 365))]
    days: Option<u32>,
    today: Option<NaiveDate>,
    #[validate(range(min = -840, max = 840))]
    tz_offset_minutes: Option<i32>,
    #[serde(default = "default_streak_category")]
    streak_category: Category,
}

#[derive(Serialize, Debug)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "app/src/lib/generated/")
)]
pub struct SummaryResponse {
    pub user_id: String,
    pub days: u32,
    pub generated_at: String,
    #[serde(flatten)]
    pub aggregates: AggregateResponse,
}

fn validate_user_id(user_id: &str) -> Result<()> {
    let valid = !user_id.is_empty()
        && user_id.len() <= MAX_USER_ID_LEN
        && user_id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
    if valid {
        Ok(())
    } else {
        Err(AppError::BadRequest("Invalid user id".to_string()))
    }
}

/// Fetch a user's recent rows from the backend and aggregate them.
///
/// A category that fails to load is treated as empty, so the screen still
/// renders whatever else is available. Goal completion uses today's bucket.
async fn get_summary(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<String>,
    Query(params): Query<SummaryQuery>,
) -> Result<Json<SummaryResponse>> {
    validate_user_id(&user_id)?;
    params.validate()?;

    let days = params
        .days
        .unwrap_or(state.config.history_days)
        .min(MAX_HISTORY_DAYS);
    let today = resolve_today(params.today, params.tz_offset_minutes);

    // The streak needs its full lookback even when the history window is short
    let fetch_days = days.max(state.aggregator.streak_lookback());
    let since = window_start(today, fetch_days);

    tracing::debug!(
        user_id = %user_id,
        days,
        fetch_days,
        %today,
        "Building summary"
    );

    let (fetched, targets) = tokio::join!(
        state
            .db
            .fetch_all_records_or_empty(&user_id, since, MAX_ROWS_PER_CATEGORY),
        state.db.fetch_goal_targets_or_empty(&user_id),
    );

    let history = window(&fetched, today, days);
    let mut aggregates = build_aggregates(
        &state.aggregator,
        &history,
        &[],
        today,
        params.streak_category,
    );

    // Streaks look past the history window, up to the lookback
    let streak_records = filter_category(&fetched, params.streak_category);
    aggregates.streak = state.aggregator.streak_report(&streak_records, today);
    aggregates.longest_streak = longest_streak(&streak_records);

    let today_bucket = aggregates.daily.iter().find(|b| b.date == today);
    let goals = goals_for_day(&targets, today_bucket);
    aggregates.goals = state.aggregator.compute_goal_completion(&goals);

    tracing::info!(
        user_id = %user_id,
        records = fetched.len(),
        days_with_data = aggregates.daily.len(),
        streak = aggregates.streak.current,
        goal_percent = aggregates.goals.percent,
        "Summary built"
    );

    Ok(Json(SummaryResponse {
        user_id,
        days,
        generated_at: format_utc_rfc3339(chrono::Utc::now()),
        aggregates,
    }))
}
