// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Client for the hosted record backend with typed operations.
//!
//! Provides read access to:
//! - Activity rows, one table per category
//! - Goal configuration rows
//!
//! Rows are converted at this boundary. Malformed rows are skipped and
//! logged so a single bad entry never blanks a whole screen.

use crate::db::{table_for, tables, TableSpec};
use crate::error::AppError;
use crate::models::{ActivityRecord, Category, GoalTarget, RawActivityRow};
use chrono::NaiveDate;
use futures_util::{stream, StreamExt};
use serde_json::Value;
use std::sync::Arc;

const MAX_CONCURRENT_FETCHES: usize = 4;

/// Record backend client.
#[derive(Clone)]
pub struct RestDb {
    backend: Backend,
}

#[derive(Clone)]
enum Backend {
    Remote(RemoteClient),
    Fixture(Arc<Fixture>),
    Offline,
}

#[derive(Clone)]
struct RemoteClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
}

/// In-memory rows served by a fixture backend.
#[derive(Debug, Default)]
struct Fixture {
    records: Vec<ActivityRecord>,
    goals: Vec<GoalTarget>,
}

impl RestDb {
    /// Create a client for a PostgREST-style backend at `base_url`.
    pub fn new(base_url: &str, api_key: &str) -> Self {
        tracing::info!(url = base_url, "Record backend configured");
        Self {
            backend: Backend::Remote(RemoteClient {
                http: reqwest::Client::new(),
                base_url: base_url.trim_end_matches('/').to_string(),
                api_key: api_key.to_string(),
            }),
        }
    }

    /// Create a mock client for testing (offline mode).
    ///
    /// All fetch operations will return an error if called.
    pub fn new_mock() -> Self {
        Self {
            backend: Backend::Offline,
        }
    }

    /// Create a client that serves the given rows from memory.
    pub fn with_fixtures(records: Vec<ActivityRecord>, goals: Vec<GoalTarget>) -> Self {
        Self {
            backend: Backend::Fixture(Arc::new(Fixture { records, goals })),
        }
    }

    // ─── Activity Records ────────────────────────────────────────

    /// Fetch one category's records dated on or after `since`, most recent first.
    pub async fn fetch_records(
        &self,
        user_id: &str,
        category: Category,
        since: NaiveDate,
        limit: u32,
    ) -> Result<Vec<ActivityRecord>, AppError> {
        match &self.backend {
            Backend::Remote(client) => {
                let spec = table_for(category);
                let rows = client.select_rows(&spec, user_id, since, limit).await?;
                let (records, skipped) = convert_rows(&spec, category, rows);
                if skipped > 0 {
                    tracing::warn!(
                        user_id,
                        category = %category,
                        skipped,
                        "Skipped malformed rows"
                    );
                }
                Ok(records)
            }
            Backend::Fixture(fixture) => {
                let mut records: Vec<ActivityRecord> = fixture
                    .records
                    .iter()
                    .filter(|r| r.category == category && r.date >= since)
                    .cloned()
                    .collect();
                records.sort_by(|a, b| b.date.cmp(&a.date).then(b.timestamp.cmp(&a.timestamp)));
                records.truncate(limit as usize);
                Ok(records)
            }
            Backend::Offline => Err(offline_error()),
        }
    }

    /// Like [`fetch_records`](Self::fetch_records) but an error yields no records.
    pub async fn fetch_records_or_empty(
        &self,
        user_id: &str,
        category: Category,
        since: NaiveDate,
        limit: u32,
    ) -> Vec<ActivityRecord> {
        match self.fetch_records(user_id, category, since, limit).await {
            Ok(records) => records,
            Err(e) => {
                tracing::warn!(
                    user_id,
                    category = %category,
                    error = %e,
                    "Failed to fetch records, treating as empty"
                );
                Vec::new()
            }
        }
    }

    /// Fetch every category concurrently, each falling back to empty on error.
    pub async fn fetch_all_records_or_empty(
        &self,
        user_id: &str,
        since: NaiveDate,
        limit: u32,
    ) -> Vec<ActivityRecord> {
        let batches: Vec<Vec<ActivityRecord>> = stream::iter(Category::ALL)
            .map(|category| self.fetch_records_or_empty(user_id, category, since, limit))
            .buffer_unordered(MAX_CONCURRENT_FETCHES)
            .collect()
            .await;

        batches.into_iter().flatten().collect()
    }

    // ─── Goals ───────────────────────────────────────────────────

    /// Fetch a user's goal configuration.
    pub async fn fetch_goal_targets(&self, user_id: &str) -> Result<Vec<GoalTarget>, AppError> {
        match &self.backend {
            Backend::Remote(client) => {
                let rows = client.select_goals(user_id).await?;
                let (goals, skipped) = convert_goal_rows(rows);
                if skipped > 0 {
                    tracing::warn!(user_id, skipped, "Skipped malformed goal rows");
                }
                Ok(goals)
            }
            Backend::Fixture(fixture) => Ok(fixture.goals.clone()),
            Backend::Offline => Err(offline_error()),
        }
    }

    pub async fn fetch_goal_targets_or_empty(&self, user_id: &str) -> Vec<GoalTarget> {
        self.fetch_goal_targets(user_id)
            .await
            .unwrap_or_else(|e| {
                tracing::warn!(user_id, error = %e, "Failed to fetch goals, treating as empty");
                Vec::new()
            })
    }
}

impl RemoteClient {
    async fn select_rows(
        &self,
        spec: &TableSpec,
        user_id: &str,
        since: NaiveDate,
        limit: u32,
    ) -> Result<Vec<Value>, AppError> {
        let filter_column = spec.filter_column();
        let query = [
            (tables::USER_ID.to_string(), format!("eq.{}", user_id)),
            (filter_column.to_string(), format!("gte.{}", since)),
            ("order".to_string(), format!("{}.desc", filter_column)),
            ("limit".to_string(), limit.to_string()),
        ];
        self.get_json(spec.table, &query).await
    }

    async fn select_goals(&self, user_id: &str) -> Result<Vec<Value>, AppError> {
        let query = [(tables::USER_ID.to_string(), format!("eq.{}", user_id))];
        self.get_json(tables::GOALS, &query).await
    }

    /// GET a table with PostgREST filters and parse the JSON array body.
    async fn get_json(
        &self,
        table: &str,
        query: &[(String, String)],
    ) -> Result<Vec<Value>, AppError> {
        let url = format!("{}/rest/v1/{}", self.base_url, table);

        let response = self
            .http
            .get(&url)
            .header("apikey", &self.api_key)
            .bearer_auth(&self.api_key)
            .query(query)
            .send()
            .await
            .map_err(|e| AppError::Backend(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::Backend(format!("HTTP {}: {}", status, body)));
        }

        response
            .json::<Vec<Value>>()
            .await
            .map_err(|e| AppError::Backend(format!("Invalid response from {}: {}", table, e)))
    }
}

fn offline_error() -> AppError {
    AppError::Backend("Backend not connected (offline mode)".to_string())
}

/// Map a table row onto the raw boundary shape.
fn row_to_raw(spec: &TableSpec, row: &Value) -> RawActivityRow {
    let text = |column: &str| row.get(column).and_then(Value::as_str).map(String::from);

    RawActivityRow {
        category: None,
        date: spec.date_column.and_then(text),
        timestamp: text(tables::CREATED_AT),
        value: match spec.value_column {
            Some(column) => row.get(column).filter(|v| !v.is_null()).cloned(),
            None => Some(Value::from(1)),
        },
    }
}

/// Convert table rows, returning the good records and how many were skipped.
fn convert_rows(
    spec: &TableSpec,
    category: Category,
    rows: Vec<Value>,
) -> (Vec<ActivityRecord>, usize) {
    let total = rows.len();
    let records: Vec<ActivityRecord> = rows
        .iter()
        .filter_map(|row| match row_to_raw(spec, row).into_record(Some(category)) {
            Ok(record) => Some(record),
            Err(e) => {
                tracing::debug!(category = %category, error = %e, "Rejected row");
                None
            }
        })
        .collect();
    let skipped = total - records.len();
    (records, skipped)
}

fn convert_goal_rows(rows: Vec<Value>) -> (Vec<GoalTarget>, usize) {
    let total = rows.len();
    let goals: Vec<GoalTarget> = rows
        .into_iter()
        .filter_map(|row| serde_json::from_value::<GoalTarget>(row).ok())
        .filter(|g| g.target.is_finite())
        .collect();
    let skipped = total - goals.len();
    (goals, skipped)
}
