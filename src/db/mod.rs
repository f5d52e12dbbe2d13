//! Database layer (hosted PostgREST backend).

pub mod rest;

pub use rest::RestDb;

use crate::models::Category;

/// Where a category's rows live and which columns carry date and value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TableSpec {
    pub table: &'static str,
    /// Column holding the calendar day; when absent the day is derived
    /// from `created_at`
    pub date_column: Option<&'static str>,
    /// Column holding the magnitude; when absent every row counts as 1
    pub value_column: Option<&'static str>,
}

impl TableSpec {
    /// Column used for the date-window filter and ordering.
    pub fn filter_column(&self) -> &'static str {
        self.date_column.unwrap_or(tables::CREATED_AT)
    }
}

/// Table and column names as constants.
pub mod tables {
    pub const EXERCISE: &str = "exercise_logs";
    pub const WATER: &str = "water_intake";
    pub const SLEEP: &str = "sleep_logs";
    pub const WORKOUTS: &str = "workouts";
    pub const MEDITATION: &str = "meditation_sessions";
    pub const JOURNAL: &str = "journal_entries";
    pub const MOOD: &str = "mood_entries";
    /// Per-user goal configuration
    pub const GOALS: &str = "user_goals";

    pub const USER_ID: &str = "user_id";
    pub const CREATED_AT: &str = "created_at";
}

/// Table layout for a category.
pub fn table_for(category: Category) -> TableSpec {
    let (table, date_column, value_column) = match category {
        Category::Exercise => (tables::EXERCISE, Some("date"), Some("duration_minutes")),
        Category::Water => (tables::WATER, Some("date"), Some("amount_ml")),
        Category::Sleep => (tables::SLEEP, Some("date"), Some("hours")),
        Category::Workout => (tables::WORKOUTS, None, None),
        Category::Meditation => (tables::MEDITATION, None, Some("duration_minutes")),
        Category::Journal => (tables::JOURNAL, None, None),
        Category::Mood => (tables::MOOD, None, None),
    };
    TableSpec {
        table,
        date_column,
        value_column,
    }
}
