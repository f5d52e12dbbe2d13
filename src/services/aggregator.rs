// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Activity aggregation: daily/weekly buckets, streaks and goal completion.
//!
//! Every operation is a pure function over a record snapshot. Callers fetch
//! fresh records, aggregate, and throw the result away on the next refresh.

use crate::models::{
    ActivityRecord, Category, CategoryGoal, DailyBucket, GoalCompletion, GoalStatus, GoalTarget,
    StreakReport, WeeklyBucket,
};
use crate::time_utils::{days_between, week_start, window_start};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// Default number of most-recent records considered for a streak.
pub const DEFAULT_STREAK_LOOKBACK: u32 = 30;

/// How multiple sleep entries on the same day are combined.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DailySleepRule {
    /// The last entry in iteration order overwrites earlier ones
    #[default]
    LastWrite,
    /// Mean of the day's entries
    Average,
}

/// Stateless aggregator. Only holds options.
#[derive(Debug, Clone, Copy)]
pub struct ActivityAggregator {
    daily_sleep: DailySleepRule,
    streak_lookback: u32,
}

impl Default for ActivityAggregator {
    fn default() -> Self {
        Self {
            daily_sleep: DailySleepRule::default(),
            streak_lookback: DEFAULT_STREAK_LOOKBACK,
        }
    }
}

impl ActivityAggregator {
    pub fn new(daily_sleep: DailySleepRule, streak_lookback: u32) -> Self {
        Self {
            daily_sleep,
            streak_lookback,
        }
    }

    pub fn streak_lookback(&self) -> u32 {
        self.streak_lookback
    }

    /// Group records by calendar date, most recent day first.
    pub fn bucket_by_day(&self, records: &[ActivityRecord]) -> Vec<DailyBucket> {
        let mut buckets: BTreeMap<NaiveDate, DailyBucket> = BTreeMap::new();
        // (sum, count) of sleep per day, only needed for the average rule
        let mut sleep: BTreeMap<NaiveDate, (f64, u32)> = BTreeMap::new();

        for record in records {
            let bucket = buckets
                .entry(record.date)
                .or_insert_with(|| DailyBucket::new(record.date));
            bucket.record_count += 1;

            if record.category != Category::Sleep {
                bucket.totals.add(record.category, record.value);
                continue;
            }

            match self.daily_sleep {
                DailySleepRule::LastWrite => bucket.totals.set(Category::Sleep, record.value),
                DailySleepRule::Average => {
                    let entry = sleep.entry(record.date).or_insert((0.0, 0));
                    entry.0 += record.value;
                    entry.1 += 1;
                    bucket.totals.set(Category::Sleep, entry.0 / f64::from(entry.1));
                }
            }
        }

        buckets.into_values().rev().collect()
    }

    /// Group records by Sunday-anchored week, most recent week first.
    ///
    /// Unlike the daily view, sleep is never overwritten here: all of the
    /// week's entries are kept and averaged into `avg_sleep`.
    pub fn bucket_by_week(&self, records: &[ActivityRecord]) -> Vec<WeeklyBucket> {
        #[derive(Default)]
        struct WeekAcc {
            totals: crate::models::CategoryTotals,
            sleep_values: Vec<f64>,
            dates: BTreeSet<NaiveDate>,
        }

        let mut weeks: BTreeMap<NaiveDate, WeekAcc> = BTreeMap::new();
        for record in records {
            let acc = weeks.entry(week_start(record.date)).or_default();
            acc.totals.add(record.category, record.value);
            acc.dates.insert(record.date);
            if record.category == Category::Sleep {
                acc.sleep_values.push(record.value);
            }
        }

        weeks
            .into_iter()
            .rev()
            .map(|(week_start, acc)| WeeklyBucket {
                week_start,
                totals: acc.totals,
                avg_sleep: mean(&acc.sleep_values),
                sleep_entries: acc.sleep_values.len() as u32,
                days_active: acc.dates.len() as u32,
            })
            .collect()
    }

    /// Consecutive-day streak ending today.
    ///
    /// `records` must be a single category, sorted most recent first. The
    /// i-th record has to be exactly i days before `today`; the walk stops at
    /// the first record where that does not hold. Only the first
    /// `streak_lookback` records are considered.
    pub fn compute_streak(&self, records: &[ActivityRecord], today: NaiveDate) -> u32 {
        let mut streak = 0;
        for (i, record) in records
            .iter()
            .take(self.streak_lookback as usize)
            .enumerate()
        {
            if days_between(today, record.date) != i as i64 {
                break;
            }
            streak += 1;
        }
        streak
    }

    /// [`compute_streak`](Self::compute_streak) plus lookback metadata.
    pub fn streak_report(&self, records: &[ActivityRecord], today: NaiveDate) -> StreakReport {
        let current = self.compute_streak(records, today);
        StreakReport {
            current,
            lookback: self.streak_lookback,
            capped: self.streak_lookback > 0 && current == self.streak_lookback,
        }
    }

    /// Share of enabled goals met. Goals that are disabled or have no
    /// positive target are left out of both numerator and denominator.
    pub fn compute_goal_completion(&self, goals: &[CategoryGoal]) -> GoalCompletion {
        let goals: Vec<GoalStatus> = goals
            .iter()
            .filter(|g| g.is_active())
            .map(|g| GoalStatus {
                category: g.category,
                target: g.target,
                completed: g.completed,
                met: g.is_met(),
            })
            .collect();

        let total_count = goals.len() as u32;
        let met_count = goals.iter().filter(|g| g.met).count() as u32;
        let percent = if total_count == 0 {
            0
        } else {
            (100.0 * f64::from(met_count) / f64::from(total_count)).round() as u32
        };

        GoalCompletion {
            percent,
            met_count,
            total_count,
            goals,
        }
    }
}

/// Longest run of consecutive calendar days with at least one record.
/// Input order does not matter and same-day duplicates collapse.
pub fn longest_streak(records: &[ActivityRecord]) -> u32 {
    let days: BTreeSet<NaiveDate> = records.iter().map(|r| r.date).collect();

    let mut longest = 0;
    let mut current = 0;
    let mut previous: Option<NaiveDate> = None;
    for day in days {
        current = match previous {
            Some(prev) if days_between(day, prev) == 1 => current + 1,
            _ => 1,
        };
        longest = longest.max(current);
        previous = Some(day);
    }
    longest
}

/// Pair goal targets with what was logged in `bucket` (nothing if `None`).
pub fn goals_for_day(targets: &[GoalTarget], bucket: Option<&DailyBucket>) -> Vec<CategoryGoal> {
    targets
        .iter()
        .map(|t| CategoryGoal {
            category: t.category,
            enabled: t.enabled,
            target: t.target,
            completed: bucket.map(|b| b.totals.get(t.category)).unwrap_or(0.0),
        })
        .collect()
}

/// Records of one category, most recent first (stable for equal dates).
pub fn filter_category(records: &[ActivityRecord], category: Category) -> Vec<ActivityRecord> {
    let mut filtered: Vec<ActivityRecord> = records
        .iter()
        .filter(|r| r.category == category)
        .cloned()
        .collect();
    filtered.sort_by(|a, b| b.date.cmp(&a.date).then(b.timestamp.cmp(&a.timestamp)));
    filtered
}

/// Records dated within the last `days` calendar days up to and including `today`.
pub fn window(records: &[ActivityRecord], today: NaiveDate, days: u32) -> Vec<ActivityRecord> {
    let start = window_start(today, days);
    records
        .iter()
        .filter(|r| r.date >= start && r.date <= today)
        .cloned()
        .collect()
}

fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Days;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn rec(category: Category, date: NaiveDate, value: f64) -> ActivityRecord {
        ActivityRecord::on_date(category, date, value).unwrap()
    }

    fn days_ago(today: NaiveDate, n: u64) -> NaiveDate {
        today.checked_sub_days(Days::new(n)).unwrap()
    }

    #[test]
    fn test_bucket_by_day_sums_and_sorts_descending() {
        let agg = ActivityAggregator::default();
        let records = vec![
            rec(Category::Water, d(2024, 3, 9), 250.0),
            rec(Category::Water, d(2024, 3, 10), 500.0),
            rec(Category::Exercise, d(2024, 3, 10), 30.0),
            rec(Category::Water, d(2024, 3, 10), 250.0),
        ];

        let buckets = agg.bucket_by_day(&records);

        assert_eq!(buckets.len(), 2);
        assert_eq!(buckets[0].date, d(2024, 3, 10));
        assert_eq!(buckets[0].totals.water, 750.0);
        assert_eq!(buckets[0].totals.exercise, 30.0);
        assert_eq!(buckets[0].record_count, 3);
        assert_eq!(buckets[1].date, d(2024, 3, 9));
        assert_eq!(buckets[1].totals.water, 250.0);
    }

    #[test]
    fn test_bucket_by_day_sleep_last_write_wins() {
        let agg = ActivityAggregator::default();
        let records = vec![
            rec(Category::Sleep, d(2024, 3, 10), 8.0),
            rec(Category::Sleep, d(2024, 3, 10), 5.5),
        ];

        let buckets = agg.bucket_by_day(&records);
        assert_eq!(buckets[0].totals.sleep, 5.5);
    }

    #[test]
    fn test_bucket_by_day_sleep_average_rule() {
        let agg = ActivityAggregator::new(DailySleepRule::Average, DEFAULT_STREAK_LOOKBACK);
        let records = vec![
            rec(Category::Sleep, d(2024, 3, 10), 8.0),
            rec(Category::Sleep, d(2024, 3, 10), 5.0),
            rec(Category::Sleep, d(2024, 3, 9), 7.0),
        ];

        let buckets = agg.bucket_by_day(&records);
        assert_eq!(buckets[0].totals.sleep, 6.5);
        assert_eq!(buckets[1].totals.sleep, 7.0);
    }

    #[test]
    fn test_bucket_by_day_empty() {
        assert!(ActivityAggregator::default().bucket_by_day(&[]).is_empty());
    }

    #[test]
    fn test_bucket_by_week_sunday_anchor_and_sleep_mean() {
        let agg = ActivityAggregator::default();
        // Week of Sunday 2024-03-10
        let records = vec![
            rec(Category::Sleep, d(2024, 3, 10), 8.0),
            rec(Category::Sleep, d(2024, 3, 10), 6.0),
            rec(Category::Sleep, d(2024, 3, 12), 7.0),
            rec(Category::Exercise, d(2024, 3, 16), 45.0),
            // Previous week (Saturday)
            rec(Category::Water, d(2024, 3, 9), 1000.0),
        ];

        let weeks = agg.bucket_by_week(&records);

        assert_eq!(weeks.len(), 2);
        assert_eq!(weeks[0].week_start, d(2024, 3, 10));
        assert_eq!(weeks[0].avg_sleep, 7.0);
        assert_eq!(weeks[0].sleep_entries, 3);
        assert_eq!(weeks[0].totals.sleep, 21.0);
        assert_eq!(weeks[0].totals.exercise, 45.0);
        assert_eq!(weeks[0].days_active, 3);

        assert_eq!(weeks[1].week_start, d(2024, 3, 3));
        assert_eq!(weeks[1].avg_sleep, 0.0);
        assert_eq!(weeks[1].days_active, 1);
    }

    #[test]
    fn test_streak_consecutive_and_gap() {
        let agg = ActivityAggregator::default();
        let today = d(2024, 3, 10);

        let consecutive = vec![
            rec(Category::Mood, today, 1.0),
            rec(Category::Mood, days_ago(today, 1), 1.0),
            rec(Category::Mood, days_ago(today, 2), 1.0),
        ];
        assert_eq!(agg.compute_streak(&consecutive, today), 3);

        let gap = vec![
            rec(Category::Mood, today, 1.0),
            rec(Category::Mood, days_ago(today, 2), 1.0),
        ];
        assert_eq!(agg.compute_streak(&gap, today), 1);
    }

    #[test]
    fn test_streak_zero_when_today_missing() {
        let agg = ActivityAggregator::default();
        let today = d(2024, 3, 10);
        let records = vec![
            rec(Category::Mood, days_ago(today, 1), 1.0),
            rec(Category::Mood, days_ago(today, 2), 1.0),
        ];
        assert_eq!(agg.compute_streak(&records, today), 0);
        assert_eq!(agg.compute_streak(&[], today), 0);
    }

    #[test]
    fn test_streak_stops_at_same_day_duplicate() {
        // Position-index matching: a second entry for today sits at index 1
        // but is 0 days old, which ends the walk.
        let agg = ActivityAggregator::default();
        let today = d(2024, 3, 10);
        let records = vec![
            rec(Category::Mood, today, 1.0),
            rec(Category::Mood, today, 1.0),
            rec(Category::Mood, days_ago(today, 1), 1.0),
        ];
        assert_eq!(agg.compute_streak(&records, today), 1);
    }

    #[test]
    fn test_streak_report_capped_by_lookback() {
        let agg = ActivityAggregator::new(DailySleepRule::LastWrite, 5);
        let today = d(2024, 3, 10);
        let records: Vec<_> = (0..10)
            .map(|n| rec(Category::Mood, days_ago(today, n), 1.0))
            .collect();

        let report = agg.streak_report(&records, today);
        assert_eq!(report.current, 5);
        assert_eq!(report.lookback, 5);
        assert!(report.capped);

        let short = agg.streak_report(&records[..3], today);
        assert_eq!(short.current, 3);
        assert!(!short.capped);
    }

    #[test]
    fn test_goal_completion() {
        let agg = ActivityAggregator::default();
        let goals = vec![
            CategoryGoal {
                category: Category::Water,
                enabled: true,
                target: 8.0,
                completed: 8.0,
            },
            CategoryGoal {
                category: Category::Sleep,
                enabled: true,
                target: 7.0,
                completed: 5.0,
            },
        ];

        let result = agg.compute_goal_completion(&goals);
        assert_eq!(result.percent, 50);
        assert_eq!(result.met_count, 1);
        assert_eq!(result.total_count, 2);
        assert!(result.goals[0].met);
        assert!(!result.goals[1].met);
    }

    #[test]
    fn test_goal_completion_skips_disabled_and_zero_targets() {
        let agg = ActivityAggregator::default();
        let goals = vec![
            CategoryGoal {
                category: Category::Water,
                enabled: false,
                target: 8.0,
                completed: 0.0,
            },
            CategoryGoal {
                category: Category::Meditation,
                enabled: true,
                target: 0.0,
                completed: 0.0,
            },
            CategoryGoal {
                category: Category::Exercise,
                enabled: true,
                target: 30.0,
                completed: 45.0,
            },
        ];

        let result = agg.compute_goal_completion(&goals);
        assert_eq!(result.total_count, 1);
        assert_eq!(result.met_count, 1);
        assert_eq!(result.percent, 100);
    }

    #[test]
    fn test_goal_completion_rounds() {
        let agg = ActivityAggregator::default();
        let goal = |met: bool| CategoryGoal {
            category: Category::Journal,
            enabled: true,
            target: 1.0,
            completed: if met { 1.0 } else { 0.0 },
        };

        // 2 of 3 -> 66.67 -> 67
        let result = agg.compute_goal_completion(&[goal(true), goal(true), goal(false)]);
        assert_eq!(result.percent, 67);

        // 1 of 8 -> 12.5 -> 13
        let mut goals = vec![goal(true)];
        goals.extend((0..7).map(|_| goal(false)));
        assert_eq!(agg.compute_goal_completion(&goals).percent, 13);

        assert_eq!(agg.compute_goal_completion(&[]), GoalCompletion::default());
    }

    #[test]
    fn test_longest_streak() {
        let records = vec![
            rec(Category::Journal, d(2024, 3, 1), 1.0),
            rec(Category::Journal, d(2024, 3, 5), 1.0),
            rec(Category::Journal, d(2024, 3, 2), 1.0),
            rec(Category::Journal, d(2024, 3, 2), 1.0),
            rec(Category::Journal, d(2024, 3, 4), 1.0),
            rec(Category::Journal, d(2024, 3, 6), 1.0),
            rec(Category::Journal, d(2024, 3, 7), 1.0),
        ];
        assert_eq!(longest_streak(&records), 4);
        assert_eq!(longest_streak(&[]), 0);
    }

    #[test]
    fn test_goals_for_day() {
        let targets = vec![
            GoalTarget {
                category: Category::Water,
                enabled: true,
                target: 2000.0,
            },
            GoalTarget {
                category: Category::Exercise,
                enabled: true,
                target: 30.0,
            },
        ];
        let mut bucket = DailyBucket::new(d(2024, 3, 10));
        bucket.totals.add(Category::Water, 2250.0);

        let goals = goals_for_day(&targets, Some(&bucket));
        assert_eq!(goals[0].completed, 2250.0);
        assert_eq!(goals[1].completed, 0.0);

        let empty = goals_for_day(&targets, None);
        assert!(empty.iter().all(|g| g.completed == 0.0));
    }

    #[test]
    fn test_filter_category_sorts_most_recent_first() {
        let records = vec![
            rec(Category::Mood, d(2024, 3, 8), 1.0),
            rec(Category::Water, d(2024, 3, 10), 1.0),
            rec(Category::Mood, d(2024, 3, 10), 1.0),
        ];
        let moods = filter_category(&records, Category::Mood);
        assert_eq!(moods.len(), 2);
        assert_eq!(moods[0].date, d(2024, 3, 10));
        assert_eq!(moods[1].date, d(2024, 3, 8));
    }

    #[test]
    fn test_window_bounds() {
        let today = d(2024, 3, 10);
        let records = vec![
            rec(Category::Water, today, 1.0),
            rec(Category::Water, days_ago(today, 6), 1.0),
            rec(Category::Water, days_ago(today, 7), 1.0),
            rec(Category::Water, d(2024, 3, 11), 1.0),
        ];
        assert_eq!(window(&records, today, 7).len(), 2);
    }
}
