//! Core types for the quitpulse engine
//!
//! This module defines the data structures that flow through the engine:
//! normalized log entries, per-day aggregates, correlation output, recovery
//! milestones, streak state, and reward tiers.

use chrono::{DateTime, Duration, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Kind of logged observation, one per source table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogKind {
    Mood,
    Energy,
    Focus,
    Step,
    Progress,
}

impl LogKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogKind::Mood => "mood",
            LogKind::Energy => "energy",
            LogKind::Focus => "focus",
            LogKind::Step => "step",
            LogKind::Progress => "progress",
        }
    }
}

/// Flag attached to a log entry during normalization
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogFlag {
    /// Energy entry recorded alongside physical activity
    PhysicalActivity,
    /// Mood entry recorded during or about a craving episode
    CravingRelated,
}

/// Uniform log entry produced by the normalizer
///
/// `local_date` is derived exactly once, at normalization time, from the
/// configured UTC offset. Downstream consumers bucket by this field and never
/// re-derive a date from the UTC timestamp.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogEntry {
    pub kind: LogKind,
    /// Original observation instant (UTC)
    pub timestamp: DateTime<Utc>,
    /// Calendar date in the user's local zone
    pub local_date: NaiveDate,
    /// Primary numeric value; `None` when the source record omitted it
    pub value: Option<f64>,
    /// Flags derived from source-table fields
    #[serde(default)]
    pub flags: Vec<LogFlag>,
    /// Sleep hours riding on the record, usable even when `value` is absent
    pub sleep_hours: Option<f64>,
}

impl LogEntry {
    pub fn has_flag(&self, flag: LogFlag) -> bool {
        self.flags.contains(&flag)
    }
}

/// Inclusive calendar date range
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self { start, end }
    }

    /// Trailing window of `n` days ending at `end` (inclusive)
    pub fn last_n_days(end: NaiveDate, n: u32) -> Self {
        Self {
            start: end - Duration::days(i64::from(n.saturating_sub(1))),
            end,
        }
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.start && date <= self.end
    }

    /// Iterate every date in the range, ascending
    pub fn days(&self) -> impl Iterator<Item = NaiveDate> + '_ {
        self.start.iter_days().take_while(move |d| *d <= self.end)
    }
}

/// One day's aggregated metrics
///
/// Invariant: a metric field is non-`None` iff its paired count is > 0.
/// Rebuilt fresh from the log window on every aggregation call, never
/// persisted or incrementally mutated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyMetrics {
    pub date: NaiveDate,
    /// Mean mood score for the day
    pub mood: Option<f64>,
    /// Mean energy level for the day
    pub energy: Option<f64>,
    /// Mean focus score for the day
    pub focus: Option<f64>,
    pub mood_count: u32,
    pub energy_count: u32,
    pub focus_count: u32,
    /// Entries flagged as craving-related
    pub craving_related_count: u32,
    /// Entries flagged as physical activity
    pub physical_activity_count: u32,
    /// Last sleep-hours value logged for the day (snapshot, not averaged)
    pub average_sleep_hours: Option<f64>,
}

impl DailyMetrics {
    /// Placeholder for a date with zero entries
    pub fn empty(date: NaiveDate) -> Self {
        Self {
            date,
            mood: None,
            energy: None,
            focus: None,
            mood_count: 0,
            energy_count: 0,
            focus_count: 0,
            craving_related_count: 0,
            physical_activity_count: 0,
            average_sleep_hours: None,
        }
    }

    /// True when at least one metric was logged for this date
    pub fn has_data(&self) -> bool {
        self.mood_count > 0
            || self.energy_count > 0
            || self.focus_count > 0
            || self.craving_related_count > 0
            || self.physical_activity_count > 0
            || self.average_sleep_hours.is_some()
    }

    /// True when mood, energy, and focus are all present
    pub fn is_complete(&self) -> bool {
        self.mood.is_some() && self.energy.is_some() && self.focus.is_some()
    }
}

/// Cross-metric relationship coefficients over a daily-metrics window
///
/// The pairwise fields are mean-product co-movement indicators, not
/// normalized correlation coefficients; callers interpret them as relative
/// magnitudes. Impact fields are conditional mean ratios minus one.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CorrelationSet {
    pub mood_energy: f64,
    pub mood_focus: f64,
    pub energy_focus: f64,
    /// Relative energy lift on physical-activity days vs rest days
    pub physical_activity_impact: f64,
    /// Relative mood shift on craving days vs craving-free days
    pub craving_impact: f64,
    /// Relative energy lift on good-sleep days (>= 7h) vs poor-sleep days
    pub sleep_quality_impact: f64,
}

/// Calibration tuple for one recovery metric's improvement curve
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RecoveryCalibration {
    /// Day the slow initial phase ends
    pub onset_day: u32,
    /// Day the curve reaches its ceiling
    pub plateau_day: u32,
    /// Percentage at day zero
    pub floor_percent: f64,
    /// Percentage at and beyond the plateau
    pub ceiling_percent: f64,
}

impl RecoveryCalibration {
    pub fn new(onset_day: u32, plateau_day: u32, floor_percent: f64, ceiling_percent: f64) -> Self {
        Self {
            onset_day,
            plateau_day,
            floor_percent,
            ceiling_percent,
        }
    }
}

/// Named recovery metric with its curve calibration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricCalibration {
    /// Metric identifier, e.g. "mood" or "energy"
    pub metric: String,
    pub curve: RecoveryCalibration,
}

/// Static milestone reference data
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Milestone {
    pub title: String,
    /// Time from the quit event until the milestone, in hours
    pub timeline_hours: f64,
    pub description: String,
}

/// Milestone evaluated against a given quit-elapsed day count
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MilestoneStatus {
    pub milestone: Milestone,
    pub days_required: u32,
    pub achieved: bool,
    pub days_remaining: u32,
    /// 0-100, capped at 100 once achieved
    pub progress_percent: f64,
}

/// One day of the goal series consumed by the streak tracker
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GoalDay {
    pub date: NaiveDate,
    pub goal_met: bool,
}

/// Streak evaluation result
///
/// `current_streak` is derived fresh each evaluation; `longest_streak` is the
/// watermark the caller persists when it increases.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StreakState {
    pub current_streak: u32,
    pub longest_streak: u32,
    pub last_goal_met_date: Option<NaiveDate>,
}

/// One step of the cumulative-reward ladder
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RewardTier {
    /// Inclusive lower bound on the period's cumulative total
    pub threshold_value: f64,
    pub label: String,
    pub discount_percent: f64,
}

impl RewardTier {
    /// Sentinel returned when the total is below the lowest ladder step
    pub fn none() -> Self {
        Self {
            threshold_value: 0.0,
            label: "None".to_string(),
            discount_percent: 0.0,
        }
    }
}
