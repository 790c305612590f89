//! Pipeline orchestration
//!
//! This module provides the public facade for the quitpulse engine. It wires
//! the stages together: normalization → daily aggregation → {correlations,
//! streak} plus the quit-time-keyed recovery curve, milestones, and reward
//! resolution, and bundles the results into a progress report.
//!
//! Every stage is a pure computation over in-memory data; the facade's only
//! ambient input is the wall clock used to derive "today" when the caller
//! does not supply one.

use crate::aggregate::DailyAggregator;
use crate::config::EngineConfig;
use crate::correlation::CorrelationEngine;
use crate::error::EngineError;
use crate::normalizer::{LogNormalizer, RawLogBatch};
use crate::recovery::{evaluate_milestones, recovery_percent};
use crate::report::{MetricRecovery, ProgressSummary, ReportEncoder, ReportWindow};
use crate::rewards::resolve_reward_tier;
use crate::streak::StreakTracker;
use crate::types::{
    CorrelationSet, DailyMetrics, DateRange, GoalDay, LogEntry, MilestoneStatus, RewardTier,
    StreakState,
};
use chrono::{NaiveDate, Utc};

/// Default trailing window for report aggregation, in days
pub const DEFAULT_WINDOW_DAYS: u32 = 30;

/// Convert a raw log batch JSON into a complete progress-report JSON.
///
/// Convenience entry point for callers that do not need to hold an engine:
/// normalizes the batch, aggregates the trailing window ending today, and
/// encodes the full report.
pub fn logs_to_report_json(
    raw_json: &str,
    config: &EngineConfig,
    quit_date: NaiveDate,
    total_saved: f64,
    persisted_longest: u32,
) -> Result<String, EngineError> {
    let engine = ProgressEngine::new(config.clone());
    let entries = engine.normalize_json(raw_json)?;
    let today = engine.today();
    let summary = engine.build_summary(
        &entries,
        quit_date,
        today,
        DEFAULT_WINDOW_DAYS,
        total_saved,
        persisted_longest,
    );
    ReportEncoder::new().encode_to_json(summary)
}

/// Facade over the engine's components, holding the caller-supplied
/// configuration
pub struct ProgressEngine {
    config: EngineConfig,
    normalizer: LogNormalizer,
}

impl Default for ProgressEngine {
    fn default() -> Self {
        Self::new(EngineConfig::default())
    }
}

impl ProgressEngine {
    pub fn new(config: EngineConfig) -> Self {
        let normalizer = LogNormalizer::new(config.offset());
        Self { config, normalizer }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Today's date in the configured local zone
    pub fn today(&self) -> NaiveDate {
        Utc::now().with_timezone(&self.config.offset()).date_naive()
    }

    /// Normalize a typed raw batch
    pub fn normalize_logs(&self, batch: &RawLogBatch) -> Vec<LogEntry> {
        self.normalizer.normalize(batch)
    }

    /// Normalize a raw batch from JSON
    pub fn normalize_json(&self, raw_json: &str) -> Result<Vec<LogEntry>, EngineError> {
        self.normalizer.normalize_json(raw_json)
    }

    /// Aggregate entries into per-day metrics over an inclusive range
    pub fn aggregate_daily(
        &self,
        entries: &[LogEntry],
        range: DateRange,
        include_empty_days: bool,
    ) -> Vec<DailyMetrics> {
        DailyAggregator::aggregate(entries, range, include_empty_days)
    }

    /// Compute cross-metric correlations over a daily-metrics window
    pub fn compute_correlations(&self, daily: &[DailyMetrics]) -> CorrelationSet {
        CorrelationEngine::compute(daily)
    }

    /// Recovery percentage for one configured metric
    pub fn recovery_percent_for(&self, metric: &str, days_since_quit: i64) -> Option<f64> {
        self.config
            .calibration_for(metric)
            .map(|curve| recovery_percent(days_since_quit, curve))
    }

    /// Recovery percentages for every configured metric
    pub fn recovery_summary(&self, days_since_quit: i64) -> Vec<MetricRecovery> {
        self.config
            .calibrations
            .iter()
            .map(|cal| MetricRecovery {
                metric: cal.metric.clone(),
                percent: recovery_percent(days_since_quit, &cal.curve),
            })
            .collect()
    }

    /// Evaluate the configured milestone list
    pub fn evaluate_milestones(&self, days_since_quit: i64) -> Vec<MilestoneStatus> {
        evaluate_milestones(days_since_quit, &self.config.milestones)
    }

    /// Compute the streak state for a prebuilt goal series
    pub fn compute_streak(
        &self,
        series: &[GoalDay],
        persisted_longest: u32,
        today: NaiveDate,
    ) -> StreakState {
        StreakTracker::compute(series, persisted_longest, today)
    }

    /// Resolve the reward tier for a period's cumulative total
    pub fn resolve_reward_tier(&self, total: f64) -> RewardTier {
        resolve_reward_tier(total, &self.config.reward_ladder)
    }

    /// Run every stage over a normalized entry set and bundle the results.
    ///
    /// `today` is explicit so evaluations are deterministic; use
    /// [`ProgressEngine::today`] when the wall clock is wanted.
    pub fn build_summary(
        &self,
        entries: &[LogEntry],
        quit_date: NaiveDate,
        today: NaiveDate,
        window_days: u32,
        total_saved: f64,
        persisted_longest: u32,
    ) -> ProgressSummary {
        let days_since_quit = (today - quit_date).num_days();
        let range = DateRange::last_n_days(today, window_days);

        // Streak continuity needs explicit missing days, so the aggregation
        // keeps empty placeholders
        let daily = self.aggregate_daily(entries, range, true);
        let correlations = self.compute_correlations(&daily);
        let goal_series =
            StreakTracker::goal_series_from_entries(entries, range, self.config.daily_step_goal);
        let streak = self.compute_streak(&goal_series, persisted_longest, today);

        ProgressSummary {
            days_since_quit,
            window: ReportWindow {
                range,
                utc_offset_minutes: self.config.utc_offset_minutes,
            },
            daily,
            correlations,
            recovery: self.recovery_summary(days_since_quit),
            milestones: self.evaluate_milestones(days_since_quit),
            streak,
            reward_tier: self.resolve_reward_tier(total_saved),
        }
    }

    /// Build and encode a report in one call
    pub fn report_json(
        &self,
        entries: &[LogEntry],
        quit_date: NaiveDate,
        today: NaiveDate,
        window_days: u32,
        total_saved: f64,
        persisted_longest: u32,
    ) -> Result<String, EngineError> {
        let summary = self.build_summary(
            entries,
            quit_date,
            today,
            window_days,
            total_saved,
            persisted_longest,
        );
        ReportEncoder::new().encode_to_json(summary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_batch_json() -> &'static str {
        r#"{
            "mood_logs": [
                {"id": 1, "logged_at": "2024-03-12T09:30:00Z", "mood_score": 6.0, "craving_related": false, "sleep_hours": 7.5},
                {"id": 2, "logged_at": "2024-03-13T10:00:00Z", "mood_score": 4.0, "craving_related": true, "sleep_hours": 5.5},
                {"id": 3, "logged_at": "2024-03-14T09:15:00Z", "mood_score": 7.0, "craving_related": false, "sleep_hours": 8.0}
            ],
            "energy_logs": [
                {"id": 4, "recorded_at": "2024-03-12T12:00:00Z", "energy_level": 7.0, "physical_activity": true},
                {"id": 5, "recorded_at": "2024-03-13T12:00:00Z", "energy_level": 4.5, "physical_activity": false},
                {"id": 6, "recorded_at": "2024-03-14T12:00:00Z", "energy_level": 8.0, "physical_activity": true}
            ],
            "focus_logs": [
                {"id": 7, "created_at": "2024-03-12T15:00:00Z", "focus_score": 5.0},
                {"id": 8, "created_at": "2024-03-13T15:00:00Z", "focus_score": 4.0},
                {"id": 9, "created_at": "2024-03-14T15:00:00Z", "focus_score": 6.5}
            ],
            "step_logs": [
                {"id": 10, "recorded_on": "2024-03-12", "step_count": 7500},
                {"id": 11, "recorded_on": "2024-03-13", "step_count": 6200},
                {"id": 12, "recorded_on": "2024-03-14", "step_count": 8100}
            ]
        }"#
    }

    fn date(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, day).unwrap()
    }

    #[test]
    fn test_end_to_end_summary() {
        let engine = ProgressEngine::default();
        let entries = engine.normalize_json(sample_batch_json()).unwrap();
        assert_eq!(entries.len(), 12);

        // Quit 10 days before "today"
        let summary = engine.build_summary(&entries, date(4), date(14), 7, 12000.0, 2);

        assert_eq!(summary.days_since_quit, 10);
        assert_eq!(summary.daily.len(), 7);

        // Three complete days in the window
        let complete = summary.daily.iter().filter(|d| d.is_complete()).count();
        assert_eq!(complete, 3);

        // Mood calibration (3, 30, 50, 85) at day 10
        let mood = summary
            .recovery
            .iter()
            .find(|r| r.metric == "mood")
            .unwrap();
        let expected = 50.0 + 35.0 * (0.2 + 0.8 * 7.0 / 27.0);
        assert!((mood.percent - expected).abs() < 1e-9);

        // Steps: 7500, 6200, 8100 all above the 6000 default goal; today is
        // the 14th and the window saw no earlier step logs
        assert_eq!(summary.streak.current_streak, 3);
        assert_eq!(summary.streak.longest_streak, 3);

        assert_eq!(summary.reward_tier.label, "Silver");

        // 24h and 48h milestones achieved at day 10, two-week one pending
        let one_day = summary
            .milestones
            .iter()
            .find(|m| m.milestone.timeline_hours == 24.0)
            .unwrap();
        assert!(one_day.achieved);
        let two_weeks = summary
            .milestones
            .iter()
            .find(|m| m.milestone.timeline_hours == 336.0)
            .unwrap();
        assert!(!two_weeks.achieved);
        assert_eq!(two_weeks.days_remaining, 4);
    }

    #[test]
    fn test_correlation_impacts_present_in_summary() {
        let engine = ProgressEngine::default();
        let entries = engine.normalize_json(sample_batch_json()).unwrap();
        let summary = engine.build_summary(&entries, date(4), date(14), 7, 0.0, 0);

        // Activity days (12th, 14th) average 7.5 energy vs 4.5 on the 13th
        let expected = 7.5 / 4.5 - 1.0;
        assert!((summary.correlations.physical_activity_impact - expected).abs() < 1e-9);

        // Craving day mood 4 vs mean 6.5 on craving-free days
        let expected = 4.0 / 6.5 - 1.0;
        assert!((summary.correlations.craving_impact - expected).abs() < 1e-9);
    }

    #[test]
    fn test_report_json_shape() {
        let engine = ProgressEngine::default();
        let entries = engine.normalize_json(sample_batch_json()).unwrap();
        let json = engine
            .report_json(&entries, date(4), date(14), 7, 12000.0, 2)
            .unwrap();

        let parsed: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert!(parsed.get("report_version").is_some());
        assert!(parsed.get("producer").is_some());
        assert_eq!(parsed["summary"]["days_since_quit"], 10);
        assert_eq!(parsed["summary"]["reward_tier"]["label"], "Silver");
    }

    #[test]
    fn test_empty_batch_degrades_to_neutral() {
        let engine = ProgressEngine::default();
        let entries = engine.normalize_json("{}").unwrap();
        let summary = engine.build_summary(&entries, date(4), date(14), 7, 0.0, 5);

        assert_eq!(summary.daily.len(), 7);
        assert!(summary.daily.iter().all(|d| !d.has_data()));
        assert_eq!(summary.correlations, CorrelationSet::default());
        assert_eq!(summary.streak.current_streak, 0);
        assert_eq!(summary.streak.longest_streak, 5);
        assert_eq!(summary.reward_tier.label, "None");
    }
}
