//! Streak tracking
//!
//! Computes the current continuous goal streak from a chronological goal
//! series, with a boundary tolerance: a missing or failed day breaks the
//! streak only if it is strictly before yesterday. Today or yesterday being
//! incomplete never retroactively breaks continuity through the day before,
//! so an unlogged "today" keeps an otherwise continuous streak alive.
//!
//! The longest-streak watermark is passed in from and handed back to the
//! caller; this module never persists anything.

use crate::types::{DateRange, GoalDay, LogEntry, LogKind, StreakState};
use chrono::{Duration, NaiveDate};
use std::collections::BTreeMap;

/// Streak evaluator over a daily goal series
pub struct StreakTracker;

impl StreakTracker {
    /// Compute the streak state for a goal series ending at `today`.
    ///
    /// `series` is ascending by date; dates absent from it count as not met.
    /// `persisted_longest` is the previously stored watermark; the returned
    /// `longest_streak` never falls below it, and the caller persists the new
    /// value when it increased.
    pub fn compute(series: &[GoalDay], persisted_longest: u32, today: NaiveDate) -> StreakState {
        let met: BTreeMap<NaiveDate, bool> = series.iter().map(|g| (g.date, g.goal_met)).collect();
        let yesterday = today - Duration::days(1);

        let mut current_streak = 0u32;
        let mut last_goal_met_date = None;

        let mut day = today;
        loop {
            if met.get(&day).copied().unwrap_or(false) {
                current_streak += 1;
                if last_goal_met_date.is_none() {
                    last_goal_met_date = Some(day);
                }
            } else if day < yesterday {
                break;
            }
            day -= Duration::days(1);
        }

        StreakState {
            current_streak,
            longest_streak: persisted_longest.max(current_streak),
            last_goal_met_date,
        }
    }

    /// Build a goal series from normalized step entries against a daily step
    /// goal. Every date in the range appears; dates with no step entries are
    /// explicit not-met gaps rather than omissions, which is what the streak
    /// walk needs to see.
    pub fn goal_series_from_entries(
        entries: &[LogEntry],
        range: DateRange,
        daily_step_goal: f64,
    ) -> Vec<GoalDay> {
        let mut totals: BTreeMap<NaiveDate, f64> =
            range.days().map(|date| (date, 0.0)).collect();

        for entry in entries {
            if entry.kind != LogKind::Step {
                continue;
            }
            let (Some(total), Some(steps)) = (totals.get_mut(&entry.local_date), entry.value)
            else {
                continue;
            };
            *total += steps;
        }

        totals
            .into_iter()
            .map(|(date, total)| GoalDay {
                date,
                goal_met: total >= daily_step_goal,
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use pretty_assertions::assert_eq;

    fn date(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, day).unwrap()
    }

    fn series(days: &[(u32, bool)]) -> Vec<GoalDay> {
        days.iter()
            .map(|&(day, goal_met)| GoalDay {
                date: date(day),
                goal_met,
            })
            .collect()
    }

    #[test]
    fn test_unbroken_run_counts_every_day() {
        let goals = series(&[(10, true), (11, true), (12, true), (13, true), (14, true)]);
        let state = StreakTracker::compute(&goals, 0, date(14));

        assert_eq!(state.current_streak, 5);
        assert_eq!(state.longest_streak, 5);
        assert_eq!(state.last_goal_met_date, Some(date(14)));
    }

    #[test]
    fn test_gap_three_days_back_breaks_streak() {
        // Failed day at N-3, met N-2..N
        let goals = series(&[(11, false), (12, true), (13, true), (14, true)]);
        let state = StreakTracker::compute(&goals, 0, date(14));

        assert_eq!(state.current_streak, 3);
    }

    #[test]
    fn test_unlogged_today_does_not_break_streak() {
        // Continuous through yesterday; today has no entry yet
        let goals = series(&[(10, true), (11, true), (12, true), (13, true)]);
        let state = StreakTracker::compute(&goals, 0, date(14));

        assert_eq!(state.current_streak, 4);
        assert_eq!(state.last_goal_met_date, Some(date(13)));
    }

    #[test]
    fn test_unlogged_today_and_yesterday_tolerated() {
        let goals = series(&[(10, true), (11, true), (12, true)]);
        let state = StreakTracker::compute(&goals, 0, date(14));

        assert_eq!(state.current_streak, 3);
    }

    #[test]
    fn test_gap_before_yesterday_breaks() {
        // Day 11 missing entirely; 12..14 met
        let goals = series(&[(10, true), (12, true), (13, true), (14, true)]);
        let state = StreakTracker::compute(&goals, 0, date(14));

        assert_eq!(state.current_streak, 3);
    }

    #[test]
    fn test_longest_never_below_persisted() {
        let goals = series(&[(14, true)]);
        let state = StreakTracker::compute(&goals, 12, date(14));

        assert_eq!(state.current_streak, 1);
        assert_eq!(state.longest_streak, 12);
    }

    #[test]
    fn test_longest_updates_when_exceeded() {
        let goals = series(&[(10, true), (11, true), (12, true), (13, true), (14, true)]);
        let state = StreakTracker::compute(&goals, 3, date(14));

        assert_eq!(state.longest_streak, 5);
    }

    #[test]
    fn test_empty_series_is_zero_streak() {
        let state = StreakTracker::compute(&[], 7, date(14));

        assert_eq!(state.current_streak, 0);
        assert_eq!(state.longest_streak, 7);
        assert_eq!(state.last_goal_met_date, None);
    }

    fn step_entry(day: u32, steps: f64) -> LogEntry {
        let timestamp = Utc.with_ymd_and_hms(2024, 3, day, 18, 0, 0).unwrap();
        LogEntry {
            kind: LogKind::Step,
            timestamp,
            local_date: timestamp.date_naive(),
            value: Some(steps),
            flags: vec![],
            sleep_hours: None,
        }
    }

    #[test]
    fn test_goal_series_from_step_entries() {
        let entries = vec![
            step_entry(12, 4000.0),
            step_entry(12, 3000.0), // two logs on one day sum
            step_entry(13, 2000.0),
        ];
        let range = DateRange::new(date(12), date(14));

        let goals = StreakTracker::goal_series_from_entries(&entries, range, 6000.0);
        assert_eq!(
            goals,
            vec![
                GoalDay { date: date(12), goal_met: true },
                GoalDay { date: date(13), goal_met: false },
                GoalDay { date: date(14), goal_met: false },
            ]
        );
    }
}
