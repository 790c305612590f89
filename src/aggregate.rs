//! Daily aggregation
//!
//! Folds normalized log entries into one [`DailyMetrics`] record per calendar
//! date in the requested window. Mood, energy, and focus are averaged across
//! the day's entries; sleep hours use last-value semantics because a day has
//! many mood logs but typically one sleep value. Output is ascending by date;
//! callers wanting most-recent-first reverse it themselves.

use crate::types::{DailyMetrics, DateRange, LogEntry, LogFlag, LogKind};
use chrono::{DateTime, NaiveDate, Utc};
use std::collections::BTreeMap;

/// Aggregator folding log entries into per-day metrics
pub struct DailyAggregator;

impl DailyAggregator {
    /// Aggregate entries over an inclusive date range.
    ///
    /// With `include_empty_days` every date in the range yields a record
    /// (all-`None` placeholder when nothing was logged), letting consumers
    /// distinguish "no data" from "bad data". Without it, only dates with at
    /// least one logged metric are returned; streak-style consumers that need
    /// explicit gaps should keep empty days.
    pub fn aggregate(
        entries: &[LogEntry],
        range: DateRange,
        include_empty_days: bool,
    ) -> Vec<DailyMetrics> {
        let mut days: BTreeMap<NaiveDate, DayAccumulator> = range
            .days()
            .map(|date| (date, DayAccumulator::default()))
            .collect();

        for entry in entries {
            let Some(accum) = days.get_mut(&entry.local_date) else {
                continue; // outside the window
            };
            accum.fold(entry);
        }

        days.into_iter()
            .map(|(date, accum)| accum.finish(date))
            .filter(|metrics| include_empty_days || metrics.has_data())
            .collect()
    }
}

/// Running per-day totals while folding a window
#[derive(Default)]
struct DayAccumulator {
    mood_sum: f64,
    mood_count: u32,
    energy_sum: f64,
    energy_count: u32,
    focus_sum: f64,
    focus_count: u32,
    craving_related_count: u32,
    physical_activity_count: u32,
    /// Latest sleep observation seen so far, keyed by entry timestamp
    sleep: Option<(DateTime<Utc>, f64)>,
}

impl DayAccumulator {
    fn fold(&mut self, entry: &LogEntry) {
        if let Some(value) = entry.value {
            match entry.kind {
                LogKind::Mood => {
                    self.mood_sum += value;
                    self.mood_count += 1;
                }
                LogKind::Energy => {
                    self.energy_sum += value;
                    self.energy_count += 1;
                }
                LogKind::Focus => {
                    self.focus_sum += value;
                    self.focus_count += 1;
                }
                LogKind::Step | LogKind::Progress => {}
            }
        }

        // Flags count even when the primary value is absent
        if entry.has_flag(LogFlag::CravingRelated) {
            self.craving_related_count += 1;
        }
        if entry.has_flag(LogFlag::PhysicalActivity) {
            self.physical_activity_count += 1;
        }

        if let Some(hours) = entry.sleep_hours {
            let newer = self.sleep.map_or(true, |(ts, _)| entry.timestamp >= ts);
            if newer {
                self.sleep = Some((entry.timestamp, hours));
            }
        }
    }

    fn finish(self, date: NaiveDate) -> DailyMetrics {
        DailyMetrics {
            date,
            mood: average(self.mood_sum, self.mood_count),
            energy: average(self.energy_sum, self.energy_count),
            focus: average(self.focus_sum, self.focus_count),
            mood_count: self.mood_count,
            energy_count: self.energy_count,
            focus_count: self.focus_count,
            craving_related_count: self.craving_related_count,
            physical_activity_count: self.physical_activity_count,
            average_sleep_hours: self.sleep.map(|(_, hours)| hours),
        }
    }
}

fn average(sum: f64, count: u32) -> Option<f64> {
    (count > 0).then(|| sum / f64::from(count))
}
