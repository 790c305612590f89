//! Log normalization
//!
//! Converts heterogeneous raw log records (mood, energy, focus, step, and
//! progress tables, each with its own field names and nullable fields) into
//! uniform [`LogEntry`] values bucketed by local calendar date.
//!
//! Skip rules: a record whose timestamp is missing or unparseable cannot be
//! bucketed and is dropped silently. A record missing its primary value still
//! produces an entry with `value: None` so its flags and sleep hours survive.

use crate::error::EngineError;
use crate::types::{LogEntry, LogFlag, LogKind};
use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, TimeZone, Utc};
use serde::Deserialize;

/// Normalizer for converting raw log batches into uniform entries
///
/// Holds the user-local UTC offset; every entry's calendar date is derived
/// here, once, so the aggregator and streak tracker never re-bucket.
pub struct LogNormalizer {
    offset: FixedOffset,
}

impl LogNormalizer {
    pub fn new(offset: FixedOffset) -> Self {
        Self { offset }
    }

    /// Parse a JSON batch and normalize it
    pub fn normalize_json(&self, raw_json: &str) -> Result<Vec<LogEntry>, EngineError> {
        let batch: RawLogBatch = serde_json::from_str(raw_json)?;
        Ok(self.normalize(&batch))
    }

    /// Normalize a raw batch into log entries, ascending by timestamp
    pub fn normalize(&self, batch: &RawLogBatch) -> Vec<LogEntry> {
        let mut entries = Vec::new();

        for record in batch.mood_logs.as_deref().unwrap_or_default() {
            if let Some(ts) = self.parse_timestamp(record.logged_at.as_deref()) {
                let mut flags = Vec::new();
                if record.craving_related == Some(true) {
                    flags.push(LogFlag::CravingRelated);
                }
                entries.push(self.entry(LogKind::Mood, ts, record.mood_score, flags, record.sleep_hours));
            }
        }

        for record in batch.energy_logs.as_deref().unwrap_or_default() {
            if let Some(ts) = self.parse_timestamp(record.recorded_at.as_deref()) {
                let mut flags = Vec::new();
                if record.physical_activity == Some(true) {
                    flags.push(LogFlag::PhysicalActivity);
                }
                entries.push(self.entry(LogKind::Energy, ts, record.energy_level, flags, None));
            }
        }

        for record in batch.focus_logs.as_deref().unwrap_or_default() {
            if let Some(ts) = self.parse_timestamp(record.created_at.as_deref()) {
                entries.push(self.entry(LogKind::Focus, ts, record.focus_score, Vec::new(), None));
            }
        }

        for record in batch.step_logs.as_deref().unwrap_or_default() {
            if let Some(ts) = self.parse_timestamp(record.recorded_on.as_deref()) {
                entries.push(self.entry(LogKind::Step, ts, record.step_count, Vec::new(), None));
            }
        }

        for record in batch.progress_logs.as_deref().unwrap_or_default() {
            if let Some(ts) = self.parse_timestamp(record.created_at.as_deref()) {
                entries.push(self.entry(
                    LogKind::Progress,
                    ts,
                    record.overall_score,
                    Vec::new(),
                    record.sleep_hours,
                ));
            }
        }

        entries.sort_by_key(|e| e.timestamp);
        entries
    }

    fn entry(
        &self,
        kind: LogKind,
        timestamp: DateTime<Utc>,
        value: Option<f64>,
        flags: Vec<LogFlag>,
        sleep_hours: Option<f64>,
    ) -> LogEntry {
        LogEntry {
            kind,
            timestamp,
            local_date: timestamp.with_timezone(&self.offset).date_naive(),
            value,
            flags,
            sleep_hours,
        }
    }

    /// Parse a raw timestamp string.
    ///
    /// RFC 3339 strings carry their own offset. Naive datetimes and bare
    /// dates were recorded in the user's local zone, so they are interpreted
    /// through the configured offset. Anything else is unbucketable.
    fn parse_timestamp(&self, raw: Option<&str>) -> Option<DateTime<Utc>> {
        let raw = raw?.trim();
        if raw.is_empty() {
            return None;
        }

        if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
            return Some(dt.with_timezone(&Utc));
        }

        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S") {
            return self
                .offset
                .from_local_datetime(&naive)
                .single()
                .map(|dt| dt.with_timezone(&Utc));
        }

        if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
            let midnight = date.and_hms_opt(0, 0, 0)?;
            return self
                .offset
                .from_local_datetime(&midnight)
                .single()
                .map(|dt| dt.with_timezone(&Utc));
        }

        None
    }
}

/// Raw log batch as exported by the data-access layer, one array per table
#[derive(Debug, Default, Deserialize)]
pub struct RawLogBatch {
    pub mood_logs: Option<Vec<RawMoodRecord>>,
    pub energy_logs: Option<Vec<RawEnergyRecord>>,
    pub focus_logs: Option<Vec<RawFocusRecord>>,
    pub step_logs: Option<Vec<RawStepRecord>>,
    pub progress_logs: Option<Vec<RawProgressRecord>>,
}

/// Row from the mood log table
#[derive(Debug, Deserialize)]
pub struct RawMoodRecord {
    pub id: Option<i64>,
    pub logged_at: Option<String>,
    pub mood_score: Option<f64>,
    pub craving_related: Option<bool>,
    pub sleep_hours: Option<f64>,
}

/// Row from the energy log table
#[derive(Debug, Deserialize)]
pub struct RawEnergyRecord {
    pub id: Option<i64>,
    pub recorded_at: Option<String>,
    pub energy_level: Option<f64>,
    pub physical_activity: Option<bool>,
}

/// Row from the focus log table
#[derive(Debug, Deserialize)]
pub struct RawFocusRecord {
    pub id: Option<i64>,
    pub created_at: Option<String>,
    pub focus_score: Option<f64>,
}

/// Row from the step log table
#[derive(Debug, Deserialize)]
pub struct RawStepRecord {
    pub id: Option<i64>,
    pub recorded_on: Option<String>,
    pub step_count: Option<f64>,
}

/// Row from the overall progress table
#[derive(Debug, Deserialize)]
pub struct RawProgressRecord {
    pub id: Option<i64>,
    pub created_at: Option<String>,
    pub overall_score: Option<f64>,
    pub sleep_hours: Option<f64>,
}
