//! Progress report encoding
//!
//! Bundles the engine's computed outputs into a versioned JSON payload with
//! producer and provenance metadata, so downstream consumers (dashboard,
//! export, CLI) get one self-describing document per evaluation.

use crate::error::EngineError;
use crate::types::{CorrelationSet, DailyMetrics, DateRange, MilestoneStatus, RewardTier, StreakState};
use crate::{ENGINE_VERSION, PRODUCER_NAME};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Current progress-report schema version
pub const REPORT_VERSION: &str = "1.0.0";

/// Producer metadata embedded in every report
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportProducer {
    pub name: String,
    pub version: String,
    pub instance_id: String,
}

/// Evaluation window the report covers
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportWindow {
    pub range: DateRange,
    pub utc_offset_minutes: i32,
}

/// One metric's current recovery percentage
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricRecovery {
    pub metric: String,
    pub percent: f64,
}

/// Computed outputs for one evaluation, before metadata is attached
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProgressSummary {
    pub days_since_quit: i64,
    pub window: ReportWindow,
    pub daily: Vec<DailyMetrics>,
    pub correlations: CorrelationSet,
    pub recovery: Vec<MetricRecovery>,
    pub milestones: Vec<MilestoneStatus>,
    pub streak: StreakState,
    pub reward_tier: RewardTier,
}

/// Complete report payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProgressReport {
    pub report_version: String,
    pub producer: ReportProducer,
    pub generated_at_utc: String,
    pub summary: ProgressSummary,
}

/// Report encoder producing versioned JSON payloads
pub struct ReportEncoder {
    instance_id: String,
}

impl Default for ReportEncoder {
    fn default() -> Self {
        Self::new()
    }
}

impl ReportEncoder {
    /// Create a new encoder with a unique instance ID
    pub fn new() -> Self {
        Self {
            instance_id: Uuid::new_v4().to_string(),
        }
    }

    /// Create an encoder with a specific instance ID
    pub fn with_instance_id(instance_id: String) -> Self {
        Self { instance_id }
    }

    /// Wrap a computed summary into a complete report
    pub fn encode(&self, summary: ProgressSummary) -> ProgressReport {
        ProgressReport {
            report_version: REPORT_VERSION.to_string(),
            producer: ReportProducer {
                name: PRODUCER_NAME.to_string(),
                version: ENGINE_VERSION.to_string(),
                instance_id: self.instance_id.clone(),
            },
            generated_at_utc: Utc::now().to_rfc3339(),
            summary,
        }
    }

    /// Encode to a JSON string
    pub fn encode_to_json(&self, summary: ProgressSummary) -> Result<String, EngineError> {
        let report = self.encode(summary);
        serde_json::to_string_pretty(&report)
            .map_err(|e| EngineError::EncodingError(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn make_summary() -> ProgressSummary {
        let date = NaiveDate::from_ymd_opt(2024, 1, 15).unwrap();
        ProgressSummary {
            days_since_quit: 10,
            window: ReportWindow {
                range: DateRange::last_n_days(date, 7),
                utc_offset_minutes: 0,
            },
            daily: vec![DailyMetrics::empty(date)],
            correlations: CorrelationSet::default(),
            recovery: vec![MetricRecovery {
                metric: "mood".to_string(),
                percent: 64.3,
            }],
            milestones: vec![],
            streak: StreakState {
                current_streak: 3,
                longest_streak: 9,
                last_goal_met_date: Some(date),
            },
            reward_tier: RewardTier::none(),
        }
    }

    #[test]
    fn test_encode_report_metadata() {
        let encoder = ReportEncoder::with_instance_id("test-instance".to_string());
        let report = encoder.encode(make_summary());

        assert_eq!(report.report_version, REPORT_VERSION);
        assert_eq!(report.producer.name, PRODUCER_NAME);
        assert_eq!(report.producer.version, ENGINE_VERSION);
        assert_eq!(report.producer.instance_id, "test-instance");
        assert_eq!(report.summary.days_since_quit, 10);
    }

    #[test]
    fn test_encode_to_json_round_trips() {
        let encoder = ReportEncoder::new();
        let json = encoder.encode_to_json(make_summary()).unwrap();

        let parsed: ProgressReport = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.report_version, REPORT_VERSION);
        assert_eq!(parsed.summary.streak.longest_streak, 9);
        assert_eq!(parsed.summary.recovery[0].metric, "mood");
    }
}
