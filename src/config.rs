//! Engine configuration
//!
//! Static inputs supplied by the caller: the user-local UTC offset used for
//! calendar bucketing, the daily goal threshold, per-metric recovery-curve
//! calibrations, the milestone list, and the reward-tier ladder. The engine
//! consumes these; it never computes them.

use crate::types::{MetricCalibration, Milestone, RecoveryCalibration, RewardTier};
use chrono::{FixedOffset, Offset, Utc};
use serde::{Deserialize, Serialize};

/// Default daily step goal used for streak continuity
pub const DEFAULT_DAILY_STEP_GOAL: f64 = 6000.0;

/// Caller-supplied engine configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// User-local UTC offset in minutes; the single timezone policy for all
    /// calendar-date bucketing
    pub utc_offset_minutes: i32,
    /// Daily step total at or above which the day's goal counts as met
    pub daily_step_goal: f64,
    /// Recovery-curve calibration per tracked metric
    pub calibrations: Vec<MetricCalibration>,
    /// Quit-timeline milestones, ascending by `timeline_hours`
    pub milestones: Vec<Milestone>,
    /// Reward ladder, ascending by `threshold_value`
    pub reward_ladder: Vec<RewardTier>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            utc_offset_minutes: 0,
            daily_step_goal: DEFAULT_DAILY_STEP_GOAL,
            calibrations: default_calibrations(),
            milestones: default_milestones(),
            reward_ladder: default_reward_ladder(),
        }
    }
}

impl EngineConfig {
    /// Fixed offset for local-date bucketing. Out-of-range offsets fall back
    /// to UTC rather than failing.
    pub fn offset(&self) -> FixedOffset {
        FixedOffset::east_opt(self.utc_offset_minutes * 60).unwrap_or_else(|| Utc.fix())
    }

    /// Calibration for a named metric, if configured
    pub fn calibration_for(&self, metric: &str) -> Option<&RecoveryCalibration> {
        self.calibrations
            .iter()
            .find(|c| c.metric == metric)
            .map(|c| &c.curve)
    }

    /// Load configuration from JSON
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Serialize configuration to JSON
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

fn default_calibrations() -> Vec<MetricCalibration> {
    vec![
        MetricCalibration {
            metric: "mood".to_string(),
            curve: RecoveryCalibration::new(3, 30, 50.0, 85.0),
        },
        MetricCalibration {
            metric: "energy".to_string(),
            curve: RecoveryCalibration::new(2, 21, 55.0, 90.0),
        },
        MetricCalibration {
            metric: "focus".to_string(),
            curve: RecoveryCalibration::new(5, 45, 40.0, 80.0),
        },
        MetricCalibration {
            metric: "fatigue_resistance".to_string(),
            curve: RecoveryCalibration::new(7, 60, 45.0, 88.0),
        },
    ]
}

fn default_milestones() -> Vec<Milestone> {
    vec![
        Milestone {
            title: "Heart rate normalizes".to_string(),
            timeline_hours: 0.33,
            description: "Heart rate and blood pressure drop back toward baseline".to_string(),
        },
        Milestone {
            title: "Nicotine leaves the bloodstream".to_string(),
            timeline_hours: 8.0,
            description: "Carbon monoxide level in blood drops to normal".to_string(),
        },
        Milestone {
            title: "One full day".to_string(),
            timeline_hours: 24.0,
            description: "Risk of heart attack already begins to decrease".to_string(),
        },
        Milestone {
            title: "Senses sharpen".to_string(),
            timeline_hours: 48.0,
            description: "Nerve endings regrow; smell and taste improve".to_string(),
        },
        Milestone {
            title: "Breathing eases".to_string(),
            timeline_hours: 72.0,
            description: "Bronchial tubes relax; energy levels rise".to_string(),
        },
        Milestone {
            title: "Two weeks smoke-free".to_string(),
            timeline_hours: 336.0,
            description: "Circulation improves; walking becomes easier".to_string(),
        },
        Milestone {
            title: "One month".to_string(),
            timeline_hours: 720.0,
            description: "Coughing and shortness of breath decrease".to_string(),
        },
        Milestone {
            title: "Three months".to_string(),
            timeline_hours: 2160.0,
            description: "Lung function increases up to 30 percent".to_string(),
        },
        Milestone {
            title: "One year".to_string(),
            timeline_hours: 8760.0,
            description: "Excess risk of coronary heart disease is half that of a smoker"
                .to_string(),
        },
    ]
}

fn default_reward_ladder() -> Vec<RewardTier> {
    vec![
        RewardTier {
            threshold_value: 0.0,
            label: "None".to_string(),
            discount_percent: 0.0,
        },
        RewardTier {
            threshold_value: 5000.0,
            label: "Bronze".to_string(),
            discount_percent: 2.0,
        },
        RewardTier {
            threshold_value: 10000.0,
            label: "Silver".to_string(),
            discount_percent: 5.0,
        },
        RewardTier {
            threshold_value: 25000.0,
            label: "Gold".to_string(),
            discount_percent: 8.0,
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_ordered() {
        let config = EngineConfig::default();

        for pair in config.reward_ladder.windows(2) {
            assert!(pair[0].threshold_value < pair[1].threshold_value);
        }
        for pair in config.milestones.windows(2) {
            assert!(pair[0].timeline_hours < pair[1].timeline_hours);
        }
    }

    #[test]
    fn test_calibration_lookup() {
        let config = EngineConfig::default();
        let mood = config.calibration_for("mood").unwrap();
        assert_eq!(mood.onset_day, 3);
        assert_eq!(mood.plateau_day, 30);
        assert!(config.calibration_for("unknown").is_none());
    }

    #[test]
    fn test_config_json_round_trip() {
        let config = EngineConfig::default();
        let json = config.to_json().unwrap();
        let loaded = EngineConfig::from_json(&json).unwrap();

        assert_eq!(loaded.utc_offset_minutes, config.utc_offset_minutes);
        assert_eq!(loaded.calibrations, config.calibrations);
        assert_eq!(loaded.reward_ladder, config.reward_ladder);
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let loaded = EngineConfig::from_json(r#"{"utc_offset_minutes": -300}"#).unwrap();
        assert_eq!(loaded.utc_offset_minutes, -300);
        assert_eq!(loaded.daily_step_goal, DEFAULT_DAILY_STEP_GOAL);
        assert!(!loaded.milestones.is_empty());
    }

    #[test]
    fn test_invalid_offset_falls_back_to_utc() {
        let config = EngineConfig {
            utc_offset_minutes: 100_000,
            ..Default::default()
        };
        assert_eq!(config.offset().local_minus_utc(), 0);
    }
}
