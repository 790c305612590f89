//! Recovery curve and milestone evaluation
//!
//! The recovery curve maps elapsed quit-time to an improvement percentage
//! through a three-phase piecewise function: a slow initial phase covering
//! 20% of the floor-to-ceiling range until the onset day, a linear phase
//! covering the remaining 80% until the plateau day, then a flat plateau.
//! The function is identical for every tracked metric; only the calibration
//! tuple differs.

use crate::types::{Milestone, MilestoneStatus, RecoveryCalibration};

/// Share of the floor-to-ceiling range covered before the onset day
pub const EARLY_PHASE_SHARE: f64 = 0.2;

/// Current improvement percentage for a metric.
///
/// Negative `days_since_quit` clamps to 0. A calibration with
/// `plateau_day <= onset_day` jumps straight to the ceiling once the onset
/// day is reached; it never divides by the empty phase width.
pub fn recovery_percent(days_since_quit: i64, calibration: &RecoveryCalibration) -> f64 {
    let days = days_since_quit.max(0) as f64;
    let onset = f64::from(calibration.onset_day);
    let plateau = f64::from(calibration.plateau_day);
    let floor = calibration.floor_percent;
    let range = calibration.ceiling_percent - floor;

    if days < onset {
        floor + range * EARLY_PHASE_SHARE * (days / onset)
    } else if days < plateau {
        let linear_progress = (days - onset) / (plateau - onset);
        floor + range * (EARLY_PHASE_SHARE + (1.0 - EARLY_PHASE_SHARE) * linear_progress)
    } else {
        calibration.ceiling_percent
    }
}

/// Evaluate a static milestone list against elapsed quit-time
pub fn evaluate_milestones(days_since_quit: i64, milestones: &[Milestone]) -> Vec<MilestoneStatus> {
    let days = days_since_quit.max(0) as u32;

    milestones
        .iter()
        .map(|milestone| {
            let days_required = (milestone.timeline_hours / 24.0).ceil().max(0.0) as u32;
            if days_required == 0 {
                return MilestoneStatus {
                    milestone: milestone.clone(),
                    days_required: 0,
                    achieved: true,
                    days_remaining: 0,
                    progress_percent: 100.0,
                };
            }

            let achieved = days >= days_required;
            MilestoneStatus {
                milestone: milestone.clone(),
                days_required,
                achieved,
                days_remaining: days_required.saturating_sub(days),
                progress_percent: (100.0 * f64::from(days) / f64::from(days_required)).min(100.0),
            }
        })
        .collect()
}
