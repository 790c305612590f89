//! Cross-metric correlation
//!
//! Consumes a window of daily metrics and produces pairwise co-movement
//! coefficients plus conditional-impact ratios. Only "complete" days (mood,
//! energy, and focus all present) participate; the pairwise coefficients are
//! the mean of the two metrics' product per day, a deliberate co-movement
//! indicator rather than a normalized Pearson coefficient. Every ratio
//! degrades to 0 when a comparison group is empty or its mean is 0, so a
//! sparse window can never produce NaN or infinity.

use crate::types::{CorrelationSet, DailyMetrics};

/// Threshold separating good sleep from poor sleep, in hours
pub const GOOD_SLEEP_HOURS: f64 = 7.0;

/// Correlation engine over a daily-metrics window
pub struct CorrelationEngine;

impl CorrelationEngine {
    /// Compute the correlation set for a window of daily metrics
    pub fn compute(daily: &[DailyMetrics]) -> CorrelationSet {
        let complete: Vec<&DailyMetrics> = daily.iter().filter(|d| d.is_complete()).collect();

        if complete.is_empty() {
            return CorrelationSet::default();
        }

        CorrelationSet {
            mood_energy: mean_product(&complete, |d| d.mood, |d| d.energy),
            mood_focus: mean_product(&complete, |d| d.mood, |d| d.focus),
            energy_focus: mean_product(&complete, |d| d.energy, |d| d.focus),
            physical_activity_impact: conditional_impact(
                &complete,
                |d| d.physical_activity_count > 0,
                |d| d.energy,
            ),
            craving_impact: conditional_impact(
                &complete,
                |d| d.craving_related_count > 0,
                |d| d.mood,
            ),
            sleep_quality_impact: sleep_quality_impact(&complete),
        }
    }
}

/// Mean of the per-day product of two metrics across complete days
fn mean_product(
    days: &[&DailyMetrics],
    a: impl Fn(&DailyMetrics) -> Option<f64>,
    b: impl Fn(&DailyMetrics) -> Option<f64>,
) -> f64 {
    let products: Vec<f64> = days
        .iter()
        .filter_map(|d| Some(a(d)? * b(d)?))
        .collect();
    mean(&products).unwrap_or(0.0)
}

/// Mean metric on days matching the condition vs days not matching, as a
/// ratio minus one. 0 whenever either group is empty or the baseline mean
/// is 0.
fn conditional_impact(
    days: &[&DailyMetrics],
    condition: impl Fn(&DailyMetrics) -> bool,
    metric: impl Fn(&DailyMetrics) -> Option<f64>,
) -> f64 {
    let with: Vec<f64> = days
        .iter()
        .filter(|d| condition(d))
        .filter_map(|d| metric(d))
        .collect();
    let without: Vec<f64> = days
        .iter()
        .filter(|d| !condition(d))
        .filter_map(|d| metric(d))
        .collect();

    impact_ratio(mean(&with), mean(&without))
}

/// Energy on good-sleep days (>= 7h) vs poor-sleep days (0 < h < 7);
/// days without a sleep value belong to neither group
fn sleep_quality_impact(days: &[&DailyMetrics]) -> f64 {
    let good: Vec<f64> = days
        .iter()
        .filter(|d| d.average_sleep_hours.is_some_and(|h| h >= GOOD_SLEEP_HOURS))
        .filter_map(|d| d.energy)
        .collect();
    let poor: Vec<f64> = days
        .iter()
        .filter(|d| {
            d.average_sleep_hours
                .is_some_and(|h| h > 0.0 && h < GOOD_SLEEP_HOURS)
        })
        .filter_map(|d| d.energy)
        .collect();

    impact_ratio(mean(&good), mean(&poor))
}

fn impact_ratio(with: Option<f64>, without: Option<f64>) -> f64 {
    match (with, without) {
        (Some(w), Some(base)) if base != 0.0 => w / base - 1.0,
        _ => 0.0,
    }
}

fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}
