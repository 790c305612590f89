//! Reward tier resolution
//!
//! Selects the highest ladder tier whose threshold is at or below a period's
//! cumulative total. Thresholds are inclusive lower bounds; there is no
//! interpolation between tiers. A total below the lowest threshold resolves
//! to the no-tier sentinel.

use crate::types::RewardTier;

/// Resolve the tier for a cumulative total against an ascending ladder
pub fn resolve_reward_tier(total: f64, ladder: &[RewardTier]) -> RewardTier {
    ladder
        .iter()
        .take_while(|tier| tier.threshold_value <= total)
        .last()
        .cloned()
        .unwrap_or_else(RewardTier::none)
}
