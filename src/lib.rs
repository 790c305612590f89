//! Quitpulse - progress and health-metrics compute engine for habit-recovery
//! tracking
//!
//! Quitpulse turns raw, sparsely-sampled daily logs (mood, energy, focus,
//! steps, cravings, sleep) into derived wellness metrics through a pure
//! in-memory pipeline: log normalization → daily aggregation → correlation
//! and streak evaluation, alongside a quit-time-keyed recovery curve,
//! milestone evaluation, and reward-tier resolution.
//!
//! ## Modules
//!
//! - **normalizer / aggregate**: raw per-table records → uniform entries →
//!   one metrics record per calendar day
//! - **correlation / streak / recovery / rewards**: derived metrics
//! - **pipeline / report**: orchestration facade and versioned JSON output

pub mod aggregate;
pub mod config;
pub mod correlation;
pub mod error;
pub mod normalizer;
pub mod pipeline;
pub mod recovery;
pub mod report;
pub mod rewards;
pub mod streak;
pub mod types;

pub use aggregate::DailyAggregator;
pub use config::EngineConfig;
pub use correlation::CorrelationEngine;
pub use error::EngineError;
pub use normalizer::{LogNormalizer, RawLogBatch};
pub use pipeline::{logs_to_report_json, ProgressEngine};
pub use recovery::{evaluate_milestones, recovery_percent};
pub use report::{ProgressReport, ReportEncoder};
pub use rewards::resolve_reward_tier;
pub use streak::StreakTracker;

/// Engine version embedded in all report payloads
pub const ENGINE_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Producer name for report payloads
pub const PRODUCER_NAME: &str = "quitpulse";
