//! Error types for quitpulse
//!
//! Individual unparseable log records are never errors; the normalizer skips
//! them because partial data is the normal operating condition for sparse
//! self-reported logs. These variants cover payload-level failures only.

use thiserror::Error;

/// Errors that can occur during computation
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("Invalid JSON: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("Invalid configuration: {0}")]
    ConfigError(String),

    #[error("Encoding error: {0}")]
    EncodingError(String),
}
