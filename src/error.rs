//! Error types for Tempolens

use thiserror::Error;

/// Errors that can occur while feeding or querying the analytics engine.
///
/// Sparse or missing optional data is never an error: it lowers confidence or
/// produces an explicit insufficient-data outcome. These variants cover
/// precondition violations and host-facing parse failures only.
#[derive(Debug, Error)]
pub enum AnalyticsError {
    #[error("observation timestamp {current} is earlier than the last recorded {last}")]
    OutOfOrderObservation { last: String, current: String },

    #[error("observation history is not chronologically ordered at index {index}")]
    UnsortedHistory { index: usize },

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("invalid JSON: {0}")]
    JsonError(#[from] serde_json::Error),
}
