//! Tempolens - Activity pattern and productivity analytics engine
//!
//! Tempolens turns a stream of activity observations into productivity
//! scores, behavioral pattern reports, and actionable insights through a
//! deterministic pipeline: scoring → pattern recognition → insight synthesis.
//!
//! ## Modules
//!
//! - **Scoring**: Five weighted factor scores per observation plus a global
//!   fatigue/stress/energy modifier
//! - **Patterns**: Focus sessions, task switching, daily rhythm, usage,
//!   circadian preference, distractions, workflows
//! - **Insights**: Overview, categorized findings, recommendations across
//!   three horizons, goal progress
//! - **Orchestrator**: Mutex-guarded history with a versioned TTL report
//!   cache

pub mod catalog;
pub mod config;
pub mod error;
pub mod insights;
pub mod orchestrator;
pub mod patterns;
pub mod scoring;
pub mod trend;
pub mod types;

#[cfg(test)]
pub(crate) mod testutil;

pub use catalog::{ActivityCatalog, AppCategory};
pub use config::{EngineConfig, FactorWeights};
pub use error::AnalyticsError;
pub use orchestrator::{AnalysisOrchestrator, WindowSelector};
pub use trend::TrendDirection;
pub use types::{AnalysisOutcome, Observation, RawSignals, ScoredObservation};

// Component exports
pub use insights::{InsightGenerator, InsightReport, UserPreferences};
pub use patterns::{PatternRecognizer, PatternReport};
pub use scoring::{blend_scores, ScoringEngine};

/// Engine version embedded in CLI report envelopes
pub const ENGINE_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Producer name for report envelopes
pub const PRODUCER_NAME: &str = "tempolens";
