//! Shared helpers for unit tests.

use chrono::{DateTime, Utc};

use crate::types::{
    ActivityType, FactorScore, Observation, ScoreBreakdown, ScoredObservation,
};

/// A scored observation with a neutral breakdown, for analyses that only
/// look at timestamp, application, and final score.
pub fn scored_at(timestamp: DateTime<Utc>, application: &str, score: u8) -> ScoredObservation {
    ScoredObservation {
        observation: Observation::new(timestamp, application),
        score,
        breakdown: neutral_breakdown(),
        confidence: 0.8,
    }
}

/// Like [`scored_at`] but with an activity type attached.
pub fn scored_activity(
    timestamp: DateTime<Utc>,
    application: &str,
    score: u8,
    activity: ActivityType,
) -> ScoredObservation {
    let mut scored = scored_at(timestamp, application, score);
    scored.observation.activity_type = Some(activity);
    scored
}

fn neutral_breakdown() -> ScoreBreakdown {
    ScoreBreakdown {
        application: FactorScore::neutral(),
        content: FactorScore::neutral(),
        temporal: FactorScore::neutral(),
        behavioral: FactorScore::neutral(),
        contextual: FactorScore::neutral(),
        global_modifier: 1.0,
    }
}
