//! Per-application usage profiling

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::trend;
use crate::types::ScoredObservation;

/// Same per-gap cap used by switch-time attribution.
const GAP_CAP_MIN: f64 = 30.0;

/// Qualitative band derived from the average score while the app was active.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UsageRating {
    Excellent,
    Good,
    Moderate,
    Poor,
}

impl UsageRating {
    /// Band an average score (0-100): >= 80 excellent, >= 60 good,
    /// >= 40 moderate, below that poor.
    pub fn from_average(average_score: f64) -> Self {
        let decile = average_score / 10.0;
        if decile >= 8.0 {
            UsageRating::Excellent
        } else if decile >= 6.0 {
            UsageRating::Good
        } else if decile >= 4.0 {
            UsageRating::Moderate
        } else {
            UsageRating::Poor
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApplicationUsage {
    pub application: String,
    pub observation_count: usize,
    /// Fraction of all observations spent in this application (0-1)
    pub share: f64,
    pub average_score: f64,
    pub peak_score: u8,
    pub first_seen: DateTime<Utc>,
    pub last_seen: DateTime<Utc>,
    /// Approximate active minutes, from capped inter-observation gaps
    pub approx_duration_min: f64,
    pub rating: UsageRating,
}

/// Profile application usage over time-ordered observations, most-used first.
pub fn analyze_usage(observations: &[ScoredObservation]) -> Vec<ApplicationUsage> {
    struct Accumulator {
        scores: Vec<f64>,
        first_seen: DateTime<Utc>,
        last_seen: DateTime<Utc>,
        duration_min: f64,
    }

    let mut by_app: HashMap<String, Accumulator> = HashMap::new();

    for (index, scored) in observations.iter().enumerate() {
        let gap_min = observations
            .get(index + 1)
            .map(|next| {
                let gap = (next.timestamp() - scored.timestamp()).num_seconds() as f64 / 60.0;
                gap.min(GAP_CAP_MIN)
            })
            .unwrap_or(0.0);

        let entry = by_app
            .entry(scored.application().to_string())
            .or_insert_with(|| Accumulator {
                scores: Vec::new(),
                first_seen: scored.timestamp(),
                last_seen: scored.timestamp(),
                duration_min: 0.0,
            });
        entry.scores.push(scored.score as f64);
        entry.last_seen = scored.timestamp();
        entry.duration_min += gap_min;
    }

    let total = observations.len();
    let mut usage: Vec<ApplicationUsage> = by_app
        .into_iter()
        .map(|(application, acc)| {
            let average = trend::mean(&acc.scores);
            let peak = acc.scores.iter().cloned().fold(0.0_f64, f64::max);
            ApplicationUsage {
                application,
                observation_count: acc.scores.len(),
                share: acc.scores.len() as f64 / total as f64,
                average_score: average,
                peak_score: peak.round() as u8,
                first_seen: acc.first_seen,
                last_seen: acc.last_seen,
                approx_duration_min: acc.duration_min,
                rating: UsageRating::from_average(average),
            }
        })
        .collect();

    usage.sort_by(|a, b| {
        b.observation_count
            .cmp(&a.observation_count)
            .then_with(|| a.application.cmp(&b.application))
    });
    usage
}
