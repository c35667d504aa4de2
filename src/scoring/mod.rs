//! Productivity scoring
//!
//! Five independently computed sub-scores (application, content, temporal,
//! behavioral, contextual) combined by fixed weights, then multiplied by a
//! global modifier for fatigue, stress, and energy. Missing optional inputs
//! never fail scoring; they reduce confidence.

pub mod application;
pub mod behavioral;
pub mod content;
pub mod contextual;
pub mod temporal;

use crate::catalog::ActivityCatalog;
use crate::config::EngineConfig;
use crate::types::{Observation, ScoreBreakdown, ScoredObservation};

/// Converts one observation's raw signals into a normalized productivity
/// score with a per-factor breakdown and a confidence value.
#[derive(Debug, Clone, Default)]
pub struct ScoringEngine {
    config: EngineConfig,
    catalog: ActivityCatalog,
}

impl ScoringEngine {
    pub fn new(config: EngineConfig, catalog: ActivityCatalog) -> Self {
        Self { config, catalog }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn catalog(&self) -> &ActivityCatalog {
        &self.catalog
    }

    /// Score a single observation. Never fails: absent optional fields fall
    /// back to neutral factor contributions at reduced confidence.
    pub fn score(&self, observation: &Observation) -> ScoredObservation {
        let application = application::score_application(observation, &self.catalog);
        let content = content::score_content(observation);
        let temporal = temporal::score_temporal(observation);
        let behavioral = behavioral::score_behavioral(observation);
        let contextual = contextual::score_contextual(observation);

        let weights = &self.config.weights;
        let weighted = weights.application * application.score
            + weights.content * content.score
            + weights.temporal * temporal.score
            + weights.behavioral * behavioral.score
            + weights.contextual * contextual.score;

        let global_modifier = global_modifier(observation);
        let score = (weighted * global_modifier).clamp(0.0, 100.0).round() as u8;

        // Confidence is the weight-averaged confidence of the factors.
        let confidence = (weights.application * application.confidence
            + weights.content * content.confidence
            + weights.temporal * temporal.confidence
            + weights.behavioral * behavioral.confidence
            + weights.contextual * contextual.confidence)
            .clamp(0.0, 1.0);

        ScoredObservation {
            observation: observation.clone(),
            score,
            breakdown: ScoreBreakdown {
                application,
                content,
                temporal,
                behavioral,
                contextual,
                global_modifier,
            },
            confidence,
        }
    }

    /// Blend a provider-estimated score into a computational one using the
    /// configured provider weight.
    pub fn blend_with_provider(&self, computational: f64, provider: f64) -> f64 {
        blend_scores(computational, provider, self.config.provider_blend_weight)
    }
}

/// Global score modifier combining fatigue, stress, and energy.
///
/// Fatigue: each hour past 8 costs 5%, floored at 0.7. Stress: x0.9.
/// Energy: an externally supplied 0-10 level scales linearly to 0-1.
fn global_modifier(observation: &Observation) -> f64 {
    let signals = match observation.raw_signals.as_ref() {
        Some(signals) => signals,
        None => return 1.0,
    };

    let mut modifier = 1.0;

    if let Some(hours) = signals.fatigue_hours {
        if hours > 8.0 {
            modifier *= (1.0 - 0.05 * (hours - 8.0)).max(0.7);
        }
    }
    if signals.stress_indicator {
        modifier *= 0.9;
    }
    if let Some(energy) = signals.energy_level {
        modifier *= (energy.clamp(0.0, 10.0)) / 10.0;
    }

    modifier
}

/// Weighted average of a provider score and a computational score.
///
/// `provider_weight` is the provider's share (0-1); monotonic in both inputs.
pub fn blend_scores(computational: f64, provider: f64, provider_weight: f64) -> f64 {
    let w = provider_weight.clamp(0.0, 1.0);
    (w * provider + (1.0 - w) * computational).clamp(0.0, 100.0)
}
