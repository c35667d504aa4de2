//! Engine configuration
//!
//! All tunable thresholds and weights live here so the algorithms that
//! consume them can be tested against explicit values. `EngineConfig::default`
//! matches the constants documented in the module-level algorithm docs.

use serde::{Deserialize, Serialize};

use crate::error::AnalyticsError;

/// Relative weights of the five scoring factors. Must sum to 1.0.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FactorWeights {
    pub application: f64,
    pub content: f64,
    pub temporal: f64,
    pub behavioral: f64,
    pub contextual: f64,
}

impl Default for FactorWeights {
    fn default() -> Self {
        Self {
            application: 0.25,
            content: 0.25,
            temporal: 0.20,
            behavioral: 0.15,
            contextual: 0.15,
        }
    }
}

impl FactorWeights {
    pub fn sum(&self) -> f64 {
        self.application + self.content + self.temporal + self.behavioral + self.contextual
    }
}

/// Tunable parameters for scoring, pattern recognition, and insight synthesis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Factor weights for the composite productivity score
    pub weights: FactorWeights,
    /// Weight of a provider-estimated score when blending with the
    /// computational score (0-1); the remainder goes to the computational one
    pub provider_blend_weight: f64,

    // Focus session segmentation
    /// Minimum score for an observation to count toward a focus session
    pub focus_threshold: f64,
    /// Maximum gap between high-scoring observations inside one session
    pub max_session_gap_min: f64,
    /// Minimum session age before a low-scoring observation counts as an
    /// interruption
    pub min_session_duration_min: f64,

    // Distraction detection (0-100 scale)
    /// Scores below this are distraction candidates
    pub distraction_threshold: f64,
    /// Scores at or above this end a distraction episode's recovery window
    pub recovery_threshold: f64,

    // Rhythm analysis
    /// Width of a time-of-day bucket in minutes
    pub rhythm_bucket_min: u32,
    /// Minimum observations for rhythm analysis
    pub rhythm_min_observations: usize,

    // Insight generation
    /// Minimum history length for a full insight report
    pub insight_min_observations: usize,
    /// Minimum points for trend classification
    pub trend_min_observations: usize,
    /// Hourly average below this flags an improvement opportunity
    pub low_hour_threshold: f64,
    /// Switch frequency (switches / observations) above this flags an
    /// improvement opportunity
    pub high_switch_ratio: f64,

    // Orchestrator cache
    /// Seconds a cached result stays valid, for reports and for
    /// per-observation score entries alike
    pub cache_ttl_sec: i64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            weights: FactorWeights::default(),
            provider_blend_weight: 0.6,
            focus_threshold: 60.0,
            max_session_gap_min: 5.0,
            min_session_duration_min: 2.0,
            distraction_threshold: 40.0,
            recovery_threshold: 60.0,
            rhythm_bucket_min: 30,
            rhythm_min_observations: 10,
            insight_min_observations: 5,
            trend_min_observations: 10,
            low_hour_threshold: 40.0,
            high_switch_ratio: 0.3,
            cache_ttl_sec: 3600,
        }
    }
}

impl EngineConfig {
    /// Validate invariants that the algorithms rely on.
    pub fn validate(&self) -> Result<(), AnalyticsError> {
        if (self.weights.sum() - 1.0).abs() > 1e-6 {
            return Err(AnalyticsError::InvalidConfig(format!(
                "factor weights sum to {}, expected 1.0",
                self.weights.sum()
            )));
        }
        if !(0.0..=1.0).contains(&self.provider_blend_weight) {
            return Err(AnalyticsError::InvalidConfig(
                "provider_blend_weight must be within 0-1".to_string(),
            ));
        }
        if self.max_session_gap_min <= 0.0 {
            return Err(AnalyticsError::InvalidConfig(
                "max_session_gap_min must be positive".to_string(),
            ));
        }
        if self.recovery_threshold < self.distraction_threshold {
            return Err(AnalyticsError::InvalidConfig(
                "recovery_threshold must be at or above distraction_threshold".to_string(),
            ));
        }
        if self.rhythm_bucket_min == 0 || 1440 % self.rhythm_bucket_min != 0 {
            return Err(AnalyticsError::InvalidConfig(
                "rhythm_bucket_min must evenly divide a day".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(EngineConfig::default().validate().is_ok());
    }

    #[test]
    fn test_default_weights_sum_to_one() {
        assert!((FactorWeights::default().sum() - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_invalid_weights_rejected() {
        let mut config = EngineConfig::default();
        config.weights.application = 0.5;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_recovery_below_distraction_rejected() {
        let config = EngineConfig {
            recovery_threshold: 30.0,
            ..EngineConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_bucket_width_must_divide_day() {
        let config = EngineConfig {
            rhythm_bucket_min: 7,
            ..EngineConfig::default()
        };
        assert!(config.validate().is_err());
    }
}
