//! Insight generation
//!
//! Synthesizes scored history and pattern analysis into a displayable report:
//! an overview, categorized insights, recommendations across three horizons,
//! and goal progress. Short histories yield a minimal report that says
//! exactly what is missing instead of failing.

pub mod focus;
pub mod goals;
pub mod productivity;
pub mod recommend;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::catalog::ActivityCatalog;
use crate::config::EngineConfig;
use crate::error::AnalyticsError;
use crate::patterns::{PatternRecognizer, PatternReport};
use crate::trend::{self, classify_trend, TrendDirection};
use crate::types::{
    AnalysisOutcome, Effort, Horizon, Impact, Insight, Recommendation, ScoredObservation,
};

pub use goals::{Goal, GoalKind, GoalProgress, UserPreferences};
pub use recommend::Recommendations;

/// Headline figures for the analyzed window.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Overview {
    pub average_score: f64,
    pub trend: AnalysisOutcome<TrendDirection>,
    /// Approximate active minutes across all applications
    pub total_active_min: f64,
    /// Mean focus-session quality (0-100); 0 when no sessions formed
    pub focus_quality: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InsightReport {
    pub report_id: Uuid,
    pub generated_at: DateTime<Utc>,
    pub observation_count: usize,
    pub overview: AnalysisOutcome<Overview>,
    pub insights: Vec<Insight>,
    pub recommendations: Recommendations,
    pub goal_progress: Vec<GoalProgress>,
    /// Report confidence (0-100) from volume, signal richness, span, and
    /// application diversity
    pub confidence: f64,
}

/// Turns scored history into an [`InsightReport`].
#[derive(Debug, Clone, Default)]
pub struct InsightGenerator {
    config: EngineConfig,
    recognizer: PatternRecognizer,
}

impl InsightGenerator {
    pub fn new(config: EngineConfig, catalog: ActivityCatalog) -> Self {
        let recognizer = PatternRecognizer::new(config.clone(), catalog);
        Self { config, recognizer }
    }

    /// Generate a report over a time-ordered window.
    ///
    /// Returns an error only for an unsorted window. Histories shorter than
    /// the configured minimum produce a minimal report.
    pub fn generate(
        &self,
        observations: &[ScoredObservation],
        preferences: &UserPreferences,
    ) -> Result<InsightReport, AnalyticsError> {
        let patterns = match self.recognizer.analyze(observations)? {
            AnalysisOutcome::Ready(report) => report,
            AnalysisOutcome::InsufficientData { .. } => {
                return Ok(self.minimal_report(observations));
            }
        };
        if observations.len() < self.config.insight_min_observations {
            return Ok(self.minimal_report(observations));
        }

        let scores: Vec<f64> = observations.iter().map(|o| o.score as f64).collect();
        let overview = Overview {
            average_score: trend::mean(&scores),
            trend: classify_trend(&scores, self.config.trend_min_observations),
            total_active_min: patterns.usage.iter().map(|u| u.approx_duration_min).sum(),
            focus_quality: focus_quality_figure(&patterns),
        };

        let (mut insights, mut short_term) =
            productivity::productivity_insights(observations, &patterns, &self.config);
        let (focus_insights, focus_recs) = focus::focus_insights(&patterns);
        insights.extend(focus_insights);
        short_term.extend(focus_recs);
        insights.sort_by(|a, b| b.importance.cmp(&a.importance));

        let goal_progress =
            goals::assess_goals(&preferences.goals, observations, Some(&patterns));

        let recommendations = recommend::build_recommendations(
            observations,
            &patterns,
            &goal_progress,
            short_term,
            &self.config,
        );

        Ok(InsightReport {
            report_id: Uuid::new_v4(),
            generated_at: Utc::now(),
            observation_count: observations.len(),
            overview: AnalysisOutcome::Ready(overview),
            insights,
            recommendations,
            goal_progress,
            confidence: report_confidence(observations),
        })
    }

    fn minimal_report(&self, observations: &[ScoredObservation]) -> InsightReport {
        InsightReport {
            report_id: Uuid::new_v4(),
            generated_at: Utc::now(),
            observation_count: observations.len(),
            overview: AnalysisOutcome::InsufficientData {
                required: self.config.insight_min_observations,
                actual: observations.len(),
            },
            insights: Vec::new(),
            recommendations: Recommendations {
                immediate: vec![Recommendation {
                    action: "Keep collecting activity data".to_string(),
                    reason: format!(
                        "{} of the {} observations needed for a full report",
                        observations.len(),
                        self.config.insight_min_observations
                    ),
                    impact: Impact::Low,
                    effort: Effort::Low,
                    horizon: Horizon::Immediate,
                }],
                short_term: Vec::new(),
                long_term: Vec::new(),
            },
            goal_progress: Vec::new(),
            confidence: report_confidence(observations),
        }
    }
}

fn focus_quality_figure(patterns: &PatternReport) -> f64 {
    let sessions = &patterns.focus.sessions;
    if sessions.is_empty() {
        return 0.0;
    }
    sessions.iter().map(|s| s.quality_score).sum::<f64>() / sessions.len() as f64
}

/// Report confidence (0-100): observation volume up to 40, fraction carrying
/// raw signals up to 25, window span up to 20 (full at a week), application
/// diversity up to 15.
fn report_confidence(observations: &[ScoredObservation]) -> f64 {
    if observations.is_empty() {
        return 0.0;
    }

    let volume = (observations.len() as f64 * 0.8).min(40.0);

    let with_signals = observations
        .iter()
        .filter(|o| o.observation.raw_signals.is_some())
        .count();
    let richness = with_signals as f64 / observations.len() as f64 * 25.0;

    let span_days = match (observations.first(), observations.last()) {
        (Some(first), Some(last)) => {
            (last.timestamp() - first.timestamp()).num_seconds() as f64 / 86_400.0
        }
        _ => 0.0,
    };
    let span = (span_days / 7.0 * 20.0).min(20.0);

    let mut apps: Vec<&str> = observations.iter().map(|o| o.application()).collect();
    apps.sort_unstable();
    apps.dedup();
    let diversity = (apps.len() as f64 * 3.0).min(15.0);

    (volume + richness + span + diversity).min(100.0)
}
