//! Pattern recognition over scored observation history
//!
//! The recognizer runs seven sub-analyses over one time-ordered window and
//! bundles them into a single report: focus sessions, task switching, daily
//! rhythm, application usage, circadian preference, distraction episodes,
//! and recurring workflows.

pub mod circadian;
pub mod distraction;
pub mod focus;
pub mod rhythm;
pub mod switching;
pub mod usage;
pub mod workflow;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::catalog::ActivityCatalog;
use crate::config::EngineConfig;
use crate::error::AnalyticsError;
use crate::types::{AnalysisOutcome, ScoredObservation};

pub use circadian::{Chronotype, CircadianAnalysis};
pub use distraction::{DistractionAnalysis, DistractionEpisode, DistractionSeverity, DistractionSource};
pub use focus::{FocusAnalysis, FocusSession};
pub use rhythm::{RhythmAnalysis, TimeSlotBucket};
pub use switching::{SwitchClassification, SwitchingAnalysis, TaskSwitchEvent};
pub use usage::{ApplicationUsage, UsageRating};
pub use workflow::WorkflowPattern;

/// Fewest observations any pattern analysis makes sense over.
pub const MIN_OBSERVATIONS: usize = 3;

/// Bundled result of all pattern sub-analyses over one window.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PatternReport {
    pub report_id: Uuid,
    pub generated_at: DateTime<Utc>,
    pub observation_count: usize,
    pub window_start: DateTime<Utc>,
    pub window_end: DateTime<Utc>,
    pub focus: FocusAnalysis,
    pub switching: SwitchingAnalysis,
    pub rhythm: AnalysisOutcome<RhythmAnalysis>,
    pub usage: Vec<ApplicationUsage>,
    pub circadian: CircadianAnalysis,
    pub distraction: DistractionAnalysis,
    pub workflows: Vec<WorkflowPattern>,
    /// Fraction of sub-analyses that had enough signal to say something (0-1)
    pub confidence: f64,
}

/// Runs the pattern sub-analyses over a window of scored observations.
#[derive(Debug, Clone, Default)]
pub struct PatternRecognizer {
    config: EngineConfig,
    catalog: ActivityCatalog,
}

impl PatternRecognizer {
    pub fn new(config: EngineConfig, catalog: ActivityCatalog) -> Self {
        Self { config, catalog }
    }

    /// Analyze a time-ordered window of scored observations.
    ///
    /// Returns an error if the window is not chronologically ordered; fewer
    /// than [`MIN_OBSERVATIONS`] points is a valid insufficient-data outcome.
    pub fn analyze(
        &self,
        observations: &[ScoredObservation],
    ) -> Result<AnalysisOutcome<PatternReport>, AnalyticsError> {
        verify_sorted(observations)?;

        if observations.len() < MIN_OBSERVATIONS {
            return Ok(AnalysisOutcome::InsufficientData {
                required: MIN_OBSERVATIONS,
                actual: observations.len(),
            });
        }

        let focus = focus::segment_sessions(observations, &self.config);
        let switching = switching::analyze_switching(observations, &self.catalog);
        let rhythm = rhythm::analyze_rhythm(observations, &self.config);
        let usage = usage::analyze_usage(observations);
        let circadian = circadian::analyze_circadian(observations);
        let distraction =
            distraction::analyze_distractions(observations, &self.catalog, &self.config);
        let workflows = workflow::analyze_workflows(observations);

        let confidence = report_confidence(observations, &rhythm, &circadian, &workflows);

        // first/last exist: the window holds at least MIN_OBSERVATIONS points
        let window_start = observations
            .first()
            .map(|o| o.timestamp())
            .unwrap_or_else(Utc::now);
        let window_end = observations
            .last()
            .map(|o| o.timestamp())
            .unwrap_or(window_start);

        Ok(AnalysisOutcome::Ready(PatternReport {
            report_id: Uuid::new_v4(),
            generated_at: Utc::now(),
            observation_count: observations.len(),
            window_start,
            window_end,
            focus,
            switching,
            rhythm,
            usage,
            circadian,
            distraction,
            workflows,
            confidence,
        }))
    }
}

fn verify_sorted(observations: &[ScoredObservation]) -> Result<(), AnalyticsError> {
    for (index, pair) in observations.windows(2).enumerate() {
        if pair[1].timestamp() < pair[0].timestamp() {
            return Err(AnalyticsError::UnsortedHistory { index: index + 1 });
        }
    }
    Ok(())
}

/// Focus, switching, usage, and distraction always produce a result; rhythm
/// needs volume, circadian needs spread across day bands, and workflows need
/// activity types. Confidence is the ready fraction.
fn report_confidence(
    observations: &[ScoredObservation],
    rhythm: &AnalysisOutcome<RhythmAnalysis>,
    circadian: &CircadianAnalysis,
    workflows: &[WorkflowPattern],
) -> f64 {
    let mut ready = 4usize;
    let total = 7usize;

    if rhythm.is_ready() {
        ready += 1;
    }

    let bands_present = [
        circadian.morning_average,
        circadian.afternoon_average,
        circadian.evening_average,
    ]
    .iter()
    .filter(|b| b.is_some())
    .count();
    if bands_present >= 2 {
        ready += 1;
    }

    let has_activity_types = observations
        .iter()
        .any(|o| o.observation.effective_activity().is_some());
    if !workflows.is_empty() || has_activity_types {
        ready += 1;
    }

    ready as f64 / total as f64
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::{scored_activity, scored_at};
    use crate::types::ActivityType;
    use chrono::{TimeZone, Utc};

    fn recognizer() -> PatternRecognizer {
        PatternRecognizer::default()
    }

    fn base() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 4, 9, 0, 0).unwrap()
    }

    #[test]
    fn test_too_few_observations() {
        let obs = vec![
            scored_at(base(), "vscode", 80),
            scored_at(base() + chrono::Duration::minutes(5), "vscode", 85),
        ];
        let outcome = recognizer().analyze(&obs).unwrap();
        assert_eq!(
            outcome,
            AnalysisOutcome::InsufficientData {
                required: 3,
                actual: 2
            }
        );
    }

    #[test]
    fn test_unsorted_window_is_an_error() {
        let obs = vec![
            scored_at(base() + chrono::Duration::minutes(5), "vscode", 80),
            scored_at(base(), "vscode", 85),
            scored_at(base() + chrono::Duration::minutes(10), "vscode", 82),
        ];
        let result = recognizer().analyze(&obs);
        assert!(matches!(
            result,
            Err(AnalyticsError::UnsortedHistory { index: 1 })
        ));
    }

    #[test]
    fn test_minimal_window_produces_report() {
        let obs: Vec<_> = (0..3)
            .map(|i| scored_at(base() + chrono::Duration::minutes(i * 5), "vscode", 80))
            .collect();
        let report = recognizer().analyze(&obs).unwrap().into_ready().unwrap();

        assert_eq!(report.observation_count, 3);
        assert_eq!(report.window_start, base());
        assert_eq!(report.focus.sessions.len(), 1);
        assert!(!report.rhythm.is_ready());
        assert!(report.workflows.is_empty());
        assert!(report.confidence < 1.0);
    }

    #[test]
    fn test_richer_window_raises_confidence() {
        let sparse: Vec<_> = (0..3)
            .map(|i| scored_at(base() + chrono::Duration::minutes(i * 5), "vscode", 80))
            .collect();
        let sparse_report = recognizer().analyze(&sparse).unwrap().into_ready().unwrap();

        // Spread across morning and afternoon, tagged, and above the rhythm
        // minimum
        let rich: Vec<_> = (0..12)
            .map(|i| {
                scored_activity(
                    base() + chrono::Duration::minutes(i * 40),
                    "vscode",
                    80,
                    ActivityType::Coding,
                )
            })
            .collect();
        let rich_report = recognizer().analyze(&rich).unwrap().into_ready().unwrap();

        assert!(rich_report.confidence > sparse_report.confidence);
        assert!(rich_report.rhythm.is_ready());
    }

    #[test]
    fn test_alternating_work_and_distraction() {
        // 5-minute blocks alternating between an editor and entertainment
        let mut obs = Vec::new();
        for block in 0..12i64 {
            let ts = base() + chrono::Duration::minutes(block * 5);
            if (block / 3) % 2 == 0 {
                obs.push(scored_at(ts, "vscode", 85));
            } else {
                obs.push(scored_at(ts, "youtube", 25));
            }
        }
        let report = recognizer().analyze(&obs).unwrap().into_ready().unwrap();

        // Two focus blocks separated by a 20-minute low stretch
        assert_eq!(report.focus.sessions.len(), 2);
        assert_eq!(report.focus.total_interruptions, 0);
        assert!(!report.distraction.episodes.is_empty());
        assert!(report.switching.efficiency_score < 50.0);
    }
}
