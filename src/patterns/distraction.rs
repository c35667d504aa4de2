//! Distraction episode detection
//!
//! A run of consecutive low-scoring observations forms one episode. Each
//! episode carries a likely source (from the applications involved), a
//! severity band, and the time it took to recover to a high score.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::catalog::{ActivityCatalog, AppCategory};
use crate::config::EngineConfig;
use crate::types::ScoredObservation;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DistractionSource {
    SocialMedia,
    Entertainment,
    Communication,
    News,
    /// Low score without an obviously distracting application, e.g. idling
    /// or struggling in a work tool
    Unclear,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DistractionSeverity {
    Low,
    Medium,
    High,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DistractionEpisode {
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub duration_min: f64,
    pub source: DistractionSource,
    pub severity: DistractionSeverity,
    /// Lowest score observed during the episode
    pub lowest_score: u8,
    /// Minutes from episode end until the next high-scoring observation;
    /// absent when no recovery was observed in the window
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recovery_min: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DistractionAnalysis {
    pub episodes: Vec<DistractionEpisode>,
    pub episodes_per_hour: f64,
    pub total_distracted_min: f64,
    pub average_duration_min: f64,
    /// Fraction of episodes with an observed recovery (0-1)
    pub recovery_rate: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub average_recovery_min: Option<f64>,
}

fn source_for(application: &str, catalog: &ActivityCatalog) -> DistractionSource {
    match catalog.category(application) {
        AppCategory::SocialMedia => DistractionSource::SocialMedia,
        AppCategory::Entertainment => DistractionSource::Entertainment,
        AppCategory::Communication => DistractionSource::Communication,
        AppCategory::News => DistractionSource::News,
        _ => DistractionSource::Unclear,
    }
}

/// Severity by the episode's lowest score: below 20 high, below 30 medium,
/// otherwise low.
fn severity_for(lowest_score: f64) -> DistractionSeverity {
    if lowest_score < 20.0 {
        DistractionSeverity::High
    } else if lowest_score < 30.0 {
        DistractionSeverity::Medium
    } else {
        DistractionSeverity::Low
    }
}

/// Detect distraction episodes in time-ordered observations.
pub fn analyze_distractions(
    observations: &[ScoredObservation],
    catalog: &ActivityCatalog,
    config: &EngineConfig,
) -> DistractionAnalysis {
    let mut episodes: Vec<DistractionEpisode> = Vec::new();
    let mut run_start: Option<usize> = None;

    let close_run = |start: usize, end: usize, episodes: &mut Vec<DistractionEpisode>| {
        let run = &observations[start..=end];
        let lowest = run
            .iter()
            .map(|o| o.score as f64)
            .fold(f64::MAX, f64::min);

        // Attribute the episode to the most distracting application in the
        // run; ties go to the first seen.
        let mut source = DistractionSource::Unclear;
        for scored in run {
            let candidate = source_for(scored.application(), catalog);
            if candidate != DistractionSource::Unclear {
                source = candidate;
                break;
            }
        }

        let start_time = run[0].timestamp();
        let end_time = run[run.len() - 1].timestamp();
        let recovery_min = observations[end + 1..]
            .iter()
            .find(|o| o.score as f64 >= config.recovery_threshold)
            .map(|o| (o.timestamp() - end_time).num_seconds() as f64 / 60.0);

        episodes.push(DistractionEpisode {
            start_time,
            end_time,
            duration_min: (end_time - start_time).num_seconds() as f64 / 60.0,
            source,
            severity: severity_for(lowest),
            lowest_score: lowest as u8,
            recovery_min,
        });
    };

    for (index, scored) in observations.iter().enumerate() {
        let distracted = (scored.score as f64) < config.distraction_threshold;
        match (run_start, distracted) {
            (None, true) => run_start = Some(index),
            (Some(start), false) => {
                close_run(start, index - 1, &mut episodes);
                run_start = None;
            }
            _ => {}
        }
    }
    if let Some(start) = run_start {
        close_run(start, observations.len() - 1, &mut episodes);
    }

    let span_hours = match (observations.first(), observations.last()) {
        (Some(first), Some(last)) => {
            (last.timestamp() - first.timestamp()).num_seconds() as f64 / 3600.0
        }
        _ => 0.0,
    };
    let episodes_per_hour = if span_hours > 0.0 {
        episodes.len() as f64 / span_hours
    } else {
        0.0
    };

    let total_distracted_min: f64 = episodes.iter().map(|e| e.duration_min).sum();
    let average_duration_min = if episodes.is_empty() {
        0.0
    } else {
        total_distracted_min / episodes.len() as f64
    };

    let recoveries: Vec<f64> = episodes.iter().filter_map(|e| e.recovery_min).collect();
    let recovery_rate = if episodes.is_empty() {
        0.0
    } else {
        recoveries.len() as f64 / episodes.len() as f64
    };
    let average_recovery_min = (!recoveries.is_empty())
        .then(|| recoveries.iter().sum::<f64>() / recoveries.len() as f64);

    DistractionAnalysis {
        episodes,
        episodes_per_hour,
        total_distracted_min,
        average_duration_min,
        recovery_rate,
        average_recovery_min,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::scored_at;
    use chrono::{TimeZone, Utc};
    use pretty_assertions::assert_eq;

    fn series(points: &[(i64, &str, u8)]) -> Vec<ScoredObservation> {
        let base = Utc.with_ymd_and_hms(2026, 3, 4, 9, 0, 0).unwrap();
        points
            .iter()
            .map(|(min, app, score)| {
                scored_at(base + chrono::Duration::minutes(*min), app, *score)
            })
            .collect()
    }

    fn analyze(points: &[(i64, &str, u8)]) -> DistractionAnalysis {
        analyze_distractions(
            &series(points),
            &ActivityCatalog::default(),
            &EngineConfig::default(),
        )
    }

    #[test]
    fn test_no_low_scores_no_episodes() {
        let analysis = analyze(&[(0, "vscode", 80), (5, "vscode", 75)]);
        assert!(analysis.episodes.is_empty());
        assert_eq!(analysis.recovery_rate, 0.0);
    }

    #[test]
    fn test_consecutive_low_scores_form_one_episode() {
        let analysis = analyze(&[
            (0, "vscode", 80),
            (5, "youtube", 25),
            (10, "youtube", 30),
            (15, "vscode", 85),
        ]);
        assert_eq!(analysis.episodes.len(), 1);
        let episode = &analysis.episodes[0];
        assert_eq!(episode.duration_min, 5.0);
        assert_eq!(episode.source, DistractionSource::Entertainment);
        assert_eq!(episode.severity, DistractionSeverity::Medium);
        assert_eq!(episode.lowest_score, 25);
    }

    #[test]
    fn test_recovery_measured_to_next_high_score() {
        let analysis = analyze(&[
            (0, "vscode", 80),
            (5, "twitter", 20),
            (10, "vscode", 50),
            (20, "vscode", 85),
        ]);
        let episode = &analysis.episodes[0];
        // Episode ends at minute 5; first score >= 60 is at minute 20
        assert_eq!(episode.recovery_min, Some(15.0));
        assert_eq!(episode.source, DistractionSource::SocialMedia);
        assert_eq!(analysis.recovery_rate, 1.0);
    }

    #[test]
    fn test_unrecovered_episode_at_window_end() {
        let analysis = analyze(&[(0, "vscode", 80), (5, "netflix", 10), (10, "netflix", 15)]);
        let episode = &analysis.episodes[0];
        assert_eq!(episode.recovery_min, None);
        assert_eq!(episode.severity, DistractionSeverity::High);
        assert_eq!(analysis.recovery_rate, 0.0);
        assert_eq!(analysis.average_recovery_min, None);
    }

    #[test]
    fn test_low_score_in_work_tool_is_unclear() {
        let analysis = analyze(&[(0, "vscode", 30), (5, "vscode", 70)]);
        assert_eq!(analysis.episodes[0].source, DistractionSource::Unclear);
    }

    #[test]
    fn test_separate_episodes_counted() {
        let analysis = analyze(&[
            (0, "youtube", 25),
            (5, "vscode", 80),
            (10, "reddit", 20),
            (15, "vscode", 85),
        ]);
        assert_eq!(analysis.episodes.len(), 2);
        assert!((analysis.episodes_per_hour - 8.0).abs() < 1e-9);
    }
}
