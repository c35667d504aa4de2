//! Recommendation assembly across the three time horizons
//!
//! Immediate recommendations react to the last few observations, short-term
//! ones come from the pattern-derived pools, and long-term ones follow the
//! trend, the chronotype, and lagging goals. Each horizon is capped.

use serde::{Deserialize, Serialize};

use crate::config::EngineConfig;
use crate::insights::goals::GoalProgress;
use crate::patterns::{Chronotype, PatternReport};
use crate::trend::{self, TrendDirection};
use crate::types::{
    AnalysisOutcome, Effort, Horizon, Impact, Recommendation, ScoredObservation,
};

/// Observations considered for immediate recommendations.
const RECENT_WINDOW: usize = 10;

const IMMEDIATE_CAP: usize = 3;
const SHORT_TERM_CAP: usize = 5;
const LONG_TERM_CAP: usize = 3;

/// Recommendations grouped by horizon, each list capped and ordered by
/// expected impact.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Recommendations {
    pub immediate: Vec<Recommendation>,
    pub short_term: Vec<Recommendation>,
    pub long_term: Vec<Recommendation>,
}

pub fn build_recommendations(
    observations: &[ScoredObservation],
    patterns: &PatternReport,
    goal_progress: &[GoalProgress],
    short_term_pool: Vec<Recommendation>,
    config: &EngineConfig,
) -> Recommendations {
    Recommendations {
        immediate: immediate_recommendations(observations, config),
        short_term: cap_by_impact(short_term_pool, SHORT_TERM_CAP),
        long_term: long_term_recommendations(patterns, goal_progress),
    }
}

fn immediate_recommendations(
    observations: &[ScoredObservation],
    config: &EngineConfig,
) -> Vec<Recommendation> {
    let recent = &observations[observations.len().saturating_sub(RECENT_WINDOW)..];
    let scores: Vec<f64> = recent.iter().map(|o| o.score as f64).collect();
    let recent_average = trend::mean(&scores);
    let recent_switches = recent
        .windows(2)
        .filter(|pair| pair[0].application() != pair[1].application())
        .count();

    let mut recs = Vec::new();

    if recent_average < config.distraction_threshold {
        recs.push(Recommendation {
            action: "Step away for a short break, then restart with a single task".to_string(),
            reason: format!("recent scores average only {:.0}", recent_average),
            impact: Impact::High,
            effort: Effort::Low,
            horizon: Horizon::Immediate,
        });
    }

    if recent_switches > 5 {
        recs.push(Recommendation {
            action: "Close the applications you are not actively using".to_string(),
            reason: format!("{} switches in the last {} observations", recent_switches, recent.len()),
            impact: Impact::Medium,
            effort: Effort::Low,
            horizon: Horizon::Immediate,
        });
    }

    if recent_average >= 75.0 {
        recs.push(Recommendation {
            action: "Protect the current block; defer messages until it ends".to_string(),
            reason: format!("you are running at an average of {:.0}", recent_average),
            impact: Impact::Medium,
            effort: Effort::Low,
            horizon: Horizon::Immediate,
        });
    }

    cap_by_impact(recs, IMMEDIATE_CAP)
}

fn long_term_recommendations(
    patterns: &PatternReport,
    goal_progress: &[GoalProgress],
) -> Vec<Recommendation> {
    let mut recs = Vec::new();

    if let AnalysisOutcome::Ready(rhythm) = &patterns.rhythm {
        if matches!(
            rhythm.trend,
            AnalysisOutcome::Ready(TrendDirection::Declining)
                | AnalysisOutcome::Ready(TrendDirection::StronglyDeclining)
        ) {
            recs.push(Recommendation {
                action: "Review workload and recovery; your scores are trending down".to_string(),
                reason: "the window shows a declining productivity trend".to_string(),
                impact: Impact::High,
                effort: Effort::Medium,
                horizon: Horizon::LongTerm,
            });
        }
    }

    let band = match patterns.circadian.chronotype {
        Chronotype::MorningPerson => Some("morning"),
        Chronotype::AfternoonPeak => Some("afternoon"),
        Chronotype::EveningPerson => Some("evening"),
        Chronotype::Consistent => None,
    };
    if let Some(band) = band {
        recs.push(Recommendation {
            action: format!("Reserve {} hours for your most demanding work", band),
            reason: format!("your scores peak in the {}", band),
            impact: Impact::Medium,
            effort: Effort::Medium,
            horizon: Horizon::LongTerm,
        });
    }

    if let Some(lagging) = goal_progress.iter().find(|g| !g.on_track) {
        recs.push(Recommendation {
            action: format!("Revisit the \"{}\" goal or how you pursue it", lagging.goal_name),
            reason: format!("progress stands at {:.0}%", lagging.progress_pct),
            impact: Impact::Medium,
            effort: Effort::Medium,
            horizon: Horizon::LongTerm,
        });
    }

    cap_by_impact(recs, LONG_TERM_CAP)
}

/// Order by impact (high first), breaking ties by lower effort, then cap.
fn cap_by_impact(mut recs: Vec<Recommendation>, cap: usize) -> Vec<Recommendation> {
    recs.sort_by(|a, b| b.impact.cmp(&a.impact).then(a.effort.cmp(&b.effort)));
    recs.truncate(cap);
    recs
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::insights::goals::GoalKind;
    use crate::patterns::PatternRecognizer;
    use crate::testutil::scored_at;
    use chrono::{TimeZone, Utc};

    fn series(points: &[(i64, &str, u8)]) -> Vec<ScoredObservation> {
        let base = Utc.with_ymd_and_hms(2026, 3, 4, 9, 0, 0).unwrap();
        points
            .iter()
            .map(|(min, app, score)| {
                scored_at(base + chrono::Duration::minutes(*min), app, *score)
            })
            .collect()
    }

    fn build(obs: &[ScoredObservation], goals: &[GoalProgress]) -> Recommendations {
        let report = PatternRecognizer::default()
            .analyze(obs)
            .unwrap()
            .into_ready()
            .unwrap();
        build_recommendations(obs, &report, goals, Vec::new(), &EngineConfig::default())
    }

    #[test]
    fn test_low_recent_scores_suggest_break() {
        let obs = series(&[(0, "vscode", 30), (5, "vscode", 25), (10, "vscode", 35)]);
        let recs = build(&obs, &[]);
        assert!(recs.immediate.iter().any(|r| r.action.contains("break")));
    }

    #[test]
    fn test_high_momentum_protected() {
        let obs = series(&[(0, "vscode", 85), (5, "vscode", 88), (10, "vscode", 90)]);
        let recs = build(&obs, &[]);
        assert!(recs.immediate.iter().any(|r| r.action.contains("Protect")));
    }

    #[test]
    fn test_immediate_cap_respected() {
        let recs = immediate_recommendations(
            &series(&[
                (0, "a", 20),
                (1, "b", 25),
                (2, "c", 30),
                (3, "d", 20),
                (4, "e", 25),
                (5, "f", 30),
                (6, "g", 20),
            ]),
            &EngineConfig::default(),
        );
        assert!(recs.len() <= 3);
    }

    #[test]
    fn test_chronotype_drives_long_term() {
        let obs = series(&[
            (0, "vscode", 90),
            (60, "vscode", 88),
            (300, "vscode", 55),
            (600, "vscode", 50),
        ]);
        let recs = build(&obs, &[]);
        assert!(recs
            .long_term
            .iter()
            .any(|r| r.action.contains("morning")));
    }

    #[test]
    fn test_lagging_goal_revisited() {
        let obs = series(&[(0, "vscode", 60), (5, "vscode", 62), (10, "vscode", 58)]);
        let progress = vec![GoalProgress {
            goal_name: "hit 80".to_string(),
            kind: GoalKind::ProductivityTarget,
            progress_pct: 75.0,
            on_track: false,
            summary: String::new(),
        }];
        let recs = build(&obs, &progress);
        assert!(recs.long_term.iter().any(|r| r.action.contains("hit 80")));
    }

    #[test]
    fn test_impact_ordering() {
        let recs = cap_by_impact(
            vec![
                Recommendation {
                    action: "low".into(),
                    reason: String::new(),
                    impact: Impact::Low,
                    effort: Effort::Low,
                    horizon: Horizon::ShortTerm,
                },
                Recommendation {
                    action: "high".into(),
                    reason: String::new(),
                    impact: Impact::High,
                    effort: Effort::High,
                    horizon: Horizon::ShortTerm,
                },
            ],
            5,
        );
        assert_eq!(recs[0].action, "high");
    }
}
