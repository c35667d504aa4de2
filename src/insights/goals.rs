//! Goal progress assessment
//!
//! Hosts register typed goals through `UserPreferences`; each type has its
//! own progress measure. When the pattern analysis a goal type depends on is
//! unavailable, the assessment falls back to the generic score-based measure
//! and says so in the summary.

use serde::{Deserialize, Serialize};

use crate::patterns::PatternReport;
use crate::trend;
use crate::types::ScoredObservation;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GoalKind {
    /// Reach an average productivity score; target is the score (0-100)
    ProductivityTarget,
    /// Lengthen focus sessions; target is minutes per session
    FocusImprovement,
    /// Limit distracted time; target is distracted minutes per day
    TimeManagement,
    /// Show up consistently; target is observations per day
    HabitFormation,
    /// Free-form goal measured by the overall average score
    Generic,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Goal {
    pub name: String,
    pub kind: GoalKind,
    /// Interpretation depends on `kind`; see the variant docs
    pub target: f64,
}

/// Host-supplied preferences consumed by insight generation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UserPreferences {
    #[serde(default)]
    pub goals: Vec<Goal>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GoalProgress {
    pub goal_name: String,
    pub kind: GoalKind,
    /// Progress toward the target (0-100)
    pub progress_pct: f64,
    pub on_track: bool,
    pub summary: String,
}

fn span_days(observations: &[ScoredObservation]) -> f64 {
    match (observations.first(), observations.last()) {
        (Some(first), Some(last)) => {
            let days = (last.timestamp() - first.timestamp()).num_seconds() as f64 / 86_400.0;
            days.max(1.0)
        }
        _ => 1.0,
    }
}

fn ratio_progress(achieved: f64, target: f64) -> f64 {
    if target <= 0.0 {
        return 0.0;
    }
    (achieved / target * 100.0).clamp(0.0, 100.0)
}

/// Assess every registered goal against the window.
pub fn assess_goals(
    goals: &[Goal],
    observations: &[ScoredObservation],
    patterns: Option<&PatternReport>,
) -> Vec<GoalProgress> {
    let scores: Vec<f64> = observations.iter().map(|o| o.score as f64).collect();
    let average = trend::mean(&scores);
    let days = span_days(observations);

    goals
        .iter()
        .map(|goal| {
            let generic = || GoalProgress {
                goal_name: goal.name.clone(),
                kind: goal.kind,
                progress_pct: ratio_progress(average, goal.target.max(1.0)),
                on_track: average >= goal.target,
                summary: format!(
                    "average score {:.0} against target {:.0} (limited data, score-based estimate)",
                    average, goal.target
                ),
            };

            match goal.kind {
                GoalKind::ProductivityTarget | GoalKind::Generic => GoalProgress {
                    goal_name: goal.name.clone(),
                    kind: goal.kind,
                    progress_pct: ratio_progress(average, goal.target),
                    on_track: average >= goal.target,
                    summary: format!(
                        "average score {:.0} of target {:.0}",
                        average, goal.target
                    ),
                },
                GoalKind::FocusImprovement => match patterns {
                    Some(report) => {
                        let achieved = report.focus.average_session_min;
                        GoalProgress {
                            goal_name: goal.name.clone(),
                            kind: goal.kind,
                            progress_pct: ratio_progress(achieved, goal.target),
                            on_track: achieved >= goal.target,
                            summary: format!(
                                "average focus session {:.0} min of target {:.0} min",
                                achieved, goal.target
                            ),
                        }
                    }
                    None => generic(),
                },
                GoalKind::TimeManagement => match patterns {
                    Some(report) => {
                        let per_day = report.distraction.total_distracted_min / days;
                        let on_track = per_day <= goal.target;
                        // Inverted measure: staying under budget is 100
                        let progress_pct = if on_track {
                            100.0
                        } else {
                            ratio_progress(goal.target, per_day)
                        };
                        GoalProgress {
                            goal_name: goal.name.clone(),
                            kind: goal.kind,
                            progress_pct,
                            on_track,
                            summary: format!(
                                "{:.0} distracted min/day against a budget of {:.0}",
                                per_day, goal.target
                            ),
                        }
                    }
                    None => generic(),
                },
                GoalKind::HabitFormation => {
                    let per_day = observations.len() as f64 / days;
                    GoalProgress {
                        goal_name: goal.name.clone(),
                        kind: goal.kind,
                        progress_pct: ratio_progress(per_day, goal.target),
                        on_track: per_day >= goal.target,
                        summary: format!(
                            "{:.1} observations/day of target {:.0}",
                            per_day, goal.target
                        ),
                    }
                }
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::patterns::PatternRecognizer;
    use crate::testutil::scored_at;
    use chrono::{TimeZone, Utc};
    use pretty_assertions::assert_eq;

    fn goal(name: &str, kind: GoalKind, target: f64) -> Goal {
        Goal {
            name: name.to_string(),
            kind,
            target,
        }
    }

    fn window(scores: &[u8]) -> Vec<ScoredObservation> {
        let base = Utc.with_ymd_and_hms(2026, 3, 4, 9, 0, 0).unwrap();
        scores
            .iter()
            .enumerate()
            .map(|(i, score)| {
                scored_at(base + chrono::Duration::minutes(i as i64 * 5), "vscode", *score)
            })
            .collect()
    }

    #[test]
    fn test_productivity_target_progress() {
        let obs = window(&[60, 60, 60, 60]);
        let progress = assess_goals(
            &[goal("hit 80", GoalKind::ProductivityTarget, 80.0)],
            &obs,
            None,
        );
        assert_eq!(progress.len(), 1);
        assert_eq!(progress[0].progress_pct, 75.0);
        assert!(!progress[0].on_track);
    }

    #[test]
    fn test_focus_goal_uses_session_lengths() {
        let obs = window(&[80, 85, 82, 88, 90]);
        let report = PatternRecognizer::default()
            .analyze(&obs)
            .unwrap()
            .into_ready()
            .unwrap();
        // One 20-minute session against a 40-minute target
        let progress = assess_goals(
            &[goal("longer sessions", GoalKind::FocusImprovement, 40.0)],
            &obs,
            Some(&report),
        );
        assert_eq!(progress[0].progress_pct, 50.0);
    }

    #[test]
    fn test_focus_goal_falls_back_without_patterns() {
        let obs = window(&[80, 85]);
        let progress = assess_goals(
            &[goal("longer sessions", GoalKind::FocusImprovement, 40.0)],
            &obs,
            None,
        );
        assert!(progress[0].summary.contains("limited data"));
    }

    #[test]
    fn test_time_management_under_budget() {
        let obs = window(&[80, 85, 82, 88, 90]);
        let report = PatternRecognizer::default()
            .analyze(&obs)
            .unwrap()
            .into_ready()
            .unwrap();
        let progress = assess_goals(
            &[goal("less doomscrolling", GoalKind::TimeManagement, 30.0)],
            &obs,
            Some(&report),
        );
        assert_eq!(progress[0].progress_pct, 100.0);
        assert!(progress[0].on_track);
    }

    #[test]
    fn test_habit_goal_counts_per_day() {
        let obs = window(&[70; 12]);
        let progress = assess_goals(
            &[goal("log daily", GoalKind::HabitFormation, 24.0)],
            &obs,
            None,
        );
        // 12 observations inside a single day against a target of 24
        assert_eq!(progress[0].progress_pct, 50.0);
    }
}
