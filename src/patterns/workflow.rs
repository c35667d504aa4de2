//! Recurring workflow detection
//!
//! Consecutive observations sharing an activity type form a run; an activity
//! that recurs across multiple runs is a workflow. The stated activity from
//! raw signals stands in when no classification is attached. Observations
//! without either break runs and are otherwise ignored.

use serde::{Deserialize, Serialize};

use crate::trend;
use crate::types::{ActivityType, ScoredObservation};

/// Runs needed before an activity counts as a recurring workflow.
const MIN_RUNS: usize = 2;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkflowPattern {
    pub activity: ActivityType,
    /// Number of separate runs of this activity
    pub occurrence_count: usize,
    pub total_observations: usize,
    pub average_duration_min: f64,
    /// Mean score across all observations of the activity
    pub average_productivity: f64,
    /// Time-weighted mean score (0-100); equals `average_productivity` when
    /// all runs are instantaneous
    pub efficiency: f64,
}

struct Run {
    activity: ActivityType,
    scores: Vec<f64>,
    duration_min: f64,
}

fn collect_runs(observations: &[ScoredObservation]) -> Vec<Run> {
    let mut runs: Vec<Run> = Vec::new();
    let mut current: Option<(ActivityType, usize)> = None;

    let close = |activity: ActivityType, start: usize, end: usize, runs: &mut Vec<Run>| {
        let slice = &observations[start..=end];
        runs.push(Run {
            activity,
            scores: slice.iter().map(|o| o.score as f64).collect(),
            duration_min: (slice[slice.len() - 1].timestamp() - slice[0].timestamp())
                .num_seconds() as f64
                / 60.0,
        });
    };

    for (index, scored) in observations.iter().enumerate() {
        match (current, scored.observation.effective_activity()) {
            (None, Some(activity)) => current = Some((activity, index)),
            (Some((activity, start)), Some(next)) if next != activity => {
                close(activity, start, index - 1, &mut runs);
                current = Some((next, index));
            }
            (Some((activity, start)), None) => {
                close(activity, start, index - 1, &mut runs);
                current = None;
            }
            _ => {}
        }
    }
    if let Some((activity, start)) = current {
        close(activity, start, observations.len() - 1, &mut runs);
    }
    runs
}

/// Identify recurring workflows, most frequent first.
pub fn analyze_workflows(observations: &[ScoredObservation]) -> Vec<WorkflowPattern> {
    let runs = collect_runs(observations);

    let mut patterns: Vec<WorkflowPattern> = Vec::new();
    let mut seen: Vec<ActivityType> = Vec::new();

    for run in &runs {
        if seen.contains(&run.activity) {
            continue;
        }
        seen.push(run.activity);

        let of_activity: Vec<&Run> = runs.iter().filter(|r| r.activity == run.activity).collect();
        if of_activity.len() < MIN_RUNS {
            continue;
        }

        let all_scores: Vec<f64> = of_activity
            .iter()
            .flat_map(|r| r.scores.iter().copied())
            .collect();
        let total_duration: f64 = of_activity.iter().map(|r| r.duration_min).sum();
        let average_productivity = trend::mean(&all_scores);

        let efficiency = if total_duration > 0.0 {
            of_activity
                .iter()
                .map(|r| trend::mean(&r.scores) * r.duration_min)
                .sum::<f64>()
                / total_duration
        } else {
            average_productivity
        };

        patterns.push(WorkflowPattern {
            activity: run.activity,
            occurrence_count: of_activity.len(),
            total_observations: all_scores.len(),
            average_duration_min: total_duration / of_activity.len() as f64,
            average_productivity,
            efficiency,
        });
    }

    patterns.sort_by(|a, b| b.occurrence_count.cmp(&a.occurrence_count));
    patterns
}
