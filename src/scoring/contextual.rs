//! Contextual factor scoring
//!
//! Adjustments from work context: project complexity/priority/deadline,
//! meeting state, notification pressure, and environment flags.

use crate::types::{FactorScore, Observation};

/// Flat bonus while a meeting is active.
const MEETING_BONUS: f64 = 10.0;

/// Penalty per notification, capped.
const NOTIFICATION_PENALTY: f64 = 2.0;
const NOTIFICATION_PENALTY_CAP: f64 = 20.0;

/// Bonus per favorable environment flag, capped at three flags.
const ENVIRONMENT_BONUS: f64 = 3.0;

/// Compute the contextual sub-score (0-100).
pub fn score_contextual(observation: &Observation) -> FactorScore {
    let signals = match observation.raw_signals.as_ref() {
        Some(signals) => signals,
        None => return FactorScore::neutral(),
    };

    let mut score = 50.0;
    let mut present = 0u32;

    if let Some(project) = signals.project.as_ref() {
        let mut any = false;
        if let Some(priority) = project.priority {
            score += priority.clamp(0.0, 10.0) - 5.0;
            any = true;
        }
        if let Some(urgency) = project.deadline_urgency {
            score += urgency.clamp(0.0, 10.0) - 5.0;
            any = true;
        }
        if let Some(complexity) = project.complexity {
            // Demanding work correlates with engagement, but only mildly.
            score += (complexity.clamp(0.0, 10.0) - 5.0) * 0.5;
            any = true;
        }
        if any {
            present += 1;
        }
    }

    if signals.meeting_active {
        score += MEETING_BONUS;
        present += 1;
    }

    if let Some(count) = signals.notification_count {
        score -= (NOTIFICATION_PENALTY * count as f64).min(NOTIFICATION_PENALTY_CAP);
        present += 1;
    }

    if !signals.environment_flags.is_empty() {
        score += ENVIRONMENT_BONUS * (signals.environment_flags.len().min(3) as f64);
        present += 1;
    }

    if present == 0 {
        return FactorScore::neutral();
    }

    FactorScore {
        score: score.clamp(0.0, 100.0),
        confidence: (0.2 + 0.7 * present as f64 / 4.0).min(0.9),
    }
}
