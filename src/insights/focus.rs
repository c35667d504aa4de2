//! Focus insights: session shape, flow frequency, interruption cost,
//! and focus strategies

use crate::patterns::PatternReport;
use crate::types::{
    Effort, FocusQuality, Horizon, Impact, Importance, Insight, Recommendation,
};

/// Session average above which a deep-tagged session counts as flow.
const FLOW_SESSION_SCORE: f64 = 80.0;

/// Average session length under which fixed focus blocks are suggested.
const SHORT_SESSION_MIN: f64 = 15.0;

/// Distraction episode rate above which an environment change is suggested.
const HIGH_DISTRACTION_RATE: f64 = 1.0;

pub fn focus_insights(patterns: &PatternReport) -> (Vec<Insight>, Vec<Recommendation>) {
    let mut insights = Vec::new();
    let mut recommendations = Vec::new();

    let focus = &patterns.focus;

    if focus.sessions.is_empty() {
        insights.push(Insight {
            category: "focus".to_string(),
            title: "No sustained focus".to_string(),
            summary: "The window contains no stretch of sustained high-scoring work."
                .to_string(),
            importance: Importance::High,
            value: None,
        });
        recommendations.push(fixed_blocks_recommendation());
    } else {
        insights.push(Insight {
            category: "focus".to_string(),
            title: "Focus session shape".to_string(),
            summary: format!(
                "{} sessions averaging {:.0} min; the longest ran {:.0} min.",
                focus.sessions.len(),
                focus.average_session_min,
                focus.longest_session_min
            ),
            importance: Importance::Medium,
            value: Some(focus.average_session_min),
        });

        let flow_sessions = focus
            .sessions
            .iter()
            .filter(|s| {
                s.average_score > FLOW_SESSION_SCORE && s.focus_quality == FocusQuality::Deep
            })
            .count();
        if flow_sessions > 0 {
            insights.push(Insight {
                category: "focus".to_string(),
                title: "Flow state reached".to_string(),
                summary: format!(
                    "{} of {} sessions ran at flow-level scores.",
                    flow_sessions,
                    focus.sessions.len()
                ),
                importance: Importance::Medium,
                value: Some(flow_sessions as f64 / focus.sessions.len() as f64),
            });
        }

        if focus.average_session_min < SHORT_SESSION_MIN {
            recommendations.push(fixed_blocks_recommendation());
        }
    }

    if focus.total_interruptions > 0 {
        let recovery = patterns.distraction.average_recovery_min.unwrap_or(0.0);
        let drop = average_score_drop(patterns);
        // Cost = frequency x score drop (as a fraction) x recovery time
        let cost_min = focus.total_interruptions as f64 * (drop / 100.0) * recovery;
        insights.push(Insight {
            category: "focus".to_string(),
            title: "Interruption cost".to_string(),
            summary: if recovery > 0.0 {
                format!(
                    "{} interruptions, each dropping roughly {:.0} points with {:.0} min of recovery, about {:.0} focus-minutes lost.",
                    focus.total_interruptions, drop, recovery, cost_min
                )
            } else {
                format!("{} interruptions cut into focus sessions.", focus.total_interruptions)
            },
            importance: if cost_min > 30.0 {
                Importance::High
            } else {
                Importance::Medium
            },
            value: Some(cost_min),
        });
    }

    if patterns.distraction.episodes_per_hour > HIGH_DISTRACTION_RATE {
        recommendations.push(Recommendation {
            action: "Silence notifications and close distracting applications before starting"
                .to_string(),
            reason: format!(
                "{:.1} distraction episodes per hour",
                patterns.distraction.episodes_per_hour
            ),
            impact: Impact::High,
            effort: Effort::Low,
            horizon: Horizon::ShortTerm,
        });
    }

    (insights, recommendations)
}

/// Average points lost per interruption: mean session score minus the mean
/// distraction floor. Full weight (100) when either side lacks data.
fn average_score_drop(patterns: &PatternReport) -> f64 {
    let sessions = &patterns.focus.sessions;
    let episodes = &patterns.distraction.episodes;
    if sessions.is_empty() || episodes.is_empty() {
        return 100.0;
    }
    let session_avg =
        sessions.iter().map(|s| s.average_score).sum::<f64>() / sessions.len() as f64;
    let floor =
        episodes.iter().map(|e| e.lowest_score as f64).sum::<f64>() / episodes.len() as f64;
    (session_avg - floor).max(0.0)
}

fn fixed_blocks_recommendation() -> Recommendation {
    Recommendation {
        action: "Work in fixed 25-30 minute blocks with a hard stop on other inputs".to_string(),
        reason: "focus sessions are short or absent".to_string(),
        impact: Impact::High,
        effort: Effort::Medium,
        horizon: Horizon::ShortTerm,
    }
}
