//! Task-switch detection and classification
//!
//! A switch is any change of primary application between consecutive
//! observations. Each switch is classified by the destination application's
//! category, and the overall mix is condensed into an efficiency score.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::catalog::{ActivityCatalog, AppCategory};
use crate::types::ScoredObservation;

/// Per-gap attribution cap so an overnight pause does not credit hours of
/// use to whatever application was open last.
const GAP_CAP_MIN: f64 = 30.0;

/// How many of the most frequent transitions to report.
const TOP_TRANSITIONS: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SwitchClassification {
    /// Movement between work tools, likely part of one task.
    Contextual,
    /// Into chat, mail, or a call.
    Communication,
    /// Into entertainment, social media, or news.
    Distracting,
    /// Browsers, system surfaces, and unknown applications.
    Neutral,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskSwitchEvent {
    pub from_application: String,
    pub to_application: String,
    pub timestamp: DateTime<Utc>,
    /// Minutes since the previous switch; absent for the first switch.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub minutes_since_previous: Option<f64>,
    pub classification: SwitchClassification,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransitionCount {
    pub from_application: String,
    pub to_application: String,
    pub count: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SwitchingAnalysis {
    pub events: Vec<TaskSwitchEvent>,
    pub total_switches: usize,
    pub switches_per_hour: f64,
    pub contextual_count: usize,
    pub communication_count: usize,
    pub distracting_count: usize,
    pub neutral_count: usize,
    /// Approximate minutes per application, attributing each inter-observation
    /// gap (capped) to the application that was active when it began.
    pub time_by_application_min: HashMap<String, f64>,
    pub top_transitions: Vec<TransitionCount>,
    /// 0-100; 50 is a balanced mix, above favors contextual switches.
    pub efficiency_score: f64,
}

pub fn classify_switch(to_application: &str, catalog: &ActivityCatalog) -> SwitchClassification {
    match catalog.category(to_application) {
        AppCategory::Development | AppCategory::Productivity => SwitchClassification::Contextual,
        AppCategory::Communication => SwitchClassification::Communication,
        AppCategory::Entertainment | AppCategory::SocialMedia | AppCategory::News => {
            SwitchClassification::Distracting
        }
        AppCategory::Browser | AppCategory::System | AppCategory::Unknown => {
            SwitchClassification::Neutral
        }
    }
}

/// Analyze switching behavior over time-ordered observations.
pub fn analyze_switching(
    observations: &[ScoredObservation],
    catalog: &ActivityCatalog,
) -> SwitchingAnalysis {
    let mut events: Vec<TaskSwitchEvent> = Vec::new();
    let mut time_by_application: HashMap<String, f64> = HashMap::new();
    let mut transitions: HashMap<(String, String), u32> = HashMap::new();
    let mut last_switch_at: Option<DateTime<Utc>> = None;

    for pair in observations.windows(2) {
        let (prev, next) = (&pair[0], &pair[1]);
        let gap_min = (next.timestamp() - prev.timestamp()).num_seconds() as f64 / 60.0;
        *time_by_application
            .entry(prev.application().to_string())
            .or_insert(0.0) += gap_min.min(GAP_CAP_MIN);

        if prev.application() == next.application() {
            continue;
        }

        let ts = next.timestamp();
        events.push(TaskSwitchEvent {
            from_application: prev.application().to_string(),
            to_application: next.application().to_string(),
            timestamp: ts,
            minutes_since_previous: last_switch_at
                .map(|at| (ts - at).num_seconds() as f64 / 60.0),
            classification: classify_switch(next.application(), catalog),
        });
        last_switch_at = Some(ts);
        *transitions
            .entry((
                prev.application().to_string(),
                next.application().to_string(),
            ))
            .or_insert(0) += 1;
    }

    let count_of = |class: SwitchClassification| {
        events.iter().filter(|e| e.classification == class).count()
    };
    let contextual = count_of(SwitchClassification::Contextual);
    let communication = count_of(SwitchClassification::Communication);
    let distracting = count_of(SwitchClassification::Distracting);
    let neutral = count_of(SwitchClassification::Neutral);

    let span_hours = match (observations.first(), observations.last()) {
        (Some(first), Some(last)) => {
            (last.timestamp() - first.timestamp()).num_seconds() as f64 / 3600.0
        }
        _ => 0.0,
    };
    let switches_per_hour = if span_hours > 0.0 {
        events.len() as f64 / span_hours
    } else {
        0.0
    };

    let mut top: Vec<TransitionCount> = transitions
        .into_iter()
        .map(|((from, to), count)| TransitionCount {
            from_application: from,
            to_application: to,
            count,
        })
        .collect();
    top.sort_by(|a, b| {
        b.count
            .cmp(&a.count)
            .then_with(|| a.from_application.cmp(&b.from_application))
            .then_with(|| a.to_application.cmp(&b.to_application))
    });
    top.truncate(TOP_TRANSITIONS);

    SwitchingAnalysis {
        total_switches: events.len(),
        switches_per_hour,
        contextual_count: contextual,
        communication_count: communication,
        distracting_count: distracting,
        neutral_count: neutral,
        time_by_application_min: time_by_application,
        top_transitions: top,
        efficiency_score: efficiency_score(contextual, distracting, events.len()),
        events,
    }
}

/// 50 plus the contextual-minus-distracting share scaled to +-100, clamped.
/// With no switches at all the mix is trivially balanced.
fn efficiency_score(contextual: usize, distracting: usize, total: usize) -> f64 {
    if total == 0 {
        return 50.0;
    }
    let lean = (contextual as f64 - distracting as f64) / total as f64;
    (50.0 + 100.0 * lean).clamp(0.0, 100.0)
}
