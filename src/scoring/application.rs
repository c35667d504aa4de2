//! Application factor scoring
//!
//! Scores the foreground application from the curated catalog rating,
//! refines browsers via window-label keywords, and penalizes heavy
//! multitasking and rapid recent switching.

use crate::catalog::ActivityCatalog;
use crate::types::{FactorScore, Observation};

/// Score a browser tab classified as a work tool.
const WORK_LABEL_SCORE: f64 = 85.0;

/// Score a browser tab classified as leisure.
const LEISURE_LABEL_SCORE: f64 = 20.0;

/// Compute the application sub-score (0-100).
pub fn score_application(observation: &Observation, catalog: &ActivityCatalog) -> FactorScore {
    let app = observation.primary_application.as_str();
    let known = app != "unknown" && !app.is_empty();

    let mut score = catalog.rating(app) * 10.0;
    let mut confidence: f64 = if known { 0.85 } else { 0.35 };

    // Browser refinement: the label tells us more than the binary name does.
    if catalog.is_browser(app) {
        if let Some(label) = observation.window_label.as_deref() {
            match catalog.classify_window_label(label) {
                Some(true) => {
                    score = WORK_LABEL_SCORE;
                    confidence = (confidence + 0.1).min(1.0);
                }
                Some(false) => {
                    score = LEISURE_LABEL_SCORE;
                    confidence = (confidence + 0.1).min(1.0);
                }
                None => confidence = (confidence - 0.1).max(0.2),
            }
        } else {
            confidence = (confidence - 0.15).max(0.2);
        }
    }

    // Concurrent application penalty: more than two visible apps dilutes
    // attention multiplicatively.
    let concurrent = 1 + observation.secondary_applications.len();
    let concurrency_factor = match concurrent {
        0..=2 => 1.0,
        3..=4 => 0.9,
        5..=6 => 0.8,
        _ => 0.7,
    };
    score *= concurrency_factor;

    // Recent switching penalty, proportional beyond 3 switches, floor 0.7.
    if let Some(switches) = observation
        .raw_signals
        .as_ref()
        .and_then(|s| s.recent_switch_count)
    {
        if switches > 3 {
            let factor = (1.0 - 0.05 * (switches - 3) as f64).max(0.7);
            score *= factor;
        }
    }

    FactorScore {
        score: score.clamp(0.0, 100.0),
        confidence,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::RawSignals;
    use chrono::{TimeZone, Utc};

    fn obs(app: &str) -> Observation {
        Observation::new(Utc.with_ymd_and_hms(2026, 3, 2, 10, 0, 0).unwrap(), app)
    }

    #[test]
    fn test_known_app_scales_rating() {
        let catalog = ActivityCatalog::default();
        let result = score_application(&obs("vscode"), &catalog);
        assert_eq!(result.score, 90.0);
        assert!(result.confidence > 0.8);
    }

    #[test]
    fn test_unknown_app_neutral_low_confidence() {
        let catalog = ActivityCatalog::default();
        let result = score_application(&obs("unknown"), &catalog);
        assert_eq!(result.score, 50.0);
        assert!(result.confidence < 0.5);
    }

    #[test]
    fn test_browser_refined_by_work_label() {
        let catalog = ActivityCatalog::default();
        let mut observation = obs("chrome");
        observation.window_label = Some("CI pipeline - GitLab".to_string());
        let result = score_application(&observation, &catalog);
        assert_eq!(result.score, WORK_LABEL_SCORE);
    }

    #[test]
    fn test_browser_refined_by_leisure_label() {
        let catalog = ActivityCatalog::default();
        let mut observation = obs("firefox");
        observation.window_label = Some("cat compilation - YouTube".to_string());
        let result = score_application(&observation, &catalog);
        assert_eq!(result.score, LEISURE_LABEL_SCORE);
    }

    #[test]
    fn test_browser_without_label_drops_confidence() {
        let catalog = ActivityCatalog::default();
        let labeled = {
            let mut o = obs("chrome");
            o.window_label = Some("design review docs".to_string());
            score_application(&o, &catalog)
        };
        let unlabeled = score_application(&obs("chrome"), &catalog);
        assert!(unlabeled.confidence < labeled.confidence);
    }

    #[test]
    fn test_concurrency_penalty_tiers() {
        let catalog = ActivityCatalog::default();

        let mut observation = obs("vscode");
        observation.secondary_applications = vec!["slack".into(), "chrome".into()];
        // 3 apps visible -> x0.9
        assert_eq!(score_application(&observation, &catalog).score, 81.0);

        observation.secondary_applications =
            vec!["slack".into(), "chrome".into(), "mail".into(), "spotify".into()];
        // 5 apps visible -> x0.8
        assert_eq!(score_application(&observation, &catalog).score, 72.0);

        observation.secondary_applications = (0..7).map(|i| format!("app{}", i)).collect();
        // 8 apps visible -> x0.7
        assert!((score_application(&observation, &catalog).score - 63.0).abs() < 1e-9);
    }

    #[test]
    fn test_switch_penalty_floor() {
        let catalog = ActivityCatalog::default();
        let mut observation = obs("vscode");
        observation.raw_signals = Some(RawSignals {
            recent_switch_count: Some(30),
            ..Default::default()
        });
        // Penalty factor floors at 0.7
        assert!((score_application(&observation, &catalog).score - 63.0).abs() < 1e-9);
    }

    #[test]
    fn test_switch_penalty_proportional() {
        let catalog = ActivityCatalog::default();
        let mut observation = obs("vscode");
        observation.raw_signals = Some(RawSignals {
            recent_switch_count: Some(5),
            ..Default::default()
        });
        // 2 switches over the limit -> x0.9
        assert!((score_application(&observation, &catalog).score - 81.0).abs() < 1e-9);
    }
}
