//! Productivity insights: peaks, dips, contributing factors, opportunities

use std::collections::HashMap;

use chrono::Timelike;

use crate::config::EngineConfig;
use crate::patterns::PatternReport;
use crate::trend;
use crate::types::{
    Effort, Horizon, Impact, Importance, Insight, Recommendation, ScoredObservation,
};

/// Minimum samples before an application or hour aggregate is worth naming.
const MIN_SAMPLES: usize = 2;

/// Average score above which an application counts as a positive factor.
const POSITIVE_FACTOR_FLOOR: f64 = 60.0;

/// Average score below which an application counts as a negative factor.
const NEGATIVE_FACTOR_CEILING: f64 = 40.0;

pub fn productivity_insights(
    observations: &[ScoredObservation],
    patterns: &PatternReport,
    config: &EngineConfig,
) -> (Vec<Insight>, Vec<Recommendation>) {
    let mut insights = Vec::new();
    let mut recommendations = Vec::new();

    peaks_and_dips(observations, &mut insights);
    contributing_factors(patterns, &mut insights);
    hourly_opportunities(observations, config, &mut insights, &mut recommendations);
    switching_opportunity(observations, patterns, config, &mut recommendations);

    (insights, recommendations)
}

/// Compare the top and bottom score quintiles and name when the peaks happen.
fn peaks_and_dips(observations: &[ScoredObservation], insights: &mut Vec<Insight>) {
    let mut by_score: Vec<&ScoredObservation> = observations.iter().collect();
    by_score.sort_by(|a, b| a.score.cmp(&b.score));
    let quintile = (observations.len() / 5).max(1);

    let bottom: Vec<f64> = by_score[..quintile].iter().map(|o| o.score as f64).collect();
    let top: Vec<f64> = by_score[by_score.len() - quintile..]
        .iter()
        .map(|o| o.score as f64)
        .collect();
    let top_mean = trend::mean(&top);
    let bottom_mean = trend::mean(&bottom);

    // Most common hour among the top quintile
    let mut hour_counts: HashMap<u32, usize> = HashMap::new();
    for scored in &by_score[by_score.len() - quintile..] {
        *hour_counts.entry(scored.timestamp().hour()).or_insert(0) += 1;
    }
    let peak_hour = hour_counts
        .into_iter()
        .max_by_key(|&(hour, count)| (count, std::cmp::Reverse(hour)))
        .map(|(hour, _)| hour);

    if let Some(hour) = peak_hour {
        insights.push(Insight {
            category: "productivity".to_string(),
            title: "Peak output window".to_string(),
            summary: format!(
                "Your best stretches average {:.0} and cluster around {:02}:00.",
                top_mean, hour
            ),
            importance: Importance::Medium,
            value: Some(top_mean),
        });
    }

    if top_mean - bottom_mean >= 30.0 {
        insights.push(Insight {
            category: "productivity".to_string(),
            title: "Wide productivity swing".to_string(),
            summary: format!(
                "Your lowest stretches average {:.0}, {:.0} points below your best.",
                bottom_mean,
                top_mean - bottom_mean
            ),
            importance: Importance::Medium,
            value: Some(top_mean - bottom_mean),
        });
    }
}

/// Name the applications pulling the average up or down.
fn contributing_factors(patterns: &PatternReport, insights: &mut Vec<Insight>) {
    let eligible: Vec<_> = patterns
        .usage
        .iter()
        .filter(|u| u.observation_count >= MIN_SAMPLES)
        .collect();

    let best = eligible.iter().max_by(|a, b| {
        a.average_score
            .partial_cmp(&b.average_score)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    if let Some(best) = best {
        if best.average_score >= POSITIVE_FACTOR_FLOOR {
            insights.push(Insight {
                category: "productivity".to_string(),
                title: "Strongest application".to_string(),
                summary: format!(
                    "Time in {} averages {:.0}, your most productive context.",
                    best.application, best.average_score
                ),
                importance: Importance::Medium,
                value: Some(best.average_score),
            });
        }
    }

    let worst = eligible.iter().min_by(|a, b| {
        a.average_score
            .partial_cmp(&b.average_score)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    if let Some(worst) = worst {
        if worst.average_score <= NEGATIVE_FACTOR_CEILING {
            insights.push(Insight {
                category: "productivity".to_string(),
                title: "Main productivity drain".to_string(),
                summary: format!(
                    "Time in {} averages only {:.0}.",
                    worst.application, worst.average_score
                ),
                importance: Importance::High,
                value: Some(worst.average_score),
            });
        }
    }
}

/// Flag hours of the day that consistently score poorly.
fn hourly_opportunities(
    observations: &[ScoredObservation],
    config: &EngineConfig,
    insights: &mut Vec<Insight>,
    recommendations: &mut Vec<Recommendation>,
) {
    let mut by_hour: HashMap<u32, Vec<f64>> = HashMap::new();
    for scored in observations {
        by_hour
            .entry(scored.timestamp().hour())
            .or_default()
            .push(scored.score as f64);
    }

    let mut weak_hours: Vec<(u32, f64)> = by_hour
        .into_iter()
        .filter(|(_, scores)| scores.len() >= MIN_SAMPLES)
        .map(|(hour, scores)| (hour, trend::mean(&scores)))
        .filter(|&(_, avg)| avg < config.low_hour_threshold)
        .collect();
    weak_hours.sort_by(|a, b| {
        a.1.partial_cmp(&b.1).unwrap_or(std::cmp::Ordering::Equal)
    });

    if let Some(&(hour, avg)) = weak_hours.first() {
        insights.push(Insight {
            category: "productivity".to_string(),
            title: "Recurring low-energy hour".to_string(),
            summary: format!("Work around {:02}:00 averages only {:.0}.", hour, avg),
            importance: Importance::Medium,
            value: Some(avg),
        });
        recommendations.push(Recommendation {
            action: format!(
                "Move routine or low-stakes work into the {:02}:00 hour",
                hour
            ),
            reason: format!("that hour consistently averages {:.0}", avg),
            impact: Impact::Medium,
            effort: Effort::Low,
            horizon: Horizon::ShortTerm,
        });
    }
}

/// Flag an unusually switch-heavy window.
fn switching_opportunity(
    observations: &[ScoredObservation],
    patterns: &PatternReport,
    config: &EngineConfig,
    recommendations: &mut Vec<Recommendation>,
) {
    let ratio = patterns.switching.total_switches as f64 / observations.len() as f64;
    if ratio > config.high_switch_ratio {
        recommendations.push(Recommendation {
            action: "Batch communication and reference checks into set windows".to_string(),
            reason: format!(
                "{} application switches across {} observations",
                patterns.switching.total_switches,
                observations.len()
            ),
            impact: Impact::High,
            effort: Effort::Medium,
            horizon: Horizon::ShortTerm,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::patterns::PatternRecognizer;
    use crate::testutil::scored_at;
    use chrono::{TimeZone, Utc};

    fn analyze(obs: &[ScoredObservation]) -> (Vec<Insight>, Vec<Recommendation>) {
        let report = PatternRecognizer::default()
            .analyze(obs)
            .unwrap()
            .into_ready()
            .unwrap();
        productivity_insights(obs, &report, &EngineConfig::default())
    }

    fn rising_window() -> Vec<ScoredObservation> {
        // 20 observations climbing from 40 to 90, all in one editor
        let base = Utc.with_ymd_and_hms(2026, 3, 4, 9, 0, 0).unwrap();
        (0..20)
            .map(|i| {
                let score = 40 + (i as f64 / 19.0 * 50.0).round() as u8;
                scored_at(base + chrono::Duration::minutes(i * 10), "vscode", score)
            })
            .collect()
    }

    #[test]
    fn test_dominant_app_named_as_positive_factor() {
        let (insights, _) = analyze(&rising_window());
        let factor = insights
            .iter()
            .find(|i| i.title == "Strongest application")
            .unwrap();
        assert!(factor.summary.contains("vscode"));
    }

    #[test]
    fn test_wide_swing_detected() {
        let (insights, _) = analyze(&rising_window());
        assert!(insights.iter().any(|i| i.title == "Wide productivity swing"));
    }

    #[test]
    fn test_drain_named_for_low_scoring_app() {
        let base = Utc.with_ymd_and_hms(2026, 3, 4, 9, 0, 0).unwrap();
        let mut obs: Vec<_> = (0..6)
            .map(|i| scored_at(base + chrono::Duration::minutes(i * 5), "vscode", 85))
            .collect();
        obs.extend(
            (6..10).map(|i| scored_at(base + chrono::Duration::minutes(i * 5), "youtube", 25)),
        );
        let (insights, _) = analyze(&obs);
        let drain = insights
            .iter()
            .find(|i| i.title == "Main productivity drain")
            .unwrap();
        assert!(drain.summary.contains("youtube"));
    }

    #[test]
    fn test_switch_heavy_window_gets_recommendation() {
        let base = Utc.with_ymd_and_hms(2026, 3, 4, 9, 0, 0).unwrap();
        let apps = ["vscode", "slack", "chrome", "vscode", "slack", "chrome"];
        let obs: Vec<_> = apps
            .iter()
            .enumerate()
            .map(|(i, app)| scored_at(base + chrono::Duration::minutes(i as i64 * 5), app, 60))
            .collect();
        let (_, recs) = analyze(&obs);
        assert!(recs.iter().any(|r| r.action.contains("Batch")));
    }

    #[test]
    fn test_weak_hour_flagged() {
        let base = Utc.with_ymd_and_hms(2026, 3, 4, 9, 0, 0).unwrap();
        let mut obs: Vec<_> = (0..4)
            .map(|i| scored_at(base + chrono::Duration::minutes(i * 10), "vscode", 80))
            .collect();
        // 14:00 hour scores poorly across multiple samples
        let afternoon = Utc.with_ymd_and_hms(2026, 3, 4, 14, 0, 0).unwrap();
        obs.extend(
            (0..3).map(|i| scored_at(afternoon + chrono::Duration::minutes(i * 10), "vscode", 30)),
        );
        let (insights, recs) = analyze(&obs);
        assert!(insights
            .iter()
            .any(|i| i.title == "Recurring low-energy hour" && i.summary.contains("14:00")));
        assert!(recs.iter().any(|r| r.action.contains("14:00")));
    }
}
