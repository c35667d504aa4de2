//! Daily rhythm analysis
//!
//! Observations are bucketed by time of day into fixed-width slots. Each
//! occupied slot reports its average, peak, and consistency; the best and
//! worst slots and the overall trend summarize the day shape.

use chrono::Timelike;
use serde::{Deserialize, Serialize};

use crate::config::EngineConfig;
use crate::trend::{self, classify_trend, TrendDirection};
use crate::types::{AnalysisOutcome, ScoredObservation};

/// How many peak/low slots to surface.
const HIGHLIGHT_SLOTS: usize = 3;

/// One occupied time-of-day slot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimeSlotBucket {
    /// Slot index within the day (0 = midnight)
    pub slot: u32,
    /// Human-readable slot span, e.g. "09:00-09:30"
    pub label: String,
    pub average_score: f64,
    pub peak_score: u8,
    /// 100 minus twice the score standard deviation, floored at 0
    pub consistency: f64,
    pub sample_count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RhythmAnalysis {
    /// Occupied slots in time-of-day order
    pub buckets: Vec<TimeSlotBucket>,
    /// Up to three slots with the highest averages, best first
    pub peak_periods: Vec<TimeSlotBucket>,
    /// Up to three slots with the lowest averages, worst first
    pub low_periods: Vec<TimeSlotBucket>,
    pub trend: AnalysisOutcome<TrendDirection>,
}

fn slot_label(slot: u32, bucket_min: u32) -> String {
    let start = slot * bucket_min;
    let end = start + bucket_min;
    format!(
        "{:02}:{:02}-{:02}:{:02}",
        start / 60,
        start % 60,
        (end / 60) % 24,
        end % 60
    )
}

/// Analyze the daily productivity rhythm.
pub fn analyze_rhythm(
    observations: &[ScoredObservation],
    config: &EngineConfig,
) -> AnalysisOutcome<RhythmAnalysis> {
    AnalysisOutcome::require(config.rhythm_min_observations, observations.len(), || {
        let bucket_min = config.rhythm_bucket_min;
        let slots_per_day = 1440 / bucket_min;
        let mut slot_scores: Vec<Vec<f64>> = vec![Vec::new(); slots_per_day as usize];

        for scored in observations {
            let minute_of_day =
                scored.timestamp().hour() * 60 + scored.timestamp().minute();
            let slot = (minute_of_day / bucket_min).min(slots_per_day - 1);
            slot_scores[slot as usize].push(scored.score as f64);
        }

        let buckets: Vec<TimeSlotBucket> = slot_scores
            .iter()
            .enumerate()
            .filter(|(_, scores)| !scores.is_empty())
            .map(|(slot, scores)| {
                let slot = slot as u32;
                let average = trend::mean(scores);
                let peak = scores.iter().cloned().fold(0.0_f64, f64::max);
                TimeSlotBucket {
                    slot,
                    label: slot_label(slot, bucket_min),
                    average_score: average,
                    peak_score: peak.round() as u8,
                    consistency: (100.0 - 2.0 * trend::std_dev(scores)).max(0.0),
                    sample_count: scores.len(),
                }
            })
            .collect();

        let mut by_average = buckets.clone();
        by_average.sort_by(|a, b| {
            b.average_score
                .partial_cmp(&a.average_score)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| a.slot.cmp(&b.slot))
        });
        let peak_periods: Vec<TimeSlotBucket> =
            by_average.iter().take(HIGHLIGHT_SLOTS).cloned().collect();
        let low_periods: Vec<TimeSlotBucket> = by_average
            .iter()
            .rev()
            .take(HIGHLIGHT_SLOTS)
            .cloned()
            .collect();

        let scores: Vec<f64> = observations.iter().map(|o| o.score as f64).collect();
        let trend = classify_trend(&scores, config.trend_min_observations);

        RhythmAnalysis {
            buckets,
            peak_periods,
            low_periods,
            trend,
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::scored_at;
    use chrono::{TimeZone, Utc};
    use pretty_assertions::assert_eq;

    fn at(hour: u32, minute: u32, score: u8) -> ScoredObservation {
        scored_at(
            Utc.with_ymd_and_hms(2026, 3, 4, hour, minute, 0).unwrap(),
            "vscode",
            score,
        )
    }

    #[test]
    fn test_requires_minimum_observations() {
        let obs: Vec<_> = (0..9).map(|i| at(9, i * 5, 70)).collect();
        assert_eq!(
            analyze_rhythm(&obs, &EngineConfig::default()),
            AnalysisOutcome::InsufficientData {
                required: 10,
                actual: 9
            }
        );
    }

    #[test]
    fn test_buckets_by_half_hour() {
        let mut obs: Vec<_> = (0..5).map(|i| at(9, i * 5, 80)).collect();
        obs.extend((0..5).map(|i| at(14, 30 + i * 5, 40)));
        let analysis = analyze_rhythm(&obs, &EngineConfig::default())
            .into_ready()
            .unwrap();

        assert_eq!(analysis.buckets.len(), 2);
        assert_eq!(analysis.buckets[0].label, "09:00-09:30");
        assert_eq!(analysis.buckets[0].sample_count, 5);
        assert_eq!(analysis.buckets[1].label, "14:30-15:00");
    }

    #[test]
    fn test_peak_and_low_periods() {
        let mut obs: Vec<_> = (0..4).map(|i| at(9, i * 5, 90)).collect();
        obs.extend((0..4).map(|i| at(11, i * 5, 60)));
        obs.extend((0..4).map(|i| at(15, i * 5, 30)));
        let analysis = analyze_rhythm(&obs, &EngineConfig::default())
            .into_ready()
            .unwrap();

        assert_eq!(analysis.peak_periods[0].label, "09:00-09:30");
        assert_eq!(analysis.low_periods[0].label, "15:00-15:30");
    }

    #[test]
    fn test_consistency_penalizes_spread() {
        let steady: Vec<_> = (0..10).map(|i| at(9, i * 2, 70)).collect();
        let analysis = analyze_rhythm(&steady, &EngineConfig::default())
            .into_ready()
            .unwrap();
        assert_eq!(analysis.buckets[0].consistency, 100.0);

        let mut volatile: Vec<_> = (0..5).map(|i| at(9, i * 2, 20)).collect();
        volatile.extend((0..5).map(|i| at(9, 10 + i * 2, 100)));
        let analysis = analyze_rhythm(&volatile, &EngineConfig::default())
            .into_ready()
            .unwrap();
        // std dev 40 -> consistency 20
        assert!((analysis.buckets[0].consistency - 20.0).abs() < 1e-9);
    }

    #[test]
    fn test_trend_included_when_enough_points() {
        let mut obs: Vec<_> = (0..5).map(|i| at(9, i * 5, 40)).collect();
        obs.extend((0..5).map(|i| at(10, i * 5, 80)));
        let analysis = analyze_rhythm(&obs, &EngineConfig::default())
            .into_ready()
            .unwrap();
        assert_eq!(
            analysis.trend,
            AnalysisOutcome::Ready(TrendDirection::StronglyImproving)
        );
    }

    #[test]
    fn test_midnight_slot_label_wraps() {
        assert_eq!(slot_label(47, 30), "23:30-00:00");
        assert_eq!(slot_label(0, 30), "00:00-00:30");
    }
}
