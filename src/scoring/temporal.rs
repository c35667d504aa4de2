//! Temporal factor scoring
//!
//! A base of 50 modulated by time-of-day and day-of-week multipliers, a
//! sustained-session bonus, and a break-recency penalty.

use chrono::{Datelike, Timelike, Weekday};

use crate::types::{FactorScore, Observation};

/// Minutes since a break after which the penalty starts accruing.
const BREAK_GRACE_MIN: f64 = 90.0;

/// Time-of-day multiplier across 7 fixed bands.
fn time_band_multiplier(hour: u32) -> f64 {
    match hour {
        0..=4 => 0.7,
        5..=7 => 0.9,
        8..=10 => 1.2,
        11..=13 => 1.0,
        14..=16 => 1.1,
        17..=19 => 0.95,
        _ => 0.8,
    }
}

/// Day-of-week multiplier: mid-week peaks, weekends discounted.
fn weekday_multiplier(weekday: Weekday) -> f64 {
    match weekday {
        Weekday::Tue | Weekday::Wed | Weekday::Thu => 1.1,
        Weekday::Mon | Weekday::Fri => 1.0,
        Weekday::Sat | Weekday::Sun => 0.85,
    }
}

/// Compute the temporal sub-score (0-100).
pub fn score_temporal(observation: &Observation) -> FactorScore {
    let ts = observation.timestamp;
    let mut score = 50.0 * time_band_multiplier(ts.hour()) * weekday_multiplier(ts.weekday());

    // The timestamp alone supports a moderate confidence; session and break
    // telemetry raise it.
    let mut confidence: f64 = 0.6;

    if let Some(signals) = observation.raw_signals.as_ref() {
        if let Some(session_min) = signals.session_duration_min {
            // Sustained single-session work earns up to +15.
            score += (session_min / 6.0).min(15.0);
            confidence += 0.15;
        }

        if let Some(since_break) = signals.minutes_since_break {
            if since_break > BREAK_GRACE_MIN {
                score -= (0.2 * (since_break - BREAK_GRACE_MIN)).min(15.0);
            }
            confidence += 0.15;
        }
    }

    FactorScore {
        score: score.clamp(0.0, 100.0),
        confidence: confidence.min(1.0),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::RawSignals;
    use chrono::{TimeZone, Utc};

    fn obs_at(hour: u32) -> Observation {
        // 2026-03-04 is a Wednesday
        Observation::new(
            Utc.with_ymd_and_hms(2026, 3, 4, hour, 0, 0).unwrap(),
            "vscode",
        )
    }

    #[test]
    fn test_mid_morning_beats_late_night() {
        let morning = score_temporal(&obs_at(9));
        let night = score_temporal(&obs_at(2));
        assert!(morning.score > night.score);
        // Wednesday mid-morning: 50 * 1.2 * 1.1 = 66
        assert!((morning.score - 66.0).abs() < 1e-9);
    }

    #[test]
    fn test_weekend_discount() {
        // 2026-03-07 is a Saturday
        let weekend = Observation::new(
            Utc.with_ymd_and_hms(2026, 3, 7, 9, 0, 0).unwrap(),
            "vscode",
        );
        let weekday = obs_at(9);
        assert!(score_temporal(&weekend).score < score_temporal(&weekday).score);
    }

    #[test]
    fn test_session_bonus_caps() {
        let mut o = obs_at(11);
        o.raw_signals = Some(RawSignals {
            session_duration_min: Some(300.0),
            ..Default::default()
        });
        // Wednesday 11:00 base: 50 * 1.0 * 1.1 = 55; bonus caps at +15
        assert!((score_temporal(&o).score - 70.0).abs() < 1e-9);
    }

    #[test]
    fn test_break_recency_penalty() {
        let mut o = obs_at(11);
        o.raw_signals = Some(RawSignals {
            minutes_since_break: Some(140.0),
            ..Default::default()
        });
        // 50 minutes past the grace window: -10
        assert!((score_temporal(&o).score - 45.0).abs() < 1e-9);

        o.raw_signals = Some(RawSignals {
            minutes_since_break: Some(60.0),
            ..Default::default()
        });
        // Inside the grace window: no penalty
        assert!((score_temporal(&o).score - 55.0).abs() < 1e-9);
    }

    #[test]
    fn test_telemetry_raises_confidence() {
        let bare = score_temporal(&obs_at(9));
        let mut o = obs_at(9);
        o.raw_signals = Some(RawSignals {
            session_duration_min: Some(30.0),
            minutes_since_break: Some(20.0),
            ..Default::default()
        });
        assert!(score_temporal(&o).confidence > bare.confidence);
    }
}
