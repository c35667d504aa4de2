//! Behavioral factor scoring
//!
//! Adjustments from interaction telemetry: typing cadence, mouse activity,
//! scroll behavior, and focus consistency. A missing signal is omitted from
//! the score entirely, never treated as zero; it only lowers confidence.

use crate::types::{FactorScore, MovementPattern, Observation, RawSignals, ScrollPattern};

/// Number of distinct behavioral signal groups the confidence is based on.
const SIGNAL_GROUPS: f64 = 4.0;

/// Compute the behavioral sub-score (0-100).
pub fn score_behavioral(observation: &Observation) -> FactorScore {
    let signals = match observation.raw_signals.as_ref() {
        Some(signals) => signals,
        None => return FactorScore::neutral(),
    };

    let mut score = 50.0;
    let mut present = 0u32;

    if let Some(adjust) = typing_adjustment(signals) {
        score += adjust;
        present += 1;
    }
    if let Some(adjust) = mouse_adjustment(signals) {
        score += adjust;
        present += 1;
    }
    if let Some(scroll) = signals.scroll {
        score += match scroll {
            ScrollPattern::Reading => 8.0,
            ScrollPattern::Scanning => 2.0,
            ScrollPattern::Skimming => -3.0,
            ScrollPattern::Jittery => -8.0,
        };
        present += 1;
    }
    if let Some(fc) = signals.focus_consistency {
        // Centered on 0.5: steady focus up to +10, scattered down to -10.
        score += (fc.clamp(0.0, 1.0) - 0.5) * 20.0;
        present += 1;
    }

    if present == 0 {
        return FactorScore::neutral();
    }

    FactorScore {
        score: score.clamp(0.0, 100.0),
        confidence: (0.2 + 0.7 * present as f64 / SIGNAL_GROUPS).min(0.9),
    }
}

fn typing_adjustment(signals: &RawSignals) -> Option<f64> {
    let typing = signals.typing.as_ref()?;
    let mut adjust = 0.0;
    let mut any = false;

    if let Some(rate) = typing.rate_cpm {
        any = true;
        if rate >= 150.0 {
            adjust += 10.0;
        } else if rate > 0.0 && rate < 60.0 {
            adjust -= 5.0;
        }
    }
    if let Some(consistency) = typing.consistency {
        any = true;
        if consistency > 0.7 {
            adjust += 5.0;
        } else if consistency < 0.3 {
            adjust -= 5.0;
        }
    }
    if let Some(burstiness) = typing.burstiness {
        any = true;
        if burstiness > 0.7 {
            adjust -= 5.0;
        }
    }

    any.then_some(adjust)
}

fn mouse_adjustment(signals: &RawSignals) -> Option<f64> {
    let mouse = signals.mouse.as_ref()?;
    let mut adjust = 0.0;
    let mut any = false;

    if let Some(rate) = mouse.click_rate {
        any = true;
        if (5.0..=40.0).contains(&rate) {
            adjust += 5.0;
        } else if rate > 80.0 {
            adjust -= 5.0;
        }
    }
    if let Some(movement) = mouse.movement {
        any = true;
        adjust += match movement {
            MovementPattern::Purposeful => 8.0,
            MovementPattern::Searching => -2.0,
            MovementPattern::Erratic => -8.0,
            MovementPattern::Idle => -5.0,
        };
    }

    any.then_some(adjust)
}
