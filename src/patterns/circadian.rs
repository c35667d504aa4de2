//! Circadian preference detection
//!
//! Splits the day into morning, afternoon, and evening bands and compares
//! average scores across them to estimate when the user does their best work.

use chrono::Timelike;
use serde::{Deserialize, Serialize};

use crate::trend;
use crate::types::ScoredObservation;

/// Minimum spread between the best and worst band before a preference is
/// declared.
const PREFERENCE_MARGIN: f64 = 5.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Chronotype {
    MorningPerson,
    AfternoonPeak,
    EveningPerson,
    /// No band clearly dominates, or too few bands have data
    Consistent,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CircadianAnalysis {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub morning_average: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub afternoon_average: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub evening_average: Option<f64>,
    pub chronotype: Chronotype,
}

/// Morning is 05:00-11:59, afternoon 12:00-16:59, everything else evening
/// (late-night work reads as evening preference).
fn band_index(hour: u32) -> usize {
    match hour {
        5..=11 => 0,
        12..=16 => 1,
        _ => 2,
    }
}

pub fn analyze_circadian(observations: &[ScoredObservation]) -> CircadianAnalysis {
    let mut bands: [Vec<f64>; 3] = [Vec::new(), Vec::new(), Vec::new()];
    for scored in observations {
        bands[band_index(scored.timestamp().hour())].push(scored.score as f64);
    }

    let averages: Vec<Option<f64>> = bands
        .iter()
        .map(|scores| (!scores.is_empty()).then(|| trend::mean(scores)))
        .collect();

    let present: Vec<(usize, f64)> = averages
        .iter()
        .enumerate()
        .filter_map(|(band, avg)| avg.map(|a| (band, a)))
        .collect();

    let chronotype = if present.len() < 2 {
        Chronotype::Consistent
    } else {
        let best = present
            .iter()
            .cloned()
            .fold((0usize, f64::MIN), |acc, x| if x.1 > acc.1 { x } else { acc });
        let worst = present
            .iter()
            .map(|&(_, avg)| avg)
            .fold(f64::MAX, f64::min);
        if best.1 - worst < PREFERENCE_MARGIN {
            Chronotype::Consistent
        } else {
            match best.0 {
                0 => Chronotype::MorningPerson,
                1 => Chronotype::AfternoonPeak,
                _ => Chronotype::EveningPerson,
            }
        }
    };

    CircadianAnalysis {
        morning_average: averages[0],
        afternoon_average: averages[1],
        evening_average: averages[2],
        chronotype,
    }
}
