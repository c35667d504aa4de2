//! Shared statistics and trend classification
//!
//! Trend direction is derived by comparing the mean score of the first half
//! of a window to the mean of the second half. Both the rhythm analysis and
//! the insight generator use the same thresholds.

use serde::{Deserialize, Serialize};

use crate::types::AnalysisOutcome;

/// Direction of a productivity trend over an analyzed window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrendDirection {
    StronglyImproving,
    Improving,
    Stable,
    Declining,
    StronglyDeclining,
}

/// Arithmetic mean; 0.0 for an empty slice.
pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Population standard deviation; 0.0 for slices shorter than 2.
pub fn std_dev(values: &[f64]) -> f64 {
    if values.len() < 2 {
        return 0.0;
    }
    let m = mean(values);
    let variance = values.iter().map(|v| (v - m).powi(2)).sum::<f64>() / values.len() as f64;
    variance.sqrt()
}

/// Classify the trend of a chronological score series.
///
/// Percentage change of the second half's mean over the first half's:
/// > +10% strongly improving, > +5% improving, within +/-5% stable,
/// < -10% strongly declining, otherwise declining. Requires
/// `min_observations` points.
pub fn classify_trend(
    scores: &[f64],
    min_observations: usize,
) -> AnalysisOutcome<TrendDirection> {
    AnalysisOutcome::require(min_observations, scores.len(), || {
        let mid = scores.len() / 2;
        let first = mean(&scores[..mid]);
        let second = mean(&scores[mid..]);

        if first <= 0.0 {
            // A flat-zero first half cannot express a percentage change.
            return if second > 0.0 {
                TrendDirection::StronglyImproving
            } else {
                TrendDirection::Stable
            };
        }

        let change_pct = (second - first) / first * 100.0;
        if change_pct > 10.0 {
            TrendDirection::StronglyImproving
        } else if change_pct > 5.0 {
            TrendDirection::Improving
        } else if change_pct >= -5.0 {
            TrendDirection::Stable
        } else if change_pct >= -10.0 {
            TrendDirection::Declining
        } else {
            TrendDirection::StronglyDeclining
        }
    })
}
