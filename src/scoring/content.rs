//! Visual/content factor scoring
//!
//! Heuristic adjustments from content hints extracted out of the captured
//! frame: text density and code patterns raise the score, media and
//! error/loading states lower it.

use crate::types::{ContentHints, FactorScore, MediaKind, Observation};

/// Compute the content sub-score (0-100).
///
/// With no content hints at all the factor contributes a neutral 50 at low
/// confidence.
pub fn score_content(observation: &Observation) -> FactorScore {
    let hints = match observation.raw_signals.as_ref().and_then(|s| s.content.as_ref()) {
        Some(hints) => hints,
        None => return FactorScore::neutral(),
    };

    let mut score = 50.0;
    let mut present = 0u32;

    if let Some(density) = hints.text_density {
        score += density.clamp(0.0, 1.0) * 15.0;
        present += 1;
    }

    if hints.code_detected {
        score += 20.0;
        present += 1;
    }

    if let Some(media) = hints.media {
        score -= match media {
            MediaKind::Video => 20.0,
            MediaKind::Image => 10.0,
            MediaKind::Audio => 8.0,
        };
        present += 1;
    }

    if hints.error_state || hints.loading_state {
        score -= 15.0;
        present += 1;
    }

    if hints.full_screen {
        score += 10.0;
        present += 1;
    }

    let confidence = content_confidence(hints, present);

    FactorScore {
        score: score.clamp(0.0, 100.0),
        confidence,
    }
}

fn content_confidence(hints: &ContentHints, present: u32) -> f64 {
    // Detected code is a strong, unambiguous signal.
    if hints.code_detected {
        return 0.9;
    }
    match present {
        0 => 0.3,
        1 => 0.5,
        2 => 0.65,
        _ => 0.8,
    }
}
