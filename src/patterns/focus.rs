//! Focus-session segmentation
//!
//! A stateful single pass over time-ordered scored observations. High-scoring
//! observations open or extend a session; a gap above the configured maximum
//! splits it; low-scoring observations inside an established session count as
//! interruptions.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::config::EngineConfig;
use crate::types::{FocusQuality, Observation, ScoredObservation};

/// Session average above which an uninterrupted session is tagged deep work.
const DEEP_SESSION_SCORE: f64 = 80.0;

/// A contiguous span of high-scoring observations tolerating bounded gaps.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FocusSession {
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub peak_score: u8,
    pub average_score: f64,
    pub interruption_count: u32,
    /// Session quality (0-100): duration + average score - interruptions
    pub quality_score: f64,
    /// Derived focus tag: deep for an uninterrupted run above
    /// [`DEEP_SESSION_SCORE`], moderate otherwise; provider tags on member
    /// observations can demote but never promote
    pub focus_quality: FocusQuality,
    /// Indices into the analyzed slice of the observations forming the
    /// session, in order
    pub source_indices: Vec<usize>,
}

impl FocusSession {
    pub fn duration_min(&self) -> f64 {
        (self.end_time - self.start_time).num_seconds() as f64 / 60.0
    }
}

/// Aggregate view over all focus sessions in the window.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FocusAnalysis {
    pub sessions: Vec<FocusSession>,
    pub total_focus_min: f64,
    pub average_session_min: f64,
    pub longest_session_min: f64,
    pub total_interruptions: u32,
}

struct OpenSession {
    start_time: DateTime<Utc>,
    last_high: DateTime<Utc>,
    scores: Vec<f64>,
    interruptions: u32,
    /// Dips seen since the last high-scoring observation. They only become
    /// interruptions if the session resumes; a dip that ends the session is
    /// the end, not an interruption.
    pending_dips: u32,
    /// Provider-supplied focus tags on member observations
    tag_votes: Vec<FocusQuality>,
    indices: Vec<usize>,
}

impl OpenSession {
    fn open(scored: &ScoredObservation, index: usize) -> Self {
        let mut session = Self {
            start_time: scored.timestamp(),
            last_high: scored.timestamp(),
            scores: vec![scored.score as f64],
            interruptions: 0,
            pending_dips: 0,
            tag_votes: Vec::new(),
            indices: vec![index],
        };
        if let Some(vote) = tagged_quality(&scored.observation) {
            session.tag_votes.push(vote);
        }
        session
    }

    fn extend(&mut self, scored: &ScoredObservation, index: usize) {
        self.last_high = scored.timestamp();
        self.scores.push(scored.score as f64);
        self.interruptions += self.pending_dips;
        self.pending_dips = 0;
        if let Some(vote) = tagged_quality(&scored.observation) {
            self.tag_votes.push(vote);
        }
        self.indices.push(index);
    }

    fn age_min(&self) -> f64 {
        (self.last_high - self.start_time).num_seconds() as f64 / 60.0
    }

    fn finalize(self) -> FocusSession {
        let average = self.scores.iter().sum::<f64>() / self.scores.len() as f64;
        let peak = self.scores.iter().cloned().fold(0.0_f64, f64::max);
        let duration_min = (self.last_high - self.start_time).num_seconds() as f64 / 60.0;
        let quality = session_quality(duration_min, average, self.interruptions);
        let focus_quality = derive_focus_quality(average, self.interruptions, &self.tag_votes);

        FocusSession {
            start_time: self.start_time,
            end_time: self.last_high,
            peak_score: peak.round() as u8,
            average_score: average,
            interruption_count: self.interruptions,
            quality_score: quality,
            focus_quality,
            source_indices: self.indices,
        }
    }
}

/// Focus tag an observation carries, either from the explicit field or from
/// free-text tags a provider attached.
fn tagged_quality(observation: &Observation) -> Option<FocusQuality> {
    if let Some(quality) = observation.focus_quality {
        return Some(quality);
    }
    if observation.tags.iter().any(|t| t == "deep_work" || t == "flow") {
        return Some(FocusQuality::Deep);
    }
    if observation.tags.iter().any(|t| t == "distracted") {
        return Some(FocusQuality::Distracted);
    }
    None
}

/// Deep requires an uninterrupted run above [`DEEP_SESSION_SCORE`] with no
/// member tagged below deep; any distracted member demotes the whole session.
fn derive_focus_quality(
    average: f64,
    interruptions: u32,
    tag_votes: &[FocusQuality],
) -> FocusQuality {
    if tag_votes.iter().any(|v| *v == FocusQuality::Distracted) {
        return FocusQuality::Distracted;
    }
    let demoted = tag_votes.iter().any(|v| *v == FocusQuality::Moderate);
    if average > DEEP_SESSION_SCORE && interruptions == 0 && !demoted {
        FocusQuality::Deep
    } else {
        FocusQuality::Moderate
    }
}

/// Quality score: up to 40 pts for duration (full at 30 min), up to 40 pts
/// linear in the average score, minus 5 per interruption; clamped to 0-100.
fn session_quality(duration_min: f64, average_score: f64, interruptions: u32) -> f64 {
    let duration_pts = (duration_min / 30.0 * 40.0).min(40.0);
    let average_pts = (average_score * 0.4).min(40.0);
    (duration_pts + average_pts - 5.0 * interruptions as f64).clamp(0.0, 100.0)
}

/// Segment time-ordered observations into focus sessions.
pub fn segment_sessions(
    observations: &[ScoredObservation],
    config: &EngineConfig,
) -> FocusAnalysis {
    let mut sessions: Vec<FocusSession> = Vec::new();
    let mut current: Option<OpenSession> = None;

    for (index, scored) in observations.iter().enumerate() {
        let ts = scored.timestamp();
        let score = scored.score as f64;

        if score >= config.focus_threshold {
            match current.as_mut() {
                None => current = Some(OpenSession::open(scored, index)),
                Some(open) => {
                    let gap_min = (ts - open.last_high).num_seconds() as f64 / 60.0;
                    if gap_min <= config.max_session_gap_min {
                        open.extend(scored, index);
                    } else {
                        // Gap too large: close the session and start fresh.
                        let next = OpenSession::open(scored, index);
                        sessions.push(std::mem::replace(open, next).finalize());
                    }
                }
            }
        } else if let Some(open) = current.as_mut() {
            // Brief dips right after session start are not interruptions.
            if open.age_min() >= config.min_session_duration_min {
                open.pending_dips += 1;
            }
        }
    }

    if let Some(open) = current.take() {
        sessions.push(open.finalize());
    }

    let total_focus_min: f64 = sessions.iter().map(|s| s.duration_min()).sum();
    let longest = sessions
        .iter()
        .map(|s| s.duration_min())
        .fold(0.0_f64, f64::max);
    let average = if sessions.is_empty() {
        0.0
    } else {
        total_focus_min / sessions.len() as f64
    };
    let total_interruptions = sessions.iter().map(|s| s.interruption_count).sum();

    FocusAnalysis {
        sessions,
        total_focus_min,
        average_session_min: average,
        longest_session_min: longest,
        total_interruptions,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::scored_at;
    use chrono::{TimeZone, Utc};

    fn config() -> EngineConfig {
        EngineConfig::default()
    }

    fn series(scores: &[(i64, u8)]) -> Vec<ScoredObservation> {
        let base = Utc.with_ymd_and_hms(2026, 3, 4, 9, 0, 0).unwrap();
        scores
            .iter()
            .map(|(min, score)| scored_at(base + chrono::Duration::minutes(*min), "vscode", *score))
            .collect()
    }

    #[test]
    fn test_contiguous_high_run_is_one_session() {
        let obs = series(&[(0, 80), (3, 85), (6, 82), (9, 88), (12, 90)]);
        let analysis = segment_sessions(&obs, &config());
        assert_eq!(analysis.sessions.len(), 1);
        let session = &analysis.sessions[0];
        assert_eq!(session.peak_score, 90);
        assert_eq!(session.interruption_count, 0);
        assert_eq!(session.source_indices, vec![0, 1, 2, 3, 4]);
        assert!((session.duration_min() - 12.0).abs() < 1e-9);
    }

    #[test]
    fn test_gap_above_maximum_splits_session() {
        // 6-minute gap between the third and fourth points
        let obs = series(&[(0, 80), (3, 85), (6, 82), (12, 88), (15, 90)]);
        let analysis = segment_sessions(&obs, &config());
        assert_eq!(analysis.sessions.len(), 2);
        assert_eq!(analysis.sessions[0].source_indices, vec![0, 1, 2]);
        assert_eq!(analysis.sessions[1].source_indices, vec![3, 4]);
    }

    #[test]
    fn test_gap_at_maximum_extends_session() {
        let obs = series(&[(0, 80), (5, 85)]);
        let analysis = segment_sessions(&obs, &config());
        assert_eq!(analysis.sessions.len(), 1);
    }

    #[test]
    fn test_early_dip_is_not_an_interruption() {
        // Low score 1 minute in: session is younger than the 2-minute minimum
        let obs = series(&[(0, 80), (1, 30), (3, 85), (6, 82)]);
        let analysis = segment_sessions(&obs, &config());
        assert_eq!(analysis.sessions.len(), 1);
        assert_eq!(analysis.sessions[0].interruption_count, 0);
    }

    #[test]
    fn test_late_dip_counts_as_interruption() {
        let obs = series(&[(0, 80), (3, 85), (4, 30), (6, 82)]);
        let analysis = segment_sessions(&obs, &config());
        assert_eq!(analysis.sessions.len(), 1);
        assert_eq!(analysis.sessions[0].interruption_count, 1);
        assert_eq!(analysis.total_interruptions, 1);
    }

    #[test]
    fn test_open_session_finalized_at_stream_end() {
        let obs = series(&[(0, 80)]);
        let analysis = segment_sessions(&obs, &config());
        assert_eq!(analysis.sessions.len(), 1);
        assert_eq!(analysis.sessions[0].duration_min(), 0.0);
    }

    #[test]
    fn test_segmentation_is_idempotent() {
        let obs = series(&[(0, 80), (3, 85), (4, 30), (9, 70), (16, 88), (19, 91)]);
        let first = segment_sessions(&obs, &config());
        let second = segment_sessions(&obs, &config());
        assert_eq!(first, second);
    }

    #[test]
    fn test_quality_score_components() {
        // 30 min at average 80, no interruptions: 40 + 32 = 72
        assert!((session_quality(30.0, 80.0, 0) - 72.0).abs() < 1e-9);
        // Interruptions subtract 5 each
        assert!((session_quality(30.0, 80.0, 2) - 62.0).abs() < 1e-9);
        // Quality never goes negative
        assert_eq!(session_quality(0.0, 0.0, 10), 0.0);
    }

    #[test]
    fn test_no_high_scores_no_sessions() {
        let obs = series(&[(0, 20), (5, 30), (10, 25)]);
        let analysis = segment_sessions(&obs, &config());
        assert!(analysis.sessions.is_empty());
        assert_eq!(analysis.total_focus_min, 0.0);
    }

    #[test]
    fn test_uninterrupted_high_session_tagged_deep() {
        let obs = series(&[(0, 85), (3, 90), (6, 88)]);
        let analysis = segment_sessions(&obs, &config());
        assert_eq!(analysis.sessions[0].focus_quality, FocusQuality::Deep);
    }

    #[test]
    fn test_interrupted_session_not_deep() {
        // High averages alone are not enough once the run was broken
        let obs = series(&[(0, 85), (3, 90), (4, 30), (6, 88)]);
        let analysis = segment_sessions(&obs, &config());
        let session = &analysis.sessions[0];
        assert!(session.average_score > 80.0);
        assert_eq!(session.interruption_count, 1);
        assert_eq!(session.focus_quality, FocusQuality::Moderate);
    }

    #[test]
    fn test_moderate_session_not_deep() {
        let obs = series(&[(0, 65), (3, 70), (6, 68)]);
        let analysis = segment_sessions(&obs, &config());
        assert_eq!(analysis.sessions[0].focus_quality, FocusQuality::Moderate);
    }

    #[test]
    fn test_provider_tag_demotes_session() {
        let mut obs = series(&[(0, 85), (3, 90), (6, 88)]);
        obs[1].observation.focus_quality = Some(FocusQuality::Moderate);
        let analysis = segment_sessions(&obs, &config());
        assert_eq!(analysis.sessions[0].focus_quality, FocusQuality::Moderate);
    }

    #[test]
    fn test_free_text_distracted_tag_demotes_session() {
        let mut obs = series(&[(0, 85), (3, 90), (6, 88)]);
        obs[2].observation.tags = vec!["distracted".to_string()];
        let analysis = segment_sessions(&obs, &config());
        assert_eq!(analysis.sessions[0].focus_quality, FocusQuality::Distracted);
    }
}
