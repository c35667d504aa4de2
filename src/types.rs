//! Core types for the Tempolens analytics pipeline
//!
//! This module defines the data structures that flow through the engine:
//! raw observations, behavioral telemetry, scored observations, and the
//! shared outcome wrapper for analyses that may lack sufficient data.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Coarse classification of what the user was doing in a snapshot.
///
/// Usually supplied by an external classification provider; the engine
/// treats it as optional enrichment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivityType {
    Coding,
    Writing,
    Research,
    Communication,
    Design,
    Meeting,
    Entertainment,
    Browsing,
    Idle,
    Unknown,
}

impl ActivityType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ActivityType::Coding => "coding",
            ActivityType::Writing => "writing",
            ActivityType::Research => "research",
            ActivityType::Communication => "communication",
            ActivityType::Design => "design",
            ActivityType::Meeting => "meeting",
            ActivityType::Entertainment => "entertainment",
            ActivityType::Browsing => "browsing",
            ActivityType::Idle => "idle",
            ActivityType::Unknown => "unknown",
        }
    }
}

/// Focus quality tag attached to an observation after analysis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FocusQuality {
    Deep,
    Moderate,
    Distracted,
}

/// Mouse movement pattern classification supplied by a capture provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MovementPattern {
    Purposeful,
    Searching,
    Erratic,
    Idle,
}

/// Scroll behavior classification supplied by a capture provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScrollPattern {
    Reading,
    Scanning,
    Skimming,
    Jittery,
}

/// Kind of media detected in the captured content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MediaKind {
    Video,
    Image,
    Audio,
}

/// Typing telemetry for one observation window.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TypingSignals {
    /// Typing rate in characters per minute
    pub rate_cpm: Option<f64>,
    /// Rhythmic consistency (0-1, higher = steadier cadence)
    pub consistency: Option<f64>,
    /// Dispersion of inter-keystroke intervals (0-1, higher = burstier)
    pub burstiness: Option<f64>,
}

/// Mouse telemetry for one observation window.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MouseSignals {
    /// Clicks per minute
    pub click_rate: Option<f64>,
    /// Movement pattern classification
    pub movement: Option<MovementPattern>,
}

/// Content hints extracted from the captured frame.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ContentHints {
    /// Fraction of the frame occupied by text (0-1)
    pub text_density: Option<f64>,
    /// Source code structure detected
    #[serde(default)]
    pub code_detected: bool,
    /// Media content detected, with its kind
    pub media: Option<MediaKind>,
    /// Error dialog or stack trace visible
    #[serde(default)]
    pub error_state: bool,
    /// Page or document still loading
    #[serde(default)]
    pub loading_state: bool,
    /// Application running full screen
    #[serde(default)]
    pub full_screen: bool,
}

/// Project context supplied by a preferences/host provider.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProjectContext {
    /// Project complexity (0-10)
    pub complexity: Option<f64>,
    /// Project priority (0-10)
    pub priority: Option<f64>,
    /// Deadline urgency (0-10, higher = more urgent)
    pub deadline_urgency: Option<f64>,
}

/// Optional behavioral telemetry attached to an observation.
///
/// Every field is optional. Absent fields must never fail scoring; they only
/// reduce the confidence of the affected sub-scores.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawSignals {
    /// Typing telemetry
    pub typing: Option<TypingSignals>,
    /// Mouse telemetry
    pub mouse: Option<MouseSignals>,
    /// Scroll behavior classification
    pub scroll: Option<ScrollPattern>,
    /// Focus consistency over the window (0-1)
    pub focus_consistency: Option<f64>,
    /// Content hints from the captured frame
    pub content: Option<ContentHints>,
    /// Minutes of continuous work in the current sitting
    pub session_duration_min: Option<f64>,
    /// Minutes since the last break
    pub minutes_since_break: Option<f64>,
    /// Hours worked so far today
    pub fatigue_hours: Option<f64>,
    /// Notifications received during the window
    pub notification_count: Option<u32>,
    /// Activity category stated by the user or a provider
    pub stated_activity: Option<ActivityType>,
    /// A meeting is currently active
    #[serde(default)]
    pub meeting_active: bool,
    /// Active project context
    pub project: Option<ProjectContext>,
    /// Favorable environment flags (e.g. "quiet", "do_not_disturb")
    #[serde(default)]
    pub environment_flags: Vec<String>,
    /// Self-reported or sensor-estimated energy level (0-10)
    pub energy_level: Option<f64>,
    /// Stress indicator present
    #[serde(default)]
    pub stress_indicator: bool,
    /// Application switches in the recent window, if the caller tracks them
    pub recent_switch_count: Option<u32>,
}

/// One snapshot of user activity context, immutable once created.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Observation {
    /// Caller-supplied capture instant; monotonically non-decreasing
    /// within a stream
    pub timestamp: DateTime<Utc>,
    /// Primary application or category identifier ("unknown" if unresolved)
    pub primary_application: String,
    /// Applications visible concurrently, in z-order
    #[serde(default)]
    pub secondary_applications: Vec<String>,
    /// Free-text window descriptor used for heuristic reclassification
    pub window_label: Option<String>,
    /// Optional behavioral telemetry
    pub raw_signals: Option<RawSignals>,
    /// Activity classification from an external provider
    pub activity_type: Option<ActivityType>,
    /// Focus quality tag attached after analysis
    pub focus_quality: Option<FocusQuality>,
    /// Free-text tags from providers or the host
    #[serde(default)]
    pub tags: Vec<String>,
    /// Provider-estimated productivity score, already normalized to 0-100
    pub provider_score: Option<f64>,
}

impl Observation {
    /// Minimal observation with only the required fields.
    pub fn new(timestamp: DateTime<Utc>, primary_application: impl Into<String>) -> Self {
        Self {
            timestamp,
            primary_application: primary_application.into(),
            secondary_applications: Vec::new(),
            window_label: None,
            raw_signals: None,
            activity_type: None,
            focus_quality: None,
            tags: Vec::new(),
            provider_score: None,
        }
    }

    /// Activity classification, falling back to the category the user or a
    /// provider stated in the raw signals.
    pub fn effective_activity(&self) -> Option<ActivityType> {
        self.activity_type
            .or_else(|| self.raw_signals.as_ref().and_then(|s| s.stated_activity))
    }
}

/// Contribution of a single scoring factor.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FactorScore {
    /// Sub-score (0-100)
    pub score: f64,
    /// Confidence based on how many of the factor's inputs were present (0-1)
    pub confidence: f64,
}

impl FactorScore {
    /// Neutral contribution for a factor with no usable inputs.
    pub fn neutral() -> Self {
        Self {
            score: 50.0,
            confidence: 0.3,
        }
    }
}

/// Per-factor breakdown of a productivity score.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoreBreakdown {
    pub application: FactorScore,
    pub content: FactorScore,
    pub temporal: FactorScore,
    pub behavioral: FactorScore,
    pub contextual: FactorScore,
    /// Combined multiplier from fatigue, stress, and energy (applied last)
    pub global_modifier: f64,
}

/// An observation with its computed productivity score attached.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredObservation {
    pub observation: Observation,
    /// Productivity score (0-100)
    pub score: u8,
    /// Per-factor contributions
    pub breakdown: ScoreBreakdown,
    /// Confidence in the score (0-1)
    pub confidence: f64,
}

impl ScoredObservation {
    pub fn timestamp(&self) -> DateTime<Utc> {
        self.observation.timestamp
    }

    pub fn application(&self) -> &str {
        &self.observation.primary_application
    }
}

/// Result of an analysis that needs a minimum number of inputs.
///
/// Insufficient data is a valid, displayable state, not an error. Callers
/// must treat `InsufficientData` as "keep collecting" rather than a failure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", content = "data", rename_all = "snake_case")]
pub enum AnalysisOutcome<T> {
    Ready(T),
    InsufficientData { required: usize, actual: usize },
}

impl<T> AnalysisOutcome<T> {
    /// Wrap `value` when `actual >= required`, otherwise report the shortfall.
    pub fn require(required: usize, actual: usize, value: impl FnOnce() -> T) -> Self {
        if actual >= required {
            AnalysisOutcome::Ready(value())
        } else {
            AnalysisOutcome::InsufficientData { required, actual }
        }
    }

    pub fn is_ready(&self) -> bool {
        matches!(self, AnalysisOutcome::Ready(_))
    }

    pub fn ready(&self) -> Option<&T> {
        match self {
            AnalysisOutcome::Ready(value) => Some(value),
            AnalysisOutcome::InsufficientData { .. } => None,
        }
    }

    pub fn into_ready(self) -> Option<T> {
        match self {
            AnalysisOutcome::Ready(value) => Some(value),
            AnalysisOutcome::InsufficientData { .. } => None,
        }
    }
}

/// Importance of an insight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Importance {
    Low,
    Medium,
    High,
}

/// Expected impact of acting on a recommendation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Impact {
    Low,
    Medium,
    High,
}

/// Effort required to act on a recommendation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Effort {
    Low,
    Medium,
    High,
}

/// Time horizon of a recommendation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Horizon {
    Immediate,
    ShortTerm,
    LongTerm,
}

/// A synthesized, displayable finding about the analyzed window.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Insight {
    /// Grouping key (e.g. "productivity", "focus", "rhythm")
    pub category: String,
    pub title: String,
    pub summary: String,
    pub importance: Importance,
    /// Numeric support for the finding, when one exists
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<f64>,
}

/// A prioritizable suggested action.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    pub action: String,
    pub reason: String,
    pub impact: Impact,
    pub effort: Effort,
    pub horizon: Horizon,
}
