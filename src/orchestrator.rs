//! Analysis orchestration
//!
//! The orchestrator owns the observation history behind a mutex, scores
//! observations as they arrive, and serves pattern and insight reports from
//! a versioned TTL cache. Recording an observation bumps the history version,
//! which invalidates every cached report.

use std::collections::hash_map::DefaultHasher;
use std::collections::HashMap;
use std::hash::{Hash, Hasher};
use std::sync::Mutex;

use chrono::{DateTime, Duration, Utc};

use crate::catalog::ActivityCatalog;
use crate::config::EngineConfig;
use crate::error::AnalyticsError;
use crate::insights::{InsightGenerator, InsightReport, UserPreferences};
use crate::patterns::{PatternRecognizer, PatternReport};
use crate::scoring::ScoringEngine;
use crate::types::{AnalysisOutcome, Observation, ScoredObservation};

/// Which slice of the recorded history an analysis runs over.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WindowSelector {
    All,
    /// The most recent `n` observations
    LastN(usize),
    /// Observations at or after the instant
    Since(DateTime<Utc>),
}

impl WindowSelector {
    fn cache_key(&self) -> String {
        match self {
            WindowSelector::All => "all".to_string(),
            WindowSelector::LastN(n) => format!("last:{}", n),
            WindowSelector::Since(ts) => format!("since:{}", ts.timestamp_millis()),
        }
    }
}

struct HistoryState {
    observations: Vec<ScoredObservation>,
    version: u64,
}

struct CacheEntry<T> {
    value: T,
    version: u64,
    computed_at: DateTime<Utc>,
}

struct ScoreEntry {
    value: ScoredObservation,
    computed_at: DateTime<Utc>,
}

#[derive(Default)]
struct ReportCache {
    patterns: HashMap<String, CacheEntry<AnalysisOutcome<PatternReport>>>,
    insights: HashMap<String, CacheEntry<InsightReport>>,
    /// Observation fingerprint -> scored result, so replayed identical
    /// observations skip rescoring. Entries share the report TTL and
    /// expired ones are pruned on insert, keeping the map bounded.
    scores: HashMap<u64, ScoreEntry>,
}

/// Thread-safe entry point tying scoring, pattern recognition, and insight
/// generation to a single recorded history.
pub struct AnalysisOrchestrator {
    config: EngineConfig,
    engine: ScoringEngine,
    recognizer: PatternRecognizer,
    generator: InsightGenerator,
    history: Mutex<HistoryState>,
    cache: Mutex<ReportCache>,
}

impl AnalysisOrchestrator {
    /// Build an orchestrator after validating the configuration.
    pub fn new(config: EngineConfig, catalog: ActivityCatalog) -> Result<Self, AnalyticsError> {
        config.validate()?;
        Ok(Self {
            engine: ScoringEngine::new(config.clone(), catalog.clone()),
            recognizer: PatternRecognizer::new(config.clone(), catalog.clone()),
            generator: InsightGenerator::new(config.clone(), catalog),
            config,
            history: Mutex::new(HistoryState {
                observations: Vec::new(),
                version: 0,
            }),
            cache: Mutex::new(ReportCache::default()),
        })
    }

    pub fn with_defaults() -> Result<Self, AnalyticsError> {
        Self::new(EngineConfig::default(), ActivityCatalog::default())
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Score an observation and append it to the history.
    ///
    /// Timestamps must be non-decreasing; a regression is rejected without
    /// modifying the history. Recording invalidates cached reports.
    pub fn record_observation(
        &self,
        observation: Observation,
    ) -> Result<ScoredObservation, AnalyticsError> {
        let mut history = lock(&self.history);

        if let Some(last) = history.observations.last() {
            if observation.timestamp < last.timestamp() {
                return Err(AnalyticsError::OutOfOrderObservation {
                    last: last.timestamp().to_rfc3339(),
                    current: observation.timestamp.to_rfc3339(),
                });
            }
        }

        let scored = self.score_cached(&observation)?;
        history.observations.push(scored.clone());
        history.version += 1;
        Ok(scored)
    }

    /// Number of observations recorded so far.
    pub fn history_len(&self) -> usize {
        lock(&self.history).observations.len()
    }

    /// Drop all recorded observations and cached reports.
    pub fn clear(&self) {
        let mut history = lock(&self.history);
        history.observations.clear();
        history.version += 1;
        let mut cache = lock(&self.cache);
        cache.patterns.clear();
        cache.insights.clear();
        cache.scores.clear();
    }

    /// Run pattern recognition over the selected window, reusing a cached
    /// report when the history has not changed and the TTL has not expired.
    pub fn analyze_patterns(
        &self,
        selector: WindowSelector,
    ) -> Result<AnalysisOutcome<PatternReport>, AnalyticsError> {
        let key = selector.cache_key();
        let (window, version) = self.select_window(selector);

        if let Some(entry) = self.cached_patterns(&key, version) {
            return Ok(entry);
        }

        let outcome = self.recognizer.analyze(&window)?;
        let mut cache = lock(&self.cache);
        cache.patterns.insert(
            key,
            CacheEntry {
                value: outcome.clone(),
                version,
                computed_at: Utc::now(),
            },
        );
        Ok(outcome)
    }

    /// Generate an insight report over the selected window, cached like
    /// [`Self::analyze_patterns`]. Preference changes miss the cache.
    pub fn generate_insights(
        &self,
        selector: WindowSelector,
        preferences: &UserPreferences,
    ) -> Result<InsightReport, AnalyticsError> {
        let key = format!(
            "{}:{}",
            selector.cache_key(),
            preferences_fingerprint(preferences)?
        );
        let (window, version) = self.select_window(selector);

        if let Some(report) = self.cached_insights(&key, version) {
            return Ok(report);
        }

        let report = self.generator.generate(&window, preferences)?;
        let mut cache = lock(&self.cache);
        cache.insights.insert(
            key,
            CacheEntry {
                value: report.clone(),
                version,
                computed_at: Utc::now(),
            },
        );
        Ok(report)
    }

    fn select_window(&self, selector: WindowSelector) -> (Vec<ScoredObservation>, u64) {
        let history = lock(&self.history);
        let observations = &history.observations;
        let window = match selector {
            WindowSelector::All => observations.clone(),
            WindowSelector::LastN(n) => {
                observations[observations.len().saturating_sub(n)..].to_vec()
            }
            WindowSelector::Since(ts) => observations
                .iter()
                .filter(|o| o.timestamp() >= ts)
                .cloned()
                .collect(),
        };
        (window, history.version)
    }

    fn cached_patterns(
        &self,
        key: &str,
        version: u64,
    ) -> Option<AnalysisOutcome<PatternReport>> {
        let cache = lock(&self.cache);
        cache
            .patterns
            .get(key)
            .filter(|entry| self.entry_valid(entry, version))
            .map(|entry| entry.value.clone())
    }

    fn cached_insights(&self, key: &str, version: u64) -> Option<InsightReport> {
        let cache = lock(&self.cache);
        cache
            .insights
            .get(key)
            .filter(|entry| self.entry_valid(entry, version))
            .map(|entry| entry.value.clone())
    }

    fn entry_valid<T>(&self, entry: &CacheEntry<T>, version: u64) -> bool {
        entry.version == version
            && Utc::now() - entry.computed_at < Duration::seconds(self.config.cache_ttl_sec)
    }

    /// Score with a fingerprint cache; identical observation payloads reuse
    /// the previous result while its entry is within the TTL.
    fn score_cached(&self, observation: &Observation) -> Result<ScoredObservation, AnalyticsError> {
        let fingerprint = observation_fingerprint(observation)?;
        let ttl = Duration::seconds(self.config.cache_ttl_sec);
        {
            let cache = lock(&self.cache);
            if let Some(entry) = cache.scores.get(&fingerprint) {
                if Utc::now() - entry.computed_at < ttl {
                    return Ok(entry.value.clone());
                }
            }
        }

        let mut scored = self.engine.score(observation);
        if let Some(provider) = observation.provider_score {
            let blended = self
                .engine
                .blend_with_provider(scored.score as f64, provider);
            scored.score = blended.round() as u8;
        }

        let mut cache = lock(&self.cache);
        let now = Utc::now();
        cache.scores.retain(|_, entry| now - entry.computed_at < ttl);
        cache.scores.insert(
            fingerprint,
            ScoreEntry {
                value: scored.clone(),
                computed_at: now,
            },
        );
        Ok(scored)
    }
}

/// Recover the guarded value even if another thread panicked mid-update;
/// all guarded state stays internally consistent under that recovery.
fn lock<T>(mutex: &Mutex<T>) -> std::sync::MutexGuard<'_, T> {
    match mutex.lock() {
        Ok(guard) => guard,
        Err(poisoned) => poisoned.into_inner(),
    }
}

fn observation_fingerprint(observation: &Observation) -> Result<u64, AnalyticsError> {
    let encoded = serde_json::to_string(observation)?;
    let mut hasher = DefaultHasher::new();
    encoded.hash(&mut hasher);
    Ok(hasher.finish())
}

fn preferences_fingerprint(preferences: &UserPreferences) -> Result<u64, AnalyticsError> {
    let encoded = serde_json::to_string(preferences)?;
    let mut hasher = DefaultHasher::new();
    encoded.hash(&mut hasher);
    Ok(hasher.finish())
}
