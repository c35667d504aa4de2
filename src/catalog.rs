//! Activity catalog
//!
//! The heuristic lookup tables consumed by scoring and pattern recognition:
//! application productivity ratings, browser window-label keywords, switch
//! classification categories, and distraction sources. They are plain data so
//! a host can load tuned tables instead of the curated defaults.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Category an application belongs to, used to classify task switches
/// and distraction sources.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AppCategory {
    Development,
    Productivity,
    Communication,
    Browser,
    Entertainment,
    SocialMedia,
    News,
    System,
    Unknown,
}

/// One curated application entry.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AppEntry {
    /// Productivity rating on a 1-10 scale
    pub rating: f64,
    pub category: AppCategory,
}

/// Curated lookup tables for application heuristics.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActivityCatalog {
    /// Application identifier -> rating/category (keys lowercase)
    apps: HashMap<String, AppEntry>,
    /// Window-label keywords that mark a browser tab as work (lowercase)
    work_keywords: Vec<String>,
    /// Window-label keywords that mark a browser tab as leisure (lowercase)
    leisure_keywords: Vec<String>,
    /// Rating used for applications not in the table
    neutral_rating: f64,
}

impl Default for ActivityCatalog {
    fn default() -> Self {
        let mut apps = HashMap::new();
        let mut add = |name: &str, rating: f64, category: AppCategory| {
            apps.insert(name.to_string(), AppEntry { rating, category });
        };

        // Development tools
        add("vscode", 9.0, AppCategory::Development);
        add("code", 9.0, AppCategory::Development);
        add("intellij", 9.0, AppCategory::Development);
        add("pycharm", 9.0, AppCategory::Development);
        add("xcode", 9.0, AppCategory::Development);
        add("vim", 9.0, AppCategory::Development);
        add("neovim", 9.0, AppCategory::Development);
        add("terminal", 8.0, AppCategory::Development);
        add("iterm", 8.0, AppCategory::Development);
        add("docker", 7.0, AppCategory::Development);
        add("postman", 7.0, AppCategory::Development);

        // Productivity tools
        add("notion", 8.0, AppCategory::Productivity);
        add("obsidian", 8.0, AppCategory::Productivity);
        add("word", 7.0, AppCategory::Productivity);
        add("excel", 7.0, AppCategory::Productivity);
        add("figma", 8.0, AppCategory::Productivity);
        add("sketch", 8.0, AppCategory::Productivity);
        add("linear", 7.0, AppCategory::Productivity);
        add("jira", 6.0, AppCategory::Productivity);

        // Communication
        add("slack", 6.0, AppCategory::Communication);
        add("teams", 6.0, AppCategory::Communication);
        add("zoom", 6.0, AppCategory::Communication);
        add("mail", 5.0, AppCategory::Communication);
        add("outlook", 5.0, AppCategory::Communication);
        add("discord", 4.0, AppCategory::Communication);

        // Browsers (refined via window label)
        add("chrome", 5.0, AppCategory::Browser);
        add("firefox", 5.0, AppCategory::Browser);
        add("safari", 5.0, AppCategory::Browser);
        add("edge", 5.0, AppCategory::Browser);
        add("arc", 5.0, AppCategory::Browser);

        // Entertainment and social
        add("youtube", 2.0, AppCategory::Entertainment);
        add("netflix", 1.0, AppCategory::Entertainment);
        add("spotify", 4.0, AppCategory::Entertainment);
        add("steam", 1.0, AppCategory::Entertainment);
        add("twitter", 2.0, AppCategory::SocialMedia);
        add("instagram", 2.0, AppCategory::SocialMedia);
        add("tiktok", 1.0, AppCategory::SocialMedia);
        add("reddit", 2.0, AppCategory::SocialMedia);
        add("facebook", 2.0, AppCategory::SocialMedia);

        // System
        add("finder", 4.0, AppCategory::System);
        add("explorer", 4.0, AppCategory::System);
        add("settings", 4.0, AppCategory::System);

        let work_keywords = [
            "github",
            "gitlab",
            "pull request",
            "merge request",
            "stack overflow",
            "stackoverflow",
            "docs",
            "documentation",
            "jira",
            "confluence",
            "localhost",
            "aws",
            "console",
            "api",
            "rfc",
        ]
        .iter()
        .map(|s| s.to_string())
        .collect();

        let leisure_keywords = [
            "youtube",
            "netflix",
            "twitch",
            "reddit",
            "twitter",
            "instagram",
            "facebook",
            "tiktok",
            "9gag",
            "shopping",
            "game",
        ]
        .iter()
        .map(|s| s.to_string())
        .collect();

        Self {
            apps,
            work_keywords,
            leisure_keywords,
            neutral_rating: 5.0,
        }
    }
}

impl ActivityCatalog {
    /// Look up an application's curated rating (1-10). Unknown apps get the
    /// neutral rating.
    pub fn rating(&self, application: &str) -> f64 {
        self.entry(application)
            .map(|e| e.rating)
            .unwrap_or(self.neutral_rating)
    }

    /// Look up an application's category. Unknown apps are `Unknown`.
    pub fn category(&self, application: &str) -> AppCategory {
        self.entry(application)
            .map(|e| e.category)
            .unwrap_or(AppCategory::Unknown)
    }

    pub fn is_browser(&self, application: &str) -> bool {
        self.category(application) == AppCategory::Browser
    }

    /// Classify a browser window label as work (+), leisure (-), or
    /// indeterminate (None).
    pub fn classify_window_label(&self, label: &str) -> Option<bool> {
        let lower = label.to_lowercase();
        if self.work_keywords.iter().any(|k| lower.contains(k)) {
            Some(true)
        } else if self.leisure_keywords.iter().any(|k| lower.contains(k)) {
            Some(false)
        } else {
            None
        }
    }

    /// Register or override an application entry.
    pub fn insert(&mut self, application: &str, rating: f64, category: AppCategory) {
        self.apps.insert(
            application.to_lowercase(),
            AppEntry {
                rating: rating.clamp(1.0, 10.0),
                category,
            },
        );
    }

    fn entry(&self, application: &str) -> Option<&AppEntry> {
        let lower = application.to_lowercase();
        // Exact key first, then substring match for qualified identifiers
        // like "com.microsoft.VSCode" or "Google Chrome".
        self.apps.get(&lower).or_else(|| {
            self.apps
                .iter()
                .find(|(key, _)| lower.contains(key.as_str()))
                .map(|(_, entry)| entry)
        })
    }
}
