//! Configuration file parser for ~/.config/feedpager/config.toml.
//!
//! The config file is optional: a missing file yields `Config::default()`,
//! which is a signed-out session with nothing pinned. Unknown keys are accepted
//! and logged as warnings.
use serde::Deserialize;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::feed::{FeedDescriptor, PinnedFeedInfo, SelectedFeed};
use crate::flags::StaticGates;
use crate::sources::{PinnedFeeds, Preferences, SavedFeed, Session};

// ============================================================================
// Error Types
// ============================================================================

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid TOML in config file: {0}")]
    Parse(#[from] toml::de::Error),

    /// Config file exceeds maximum allowed size.
    #[error("Config file too large: {0}")]
    TooLarge(String),
}

// ============================================================================
// Configuration Structs
// ============================================================================

/// Top-level application configuration.
///
/// All fields use `#[serde(default)]` so any subset of keys can be specified.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Whether an authenticated session exists.
    pub has_session: bool,

    /// Merge saved feeds into the timeline pages.
    pub merge_feed_enabled: bool,

    /// Feed identifier to start on (e.g. `following`, `list|at://...`).
    pub initial_feed: Option<String>,

    /// Append analytics events as JSON lines to this file.
    pub analytics_log: Option<PathBuf>,

    /// Feature gates by name.
    pub gates: HashMap<String, bool>,

    /// Pinned feeds, in tab order.
    pub pinned_feeds: Vec<PinnedFeedInfo>,

    /// Saved feeds from preferences. Pinned feeds are added if missing.
    pub saved_feeds: Vec<SavedFeed>,
}

impl Config {
    /// Maximum config file size (1 MB).
    const MAX_FILE_SIZE: u64 = 1_048_576;

    /// Load configuration from a TOML file.
    ///
    /// - Missing file → `Ok(Config::default())`
    /// - Empty file → `Ok(Config::default())`
    /// - Invalid TOML → `Err(ConfigError::Parse)` with line number info
    /// - Unknown keys → silently accepted, logged as warning
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        match std::fs::metadata(path) {
            Ok(meta) if meta.len() > Self::MAX_FILE_SIZE => {
                return Err(ConfigError::TooLarge(format!(
                    "Config file is {} bytes (max {} bytes)",
                    meta.len(),
                    Self::MAX_FILE_SIZE
                )));
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "No config file found, using defaults");
                return Ok(Self::default());
            }
            Err(e) => return Err(ConfigError::Io(e)),
            Ok(_) => {}
        }

        let content = match std::fs::read_to_string(path) {
            Ok(c) => c,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "Config file disappeared, using defaults");
                return Ok(Self::default());
            }
            Err(e) => return Err(ConfigError::Io(e)),
        };

        Self::parse(&content)
    }

    /// Parse configuration from TOML text.
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }

        if let Ok(raw) = content.parse::<toml::Table>() {
            let known_keys = [
                "has_session",
                "merge_feed_enabled",
                "initial_feed",
                "analytics_log",
                "gates",
                "pinned_feeds",
                "saved_feeds",
            ];
            for key in raw.keys() {
                if !known_keys.contains(&key.as_str()) {
                    tracing::warn!(key = %key, "Unknown key in config file, ignoring");
                }
            }
        }

        let config: Config = toml::from_str(content)?;
        tracing::info!(
            pinned = config.pinned_feeds.len(),
            has_session = config.has_session,
            "Loaded configuration"
        );
        Ok(config)
    }

    // ========================================================================
    // Source views
    // ========================================================================

    pub fn session(&self) -> Session {
        Session {
            has_session: self.has_session,
        }
    }

    /// Pinned feeds with blank `value`s filled from the URI.
    pub fn pinned_feeds(&self) -> PinnedFeeds {
        PinnedFeeds::loaded(
            self.pinned_feeds
                .iter()
                .cloned()
                .map(|mut info| {
                    if info.value.is_empty() {
                        info.value = info.uri.clone();
                    }
                    info
                })
                .collect(),
        )
    }

    pub fn preferences(&self) -> Preferences {
        let mut saved_feeds = self.saved_feeds.clone();
        for info in &self.pinned_feeds {
            if !saved_feeds.iter().any(|f| f.value == info.uri) {
                saved_feeds.push(SavedFeed {
                    value: info.uri.clone(),
                    pinned: true,
                });
            }
        }
        Preferences {
            saved_feeds,
            merge_feed_enabled: self.merge_feed_enabled,
        }
    }

    pub fn gates(&self) -> StaticGates {
        StaticGates::new(self.gates.clone())
    }

    /// The configured starting selection. An unparseable value is logged and
    /// treated as the default.
    pub fn initial_selection(&self) -> SelectedFeed {
        let Some(raw) = self.initial_feed.as_deref() else {
            return SelectedFeed::Default;
        };
        match raw.parse::<FeedDescriptor>() {
            Ok(feed) => SelectedFeed::Feed(feed),
            Err(e) => {
                tracing::warn!(initial_feed = raw, error = %e, "Ignoring initial_feed");
                SelectedFeed::Default
            }
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
