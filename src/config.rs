use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::Deserialize;

use crate::query::DAILY_BUCKET_MAX_SPAN_DAYS;
use crate::sentiment::{SentimentScorer, StandardVaderScorer, VaderLexicon, VaderScorer};
use crate::view::ViewSettings;

/// Application configuration loaded from TOML config file.
/// Every field has a default, so the file is optional.
#[derive(Debug, Deserialize, Default)]
#[serde(default)]
pub struct AppConfig {
    /// Enriched dataset used by the query commands (overrides XDG default).
    pub data_path: Option<PathBuf>,
    /// Tab-separated VADER lexicon used instead of the standard one.
    pub lexicon_path: Option<PathBuf>,
    /// Number of parallel enrichment workers. 0 = auto-detect (cores / 2, min 1).
    pub workers: usize,
    pub trend: TrendConfig,
    pub leaderboard: LeaderboardConfig,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct TrendConfig {
    /// Subsets spanning fewer days are bucketed by day, others by month.
    pub daily_max_span_days: i64,
}

impl Default for TrendConfig {
    fn default() -> Self {
        Self {
            daily_max_span_days: DAILY_BUCKET_MAX_SPAN_DAYS,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct LeaderboardConfig {
    /// Rows shown by `top` when `-n` is not given.
    pub limit: usize,
}

impl Default for LeaderboardConfig {
    fn default() -> Self {
        Self { limit: 10 }
    }
}

impl AppConfig {
    /// Load config from `~/.config/tubetrend/config.toml`.
    /// Returns default config if file doesn't exist.
    /// Logs a warning if the file exists but can't be parsed.
    pub fn load() -> Self {
        match Self::config_path() {
            Some(path) if path.exists() => Self::load_from(&path),
            _ => {
                log::debug!("No config file found, using defaults");
                Self::default()
            }
        }
    }

    fn load_from(path: &Path) -> Self {
        let contents = match std::fs::read_to_string(path) {
            Ok(contents) => contents,
            Err(e) => {
                log::warn!("Failed to read {}: {}. Using defaults.", path.display(), e);
                return Self::default();
            }
        };
        match toml::from_str::<AppConfig>(&contents) {
            Ok(config) => {
                log::info!("Loaded config from {}", path.display());
                config
            }
            Err(e) => {
                log::warn!("Failed to parse {}: {}. Using defaults.", path.display(), e);
                Self::default()
            }
        }
    }

    /// Resolve worker count: 0 → auto-detect (cores / 2, min 1).
    pub fn resolve_workers(&self) -> usize {
        if self.workers > 0 {
            self.workers
        } else {
            let cores = std::thread::available_parallelism()
                .map(|n| n.get())
                .unwrap_or(2);
            (cores / 2).max(1)
        }
    }

    /// Scorer backed by the configured lexicon file, or standard VADER.
    pub fn scorer(&self) -> Result<Box<dyn SentimentScorer>> {
        match &self.lexicon_path {
            Some(path) => {
                let lexicon = VaderLexicon::from_path(path)
                    .with_context(|| format!("Failed to load lexicon {}", path.display()))?;
                Ok(Box::new(VaderScorer::with_lexicon(lexicon)))
            }
            None => Ok(Box::new(StandardVaderScorer::new())),
        }
    }

    /// The dashboard table keeps every row unless `limit` is given.
    pub fn view_settings(&self, limit: Option<usize>) -> ViewSettings {
        ViewSettings {
            max_daily_span_days: self.trend.daily_max_span_days,
            table_limit: limit,
        }
    }

    fn config_path() -> Option<PathBuf> {
        ProjectDirs::from("", "", crate::APP_NAME)
            .map(|dirs| dirs.config_dir().join("config.toml"))
    }
}

/// Resolve the default enriched dataset path using XDG data directory.
pub fn default_data_path() -> PathBuf {
    if let Some(dirs) = ProjectDirs::from("", "", crate::APP_NAME) {
        let data_dir = dirs.data_dir();
        std::fs::create_dir_all(data_dir).ok();
        data_dir.join("trending_enriched.csv")
    } else {
        // Fallback: current directory
        PathBuf::from("trending_enriched.csv")
    }
}
