use anyhow::{Context, Result};
use chrono::NaiveTime;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::ConfigError;

/// Hydration reminder interval bounds, in minutes.
pub const DRINK_INTERVAL_MIN: u32 = 30;
pub const DRINK_INTERVAL_MAX: u32 = 240;

// ---------------------------------------------------------------------------
// Work time
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct WorkConfig {
    #[serde(default = "default_work_start")]
    pub start: String,
    #[serde(default = "default_work_end")]
    pub end: String,
}

fn default_work_start() -> String {
    "09:00".into()
}
fn default_work_end() -> String {
    "18:00".into()
}

impl Default for WorkConfig {
    fn default() -> Self {
        Self {
            start: default_work_start(),
            end: default_work_end(),
        }
    }
}

// ---------------------------------------------------------------------------
// Reminders
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ReminderConfig {
    /// Minutes between hydration reminders, clamped into [30, 240] on load.
    #[serde(default = "default_drink_interval")]
    pub drink_interval: u32,
    #[serde(default = "default_true")]
    pub enable_news: bool,
    /// Daily almanac (huangli) fetch and display.
    #[serde(default = "default_true")]
    pub enable_huangli: bool,
}

fn default_drink_interval() -> u32 {
    120
}
fn default_true() -> bool {
    true
}

impl Default for ReminderConfig {
    fn default() -> Self {
        Self {
            drink_interval: default_drink_interval(),
            enable_news: true,
            enable_huangli: true,
        }
    }
}

// ---------------------------------------------------------------------------
// Data source endpoints
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SourcesConfig {
    #[serde(default = "default_almanac_api")]
    pub almanac_api: String,
    #[serde(default = "default_holiday_api")]
    pub holiday_api: String,
    #[serde(default = "default_news_rss")]
    pub news_rss: String,
}

fn default_almanac_api() -> String {
    "https://www.mxnzp.com/api/holiday/single/".into()
}
fn default_holiday_api() -> String {
    "https://www.mxnzp.com/api/holiday/list/month/".into()
}
fn default_news_rss() -> String {
    "http://rss.news.so.com/rss/2/guonei".into()
}

impl Default for SourcesConfig {
    fn default() -> Self {
        Self {
            almanac_api: default_almanac_api(),
            holiday_api: default_holiday_api(),
            news_rss: default_news_rss(),
        }
    }
}

// ---------------------------------------------------------------------------
// Logging
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct LogConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
}

fn default_log_level() -> String {
    "info".into()
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

// ---------------------------------------------------------------------------
// Root config
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    #[serde(default)]
    pub work: WorkConfig,
    #[serde(default)]
    pub reminder: ReminderConfig,
    #[serde(default)]
    pub sources: SourcesConfig,
    #[serde(default)]
    pub log: LogConfig,
}

impl Config {
    /// Parsed work start time.
    pub fn work_start(&self) -> Result<NaiveTime, ConfigError> {
        parse_time(&self.work.start)
    }

    /// Parsed work end time.
    pub fn work_end(&self) -> Result<NaiveTime, ConfigError> {
        parse_time(&self.work.end)
    }

    /// Clamp out-of-range values into their valid bounds.
    pub fn normalize(&mut self) {
        self.reminder.drink_interval = self
            .reminder
            .drink_interval
            .clamp(DRINK_INTERVAL_MIN, DRINK_INTERVAL_MAX);
    }
}

fn parse_time(raw: &str) -> Result<NaiveTime, ConfigError> {
    NaiveTime::parse_from_str(raw, "%H:%M")
        .map_err(|_| ConfigError::InvalidTime(raw.to_string()))
}

// ---------------------------------------------------------------------------
// Paths & loading
// ---------------------------------------------------------------------------

pub fn config_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".deskmate")
}

pub fn config_path() -> PathBuf {
    config_dir().join("config.json")
}

pub fn cache_path() -> PathBuf {
    config_dir().join("cache.json")
}

pub fn log_dir() -> PathBuf {
    config_dir().join("logs")
}

/// Load the configuration, falling back to defaults where recovery is
/// possible: a missing file is created from defaults, an unparsable or
/// invalid file is replaced by defaults (the broken content is logged).
pub fn load_config(path: Option<&Path>) -> Result<Config> {
    let p = path.map(PathBuf::from).unwrap_or_else(config_path);

    if !p.exists() {
        let cfg = Config::default();
        save_config(&cfg, Some(&p))?;
        return Ok(cfg);
    }

    let text = std::fs::read_to_string(&p)
        .with_context(|| format!("reading config from {}", p.display()))?;

    let mut cfg: Config = match serde_json::from_str(&text) {
        Ok(cfg) => cfg,
        Err(e) => {
            tracing::warn!(path = %p.display(), error = %e, "Config unparsable, resetting to defaults");
            let cfg = Config::default();
            save_config(&cfg, Some(&p))?;
            return Ok(cfg);
        }
    };

    if cfg.work_start().is_err() || cfg.work_end().is_err() {
        tracing::warn!(
            start = %cfg.work.start,
            end = %cfg.work.end,
            "Invalid work times in config, resetting to defaults"
        );
        cfg.work = WorkConfig::default();
        save_config(&cfg, Some(&p))?;
    }

    cfg.normalize();
    Ok(cfg)
}

pub fn save_config(cfg: &Config, path: Option<&Path>) -> Result<()> {
    let p = path.map(PathBuf::from).unwrap_or_else(config_path);

    if let Some(parent) = p.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let json = serde_json::to_string_pretty(cfg)?;
    std::fs::write(&p, json)?;
    Ok(())
}
