use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::schedule::WeeklyMatching;
use crate::status::PollIntervals;

// ---------------------------------------------------------------------------
// Backend
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BackendConfig {
    #[serde(default = "default_backend_url")]
    pub url: String,
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

fn default_backend_url() -> String {
    "http://127.0.0.1:8080".into()
}
fn default_timeout() -> u64 {
    15
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            url: default_backend_url(),
            timeout_secs: default_timeout(),
        }
    }
}

impl BackendConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs.max(1))
    }
}

// ---------------------------------------------------------------------------
// Catalog view
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogConfig {
    #[serde(default = "default_page_size")]
    pub page_size: usize,
}

fn default_page_size() -> usize {
    crate::catalog::DEFAULT_PAGE_SIZE
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            page_size: default_page_size(),
        }
    }
}

// ---------------------------------------------------------------------------
// Polling
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PollConfig {
    #[serde(default = "default_log_interval")]
    pub log_interval_secs: u64,
    #[serde(default = "default_catalog_interval")]
    pub catalog_interval_secs: u64,
    /// Drop responses that arrive after a newer one was applied.
    #[serde(default = "default_true")]
    pub discard_stale_responses: bool,
}

fn default_log_interval() -> u64 {
    5
}
fn default_catalog_interval() -> u64 {
    30
}
fn default_true() -> bool {
    true
}

impl Default for PollConfig {
    fn default() -> Self {
        Self {
            log_interval_secs: default_log_interval(),
            catalog_interval_secs: default_catalog_interval(),
            discard_stale_responses: true,
        }
    }
}

impl PollConfig {
    pub fn intervals(&self) -> PollIntervals {
        PollIntervals {
            logs: Duration::from_secs(self.log_interval_secs.max(1)),
            catalog: Duration::from_secs(self.catalog_interval_secs.max(1)),
        }
    }
}

// ---------------------------------------------------------------------------
// Schedule decoding
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleConfig {
    /// Only treat `0 H * * D` as weekly when decoding stored expressions.
    #[serde(default)]
    pub strict_weekly_decode: bool,
}

impl ScheduleConfig {
    pub fn weekly_matching(&self) -> WeeklyMatching {
        if self.strict_weekly_decode {
            WeeklyMatching::Strict
        } else {
            WeeklyMatching::Loose
        }
    }
}

// ---------------------------------------------------------------------------
// Logging
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
    /// text | compact | pretty | json
    #[serde(default = "default_log_format")]
    pub format: String,
    /// Also write a daily rolling file under `dir`.
    #[serde(default)]
    pub file: bool,
    pub dir: Option<String>,
    #[serde(default = "default_panel_capacity")]
    pub log_panel_capacity: usize,
}

fn default_log_level() -> String {
    "info".into()
}
fn default_log_format() -> String {
    "text".into()
}
fn default_panel_capacity() -> usize {
    crate::status::log_panel::DEFAULT_CAPACITY
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
            file: false,
            dir: None,
            log_panel_capacity: default_panel_capacity(),
        }
    }
}

// ---------------------------------------------------------------------------
// Root config
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    #[serde(default)]
    pub backend: BackendConfig,
    #[serde(default)]
    pub catalog: CatalogConfig,
    #[serde(default)]
    pub poll: PollConfig,
    #[serde(default)]
    pub schedule: ScheduleConfig,
    #[serde(default)]
    pub log: LogConfig,
}

impl Config {
    /// Apply `GUARDIAN_*` environment overrides on top of the file values.
    pub fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(url) = lookup("GUARDIAN_BACKEND_URL").filter(|s| !s.trim().is_empty()) {
            self.backend.url = url.trim().to_string();
        }
        if let Some(level) = lookup("GUARDIAN_LOG_LEVEL").filter(|s| !s.trim().is_empty()) {
            self.log.level = level.trim().to_string();
        }
    }
}

// ---------------------------------------------------------------------------
// Paths & loading
// ---------------------------------------------------------------------------

pub fn config_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".guardian")
}

pub fn config_path() -> PathBuf {
    config_dir().join("config.json")
}

pub fn log_dir_path(cfg: &Config) -> PathBuf {
    match cfg.log.dir.as_deref() {
        Some(raw) if raw.starts_with('~') => dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(raw.trim_start_matches('~').trim_start_matches('/')),
        Some(raw) => PathBuf::from(raw),
        None => config_dir().join("logs"),
    }
}

pub fn load_config(path: Option<&Path>) -> Result<Config> {
    let p = path.map(PathBuf::from).unwrap_or_else(config_path);

    if p.exists() {
        let text = std::fs::read_to_string(&p)
            .with_context(|| format!("reading config from {}", p.display()))?;
        let cfg: Config = serde_json::from_str(&text)
            .with_context(|| format!("parsing config from {}", p.display()))?;
        Ok(cfg)
    } else {
        Ok(Config::default())
    }
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
