//! Configuration assembly: schedule + global options + selection -> the
//! document the backend persists on `POST /save`.

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::backend::Backend;
use crate::error::Result;
use crate::schedule::{self, ScheduleDescriptor, WeeklyMatching};
use crate::selection::MonitoredContainer;

pub const DEFAULT_KEEP_LAST_N: u32 = 3;
pub const DEFAULT_CHECK_INTERVAL_MINUTES: u32 = 60;

/// Global option values as entered in the form.
///
/// Numeric fields are kept as raw text; [`build`] parses them with fallbacks.
#[derive(Debug, Clone, Default)]
pub struct GlobalOptions {
    pub telegram_bot_token: Option<String>,
    pub telegram_chat_id: Option<String>,
    pub cleanup_unused_images: bool,
    pub cleanup_keep_last_n: Option<String>,
    pub dry_run: bool,
    pub check_interval_minutes: Option<String>,
    pub cron_enabled: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GlobalSettings {
    #[serde(default)]
    pub cleanup_unused_images: bool,
    #[serde(default = "default_keep_last_n")]
    pub cleanup_keep_last_n: u32,
    #[serde(default)]
    pub dry_run: bool,
    #[serde(default = "default_check_interval")]
    pub check_interval_minutes: u32,
}

fn default_keep_last_n() -> u32 {
    DEFAULT_KEEP_LAST_N
}

fn default_check_interval() -> u32 {
    DEFAULT_CHECK_INTERVAL_MINUTES
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CronSettings {
    #[serde(default)]
    pub enabled: bool,
    #[serde(default = "default_schedule")]
    pub schedule: String,
}

fn default_schedule() -> String {
    schedule::HOURLY_EXPRESSION.to_string()
}

/// Complete configuration payload, in the backend's snake_case shape.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfigurationDocument {
    #[serde(default)]
    pub telegram_bot_token: String,
    #[serde(default)]
    pub telegram_chat_id: String,
    pub global: GlobalSettings,
    pub cron: CronSettings,
    #[serde(default)]
    pub containers: Vec<MonitoredContainer>,
}

impl ConfigurationDocument {
    /// Decode the stored schedule, e.g. to reseed the schedule form.
    pub fn schedule_descriptor(&self, weekly: WeeklyMatching) -> ScheduleDescriptor {
        schedule::decode_with(&self.cron.schedule, weekly)
    }
}

/// Pure composition; never fails.
pub fn build(
    descriptor: &ScheduleDescriptor,
    options: &GlobalOptions,
    containers: Vec<MonitoredContainer>,
) -> ConfigurationDocument {
    ConfigurationDocument {
        telegram_bot_token: text_or_empty(options.telegram_bot_token.as_deref()),
        telegram_chat_id: text_or_empty(options.telegram_chat_id.as_deref()),
        global: GlobalSettings {
            cleanup_unused_images: options.cleanup_unused_images,
            cleanup_keep_last_n: parse_or_default(
                options.cleanup_keep_last_n.as_deref(),
                DEFAULT_KEEP_LAST_N,
            ),
            dry_run: options.dry_run,
            check_interval_minutes: parse_or_default(
                options.check_interval_minutes.as_deref(),
                DEFAULT_CHECK_INTERVAL_MINUTES,
            ),
        },
        cron: CronSettings {
            enabled: options.cron_enabled,
            schedule: schedule::encode(descriptor),
        },
        containers,
    }
}

/// Hand the document to the backend. The outcome goes back to the caller.
pub async fn submit(backend: &dyn Backend, document: &ConfigurationDocument) -> Result<()> {
    match backend.save(document).await {
        Ok(()) => {
            info!(
                containers = document.containers.len(),
                schedule = %document.cron.schedule,
                cron_enabled = document.cron.enabled,
                "Configuration saved"
            );
            Ok(())
        }
        Err(e) => {
            warn!(error = %e, "Configuration save failed");
            Err(e)
        }
    }
}

fn text_or_empty(value: Option<&str>) -> String {
    value.map(|s| s.trim().to_string()).unwrap_or_default()
}

fn parse_or_default(raw: Option<&str>, default: u32) -> u32 {
    raw.and_then(|s| s.trim().parse::<u32>().ok())
        .unwrap_or(default)
}
