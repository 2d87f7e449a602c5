//! Helper functions for CLI commands.

use anyhow::Result;
use std::sync::Arc;

use crate::backend::{Backend, HttpBackend};
use crate::catalog::{create_catalog, ContainerSummary};
use crate::config::Config;
use crate::dashboard::{Dashboard, Notification, NotificationLevel};
use crate::status::{create_log_panel, LogLevel, LogLine, Refresher};

/// Wire the HTTP backend, shared stores and refresher from config.
pub fn build_refresher(cfg: &Config) -> Result<Arc<Refresher>> {
    let backend: Arc<dyn Backend> =
        Arc::new(HttpBackend::new(&cfg.backend.url, cfg.backend.timeout())?);
    Ok(Arc::new(Refresher::new(
        backend,
        create_catalog(cfg.catalog.page_size),
        create_log_panel(cfg.log.log_panel_capacity),
        cfg.poll.discard_stale_responses,
    )))
}

pub fn build_dashboard(cfg: &Config) -> Result<Dashboard> {
    let refresher = build_refresher(cfg)?;
    Ok(Dashboard::new(refresher).with_weekly_matching(cfg.schedule.weekly_matching()))
}

pub fn print_notifications(notifications: &[Notification]) {
    for n in notifications {
        let marker = match n.level {
            NotificationLevel::Success => "✓",
            NotificationLevel::Info => "·",
            NotificationLevel::Warning => "!",
            NotificationLevel::Error => "✗",
        };
        match n.level {
            NotificationLevel::Warning | NotificationLevel::Error => {
                eprintln!("{} {}", marker, n.message)
            }
            _ => println!("{} {}", marker, n.message),
        }
    }
}

pub fn print_container(c: &ContainerSummary) {
    let update = match &c.update_info {
        Some(info) if info.has_update => format!(
            "  update: {} -> {}",
            info.current_tag.as_deref().unwrap_or("?"),
            info.latest_tag.as_deref().unwrap_or("?")
        ),
        _ => String::new(),
    };
    println!(
        "{:<24} {:<40} {:<12} {}{}",
        c.name,
        c.image,
        c.short_id(),
        c.status,
        update
    );
}

pub fn print_log_line(line: &LogLine) {
    let tag = match line.level {
        LogLevel::Info => "INFO ",
        LogLevel::Success => "OK   ",
        LogLevel::Warning => "WARN ",
        LogLevel::Error => "ERROR",
    };
    println!("[{}] {}", tag, line.text);
}
