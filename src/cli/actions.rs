//! One-shot backend actions: list, save, run-now, logs.

use anyhow::{Context, Result};
use clap::Args;

use super::helpers::{build_dashboard, print_container, print_log_line, print_notifications};
use crate::assembler::GlobalOptions;
use crate::config::Config;
use crate::selection::ContainerFlag;
use crate::status::LogLevel;

// ---- containers ----

pub async fn cmd_containers(cfg: &Config, query: Option<String>, page: usize) -> Result<()> {
    let mut dashboard = build_dashboard(cfg)?;
    let loaded = dashboard.refresh().await;
    print_notifications(&dashboard.take_notifications());
    loaded?;

    if let Some(q) = query.as_deref() {
        dashboard.search(q).await;
    }
    for _ in 1..page {
        dashboard.next_page().await;
    }

    let items = dashboard.page_items().await;
    if items.is_empty() {
        println!("No containers found.");
        return Ok(());
    }
    for c in &items {
        print_container(c);
    }
    if let Some(info) = dashboard.pagination().await {
        println!("Page {} of {}", info.page, info.total_pages);
    }
    Ok(())
}

// ---- save ----

#[derive(Args, Debug, Default)]
pub struct SaveArgs {
    /// Container to monitor, as NAME or NAME=IMAGE. Repeatable.
    #[arg(short, long = "monitor", value_name = "NAME[=IMAGE]")]
    pub monitor: Vec<String>,

    /// Health check URL for a monitored container. Repeatable.
    #[arg(long = "health-check", value_name = "NAME=URL")]
    pub health_check: Vec<String>,

    /// Monitor without updating automatically. Repeatable.
    #[arg(long = "notify-only", value_name = "NAME")]
    pub notify_only: Vec<String>,

    /// Do not roll back when an update fails. Repeatable.
    #[arg(long = "no-rollback", value_name = "NAME")]
    pub no_rollback: Vec<String>,

    /// Keep the entry but skip it during update runs. Repeatable.
    #[arg(long = "disable", value_name = "NAME")]
    pub disable: Vec<String>,

    /// Cron expression for scheduled runs.
    #[arg(short, long)]
    pub schedule: Option<String>,

    /// Enable scheduled runs.
    #[arg(long)]
    pub cron_enabled: bool,

    #[arg(long)]
    pub cleanup: bool,

    /// Image versions kept by cleanup.
    #[arg(long)]
    pub keep_last: Option<String>,

    #[arg(long)]
    pub dry_run: bool,

    #[arg(long)]
    pub check_interval: Option<String>,

    #[arg(long)]
    pub bot_token: Option<String>,

    #[arg(long)]
    pub chat_id: Option<String>,

    /// Print the document instead of saving it.
    #[arg(long)]
    pub print: bool,
}

pub async fn cmd_save(cfg: &Config, args: SaveArgs) -> Result<()> {
    let mut dashboard = build_dashboard(cfg)?;

    let needs_catalog = args.monitor.iter().any(|m| !m.contains('='));
    if needs_catalog {
        let loaded = dashboard.refresh().await;
        print_notifications(&dashboard.take_notifications());
        loaded.context("An image is needed for every --monitor NAME without a catalog")?;
    }

    for entry in &args.monitor {
        let added = match split_pair(entry) {
            Some((name, image)) => dashboard.add_container(name, image),
            None => dashboard.add_from_catalog(entry.trim()).await,
        };
        print_notifications(&dashboard.take_notifications());
        added?;
    }

    for entry in &args.health_check {
        let (name, url) = split_pair(entry)
            .with_context(|| format!("Expected NAME=URL, got '{}'", entry))?;
        dashboard.set_health_check_url(name, url)?;
    }
    for name in &args.notify_only {
        dashboard.set_flag(name, ContainerFlag::AutoUpdate, false)?;
    }
    for name in &args.no_rollback {
        dashboard.set_flag(name, ContainerFlag::RollbackOnFailure, false)?;
    }
    for name in &args.disable {
        dashboard.set_flag(name, ContainerFlag::Enabled, false)?;
    }

    if let Some(expr) = args.schedule.as_deref() {
        dashboard.set_schedule_expression(expr);
    }
    dashboard.set_options(GlobalOptions {
        telegram_bot_token: args.bot_token,
        telegram_chat_id: args.chat_id,
        cleanup_unused_images: args.cleanup,
        cleanup_keep_last_n: args.keep_last,
        dry_run: args.dry_run,
        check_interval_minutes: args.check_interval,
        cron_enabled: args.cron_enabled,
    });

    if args.print {
        let document = dashboard.build_document();
        println!("{}", serde_json::to_string_pretty(&document)?);
        return Ok(());
    }

    let saved = dashboard.save().await;
    print_notifications(&dashboard.take_notifications());
    let document = saved?;
    println!(
        "  {} container(s), schedule: {} ({})",
        document.containers.len(),
        document.cron.schedule,
        dashboard.schedule_description()
    );
    Ok(())
}

fn split_pair(raw: &str) -> Option<(&str, &str)> {
    let (key, value) = raw.split_once('=')?;
    let (key, value) = (key.trim(), value.trim());
    (!key.is_empty()).then_some((key, value))
}

// ---- run-now ----

pub async fn cmd_run_now(cfg: &Config, target: Option<(String, String)>) -> Result<()> {
    let mut dashboard = build_dashboard(cfg)?;
    let result = match &target {
        Some((name, tag)) => dashboard.update_container(name, tag).await,
        None => dashboard.run_now().await,
    };
    print_notifications(&dashboard.take_notifications());
    result?;
    Ok(())
}

// ---- logs ----

pub async fn cmd_logs(cfg: &Config, level: Option<String>, grep: Option<String>) -> Result<()> {
    let min_level = match level.as_deref() {
        Some(raw) => Some(
            LogLevel::parse(raw).with_context(|| format!("Unknown log level '{}'", raw))?,
        ),
        None => None,
    };

    let dashboard = build_dashboard(cfg)?;
    let refresher = dashboard.refresher();
    refresher.refresh_logs().await?;

    let lines = refresher
        .logs()
        .read()
        .await
        .get_filtered(min_level, grep.as_deref());
    if lines.is_empty() {
        println!("No log lines.");
    }
    for line in &lines {
        print_log_line(line);
    }
    Ok(())
}

pub async fn cmd_clear_logs(cfg: &Config) -> Result<()> {
    let mut dashboard = build_dashboard(cfg)?;
    let result = dashboard.clear_logs().await;
    print_notifications(&dashboard.take_notifications());
    result?;
    Ok(())
}
