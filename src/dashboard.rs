//! Dashboard: the UI-event layer.
//!
//! Owns the selection, the schedule descriptor and the global options; shares
//! the catalog and log panel with the status poller through a [`Refresher`].
//! Every operator action produces at most one state transition and queues a
//! [`Notification`] describing its outcome. Failed actions leave state as it
//! was.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::assembler::{self, ConfigurationDocument, GlobalOptions};
use crate::backend::RunNowRequest;
use crate::catalog::{ContainerSummary, PageInfo};
use crate::error::{DashboardError, ErrorSeverity, Result};
use crate::schedule::{self, ScheduleDescriptor, WeeklyMatching};
use crate::selection::{ContainerFlag, MonitoredContainer, SelectionState};
use crate::status::{LogLine, RefreshOutcome, Refresher};

/// Undrained notifications kept; older ones are dropped first.
pub const MAX_PENDING_NOTIFICATIONS: usize = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationLevel {
    Info,
    Success,
    Warning,
    Error,
}

impl From<ErrorSeverity> for NotificationLevel {
    fn from(severity: ErrorSeverity) -> Self {
        match severity {
            ErrorSeverity::Warning => NotificationLevel::Warning,
            ErrorSeverity::Error => NotificationLevel::Error,
        }
    }
}

/// User-visible outcome of an operator action.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notification {
    pub level: NotificationLevel,
    pub message: String,
}

/// Header counters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DashboardStats {
    pub total_containers: usize,
    pub monitored: usize,
    pub auto_updates: usize,
    pub last_update: Option<DateTime<Utc>>,
}

pub struct Dashboard {
    refresher: Arc<Refresher>,
    selection: SelectionState,
    schedule: ScheduleDescriptor,
    options: GlobalOptions,
    weekly_matching: WeeklyMatching,
    notifications: Vec<Notification>,
}

impl Dashboard {
    pub fn new(refresher: Arc<Refresher>) -> Self {
        Self {
            refresher,
            selection: SelectionState::new(),
            schedule: ScheduleDescriptor::default(),
            options: GlobalOptions::default(),
            weekly_matching: WeeklyMatching::default(),
            notifications: Vec::new(),
        }
    }

    pub fn with_weekly_matching(mut self, weekly_matching: WeeklyMatching) -> Self {
        self.weekly_matching = weekly_matching;
        self
    }

    pub fn refresher(&self) -> &Arc<Refresher> {
        &self.refresher
    }

    /// Seed selection, schedule and options from a stored document.
    pub fn load_document(&mut self, document: &ConfigurationDocument) {
        self.selection = SelectionState::from_containers(document.containers.clone());
        self.schedule = document.schedule_descriptor(self.weekly_matching);
        self.options = GlobalOptions {
            telegram_bot_token: Some(document.telegram_bot_token.clone()),
            telegram_chat_id: Some(document.telegram_chat_id.clone()),
            cleanup_unused_images: document.global.cleanup_unused_images,
            cleanup_keep_last_n: Some(document.global.cleanup_keep_last_n.to_string()),
            dry_run: document.global.dry_run,
            check_interval_minutes: Some(document.global.check_interval_minutes.to_string()),
            cron_enabled: document.cron.enabled,
        };
        debug!(
            monitored = self.selection.len(),
            schedule = %document.cron.schedule,
            "Dashboard seeded from document"
        );
    }

    // -----------------------------------------------------------------------
    // Catalog view
    // -----------------------------------------------------------------------

    pub async fn search(&self, query: &str) {
        self.refresher.catalog().write().await.set_query(query);
    }

    pub async fn next_page(&self) {
        self.refresher.catalog().write().await.next_page();
    }

    pub async fn prev_page(&self) {
        self.refresher.catalog().write().await.prev_page();
    }

    pub async fn page_items(&self) -> Vec<ContainerSummary> {
        self.refresher
            .catalog()
            .read()
            .await
            .current_page_items()
            .into_iter()
            .cloned()
            .collect()
    }

    pub async fn pagination(&self) -> Option<PageInfo> {
        self.refresher.catalog().read().await.pagination()
    }

    /// Reload the catalog now, outside the poll cycle.
    pub async fn refresh(&mut self) -> Result<RefreshOutcome> {
        self.notify(NotificationLevel::Info, "Refreshing containers...");
        self.load_containers().await
    }

    async fn load_containers(&mut self) -> Result<RefreshOutcome> {
        match self.refresher.refresh_catalog().await {
            Ok(outcome) => Ok(outcome),
            Err(e) => {
                warn!(error = %e, "Failed to load containers");
                self.notify(NotificationLevel::Error, "Failed to load containers");
                Err(e)
            }
        }
    }

    // -----------------------------------------------------------------------
    // Selection
    // -----------------------------------------------------------------------

    pub fn add_container(&mut self, name: &str, image: &str) -> Result<()> {
        let result = self.selection.add(name, image).map(|_| ());
        self.report_add(name, result)
    }

    /// Add a catalog entry by name, taking its image from the catalog.
    pub async fn add_from_catalog(&mut self, name: &str) -> Result<()> {
        let result = {
            let catalog = self.refresher.catalog().read().await;
            self.selection.add_from_catalog(name, &catalog).map(|_| ())
        };
        self.report_add(name, result)
    }

    fn report_add(&mut self, name: &str, result: Result<()>) -> Result<()> {
        match &result {
            Ok(()) => {
                info!(container = name, "Added to monitoring");
                self.notify(NotificationLevel::Success, format!("Added {} to monitoring", name));
            }
            Err(DashboardError::AlreadyMonitored(_)) => {
                self.notify(NotificationLevel::Warning, "Container already monitored");
            }
            Err(e) => self.notify_error(e),
        }
        result
    }

    pub fn remove_container(&mut self, name: &str) {
        if self.selection.remove(name) {
            info!(container = name, "Removed from monitoring");
        }
        self.notify(NotificationLevel::Info, format!("Removed {} from monitoring", name));
    }

    pub fn set_flag(&mut self, name: &str, flag: ContainerFlag, value: bool) -> Result<()> {
        let result = self.selection.set_flag(name, flag, value);
        match &result {
            Ok(()) => debug!(container = name, %flag, value, "Flag updated"),
            Err(e) => self.notify_error(e),
        }
        result
    }

    pub fn set_health_check_url(&mut self, name: &str, url: &str) -> Result<()> {
        let result = self.selection.set_health_check_url(name, url);
        if let Err(e) = &result {
            self.notify_error(e);
        }
        result
    }

    pub fn selection(&self) -> &SelectionState {
        &self.selection
    }

    // -----------------------------------------------------------------------
    // Schedule and options
    // -----------------------------------------------------------------------

    pub fn set_schedule(&mut self, descriptor: ScheduleDescriptor) {
        self.schedule = descriptor.normalized();
    }

    /// Parse an expression typed by the operator into the schedule form.
    pub fn set_schedule_expression(&mut self, expression: &str) {
        self.schedule = schedule::decode_with(expression, self.weekly_matching);
    }

    pub fn schedule(&self) -> &ScheduleDescriptor {
        &self.schedule
    }

    /// The cron expression that a save would store.
    pub fn schedule_preview(&self) -> String {
        schedule::encode(&self.schedule)
    }

    pub fn schedule_description(&self) -> String {
        schedule::describe(&self.schedule)
    }

    pub fn set_options(&mut self, options: GlobalOptions) {
        self.options = options;
    }

    pub fn options(&self) -> &GlobalOptions {
        &self.options
    }

    // -----------------------------------------------------------------------
    // Backend actions
    // -----------------------------------------------------------------------

    /// Document a save would submit right now.
    pub fn build_document(&self) -> ConfigurationDocument {
        assembler::build(&self.schedule, &self.options, self.selection.snapshot())
    }

    pub async fn save(&mut self) -> Result<ConfigurationDocument> {
        let document = self.build_document();
        match assembler::submit(self.refresher.backend().as_ref(), &document).await {
            Ok(()) => {
                self.notify(NotificationLevel::Success, "Configuration saved successfully");
                Ok(document)
            }
            Err(e) => {
                self.notify(NotificationLevel::Error, "Failed to save configuration");
                Err(e)
            }
        }
    }

    /// Start a full update cycle on the backend.
    pub async fn run_now(&mut self) -> Result<()> {
        if let Err(e) = self.refresher.backend().run_now(None).await {
            warn!(error = %e, "Run-now failed");
            self.notify(NotificationLevel::Error, "Failed to start update");
            return Err(e);
        }
        info!("Update run started");
        self.notify(NotificationLevel::Success, "Update started");
        if let Err(e) = self.refresher.refresh_logs().await {
            warn!(error = %e, "Failed to load logs");
        }
        Ok(())
    }

    /// Move one container to `target_tag`.
    pub async fn update_container(&mut self, name: &str, target_tag: &str) -> Result<()> {
        self.notify(
            NotificationLevel::Info,
            format!("Updating {} to {}...", name, target_tag),
        );
        let request = RunNowRequest {
            name: name.to_string(),
            target_tag: target_tag.to_string(),
        };
        if let Err(e) = self.refresher.backend().run_now(Some(&request)).await {
            warn!(container = name, target_tag, error = %e, "Container update failed");
            self.notify(
                NotificationLevel::Error,
                format!("Failed to update {}: {}", name, failure_reason(&e)),
            );
            return Err(e);
        }
        info!(container = name, target_tag, "Container update requested");
        self.notify(
            NotificationLevel::Success,
            format!("Successfully updated {} to {}", name, target_tag),
        );
        // Surface the new tag; a failed reload is reported on its own.
        let _ = self.load_containers().await;
        Ok(())
    }

    pub async fn clear_logs(&mut self) -> Result<()> {
        if let Err(e) = self.refresher.backend().clear_logs().await {
            warn!(error = %e, "Failed to clear logs");
            self.notify(NotificationLevel::Error, "Failed to clear logs");
            return Err(e);
        }
        self.refresher.clear_log_panel().await;
        self.notify(NotificationLevel::Success, "Logs cleared successfully");
        Ok(())
    }

    pub async fn log_lines(&self) -> Vec<LogLine> {
        self.refresher.logs().read().await.lines()
    }

    // -----------------------------------------------------------------------
    // Stats and notifications
    // -----------------------------------------------------------------------

    pub async fn stats(&self) -> DashboardStats {
        DashboardStats {
            total_containers: self.refresher.catalog().read().await.len(),
            monitored: self.selection.len(),
            auto_updates: self
                .selection
                .iter()
                .filter(|c| c.will_auto_update())
                .count(),
            last_update: self.refresher.last_catalog_update().await,
        }
    }

    /// Monitored entries with their catalog data, if the catalog still lists them.
    pub async fn monitored_with_catalog(&self) -> Vec<(MonitoredContainer, Option<ContainerSummary>)> {
        let catalog = self.refresher.catalog().read().await;
        self.selection
            .iter()
            .map(|c| (c.clone(), catalog.get(&c.name).cloned()))
            .collect()
    }

    /// Drain pending notifications, oldest first.
    pub fn take_notifications(&mut self) -> Vec<Notification> {
        std::mem::take(&mut self.notifications)
    }

    fn notify(&mut self, level: NotificationLevel, message: impl Into<String>) {
        let message = message.into();
        debug!(?level, %message, "Notification");
        if self.notifications.len() >= MAX_PENDING_NOTIFICATIONS {
            self.notifications.remove(0);
        }
        self.notifications.push(Notification { level, message });
    }

    fn notify_error(&mut self, err: &DashboardError) {
        self.notify(err.severity().into(), err.to_string());
    }
}

fn failure_reason(err: &DashboardError) -> String {
    match err {
        DashboardError::NetworkFailure(msg) | DashboardError::MalformedResponse(msg) => msg.clone(),
        other => other.to_string(),
    }
}
