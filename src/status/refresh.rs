//! One-shot catalog and log refreshes shared by the poller and explicit
//! operator actions.

use chrono::{DateTime, Utc};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::debug;

use crate::backend::Backend;
use crate::catalog::SharedCatalog;
use crate::error::Result;
use crate::status::log_panel::SharedLogPanel;

/// Monotonic request numbering for one refresh cycle.
#[derive(Debug, Default)]
pub struct SequenceGate {
    issued: AtomicU64,
    applied: AtomicU64,
}

impl SequenceGate {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number for a new request, starting at 1.
    pub fn issue(&self) -> u64 {
        self.issued.fetch_add(1, Ordering::SeqCst) + 1
    }

    /// Records `seq` as applied if it is newer than anything applied so far.
    pub fn try_apply(&self, seq: u64) -> bool {
        self.applied
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |last| {
                (seq > last).then_some(seq)
            })
            .is_ok()
    }

    pub fn last_applied(&self) -> u64 {
        self.applied.load(Ordering::SeqCst)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshOutcome {
    Applied,
    /// A newer response was already applied; this one was dropped.
    Stale,
}

pub struct Refresher {
    backend: Arc<dyn Backend>,
    catalog: SharedCatalog,
    logs: SharedLogPanel,
    catalog_gate: SequenceGate,
    log_gate: SequenceGate,
    discard_stale: bool,
    last_catalog_update: RwLock<Option<DateTime<Utc>>>,
}

impl Refresher {
    pub fn new(
        backend: Arc<dyn Backend>,
        catalog: SharedCatalog,
        logs: SharedLogPanel,
        discard_stale: bool,
    ) -> Self {
        Self {
            backend,
            catalog,
            logs,
            catalog_gate: SequenceGate::new(),
            log_gate: SequenceGate::new(),
            discard_stale,
            last_catalog_update: RwLock::new(None),
        }
    }

    pub fn backend(&self) -> &Arc<dyn Backend> {
        &self.backend
    }

    pub fn catalog(&self) -> &SharedCatalog {
        &self.catalog
    }

    pub fn logs(&self) -> &SharedLogPanel {
        &self.logs
    }

    /// Fetch the catalog and swap it in. On error nothing changes.
    pub async fn refresh_catalog(&self) -> Result<RefreshOutcome> {
        let seq = self.catalog_gate.issue();
        let containers = self.backend.fetch_containers().await?;

        let mut catalog = self.catalog.write().await;
        if !self.catalog_gate.try_apply(seq) && self.discard_stale {
            debug!(seq, last = self.catalog_gate.last_applied(), "Dropping stale catalog response");
            return Ok(RefreshOutcome::Stale);
        }
        let count = containers.len();
        catalog.replace(containers);
        drop(catalog);

        *self.last_catalog_update.write().await = Some(Utc::now());
        debug!(seq, count, "Catalog refreshed");
        Ok(RefreshOutcome::Applied)
    }

    /// Fetch the log tail and swap it into the panel. On error nothing changes.
    pub async fn refresh_logs(&self) -> Result<RefreshOutcome> {
        let seq = self.log_gate.issue();
        let lines = self.backend.fetch_logs().await?;

        let mut panel = self.logs.write().await;
        if !self.log_gate.try_apply(seq) && self.discard_stale {
            debug!(seq, last = self.log_gate.last_applied(), "Dropping stale log response");
            return Ok(RefreshOutcome::Stale);
        }
        let count = lines.len();
        panel.replace(lines);
        debug!(seq, count, "Log panel refreshed");
        Ok(RefreshOutcome::Applied)
    }

    /// Swap the panel for the cleared notice. Log fetches issued before the
    /// clear come back [`RefreshOutcome::Stale`].
    pub async fn clear_log_panel(&self) {
        let seq = self.log_gate.issue();
        let mut panel = self.logs.write().await;
        self.log_gate.try_apply(seq);
        panel.clear_with_notice();
        debug!(seq, "Log panel cleared");
    }

    /// When the catalog was last replaced.
    pub async fn last_catalog_update(&self) -> Option<DateTime<Utc>> {
        *self.last_catalog_update.read().await
    }
}
