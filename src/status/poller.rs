//! Status poller: periodic catalog and log refresh.

use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use crate::status::refresh::Refresher;

const DEFAULT_LOG_INTERVAL_SECS: u64 = 5;
const DEFAULT_CATALOG_INTERVAL_SECS: u64 = 30;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollIntervals {
    pub logs: Duration,
    pub catalog: Duration,
}

impl Default for PollIntervals {
    fn default() -> Self {
        Self {
            logs: Duration::from_secs(DEFAULT_LOG_INTERVAL_SECS),
            catalog: Duration::from_secs(DEFAULT_CATALOG_INTERVAL_SECS),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Cycle {
    Logs,
    Catalog,
}

impl Cycle {
    fn name(self) -> &'static str {
        match self {
            Cycle::Logs => "logs",
            Cycle::Catalog => "catalog",
        }
    }
}

/// Drives two independent refresh cycles until cancelled.
///
/// Ticks do not wait for the previous fetch: each one spawns its own request.
/// Ordering of overlapping responses is the [`Refresher`]'s concern.
pub struct StatusPoller {
    refresher: Arc<Refresher>,
    intervals: PollIntervals,
    cancel: CancellationToken,
}

impl StatusPoller {
    pub fn new(refresher: Arc<Refresher>, intervals: PollIntervals) -> Self {
        Self {
            refresher,
            intervals,
            cancel: CancellationToken::new(),
        }
    }

    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    /// Spawn both cycles. The first tick of each fires immediately.
    pub fn start(&self) -> Vec<JoinHandle<()>> {
        info!(
            logs_secs = self.intervals.logs.as_secs_f64(),
            catalog_secs = self.intervals.catalog.as_secs_f64(),
            "Status poller started"
        );
        vec![
            tokio::spawn(run_cycle(
                Cycle::Logs,
                self.intervals.logs,
                self.refresher.clone(),
                self.cancel.clone(),
            )),
            tokio::spawn(run_cycle(
                Cycle::Catalog,
                self.intervals.catalog,
                self.refresher.clone(),
                self.cancel.clone(),
            )),
        ]
    }

    pub fn stop(&self) {
        self.cancel.cancel();
    }
}

async fn run_cycle(
    cycle: Cycle,
    period: Duration,
    refresher: Arc<Refresher>,
    cancel: CancellationToken,
) {
    let mut interval = tokio::time::interval(period);
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            _ = cancel.cancelled() => {
                info!(cycle = cycle.name(), "Poll cycle stopped");
                break;
            }
            _ = interval.tick() => {
                let refresher = refresher.clone();
                tokio::spawn(async move {
                    let result = match cycle {
                        Cycle::Logs => refresher.refresh_logs().await,
                        Cycle::Catalog => refresher.refresh_catalog().await,
                    };
                    // The next tick is the retry.
                    if let Err(e) = result {
                        warn!(cycle = cycle.name(), error = %e, "Poll refresh failed");
                    }
                });
            }
        }
    }
}
