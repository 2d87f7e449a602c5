//! Watch command - run the status poller and stream new log lines.

use anyhow::Result;
use tokio::sync::broadcast::error::RecvError;
use tracing::{info, warn};

use super::helpers::{build_refresher, print_log_line};
use crate::config::Config;
use crate::status::{LogLine, StatusPoller};

pub async fn cmd_watch(cfg: &Config) -> Result<()> {
    let refresher = build_refresher(cfg)?;
    let mut updates = refresher.logs().read().await.subscribe();

    let poller = StatusPoller::new(refresher.clone(), cfg.poll.intervals());
    let handles = poller.start();
    println!("Watching {} (Ctrl+C to stop)", cfg.backend.url);

    let mut shown: Vec<LogLine> = Vec::new();
    let mut known_containers = 0usize;
    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {
                info!("Interrupted, stopping poller");
                break;
            }
            received = updates.recv() => match received {
                Ok(lines) => {
                    for line in unseen(&shown, &lines) {
                        print_log_line(line);
                    }
                    shown = lines;

                    let count = refresher.catalog().read().await.len();
                    if count != known_containers {
                        println!("· {} container(s) discovered", count);
                        known_containers = count;
                    }
                }
                Err(RecvError::Lagged(skipped)) => {
                    warn!(skipped, "Log updates lagged");
                }
                Err(RecvError::Closed) => break,
            },
        }
    }

    poller.stop();
    for handle in handles {
        let _ = handle.await;
    }
    Ok(())
}

/// Lines of `current` not already shown.
///
/// The backend returns a sliding tail, so the previous view is matched as the
/// longest suffix of `previous` that prefixes `current`.
fn unseen<'a>(previous: &[LogLine], current: &'a [LogLine]) -> &'a [LogLine] {
    let max_overlap = previous.len().min(current.len());
    for overlap in (1..=max_overlap).rev() {
        if previous[previous.len() - overlap..] == current[..overlap] {
            return &current[overlap..];
        }
    }
    current
}
