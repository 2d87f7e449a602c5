use serde::Serialize;
use std::collections::VecDeque;
use std::fmt;
use std::sync::Arc;
use tokio::sync::{broadcast, RwLock};

pub const DEFAULT_CAPACITY: usize = 200;
pub const CLEARED_NOTICE: &str = "Logs cleared successfully";

/// Display class of a backend log line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Info,
    Success,
    Warning,
    Error,
}

impl LogLevel {
    /// Classify a raw line by the markers the backend logger writes.
    pub fn classify(line: &str) -> Self {
        if line.contains("ERROR") {
            LogLevel::Error
        } else if line.contains("WARNING") {
            LogLevel::Warning
        } else if line.contains("SUCCESS") {
            LogLevel::Success
        } else {
            LogLevel::Info
        }
    }

    pub fn parse(level: &str) -> Option<Self> {
        match level.trim().to_lowercase().as_str() {
            "info" => Some(LogLevel::Info),
            "success" => Some(LogLevel::Success),
            "warn" | "warning" => Some(LogLevel::Warning),
            "error" => Some(LogLevel::Error),
            _ => None,
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            LogLevel::Info => "info",
            LogLevel::Success => "success",
            LogLevel::Warning => "warning",
            LogLevel::Error => "error",
        };
        f.write_str(name)
    }
}

/// A log line held by the panel
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LogLine {
    pub level: LogLevel,
    pub text: String,
}

impl LogLine {
    pub fn new(text: impl Into<String>) -> Self {
        let text = text.into();
        Self {
            level: LogLevel::classify(&text),
            text,
        }
    }
}

/// Last fetched tail of the backend update log.
///
/// Every status fetch returns the whole tail, so content is swapped wholesale
/// rather than appended.
pub struct LogPanel {
    lines: VecDeque<LogLine>,
    capacity: usize,
    broadcast_tx: broadcast::Sender<Vec<LogLine>>,
}

impl LogPanel {
    pub fn new(capacity: usize) -> Self {
        let (broadcast_tx, _) = broadcast::channel(16);
        let capacity = capacity.max(1);
        Self {
            lines: VecDeque::with_capacity(capacity),
            capacity,
            broadcast_tx,
        }
    }

    /// Replace the panel content. Only the newest `capacity` lines are kept.
    pub fn replace(&mut self, raw: Vec<String>) {
        let skip = raw.len().saturating_sub(self.capacity);
        self.lines = raw.into_iter().skip(skip).map(LogLine::new).collect();
        self.publish();
    }

    /// Empty the panel, leaving a single notice line.
    pub fn clear_with_notice(&mut self) {
        self.lines.clear();
        self.lines.push_back(LogLine {
            level: LogLevel::Info,
            text: CLEARED_NOTICE.to_string(),
        });
        self.publish();
    }

    /// Subscribe to panel replacements
    pub fn subscribe(&self) -> broadcast::Receiver<Vec<LogLine>> {
        self.broadcast_tx.subscribe()
    }

    /// Lines in backend order (oldest first)
    pub fn lines(&self) -> Vec<LogLine> {
        self.lines.iter().cloned().collect()
    }

    /// Lines at or above `min_level` containing `keyword` (case-insensitive).
    pub fn get_filtered(&self, min_level: Option<LogLevel>, keyword: Option<&str>) -> Vec<LogLine> {
        let keyword = keyword.map(str::to_lowercase);
        self.lines
            .iter()
            .filter(|line| min_level.map_or(true, |min| line.level >= min))
            .filter(|line| {
                keyword
                    .as_deref()
                    .map_or(true, |kw| line.text.to_lowercase().contains(kw))
            })
            .cloned()
            .collect()
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    fn publish(&self) {
        // No subscribers is fine
        let _ = self.broadcast_tx.send(self.lines());
    }
}

/// Thread-safe wrapper for LogPanel
pub type SharedLogPanel = Arc<RwLock<LogPanel>>;

pub fn create_log_panel(capacity: usize) -> SharedLogPanel {
    Arc::new(RwLock::new(LogPanel::new(capacity)))
}
