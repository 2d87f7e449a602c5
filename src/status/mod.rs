pub mod log_panel;
pub mod poller;
pub mod refresh;

pub use log_panel::{create_log_panel, LogLevel, LogLine, LogPanel, SharedLogPanel};
pub use poller::{PollIntervals, StatusPoller};
pub use refresh::{RefreshOutcome, Refresher, SequenceGate};
