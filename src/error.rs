// Error types for the dashboard core

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised by dashboard state transitions and backend calls.
///
/// None of these are fatal: callers turn them into a [`Notification`] and
/// keep going with unchanged state.
///
/// [`Notification`]: crate::dashboard::Notification
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DashboardError {
    #[error("Container already monitored: {0}")]
    AlreadyMonitored(String),

    #[error("Container not found: {0}")]
    NotFound(String),

    #[error("Network failure: {0}")]
    NetworkFailure(String),

    #[error("Malformed response: {0}")]
    MalformedResponse(String),
}

impl DashboardError {
    /// Stable machine-readable code, mirrors the variant name.
    pub fn code(&self) -> &'static str {
        match self {
            DashboardError::AlreadyMonitored(_) => "ALREADY_MONITORED",
            DashboardError::NotFound(_) => "NOT_FOUND",
            DashboardError::NetworkFailure(_) => "NETWORK_FAILURE",
            DashboardError::MalformedResponse(_) => "MALFORMED_RESPONSE",
        }
    }

    /// How loudly the UI should surface this error.
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            DashboardError::AlreadyMonitored(_) => ErrorSeverity::Warning,
            DashboardError::NotFound(_)
            | DashboardError::NetworkFailure(_)
            | DashboardError::MalformedResponse(_) => ErrorSeverity::Error,
        }
    }
}

impl From<reqwest::Error> for DashboardError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            DashboardError::MalformedResponse(err.to_string())
        } else {
            DashboardError::NetworkFailure(err.to_string())
        }
    }
}

impl From<serde_json::Error> for DashboardError {
    fn from(err: serde_json::Error) -> Self {
        DashboardError::MalformedResponse(err.to_string())
    }
}

/// Error severity levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ErrorSeverity {
    Warning,
    Error,
}

pub type Result<T> = std::result::Result<T, DashboardError>;
