//! Backend API seam: container discovery, config persistence, update runs and
//! the update log.

pub mod http;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::assembler::ConfigurationDocument;
use crate::catalog::ContainerSummary;
use crate::error::Result;

pub use http::HttpBackend;

/// Body of `POST /run-now` when a single container should move to a tag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunNowRequest {
    pub name: String,
    pub target_tag: String,
}

/// Everything the dashboard needs from the backend.
#[async_trait]
pub trait Backend: Send + Sync {
    /// `GET /containers`
    async fn fetch_containers(&self) -> Result<Vec<ContainerSummary>>;

    /// `POST /save`
    async fn save(&self, document: &ConfigurationDocument) -> Result<()>;

    /// `POST /run-now`; without a request the backend runs a full update cycle.
    async fn run_now(&self, request: Option<&RunNowRequest>) -> Result<()>;

    /// `GET /status`, the tail of the backend's update log.
    async fn fetch_logs(&self) -> Result<Vec<String>>;

    /// `POST /clear-logs`
    async fn clear_logs(&self) -> Result<()>;
}
