//! reqwest implementation of [`Backend`].

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::Value;
use std::time::Duration;
use tracing::debug;
use url::Url;

use super::{Backend, RunNowRequest};
use crate::assembler::ConfigurationDocument;
use crate::catalog::ContainerSummary;
use crate::error::{DashboardError, Result};

#[derive(Debug, Deserialize)]
struct ContainersResponse {
    containers: Option<Vec<ContainerSummary>>,
    error: Option<String>,
}

#[derive(Debug, Deserialize)]
struct StatusResponse {
    logs: Option<Vec<String>>,
}

pub struct HttpBackend {
    client: reqwest::Client,
    base_url: Url,
}

impl HttpBackend {
    pub fn new(base_url: &str, timeout: Duration) -> anyhow::Result<Self> {
        let mut base_url = Url::parse(base_url)?;
        // Url::join drops the last path segment unless it ends with '/'.
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("guardian/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self { client, base_url })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> Result<Url> {
        self.base_url
            .join(path)
            .map_err(|e| DashboardError::NetworkFailure(format!("invalid endpoint {}: {}", path, e)))
    }

    async fn get_json(&self, path: &str) -> Result<Value> {
        let url = self.endpoint(path)?;
        debug!(%url, "GET");
        let resp = self.client.get(url).send().await?;
        read_json(resp).await
    }

    async fn post<B>(&self, path: &str, body: Option<&B>) -> Result<()>
    where
        B: serde::Serialize + Sync + ?Sized,
    {
        let url = self.endpoint(path)?;
        debug!(%url, "POST");
        let mut req = self.client.post(url);
        req = match body {
            Some(body) => req.json(body),
            None => req.header(reqwest::header::CONTENT_TYPE, "application/json"),
        };
        let resp = req.send().await?;
        check_status(resp).await.map(|_| ())
    }
}

#[async_trait]
impl Backend for HttpBackend {
    async fn fetch_containers(&self) -> Result<Vec<ContainerSummary>> {
        let body = self.get_json("containers").await?;
        parse_containers(body)
    }

    async fn save(&self, document: &ConfigurationDocument) -> Result<()> {
        self.post("save", Some(document)).await
    }

    async fn run_now(&self, request: Option<&RunNowRequest>) -> Result<()> {
        self.post("run-now", request).await
    }

    async fn fetch_logs(&self) -> Result<Vec<String>> {
        let body = self.get_json("status").await?;
        parse_logs(body)
    }

    async fn clear_logs(&self) -> Result<()> {
        self.post::<Value>("clear-logs", None).await
    }
}

async fn check_status(resp: reqwest::Response) -> Result<reqwest::Response> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }
    let text = resp.text().await.unwrap_or_default();
    let reason = error_message(&text).unwrap_or_else(|| status.to_string());
    Err(DashboardError::NetworkFailure(reason))
}

async fn read_json(resp: reqwest::Response) -> Result<Value> {
    let resp = check_status(resp).await?;
    let text = resp.text().await?;
    Ok(serde_json::from_str(&text)?)
}

/// The backend reports failures as `{"message": ...}` or `{"error": ...}`.
fn error_message(body: &str) -> Option<String> {
    let value: Value = serde_json::from_str(body).ok()?;
    value
        .get("message")
        .or_else(|| value.get("error"))
        .and_then(Value::as_str)
        .map(str::to_string)
}

pub(crate) fn parse_containers(body: Value) -> Result<Vec<ContainerSummary>> {
    let resp: ContainersResponse = serde_json::from_value(body)?;
    match (resp.containers, resp.error) {
        (Some(containers), _) => Ok(containers),
        (None, Some(error)) => Err(DashboardError::NetworkFailure(error)),
        (None, None) => Err(DashboardError::MalformedResponse(
            "expected `containers` or `error`".to_string(),
        )),
    }
}

pub(crate) fn parse_logs(body: Value) -> Result<Vec<String>> {
    let resp: StatusResponse = serde_json::from_value(body)?;
    let logs = resp
        .logs
        .ok_or_else(|| DashboardError::MalformedResponse("expected `logs`".to_string()))?;
    Ok(logs
        .into_iter()
        .map(|line| line.trim_end_matches(['\r', '\n']).to_string())
        .collect())
}
