//! Common test utilities and helpers for integration tests.
//!
//! - proptest configuration presets
//! - a scripted in-memory [`Backend`]
//! - dashboard wiring around it
#![allow(dead_code)]

use async_trait::async_trait;
use proptest::prelude::*;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tokio::sync::oneshot;

use guardian::assembler::ConfigurationDocument;
use guardian::backend::{Backend, RunNowRequest};
use guardian::catalog::{create_catalog, ContainerSummary, UpdateInfo};
use guardian::dashboard::Dashboard;
use guardian::error::{DashboardError, Result};
use guardian::status::{create_log_panel, Refresher};

/// Standard proptest configuration with 100 iterations.
pub fn proptest_config() -> ProptestConfig {
    ProptestConfig {
        cases: 100,
        ..ProptestConfig::default()
    }
}

pub fn container(name: &str, image: &str) -> ContainerSummary {
    ContainerSummary {
        id: format!("{:x}{}", name.len(), "e3b0c44298fc1c149afbf4c8996fb924"),
        status: "Up 2 hours".to_string(),
        ..ContainerSummary::new(name, image)
    }
}

pub fn container_with_update(name: &str, image: &str, current: &str, latest: &str) -> ContainerSummary {
    ContainerSummary {
        update_info: Some(UpdateInfo {
            has_update: current != latest,
            current_tag: Some(current.to_string()),
            latest_tag: Some(latest.to_string()),
        }),
        ..container(name, image)
    }
}

/// In-memory backend with scripted responses and call recording.
///
/// Fetches answer from the current canned value unless a gate is queued,
/// in which case the fetch waits for the gate's value.
pub struct MockBackend {
    containers: Mutex<Result<Vec<ContainerSummary>>>,
    logs: Mutex<Result<Vec<String>>>,
    save_result: Mutex<Result<()>>,
    run_now_result: Mutex<Result<()>>,
    clear_result: Mutex<Result<()>>,
    container_gates: Mutex<VecDeque<oneshot::Receiver<Result<Vec<ContainerSummary>>>>>,
    log_gates: Mutex<VecDeque<oneshot::Receiver<Result<Vec<String>>>>>,
    saved: Mutex<Vec<ConfigurationDocument>>,
    run_now_calls: Mutex<Vec<Option<RunNowRequest>>>,
    container_fetches: AtomicUsize,
    log_fetches: AtomicUsize,
    clear_calls: AtomicUsize,
}

impl Default for MockBackend {
    fn default() -> Self {
        Self {
            containers: Mutex::new(Ok(Vec::new())),
            logs: Mutex::new(Ok(Vec::new())),
            save_result: Mutex::new(Ok(())),
            run_now_result: Mutex::new(Ok(())),
            clear_result: Mutex::new(Ok(())),
            container_gates: Mutex::new(VecDeque::new()),
            log_gates: Mutex::new(VecDeque::new()),
            saved: Mutex::new(Vec::new()),
            run_now_calls: Mutex::new(Vec::new()),
            container_fetches: AtomicUsize::new(0),
            log_fetches: AtomicUsize::new(0),
            clear_calls: AtomicUsize::new(0),
        }
    }
}

impl MockBackend {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn with_containers(containers: Vec<ContainerSummary>) -> Arc<Self> {
        let mock = Self::default();
        *mock.containers.lock().unwrap() = Ok(containers);
        Arc::new(mock)
    }

    pub fn set_containers(&self, response: Result<Vec<ContainerSummary>>) {
        *self.containers.lock().unwrap() = response;
    }

    pub fn set_logs(&self, response: Result<Vec<String>>) {
        *self.logs.lock().unwrap() = response;
    }

    pub fn set_save_result(&self, result: Result<()>) {
        *self.save_result.lock().unwrap() = result;
    }

    pub fn set_run_now_result(&self, result: Result<()>) {
        *self.run_now_result.lock().unwrap() = result;
    }

    pub fn set_clear_result(&self, result: Result<()>) {
        *self.clear_result.lock().unwrap() = result;
    }

    /// The next catalog fetch waits for the returned sender.
    pub fn gate_containers(&self) -> oneshot::Sender<Result<Vec<ContainerSummary>>> {
        let (tx, rx) = oneshot::channel();
        self.container_gates.lock().unwrap().push_back(rx);
        tx
    }

    /// The next log fetch waits for the returned sender.
    pub fn gate_logs(&self) -> oneshot::Sender<Result<Vec<String>>> {
        let (tx, rx) = oneshot::channel();
        self.log_gates.lock().unwrap().push_back(rx);
        tx
    }

    pub fn saved(&self) -> Vec<ConfigurationDocument> {
        self.saved.lock().unwrap().clone()
    }

    pub fn run_now_calls(&self) -> Vec<Option<RunNowRequest>> {
        self.run_now_calls.lock().unwrap().clone()
    }

    pub fn container_fetches(&self) -> usize {
        self.container_fetches.load(Ordering::SeqCst)
    }

    pub fn log_fetches(&self) -> usize {
        self.log_fetches.load(Ordering::SeqCst)
    }

    pub fn clear_calls(&self) -> usize {
        self.clear_calls.load(Ordering::SeqCst)
    }
}

async fn gated<T>(gate: Option<oneshot::Receiver<Result<T>>>) -> Option<Result<T>> {
    match gate {
        Some(rx) => Some(
            rx.await
                .unwrap_or_else(|_| Err(DashboardError::NetworkFailure("gate dropped".into()))),
        ),
        None => None,
    }
}

#[async_trait]
impl Backend for MockBackend {
    async fn fetch_containers(&self) -> Result<Vec<ContainerSummary>> {
        self.container_fetches.fetch_add(1, Ordering::SeqCst);
        let gate = self.container_gates.lock().unwrap().pop_front();
        match gated(gate).await {
            Some(result) => result,
            None => self.containers.lock().unwrap().clone(),
        }
    }

    async fn save(&self, document: &ConfigurationDocument) -> Result<()> {
        let result = self.save_result.lock().unwrap().clone();
        if result.is_ok() {
            self.saved.lock().unwrap().push(document.clone());
        }
        result
    }

    async fn run_now(&self, request: Option<&RunNowRequest>) -> Result<()> {
        self.run_now_calls.lock().unwrap().push(request.cloned());
        self.run_now_result.lock().unwrap().clone()
    }

    async fn fetch_logs(&self) -> Result<Vec<String>> {
        self.log_fetches.fetch_add(1, Ordering::SeqCst);
        let gate = self.log_gates.lock().unwrap().pop_front();
        match gated(gate).await {
            Some(result) => result,
            None => self.logs.lock().unwrap().clone(),
        }
    }

    async fn clear_logs(&self) -> Result<()> {
        self.clear_calls.fetch_add(1, Ordering::SeqCst);
        self.clear_result.lock().unwrap().clone()
    }
}

pub fn refresher(mock: &Arc<MockBackend>, discard_stale: bool) -> Arc<Refresher> {
    let backend: Arc<dyn Backend> = mock.clone();
    Arc::new(Refresher::new(
        backend,
        create_catalog(6),
        create_log_panel(200),
        discard_stale,
    ))
}

pub fn dashboard(mock: &Arc<MockBackend>) -> Dashboard {
    Dashboard::new(refresher(mock, true))
}

pub fn network_failure(msg: &str) -> DashboardError {
    DashboardError::NetworkFailure(msg.to_string())
}
