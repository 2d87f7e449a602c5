//! Monitored containers and their per-container override flags.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::catalog::CatalogStore;
use crate::error::{DashboardError, Result};

/// A container the operator opted into monitoring.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonitoredContainer {
    pub name: String,
    #[serde(default)]
    pub image: String,
    /// Empty means no health check after an update.
    #[serde(default)]
    pub health_check_url: String,
    #[serde(default = "default_true")]
    pub auto_update: bool,
    #[serde(default = "default_true")]
    pub rollback_on_failure: bool,
    #[serde(default = "default_true")]
    pub enabled: bool,
}

fn default_true() -> bool {
    true
}

impl MonitoredContainer {
    pub fn new(name: impl Into<String>, image: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            image: image.into(),
            health_check_url: String::new(),
            auto_update: true,
            rollback_on_failure: true,
            enabled: true,
        }
    }

    /// Whether the backend's update cycle will touch this container.
    pub fn will_auto_update(&self) -> bool {
        self.enabled && self.auto_update
    }
}

/// Boolean override that can be toggled per monitored container.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContainerFlag {
    AutoUpdate,
    RollbackOnFailure,
    Enabled,
}

impl FromStr for ContainerFlag {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim() {
            "autoUpdate" | "auto_update" | "auto-update" => Ok(ContainerFlag::AutoUpdate),
            "rollbackOnFailure" | "rollback_on_failure" | "rollback-on-failure" | "rollback" => {
                Ok(ContainerFlag::RollbackOnFailure)
            }
            "enabled" => Ok(ContainerFlag::Enabled),
            other => Err(format!("Unknown container flag: {}", other)),
        }
    }
}

impl fmt::Display for ContainerFlag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ContainerFlag::AutoUpdate => "auto_update",
            ContainerFlag::RollbackOnFailure => "rollback_on_failure",
            ContainerFlag::Enabled => "enabled",
        };
        f.write_str(name)
    }
}

/// Insertion-ordered set of monitored containers keyed by name.
///
/// Independent of the catalog: a refresh that drops a container leaves its
/// selection entry alone.
#[derive(Debug, Clone, Default)]
pub struct SelectionState {
    entries: Vec<MonitoredContainer>,
}

impl SelectionState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild from a stored document's container list. Later duplicates of a
    /// name are dropped.
    pub fn from_containers(containers: impl IntoIterator<Item = MonitoredContainer>) -> Self {
        let mut state = Self::new();
        for container in containers {
            if !state.contains(&container.name) {
                state.entries.push(container);
            }
        }
        state
    }

    /// Start monitoring `name` with default flags.
    pub fn add(&mut self, name: &str, image: &str) -> Result<&MonitoredContainer> {
        if self.contains(name) {
            return Err(DashboardError::AlreadyMonitored(name.to_string()));
        }
        self.entries.push(MonitoredContainer::new(name, image));
        Ok(&self.entries[self.entries.len() - 1])
    }

    /// Like [`add`](Self::add) but the name must exist in the catalog, which
    /// also supplies the image.
    pub fn add_from_catalog(
        &mut self,
        name: &str,
        catalog: &CatalogStore,
    ) -> Result<&MonitoredContainer> {
        if self.contains(name) {
            return Err(DashboardError::AlreadyMonitored(name.to_string()));
        }
        let image = catalog
            .get(name)
            .map(|c| c.image.clone())
            .ok_or_else(|| DashboardError::NotFound(name.to_string()))?;
        self.add(name, &image)
    }

    /// Returns whether anything was removed.
    pub fn remove(&mut self, name: &str) -> bool {
        let before = self.entries.len();
        self.entries.retain(|c| c.name != name);
        self.entries.len() < before
    }

    pub fn set_flag(&mut self, name: &str, flag: ContainerFlag, value: bool) -> Result<()> {
        let entry = self.get_mut(name)?;
        match flag {
            ContainerFlag::AutoUpdate => entry.auto_update = value,
            ContainerFlag::RollbackOnFailure => entry.rollback_on_failure = value,
            ContainerFlag::Enabled => entry.enabled = value,
        }
        Ok(())
    }

    pub fn set_health_check_url(&mut self, name: &str, url: &str) -> Result<()> {
        self.get_mut(name)?.health_check_url = url.trim().to_string();
        Ok(())
    }

    pub fn snapshot(&self) -> Vec<MonitoredContainer> {
        self.entries.clone()
    }

    pub fn get(&self, name: &str) -> Option<&MonitoredContainer> {
        self.entries.iter().find(|c| c.name == name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = &MonitoredContainer> {
        self.entries.iter()
    }

    /// Monitored names the current catalog no longer lists (stopped or removed).
    pub fn missing_from<'a>(&'a self, catalog: &CatalogStore) -> Vec<&'a str> {
        self.entries
            .iter()
            .filter(|c| catalog.get(&c.name).is_none())
            .map(|c| c.name.as_str())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn get_mut(&mut self, name: &str) -> Result<&mut MonitoredContainer> {
        self.entries
            .iter_mut()
            .find(|c| c.name == name)
            .ok_or_else(|| DashboardError::NotFound(name.to_string()))
    }
}
