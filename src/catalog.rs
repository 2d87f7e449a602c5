//! Container catalog: the last list of containers discovered by the backend,
//! with search and pagination.

use serde::{Deserialize, Deserializer, Serialize};
use std::sync::Arc;
use tokio::sync::RwLock;

pub const DEFAULT_PAGE_SIZE: usize = 6;

/// Image update status reported by the backend for one container.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct UpdateInfo {
    #[serde(default)]
    pub has_update: bool,
    #[serde(default)]
    pub current_tag: Option<String>,
    #[serde(default)]
    pub latest_tag: Option<String>,
}

/// A container as listed by `GET /containers`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContainerSummary {
    pub name: String,
    #[serde(default)]
    pub image: String,
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub created: String,
    #[serde(default)]
    pub ports: Vec<String>,
    #[serde(
        default,
        deserialize_with = "deserialize_update_info",
        skip_serializing_if = "Option::is_none"
    )]
    pub update_info: Option<UpdateInfo>,
}

/// Some backends wrap the update status once more: `{"update_info": {...}}`.
#[derive(Deserialize)]
#[serde(untagged)]
enum UpdateInfoWire {
    Nested { update_info: UpdateInfo },
    Flat(UpdateInfo),
}

fn deserialize_update_info<'de, D>(deserializer: D) -> Result<Option<UpdateInfo>, D::Error>
where
    D: Deserializer<'de>,
{
    let wire = Option::<UpdateInfoWire>::deserialize(deserializer)?;
    Ok(match wire {
        Some(UpdateInfoWire::Nested { update_info }) => Some(update_info),
        Some(UpdateInfoWire::Flat(info)) => Some(info),
        None => None,
    })
}

impl ContainerSummary {
    pub fn new(name: impl Into<String>, image: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            image: image.into(),
            id: String::new(),
            status: String::new(),
            created: String::new(),
            ports: Vec::new(),
            update_info: None,
        }
    }

    pub fn short_id(&self) -> &str {
        match self.id.char_indices().nth(12) {
            Some((idx, _)) => &self.id[..idx],
            None => &self.id,
        }
    }

    /// Docker reports running containers as "Up 3 hours" etc.
    pub fn is_running(&self) -> bool {
        self.status.contains("Up")
    }

    pub fn has_update(&self) -> bool {
        self.update_info.as_ref().is_some_and(|u| u.has_update)
    }

    fn matches(&self, needle: &str) -> bool {
        self.name.to_lowercase().contains(needle)
            || self.image.to_lowercase().contains(needle)
            || self.id.to_lowercase().contains(needle)
    }
}

/// Pagination controls to render; absent when there is nothing to page through.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PageInfo {
    pub page: usize,
    pub total_pages: usize,
    pub has_prev: bool,
    pub has_next: bool,
}

/// Catalog plus the operator's search/page position.
#[derive(Debug, Clone)]
pub struct CatalogStore {
    containers: Vec<ContainerSummary>,
    query: String,
    page: usize,
    page_size: usize,
    /// Indices into `containers` matching `query`, in catalog order.
    filtered: Vec<usize>,
}

impl Default for CatalogStore {
    fn default() -> Self {
        Self::new(DEFAULT_PAGE_SIZE)
    }
}

impl CatalogStore {
    pub fn new(page_size: usize) -> Self {
        Self {
            containers: Vec::new(),
            query: String::new(),
            page: 1,
            page_size: page_size.max(1),
            filtered: Vec::new(),
        }
    }

    /// Swap in a freshly fetched catalog. Query and page survive; the page is
    /// pulled back into range if the result got shorter.
    pub fn replace(&mut self, containers: Vec<ContainerSummary>) {
        self.containers = containers;
        self.refilter();
        self.page = self.page.clamp(1, self.total_pages().max(1));
    }

    pub fn set_query(&mut self, query: &str) {
        self.query = query.trim().to_string();
        self.refilter();
        self.page = 1;
    }

    pub fn next_page(&mut self) {
        if self.page < self.total_pages() {
            self.page += 1;
        }
    }

    pub fn prev_page(&mut self) {
        if self.page > 1 {
            self.page -= 1;
        }
    }

    pub fn current_page_items(&self) -> Vec<&ContainerSummary> {
        self.filtered
            .iter()
            .skip((self.page - 1) * self.page_size)
            .take(self.page_size)
            .map(|&idx| &self.containers[idx])
            .collect()
    }

    pub fn total_pages(&self) -> usize {
        self.filtered.len().div_ceil(self.page_size)
    }

    pub fn pagination(&self) -> Option<PageInfo> {
        let total_pages = self.total_pages();
        if total_pages == 0 {
            return None;
        }
        Some(PageInfo {
            page: self.page,
            total_pages,
            has_prev: self.page > 1,
            has_next: self.page < total_pages,
        })
    }

    pub fn filtered(&self) -> impl Iterator<Item = &ContainerSummary> {
        self.filtered.iter().map(|&idx| &self.containers[idx])
    }

    pub fn filtered_len(&self) -> usize {
        self.filtered.len()
    }

    pub fn get(&self, name: &str) -> Option<&ContainerSummary> {
        self.containers.iter().find(|c| c.name == name)
    }

    pub fn all(&self) -> &[ContainerSummary] {
        &self.containers
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn page(&self) -> usize {
        self.page
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    pub fn len(&self) -> usize {
        self.containers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.containers.is_empty()
    }

    fn refilter(&mut self) {
        let needle = self.query.to_lowercase();
        self.filtered = self
            .containers
            .iter()
            .enumerate()
            .filter(|(_, c)| needle.is_empty() || c.matches(&needle))
            .map(|(idx, _)| idx)
            .collect();
    }
}

/// Catalog shared between the dashboard and the status poller.
pub type SharedCatalog = Arc<RwLock<CatalogStore>>;

pub fn create_catalog(page_size: usize) -> SharedCatalog {
    Arc::new(RwLock::new(CatalogStore::new(page_size)))
}
