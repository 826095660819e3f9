//! View-model for one recommendation list.
//!
//! Wires the debounced search box, the filter store, the paged query engine
//! and the scroll sensor together. Any change to the debounced search text
//! or the selected tags re-keys the query, dropping the previous
//! subscription and loading the new key from its first page.

use crate::application::debounce::Debounced;
use crate::application::filter_state::FilterStore;
use crate::application::paged_query::{PagedQuery, QueryEngine};
use crate::application::query_cache::{QueryResult, QueryStatus};
use crate::application::scroll_sensor::{should_load_more, ScrollSensor, Viewport};
use crate::domain::entities::recommendation::RecommendationRecord;
use crate::domain::error::DomainError;
use crate::domain::values::filter_category::FilterCategory;
use crate::domain::values::query_key::QueryKey;
use crate::domain::values::resource_kind::ResourceKind;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct BrowserOptions {
    pub search_delay: Duration,
    pub trailing_margin_px: f64,
}

impl Default for BrowserOptions {
    fn default() -> Self {
        Self {
            search_delay: crate::application::debounce::DEFAULT_SEARCH_DELAY,
            trailing_margin_px: crate::application::scroll_sensor::DEFAULT_TRAILING_MARGIN_PX,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ListView {
    Loading,
    Failed(String),
    /// The query succeeded with no records.
    Empty(ResourceKind),
    Items(ListItems),
}

#[derive(Debug, Clone, PartialEq)]
pub struct ListItems {
    pub records: Vec<RecommendationRecord>,
    pub loaded: u64,
    pub total: u64,
    pub fetching_more: bool,
    pub has_more: bool,
}

pub struct RecommendationBrowser {
    kind: ResourceKind,
    engine: QueryEngine,
    filters: FilterStore,
    search: Debounced<String>,
    sensor: ScrollSensor,
    query: Option<PagedQuery>,
    rekeys: usize,
}

impl RecommendationBrowser {
    /// Must be called from within a tokio runtime.
    pub fn new(kind: ResourceKind, engine: QueryEngine, options: BrowserOptions) -> Self {
        Self {
            kind,
            engine,
            filters: FilterStore::new(),
            search: Debounced::new(String::new(), options.search_delay),
            sensor: ScrollSensor::new(options.trailing_margin_px),
            query: None,
            rekeys: 0,
        }
    }

    pub fn kind(&self) -> ResourceKind {
        self.kind
    }

    pub fn filters(&self) -> &FilterStore {
        &self.filters
    }

    /// Number of times the active query key has changed.
    pub fn rekey_count(&self) -> usize {
        self.rekeys
    }

    /// The key implied by the settled search text and current selections.
    pub fn desired_key(&self) -> QueryKey {
        QueryKey::new(self.kind, self.search.value(), self.filters.selected_tags())
    }

    pub fn active_key(&self) -> Option<&QueryKey> {
        self.query.as_ref().map(PagedQuery::key)
    }

    pub fn result(&self) -> Option<QueryResult> {
        self.query.as_ref().map(PagedQuery::result)
    }

    /// Loads the first page for the current criteria.
    pub async fn open(&mut self) -> Result<(), DomainError> {
        self.rekey().await
    }

    /// Feeds raw search input. Takes effect after the debounce delay and a
    /// call to [`sync_search`](Self::sync_search).
    pub fn type_search(&self, text: &str) {
        self.search.set(text.to_string());
    }

    /// Re-keys if the settled search text differs from the active key.
    /// Returns whether a re-key happened.
    pub async fn sync_search(&mut self) -> Result<bool, DomainError> {
        if self.active_key() == Some(&self.desired_key()) {
            return Ok(false);
        }
        self.rekey().await?;
        Ok(true)
    }

    /// Flips one tag and re-keys. Returns whether the tag is now selected.
    pub async fn toggle_filter(&mut self, category: FilterCategory, tag: &str) -> Result<bool, DomainError> {
        let selected = self.filters.toggle(category, tag);
        self.rekey().await?;
        Ok(selected)
    }

    pub async fn set_category_filters(
        &mut self,
        category: FilterCategory,
        tags: Vec<String>,
    ) -> Result<(), DomainError> {
        self.filters.update_selected_filters(category, tags);
        self.rekey().await
    }

    /// Clears every selection and refreshes both lists. The list's own key
    /// is released before invalidating so it is fetched only once.
    pub async fn clear_filters(&mut self) -> Result<(), DomainError> {
        self.filters.clear_filters();
        let key = self.desired_key();
        if self.active_key() != Some(&key) {
            self.rekeys += 1;
        }
        self.query = None;
        self.engine
            .invalidate(|k| ResourceKind::ALL.contains(&k.kind))
            .await;
        self.load(key).await
    }

    pub async fn on_scroll(&mut self, viewport: Viewport) -> Result<bool, DomainError> {
        let visible = self.sensor.on_viewport(viewport);
        self.load_more_if(visible).await
    }

    /// Re-arms the sensor after the sentinel moved.
    pub async fn on_layout(&mut self, sentinel_top: f64, sentinel_height: f64) -> Result<bool, DomainError> {
        let visible = self.sensor.observe(sentinel_top, sentinel_height);
        self.load_more_if(visible).await
    }

    pub async fn retry(&mut self) -> Result<bool, DomainError> {
        let Some(query) = &self.query else {
            return Ok(false);
        };
        let reloaded = query.retry().await?;
        self.sync_available_tags();
        Ok(reloaded)
    }

    pub fn view(&self) -> ListView {
        let Some(result) = self.result() else {
            return ListView::Loading;
        };
        match &result.status {
            QueryStatus::Idle | QueryStatus::Loading => ListView::Loading,
            QueryStatus::Error(error) if result.pages.is_empty() => ListView::Failed(error.user_message()),
            _ if result.is_empty() => ListView::Empty(self.kind),
            _ => ListView::Items(ListItems {
                records: result.records().cloned().collect(),
                loaded: result.loaded_count(),
                total: result.total_items(),
                fetching_more: result.is_fetching_more(),
                has_more: result.has_more(),
            }),
        }
    }

    async fn load_more_if(&mut self, visible: bool) -> Result<bool, DomainError> {
        let Some(query) = &self.query else {
            return Ok(false);
        };
        if !should_load_more(visible, &query.result()) {
            return Ok(false);
        }
        query.fetch_next_page().await
    }

    async fn rekey(&mut self) -> Result<(), DomainError> {
        let key = self.desired_key();
        if self.active_key() == Some(&key) {
            return Ok(());
        }
        self.rekeys += 1;
        self.load(key).await
    }

    async fn load(&mut self, key: QueryKey) -> Result<(), DomainError> {
        // Release the old key before subscribing so returning to it later
        // starts from scratch.
        self.query = None;
        self.sensor.unobserve();
        tracing::debug!(%key, "loading list query");

        let query = self.engine.subscribe(key);
        let loaded = query.ensure_loaded().await;
        self.query = Some(query);
        self.sync_available_tags();
        loaded
    }

    fn sync_available_tags(&mut self) {
        let tags = self.result().and_then(|r| r.available_tags().cloned());
        if let Some(tags) = tags {
            if tags != self.filters.state().available_tags {
                self.filters.set_available_tags(tags);
            }
        }
    }
}
