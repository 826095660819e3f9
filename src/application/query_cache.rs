//! Shared cache of paginated query results.
//!
//! Each [`QueryKey`] owns one slot holding a `watch` channel of
//! [`QueryResult`]. Every subscriber of a key reads the same channel, so a
//! state change made for one of them is broadcast to all. Slots carry a
//! generation number: invalidation and fresh subscriptions bump it, and
//! fetch completions captured under an older generation are dropped.

use crate::domain::entities::page::Page;
use crate::domain::entities::recommendation::RecommendationRecord;
use crate::domain::error::DomainError;
use crate::domain::values::filter_category::TagLists;
use crate::domain::values::query_key::QueryKey;
use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;
use tokio::sync::watch;
use tokio::time::Instant;

pub const DEFAULT_PAGE_SIZE: usize = 10;
pub const DEFAULT_CACHE_TTL: Duration = Duration::from_secs(300);

/// Per-key state machine:
/// `Idle -> Loading -> Ready <-> LoadingMore -> Ready`, with `Error`
/// reachable from either loading state.
#[derive(Debug, Clone, PartialEq)]
pub enum QueryStatus {
    Idle,
    Loading,
    Ready,
    LoadingMore,
    Error(DomainError),
}

#[derive(Debug, Clone, PartialEq)]
pub struct QueryResult {
    pub key: QueryKey,
    /// Oldest first. Only ever appended to while the key is live.
    pub pages: Vec<Page>,
    pub status: QueryStatus,
    pub page_size: usize,
    pub(crate) generation: u64,
}

impl QueryResult {
    fn fresh(key: QueryKey, page_size: usize, generation: u64) -> Self {
        Self {
            key,
            pages: Vec::new(),
            status: QueryStatus::Idle,
            page_size,
            generation,
        }
    }

    pub(crate) fn reset(&mut self) {
        self.pages.clear();
        self.status = QueryStatus::Idle;
        self.generation += 1;
    }

    pub fn is_loading(&self) -> bool {
        self.status == QueryStatus::Loading
    }

    pub fn is_fetching_more(&self) -> bool {
        self.status == QueryStatus::LoadingMore
    }

    /// A request is in flight for this key.
    pub fn is_fetching(&self) -> bool {
        self.is_loading() || self.is_fetching_more()
    }

    pub fn has_more(&self) -> bool {
        self.last_cursor().is_some()
    }

    pub fn last_cursor(&self) -> Option<&str> {
        self.pages.last().and_then(Page::next_cursor)
    }

    pub fn error(&self) -> Option<&DomainError> {
        match &self.status {
            QueryStatus::Error(e) => Some(e),
            _ => None,
        }
    }

    pub fn records(&self) -> impl Iterator<Item = &RecommendationRecord> {
        self.pages.iter().flat_map(|p| p.items().iter())
    }

    pub fn total_items(&self) -> u64 {
        self.pages.first().map(Page::total_items).unwrap_or(0)
    }

    /// Number shown as "N of M": whole pages loaded, capped at the total.
    pub fn loaded_count(&self) -> u64 {
        ((self.pages.len() * self.page_size) as u64).min(self.total_items())
    }

    pub fn available_tags(&self) -> Option<&TagLists> {
        self.pages.first().map(|p| &p.available_tags)
    }

    /// The first page arrived and carried no records.
    pub fn is_empty(&self) -> bool {
        self.pages.first().is_some_and(|p| p.items().is_empty())
    }
}

struct Slot {
    tx: watch::Sender<QueryResult>,
    idle_since: Option<Instant>,
}

pub struct QueryCache {
    slots: Mutex<HashMap<QueryKey, Slot>>,
    page_size: usize,
    ttl: Duration,
}

impl Default for QueryCache {
    fn default() -> Self {
        Self::new(DEFAULT_PAGE_SIZE, DEFAULT_CACHE_TTL)
    }
}

impl QueryCache {
    pub fn new(page_size: usize, ttl: Duration) -> Self {
        Self {
            slots: Mutex::new(HashMap::new()),
            page_size,
            ttl,
        }
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    fn slots(&self) -> std::sync::MutexGuard<'_, HashMap<QueryKey, Slot>> {
        self.slots.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Registers a subscriber. A key with no live subscribers starts over
    /// from an empty, idle state.
    pub(crate) fn subscribe(&self, key: &QueryKey) -> watch::Receiver<QueryResult> {
        let mut slots = self.slots();
        match slots.get_mut(key) {
            Some(slot) => {
                if slot.tx.receiver_count() == 0 {
                    slot.tx.send_modify(QueryResult::reset);
                }
                slot.idle_since = None;
                slot.tx.subscribe()
            }
            None => {
                let (tx, rx) = watch::channel(QueryResult::fresh(key.clone(), self.page_size, 0));
                slots.insert(
                    key.clone(),
                    Slot {
                        tx,
                        idle_since: None,
                    },
                );
                rx
            }
        }
    }

    /// Called by a subscriber that is about to drop its receiver.
    pub(crate) fn release(&self, key: &QueryKey) {
        if let Some(slot) = self.slots().get_mut(key) {
            if slot.tx.receiver_count() <= 1 {
                slot.idle_since = Some(Instant::now());
            }
        }
    }

    /// Runs `f` against the slot for `key`. Subscribers are notified only
    /// when `f` returns `Some`; `None` means nothing changed.
    pub(crate) fn modify<R>(
        &self,
        key: &QueryKey,
        f: impl FnOnce(&mut QueryResult) -> Option<R>,
    ) -> Option<R> {
        let slots = self.slots();
        let slot = slots.get(key)?;
        let mut out = None;
        slot.tx.send_if_modified(|result| {
            out = f(result);
            out.is_some()
        });
        out
    }

    pub fn snapshot(&self, key: &QueryKey) -> Option<QueryResult> {
        self.slots().get(key).map(|s| s.tx.borrow().clone())
    }

    pub fn subscriber_count(&self, key: &QueryKey) -> usize {
        self.slots()
            .get(key)
            .map(|s| s.tx.receiver_count())
            .unwrap_or(0)
    }

    pub fn len(&self) -> usize {
        self.slots().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Discards cached pages for every key matching `predicate`. Returns the
    /// keys that still have subscribers and therefore need a refetch.
    pub fn invalidate(&self, predicate: impl Fn(&QueryKey) -> bool) -> Vec<QueryKey> {
        let slots = self.slots();
        let mut live = Vec::new();
        for (key, slot) in slots.iter().filter(|(k, _)| predicate(k)) {
            slot.tx.send_modify(QueryResult::reset);
            if slot.tx.receiver_count() > 0 {
                live.push(key.clone());
            }
        }
        tracing::debug!(live = live.len(), "invalidated cached queries");
        live
    }

    /// Drops slots that have had no subscribers for longer than the TTL.
    pub fn collect_garbage(&self) -> usize {
        let mut slots = self.slots();
        let before = slots.len();
        let ttl = self.ttl;
        slots.retain(|_, slot| {
            slot.tx.receiver_count() > 0 || slot.idle_since.map_or(true, |t| t.elapsed() < ttl)
        });
        let dropped = before - slots.len();
        if dropped > 0 {
            tracing::debug!(dropped, remaining = slots.len(), "collected idle queries");
        }
        dropped
    }
}
