//! Cursor-paginated queries over the shared [`QueryCache`].
//!
//! [`QueryEngine::subscribe`] hands out a [`PagedQuery`] bound to one key.
//! Fetches for a key are serialized: a request is only issued from `Idle`
//! or `Error` (first page) or from `Ready` with a next cursor (following
//! page), and the slot sits in `Loading`/`LoadingMore` until it completes.
//! A concurrent call during that window returns `Ok(false)` without
//! touching the network.

use crate::application::auth_state::AuthSession;
use crate::application::query_cache::{QueryCache, QueryResult, QueryStatus};
use crate::domain::error::DomainError;
use crate::domain::ports::recommendation_api::{PageRequest, RecommendationApi};
use crate::domain::values::query_key::QueryKey;
use crate::domain::values::record_status::RecordStatus;
use crate::domain::values::resource_kind::ResourceKind;
use std::sync::Arc;
use tokio::sync::watch;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FetchMode {
    First,
    Next,
}

struct Ticket {
    generation: u64,
    request: PageRequest,
}

#[derive(Clone)]
pub struct QueryEngine {
    cache: Arc<QueryCache>,
    api: Arc<dyn RecommendationApi>,
    auth: Arc<AuthSession>,
}

impl QueryEngine {
    pub fn new(
        cache: Arc<QueryCache>,
        api: Arc<dyn RecommendationApi>,
        auth: Arc<AuthSession>,
    ) -> Self {
        Self { cache, api, auth }
    }

    pub fn cache(&self) -> &Arc<QueryCache> {
        &self.cache
    }

    /// Slots idle for longer than the cache TTL are dropped first.
    pub fn subscribe(&self, key: QueryKey) -> PagedQuery {
        self.cache.collect_garbage();
        let rx = self.cache.subscribe(&key);
        PagedQuery {
            engine: self.clone(),
            key,
            rx,
        }
    }

    /// Subscribes to `(kind, search, tags)` and loads its first page.
    pub async fn query(
        &self,
        kind: ResourceKind,
        search: &str,
        tags: Vec<String>,
    ) -> Result<PagedQuery, DomainError> {
        let query = self.subscribe(QueryKey::new(kind, search, tags));
        query.ensure_loaded().await?;
        Ok(query)
    }

    /// Discards cached pages for matching keys and refetches the first page
    /// of each key that is still subscribed. Refetch failures are recorded
    /// on the affected results, not returned.
    pub async fn invalidate(&self, predicate: impl Fn(&QueryKey) -> bool) -> Vec<QueryKey> {
        let live = self.cache.invalidate(predicate);
        for key in &live {
            if let Err(error) = self.fetch(key, FetchMode::First).await {
                tracing::debug!(%key, %error, "refetch after invalidation failed");
            }
        }
        live
    }

    async fn fetch(&self, key: &QueryKey, mode: FetchMode) -> Result<bool, DomainError> {
        let Some(token) = self.auth.token() else {
            self.cache.modify(key, |result| {
                if result.is_fetching() {
                    return None;
                }
                result.status = QueryStatus::Error(DomainError::Unauthenticated);
                Some(())
            });
            return Err(DomainError::Unauthenticated);
        };

        let page_size = self.cache.page_size();
        let ticket = self.cache.modify(key, |result| {
            let request = match mode {
                FetchMode::First => {
                    if !matches!(result.status, QueryStatus::Idle | QueryStatus::Error(_)) {
                        return None;
                    }
                    result.pages.clear();
                    result.status = QueryStatus::Loading;
                    PageRequest::first(key, page_size)
                }
                FetchMode::Next => {
                    if result.status != QueryStatus::Ready {
                        return None;
                    }
                    let request = PageRequest::after(key, page_size, result.last_cursor()?);
                    result.status = QueryStatus::LoadingMore;
                    request
                }
            };
            Some(Ticket {
                generation: result.generation,
                request,
            })
        });
        let Some(ticket) = ticket else {
            return Ok(false);
        };

        tracing::debug!(%key, cursor = ?ticket.request.cursor, "fetching page");
        let outcome = self.api.fetch_page(key.kind, &ticket.request, &token).await;
        let status = RecordStatus::of_list(key.kind);

        let applied = self.cache.modify(key, move |result| {
            if result.generation != ticket.generation {
                return None;
            }
            match outcome {
                Ok(mut page) => {
                    for record in &mut page.data {
                        record.status = status;
                    }
                    result.pages.push(page);
                    result.status = QueryStatus::Ready;
                    Some(Ok(()))
                }
                Err(error) => {
                    result.status = QueryStatus::Error(error.clone());
                    Some(Err(error))
                }
            }
        });

        match applied {
            Some(Ok(())) => Ok(true),
            Some(Err(error)) => Err(error),
            None => {
                tracing::debug!(%key, "discarding stale page response");
                Ok(false)
            }
        }
    }
}

/// A live subscription to one query key.
///
/// Dropping the handle releases the subscription; once a key has no
/// subscribers its next subscription starts from an empty page set.
pub struct PagedQuery {
    engine: QueryEngine,
    key: QueryKey,
    rx: watch::Receiver<QueryResult>,
}

impl PagedQuery {
    pub fn key(&self) -> &QueryKey {
        &self.key
    }

    pub fn result(&self) -> QueryResult {
        self.rx.borrow().clone()
    }

    /// Loads the first page unless it is already loaded or loading.
    pub async fn ensure_loaded(&self) -> Result<(), DomainError> {
        self.engine.fetch(&self.key, FetchMode::First).await?;
        Ok(())
    }

    /// Appends the next page. Returns `Ok(false)` without a request when no
    /// page follows or a fetch is already in flight.
    pub async fn fetch_next_page(&self) -> Result<bool, DomainError> {
        self.engine.fetch(&self.key, FetchMode::Next).await
    }

    /// Leaves the `Error` state by reloading from the first page.
    pub async fn retry(&self) -> Result<bool, DomainError> {
        self.engine.cache.modify(&self.key, |result| {
            result.error()?;
            result.reset();
            Some(())
        });
        self.engine.fetch(&self.key, FetchMode::First).await
    }

    /// Waits for the next state change broadcast for this key.
    pub async fn changed(&mut self) -> Result<QueryResult, DomainError> {
        self.rx
            .changed()
            .await
            .map_err(|_| DomainError::Transport("query cache slot closed".into()))?;
        Ok(self.rx.borrow_and_update().clone())
    }
}

impl Drop for PagedQuery {
    fn drop(&mut self) {
        self.engine.cache.release(&self.key);
    }
}
