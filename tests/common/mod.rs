//! Shared test helpers: a scripted in-memory backend.
#![allow(dead_code)]

use recsync::domain::entities::page::{Cursor, Page, Pagination};
use recsync::domain::entities::recommendation::RecommendationRecord;
use recsync::domain::error::DomainError;
use recsync::domain::ports::recommendation_api::{
    Credentials, Mutation, PageRequest, RecommendationApi, Registration,
};
use recsync::domain::values::filter_category::TagLists;
use recsync::domain::values::record_status::RecordStatus;
use recsync::domain::values::resource_kind::ResourceKind;
use recsync::infrastructure::config::RecSyncConfig;
use recsync::infrastructure::token_store::memory::MemoryTokenStore;
use recsync::RecSync;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tokio::sync::Semaphore;

pub const TEST_TOKEN: &str = "test-token";

/// Backend double. Cursors are stringified offsets; search matches titles
/// case-insensitively; a tag matches a record listing it under `reasons`.
#[derive(Default)]
pub struct FakeApi {
    pub active: Mutex<Vec<RecommendationRecord>>,
    pub archived: Mutex<Vec<RecommendationRecord>>,
    pub available_tags: Mutex<TagLists>,
    pub requests: Mutex<Vec<(ResourceKind, PageRequest)>>,
    pub fetch_calls: AtomicUsize,
    pub mutate_calls: AtomicUsize,
    pub fetch_error: Mutex<Option<DomainError>>,
    pub mutate_error: Mutex<Option<DomainError>>,
    pub reject_mutations: AtomicBool,
    pub registrations: Mutex<Vec<String>>,
    gate: Mutex<Option<Arc<Semaphore>>>,
}

impl FakeApi {
    pub fn with_active(records: Vec<RecommendationRecord>) -> Arc<Self> {
        let api = Self::default();
        *api.active.lock().unwrap() = records;
        Arc::new(api)
    }

    /// Holds every subsequent fetch until a permit is added to the returned
    /// semaphore.
    pub fn gate(&self) -> Arc<Semaphore> {
        let gate = Arc::new(Semaphore::new(0));
        *self.gate.lock().unwrap() = Some(gate.clone());
        gate
    }

    pub fn ungate(&self) {
        *self.gate.lock().unwrap() = None;
    }

    pub fn fail_fetches_with(&self, error: Option<DomainError>) {
        *self.fetch_error.lock().unwrap() = error;
    }

    pub fn fetches(&self) -> usize {
        self.fetch_calls.load(Ordering::SeqCst)
    }

    pub fn mutations(&self) -> usize {
        self.mutate_calls.load(Ordering::SeqCst)
    }

    pub fn last_request(&self) -> Option<(ResourceKind, PageRequest)> {
        self.requests.lock().unwrap().last().cloned()
    }

    fn list(&self, kind: ResourceKind) -> &Mutex<Vec<RecommendationRecord>> {
        match kind {
            ResourceKind::Active => &self.active,
            ResourceKind::Archived => &self.archived,
        }
    }
}

#[async_trait::async_trait]
impl RecommendationApi for FakeApi {
    async fn fetch_page(
        &self,
        kind: ResourceKind,
        request: &PageRequest,
        token: &str,
    ) -> Result<Page, DomainError> {
        assert_eq!(token, TEST_TOKEN);
        self.fetch_calls.fetch_add(1, Ordering::SeqCst);
        self.requests.lock().unwrap().push((kind, request.clone()));

        let gate = self.gate.lock().unwrap().clone();
        if let Some(gate) = gate {
            gate.acquire().await.unwrap().forget();
        }
        if let Some(error) = self.fetch_error.lock().unwrap().clone() {
            return Err(error);
        }

        let search = request.search.to_lowercase();
        let tags: Vec<&str> = request.tags.split(',').filter(|t| !t.is_empty()).collect();
        let matching: Vec<RecommendationRecord> = self
            .list(kind)
            .lock()
            .unwrap()
            .iter()
            .filter(|r| search.is_empty() || r.title.to_lowercase().contains(&search))
            .filter(|r| tags.is_empty() || r.reasons.iter().any(|reason| tags.contains(&reason.as_str())))
            .cloned()
            .collect();

        let offset: usize = request
            .cursor
            .as_deref()
            .map(|c| c.parse().unwrap())
            .unwrap_or(0);
        let end = (offset + request.limit).min(matching.len());
        let next = (end < matching.len()).then(|| end.to_string());

        Ok(Page {
            data: matching[offset.min(end)..end].to_vec(),
            pagination: Pagination {
                cursor: Some(Cursor { next }),
                total_items: matching.len() as u64,
            },
            available_tags: self.available_tags.lock().unwrap().clone(),
        })
    }

    async fn mutate(&self, id: &str, mutation: Mutation, token: &str) -> Result<bool, DomainError> {
        assert_eq!(token, TEST_TOKEN);
        self.mutate_calls.fetch_add(1, Ordering::SeqCst);
        if let Some(error) = self.mutate_error.lock().unwrap().clone() {
            return Err(error);
        }
        if self.reject_mutations.load(Ordering::SeqCst) {
            return Ok(false);
        }

        let (from, to) = match mutation {
            Mutation::Archive => (&self.active, &self.archived),
            Mutation::Unarchive => (&self.archived, &self.active),
        };
        let mut source = from.lock().unwrap();
        let Some(pos) = source.iter().position(|r| r.id == id) else {
            return Err(DomainError::Server {
                status: 404,
                message: "Recommendation not found".into(),
            });
        };
        let record = source.remove(pos);
        to.lock().unwrap().push(record);
        Ok(true)
    }

    async fn login(&self, credentials: &Credentials) -> Result<String, DomainError> {
        if credentials.password == "correct-horse" {
            Ok(TEST_TOKEN.to_string())
        } else {
            Err(DomainError::Server {
                status: 401,
                message: "Invalid credentials".into(),
            })
        }
    }

    async fn register(&self, registration: &Registration) -> Result<(), DomainError> {
        self.registrations
            .lock()
            .unwrap()
            .push(registration.username.clone());
        Ok(())
    }
}

pub fn record(id: &str, title: &str, reasons: &[&str]) -> RecommendationRecord {
    RecommendationRecord {
        id: id.to_string(),
        tenant_id: Some("tenant-1".into()),
        title: title.to_string(),
        slug: None,
        description: format!("{title} description"),
        score: 50.0,
        provider: vec![0],
        frameworks: vec![],
        reasons: reasons.iter().map(|r| r.to_string()).collect(),
        further_reading: vec![],
        total_historical_violations: 0,
        affected_resources: vec![],
        impact_assessment: None,
        class: None,
        status: RecordStatus::Active,
    }
}

/// `count` records titled "Recommendation {i}".
pub fn catalog(count: usize) -> Vec<RecommendationRecord> {
    (0..count)
        .map(|i| record(&format!("rec-{i}"), &format!("Recommendation {i}"), &[]))
        .collect()
}

pub fn setup(api: Arc<FakeApi>) -> RecSync {
    RecSync::with_providers(
        RecSyncConfig::default(),
        api,
        Arc::new(MemoryTokenStore::with_token(TEST_TOKEN)),
    )
}

pub fn setup_anonymous(api: Arc<FakeApi>) -> RecSync {
    RecSync::with_providers(RecSyncConfig::default(), api, Arc::new(MemoryTokenStore::new()))
}
