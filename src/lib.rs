pub mod application;
pub mod cli;
pub mod domain;
pub mod infrastructure;

use crate::application::auth_state::{AuthSession, AuthStatus};
use crate::application::browser::{BrowserOptions, RecommendationBrowser};
use crate::application::mutation::{MutationOutcome, MutationUseCase};
use crate::application::paged_query::{PagedQuery, QueryEngine};
use crate::application::query_cache::QueryCache;
use crate::application::session::SessionUseCase;
use crate::domain::error::DomainError;
use crate::domain::ports::recommendation_api::RecommendationApi;
use crate::domain::ports::token_store::TokenStore;
use crate::domain::values::resource_kind::ResourceKind;
use crate::infrastructure::config::RecSyncConfig;
use crate::infrastructure::http::client::HttpRecommendationApi;
use crate::infrastructure::token_store::file::FileTokenStore;
use crate::infrastructure::token_store::memory::MemoryTokenStore;
use std::sync::Arc;

pub struct RecSync {
    config: RecSyncConfig,
    auth: Arc<AuthSession>,
    engine: QueryEngine,
    mutations: MutationUseCase,
    session: SessionUseCase,
}

impl RecSync {
    pub fn new(config: RecSyncConfig) -> Result<Self, DomainError> {
        config.validate()?;
        let api: Arc<dyn RecommendationApi> =
            Arc::new(HttpRecommendationApi::new(&config.api_base_url, config.timeout())?);

        let store: Arc<dyn TokenStore> = match (config.token(), &config.credentials_path) {
            (Some(token), _) => Arc::new(MemoryTokenStore::with_token(token)),
            (None, Some(path)) => Arc::new(FileTokenStore::new(path)),
            (None, None) => Arc::new(FileTokenStore::new(FileTokenStore::default_path()?)),
        };

        Ok(Self::with_providers(config, api, store))
    }

    pub fn with_providers(
        config: RecSyncConfig,
        api: Arc<dyn RecommendationApi>,
        store: Arc<dyn TokenStore>,
    ) -> Self {
        let auth = Arc::new(AuthSession::new(store));
        auth.load();

        let cache = Arc::new(QueryCache::new(config.page_size, config.cache_ttl()));
        let engine = QueryEngine::new(cache.clone(), api.clone(), auth.clone());

        Self {
            mutations: MutationUseCase::new(api.clone(), auth.clone(), engine.clone()),
            session: SessionUseCase::new(api, auth.clone(), cache),
            config,
            auth,
            engine,
        }
    }

    pub fn config(&self) -> &RecSyncConfig {
        &self.config
    }

    pub fn auth(&self) -> &AuthSession {
        &self.auth
    }

    pub fn engine(&self) -> &QueryEngine {
        &self.engine
    }

    pub fn auth_status(&self) -> AuthStatus {
        self.auth.status()
    }

    /// A list view-model for `kind`. Requires a tokio runtime.
    pub fn browser(&self, kind: ResourceKind) -> RecommendationBrowser {
        RecommendationBrowser::new(
            kind,
            self.engine.clone(),
            BrowserOptions {
                search_delay: self.config.search_delay(),
                trailing_margin_px: self.config.scroll_margin_px,
            },
        )
    }

    pub async fn query(
        &self,
        kind: ResourceKind,
        search: &str,
        tags: Vec<String>,
    ) -> Result<PagedQuery, DomainError> {
        self.engine.query(kind, search, tags).await
    }

    pub async fn login(&self, email: &str, password: &str) -> Result<AuthStatus, DomainError> {
        self.session.login(email, password).await
    }

    pub async fn register(&self, username: &str, email: &str, password: &str) -> Result<(), DomainError> {
        self.session.register(username, email, password).await
    }

    pub fn logout(&self) -> Result<(), DomainError> {
        self.session.logout()
    }

    pub async fn archive(&self, id: &str) -> Result<MutationOutcome, DomainError> {
        self.mutations.archive(id).await
    }

    pub async fn unarchive(&self, id: &str) -> Result<MutationOutcome, DomainError> {
        self.mutations.unarchive(id).await
    }
}
