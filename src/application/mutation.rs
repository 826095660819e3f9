use crate::application::auth_state::AuthSession;
use crate::application::paged_query::QueryEngine;
use crate::domain::error::DomainError;
use crate::domain::ports::recommendation_api::{Mutation, RecommendationApi};
use crate::domain::values::query_key::QueryKey;
use crate::domain::values::resource_kind::ResourceKind;
use serde::Serialize;
use std::sync::Arc;

#[derive(Debug, Clone, Serialize)]
pub struct MutationOutcome {
    pub id: String,
    pub action: String,
    /// The backend acknowledged the change.
    pub applied: bool,
    /// Subscribed queries reloaded from their first page.
    pub refetched: Vec<QueryKey>,
}

/// Archive/unarchive with cache invalidation.
///
/// A record moves between the active and archived lists, so a confirmed
/// mutation invalidates both regardless of direction. Nothing is changed
/// locally before the backend confirms.
pub struct MutationUseCase {
    api: Arc<dyn RecommendationApi>,
    auth: Arc<AuthSession>,
    engine: QueryEngine,
}

impl MutationUseCase {
    pub fn new(api: Arc<dyn RecommendationApi>, auth: Arc<AuthSession>, engine: QueryEngine) -> Self {
        Self { api, auth, engine }
    }

    pub async fn archive(&self, id: &str) -> Result<MutationOutcome, DomainError> {
        self.execute(id, Mutation::Archive).await
    }

    pub async fn unarchive(&self, id: &str) -> Result<MutationOutcome, DomainError> {
        self.execute(id, Mutation::Unarchive).await
    }

    async fn execute(&self, id: &str, mutation: Mutation) -> Result<MutationOutcome, DomainError> {
        let id = id.trim();
        if id.is_empty() {
            return Err(DomainError::InvalidInput("recommendation id must not be empty".into()));
        }
        let token = self.auth.token().ok_or(DomainError::Unauthenticated)?;

        let applied = self.api.mutate(id, mutation, &token).await?;
        let refetched = if applied {
            tracing::info!(%id, action = %mutation, "recommendation updated");
            self.engine
                .invalidate(|key| ResourceKind::ALL.contains(&key.kind))
                .await
        } else {
            tracing::warn!(%id, action = %mutation, "backend did not apply mutation");
            Vec::new()
        };

        Ok(MutationOutcome {
            id: id.to_string(),
            action: mutation.to_string(),
            applied,
            refetched,
        })
    }
}
