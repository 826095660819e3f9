use crate::application::auth_state::{AuthSession, AuthStatus};
use crate::application::query_cache::QueryCache;
use crate::domain::error::DomainError;
use crate::domain::ports::recommendation_api::{Credentials, RecommendationApi, Registration};
use std::sync::Arc;

/// Login, registration and logout against the backend.
///
/// Cached pages belong to whoever was signed in when they were fetched, so
/// every token change discards them.
pub struct SessionUseCase {
    api: Arc<dyn RecommendationApi>,
    auth: Arc<AuthSession>,
    cache: Arc<QueryCache>,
}

impl SessionUseCase {
    pub fn new(api: Arc<dyn RecommendationApi>, auth: Arc<AuthSession>, cache: Arc<QueryCache>) -> Self {
        Self { api, auth, cache }
    }

    pub async fn login(&self, email: &str, password: &str) -> Result<AuthStatus, DomainError> {
        if email.trim().is_empty() || password.is_empty() {
            return Err(DomainError::InvalidInput("email and password are required".into()));
        }
        let token = self
            .api
            .login(&Credentials {
                email: email.trim().to_string(),
                password: password.to_string(),
            })
            .await?;
        self.cache.invalidate(|_| true);
        self.auth.set(&token)?;
        tracing::info!(email = %email.trim(), "logged in");
        Ok(self.auth.status())
    }

    pub async fn register(&self, username: &str, email: &str, password: &str) -> Result<(), DomainError> {
        if username.trim().is_empty() || email.trim().is_empty() || password.is_empty() {
            return Err(DomainError::InvalidInput(
                "username, email and password are required".into(),
            ));
        }
        self.api
            .register(&Registration {
                username: username.trim().to_string(),
                email: email.trim().to_string(),
                password: password.to_string(),
            })
            .await
    }

    pub fn logout(&self) -> Result<(), DomainError> {
        self.cache.invalidate(|_| true);
        self.auth.clear()?;
        tracing::info!("logged out");
        Ok(())
    }
}
