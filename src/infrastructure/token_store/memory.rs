use crate::domain::error::DomainError;
use crate::domain::ports::token_store::TokenStore;
use std::sync::Mutex;

/// Non-durable token storage, for tests and config-supplied tokens.
#[derive(Default)]
pub struct MemoryTokenStore {
    token: Mutex<Option<String>>,
}

impl MemoryTokenStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_token(token: impl Into<String>) -> Self {
        Self {
            token: Mutex::new(Some(token.into())),
        }
    }
}

impl TokenStore for MemoryTokenStore {
    fn load(&self) -> Result<Option<String>, DomainError> {
        let token = self
            .token
            .lock()
            .map_err(|e| DomainError::TokenStore(e.to_string()))?;
        Ok(token.clone().filter(|t| !t.trim().is_empty()))
    }

    fn save(&self, token: &str) -> Result<(), DomainError> {
        *self
            .token
            .lock()
            .map_err(|e| DomainError::TokenStore(e.to_string()))? = Some(token.to_string());
        Ok(())
    }

    fn clear(&self) -> Result<(), DomainError> {
        *self
            .token
            .lock()
            .map_err(|e| DomainError::TokenStore(e.to_string()))? = None;
        Ok(())
    }
}
