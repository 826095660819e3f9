use crate::domain::error::DomainError;

/// Durable storage for the bearer token.
pub trait TokenStore: Send + Sync {
    /// Returns `None` when nothing usable is stored.
    fn load(&self) -> Result<Option<String>, DomainError>;
    fn save(&self, token: &str) -> Result<(), DomainError>;
    fn clear(&self) -> Result<(), DomainError>;
}
