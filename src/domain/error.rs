use thiserror::Error;

/// Message surfaced when a request is attempted without a bearer token.
pub const NO_TOKEN_MESSAGE: &str = "No authentication token found";

#[derive(Debug, Clone, PartialEq, Error)]
pub enum DomainError {
    #[error("No authentication token found")]
    Unauthenticated,

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Server error ({status}): {message}")]
    Server { status: u16, message: String },

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Config error: {0}")]
    Config(String),

    #[error("Token store error: {0}")]
    TokenStore(String),
}

impl DomainError {
    /// Text suitable for a transient user notification.
    pub fn user_message(&self) -> String {
        match self {
            DomainError::Unauthenticated => NO_TOKEN_MESSAGE.to_string(),
            DomainError::Server { message, .. } => message.clone(),
            other => other.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_server_user_message_is_body_message() {
        let err = DomainError::Server {
            status: 404,
            message: "Recommendation not found".into(),
        };
        assert_eq!(err.user_message(), "Recommendation not found");
        assert_eq!(err.to_string(), "Server error (404): Recommendation not found");
    }

    #[test]
    fn test_unauthenticated_message() {
        assert_eq!(DomainError::Unauthenticated.user_message(), NO_TOKEN_MESSAGE);
    }
}
