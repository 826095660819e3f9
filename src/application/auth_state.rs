//! Process-wide authentication state.
//!
//! Initialization order: [`AuthSession::load`] consults durable storage once,
//! populates the in-memory token, then marks the state ready. Until then the
//! session reports [`AuthStatus::NotReady`], which callers must keep apart
//! from [`AuthStatus::Anonymous`].

use crate::domain::error::DomainError;
use crate::domain::ports::token_store::TokenStore;
use std::sync::{Arc, RwLock};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AuthPhase {
    #[default]
    NotReady,
    Ready,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct AuthState {
    pub phase: AuthPhase,
    pub token: Option<String>,
    pub user: Option<serde_json::Value>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum AuthAction {
    SetToken(String),
    SetUser(Option<serde_json::Value>),
    MarkReady,
    LogOut,
}

pub fn reduce(state: AuthState, action: AuthAction) -> AuthState {
    match action {
        AuthAction::SetToken(token) => AuthState {
            token: Some(token).filter(|t| !t.is_empty()),
            ..state
        },
        AuthAction::SetUser(user) => AuthState { user, ..state },
        AuthAction::MarkReady => AuthState {
            phase: AuthPhase::Ready,
            ..state
        },
        AuthAction::LogOut => AuthState {
            token: None,
            user: None,
            ..state
        },
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AuthStatus {
    NotReady,
    Anonymous,
    Authenticated,
}

impl AuthState {
    pub fn status(&self) -> AuthStatus {
        match (self.phase, &self.token) {
            (AuthPhase::NotReady, _) => AuthStatus::NotReady,
            (AuthPhase::Ready, None) => AuthStatus::Anonymous,
            (AuthPhase::Ready, Some(_)) => AuthStatus::Authenticated,
        }
    }
}

pub struct AuthSession {
    state: RwLock<AuthState>,
    store: Arc<dyn TokenStore>,
}

impl AuthSession {
    pub fn new(store: Arc<dyn TokenStore>) -> Self {
        Self {
            state: RwLock::new(AuthState::default()),
            store,
        }
    }

    fn dispatch(&self, action: AuthAction) {
        let mut guard = self.state.write().unwrap_or_else(|e| e.into_inner());
        *guard = reduce(std::mem::take(&mut *guard), action);
    }

    pub fn state(&self) -> AuthState {
        self.state.read().unwrap_or_else(|e| e.into_inner()).clone()
    }

    pub fn status(&self) -> AuthStatus {
        self.state.read().unwrap_or_else(|e| e.into_inner()).status()
    }

    pub fn token(&self) -> Option<String> {
        self.state
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .token
            .clone()
    }

    /// Reads durable storage and marks the session ready. Later calls are
    /// no-ops. A storage failure leaves the session ready with no token.
    pub fn load(&self) -> AuthStatus {
        if self.status() != AuthStatus::NotReady {
            return self.status();
        }
        match self.store.load() {
            Ok(Some(token)) => self.dispatch(AuthAction::SetToken(token)),
            Ok(None) => {}
            Err(error) => tracing::warn!(%error, "failed to read stored credentials"),
        }
        self.dispatch(AuthAction::MarkReady);
        self.status()
    }

    /// Sets the in-memory token, then persists it.
    pub fn set(&self, token: &str) -> Result<(), DomainError> {
        if token.trim().is_empty() {
            return Err(DomainError::InvalidInput("token must not be empty".into()));
        }
        self.dispatch(AuthAction::SetToken(token.to_string()));
        self.dispatch(AuthAction::MarkReady);
        self.store.save(token)
    }

    pub fn set_user(&self, user: Option<serde_json::Value>) {
        self.dispatch(AuthAction::SetUser(user));
    }

    /// Drops the in-memory token, then removes persisted credentials.
    pub fn clear(&self) -> Result<(), DomainError> {
        self.dispatch(AuthAction::LogOut);
        self.store.clear()
    }
}
