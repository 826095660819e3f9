//! Port for the recommendations backend.
//!
//! The HTTP adapter lives in `infrastructure::http`; tests substitute a
//! scripted implementation.

use crate::domain::entities::page::Page;
use crate::domain::error::DomainError;
use crate::domain::values::query_key::QueryKey;
use crate::domain::values::resource_kind::ResourceKind;
use serde::Serialize;
use std::fmt;

/// Parameters for one list request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRequest {
    pub cursor: Option<String>,
    pub limit: usize,
    pub search: String,
    /// Comma-joined tags across all categories.
    pub tags: String,
}

impl PageRequest {
    pub fn first(key: &QueryKey, limit: usize) -> Self {
        Self {
            cursor: None,
            limit,
            search: key.search.clone(),
            tags: key.joined_tags(),
        }
    }

    pub fn after(key: &QueryKey, limit: usize, cursor: impl Into<String>) -> Self {
        Self {
            cursor: Some(cursor.into()),
            ..Self::first(key, limit)
        }
    }

    /// Query-string pairs in wire order. `cursor` is omitted on the first page.
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::with_capacity(4);
        if let Some(cursor) = &self.cursor {
            pairs.push(("cursor", cursor.clone()));
        }
        pairs.push(("limit", self.limit.to_string()));
        pairs.push(("search", self.search.clone()));
        pairs.push(("tags", self.tags.clone()));
        pairs
    }
}

/// State-changing action on a single record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mutation {
    Archive,
    Unarchive,
}

impl Mutation {
    pub fn path(&self, id: &str) -> String {
        format!("/recommendations/{id}/{self}")
    }
}

impl fmt::Display for Mutation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Mutation::Archive => write!(f, "archive"),
            Mutation::Unarchive => write!(f, "unarchive"),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct Registration {
    pub username: String,
    pub email: String,
    pub password: String,
}

#[async_trait::async_trait]
pub trait RecommendationApi: Send + Sync {
    /// Fetch one page of the list named by `kind`.
    async fn fetch_page(
        &self,
        kind: ResourceKind,
        request: &PageRequest,
        token: &str,
    ) -> Result<Page, DomainError>;

    /// Apply `mutation` to record `id`. Returns the backend's `status` flag.
    async fn mutate(&self, id: &str, mutation: Mutation, token: &str) -> Result<bool, DomainError>;

    /// Exchange credentials for a bearer token.
    async fn login(&self, credentials: &Credentials) -> Result<String, DomainError>;

    async fn register(&self, registration: &Registration) -> Result<(), DomainError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_page_has_no_cursor_pair() {
        let key = QueryKey::new(ResourceKind::Active, "iam", vec!["AWS".into(), "CIS".into()]);
        let pairs = PageRequest::first(&key, 10).query_pairs();
        assert_eq!(
            pairs,
            vec![
                ("limit", "10".to_string()),
                ("search", "iam".to_string()),
                ("tags", "AWS,CIS".to_string()),
            ]
        );
    }

    #[test]
    fn test_next_page_leads_with_cursor() {
        let key = QueryKey::new(ResourceKind::Archived, "", vec![]);
        let pairs = PageRequest::after(&key, 10, "c2").query_pairs();
        assert_eq!(pairs[0], ("cursor", "c2".to_string()));
        assert_eq!(pairs.len(), 4);
    }

    #[test]
    fn test_mutation_paths() {
        assert_eq!(Mutation::Archive.path("r1"), "/recommendations/r1/archive");
        assert_eq!(Mutation::Unarchive.path("r1"), "/recommendations/r1/unarchive");
    }
}
