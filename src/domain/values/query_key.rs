use crate::domain::values::resource_kind::ResourceKind;
use serde::Serialize;
use std::fmt;

/// Identity of one logical paginated result set.
///
/// Two keys are equal only when resource kind, search text and the selected
/// tags (in order) all match.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct QueryKey {
    pub kind: ResourceKind,
    pub search: String,
    pub tags: Vec<String>,
}

impl QueryKey {
    pub fn new(kind: ResourceKind, search: impl Into<String>, tags: Vec<String>) -> Self {
        Self {
            kind,
            search: search.into(),
            tags,
        }
    }

    /// The `tags` query parameter: a flat comma-joined list.
    pub fn joined_tags(&self) -> String {
        self.tags.join(",")
    }
}

impl fmt::Display for QueryKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}[search={:?}, tags={:?}]", self.kind, self.search, self.joined_tags())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_joined_tags() {
        let key = QueryKey::new(ResourceKind::Active, "", vec!["AWS".into(), "CIS".into()]);
        assert_eq!(key.joined_tags(), "AWS,CIS");
        assert_eq!(QueryKey::new(ResourceKind::Active, "", vec![]).joined_tags(), "");
    }

    #[test]
    fn test_kind_participates_in_identity() {
        let a = QueryKey::new(ResourceKind::Active, "s3", vec![]);
        let b = QueryKey::new(ResourceKind::Archived, "s3", vec![]);
        assert_ne!(a, b);
    }
}
