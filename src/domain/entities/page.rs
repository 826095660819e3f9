use crate::domain::entities::recommendation::RecommendationRecord;
use crate::domain::values::filter_category::TagLists;
use serde::{Deserialize, Serialize};

/// One page of a list response, in the backend's wire shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page {
    pub data: Vec<RecommendationRecord>,
    #[serde(default)]
    pub pagination: Pagination,
    #[serde(default)]
    pub available_tags: TagLists,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    #[serde(default)]
    pub cursor: Option<Cursor>,
    #[serde(default)]
    pub total_items: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Cursor {
    #[serde(default)]
    pub next: Option<String>,
}

impl Page {
    pub fn items(&self) -> &[RecommendationRecord] {
        &self.data
    }

    /// Cursor for the following page. A missing, null or empty cursor means
    /// this was the last page.
    pub fn next_cursor(&self) -> Option<&str> {
        self.pagination
            .cursor
            .as_ref()
            .and_then(|c| c.next.as_deref())
            .filter(|c| !c.is_empty())
    }

    pub fn total_items(&self) -> u64 {
        self.pagination.total_items
    }
}
