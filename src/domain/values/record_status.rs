use crate::domain::values::resource_kind::ResourceKind;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecordStatus {
    #[default]
    Active,
    Archived,
}

impl RecordStatus {
    /// Status implied by the list a record was read from.
    pub fn of_list(kind: ResourceKind) -> Self {
        match kind {
            ResourceKind::Active => RecordStatus::Active,
            ResourceKind::Archived => RecordStatus::Archived,
        }
    }
}

impl fmt::Display for RecordStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecordStatus::Active => write!(f, "active"),
            RecordStatus::Archived => write!(f, "archived"),
        }
    }
}
