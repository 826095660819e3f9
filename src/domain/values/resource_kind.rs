use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Which logical recommendation list a query reads from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResourceKind {
    Active,
    Archived,
}

impl ResourceKind {
    pub const ALL: [ResourceKind; 2] = [ResourceKind::Active, ResourceKind::Archived];

    /// Path of the list endpoint, relative to the API base URL.
    pub fn path(&self) -> &'static str {
        match self {
            ResourceKind::Active => "/recommendations",
            ResourceKind::Archived => "/recommendations/archive",
        }
    }

    /// Label used when the list comes back empty.
    pub fn empty_label(&self) -> &'static str {
        match self {
            ResourceKind::Active => "No Recommendations",
            ResourceKind::Archived => "No Archived Recommendations",
        }
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResourceKind::Active => write!(f, "recommendations"),
            ResourceKind::Archived => write!(f, "archived-recommendations"),
        }
    }
}

impl FromStr for ResourceKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "active" | "recommendations" => Ok(ResourceKind::Active),
            "archived" | "archive" | "archived-recommendations" => Ok(ResourceKind::Archived),
            _ => Err(format!("Unknown resource kind: {s}")),
        }
    }
}
