use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The closed set of tag categories the backend reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FilterCategory {
    Frameworks,
    Reasons,
    Providers,
    Classes,
}

impl FilterCategory {
    pub const ALL: [FilterCategory; 4] = [
        FilterCategory::Frameworks,
        FilterCategory::Reasons,
        FilterCategory::Providers,
        FilterCategory::Classes,
    ];

    pub fn title(&self) -> &'static str {
        match self {
            FilterCategory::Frameworks => "Frameworks",
            FilterCategory::Reasons => "Reasons",
            FilterCategory::Providers => "Cloud Providers",
            FilterCategory::Classes => "Classes",
        }
    }
}

impl fmt::Display for FilterCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FilterCategory::Frameworks => write!(f, "frameworks"),
            FilterCategory::Reasons => write!(f, "reasons"),
            FilterCategory::Providers => write!(f, "providers"),
            FilterCategory::Classes => write!(f, "classes"),
        }
    }
}

impl FromStr for FilterCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "frameworks" | "framework" => Ok(FilterCategory::Frameworks),
            "reasons" | "reason" => Ok(FilterCategory::Reasons),
            "providers" | "provider" => Ok(FilterCategory::Providers),
            "classes" | "class" => Ok(FilterCategory::Classes),
            _ => Err(format!("Unknown filter category: {s}")),
        }
    }
}

/// One value per category. Used for both the tag universe and selections.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PerCategory<T> {
    #[serde(default)]
    pub frameworks: T,
    #[serde(default)]
    pub reasons: T,
    #[serde(default)]
    pub providers: T,
    #[serde(default)]
    pub classes: T,
}

impl<T> PerCategory<T> {
    pub fn get(&self, category: FilterCategory) -> &T {
        match category {
            FilterCategory::Frameworks => &self.frameworks,
            FilterCategory::Reasons => &self.reasons,
            FilterCategory::Providers => &self.providers,
            FilterCategory::Classes => &self.classes,
        }
    }

    pub fn get_mut(&mut self, category: FilterCategory) -> &mut T {
        match category {
            FilterCategory::Frameworks => &mut self.frameworks,
            FilterCategory::Reasons => &mut self.reasons,
            FilterCategory::Providers => &mut self.providers,
            FilterCategory::Classes => &mut self.classes,
        }
    }

    /// Iterates in the fixed category order.
    pub fn iter(&self) -> impl Iterator<Item = (FilterCategory, &T)> {
        FilterCategory::ALL.into_iter().map(move |c| (c, self.get(c)))
    }
}

/// Tag lists keyed by category, as served in `availableTags`.
pub type TagLists = PerCategory<Vec<String>>;
