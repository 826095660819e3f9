//! Category-keyed filter state.
//!
//! State changes go through [`reduce`], a pure function over
//! [`FilterAction`]. [`FilterStore`] owns the current state and adds the
//! query helpers the filter menu needs. The store never triggers network
//! activity; callers re-key their query after a selection change.

use crate::domain::values::filter_category::{FilterCategory, TagLists};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterState {
    /// Tag universe reported by the most recent first page.
    pub available_tags: TagLists,
    /// Narrowed universe shown in the filter menu.
    pub available_filters: TagLists,
    pub selected_filters: TagLists,
}

#[derive(Debug, Clone, PartialEq)]
pub enum FilterAction {
    SetAvailableTags(TagLists),
    SetAvailableFilters(TagLists),
    UpdateSelectedFilters {
        category: FilterCategory,
        tags: Vec<String>,
    },
    ClearFilters,
}

pub fn reduce(state: FilterState, action: FilterAction) -> FilterState {
    match action {
        FilterAction::SetAvailableTags(tags) => FilterState {
            available_tags: tags,
            ..state
        },
        FilterAction::SetAvailableFilters(filters) => FilterState {
            available_filters: filters,
            ..state
        },
        FilterAction::UpdateSelectedFilters { category, tags } => {
            let mut selected = state.selected_filters;
            *selected.get_mut(category) = dedup(tags);
            FilterState {
                selected_filters: selected,
                ..state
            }
        }
        FilterAction::ClearFilters => FilterState {
            selected_filters: TagLists::default(),
            ..state
        },
    }
}

fn dedup(tags: Vec<String>) -> Vec<String> {
    let mut out: Vec<String> = Vec::with_capacity(tags.len());
    for tag in tags {
        if !out.contains(&tag) {
            out.push(tag);
        }
    }
    out
}

#[derive(Debug, Clone, Default)]
pub struct FilterStore {
    state: FilterState,
}

impl FilterStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &FilterState {
        &self.state
    }

    pub fn dispatch(&mut self, action: FilterAction) {
        self.state = reduce(std::mem::take(&mut self.state), action);
    }

    /// Replaces the tag universe. Existing selections are kept even if they
    /// no longer appear in it.
    pub fn set_available_tags(&mut self, tags: TagLists) {
        self.dispatch(FilterAction::SetAvailableTags(tags));
    }

    pub fn set_available_filters(&mut self, filters: TagLists) {
        self.dispatch(FilterAction::SetAvailableFilters(filters));
    }

    pub fn update_selected_filters(&mut self, category: FilterCategory, tags: Vec<String>) {
        self.dispatch(FilterAction::UpdateSelectedFilters { category, tags });
    }

    pub fn clear_filters(&mut self) {
        self.dispatch(FilterAction::ClearFilters);
    }

    pub fn selected(&self, category: FilterCategory) -> &[String] {
        self.state.selected_filters.get(category)
    }

    pub fn is_selected(&self, category: FilterCategory, tag: &str) -> bool {
        self.selected(category).iter().any(|t| t == tag)
    }

    /// Flips `tag` within `category`. Returns whether it is now selected.
    pub fn toggle(&mut self, category: FilterCategory, tag: &str) -> bool {
        let mut tags = self.selected(category).to_vec();
        let now_selected = if let Some(pos) = tags.iter().position(|t| t == tag) {
            tags.remove(pos);
            false
        } else {
            tags.push(tag.to_string());
            true
        };
        self.update_selected_filters(category, tags);
        now_selected
    }

    /// All selected tags, flattened in category order.
    pub fn selected_tags(&self) -> Vec<String> {
        self.state
            .selected_filters
            .iter()
            .flat_map(|(_, tags)| tags.iter().cloned())
            .collect()
    }

    pub fn selected_count(&self) -> usize {
        self.state.selected_filters.iter().map(|(_, tags)| tags.len()).sum()
    }

    /// Known tags in `category` containing `needle`, case-insensitively.
    /// An empty needle matches everything.
    pub fn matching_tags(&self, category: FilterCategory, needle: &str) -> Vec<&str> {
        let needle = needle.to_lowercase();
        self.state
            .available_tags
            .get(category)
            .iter()
            .filter(|tag| needle.is_empty() || tag.to_lowercase().contains(&needle))
            .map(String::as_str)
            .collect()
    }
}
