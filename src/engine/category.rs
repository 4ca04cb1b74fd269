//! Category grouping and expansion state
//!
//! Grouping is recomputed from the registry on every query; only the
//! expansion set is held, and it is never persisted.

use std::collections::BTreeSet;

use serde::Serialize;

use crate::state::Timer;

/// Timers sharing one trimmed category, in registry order
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryGroup {
    pub category: String,
    pub timers: Vec<Timer>,
}

/// Group timers by trimmed category. Groups come out in order of first appearance.
pub fn group_by_category(timers: &[Timer]) -> Vec<CategoryGroup> {
    let mut groups: Vec<CategoryGroup> = Vec::new();
    for timer in timers {
        let key = timer.category_key();
        match groups.iter_mut().find(|g| g.category == key) {
            Some(group) => group.timers.push(timer.clone()),
            None => groups.push(CategoryGroup {
                category: key.to_string(),
                timers: vec![timer.clone()],
            }),
        }
    }
    groups
}

/// A group together with its expansion flag, as shown to clients
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryView {
    pub category: String,
    pub expanded: bool,
    pub timers: Vec<Timer>,
}

pub fn category_views(timers: &[Timer], expansion: &Expansion) -> Vec<CategoryView> {
    group_by_category(timers)
        .into_iter()
        .map(|group| CategoryView {
            expanded: expansion.is_expanded(&group.category),
            category: group.category,
            timers: group.timers,
        })
        .collect()
}

/// Set of category names currently shown expanded
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Expansion {
    expanded: BTreeSet<String>,
}

impl Expansion {
    pub fn new() -> Self {
        Self::default()
    }

    /// Flip membership; returns whether the category is now expanded
    pub fn toggle(&mut self, category: &str) -> bool {
        let key = category.trim();
        if self.expanded.remove(key) {
            false
        } else {
            self.expanded.insert(key.to_string());
            true
        }
    }

    /// Expand without toggling; no-op when already expanded
    pub fn expand(&mut self, category: &str) {
        let key = category.trim();
        if !self.expanded.contains(key) {
            self.expanded.insert(key.to_string());
        }
    }

    pub fn is_expanded(&self, category: &str) -> bool {
        self.expanded.contains(category.trim())
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.expanded.iter().map(String::as_str)
    }
}
