//! Enumerations and field types for tasks and task views.
//!
//! Real task attributes (`Category`, `Priority`) live next to the view-only
//! selectors (`SortKey`, `ViewFilter`). A `ViewFilter` is never stored on a
//! task; pseudo-categories such as "High Priority" only exist here.

use std::fmt;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// Fixed set of task categories.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, ValueEnum, PartialEq, Eq, Hash)]
pub enum Category {
    #[serde(alias = "personal")]
    Personal,
    #[serde(alias = "work")]
    Work,
    #[serde(alias = "shopping")]
    Shopping,
    #[serde(alias = "health")]
    Health,
    #[default]
    #[serde(alias = "other")]
    Other,
}

impl Category {
    /// Every category, in drawer order.
    pub const ALL: [Category; 5] = [
        Category::Personal,
        Category::Work,
        Category::Shopping,
        Category::Health,
        Category::Other,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Category::Personal => "Personal",
            Category::Work => "Work",
            Category::Shopping => "Shopping",
            Category::Health => "Health",
            Category::Other => "Other",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Task importance. Declaration order is sort order: `High` first.
#[derive(
    Debug, Clone, Copy, Default, Serialize, Deserialize, ValueEnum, PartialEq, Eq, PartialOrd, Ord, Hash,
)]
pub enum Priority {
    #[serde(alias = "high")]
    High,
    #[default]
    #[serde(alias = "medium")]
    Medium,
    #[serde(alias = "low")]
    Low,
}

impl Priority {
    pub const ALL: [Priority; 3] = [Priority::High, Priority::Medium, Priority::Low];

    pub fn label(self) -> &'static str {
        match self {
            Priority::High => "High",
            Priority::Medium => "Medium",
            Priority::Low => "Low",
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Available orderings for the task list.
#[derive(Debug, Clone, Copy, Default, ValueEnum, PartialEq, Eq)]
pub enum SortKey {
    #[default]
    Priority,
    DueDate,
}

impl SortKey {
    /// The other ordering; the sort button flips between the two.
    pub fn toggled(self) -> Self {
        match self {
            SortKey::Priority => SortKey::DueDate,
            SortKey::DueDate => SortKey::Priority,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            SortKey::Priority => "Priority",
            SortKey::DueDate => "Due Date",
        }
    }
}

/// Drawer selection applied to the task list.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ViewFilter {
    #[default]
    All,
    ByCategory(Category),
    HighPriorityOnly,
    DueToday,
}

impl ViewFilter {
    /// Drawer entries, top to bottom.
    pub fn drawer_entries() -> Vec<ViewFilter> {
        let mut entries = vec![ViewFilter::All, ViewFilter::HighPriorityOnly, ViewFilter::DueToday];
        entries.extend(Category::ALL.iter().copied().map(ViewFilter::ByCategory));
        entries
    }

    pub fn label(self) -> &'static str {
        match self {
            ViewFilter::All => "All",
            ViewFilter::ByCategory(c) => c.label(),
            ViewFilter::HighPriorityOnly => "High Priority",
            ViewFilter::DueToday => "Due Today",
        }
    }

    /// Parse a command-line filter name such as `all`, `high-priority` or `work`.
    pub fn parse(s: &str) -> Option<Self> {
        let normalised = s.trim().to_lowercase().replace([' ', '_'], "-");
        match normalised.as_str() {
            "all" => Some(ViewFilter::All),
            "high-priority" | "high" => Some(ViewFilter::HighPriorityOnly),
            "due-today" | "today" => Some(ViewFilter::DueToday),
            other => Category::ALL
                .iter()
                .copied()
                .find(|c| c.label().to_lowercase() == other)
                .map(ViewFilter::ByCategory),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_priority_order() {
        assert!(Priority::High < Priority::Medium);
        assert!(Priority::Medium < Priority::Low);
    }

    #[test]
    fn test_defaults() {
        assert_eq!(Category::default(), Category::Other);
        assert_eq!(Priority::default(), Priority::Medium);
        assert_eq!(SortKey::default(), SortKey::Priority);
        assert_eq!(ViewFilter::default(), ViewFilter::All);
    }

    #[test]
    fn test_filter_parse() {
        assert_eq!(ViewFilter::parse("all"), Some(ViewFilter::All));
        assert_eq!(ViewFilter::parse("High Priority"), Some(ViewFilter::HighPriorityOnly));
        assert_eq!(ViewFilter::parse("due_today"), Some(ViewFilter::DueToday));
        assert_eq!(ViewFilter::parse("Work"), Some(ViewFilter::ByCategory(Category::Work)));
        assert_eq!(ViewFilter::parse("groceries"), None);
    }

    #[test]
    fn test_serialised_names() {
        assert_eq!(serde_json::to_string(&Category::Shopping).unwrap(), "\"Shopping\"");
        assert_eq!(serde_json::to_string(&Priority::High).unwrap(), "\"High\"");
        let p: Priority = serde_json::from_str("\"low\"").unwrap();
        assert_eq!(p, Priority::Low);
    }

    #[test]
    fn test_drawer_entries_cover_categories() {
        let entries = ViewFilter::drawer_entries();
        assert_eq!(entries.len(), 3 + Category::ALL.len());
        assert_eq!(entries[0], ViewFilter::All);
    }
}
