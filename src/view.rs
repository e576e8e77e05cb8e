//! Derived task views: filtering, searching, sorting and counts.
//!
//! `derive` is a pure function of the task collection, the view state and
//! the current day. It is cheap enough to call after every event.

use std::collections::HashMap;

use chrono::NaiveDate;

use crate::fields::*;
use crate::task::Task;

/// Filter, search and sort selections applied to the list.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ViewState {
    pub filter: ViewFilter,
    pub search: String,
    pub sort: SortKey,
}

/// Aggregates over the whole collection, independent of the active filter.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Counts {
    pub total: usize,
    pub completed: usize,
    pub active: usize,
    pub overdue: usize,
    pub high_priority: usize,
    pub due_today: usize,
    pub by_category: HashMap<Category, usize>,
}

impl Counts {
    pub fn compute(tasks: &[Task], today: NaiveDate) -> Self {
        let mut counts = Counts {
            total: tasks.len(),
            ..Default::default()
        };
        for task in tasks {
            if task.completed {
                counts.completed += 1;
            } else {
                counts.active += 1;
            }
            if task.is_overdue(today) {
                counts.overdue += 1;
            }
            if task.is_pressing() {
                counts.high_priority += 1;
            }
            if task.is_due_on(today) {
                counts.due_today += 1;
            }
            *counts.by_category.entry(task.category).or_default() += 1;
        }
        counts
    }

    pub fn in_category(&self, category: Category) -> usize {
        self.by_category.get(&category).copied().unwrap_or(0)
    }

    /// Badge shown next to a drawer entry.
    pub fn for_filter(&self, filter: ViewFilter) -> usize {
        match filter {
            ViewFilter::All => self.total,
            ViewFilter::ByCategory(c) => self.in_category(c),
            ViewFilter::HighPriorityOnly => self.high_priority,
            ViewFilter::DueToday => self.due_today,
        }
    }
}

/// The ordered, filtered list plus collection-wide counts.
#[derive(Debug, Clone)]
pub struct View<'a> {
    pub tasks: Vec<&'a Task>,
    pub counts: Counts,
}

impl View<'_> {
    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    pub fn ids(&self) -> Vec<u64> {
        self.tasks.iter().map(|t| t.id).collect()
    }
}

/// Whether `task` passes the drawer selection.
pub fn matches_filter(task: &Task, filter: ViewFilter, today: NaiveDate) -> bool {
    match filter {
        ViewFilter::All => true,
        ViewFilter::ByCategory(c) => task.category == c,
        ViewFilter::HighPriorityOnly => task.is_pressing(),
        ViewFilter::DueToday => task.is_due_on(today),
    }
}

/// Case-insensitive substring match on the title. Empty query matches all.
pub fn matches_search(task: &Task, query: &str) -> bool {
    let query = query.trim();
    query.is_empty() || task.text.to_lowercase().contains(&query.to_lowercase())
}

/// Stable in-place ordering by `key`.
pub fn sort_tasks(tasks: &mut [&Task], key: SortKey) {
    match key {
        SortKey::Priority => tasks.sort_by_key(|t| t.priority),
        // `None` sorts after every date.
        SortKey::DueDate => tasks.sort_by_key(|t| (t.due_date.is_none(), t.due_date)),
    }
}

/// Compute the visible list and counts.
pub fn derive<'a>(tasks: &'a [Task], state: &ViewState, today: NaiveDate) -> View<'a> {
    let mut visible: Vec<&Task> = tasks
        .iter()
        .filter(|t| matches_search(t, &state.search))
        .filter(|t| matches_filter(t, state.filter, today))
        .collect();
    sort_tasks(&mut visible, state.sort);
    View {
        tasks: visible,
        counts: Counts::compute(tasks, today),
    }
}
