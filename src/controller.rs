//! Interaction controller: turns user gestures into store mutations and view
//! state changes, and raises short-lived notifications.
//!
//! Every method corresponds to one gesture. Time is passed in (`now` for the
//! notification clock, `today` for due-date parsing) so the controller can be
//! driven deterministically from tests.

use std::time::{Duration, Instant};

use chrono::NaiveDate;
use tracing::{debug, warn};

use crate::fields::{SortKey, ViewFilter};
use crate::form::TaskForm;
use crate::storage::Storage;
use crate::store::TaskStore;
use crate::view::{derive, View, ViewState};

/// How long a notification stays visible.
pub const NOTIFICATION_TIMEOUT: Duration = Duration::from_secs(3);

/// A transient confirmation message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub message: String,
    pub expires_at: Instant,
}

/// An inline edit in progress.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditSession {
    pub id: u64,
    pub form: TaskForm,
}

/// Owns the store and all ephemeral UI input state.
#[derive(Debug)]
pub struct Controller<S> {
    store: TaskStore<S>,
    pub draft: TaskForm,
    view: ViewState,
    drawer_open: bool,
    dark_mode: bool,
    notification: Option<Notification>,
    notification_timeout: Duration,
    editing: Option<EditSession>,
}

impl<S: Storage> Controller<S> {
    /// Wrap an opened store; the theme preference is read once here.
    pub fn new(store: TaskStore<S>) -> Self {
        let dark_mode = store.persistence().load_theme_preference();
        Self {
            store,
            draft: TaskForm::new(),
            view: ViewState::default(),
            drawer_open: false,
            dark_mode,
            notification: None,
            notification_timeout: NOTIFICATION_TIMEOUT,
            editing: None,
        }
    }

    pub fn with_notification_timeout(mut self, timeout: Duration) -> Self {
        self.notification_timeout = timeout;
        self
    }

    pub fn store(&self) -> &TaskStore<S> {
        &self.store
    }

    pub fn view_state(&self) -> &ViewState {
        &self.view
    }

    pub fn drawer_open(&self) -> bool {
        self.drawer_open
    }

    pub fn dark_mode(&self) -> bool {
        self.dark_mode
    }

    pub fn editing(&self) -> Option<&EditSession> {
        self.editing.as_ref()
    }

    pub fn editing_mut(&mut self) -> Option<&mut EditSession> {
        self.editing.as_mut()
    }

    /// Current notification text, if one is showing.
    pub fn notification(&self) -> Option<&str> {
        self.notification.as_ref().map(|n| n.message.as_str())
    }

    /// Recompute the visible list and counts.
    pub fn view(&self, today: NaiveDate) -> View<'_> {
        derive(self.store.tasks(), &self.view, today)
    }

    fn notify(&mut self, message: impl Into<String>, now: Instant) {
        self.notification = Some(Notification {
            message: message.into(),
            expires_at: now + self.notification_timeout,
        });
    }

    /// Dismiss the notification once it has expired.
    pub fn tick(&mut self, now: Instant) {
        if self
            .notification
            .as_ref()
            .is_some_and(|n| now >= n.expires_at)
        {
            self.notification = None;
        }
    }

    pub fn dismiss_notification(&mut self) {
        self.notification = None;
    }

    /// Add a task from the draft form. Enter in the title field lands here.
    ///
    /// Returns the new id. A blank title leaves both the store and the draft
    /// untouched.
    pub fn submit_draft(&mut self, today: NaiveDate, now: Instant) -> Option<u64> {
        if self.draft.due_is_invalid(today) {
            warn!(input = %self.draft.due.value, "unrecognised due date, adding without one");
        }
        let id = self.store.add(self.draft.to_new_task(today))?.id;
        self.draft.clear();
        self.notify("Task added successfully!", now);
        Some(id)
    }

    pub fn delete(&mut self, id: u64, now: Instant) -> bool {
        if self.store.remove(id).is_none() {
            return false;
        }
        if self.editing.as_ref().is_some_and(|e| e.id == id) {
            self.editing = None;
        }
        self.notify("Task deleted", now);
        true
    }

    pub fn toggle_completed(&mut self, id: u64, now: Instant) -> bool {
        match self.store.toggle_completed(id) {
            Some(true) => self.notify("Task marked as completed", now),
            Some(false) => self.notify("Task marked as incomplete", now),
            None => return false,
        }
        true
    }

    /// Show or hide the description. Never raises a notification.
    pub fn toggle_expanded(&mut self, id: u64) -> bool {
        self.store.toggle_expanded(id).is_some()
    }

    /// Open an inline edit for `id`, replacing any edit in progress.
    pub fn begin_edit(&mut self, id: u64) -> bool {
        let Some(task) = self.store.get(id) else {
            return false;
        };
        self.editing = Some(EditSession {
            id,
            form: TaskForm::from_task(task),
        });
        true
    }

    /// Save the inline edit. A blank title keeps the session open.
    pub fn commit_edit(&mut self, today: NaiveDate, now: Instant) -> bool {
        let Some(session) = self.editing.as_ref() else {
            return false;
        };
        let (id, patch) = (session.id, session.form.to_patch(today));
        if self.store.get(id).is_none() {
            self.editing = None;
            return false;
        }
        if self.store.update(id, patch).is_none() {
            return false;
        }
        self.editing = None;
        self.notify("Task updated", now);
        true
    }

    pub fn cancel_edit(&mut self) {
        self.editing = None;
    }

    pub fn clear_completed(&mut self, now: Instant) -> usize {
        let removed = self.store.clear_completed();
        if removed > 0 {
            self.notify(format!("Cleared {removed} completed task(s)"), now);
        }
        removed
    }

    pub fn set_search(&mut self, query: impl Into<String>) {
        self.view.search = query.into();
    }

    /// Pick a drawer entry; the drawer closes on selection.
    pub fn select_filter(&mut self, filter: ViewFilter) {
        debug!(filter = filter.label(), "filter selected");
        self.view.filter = filter;
        self.drawer_open = false;
    }

    pub fn set_sort(&mut self, sort: SortKey) {
        self.view.sort = sort;
    }

    pub fn toggle_sort(&mut self) {
        self.view.sort = self.view.sort.toggled();
    }

    pub fn toggle_drawer(&mut self) {
        self.drawer_open = !self.drawer_open;
    }

    /// Flip light/dark and persist the preference.
    pub fn toggle_theme(&mut self) {
        self.dark_mode = !self.dark_mode;
        if let Err(e) = self
            .store
            .persistence_mut()
            .save_theme_preference(self.dark_mode)
        {
            warn!(error = %e, "Error saving theme preference");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fields::{Category, Priority};
    use crate::input::InputField;
    use crate::persist::Persistence;
    use crate::storage::MemoryStorage;
    use pretty_assertions::assert_eq;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 9, 1).unwrap()
    }

    fn controller() -> Controller<MemoryStorage> {
        Controller::new(TaskStore::open(Persistence::new(MemoryStorage::new())))
    }

    fn type_title(c: &mut Controller<MemoryStorage>, title: &str) {
        c.draft.title = InputField::with_value(title);
    }

    fn add(c: &mut Controller<MemoryStorage>, title: &str, now: Instant) -> u64 {
        type_title(c, title);
        c.submit_draft(today(), now).unwrap()
    }

    #[test]
    fn test_buy_milk_scenario() {
        let mut c = controller();
        let now = Instant::now();
        type_title(&mut c, "Buy milk");
        c.draft.category = Some(Category::Shopping);
        c.draft.priority = Priority::High;
        assert!(c.submit_draft(today(), now).is_some());

        let view = c.view(today());
        assert_eq!(view.len(), 1);
        assert_eq!(view.tasks[0].category, Category::Shopping);
        assert_eq!(view.tasks[0].due_date, None);
        assert_eq!(view.counts.high_priority, 1);
        assert_eq!(view.counts.total, 1);
        assert_eq!(view.counts.completed, 0);
        assert_eq!(c.notification(), Some("Task added successfully!"));
        assert_eq!(c.draft, TaskForm::new());
    }

    #[test]
    fn test_blank_submit_is_silent() {
        let mut c = controller();
        type_title(&mut c, "   ");
        c.draft.description = InputField::with_value("kept");
        assert_eq!(c.submit_draft(today(), Instant::now()), None);
        assert!(c.store().is_empty());
        assert_eq!(c.notification(), None);
        assert_eq!(c.draft.description.value, "kept");
    }

    #[test]
    fn test_out_of_range_due_adds_without_date() {
        let mut c = controller();
        type_title(&mut c, "x");
        c.draft.due = InputField::with_value("in 999999999w");
        let id = c.submit_draft(today(), Instant::now()).unwrap();
        assert_eq!(c.store().get(id).unwrap().due_date, None);
        assert_eq!(c.notification(), Some("Task added successfully!"));
    }

    #[test]
    fn test_uncategorised_draft_becomes_other() {
        let mut c = controller();
        let id = add(&mut c, "misc", Instant::now());
        assert_eq!(c.store().get(id).unwrap().category, Category::Other);
    }

    #[test]
    fn test_delete_completed_scenario() {
        let mut c = controller();
        let now = Instant::now();
        let done = add(&mut c, "done", now);
        add(&mut c, "open", now);
        assert!(c.toggle_completed(done, now));
        assert_eq!(c.notification(), Some("Task marked as completed"));

        assert!(c.delete(done, now));
        let counts = c.view(today()).counts;
        assert_eq!(counts.total, 1);
        assert_eq!(counts.completed, 0);
        assert_eq!(c.notification(), Some("Task deleted"));
    }

    #[test]
    fn test_missing_ids_are_noops() {
        let mut c = controller();
        let now = Instant::now();
        assert!(!c.delete(99, now));
        assert!(!c.toggle_completed(99, now));
        assert!(!c.toggle_expanded(99));
        assert!(!c.begin_edit(99));
        assert_eq!(c.notification(), None);
    }

    #[test]
    fn test_expand_does_not_notify() {
        let mut c = controller();
        let now = Instant::now();
        let id = add(&mut c, "x", now);
        c.dismiss_notification();
        assert!(c.toggle_expanded(id));
        assert!(c.store().get(id).unwrap().expanded);
        assert_eq!(c.notification(), None);
    }

    #[test]
    fn test_notification_expires_and_is_replaced() {
        let mut c = controller();
        let start = Instant::now();
        let id = add(&mut c, "x", start);

        c.tick(start + Duration::from_secs(2));
        assert!(c.notification().is_some());

        let later = start + Duration::from_secs(2);
        c.toggle_completed(id, later);
        c.tick(start + Duration::from_secs(4));
        assert_eq!(c.notification(), Some("Task marked as completed"));

        c.tick(later + NOTIFICATION_TIMEOUT);
        assert_eq!(c.notification(), None);
    }

    #[test]
    fn test_edit_session() {
        let mut c = controller();
        let now = Instant::now();
        let id = add(&mut c, "draft title", now);
        assert!(c.begin_edit(id));

        let session = c.editing_mut().unwrap();
        session.form.title = InputField::with_value("");
        assert!(!c.commit_edit(today(), now));
        assert!(c.editing().is_some());

        let session = c.editing_mut().unwrap();
        session.form.title = InputField::with_value("Final title");
        session.form.due = InputField::with_value("today");
        assert!(c.commit_edit(today(), now));
        assert!(c.editing().is_none());
        let task = c.store().get(id).unwrap();
        assert_eq!(task.text, "Final title");
        assert_eq!(task.due_date, Some(today()));
        assert_eq!(c.notification(), Some("Task updated"));
    }

    #[test]
    fn test_delete_closes_edit_of_same_task() {
        let mut c = controller();
        let now = Instant::now();
        let id = add(&mut c, "x", now);
        c.begin_edit(id);
        c.delete(id, now);
        assert!(c.editing().is_none());
    }

    #[test]
    fn test_filter_selection_closes_drawer() {
        let mut c = controller();
        let now = Instant::now();
        add(&mut c, "a", now);
        c.draft.category = Some(Category::Work);
        add(&mut c, "b", now);

        c.toggle_drawer();
        assert!(c.drawer_open());
        c.select_filter(ViewFilter::ByCategory(Category::Work));
        assert!(!c.drawer_open());
        assert_eq!(c.view(today()).len(), 1);

        c.select_filter(ViewFilter::All);
        c.set_search("A");
        assert_eq!(c.view(today()).len(), 1);
    }

    #[test]
    fn test_sort_toggle() {
        let mut c = controller();
        assert_eq!(c.view_state().sort, SortKey::Priority);
        c.toggle_sort();
        assert_eq!(c.view_state().sort, SortKey::DueDate);
        c.set_sort(SortKey::Priority);
        assert_eq!(c.view_state().sort, SortKey::Priority);
    }

    #[test]
    fn test_theme_preference_persists() {
        let mut c = controller();
        assert!(!c.dark_mode());
        c.toggle_theme();
        let storage = c.store().persistence().storage().clone();

        let reopened = Controller::new(TaskStore::open(Persistence::new(storage)));
        assert!(reopened.dark_mode());
    }

    #[test]
    fn test_clear_completed() {
        let mut c = controller();
        let now = Instant::now();
        let a = add(&mut c, "a", now);
        add(&mut c, "b", now);
        c.toggle_completed(a, now);
        assert_eq!(c.clear_completed(now), 1);
        assert_eq!(c.notification(), Some("Cleared 1 completed task(s)"));
        assert_eq!(c.store().len(), 1);
    }
}
