//! Task form state shared by the entry form and inline edits.

use chrono::NaiveDate;

use crate::dates::parse_due_input;
use crate::fields::{Category, Priority};
use crate::input::InputField;
use crate::task::{NewTask, Task, TaskPatch};

/// Form fields in focus order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FormField {
    #[default]
    Title,
    Description,
    Due,
    Category,
    Priority,
}

impl FormField {
    const ORDER: [FormField; 5] = [
        FormField::Title,
        FormField::Description,
        FormField::Due,
        FormField::Category,
        FormField::Priority,
    ];

    fn index(self) -> usize {
        Self::ORDER.iter().position(|f| *f == self).unwrap_or(0)
    }

    pub fn next(self) -> Self {
        Self::ORDER[(self.index() + 1) % Self::ORDER.len()]
    }

    pub fn prev(self) -> Self {
        Self::ORDER[(self.index() + Self::ORDER.len() - 1) % Self::ORDER.len()]
    }

    pub fn is_text(self) -> bool {
        matches!(self, FormField::Title | FormField::Description | FormField::Due)
    }
}

/// Draft values for a task being created or edited.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskForm {
    pub title: InputField,
    pub description: InputField,
    /// Due date as typed; parsed on submit.
    pub due: InputField,
    /// `None` until a category is picked.
    pub category: Option<Category>,
    pub priority: Priority,
    pub focus: FormField,
}

impl TaskForm {
    pub fn new() -> Self {
        Self::default()
    }

    /// Prefill from an existing task for editing.
    pub fn from_task(task: &Task) -> Self {
        Self {
            title: InputField::with_value(&task.text),
            description: InputField::with_value(&task.description),
            due: InputField::with_value(
                &task
                    .due_date
                    .map(|d| d.format("%Y-%m-%d").to_string())
                    .unwrap_or_default(),
            ),
            category: Some(task.category),
            priority: task.priority,
            focus: FormField::Title,
        }
    }

    pub fn clear(&mut self) {
        *self = Self::new();
    }

    /// The text input under focus, if the focused field is a text field.
    pub fn focused_input_mut(&mut self) -> Option<&mut InputField> {
        match self.focus {
            FormField::Title => Some(&mut self.title),
            FormField::Description => Some(&mut self.description),
            FormField::Due => Some(&mut self.due),
            FormField::Category | FormField::Priority => None,
        }
    }

    pub fn focus_next(&mut self) {
        self.focus = self.focus.next();
    }

    pub fn focus_prev(&mut self) {
        self.focus = self.focus.prev();
    }

    /// Step through `None` and every category.
    pub fn cycle_category(&mut self, forward: bool) {
        let mut options: Vec<Option<Category>> = vec![None];
        options.extend(Category::ALL.iter().copied().map(Some));
        let idx = options.iter().position(|c| *c == self.category).unwrap_or(0);
        let n = options.len();
        let next = if forward { (idx + 1) % n } else { (idx + n - 1) % n };
        self.category = options[next];
    }

    pub fn cycle_priority(&mut self, forward: bool) {
        let all = Priority::ALL;
        let idx = all.iter().position(|p| *p == self.priority).unwrap_or(1);
        let n = all.len();
        let next = if forward { (idx + 1) % n } else { (idx + n - 1) % n };
        self.priority = all[next];
    }

    /// Parsed due date; `None` for empty or unparseable input.
    pub fn due_date(&self, today: NaiveDate) -> Option<NaiveDate> {
        parse_due_input(&self.due.value, today)
    }

    /// True when something was typed in the due field but it does not parse.
    pub fn due_is_invalid(&self, today: NaiveDate) -> bool {
        !self.due.value.trim().is_empty() && self.due_date(today).is_none()
    }

    pub fn to_new_task(&self, today: NaiveDate) -> NewTask {
        NewTask {
            text: self.title.value.clone(),
            category: self.category,
            priority: self.priority,
            due_date: self.due_date(today),
            description: self.description.value.clone(),
        }
    }

    pub fn to_patch(&self, today: NaiveDate) -> TaskPatch {
        TaskPatch {
            text: self.title.value.clone(),
            category: self.category.unwrap_or_default(),
            priority: self.priority,
            due_date: self.due_date(today),
            description: self.description.value.clone(),
        }
    }
}
