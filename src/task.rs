//! Task data structure and related functionality.
//!
//! This module defines the `Task` record owned by the store, the `NewTask`
//! draft used to create one, and the `TaskPatch` applied by inline edits.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::fields::*;

/// A single to-do item.
///
/// Serialised with camelCase keys (`dueDate`) so the stored layout matches
/// `{id, text, completed, category, priority, dueDate, description, expanded}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: u64,
    pub text: String,
    #[serde(default)]
    pub completed: bool,
    #[serde(default)]
    pub category: Category,
    #[serde(default)]
    pub priority: Priority,
    #[serde(default, with = "due_date")]
    pub due_date: Option<NaiveDate>,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub expanded: bool,
}

impl Task {
    /// Whether the task was due strictly before `today`.
    pub fn is_overdue(&self, today: NaiveDate) -> bool {
        self.due_date.is_some_and(|d| d < today)
    }

    pub fn is_due_on(&self, day: NaiveDate) -> bool {
        self.due_date == Some(day)
    }

    /// High priority and still open.
    pub fn is_pressing(&self) -> bool {
        self.priority == Priority::High && !self.completed
    }
}

/// Values captured by the entry form before a task exists.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewTask {
    pub text: String,
    /// `None` when no specific category was picked; stored as `Other`.
    pub category: Option<Category>,
    pub priority: Priority,
    pub due_date: Option<NaiveDate>,
    pub description: String,
}

impl NewTask {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Default::default()
        }
    }

    pub fn category(mut self, category: Category) -> Self {
        self.category = Some(category);
        self
    }

    pub fn priority(mut self, priority: Priority) -> Self {
        self.priority = priority;
        self
    }

    pub fn due(mut self, due: NaiveDate) -> Self {
        self.due_date = Some(due);
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Build the stored record. Returns `None` when the trimmed text is empty.
    pub fn into_task(self, id: u64) -> Option<Task> {
        let text = self.text.trim();
        if text.is_empty() {
            return None;
        }
        Some(Task {
            id,
            text: text.to_string(),
            completed: false,
            category: self.category.unwrap_or_default(),
            priority: self.priority,
            due_date: self.due_date,
            description: self.description.trim().to_string(),
            expanded: false,
        })
    }
}

/// Replacement values for an inline edit. Every field is overwritten.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskPatch {
    pub text: String,
    pub category: Category,
    pub priority: Priority,
    pub due_date: Option<NaiveDate>,
    pub description: String,
}

impl TaskPatch {
    /// Start a patch from the current values of `task`.
    pub fn from_task(task: &Task) -> Self {
        Self {
            text: task.text.clone(),
            category: task.category,
            priority: task.priority,
            due_date: task.due_date,
            description: task.description.clone(),
        }
    }

    /// Apply to `task`. Leaves the task untouched and returns false when the
    /// new text trims to empty.
    pub fn apply(self, task: &mut Task) -> bool {
        let text = self.text.trim();
        if text.is_empty() {
            return false;
        }
        task.text = text.to_string();
        task.category = self.category;
        task.priority = self.priority;
        task.due_date = self.due_date;
        task.description = self.description.trim().to_string();
        true
    }
}

/// `dueDate` is written as `YYYY-MM-DD`. Reading also accepts full ISO-8601
/// timestamps and keeps the calendar date part.
mod due_date {
    use chrono::NaiveDate;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(due: &Option<NaiveDate>, s: S) -> Result<S::Ok, S::Error> {
        match due {
            Some(d) => s.serialize_str(&d.format("%Y-%m-%d").to_string()),
            None => s.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Option<NaiveDate>, D::Error> {
        let raw: Option<String> = Option::deserialize(d)?;
        let Some(raw) = raw else { return Ok(None) };
        let raw = raw.trim();
        if raw.is_empty() {
            return Ok(None);
        }
        let day = raw.get(..10).unwrap_or(raw);
        NaiveDate::parse_from_str(day, "%Y-%m-%d")
            .map(Some)
            .map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_into_task_defaults() {
        let task = NewTask::new("  Buy milk  ").into_task(7).unwrap();
        assert_eq!(task.id, 7);
        assert_eq!(task.text, "Buy milk");
        assert!(!task.completed);
        assert!(!task.expanded);
        assert_eq!(task.category, Category::Other);
        assert_eq!(task.priority, Priority::Medium);
        assert_eq!(task.due_date, None);
    }

    #[test]
    fn test_into_task_rejects_blank() {
        assert!(NewTask::new("").into_task(1).is_none());
        assert!(NewTask::new(" \t\n").into_task(1).is_none());
    }

    #[test]
    fn test_json_layout() {
        let task = NewTask::new("Dentist")
            .category(Category::Health)
            .priority(Priority::High)
            .due(ymd(2024, 5, 1))
            .into_task(42)
            .unwrap();
        let value = serde_json::to_value(&task).unwrap();
        assert_eq!(
            value,
            serde_json::json!({
                "id": 42,
                "text": "Dentist",
                "completed": false,
                "category": "Health",
                "priority": "High",
                "dueDate": "2024-05-01",
                "description": "",
                "expanded": false
            })
        );
    }

    #[test]
    fn test_due_date_accepts_timestamps_and_null() {
        let json = r#"[
            {"id":1,"text":"a","completed":false,"category":"Work","priority":"Low",
             "dueDate":"2024-05-01T00:00:00.000Z","description":"","expanded":false},
            {"id":2,"text":"b","completed":true,"category":"Other","priority":"Medium",
             "dueDate":null,"description":"x","expanded":true}
        ]"#;
        let tasks: Vec<Task> = serde_json::from_str(json).unwrap();
        assert_eq!(tasks[0].due_date, Some(ymd(2024, 5, 1)));
        assert_eq!(tasks[1].due_date, None);
        assert!(tasks[1].expanded);
    }

    #[test]
    fn test_patch_rejects_blank_text() {
        let mut task = NewTask::new("Original").into_task(1).unwrap();
        let mut patch = TaskPatch::from_task(&task);
        patch.text = "   ".into();
        patch.priority = Priority::High;
        assert!(!patch.apply(&mut task));
        assert_eq!(task.text, "Original");
        assert_eq!(task.priority, Priority::Medium);
    }

    #[test]
    fn test_overdue_is_strict() {
        let today = ymd(2024, 5, 10);
        let mut task = NewTask::new("x").due(ymd(2024, 5, 9)).into_task(1).unwrap();
        assert!(task.is_overdue(today));
        task.due_date = Some(today);
        assert!(!task.is_overdue(today));
        assert!(task.is_due_on(today));
    }
}
