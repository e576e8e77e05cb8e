//! Persistence bridge between the task store and a key-value storage.
//!
//! Two fixed slots are used: the ordered task list and the dark-mode flag.
//! Reads never fail: missing or corrupt values fall back to an empty list and
//! the light theme, with a warning in the log.

use tracing::{debug, warn};

use crate::error::Result;
use crate::storage::Storage;
use crate::task::Task;

/// Slot holding the JSON array of tasks.
pub const TASKS_KEY: &str = "tasks";
/// Slot holding the dark-mode boolean.
pub const THEME_KEY: &str = "darkMode";

/// Typed load/save on top of a `Storage`.
#[derive(Debug, Clone)]
pub struct Persistence<S> {
    storage: S,
}

impl<S: Storage> Persistence<S> {
    pub fn new(storage: S) -> Self {
        Self { storage }
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    /// Load the stored task list, or an empty list if absent or unreadable.
    /// Titles are trimmed and records left without one are dropped.
    pub fn load(&self) -> Vec<Task> {
        let raw = match self.storage.read(TASKS_KEY) {
            Ok(Some(raw)) => raw,
            Ok(None) => return Vec::new(),
            Err(e) => {
                warn!(error = %e, "Error reading tasks, starting fresh");
                return Vec::new();
            }
        };
        match serde_json::from_str::<Vec<Task>>(&raw) {
            Ok(mut tasks) => {
                tasks.retain_mut(|task| {
                    let trimmed = task.text.trim();
                    if trimmed.is_empty() {
                        warn!(id = task.id, "dropping stored task with empty title");
                        return false;
                    }
                    if trimmed.len() != task.text.len() {
                        task.text = trimmed.to_string();
                    }
                    true
                });
                debug!(count = tasks.len(), "loaded tasks");
                tasks
            }
            Err(e) => {
                warn!(error = %e, "Error parsing tasks, starting fresh");
                Vec::new()
            }
        }
    }

    /// Replace the stored task list.
    pub fn save(&mut self, tasks: &[Task]) -> Result<()> {
        let data = serde_json::to_string_pretty(tasks)?;
        self.storage.write(TASKS_KEY, &data)?;
        debug!(count = tasks.len(), "saved tasks");
        Ok(())
    }

    /// Stored dark-mode flag; `false` if absent or unreadable.
    pub fn load_theme_preference(&self) -> bool {
        match self.storage.read(THEME_KEY) {
            Ok(Some(raw)) => serde_json::from_str(&raw).unwrap_or_else(|e| {
                warn!(error = %e, "Error parsing theme preference, using light theme");
                false
            }),
            Ok(None) => false,
            Err(e) => {
                warn!(error = %e, "Error reading theme preference, using light theme");
                false
            }
        }
    }

    pub fn save_theme_preference(&mut self, dark: bool) -> Result<()> {
        self.storage.write(THEME_KEY, &serde_json::to_string(&dark)?)
    }
}
