//! The task store: owner of every `Task` and the only place they change.
//!
//! Each successful mutation is written through to the persistence bridge
//! before the call returns. Missing ids and blank titles are silent no-ops.

use std::collections::HashSet;

use chrono::Utc;
use tracing::{debug, info, warn};

use crate::persist::Persistence;
use crate::storage::Storage;
use crate::task::{NewTask, Task, TaskPatch};

/// Hands out ids derived from the creation time in milliseconds, bumped past
/// the last id issued so two tasks created in the same millisecond still get
/// distinct ids.
#[derive(Debug, Clone, Default)]
pub struct IdGenerator {
    last: u64,
}

impl IdGenerator {
    /// Start above every id in `tasks`.
    pub fn after(tasks: &[Task]) -> Self {
        Self {
            last: tasks.iter().map(|t| t.id).max().unwrap_or(0),
        }
    }

    /// Next id for a task created at `now_ms`, or `None` once `u64::MAX`
    /// has been handed out.
    pub fn next_at(&mut self, now_ms: u64) -> Option<u64> {
        let id = now_ms.max(self.last.checked_add(1)?);
        self.last = id;
        Some(id)
    }

    pub fn is_exhausted(&self) -> bool {
        self.last == u64::MAX
    }

    pub fn next(&mut self) -> Option<u64> {
        let now_ms = u64::try_from(Utc::now().timestamp_millis()).unwrap_or(0);
        self.next_at(now_ms)
    }
}

/// In-memory task collection with write-through persistence.
#[derive(Debug)]
pub struct TaskStore<S> {
    tasks: Vec<Task>,
    persistence: Persistence<S>,
    ids: IdGenerator,
}

impl<S: Storage> TaskStore<S> {
    /// Load the stored tasks once and take ownership of the bridge.
    pub fn open(persistence: Persistence<S>) -> Self {
        let mut tasks = persistence.load();
        let mut ids = IdGenerator::after(&tasks);

        if ids.is_exhausted() {
            warn!(count = tasks.len(), "stored task ids out of range, renumbering");
            for (task, id) in tasks.iter_mut().zip(1..) {
                task.id = id;
            }
            ids = IdGenerator::after(&tasks);
        }

        let mut seen = HashSet::new();
        for task in tasks.iter_mut() {
            if !seen.insert(task.id) {
                let Some(fresh) = ids.next() else {
                    warn!(id = task.id, "no free task id for duplicate, left as is");
                    continue;
                };
                warn!(old = task.id, new = fresh, "duplicate task id in storage, reassigned");
                task.id = fresh;
                seen.insert(fresh);
            }
        }

        info!(count = tasks.len(), "task store opened");
        Self {
            tasks,
            persistence,
            ids,
        }
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Get a task by ID.
    pub fn get(&self, id: u64) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == id)
    }

    fn get_mut(&mut self, id: u64) -> Option<&mut Task> {
        self.tasks.iter_mut().find(|t| t.id == id)
    }

    pub fn persistence(&self) -> &Persistence<S> {
        &self.persistence
    }

    pub fn persistence_mut(&mut self) -> &mut Persistence<S> {
        &mut self.persistence
    }

    /// Create a task from `draft`. Returns `None` when the title is blank.
    pub fn add(&mut self, draft: NewTask) -> Option<&Task> {
        if draft.text.trim().is_empty() {
            debug!("ignoring add with empty title");
            return None;
        }
        let Some(id) = self.ids.next() else {
            warn!("task ids exhausted, not adding");
            return None;
        };
        let task = draft.into_task(id)?;
        info!(id, text = %task.text, "task added");
        self.tasks.push(task);
        self.write_through();
        self.tasks.last()
    }

    /// Remove the task with `id`, returning it if it existed.
    pub fn remove(&mut self, id: u64) -> Option<Task> {
        let idx = self.tasks.iter().position(|t| t.id == id)?;
        let removed = self.tasks.remove(idx);
        info!(id, "task removed");
        self.write_through();
        Some(removed)
    }

    /// Flip `completed`; returns the new value.
    pub fn toggle_completed(&mut self, id: u64) -> Option<bool> {
        let task = self.get_mut(id)?;
        task.completed = !task.completed;
        let completed = task.completed;
        info!(id, completed, "task completion toggled");
        self.write_through();
        Some(completed)
    }

    /// Flip the description-visible flag; returns the new value.
    pub fn toggle_expanded(&mut self, id: u64) -> Option<bool> {
        let task = self.get_mut(id)?;
        task.expanded = !task.expanded;
        let expanded = task.expanded;
        self.write_through();
        Some(expanded)
    }

    /// Overwrite the editable fields of a task. Blank titles are rejected.
    pub fn update(&mut self, id: u64, patch: TaskPatch) -> Option<&Task> {
        let task = self.get_mut(id)?;
        if !patch.apply(task) {
            debug!(id, "ignoring edit with empty title");
            return None;
        }
        info!(id, "task updated");
        self.write_through();
        self.get(id)
    }

    /// Drop every completed task; returns how many were removed.
    pub fn clear_completed(&mut self) -> usize {
        let before = self.tasks.len();
        self.tasks.retain(|t| !t.completed);
        let removed = before - self.tasks.len();
        if removed > 0 {
            info!(removed, "cleared completed tasks");
            self.write_through();
        }
        removed
    }

    fn write_through(&mut self) {
        if let Err(e) = self.persistence.save(&self.tasks) {
            warn!(error = %e, "Error saving tasks");
        }
    }
}
