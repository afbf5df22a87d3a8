//! Document-style task repository backing the HTTP API.
//!
//! [`TaskRepo`] holds the task collection in memory behind a [`RwLock`] and
//! optionally snapshots it to a JSON file after every mutation. The snapshot
//! gives the repository its durability; loading tolerates a missing or
//! corrupt file by starting from an empty collection.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use tokio::sync::RwLock;

use taskdeck_proto::stats::{self, TaskStats};
use taskdeck_proto::task::{
    Category, NewTask, Priority, Task, TaskId, TaskPatch, ValidationError, sort_newest_first,
};

/// Errors returned by repository mutations.
#[derive(Debug, thiserror::Error)]
pub enum RepoError {
    /// No task with the given id exists.
    #[error("task not found: {0}")]
    NotFound(TaskId),

    /// The payload failed validation; nothing was written.
    #[error(transparent)]
    Validation(#[from] ValidationError),
}

/// Task collection with optional JSON snapshot durability.
///
/// Thread-safe via [`RwLock`]; each operation takes the lock for its full
/// read-modify-write so mutations are atomic with respect to each other.
pub struct TaskRepo {
    tasks: RwLock<HashMap<TaskId, Task>>,
    snapshot: Option<PathBuf>,
}

impl Default for TaskRepo {
    fn default() -> Self {
        Self::in_memory()
    }
}

impl TaskRepo {
    /// Creates an empty repository with no durability.
    #[must_use]
    pub fn in_memory() -> Self {
        Self {
            tasks: RwLock::new(HashMap::new()),
            snapshot: None,
        }
    }

    /// Opens a repository backed by a snapshot file.
    ///
    /// A missing file starts the collection empty; an unparsable file is
    /// logged and likewise treated as empty, never as a fatal error.
    #[must_use]
    pub fn open(snapshot: PathBuf) -> Self {
        let tasks = load_snapshot(&snapshot);
        Self {
            tasks: RwLock::new(tasks),
            snapshot: Some(snapshot),
        }
    }

    /// Returns all tasks, newest first.
    pub async fn list(&self) -> Vec<Task> {
        let tasks = self.tasks.read().await;
        let mut all: Vec<Task> = tasks.values().cloned().collect();
        sort_newest_first(&mut all);
        all
    }

    /// Returns all tasks in a category, newest first.
    pub async fn list_by_category(&self, category: Category) -> Vec<Task> {
        let tasks = self.tasks.read().await;
        let mut matching: Vec<Task> = tasks
            .values()
            .filter(|t| t.category == category)
            .cloned()
            .collect();
        sort_newest_first(&mut matching);
        matching
    }

    /// Returns all tasks at a priority, newest first.
    pub async fn list_by_priority(&self, priority: Priority) -> Vec<Task> {
        let tasks = self.tasks.read().await;
        let mut matching: Vec<Task> = tasks
            .values()
            .filter(|t| t.priority == priority)
            .cloned()
            .collect();
        sort_newest_first(&mut matching);
        matching
    }

    /// Returns one task by id.
    pub async fn get(&self, id: TaskId) -> Option<Task> {
        let tasks = self.tasks.read().await;
        tasks.get(&id).cloned()
    }

    /// Validates and stores a new task, returning the stored record.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::EmptyTitle`] if the trimmed title is
    /// empty; nothing is written in that case.
    pub async fn create(&self, payload: NewTask) -> Result<Task, ValidationError> {
        let task = Task::create(payload)?;
        let mut tasks = self.tasks.write().await;
        tasks.insert(task.id, task.clone());
        self.persist(&tasks);
        Ok(task)
    }

    /// Merges a patch into an existing task and refreshes `updatedAt`.
    ///
    /// # Errors
    ///
    /// Returns [`RepoError::NotFound`] for an unknown id and
    /// [`RepoError::Validation`] for an invalid patch; the stored record is
    /// unchanged on either error.
    pub async fn update(&self, id: TaskId, patch: TaskPatch) -> Result<Task, RepoError> {
        let mut tasks = self.tasks.write().await;
        let task = tasks.get_mut(&id).ok_or(RepoError::NotFound(id))?;
        task.apply(patch)?;
        let updated = task.clone();
        self.persist(&tasks);
        Ok(updated)
    }

    /// Flips a task's completion in one atomic step.
    ///
    /// # Errors
    ///
    /// Returns [`RepoError::NotFound`] for an unknown id.
    pub async fn toggle(&self, id: TaskId) -> Result<Task, RepoError> {
        let mut tasks = self.tasks.write().await;
        let task = tasks.get_mut(&id).ok_or(RepoError::NotFound(id))?;
        task.toggle();
        let toggled = task.clone();
        self.persist(&tasks);
        Ok(toggled)
    }

    /// Hard-removes a task. No tombstone is kept.
    ///
    /// # Errors
    ///
    /// Returns [`RepoError::NotFound`] for an unknown id.
    pub async fn delete(&self, id: TaskId) -> Result<Task, RepoError> {
        let mut tasks = self.tasks.write().await;
        let removed = tasks.remove(&id).ok_or(RepoError::NotFound(id))?;
        self.persist(&tasks);
        Ok(removed)
    }

    /// Computes aggregate statistics from current state.
    pub async fn stats(&self) -> TaskStats {
        let tasks = self.tasks.read().await;
        let all: Vec<Task> = tasks.values().cloned().collect();
        stats::compute(&all)
    }

    /// Writes the snapshot file if one is configured.
    ///
    /// Write failures are logged and swallowed: a failed snapshot must not
    /// fail the request that triggered it.
    fn persist(&self, tasks: &HashMap<TaskId, Task>) {
        let Some(path) = &self.snapshot else {
            return;
        };
        let mut all: Vec<&Task> = tasks.values().collect();
        all.sort_by_key(|t| t.id);
        match serde_json::to_vec_pretty(&all) {
            Ok(bytes) => {
                if let Some(parent) = path.parent()
                    && let Err(e) = std::fs::create_dir_all(parent)
                {
                    tracing::warn!(path = %path.display(), error = %e, "snapshot dir create failed");
                    return;
                }
                if let Err(e) = std::fs::write(path, bytes) {
                    tracing::warn!(path = %path.display(), error = %e, "snapshot write failed");
                }
            }
            Err(e) => {
                tracing::warn!(error = %e, "snapshot serialization failed");
            }
        }
    }
}

/// Loads a snapshot file into a task map, treating absence or corruption as
/// an empty collection.
fn load_snapshot(path: &Path) -> HashMap<TaskId, Task> {
    let contents = match std::fs::read_to_string(path) {
        Ok(c) => c,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return HashMap::new(),
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "snapshot read failed, starting empty");
            return HashMap::new();
        }
    };
    match serde_json::from_str::<Vec<Task>>(&contents) {
        Ok(tasks) => tasks.into_iter().map(|t| (t.id, t)).collect(),
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "snapshot unparsable, starting empty");
            HashMap::new()
        }
    }
}
