//! The task store: one operation surface over two persistence backends.
//!
//! Every operation attempts the remote task service first. When the call
//! fails in transport or comes back with an unexpected status, the store
//! performs the equivalent mutation against the fallback blob instead —
//! for that call only. There is no sticky offline mode and no health-check
//! cache; the choice is re-evaluated per call. After every mutation the
//! in-memory cache is replaced by a fresh [`TaskStore::load`], so the store
//! never trusts its own cache as authoritative.
//!
//! Connectivity failures are absorbed silently; the only errors a caller
//! ever sees are validation and not-found. A session that flaps between
//! backends can leave some tasks remote-only and others blob-only — the
//! store deliberately does not migrate records between backends.

use taskdeck_proto::stats::{self, TaskStats};
use taskdeck_proto::task::{
    Category, NewTask, Priority, Task, TaskId, TaskPatch, sort_newest_first,
};

use crate::api::{ApiError, RemoteApi};
use crate::fallback::FallbackStore;

/// Errors surfaced to the presentation layer.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum StoreError {
    /// Title empty after trimming; checked before any backend call.
    #[error("task title cannot be empty")]
    EmptyTitle,

    /// The remote service rejected the payload.
    #[error("invalid task: {0}")]
    Validation(String),

    /// No task with the given id, on whichever backend answered.
    #[error("task not found: {0}")]
    NotFound(TaskId),
}

/// Which page the presentation layer is currently showing.
///
/// Owned here so the current-page value travels with the collection instead
/// of living in an ambient global.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ActiveView {
    /// Recent tasks plus statistics.
    #[default]
    Dashboard,
    /// The full, filterable task list.
    AllTasks,
}

/// Unified task store over the remote service and the fallback blob.
///
/// Operations take `&mut self` and run to completion before the next one
/// begins; the store does not defend against concurrent invocations racing
/// on the cache.
pub struct TaskStore {
    api: RemoteApi,
    fallback: FallbackStore,
    tasks: Vec<Task>,
    view: ActiveView,
}

impl TaskStore {
    /// Creates a store over the given backends with an empty cache.
    #[must_use]
    pub fn new(api: RemoteApi, fallback: FallbackStore) -> Self {
        Self {
            api,
            fallback,
            tasks: Vec::new(),
            view: ActiveView::default(),
        }
    }

    /// Replaces the cache from whichever backend answers, newest first.
    pub async fn load(&mut self) -> &[Task] {
        let mut tasks = match self.api.list().await {
            Ok(tasks) => tasks,
            Err(e) => {
                tracing::debug!(error = %e, "remote list failed, reading fallback blob");
                self.fallback.read_all()
            }
        };
        sort_newest_first(&mut tasks);
        self.tasks = tasks;
        &self.tasks
    }

    /// The cached collection as of the last [`load`](Self::load).
    #[must_use]
    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    /// Cached tasks in one category, preserving newest-first order.
    #[must_use]
    pub fn tasks_by_category(&self, category: Category) -> Vec<&Task> {
        self.tasks
            .iter()
            .filter(|t| t.category == category)
            .collect()
    }

    /// Cached tasks at one priority, preserving newest-first order.
    #[must_use]
    pub fn tasks_by_priority(&self, priority: Priority) -> Vec<&Task> {
        self.tasks
            .iter()
            .filter(|t| t.priority == priority)
            .collect()
    }

    /// The page the presentation layer is showing.
    #[must_use]
    pub const fn view(&self) -> ActiveView {
        self.view
    }

    /// Records a page switch.
    pub const fn set_view(&mut self, view: ActiveView) {
        self.view = view;
    }

    /// Adds a task, returning the stored record.
    ///
    /// The title check runs before any backend call, so a rejected payload
    /// leaves both backends untouched.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::EmptyTitle`] or [`StoreError::Validation`].
    pub async fn add(&mut self, payload: NewTask) -> Result<Task, StoreError> {
        payload
            .validate()
            .map_err(|_| StoreError::EmptyTitle)?;

        let task = match self.api.create(&payload).await {
            Ok(task) => task,
            Err(ApiError::Validation(message)) => return Err(StoreError::Validation(message)),
            // Create has no not-found case; everything else means the
            // remote is unavailable for this call.
            Err(e) => {
                tracing::debug!(error = %e, "remote create failed, adding to fallback blob");
                self.add_local(payload)?
            }
        };
        self.load().await;
        Ok(task)
    }

    /// Merges a partial patch into an existing task.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::EmptyTitle`], [`StoreError::Validation`], or
    /// [`StoreError::NotFound`].
    pub async fn update(&mut self, id: TaskId, patch: TaskPatch) -> Result<Task, StoreError> {
        patch.validate().map_err(|_| StoreError::EmptyTitle)?;

        let task = match self.api.update(id, &patch).await {
            Ok(task) => task,
            Err(ApiError::NotFound) => return Err(StoreError::NotFound(id)),
            Err(ApiError::Validation(message)) => return Err(StoreError::Validation(message)),
            Err(e) => {
                tracing::debug!(error = %e, "remote update failed, patching fallback blob");
                self.update_local(id, patch)?
            }
        };
        self.load().await;
        Ok(task)
    }

    /// Flips a task's completion.
    ///
    /// The remote toggle is a single atomic server-side step; if the task
    /// has disappeared in the meantime this reports not-found and the UI
    /// simply no-ops.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NotFound`].
    pub async fn toggle(&mut self, id: TaskId) -> Result<Task, StoreError> {
        let task = match self.api.toggle(id).await {
            Ok(task) => task,
            Err(ApiError::NotFound) => return Err(StoreError::NotFound(id)),
            Err(ApiError::Validation(message)) => return Err(StoreError::Validation(message)),
            Err(e) => {
                tracing::debug!(error = %e, "remote toggle failed, toggling in fallback blob");
                self.toggle_local(id)?
            }
        };
        self.load().await;
        Ok(task)
    }

    /// Deletes a task. Destructive and irreversible; callers are expected
    /// to put an explicit confirmation step in front of this.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NotFound`].
    pub async fn delete(&mut self, id: TaskId) -> Result<(), StoreError> {
        match self.api.delete(id).await {
            Ok(_) => {}
            Err(ApiError::NotFound) => return Err(StoreError::NotFound(id)),
            Err(ApiError::Validation(message)) => return Err(StoreError::Validation(message)),
            Err(e) => {
                tracing::debug!(error = %e, "remote delete failed, removing from fallback blob");
                self.delete_local(id)?;
            }
        }
        self.load().await;
        Ok(())
    }

    /// Aggregate statistics from whichever backend answers.
    pub async fn stats(&self) -> TaskStats {
        match self.api.stats().await {
            Ok(stats) => stats,
            Err(e) => {
                tracing::debug!(error = %e, "remote stats failed, computing from fallback blob");
                stats::compute(&self.fallback.read_all())
            }
        }
    }

    // -- local fallback mutations -------------------------------------------
    //
    // The blob has no query capability, so each mutation is a full
    // read-modify-write of the collection.

    fn add_local(&self, payload: NewTask) -> Result<Task, StoreError> {
        let mut all = self.fallback.read_all();
        let task = Task::create(payload).map_err(|_| StoreError::EmptyTitle)?;
        all.push(task.clone());
        self.persist(&all);
        Ok(task)
    }

    fn update_local(&self, id: TaskId, patch: TaskPatch) -> Result<Task, StoreError> {
        let mut all = self.fallback.read_all();
        let task = all
            .iter_mut()
            .find(|t| t.id == id)
            .ok_or(StoreError::NotFound(id))?;
        task.apply(patch).map_err(|_| StoreError::EmptyTitle)?;
        let updated = task.clone();
        self.persist(&all);
        Ok(updated)
    }

    fn toggle_local(&self, id: TaskId) -> Result<Task, StoreError> {
        let mut all = self.fallback.read_all();
        let task = all
            .iter_mut()
            .find(|t| t.id == id)
            .ok_or(StoreError::NotFound(id))?;
        task.toggle();
        let toggled = task.clone();
        self.persist(&all);
        Ok(toggled)
    }

    fn delete_local(&self, id: TaskId) -> Result<(), StoreError> {
        let mut all = self.fallback.read_all();
        let before = all.len();
        all.retain(|t| t.id != id);
        if all.len() == before {
            return Err(StoreError::NotFound(id));
        }
        self.persist(&all);
        Ok(())
    }

    /// Writes the blob, logging failures. A failed write leaves the user
    /// with a stale list at worst; it never fails the operation.
    fn persist(&self, all: &[Task]) {
        if let Err(e) = self.fallback.write_all(all) {
            tracing::warn!(
                path = %self.fallback.path().display(),
                error = %e,
                "fallback blob write failed"
            );
        }
    }
}
