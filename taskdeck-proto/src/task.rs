//! Task entity and mutation payload types for TaskDeck.
//!
//! Defines the [`Task`] record, its enums, and the payloads used to create
//! and patch tasks over the wire. The `status` field is a derived mirror of
//! the `completed` boolean; every constructor and mutation helper in this
//! module keeps the pair in agreement.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Errors raised when a task payload fails validation.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ValidationError {
    /// Task title is empty or whitespace-only after trimming.
    #[error("task title cannot be empty")]
    EmptyTitle,
}

/// Unique identifier for a task, based on UUID v7 for time-ordering.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct TaskId(Uuid);

impl TaskId {
    /// Creates a new time-ordered task identifier (UUID v7).
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }

    /// Creates a `TaskId` from an existing UUID.
    #[must_use]
    pub const fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Returns the inner UUID value.
    #[must_use]
    pub const fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for TaskId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for TaskId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for TaskId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s)
            .map(Self)
            .map_err(|e| format!("invalid task id: {e}"))
    }
}

/// Priority of a task.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    /// Can wait.
    Low,
    /// Normal urgency (the default).
    #[default]
    Medium,
    /// Needs attention soon.
    High,
}

impl Priority {
    /// All priority values, in ascending order of urgency.
    pub const ALL: [Self; 3] = [Self::Low, Self::Medium, Self::High];
}

impl std::fmt::Display for Priority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Low => write!(f, "low"),
            Self::Medium => write!(f, "medium"),
            Self::High => write!(f, "high"),
        }
    }
}

impl std::str::FromStr for Priority {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "low" => Ok(Self::Low),
            "medium" => Ok(Self::Medium),
            "high" => Ok(Self::High),
            other => Err(format!("unknown priority: {other}")),
        }
    }
}

/// Category a task is filed under.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    /// Work-related tasks.
    Work,
    /// Personal errands.
    Personal,
    /// Shopping lists.
    Shopping,
    /// Health and fitness.
    Health,
    /// Everything else (the default).
    #[default]
    Other,
}

impl Category {
    /// All category values.
    pub const ALL: [Self; 5] = [
        Self::Work,
        Self::Personal,
        Self::Shopping,
        Self::Health,
        Self::Other,
    ];
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Work => write!(f, "work"),
            Self::Personal => write!(f, "personal"),
            Self::Shopping => write!(f, "shopping"),
            Self::Health => write!(f, "health"),
            Self::Other => write!(f, "other"),
        }
    }
}

impl std::str::FromStr for Category {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "work" => Ok(Self::Work),
            "personal" => Ok(Self::Personal),
            "shopping" => Ok(Self::Shopping),
            "health" => Ok(Self::Health),
            "other" => Ok(Self::Other),
            unknown => Err(format!("unknown category: {unknown}")),
        }
    }
}

/// Completion status of a task. Always mirrors the `completed` boolean.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    /// Task is still open.
    #[default]
    Pending,
    /// Task has been completed.
    Completed,
}

impl Status {
    /// Returns the status that corresponds to a `completed` flag.
    #[must_use]
    pub const fn from_completed(completed: bool) -> Self {
        if completed { Self::Completed } else { Self::Pending }
    }

    /// Returns the `completed` flag that corresponds to this status.
    #[must_use]
    pub const fn is_completed(self) -> bool {
        matches!(self, Self::Completed)
    }
}

impl std::fmt::Display for Status {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Pending => write!(f, "pending"),
            Self::Completed => write!(f, "completed"),
        }
    }
}

/// A persisted to-do record.
///
/// `status` and `completed` are redundant encodings of one boolean and must
/// never disagree; use [`Task::create`], [`Task::apply`], and
/// [`Task::toggle`] rather than mutating the fields directly.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    /// Unique identifier, assigned at creation, immutable.
    pub id: TaskId,
    /// Short description of the work. Non-empty after trimming.
    pub title: String,
    /// Optional free-form detail.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Urgency of the task.
    pub priority: Priority,
    /// Category the task is filed under.
    pub category: Category,
    /// Derived mirror of `completed`.
    pub status: Status,
    /// Whether the task is done.
    pub completed: bool,
    /// Optional due date. May be in the past.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deadline: Option<DateTime<Utc>>,
    /// Set once at creation, never modified.
    pub created_at: DateTime<Utc>,
    /// Refreshed on every mutation.
    pub updated_at: DateTime<Utc>,
}

impl Task {
    /// Builds a stored task from a create payload, assigning the id and
    /// timestamps and deriving `status` from `completed`.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::EmptyTitle`] if the trimmed title is empty.
    pub fn create(payload: NewTask) -> Result<Self, ValidationError> {
        payload.validate()?;
        let now = Utc::now();
        Ok(Self {
            id: TaskId::new(),
            title: payload.title.trim().to_string(),
            description: payload.description,
            priority: payload.priority,
            category: payload.category,
            status: Status::from_completed(payload.completed),
            completed: payload.completed,
            deadline: payload.deadline,
            created_at: now,
            updated_at: now,
        })
    }

    /// Merges a partial patch into this task and refreshes `updated_at`.
    ///
    /// If the patch carries `completed`, `status` is re-derived from it; a
    /// patch carrying only `status` syncs `completed` instead. `id` and
    /// `created_at` are never touched.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::EmptyTitle`] if the patch sets the title
    /// to an empty or whitespace-only string. The task is unchanged on error.
    pub fn apply(&mut self, patch: TaskPatch) -> Result<(), ValidationError> {
        patch.validate()?;
        if let Some(title) = patch.title {
            self.title = title.trim().to_string();
        }
        if let Some(description) = patch.description {
            self.description = Some(description);
        }
        if let Some(priority) = patch.priority {
            self.priority = priority;
        }
        if let Some(category) = patch.category {
            self.category = category;
        }
        if let Some(deadline) = patch.deadline {
            self.deadline = Some(deadline);
        }
        if let Some(completed) = patch.completed {
            self.completed = completed;
            self.status = Status::from_completed(completed);
        } else if let Some(status) = patch.status {
            self.status = status;
            self.completed = status.is_completed();
        }
        self.updated_at = Utc::now();
        Ok(())
    }

    /// Flips `completed`, syncs `status`, and refreshes `updated_at` in one
    /// step.
    pub fn toggle(&mut self) {
        self.completed = !self.completed;
        self.status = Status::from_completed(self.completed);
        self.updated_at = Utc::now();
    }
}

/// Payload for creating a task. Every optional field has a serde default so
/// sparse JSON bodies deserialize cleanly.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewTask {
    /// Required title; validated non-empty after trimming.
    pub title: String,
    /// Optional free-form detail.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Defaults to [`Priority::Medium`].
    #[serde(default)]
    pub priority: Priority,
    /// Defaults to [`Category::Other`].
    #[serde(default)]
    pub category: Category,
    /// Defaults to `false`.
    #[serde(default)]
    pub completed: bool,
    /// Optional due date.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deadline: Option<DateTime<Utc>>,
}

impl NewTask {
    /// Convenience constructor for a payload with only a title.
    #[must_use]
    pub fn titled(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Self::default()
        }
    }

    /// Checks the payload before any backend work.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::EmptyTitle`] if the trimmed title is empty.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.title.trim().is_empty() {
            return Err(ValidationError::EmptyTitle);
        }
        Ok(())
    }
}

/// Partial update payload. Absent fields leave the task untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskPatch {
    /// New title, validated non-empty after trimming when present.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// New description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// New priority.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<Priority>,
    /// New category.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<Category>,
    /// New completion flag; also re-derives `status`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed: Option<bool>,
    /// New status; also syncs `completed` when `completed` is absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<Status>,
    /// New deadline.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deadline: Option<DateTime<Utc>>,
}

impl TaskPatch {
    /// Checks the patch before any backend work.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::EmptyTitle`] if a title is present and
    /// empty after trimming.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if let Some(title) = &self.title
            && title.trim().is_empty()
        {
            return Err(ValidationError::EmptyTitle);
        }
        Ok(())
    }
}

/// Sorts tasks by `created_at` descending, breaking ties by id so the
/// ordering is deterministic.
pub fn sort_newest_first(tasks: &mut [Task]) {
    tasks.sort_by(|a, b| {
        b.created_at
            .cmp(&a.created_at)
            .then_with(|| b.id.cmp(&a.id))
    });
}
