//! Aggregate task statistics.
//!
//! [`compute`] derives a [`TaskStats`] snapshot from a task slice. It is a
//! pure read over current state — there are no separate counters to keep in
//! sync — and is shared by the server (`/api/stats`) and the client's
//! fallback path.

use serde::{Deserialize, Serialize};

use crate::task::{Category, Priority, Task};

/// Number of tasks in one category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryCount {
    /// The category being counted.
    pub category: Category,
    /// How many tasks are filed under it.
    pub count: u64,
}

/// Number of tasks at one priority.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriorityCount {
    /// The priority being counted.
    pub priority: Priority,
    /// How many tasks carry it.
    pub count: u64,
}

/// Aggregate counts over the task collection.
///
/// Invariants: `completed_tasks + pending_tasks == total_tasks`, and each
/// breakdown sums to `total_tasks`. Breakdown buckets with a zero count are
/// omitted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskStats {
    /// Total number of tasks.
    pub total_tasks: u64,
    /// Tasks with `completed == true`.
    pub completed_tasks: u64,
    /// Tasks with `completed == false`.
    pub pending_tasks: u64,
    /// High-priority tasks that are not yet completed.
    pub high_priority_tasks: u64,
    /// Per-category breakdown, in enum declaration order.
    pub category_stats: Vec<CategoryCount>,
    /// Per-priority breakdown, in enum declaration order.
    pub priority_stats: Vec<PriorityCount>,
}

/// Computes aggregate statistics over the given tasks.
#[must_use]
pub fn compute(tasks: &[Task]) -> TaskStats {
    let total = tasks.len() as u64;
    let completed = tasks.iter().filter(|t| t.completed).count() as u64;
    let high_priority = tasks
        .iter()
        .filter(|t| t.priority == Priority::High && !t.completed)
        .count() as u64;

    let category_stats = Category::ALL
        .iter()
        .filter_map(|&category| {
            let count = tasks.iter().filter(|t| t.category == category).count() as u64;
            (count > 0).then_some(CategoryCount { category, count })
        })
        .collect();

    let priority_stats = Priority::ALL
        .iter()
        .filter_map(|&priority| {
            let count = tasks.iter().filter(|t| t.priority == priority).count() as u64;
            (count > 0).then_some(PriorityCount { priority, count })
        })
        .collect();

    TaskStats {
        total_tasks: total,
        completed_tasks: completed,
        pending_tasks: total - completed,
        high_priority_tasks: high_priority,
        category_stats,
        priority_stats,
    }
}
