//! Property tests for the stats rollup: whatever mix of tasks exists, the
//! counters must stay internally consistent.

use proptest::prelude::*;
use taskdeck_proto::stats;
use taskdeck_proto::task::{Category, NewTask, Priority, Task};

fn priority_strategy() -> impl Strategy<Value = Priority> {
    prop::sample::select(Priority::ALL.to_vec())
}

fn category_strategy() -> impl Strategy<Value = Category> {
    prop::sample::select(Category::ALL.to_vec())
}

fn task_strategy() -> impl Strategy<Value = Task> {
    ("[a-z]{1,12}", priority_strategy(), category_strategy(), any::<bool>()).prop_map(
        |(title, priority, category, completed)| {
            let mut new = NewTask::titled(title);
            new.priority = priority;
            new.category = category;
            let mut task = Task::create(new).unwrap();
            if completed {
                task.toggle();
            }
            task
        },
    )
}

proptest! {
    #[test]
    fn completed_and_pending_partition_the_total(tasks in prop::collection::vec(task_strategy(), 0..40)) {
        let stats = stats::compute(&tasks);
        prop_assert_eq!(stats.completed_tasks + stats.pending_tasks, stats.total_tasks);
        prop_assert_eq!(stats.total_tasks, tasks.len() as u64);
    }

    #[test]
    fn bucket_counts_sum_to_the_total(tasks in prop::collection::vec(task_strategy(), 0..40)) {
        let stats = stats::compute(&tasks);
        let by_category: u64 = stats.category_stats.iter().map(|c| c.count).sum();
        let by_priority: u64 = stats.priority_stats.iter().map(|p| p.count).sum();
        prop_assert_eq!(by_category, stats.total_tasks);
        prop_assert_eq!(by_priority, stats.total_tasks);
    }

    #[test]
    fn buckets_never_carry_zero_counts(tasks in prop::collection::vec(task_strategy(), 0..40)) {
        let stats = stats::compute(&tasks);
        prop_assert!(stats.category_stats.iter().all(|c| c.count > 0));
        prop_assert!(stats.priority_stats.iter().all(|p| p.count > 0));
    }

    #[test]
    fn high_priority_count_is_bounded(tasks in prop::collection::vec(task_strategy(), 0..40)) {
        let stats = stats::compute(&tasks);
        let open_high = tasks
            .iter()
            .filter(|t| t.priority == Priority::High && !t.completed)
            .count() as u64;
        prop_assert_eq!(stats.high_priority_tasks, open_high);
        prop_assert!(stats.high_priority_tasks <= stats.total_tasks);
    }
}
