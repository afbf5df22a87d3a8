//! Offline-session tests: the remote service is unreachable for the whole
//! session and every operation must succeed against the fallback blob with
//! the same semantics.
//!
//! The "remote" points at port 1 on loopback, which refuses connections
//! immediately; the request timeout bounds the worst case.

use std::path::PathBuf;
use std::time::Duration;

use taskdeck::api::RemoteApi;
use taskdeck::fallback::FallbackStore;
use taskdeck::store::{StoreError, TaskStore};
use taskdeck_proto::task::{Category, NewTask, Priority, Status, TaskId, TaskPatch};

const DEAD_URL: &str = "http://127.0.0.1:1";

fn temp_blob() -> PathBuf {
    std::env::temp_dir().join(format!("taskdeck-off-{}.json", TaskId::new()))
}

fn offline_store(blob: PathBuf) -> TaskStore {
    let api = RemoteApi::new(DEAD_URL, Duration::from_secs(1)).expect("client build");
    TaskStore::new(api, FallbackStore::new(blob))
}

#[tokio::test]
async fn full_session_without_the_remote() {
    let blob = temp_blob();
    let mut store = offline_store(blob.clone());

    // Add.
    let added = store
        .add(NewTask {
            priority: Priority::High,
            category: Category::Work,
            ..NewTask::titled("offline task")
        })
        .await
        .unwrap();
    let tasks = store.load().await;
    assert_eq!(tasks.len(), 1);
    assert_eq!(tasks[0].id, added.id);

    // Toggle.
    let toggled = store.toggle(added.id).await.unwrap();
    assert!(toggled.completed);
    assert_eq!(toggled.status, Status::Completed);
    assert!(store.load().await[0].completed);

    // Update.
    let updated = store
        .update(
            added.id,
            TaskPatch {
                title: Some("renamed offline".to_string()),
                ..TaskPatch::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(updated.title, "renamed offline");
    assert_eq!(store.load().await[0].title, "renamed offline");

    // Delete.
    store.delete(added.id).await.unwrap();
    assert!(store.load().await.is_empty());

    let _ = std::fs::remove_file(blob);
}

#[tokio::test]
async fn blob_survives_store_instances() {
    let blob = temp_blob();

    {
        let mut store = offline_store(blob.clone());
        store.add(NewTask::titled("durable")).await.unwrap();
    }

    let mut fresh = offline_store(blob.clone());
    let tasks = fresh.load().await;
    assert_eq!(tasks.len(), 1);
    assert_eq!(tasks[0].title, "durable");

    let _ = std::fs::remove_file(blob);
}

#[tokio::test]
async fn local_add_assigns_id_and_timestamps() {
    let blob = temp_blob();
    let mut store = offline_store(blob.clone());

    let task = store.add(NewTask::titled("locally minted")).await.unwrap();
    assert_eq!(task.created_at, task.updated_at);
    assert_eq!(task.status, Status::Pending);

    // A second add gets a distinct id.
    let other = store.add(NewTask::titled("another")).await.unwrap();
    assert_ne!(task.id, other.id);

    let _ = std::fs::remove_file(blob);
}

#[tokio::test]
async fn mutations_on_unknown_ids_are_not_found() {
    let blob = temp_blob();
    let mut store = offline_store(blob.clone());
    store.add(NewTask::titled("bystander")).await.unwrap();

    let ghost = TaskId::new();
    assert_eq!(
        store.toggle(ghost).await.unwrap_err(),
        StoreError::NotFound(ghost)
    );
    assert_eq!(
        store.delete(ghost).await.unwrap_err(),
        StoreError::NotFound(ghost)
    );
    assert_eq!(
        store
            .update(ghost, TaskPatch::default())
            .await
            .unwrap_err(),
        StoreError::NotFound(ghost)
    );

    // The bystander is untouched.
    assert_eq!(store.load().await.len(), 1);

    let _ = std::fs::remove_file(blob);
}

#[tokio::test]
async fn corrupt_blob_degrades_to_empty_then_recovers() {
    let blob = temp_blob();
    std::fs::write(&blob, b"}} definitely not json").unwrap();

    let mut store = offline_store(blob.clone());
    assert!(store.load().await.is_empty());

    // The next write replaces the corrupt blob wholesale.
    store.add(NewTask::titled("fresh start")).await.unwrap();
    assert_eq!(store.load().await.len(), 1);

    let _ = std::fs::remove_file(blob);
}

#[tokio::test]
async fn offline_stats_satisfy_invariants() {
    let blob = temp_blob();
    let mut store = offline_store(blob.clone());

    let first = store
        .add(NewTask {
            priority: Priority::High,
            ..NewTask::titled("high pending")
        })
        .await
        .unwrap();
    store
        .add(NewTask {
            category: Category::Health,
            ..NewTask::titled("health task")
        })
        .await
        .unwrap();
    store.toggle(first.id).await.unwrap();

    let stats = store.stats().await;
    assert_eq!(stats.total_tasks, 2);
    assert_eq!(stats.completed_tasks + stats.pending_tasks, stats.total_tasks);
    // The high-priority task was completed, so it no longer counts.
    assert_eq!(stats.high_priority_tasks, 0);

    let _ = std::fs::remove_file(blob);
}

#[tokio::test]
async fn empty_title_add_leaves_blob_untouched() {
    let blob = temp_blob();
    let mut store = offline_store(blob.clone());

    let err = store.add(NewTask::titled(" \t ")).await.unwrap_err();
    assert_eq!(err, StoreError::EmptyTitle);
    assert!(!blob.exists());
}

#[tokio::test]
async fn load_sorts_blob_newest_first() {
    let blob = temp_blob();
    let mut store = offline_store(blob.clone());

    store.add(NewTask::titled("first")).await.unwrap();
    store.add(NewTask::titled("second")).await.unwrap();
    store.add(NewTask::titled("third")).await.unwrap();

    let tasks = store.load().await;
    assert!(tasks[0].created_at >= tasks[1].created_at);
    assert!(tasks[1].created_at >= tasks[2].created_at);

    let _ = std::fs::remove_file(blob);
}
