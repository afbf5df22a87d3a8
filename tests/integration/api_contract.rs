//! Raw wire-level checks of the HTTP/JSON contract: exact status codes and
//! body shapes for every route, independent of the typed client.

use serde_json::{Value, json};
use taskdeck_proto::task::TaskId;

async fn start_backend() -> String {
    let (addr, _handle) = taskdeck_server::api::start_server("127.0.0.1:0")
        .await
        .expect("failed to start test server");
    format!("http://{addr}")
}

#[tokio::test]
async fn create_valid_is_201() {
    let base = start_backend().await;
    let resp = reqwest::Client::new()
        .post(format!("{base}/api/tasks"))
        .json(&json!({"title": "wire task"}))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 201);

    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["title"], "wire task");
    assert_eq!(body["priority"], "medium");
    assert_eq!(body["category"], "other");
    assert_eq!(body["status"], "pending");
    assert_eq!(body["completed"], false);
    assert!(body["id"].is_string());
    assert!(body["createdAt"].is_string());
    assert!(body["updatedAt"].is_string());
}

#[tokio::test]
async fn create_missing_title_is_400() {
    let base = start_backend().await;
    let resp = reqwest::Client::new()
        .post(format!("{base}/api/tasks"))
        .json(&json!({"priority": "high"}))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 400);
    let body: Value = resp.json().await.unwrap();
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn create_whitespace_title_is_400() {
    let base = start_backend().await;
    let resp = reqwest::Client::new()
        .post(format!("{base}/api/tasks"))
        .json(&json!({"title": "   "}))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 400);
}

#[tokio::test]
async fn create_invalid_enum_is_400() {
    let base = start_backend().await;
    let resp = reqwest::Client::new()
        .post(format!("{base}/api/tasks"))
        .json(&json!({"title": "t", "priority": "urgent"}))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 400);
}

#[tokio::test]
async fn unknown_and_malformed_ids_are_404() {
    let base = start_backend().await;
    let client = reqwest::Client::new();

    for url in [
        format!("{base}/api/tasks/{}", TaskId::new()),
        format!("{base}/api/tasks/not-a-uuid"),
    ] {
        let resp = client.get(&url).send().await.unwrap();
        assert_eq!(resp.status(), 404);
        let body: Value = resp.json().await.unwrap();
        assert_eq!(body["error"], "Task not found");
    }

    let resp = client
        .put(format!("{base}/api/tasks/{}", TaskId::new()))
        .json(&json!({"priority": "high"}))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 404);

    let resp = client
        .delete(format!("{base}/api/tasks/{}", TaskId::new()))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 404);

    let resp = client
        .patch(format!("{base}/api/tasks/{}/toggle", TaskId::new()))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 404);
}

#[tokio::test]
async fn delete_returns_acknowledgment_message() {
    let base = start_backend().await;
    let client = reqwest::Client::new();

    let created: Value = client
        .post(format!("{base}/api/tasks"))
        .json(&json!({"title": "to delete"}))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    let id = created["id"].as_str().unwrap().to_string();

    let resp = client
        .delete(format!("{base}/api/tasks/{id}"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["message"], "Task deleted successfully");
}

#[tokio::test]
async fn toggle_route_flips_atomically() {
    let base = start_backend().await;
    let client = reqwest::Client::new();

    let created: Value = client
        .post(format!("{base}/api/tasks"))
        .json(&json!({"title": "toggle me"}))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    let id = created["id"].as_str().unwrap().to_string();

    let toggled: Value = client
        .patch(format!("{base}/api/tasks/{id}/toggle"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(toggled["completed"], true);
    assert_eq!(toggled["status"], "completed");
}

#[tokio::test]
async fn category_and_priority_filter_routes() {
    let base = start_backend().await;
    let client = reqwest::Client::new();

    client
        .post(format!("{base}/api/tasks"))
        .json(&json!({"title": "groceries", "category": "shopping", "priority": "low"}))
        .send()
        .await
        .unwrap();
    client
        .post(format!("{base}/api/tasks"))
        .json(&json!({"title": "report", "category": "work", "priority": "high"}))
        .send()
        .await
        .unwrap();

    let shopping: Vec<Value> = client
        .get(format!("{base}/api/tasks/category/shopping"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(shopping.len(), 1);
    assert_eq!(shopping[0]["title"], "groceries");

    let high: Vec<Value> = client
        .get(format!("{base}/api/tasks/priority/high"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(high.len(), 1);
    assert_eq!(high[0]["title"], "report");

    // Unknown filter values match nothing rather than failing.
    let resp = client
        .get(format!("{base}/api/tasks/category/misc"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    let none: Vec<Value> = resp.json().await.unwrap();
    assert!(none.is_empty());
}

#[tokio::test]
async fn list_orders_newest_first() {
    let base = start_backend().await;
    let client = reqwest::Client::new();

    for title in ["first", "second", "third"] {
        client
            .post(format!("{base}/api/tasks"))
            .json(&json!({"title": title}))
            .send()
            .await
            .unwrap();
    }

    let tasks: Vec<Value> = client
        .get(format!("{base}/api/tasks"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(tasks.len(), 3);
    let times: Vec<&str> = tasks
        .iter()
        .map(|t| t["createdAt"].as_str().unwrap())
        .collect();
    // RFC3339 strings compare chronologically.
    assert!(times[0] >= times[1]);
    assert!(times[1] >= times[2]);
}

#[tokio::test]
async fn stats_route_shape() {
    let base = start_backend().await;
    let client = reqwest::Client::new();

    client
        .post(format!("{base}/api/tasks"))
        .json(&json!({"title": "only one", "priority": "high"}))
        .send()
        .await
        .unwrap();

    let stats: Value = client
        .get(format!("{base}/api/stats"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(stats["totalTasks"], 1);
    assert_eq!(stats["completedTasks"], 0);
    assert_eq!(stats["pendingTasks"], 1);
    assert_eq!(stats["highPriorityTasks"], 1);
    assert!(stats["categoryStats"].is_array());
    assert!(stats["priorityStats"].is_array());
}

#[tokio::test]
async fn health_and_unmatched_routes() {
    let base = start_backend().await;

    let resp = reqwest::get(format!("{base}/api/health")).await.unwrap();
    assert_eq!(resp.status(), 200);
    let health: Value = resp.json().await.unwrap();
    assert_eq!(health["status"], "ok");
    assert!(health["timestamp"].is_string());
    assert!(health["uptime"].as_f64().unwrap() >= 0.0);

    let resp = reqwest::get(format!("{base}/api/no/such/route"))
        .await
        .unwrap();
    assert_eq!(resp.status(), 404);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["error"], "Endpoint not found");
}
