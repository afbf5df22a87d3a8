//! HTTP API surface: shared state, router, and route handlers.
//!
//! Serves the task CRUD, filter, stats, and health routes under `/api`,
//! all speaking JSON. Failure statuses follow the stable contract: 400 for
//! invalid payloads, 404 for unknown ids and unmatched routes, each with an
//! `{error}` envelope.

use std::sync::Arc;
use std::time::Instant;

use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, patch};

use taskdeck_proto::api::{Deleted, ErrorBody, Health};
use taskdeck_proto::stats::TaskStats;
use taskdeck_proto::task::{Category, NewTask, Priority, Task, TaskId, TaskPatch};

use crate::repo::{RepoError, TaskRepo};

/// Shared server state: the repository plus the process start time used by
/// the health report.
pub struct ApiState {
    /// The task repository.
    pub repo: TaskRepo,
    started: Instant,
}

impl ApiState {
    /// Wraps a repository, stamping the start time now.
    #[must_use]
    pub fn new(repo: TaskRepo) -> Self {
        Self {
            repo,
            started: Instant::now(),
        }
    }
}

/// A failed request, mapped to a status code and `{error}` body.
enum ApiFailure {
    /// 404 with the canonical "Task not found" body.
    NotFound,
    /// 400 with a payload-specific message.
    BadRequest(String),
}

impl IntoResponse for ApiFailure {
    fn into_response(self) -> Response {
        match self {
            Self::NotFound => (
                StatusCode::NOT_FOUND,
                Json(ErrorBody::new("Task not found")),
            )
                .into_response(),
            Self::BadRequest(message) => {
                (StatusCode::BAD_REQUEST, Json(ErrorBody::new(message))).into_response()
            }
        }
    }
}

impl From<RepoError> for ApiFailure {
    fn from(err: RepoError) -> Self {
        match err {
            RepoError::NotFound(_) => Self::NotFound,
            RepoError::Validation(e) => Self::BadRequest(e.to_string()),
        }
    }
}

/// Builds the API router over the given state.
#[must_use]
pub fn router(state: Arc<ApiState>) -> axum::Router {
    axum::Router::new()
        .route("/api/tasks", get(list_tasks).post(create_task))
        .route(
            "/api/tasks/{id}",
            get(get_task).put(update_task).delete(delete_task),
        )
        .route("/api/tasks/{id}/toggle", patch(toggle_task))
        .route("/api/tasks/category/{category}", get(tasks_by_category))
        .route("/api/tasks/priority/{priority}", get(tasks_by_priority))
        .route("/api/stats", get(get_stats))
        .route("/api/health", get(health))
        .fallback(not_found)
        .with_state(state)
}

/// Parses a path id, mapping malformed ids to the same 404 an unknown id
/// gets.
fn parse_id(raw: &str) -> Result<TaskId, ApiFailure> {
    raw.parse().map_err(|_| ApiFailure::NotFound)
}

async fn list_tasks(State(state): State<Arc<ApiState>>) -> Json<Vec<Task>> {
    Json(state.repo.list().await)
}

async fn get_task(
    State(state): State<Arc<ApiState>>,
    Path(id): Path<String>,
) -> Result<Json<Task>, ApiFailure> {
    let id = parse_id(&id)?;
    let task = state.repo.get(id).await.ok_or(ApiFailure::NotFound)?;
    Ok(Json(task))
}

async fn create_task(
    State(state): State<Arc<ApiState>>,
    payload: Result<Json<NewTask>, JsonRejection>,
) -> Result<(StatusCode, Json<Task>), ApiFailure> {
    // Contract pins malformed bodies to 400, not axum's default 422.
    let Json(payload) =
        payload.map_err(|e| ApiFailure::BadRequest(format!("Failed to create task: {e}")))?;
    let task = state
        .repo
        .create(payload)
        .await
        .map_err(|e| ApiFailure::BadRequest(e.to_string()))?;
    tracing::info!(id = %task.id, title = %task.title, "task created");
    Ok((StatusCode::CREATED, Json(task)))
}

async fn update_task(
    State(state): State<Arc<ApiState>>,
    Path(id): Path<String>,
    payload: Result<Json<TaskPatch>, JsonRejection>,
) -> Result<Json<Task>, ApiFailure> {
    let id = parse_id(&id)?;
    let Json(patch) =
        payload.map_err(|e| ApiFailure::BadRequest(format!("Failed to update task: {e}")))?;
    let task = state.repo.update(id, patch).await?;
    tracing::info!(id = %task.id, "task updated");
    Ok(Json(task))
}

async fn delete_task(
    State(state): State<Arc<ApiState>>,
    Path(id): Path<String>,
) -> Result<Json<Deleted>, ApiFailure> {
    let id = parse_id(&id)?;
    state.repo.delete(id).await?;
    tracing::info!(id = %id, "task deleted");
    Ok(Json(Deleted::acknowledged()))
}

async fn toggle_task(
    State(state): State<Arc<ApiState>>,
    Path(id): Path<String>,
) -> Result<Json<Task>, ApiFailure> {
    let id = parse_id(&id)?;
    let task = state.repo.toggle(id).await?;
    tracing::info!(id = %task.id, completed = task.completed, "task toggled");
    Ok(Json(task))
}

async fn tasks_by_category(
    State(state): State<Arc<ApiState>>,
    Path(category): Path<String>,
) -> Json<Vec<Task>> {
    // An unknown category matches nothing, mirroring a filter query that
    // finds no documents.
    match category.parse::<Category>() {
        Ok(category) => Json(state.repo.list_by_category(category).await),
        Err(_) => Json(Vec::new()),
    }
}

async fn tasks_by_priority(
    State(state): State<Arc<ApiState>>,
    Path(priority): Path<String>,
) -> Json<Vec<Task>> {
    match priority.parse::<Priority>() {
        Ok(priority) => Json(state.repo.list_by_priority(priority).await),
        Err(_) => Json(Vec::new()),
    }
}

async fn get_stats(State(state): State<Arc<ApiState>>) -> Json<TaskStats> {
    Json(state.repo.stats().await)
}

async fn health(State(state): State<Arc<ApiState>>) -> Json<Health> {
    Json(Health::report(state.started.elapsed().as_secs_f64()))
}

async fn not_found() -> (StatusCode, Json<ErrorBody>) {
    (
        StatusCode::NOT_FOUND,
        Json(ErrorBody::new("Endpoint not found")),
    )
}

/// Starts the server on the given address with an in-memory repository,
/// returning the bound address and a join handle.
///
/// # Errors
///
/// Returns an error if the TCP listener cannot bind to the given address.
pub async fn start_server(
    addr: &str,
) -> Result<
    (std::net::SocketAddr, tokio::task::JoinHandle<()>),
    Box<dyn std::error::Error + Send + Sync>,
> {
    start_server_with_state(addr, Arc::new(ApiState::new(TaskRepo::in_memory()))).await
}

/// Starts the server with a pre-configured [`ApiState`].
///
/// This is the primary entry point used by both `main.rs` and test code.
///
/// # Errors
///
/// Returns an error if the TCP listener cannot bind to the given address.
pub async fn start_server_with_state(
    addr: &str,
    state: Arc<ApiState>,
) -> Result<
    (std::net::SocketAddr, tokio::task::JoinHandle<()>),
    Box<dyn std::error::Error + Send + Sync>,
> {
    let app = router(state);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    let bound_addr = listener.local_addr()?;

    let handle = tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, app).await {
            tracing::error!(error = %e, "task server error");
        }
    });

    Ok((bound_addr, handle))
}
