//! Typed HTTP client for the remote task service.
//!
//! Every call is bounded by the configured request timeout so a hung remote
//! can never block an operation indefinitely; the caller's fallback dispatch
//! is a pure match on the returned [`ApiError`].

use std::time::Duration;

use taskdeck_proto::api::{Deleted, ErrorBody, Health};
use taskdeck_proto::stats::TaskStats;
use taskdeck_proto::task::{NewTask, Task, TaskId, TaskPatch};

/// Outcome kinds of a remote call, as seen by the task store.
///
/// `Validation` and `NotFound` are user-facing; `Unavailable` covers both
/// transport failures and unexpected statuses and triggers the silent
/// fallback path.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Transport failure, timeout, or a non-success status outside the
    /// 400/404 contract.
    #[error("remote task service unavailable: {0}")]
    Unavailable(String),

    /// The server rejected the payload (HTTP 400).
    #[error("{0}")]
    Validation(String),

    /// No task with the requested id exists (HTTP 404).
    #[error("task not found")]
    NotFound,
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        Self::Unavailable(err.to_string())
    }
}

/// HTTP client bound to one task service base URL.
pub struct RemoteApi {
    http: reqwest::Client,
    base_url: String,
}

impl RemoteApi {
    /// Builds a client for `base_url` with the given per-request timeout.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Unavailable`] if the underlying HTTP client
    /// cannot be constructed.
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, ApiError> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ApiError::Unavailable(e.to_string()))?;
        Ok(Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    /// Fetches all tasks, newest first.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] on transport failure or a failure status.
    pub async fn list(&self) -> Result<Vec<Task>, ApiError> {
        let resp = self.http.get(self.url("/api/tasks")).send().await?;
        Ok(check(resp).await?.json().await?)
    }

    /// Fetches one task by id.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::NotFound`] for an unknown id.
    pub async fn get(&self, id: TaskId) -> Result<Task, ApiError> {
        let resp = self
            .http
            .get(self.url(&format!("/api/tasks/{id}")))
            .send()
            .await?;
        Ok(check(resp).await?.json().await?)
    }

    /// Creates a task, returning the stored record.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Validation`] if the server rejects the payload.
    pub async fn create(&self, payload: &NewTask) -> Result<Task, ApiError> {
        let resp = self
            .http
            .post(self.url("/api/tasks"))
            .json(payload)
            .send()
            .await?;
        Ok(check(resp).await?.json().await?)
    }

    /// Merges a partial patch into an existing task.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::NotFound`] for an unknown id or
    /// [`ApiError::Validation`] for an invalid patch.
    pub async fn update(&self, id: TaskId, patch: &TaskPatch) -> Result<Task, ApiError> {
        let resp = self
            .http
            .put(self.url(&format!("/api/tasks/{id}")))
            .json(patch)
            .send()
            .await?;
        Ok(check(resp).await?.json().await?)
    }

    /// Deletes a task. Hard removal, no undo.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::NotFound`] for an unknown id.
    pub async fn delete(&self, id: TaskId) -> Result<Deleted, ApiError> {
        let resp = self
            .http
            .delete(self.url(&format!("/api/tasks/{id}")))
            .send()
            .await?;
        Ok(check(resp).await?.json().await?)
    }

    /// Flips a task's completion in one atomic server-side step.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::NotFound`] if the task has disappeared.
    pub async fn toggle(&self, id: TaskId) -> Result<Task, ApiError> {
        let resp = self
            .http
            .patch(self.url(&format!("/api/tasks/{id}/toggle")))
            .send()
            .await?;
        Ok(check(resp).await?.json().await?)
    }

    /// Fetches aggregate statistics.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] on transport failure or a failure status.
    pub async fn stats(&self) -> Result<TaskStats, ApiError> {
        let resp = self.http.get(self.url("/api/stats")).send().await?;
        Ok(check(resp).await?.json().await?)
    }

    /// Fetches the liveness report. Monitoring only; the fallback decision
    /// never consults it.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] on transport failure or a failure status.
    pub async fn health(&self) -> Result<Health, ApiError> {
        let resp = self.http.get(self.url("/api/health")).send().await?;
        Ok(check(resp).await?.json().await?)
    }
}

/// Maps a response status onto the [`ApiError`] taxonomy, reading the
/// `{error}` envelope for the message when one is present.
async fn check(resp: reqwest::Response) -> Result<reqwest::Response, ApiError> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }
    let message = resp
        .json::<ErrorBody>()
        .await
        .map_or_else(|_| status.to_string(), |body| body.error);
    match status.as_u16() {
        400 => Err(ApiError::Validation(message)),
        404 => Err(ApiError::NotFound),
        _ => Err(ApiError::Unavailable(message)),
    }
}
