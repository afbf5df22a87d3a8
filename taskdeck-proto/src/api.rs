//! Non-task payload bodies of the HTTP/JSON API.
//!
//! These are the wire shapes shared verbatim between the server handlers
//! and the client: error envelopes, the delete acknowledgment, and the
//! health report.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// JSON error envelope returned on every failure status.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    /// Human-readable failure description.
    pub error: String,
}

impl ErrorBody {
    /// Wraps a message into the error envelope.
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            error: message.into(),
        }
    }
}

/// Acknowledgment body for a successful delete.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Deleted {
    /// Fixed confirmation message.
    pub message: String,
}

impl Deleted {
    /// The acknowledgment the delete route returns.
    #[must_use]
    pub fn acknowledged() -> Self {
        Self {
            message: "Task deleted successfully".to_string(),
        }
    }
}

/// Liveness report returned by `/api/health`.
///
/// Used only for monitoring; the client's fallback decision never consults
/// it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Health {
    /// Always `"ok"` while the process is serving.
    pub status: String,
    /// Server-side time the report was produced.
    pub timestamp: DateTime<Utc>,
    /// Seconds since the server process started.
    pub uptime: f64,
}

impl Health {
    /// Builds a health report for a process alive for `uptime` seconds.
    #[must_use]
    pub fn report(uptime: f64) -> Self {
        Self {
            status: "ok".to_string(),
            timestamp: Utc::now(),
            uptime,
        }
    }
}
