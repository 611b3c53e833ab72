//! Backend access for the applicant client.
//!
//! [`RemoteDataClient`] is the seam the workflow services talk through; the
//! production implementation lives in [`http`].

pub mod http;

use async_trait::async_trait;
use serde_json::Value;

use crate::workflows::application::domain::{
    ApplicationPayload, ApplicationReceipt, JobId, JobPosting, UserProfile,
};

pub use http::HttpRemoteClient;

/// Phrase the backend uses when a user applies to the same posting twice.
const ALREADY_APPLIED_MARKER: &str = "already applied";

/// Authenticated requests against the job board REST API.
#[async_trait]
pub trait RemoteDataClient: Send + Sync {
    /// `GET /jobs/{id}`.
    async fn job(&self, job_id: &JobId) -> Result<JobPosting, RemoteError>;

    /// `GET /jobs/applied-jobs`.
    async fn applied_jobs(&self) -> Result<Vec<JobId>, RemoteError>;

    /// `POST /jobs/{id}/apply`.
    async fn apply(
        &self,
        job_id: &JobId,
        payload: &ApplicationPayload,
    ) -> Result<ApplicationReceipt, RemoteError>;

    /// `GET /auth/profile`; `None` when the user has not created a profile.
    async fn profile(&self) -> Result<Option<UserProfile>, RemoteError>;
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RemoteError {
    #[error("{0}")]
    NotFound(String),
    #[error("{message}")]
    Status { status: u16, message: String },
    #[error("network error: {0}")]
    Transport(String),
    #[error("unexpected response body: {0}")]
    Decode(String),
    #[error("invalid request url: {0}")]
    InvalidUrl(String),
}

impl RemoteError {
    /// Maps a non-success response to an error carrying the backend's
    /// `detail`, or `HTTP <status>: <reason>` when there is none.
    pub fn from_response(status: u16, reason: &str, body: &str) -> Self {
        let message = detail_message(body).unwrap_or_else(|| format!("HTTP {status}: {reason}"));
        if status == 404 {
            RemoteError::NotFound(message)
        } else {
            RemoteError::Status { status, message }
        }
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            RemoteError::NotFound(_) => Some(404),
            RemoteError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Duplicate-submission signal, matched on the backend's detail text.
    pub fn is_already_applied(&self) -> bool {
        match self {
            RemoteError::Status { message, .. } => message
                .to_ascii_lowercase()
                .contains(ALREADY_APPLIED_MARKER),
            _ => false,
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, RemoteError::NotFound(_))
    }

    pub fn is_unauthorized(&self) -> bool {
        matches!(self.status(), Some(401 | 403))
    }

    /// Network failures, timeouts and server-side errors.
    pub fn is_transient(&self) -> bool {
        match self {
            RemoteError::Transport(_) => true,
            RemoteError::Status { status, .. } => *status >= 500 || matches!(status, 408 | 429),
            _ => false,
        }
    }
}

fn detail_message(body: &str) -> Option<String> {
    let value: Value = serde_json::from_str(body).ok()?;
    match value.get("detail")? {
        Value::String(detail) if !detail.trim().is_empty() => Some(detail.clone()),
        Value::String(_) | Value::Null => None,
        other => Some(other.to_string()),
    }
}
