//! Error types shared across layers
//!
//! `ValidationError` rejects records that break a data-model invariant,
//! `DataSourceError` covers failed or timed-out fetches, and `MetricsError`
//! is what the services hand back to callers.

use chrono::{DateTime, Utc};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("{record} has an empty `{field}`")]
    EmptyField { record: String, field: &'static str },

    #[error("user {id}: `{email}` is not a valid email address")]
    InvalidEmail { id: String, email: String },

    #[error("user {id}: authority users must name a department")]
    MissingDepartment { id: String },

    #[error("user {id}: only authority users may have a department")]
    UnexpectedDepartment { id: String },

    #[error("issue {id}: updatedAt {updated_at} is before createdAt {created_at}")]
    UpdatedBeforeCreated {
        id: String,
        created_at: DateTime<Utc>,
        updated_at: DateTime<Utc>,
    },

    #[error("issue {id}: status is resolved but resolvedAt is missing")]
    MissingResolvedAt { id: String },

    #[error("issue {id}: resolvedAt is set but status is {status}")]
    UnexpectedResolvedAt { id: String, status: String },

    #[error("issue {id}: resolvedAt {resolved_at} is before updatedAt {updated_at}")]
    ResolvedBeforeUpdated {
        id: String,
        updated_at: DateTime<Utc>,
        resolved_at: DateTime<Utc>,
    },

    #[error("issue {id}: assignedTo is set while the issue is still pending")]
    AssignedWhilePending { id: String },

    #[error("issue {id}: coordinates ({lat}, {lng}) are out of range")]
    InvalidCoordinates { id: String, lat: f64, lng: f64 },

    #[error("issue {id}: cannot move from {from} to {to}")]
    InvalidTransition { id: String, from: String, to: String },

    #[error("issue {id}: transition time {at} is before updatedAt {updated_at}")]
    TransitionInPast {
        id: String,
        updated_at: DateTime<Utc>,
        at: DateTime<Utc>,
    },

    #[error("duplicate issue id {id}")]
    DuplicateIssueId { id: String },

    #[error("duplicate user id {id}")]
    DuplicateUserId { id: String },

    #[error("user {id}: email {email} is already taken")]
    DuplicateEmail { id: String, email: String },

    #[error("time window starts at {start} after it ends at {end}")]
    InvertedWindow {
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    },

    #[error("analytics snapshot is inconsistent: {reason}")]
    InconsistentAnalytics { reason: String },
}

#[derive(Debug, Error)]
pub enum DataSourceError {
    #[error("request to {url} timed out")]
    Timeout { url: String },

    #[error("request to {url} failed: {source}")]
    Request {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("{url} answered with status {status}: {body}")]
    Status {
        url: String,
        status: u16,
        body: String,
    },

    #[error("could not decode response from {url}: {reason}")]
    Decode { url: String, reason: String },
}

impl DataSourceError {
    pub fn is_timeout(&self) -> bool {
        matches!(self, DataSourceError::Timeout { .. })
    }
}

#[derive(Debug, Error)]
pub enum MetricsError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    DataSource(#[from] DataSourceError),
}
