//! Error types for the intrack ecosystem.

use thiserror::Error;

/// Errors that can occur in tracker operations.
#[derive(Error, Debug)]
pub enum TrackerError {
    #[error("Snapshot fetch failed: {0}")]
    Fetch(String),

    #[error("Unknown change event kind: '{0}'")]
    UnknownEventKind(String),

    #[error("Calendar access already granted to user {0}")]
    DuplicateGrant(i64),

    #[error("Invalid grant target: {0}")]
    InvalidTarget(String),

    #[error("Grant {0} was not issued by you")]
    NotGrantor(i64),

    #[error("Interview {0} not found; the schedule may be stale, pull it again")]
    NotFound(i64),

    #[error("Invalid invitation transition: {0}")]
    InvalidTransition(String),

    #[error("No access to the calendar of user {0}")]
    NoAccess(i64),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

/// Result type alias for tracker operations.
pub type TrackerResult<T> = Result<T, TrackerError>;
