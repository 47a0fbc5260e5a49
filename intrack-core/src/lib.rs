//! Core engine for the intrack ecosystem.
//!
//! This crate keeps a user's interview schedule consistent across the
//! authoritative remote store, the push channel's incremental change
//! events, and delegated read-only views of other users' calendars:
//! - `store` and `reconcile` for incremental state reconciliation
//! - `access` for delegation grants and their revocation semantics
//! - `invitation` for the employer-to-candidate invitation lifecycle
//! - `calendar` for the pure month-grid projection
//! - `session` for wiring it all behind a single frame-routing entry point
//!
//! All I/O (snapshot pulls, commands, the push transport) lives in the
//! client binary; this crate only consumes already-delivered frames.

pub mod access;
pub mod calendar;
pub mod error;
pub mod event;
pub mod interview;
pub mod invitation;
pub mod reconcile;
pub mod scope;
pub mod session;
pub mod store;

// Re-export the types most callers need at the crate root.
pub use access::{AccessGrant, AccessRegistry};
pub use error::{TrackerError, TrackerResult};
pub use event::{ChangeEvent, ChangeKind, TrackerEvent, WireFrame};
pub use interview::{Interview, InterviewId, InterviewResult, InterviewStatus, InvitationStatus, UserId};
pub use scope::ViewScope;
pub use session::Session;
pub use store::InterviewStore;
