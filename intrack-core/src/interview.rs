//! Wire-neutral interview record types.
//!
//! These types mirror the tracker service's JSON payloads. The same shape is
//! returned by snapshot pulls and carried inside push-channel frames, so the
//! reconciler can replace records wholesale without field-level merging.

use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

pub type UserId = i64;
pub type InterviewId = i64;

/// A scheduled meeting between a graduate and an employer, as materialized
/// in one party's personal schedule.
///
/// A single logical meeting created by an employer yields two owner-scoped
/// records, one per party, linked through `linked_interview_id`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Interview {
    pub id: InterviewId,
    /// The user whose personal schedule this record belongs to.
    pub owner_user_id: UserId,
    pub date: NaiveDate,
    pub time: NaiveTime,
    /// Display name of the other party (employer for a graduate's record,
    /// graduate for an employer's record).
    pub counterpart_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<String>,
    pub status: InterviewStatus,
    /// Only meaningful once `status` is `Completed`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<InterviewResult>,
    /// Present only on records addressed to a candidate by an employer;
    /// `None` means the record was self-created.
    #[serde(default)]
    pub invitation_status: InvitationStatus,
    /// Counterpart record owned by the other meeting participant.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub linked_interview_id: Option<InterviewId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl Interview {
    /// Natural sort key: ascending date and time, ties broken by id so
    /// ordering stays deterministic across re-sorts.
    pub fn sort_key(&self) -> (NaiveDate, NaiveTime, InterviewId) {
        (self.date, self.time, self.id)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InterviewStatus {
    Scheduled,
    Completed,
    Cancelled,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InterviewResult {
    Passed,
    Failed,
    Pending,
}

/// Candidate-side answer to an employer-initiated interview.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InvitationStatus {
    /// Self-created record, carries no invitation semantics.
    #[default]
    None,
    Pending,
    Accepted,
    Declined,
}
