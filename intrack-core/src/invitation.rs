//! Invitation lifecycle for employer-initiated interviews.
//!
//! `pending` is the only state with outgoing transitions, and both targets
//! are terminal. Answering emits a command to the tracker service; the store
//! is mutated only when the resulting change event comes back through the
//! reconciler, so the push channel stays the single source of truth.

use serde::{Deserialize, Serialize};

use crate::error::{TrackerError, TrackerResult};
use crate::interview::{Interview, InvitationStatus, UserId};

/// The candidate's answer to a pending invitation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InvitationAction {
    Accept,
    Decline,
}

impl InvitationAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            InvitationAction::Accept => "accept",
            InvitationAction::Decline => "decline",
        }
    }
}

impl InvitationStatus {
    /// Compute the state an action would transition to, without applying it.
    pub fn respond(self, action: InvitationAction) -> TrackerResult<InvitationStatus> {
        match self {
            InvitationStatus::Pending => Ok(match action {
                InvitationAction::Accept => InvitationStatus::Accepted,
                InvitationAction::Decline => InvitationStatus::Declined,
            }),
            InvitationStatus::None => Err(TrackerError::InvalidTransition(
                "this interview is not an invitation".to_string(),
            )),
            InvitationStatus::Accepted | InvitationStatus::Declined => {
                Err(TrackerError::InvalidTransition(
                    "the invitation has already been answered".to_string(),
                ))
            }
        }
    }
}

/// Validate that `self_user_id` may answer the invitation on this record.
///
/// Only the candidate-side owner may transition out of `pending`. On success
/// returns the state the record will reach once the service's change event
/// arrives; nothing is mutated locally.
pub fn validate_response(
    interview: &Interview,
    self_user_id: UserId,
    action: InvitationAction,
) -> TrackerResult<InvitationStatus> {
    if interview.owner_user_id != self_user_id {
        return Err(TrackerError::InvalidTransition(
            "only the invited candidate may answer".to_string(),
        ));
    }
    interview.invitation_status.respond(action)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interview::InterviewStatus;
    use chrono::{NaiveDate, NaiveTime};

    fn make_invitation(owner: i64, status: InvitationStatus) -> Interview {
        Interview {
            id: 1,
            owner_user_id: owner,
            date: NaiveDate::from_ymd_opt(2024, 3, 5).unwrap(),
            time: NaiveTime::from_hms_opt(10, 0, 0).unwrap(),
            counterpart_name: "Acme".to_string(),
            position: Some("Junior Backend Engineer".to_string()),
            status: InterviewStatus::Scheduled,
            result: None,
            invitation_status: status,
            linked_interview_id: Some(2),
            notes: None,
        }
    }

    #[test]
    fn test_pending_accepts_and_declines() {
        assert_eq!(
            InvitationStatus::Pending.respond(InvitationAction::Accept).unwrap(),
            InvitationStatus::Accepted
        );
        assert_eq!(
            InvitationStatus::Pending.respond(InvitationAction::Decline).unwrap(),
            InvitationStatus::Declined
        );
    }

    #[test]
    fn test_terminal_states_reject_transitions() {
        for status in [InvitationStatus::Accepted, InvitationStatus::Declined] {
            assert!(matches!(
                status.respond(InvitationAction::Accept),
                Err(TrackerError::InvalidTransition(_))
            ));
        }
    }

    #[test]
    fn test_non_invitation_record_has_no_transitions() {
        assert!(matches!(
            InvitationStatus::None.respond(InvitationAction::Decline),
            Err(TrackerError::InvalidTransition(_))
        ));
    }

    #[test]
    fn test_only_the_owner_may_answer() {
        let interview = make_invitation(7, InvitationStatus::Pending);
        assert!(matches!(
            validate_response(&interview, 9, InvitationAction::Accept),
            Err(TrackerError::InvalidTransition(_))
        ));
        assert_eq!(
            validate_response(&interview, 7, InvitationAction::Accept).unwrap(),
            InvitationStatus::Accepted
        );
    }
}
